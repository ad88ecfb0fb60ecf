use directories::ProjectDirs;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Route `tracing` output to `folio.log` in the data directory so it never mixes
/// with command output. `RUST_LOG` wins over `default_filter`.
///
/// Hold the returned guard until exit; dropping it flushes pending lines.
/// Returns `None` when there is no data directory to log into.
pub fn init(default_filter: &str) -> Option<WorkerGuard> {
  let proj_dirs = ProjectDirs::from("", "", "folio")?;
  let log_dir = proj_dirs.data_dir();
  std::fs::create_dir_all(log_dir).ok()?;

  let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(log_dir, "folio.log"));
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
  tracing_subscriber::fmt().with_env_filter(filter).with_writer(writer).with_ansi(false).try_init().ok()?;
  Some(guard)
}
