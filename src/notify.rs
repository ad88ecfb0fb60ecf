use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
  Success,
  Info,
  Warning,
  Error,
}

impl Level {
  pub fn label(self) -> &'static str {
    match self {
      Level::Success => "ok",
      Level::Info => "info",
      Level::Warning => "warning",
      Level::Error => "error",
    }
  }
}

/// A short, non-blocking message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
  pub level: Level,
  pub message: String,
}

/// The toast surface. Sections report outcomes through it and never block on it.
pub trait Notifier {
  fn notify(&mut self, notice: Notice);

  fn success(&mut self, message: &str) {
    self.notify(Notice { level: Level::Success, message: message.to_string() });
  }

  fn info(&mut self, message: &str) {
    self.notify(Notice { level: Level::Info, message: message.to_string() });
  }

  fn warning(&mut self, message: &str) {
    self.notify(Notice { level: Level::Warning, message: message.to_string() });
  }

  fn error(&mut self, message: &str) {
    self.notify(Notice { level: Level::Error, message: message.to_string() });
  }
}

/// Prints notices for the CLI: successes and info on stdout, problems on stderr.
#[derive(Debug, Default)]
pub struct ConsoleNotifier {
  /// Set once any error-level notice was shown; drives the exit code.
  pub saw_error: bool,
}

impl Notifier for ConsoleNotifier {
  fn notify(&mut self, notice: Notice) {
    match notice.level {
      Level::Success | Level::Info => {
        info!(level = notice.level.label(), message = %notice.message, "notice");
        println!("{}", notice.message);
      }
      Level::Warning => {
        warn!(message = %notice.message, "notice");
        eprintln!("warning: {}", notice.message);
      }
      Level::Error => {
        error!(message = %notice.message, "notice");
        eprintln!("error: {}", notice.message);
        self.saw_error = true;
      }
    }
  }
}

/// Keeps every notice in order.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
  pub notices: Vec<Notice>,
}

impl RecordingNotifier {
  pub fn last(&self) -> Option<&Notice> {
    self.notices.last()
  }

  pub fn count(&self, level: Level) -> usize {
    self.notices.iter().filter(|n| n.level == level).count()
  }
}

impl Notifier for RecordingNotifier {
  fn notify(&mut self, notice: Notice) {
    self.notices.push(notice);
  }
}
