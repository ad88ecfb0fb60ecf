use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

use folio::config::Config;
use folio::media::{MediaFile, ObjectUrlRegistry};
use folio::notify::ConsoleNotifier;
use folio::sections::avatar::ProfileImage;
use folio::sections::gallery::VideoGallery;
use folio::sections::intro::IntroVideo;
use folio::sections::profiling::ProfilingSheet;
use folio::store::FileStore;
use folio::youtube::{extract_video_id, render_embed, thumbnail_urls};

// --- CLI ---

#[derive(Parser, Debug)]
#[command(author, version = env!("CARGO_PKG_VERSION"), about, long_about = None)]
struct Args {
  /// Storage file to use instead of the configured one
  #[arg(long, global = true)]
  store: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Check whether a string names a YouTube video
  Url { url: String },
  /// The YouTube video gallery
  #[command(subcommand)]
  Gallery(GalleryCommand),
  /// The profiling sheet of questions
  #[command(subcommand)]
  Sheet(SheetCommand),
  /// The profile picture
  #[command(subcommand)]
  Avatar(AvatarCommand),
  /// The intro video
  #[command(subcommand)]
  Intro(IntroCommand),
  /// Preferences in prefs.toml
  #[command(subcommand)]
  Config(ConfigCommand),
}

#[derive(Subcommand, Debug)]
enum GalleryCommand {
  /// List stored videos
  List,
  /// Add a video by URL
  Add {
    url: String,
    #[arg(short, long, default_value = "")]
    title: String,
  },
  /// Remove the video at a 1-based position
  Remove { position: usize },
  /// Print the player markup for the video at a 1-based position
  Embed { position: usize },
}

#[derive(Subcommand, Debug)]
enum SheetCommand {
  /// Show every question with its answer
  List,
  /// Set the answer to a question
  Answer { question: u32, text: String },
  /// Attach a video response to a question
  Attach { question: u32, file: PathBuf },
  /// Remove a question's video response
  Detach { question: u32 },
  /// Confirm all responses are saved
  Save,
}

#[derive(Subcommand, Debug)]
enum AvatarCommand {
  /// Use an image file as the profile picture
  Set { file: PathBuf },
  /// Go back to initials
  Clear,
  /// Show what the avatar displays
  Show,
}

#[derive(Subcommand, Debug)]
enum IntroCommand {
  /// Set the intro video by URL
  Set { url: String },
  /// Remove the intro video
  Clear,
  /// Show the intro video
  Show,
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
  /// Print the effective preferences
  Show,
  /// Update preferences
  Set {
    #[arg(long)]
    store_file: Option<PathBuf>,
    #[arg(long)]
    quota_bytes: Option<usize>,
    #[arg(long)]
    log_filter: Option<String>,
    #[arg(long)]
    initials: Option<String>,
  },
}

// --- Helpers ---

/// Turn a 1-based position into an index.
fn position_to_index(position: usize) -> Result<usize> {
  position.checked_sub(1).ok_or_else(|| anyhow!("Positions start at 1"))
}

/// One-line summary of the first `max` characters of an answer.
fn preview(text: &str, max: usize) -> String {
  let line = text.lines().next().unwrap_or("");
  if line.chars().count() > max || text.lines().count() > 1 {
    let cut: String = line.chars().take(max).collect();
    format!("{}…", cut)
  } else {
    line.to_string()
  }
}

fn open_store(args_store: Option<PathBuf>, config: &Config) -> Result<FileStore> {
  let path = args_store
    .or_else(|| config.store_file.clone())
    .or_else(FileStore::default_path)
    .ok_or_else(|| anyhow!("No data directory available; pass --store <PATH>"))?;
  FileStore::open(&path, config.quota()).with_context(|| format!("Failed to open store at {}", path.display()))
}

// --- Commands ---

fn run_gallery(cmd: GalleryCommand, store: &mut FileStore, notifier: &mut ConsoleNotifier) -> Result<()> {
  let mut gallery = VideoGallery::load(store);
  match cmd {
    GalleryCommand::List => {
      if gallery.is_empty() {
        println!("No videos yet");
      }
      for (i, video) in gallery.entries().iter().enumerate() {
        println!("{:>3}. {}", i + 1, video.title);
        match extract_video_id(&video.url) {
          Some(id) => {
            println!("     {}", id.watch_url());
            if let Some(thumb) = thumbnail_urls(id.as_str()).first() {
              println!("     {}", thumb);
            }
          }
          None => println!("     Invalid YouTube URL: {}", video.url),
        }
        if let Some(description) = &video.description {
          println!("     {}", description);
        }
      }
    }
    GalleryCommand::Add { url, title } => {
      gallery.add(store, notifier, &url, &title);
    }
    GalleryCommand::Remove { position } => {
      gallery.remove(store, notifier, position_to_index(position)?);
    }
    GalleryCommand::Embed { position } => {
      let frame = gallery.embed(position_to_index(position)?).ok_or_else(|| anyhow!("No playable video at {}", position))?;
      println!("{}", frame.to_html());
    }
  }
  Ok(())
}

fn run_sheet(cmd: SheetCommand, store: &mut FileStore, notifier: &mut ConsoleNotifier) -> Result<()> {
  let mut sheet = ProfilingSheet::load(store);
  // Object URLs only live for this process.
  let mut registry = ObjectUrlRegistry::new();
  match cmd {
    SheetCommand::List => {
      for q in sheet.questions() {
        println!("{:>2}. {}", q.id(), q.spec.text);
        if q.is_answered() {
          println!("    > {}", preview(&q.answer, 72));
        }
        if let Some(video) = &q.video {
          println!("    [video] {}", video);
        }
      }
      println!("\n{}/{} answered", sheet.answered_count(), sheet.questions().len());
    }
    SheetCommand::Answer { question, text } => {
      sheet.set_answer(store, notifier, question, &text);
    }
    SheetCommand::Attach { question, file } => {
      let file = MediaFile::read(&file)?;
      if let Some(url) = sheet.attach_video(store, notifier, &mut registry, question, &file) {
        println!("{} ({} bytes held for this session)", url, registry.live_bytes());
      }
    }
    SheetCommand::Detach { question } => {
      sheet.remove_video(store, notifier, &mut registry, question);
    }
    SheetCommand::Save => sheet.save_all(notifier),
  }
  Ok(())
}

fn run_avatar(cmd: AvatarCommand, store: &mut FileStore, notifier: &mut ConsoleNotifier, config: &Config) -> Result<()> {
  let mut avatar = ProfileImage::load(store, config.initials());
  match cmd {
    AvatarCommand::Set { file } => {
      let file = MediaFile::read(&file)?;
      avatar.set_image(store, notifier, &file);
    }
    AvatarCommand::Clear => avatar.clear(store, notifier),
    AvatarCommand::Show => match avatar.data_url() {
      Some(url) => println!("{} ({} bytes encoded)", preview(url, 48), url.len()),
      None => println!("{}", avatar.initials()),
    },
  }
  Ok(())
}

fn run_intro(cmd: IntroCommand, store: &mut FileStore, notifier: &mut ConsoleNotifier) -> Result<()> {
  let mut intro = IntroVideo::load(store);
  match cmd {
    IntroCommand::Set { url } => {
      intro.set(store, notifier, &url);
    }
    IntroCommand::Clear => intro.clear(store, notifier),
    IntroCommand::Show => match intro.url() {
      Some(url) => println!("{}", render_embed(url)),
      None => println!("No intro video"),
    },
  }
  Ok(())
}

fn run_config(cmd: ConfigCommand, mut config: Config) -> Result<()> {
  match cmd {
    ConfigCommand::Show => {
      print!("{}", toml::to_string(&config).context("Failed to render preferences")?);
    }
    ConfigCommand::Set { store_file, quota_bytes, log_filter, initials } => {
      if store_file.is_some() {
        config.store_file = store_file;
      }
      if quota_bytes.is_some() {
        config.quota_bytes = quota_bytes;
      }
      if log_filter.is_some() {
        config.log_filter = log_filter;
      }
      if initials.is_some() {
        config.initials = initials;
      }
      config.save()?;
      info!(config = ?config, "config: saved");
      println!("Preferences saved");
    }
  }
  Ok(())
}

fn run_url(url: &str) -> ExitCode {
  match extract_video_id(url) {
    Some(id) => {
      println!("id:    {}", id);
      println!("embed: {}", id.embed_url());
      println!("watch: {}", id.watch_url());
      ExitCode::SUCCESS
    }
    None => {
      println!("not a YouTube video");
      ExitCode::FAILURE
    }
  }
}

/// Open the store, run one section command against it, and fail the exit code if the
/// user saw an error.
fn run_section(
  store_override: Option<PathBuf>,
  config: &Config,
  run: impl FnOnce(&mut FileStore, &mut ConsoleNotifier) -> Result<()>,
) -> Result<ExitCode> {
  let mut store = open_store(store_override, config)?;
  info!(path = %store.path().display(), "store opened");
  let mut notifier = ConsoleNotifier::default();
  run(&mut store, &mut notifier)?;
  Ok(if notifier.saw_error { ExitCode::FAILURE } else { ExitCode::SUCCESS })
}

// --- Main ---

fn main() -> Result<ExitCode> {
  let args = Args::parse();
  let config = Config::load();
  let _log_guard = folio::logging::init(config.log_filter());

  match args.command {
    Command::Url { url } => Ok(run_url(&url)),
    Command::Config(cmd) => {
      run_config(cmd, config)?;
      Ok(ExitCode::SUCCESS)
    }
    Command::Gallery(cmd) => run_section(args.store, &config, |store, n| run_gallery(cmd, store, n)),
    Command::Sheet(cmd) => run_section(args.store, &config, |store, n| run_sheet(cmd, store, n)),
    Command::Avatar(cmd) => run_section(args.store, &config, |store, n| run_avatar(cmd, store, n, &config)),
    Command::Intro(cmd) => run_section(args.store, &config, |store, n| run_intro(cmd, store, n)),
  }
}
