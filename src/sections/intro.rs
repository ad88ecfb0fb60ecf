use tracing::info;

use super::{load_key, write_through};
use crate::keys;
use crate::notify::Notifier;
use crate::store::KeyValueStore;
use crate::youtube::{EmbedFrame, VideoId, extract_video_id};

const SAVE_FAILED: &str = "Could not save the intro video; it will reset when you leave.";

/// The hero's intro video, stored as the URL the user pasted.
#[derive(Debug, Default)]
pub struct IntroVideo {
  url: Option<String>,
}

impl IntroVideo {
  pub fn load(store: &dyn KeyValueStore) -> Self {
    Self { url: load_key(store, keys::INTRO_VIDEO) }
  }

  pub fn url(&self) -> Option<&str> {
    self.url.as_deref()
  }

  pub fn video_id(&self) -> Option<VideoId> {
    self.url.as_deref().and_then(extract_video_id)
  }

  pub fn embed(&self) -> Option<EmbedFrame> {
    self.video_id().map(|id| EmbedFrame::new(&id))
  }

  pub fn set(&mut self, store: &mut dyn KeyValueStore, notifier: &mut dyn Notifier, url: &str) -> Option<VideoId> {
    if url.trim().is_empty() {
      notifier.error("Please enter a YouTube URL");
      return None;
    }
    let Some(id) = extract_video_id(url) else {
      notifier.error("Please enter a valid YouTube URL");
      return None;
    };
    info!(id = %id, "intro: video set");
    write_through(store, notifier, keys::INTRO_VIDEO, Some(url), SAVE_FAILED);
    self.url = Some(url.to_string());
    notifier.success("Intro video updated!");
    Some(id)
  }

  pub fn clear(&mut self, store: &mut dyn KeyValueStore, notifier: &mut dyn Notifier) {
    if self.url.take().is_some() {
      write_through(store, notifier, keys::INTRO_VIDEO, None, SAVE_FAILED);
      notifier.success("Intro video removed");
    }
  }
}
