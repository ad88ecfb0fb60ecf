use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{load_key, report};
use crate::constants::constants;
use crate::keys;
use crate::notify::Notifier;
use crate::store::{KeyValueStore, StoreResult};
use crate::youtube::{EmbedFrame, extract_video_id, is_valid_youtube_url};

/// A video the user added to the gallery. Field names match the stored JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredVideo {
  #[serde(rename = "youtubeUrl")]
  pub url: String,
  pub title: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
}

const SAVE_FAILED: &str = "Could not save videos; changes will be lost when you leave.";

/// The YouTube gallery: an ordered list persisted as one JSON array.
#[derive(Debug, Default)]
pub struct VideoGallery {
  videos: Vec<StoredVideo>,
}

impl VideoGallery {
  /// Load the stored list. Missing or undecodable data both give an empty gallery.
  pub fn load(store: &dyn KeyValueStore) -> Self {
    let Some(raw) = load_key(store, keys::GALLERY_VIDEOS) else { return Self::default() };
    match serde_json::from_str::<Vec<StoredVideo>>(&raw) {
      Ok(videos) => {
        info!(count = videos.len(), "gallery: loaded stored videos");
        Self { videos }
      }
      Err(e) => {
        warn!(err = %e, "gallery: stored videos failed to parse, starting empty");
        Self::default()
      }
    }
  }

  pub fn entries(&self) -> &[StoredVideo] {
    &self.videos
  }

  pub fn len(&self) -> usize {
    self.videos.len()
  }

  pub fn is_empty(&self) -> bool {
    self.videos.is_empty()
  }

  /// Player frame for the entry at `index`, titled after the entry.
  /// `None` when out of range or when the stored URL no longer recognizes.
  pub fn embed(&self, index: usize) -> Option<EmbedFrame> {
    let video = self.videos.get(index)?;
    extract_video_id(&video.url).map(|id| EmbedFrame::new(&id).with_title(video.title.clone()))
  }

  /// Validate and append a video. Returns the new entry's index, or `None` when the
  /// input was rejected (nothing changes in that case).
  pub fn add(
    &mut self,
    store: &mut dyn KeyValueStore,
    notifier: &mut dyn Notifier,
    url: &str,
    title: &str,
  ) -> Option<usize> {
    if url.trim().is_empty() {
      notifier.error("Please enter a YouTube URL");
      return None;
    }
    if !is_valid_youtube_url(url) {
      notifier.error("Please enter a valid YouTube URL");
      return None;
    }

    let c = constants();
    let title =
      if title.trim().is_empty() { format!("{} {}", c.default_title_prefix, self.videos.len() + 1) } else { title.to_string() };
    self.videos.push(StoredVideo { url: url.to_string(), title, description: Some(c.default_description.clone()) });
    let index = self.videos.len() - 1;
    info!(index, url = %url, "gallery: video added");

    self.persist(store, notifier);
    notifier.success("YouTube video added successfully!");
    Some(index)
  }

  /// Remove the entry at `index`, returning it. Out-of-range indices are rejected.
  pub fn remove(
    &mut self,
    store: &mut dyn KeyValueStore,
    notifier: &mut dyn Notifier,
    index: usize,
  ) -> Option<StoredVideo> {
    if index >= self.videos.len() {
      notifier.error(&format!("No video at position {}", index + 1));
      return None;
    }
    let removed = self.videos.remove(index);
    info!(index, remaining = self.videos.len(), "gallery: video removed");

    self.persist(store, notifier);
    notifier.success("Video removed");
    Some(removed)
  }

  /// Write the whole list, or drop the key once the list is empty.
  fn persist(&self, store: &mut dyn KeyValueStore, notifier: &mut dyn Notifier) -> bool {
    report(self.write(store), notifier, keys::GALLERY_VIDEOS, SAVE_FAILED)
  }

  fn write(&self, store: &mut dyn KeyValueStore) -> StoreResult<()> {
    if self.videos.is_empty() {
      return store.remove(keys::GALLERY_VIDEOS);
    }
    let encoded = serde_json::to_string(&self.videos)?;
    store.set(keys::GALLERY_VIDEOS, &encoded)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::notify::{Level, RecordingNotifier};
  use crate::store::MemoryStore;

  const URL: &str = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";

  #[test]
  fn load_from_empty_store() {
    let store = MemoryStore::new();
    assert!(VideoGallery::load(&store).is_empty());
  }

  #[test]
  fn load_reads_browser_wire_format() {
    let mut store = MemoryStore::new();
    store
      .set(keys::GALLERY_VIDEOS, r#"[{"youtubeUrl":"https://youtu.be/dQw4w9WgXcQ","title":"Mine","description":"d"}]"#)
      .unwrap();
    let gallery = VideoGallery::load(&store);
    assert_eq!(gallery.len(), 1);
    assert_eq!(gallery.entries()[0].title, "Mine");
    assert_eq!(gallery.entries()[0].description.as_deref(), Some("d"));
  }

  #[test]
  fn load_tolerates_missing_description() {
    let mut store = MemoryStore::new();
    store.set(keys::GALLERY_VIDEOS, r#"[{"youtubeUrl":"u","title":"t"}]"#).unwrap();
    assert_eq!(VideoGallery::load(&store).entries()[0].description, None);
  }

  #[test]
  fn load_undecodable_data_is_empty() {
    let mut store = MemoryStore::new();
    store.set(keys::GALLERY_VIDEOS, "[{broken").unwrap();
    assert!(VideoGallery::load(&store).is_empty());
  }

  #[test]
  fn add_persists_with_defaults() {
    let mut store = MemoryStore::new();
    let mut n = RecordingNotifier::default();
    let mut gallery = VideoGallery::default();

    assert_eq!(gallery.add(&mut store, &mut n, URL, "  "), Some(0));
    assert_eq!(gallery.add(&mut store, &mut n, "https://youtu.be/dQw4w9WgXcQ", "Favourite"), Some(1));

    let first = &gallery.entries()[0];
    assert_eq!(first.title, "YouTube Video 1");
    assert_eq!(first.description.as_deref(), Some("Click to edit description."));
    assert_eq!(gallery.entries()[1].title, "Favourite");
    assert_eq!(n.last().map(|n| n.message.as_str()), Some("YouTube video added successfully!"));

    let reloaded = VideoGallery::load(&store);
    assert_eq!(reloaded.entries(), gallery.entries());
  }

  #[test]
  fn add_rejects_blank_and_invalid_urls() {
    let mut store = MemoryStore::new();
    let mut n = RecordingNotifier::default();
    let mut gallery = VideoGallery::default();

    assert_eq!(gallery.add(&mut store, &mut n, "   ", "t"), None);
    assert_eq!(n.last().map(|n| n.message.as_str()), Some("Please enter a YouTube URL"));
    assert_eq!(gallery.add(&mut store, &mut n, "not a url", "t"), None);
    assert_eq!(n.last().map(|n| n.message.as_str()), Some("Please enter a valid YouTube URL"));

    assert!(gallery.is_empty());
    assert!(store.is_empty());
    assert_eq!(n.count(Level::Error), 2);
  }

  #[test]
  fn removing_last_entry_drops_the_key() {
    let mut store = MemoryStore::new();
    let mut n = RecordingNotifier::default();
    let mut gallery = VideoGallery::default();

    gallery.add(&mut store, &mut n, URL, "");
    assert!(store.contains(keys::GALLERY_VIDEOS));
    let removed = gallery.remove(&mut store, &mut n, 0).unwrap();
    assert_eq!(removed.url, URL);
    assert!(!store.contains(keys::GALLERY_VIDEOS));
    assert_eq!(n.last().map(|n| n.message.as_str()), Some("Video removed"));
  }

  #[test]
  fn remove_keeps_order_of_the_rest() {
    let mut store = MemoryStore::new();
    let mut n = RecordingNotifier::default();
    let mut gallery = VideoGallery::default();
    for title in ["a", "b", "c"] {
      gallery.add(&mut store, &mut n, URL, title);
    }
    gallery.remove(&mut store, &mut n, 1);
    let gallery = VideoGallery::load(&store);
    let titles: Vec<&str> = gallery.entries().iter().map(|v| v.title.as_str()).collect();
    assert_eq!(titles, vec!["a", "c"]);
  }

  #[test]
  fn remove_out_of_range_is_rejected() {
    let mut store = MemoryStore::new();
    let mut n = RecordingNotifier::default();
    let mut gallery = VideoGallery::default();
    gallery.add(&mut store, &mut n, URL, "");
    assert_eq!(gallery.remove(&mut store, &mut n, 5), None);
    assert_eq!(gallery.len(), 1);
    assert_eq!(n.last().map(|n| n.level), Some(Level::Error));
  }

  #[test]
  fn failed_write_keeps_entries_usable() {
    let mut store = MemoryStore::with_quota(0);
    let mut n = RecordingNotifier::default();
    let mut gallery = VideoGallery::default();

    assert_eq!(gallery.add(&mut store, &mut n, URL, "Kept"), Some(0));
    assert_eq!(gallery.len(), 1);
    assert_eq!(gallery.entries()[0].title, "Kept");
    assert!(gallery.embed(0).is_some());
    assert_eq!(n.count(Level::Warning), 1);
    assert!(!store.contains(keys::GALLERY_VIDEOS));
  }

  #[test]
  fn embed_uses_entry_title() {
    let mut store = MemoryStore::new();
    let mut n = RecordingNotifier::default();
    let mut gallery = VideoGallery::default();
    gallery.add(&mut store, &mut n, URL, "Launch talk");
    let frame = gallery.embed(0).unwrap();
    assert_eq!(frame.src, "https://www.youtube.com/embed/dQw4w9WgXcQ");
    assert_eq!(frame.title, "Launch talk");
    assert!(gallery.embed(1).is_none());
  }
}
