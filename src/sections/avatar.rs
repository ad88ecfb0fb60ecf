use tracing::info;

use super::{load_key, write_through};
use crate::keys;
use crate::media::MediaFile;
use crate::notify::Notifier;
use crate::store::KeyValueStore;

const SAVE_FAILED: &str = "Could not save your profile picture; it will reset when you leave.";

/// The circular profile picture: a data URL when set, initials otherwise.
#[derive(Debug)]
pub struct ProfileImage {
  initials: String,
  image: Option<String>,
}

impl ProfileImage {
  pub fn load(store: &dyn KeyValueStore, initials: impl Into<String>) -> Self {
    Self { initials: initials.into(), image: load_key(store, keys::PROFILE_IMAGE) }
  }

  pub fn data_url(&self) -> Option<&str> {
    self.image.as_deref()
  }

  pub fn initials(&self) -> &str {
    &self.initials
  }

  /// What the avatar shows: the picture if there is one, the initials otherwise.
  pub fn display(&self) -> &str {
    self.image.as_deref().unwrap_or(&self.initials)
  }

  pub fn set_image(&mut self, store: &mut dyn KeyValueStore, notifier: &mut dyn Notifier, file: &MediaFile) -> bool {
    if !file.is_image() {
      notifier.error("Please select an image file");
      return false;
    }
    let data_url = file.to_data_url();
    info!(name = %file.name, encoded = data_url.len(), "avatar: image set");
    write_through(store, notifier, keys::PROFILE_IMAGE, Some(&data_url), SAVE_FAILED);
    self.image = Some(data_url);
    notifier.success("Profile picture updated!");
    true
  }

  pub fn clear(&mut self, store: &mut dyn KeyValueStore, notifier: &mut dyn Notifier) {
    if self.image.take().is_some() {
      write_through(store, notifier, keys::PROFILE_IMAGE, None, SAVE_FAILED);
      notifier.success("Profile picture removed");
    }
  }
}
