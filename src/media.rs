use anyhow::{Context, Result};
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

use crate::constants::constants;

/// A file the user picked: its name, declared MIME type and contents.
#[derive(Debug, Clone)]
pub struct MediaFile {
  pub name: String,
  pub mime: String,
  pub bytes: Vec<u8>,
}

/// Extension → MIME type for the media kinds the portfolio deals with.
const MIME_BY_EXTENSION: &[(&str, &str)] = &[
  ("png", "image/png"),
  ("jpg", "image/jpeg"),
  ("jpeg", "image/jpeg"),
  ("gif", "image/gif"),
  ("webp", "image/webp"),
  ("svg", "image/svg+xml"),
  ("bmp", "image/bmp"),
  ("avif", "image/avif"),
  ("mp4", "video/mp4"),
  ("m4v", "video/x-m4v"),
  ("webm", "video/webm"),
  ("mov", "video/quicktime"),
  ("mkv", "video/x-matroska"),
  ("avi", "video/x-msvideo"),
  ("ogv", "video/ogg"),
  ("txt", "text/plain"),
  ("pdf", "application/pdf"),
];

const UNKNOWN_MIME: &str = "application/octet-stream";

pub fn mime_for_path(path: &Path) -> &'static str {
  let Some(ext) = path.extension().and_then(|e| e.to_str()) else { return UNKNOWN_MIME };
  let ext = ext.to_ascii_lowercase();
  MIME_BY_EXTENSION.iter().find(|(e, _)| *e == ext).map_or(UNKNOWN_MIME, |(_, mime)| *mime)
}

impl MediaFile {
  pub fn new(name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
    Self { name: name.into(), mime: mime.into(), bytes }
  }

  /// Read a file from disk, inferring its MIME type from the extension.
  pub fn read(path: &Path) -> Result<Self> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let name = path.file_name().map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
    Ok(Self::new(name, mime_for_path(path), bytes))
  }

  /// Loose check: the type only has to mention `video` somewhere.
  pub fn is_video(&self) -> bool {
    self.mime.contains("video")
  }

  /// Loose check: the type only has to mention `image` somewhere.
  pub fn is_image(&self) -> bool {
    self.mime.contains("image")
  }

  pub fn to_data_url(&self) -> String {
    format!("data:{};base64,{}", self.mime, BASE64.encode(&self.bytes))
  }
}

/// Session-local `blob:` URLs for uploaded files.
///
/// Each URL keeps its file's bytes alive until revoked; URLs from an earlier
/// session are unknown here and resolve to nothing.
#[derive(Debug, Default)]
pub struct ObjectUrlRegistry {
  next: u64,
  live: HashMap<String, MediaFile>,
}

impl ObjectUrlRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn create(&mut self, file: &MediaFile) -> String {
    self.next += 1;
    let url = format!("{}{}", constants().object_url_prefix, self.next);
    debug!(url = %url, name = %file.name, bytes = file.bytes.len(), "media: object URL created");
    self.live.insert(url.clone(), file.clone());
    url
  }

  pub fn resolve(&self, url: &str) -> Option<&MediaFile> {
    self.live.get(url)
  }

  /// Release `url`. Returns whether it was live in this session.
  pub fn revoke(&mut self, url: &str) -> bool {
    let released = self.live.remove(url).is_some();
    debug!(url = %url, released, "media: object URL revoked");
    released
  }

  pub fn live_count(&self) -> usize {
    self.live.len()
  }

  /// Bytes currently pinned by live URLs.
  pub fn live_bytes(&self) -> usize {
    self.live.values().map(|f| f.bytes.len()).sum()
  }
}
