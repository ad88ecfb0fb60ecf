//! Application constants loaded from `constants.ron` at compile time.
//!
//! The RON file is embedded via `include_str!`, so there is no runtime file I/O.
//! Parsed once on first access via `LazyLock`.

use serde::Deserialize;
use std::sync::LazyLock;

/// One prompt on the profiling sheet.
#[derive(Debug, Clone, Deserialize)]
pub struct QuestionSpec {
  pub id: u32,
  pub text: String,
  /// Whether the prompt asks for a video response alongside the text answer.
  #[serde(default = "video_required_default")]
  pub video_required: bool,
}

fn video_required_default() -> bool {
  true
}

/// All tuneable application constants.
#[derive(Debug, Deserialize)]
pub struct Constants {
  // YouTube surfaces
  pub embed_base: String,
  pub watch_base: String,
  pub thumbnail_base: String,
  pub thumbnail_variants: Vec<String>,
  pub player_title: String,
  pub player_allow: String,

  // Video gallery
  pub default_title_prefix: String,
  pub default_description: String,

  // Local storage
  pub default_quota_bytes: usize,
  pub object_url_prefix: String,

  // Profiling sheet
  pub questions: Vec<QuestionSpec>,
}

static CONSTANTS: LazyLock<Constants> = LazyLock::new(|| {
  // Safety: the RON file is embedded at compile time; if it's malformed every test below fails.
  ron::from_str(include_str!("../constants.ron")).expect("constants.ron must be valid RON (embedded at compile time)")
});

/// Returns a reference to the parsed application constants.
pub fn constants() -> &'static Constants {
  &CONSTANTS
}
