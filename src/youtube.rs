use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

use crate::constants::constants;

/// Every supported URL shape in one pattern: short links, `watch?v=` / `&v=` query ids,
/// legacy `/v/`, user-content `/u/<c>/` and `embed/`. The leading prefix is greedy, so
/// when a string carries several markers the last one wins. The capture runs up to the
/// next `#`, `&` or `?`.
///
/// The prefix and the wildcard in `youtu.be` stop at any line terminator (`\n`, `\r`,
/// U+2028, U+2029): a marker on a later line of a pasted block does not count.
static VIDEO_URL: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^[^\n\r\x{2028}\x{2029}]*(youtu[^\n\r\x{2028}\x{2029}]be/|v/|u/[A-Za-z0-9_]/|embed/|watch\?v=|&v=)([^#&?]*)")
    .expect("video URL pattern is a valid regex literal")
});

/// Length every YouTube video id has, in UTF-16 code units (what a browser's
/// `String.length` reports).
pub const VIDEO_ID_LEN: usize = 11;

/// An 11-character token extracted from a recognized YouTube URL.
///
/// Only [`extract_video_id`] constructs one, so holding a `VideoId` means the
/// length check already passed. The character set is deliberately left open:
/// anything the pattern captures counts, including spaces from a sloppy paste.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VideoId(String);

impl VideoId {
  pub fn as_str(&self) -> &str {
    &self.0
  }

  pub fn embed_url(&self) -> String {
    embed_url(&self.0)
  }

  pub fn watch_url(&self) -> String {
    watch_url(&self.0)
  }
}

impl fmt::Display for VideoId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl AsRef<str> for VideoId {
  fn as_ref(&self) -> &str {
    &self.0
  }
}

/// Extract the video id from a pasted YouTube URL.
/// Returns `None` when no marker is found or the captured segment is not exactly 11 UTF-16 units long.
pub fn extract_video_id(input: &str) -> Option<VideoId> {
  if input.is_empty() {
    return None;
  }
  let caps = VIDEO_URL.captures(input)?;
  let id = caps.get(2)?.as_str();
  (id.encode_utf16().count() == VIDEO_ID_LEN).then(|| VideoId(id.to_string()))
}

pub fn is_valid_youtube_url(input: &str) -> bool {
  extract_video_id(input).is_some()
}

/// `https://www.youtube.com/embed/{id}`, with `id` inserted verbatim.
pub fn embed_url(id: &str) -> String {
  format!("{}{}", constants().embed_base, id)
}

pub fn watch_url(id: &str) -> String {
  format!("{}{}", constants().watch_base, id)
}

/// Still-image URLs for a video, best quality first.
pub fn thumbnail_urls(id: &str) -> Vec<String> {
  let c = constants();
  c.thumbnail_variants.iter().map(|variant| format!("{}{}/{}", c.thumbnail_base, id, variant)).collect()
}

/// Attributes of the embeddable player frame for one video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedFrame {
  pub src: String,
  pub title: String,
  pub allow: String,
  pub allow_fullscreen: bool,
}

impl EmbedFrame {
  pub fn new(id: &VideoId) -> Self {
    let c = constants();
    Self { src: id.embed_url(), title: c.player_title.clone(), allow: c.player_allow.clone(), allow_fullscreen: true }
  }

  /// Build the frame for a pasted URL, or `None` if it does not name a video.
  pub fn from_url(url: &str) -> Option<Self> {
    extract_video_id(url).map(|id| Self::new(&id))
  }

  pub fn with_title(mut self, title: impl Into<String>) -> Self {
    self.title = title.into();
    self
  }

  pub fn to_html(&self) -> String {
    let mut html = format!(
      r#"<iframe src="{}" title="{}" allow="{}""#,
      escape_attr(&self.src),
      escape_attr(&self.title),
      escape_attr(&self.allow)
    );
    if self.allow_fullscreen {
      html.push_str(" allowfullscreen");
    }
    html.push_str("></iframe>");
    html
  }
}

/// Markup shown in place of the player when a stored URL no longer recognizes.
pub const INVALID_EMBED_HTML: &str = r#"<div class="invalid-embed">Invalid YouTube URL</div>"#;

/// Render the player for `url`, falling back to the invalid-URL placeholder.
pub fn render_embed(url: &str) -> String {
  EmbedFrame::from_url(url).map_or_else(|| INVALID_EMBED_HTML.to_string(), |frame| frame.to_html())
}

fn escape_attr(raw: &str) -> String {
  let mut out = String::with_capacity(raw.len());
  for c in raw.chars() {
    match c {
      '&' => out.push_str("&amp;"),
      '"' => out.push_str("&quot;"),
      '\'' => out.push_str("&#39;"),
      '<' => out.push_str("&lt;"),
      '>' => out.push_str("&gt;"),
      _ => out.push(c),
    }
  }
  out
}

#[cfg(test)]
mod tests {
  use super::*;

  fn id(input: &str) -> Option<String> {
    extract_video_id(input).map(|v| v.as_str().to_string())
  }

  // --- extract_video_id ---

  #[test]
  fn watch_url_extracts_id() {
    assert_eq!(id("https://www.youtube.com/watch?v=dQw4w9WgXcQ").as_deref(), Some("dQw4w9WgXcQ"));
  }

  #[test]
  fn short_link_extracts_id() {
    assert_eq!(id("https://youtu.be/dQw4w9WgXcQ").as_deref(), Some("dQw4w9WgXcQ"));
  }

  #[test]
  fn capture_stops_at_ampersand() {
    assert_eq!(id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&list=PL123").as_deref(), Some("dQw4w9WgXcQ"));
  }

  #[test]
  fn v_after_other_query_params() {
    assert_eq!(id("https://www.youtube.com/watch?feature=share&v=dQw4w9WgXcQ").as_deref(), Some("dQw4w9WgXcQ"));
  }

  #[test]
  fn embed_legacy_and_user_shapes() {
    assert_eq!(id("https://www.youtube.com/embed/dQw4w9WgXcQ").as_deref(), Some("dQw4w9WgXcQ"));
    assert_eq!(id("https://www.youtube.com/v/dQw4w9WgXcQ?version=3").as_deref(), Some("dQw4w9WgXcQ"));
    assert_eq!(id("https://www.youtube.com/u/1/dQw4w9WgXcQ").as_deref(), Some("dQw4w9WgXcQ"));
  }

  #[test]
  fn capture_stops_at_hash_and_question_mark() {
    assert_eq!(id("https://youtu.be/dQw4w9WgXcQ?t=42").as_deref(), Some("dQw4w9WgXcQ"));
    assert_eq!(id("https://www.youtube.com/embed/dQw4w9WgXcQ#start").as_deref(), Some("dQw4w9WgXcQ"));
  }

  #[test]
  fn wrong_length_is_rejected() {
    assert_eq!(id("https://youtu.be/dQw4w9WgXc"), None);
    assert_eq!(id("https://youtu.be/dQw4w9WgXcQQ"), None);
    assert_eq!(id("https://www.youtube.com/watch?v="), None);
  }

  #[test]
  fn no_marker_is_rejected() {
    assert_eq!(id("not a url"), None);
    assert_eq!(id(""), None);
    assert_eq!(id("https://vimeo.com/123456789"), None);
  }

  #[test]
  fn last_marker_wins() {
    // Greedy prefix: the trailing `v/` is the marker, and its capture is too short.
    assert_eq!(id("https://youtu.be/dQw4w9WgXcQ/v/abc"), None);
    assert_eq!(id("https://example.com/v/xx?next=https://youtu.be/dQw4w9WgXcQ").as_deref(), Some("dQw4w9WgXcQ"));
  }

  #[test]
  fn permissive_character_set() {
    assert_eq!(id("youtu.be/hello world").as_deref(), Some("hello world"));
    // The dot in `youtu.be` is a wildcard.
    assert_eq!(id("youtuXbe/dQw4w9WgXcQ").as_deref(), Some("dQw4w9WgXcQ"));
  }

  #[test]
  fn length_counts_utf16_units() {
    assert_eq!(id("https://youtu.be/ééééééééééé").as_deref(), Some("ééééééééééé"));
    // Astral-plane characters take two units each.
    assert_eq!(id("https://youtu.be/😀😀😀😀😀a").as_deref(), Some("😀😀😀😀😀a"));
    assert_eq!(id("https://youtu.be/😀😀😀😀😀😀😀😀😀😀😀"), None);
  }

  #[test]
  fn prefix_does_not_cross_line_terminators() {
    assert_eq!(id("note\rhttps://youtu.be/dQw4w9WgXcQ"), None);
    assert_eq!(id("note\nhttps://youtu.be/dQw4w9WgXcQ"), None);
    assert_eq!(id("note\u{2028}https://youtu.be/dQw4w9WgXcQ"), None);
    assert_eq!(id("note\u{2029}https://youtu.be/dQw4w9WgXcQ"), None);
    assert_eq!(id("youtu\rbe/dQw4w9WgXcQ"), None);
    // The capture itself only stops at `#`, `&` or `?`, so a trailing line makes it too long.
    assert_eq!(id("https://youtu.be/dQw4w9WgXcQ\nthanks"), None);
  }

  #[test]
  fn is_valid_matches_extract() {
    for s in ["https://youtu.be/dQw4w9WgXcQ", "not a url", "https://youtu.be/short", "embed/ABCDEFGHIJK"] {
      assert_eq!(is_valid_youtube_url(s), extract_video_id(s).is_some(), "{s}");
    }
  }

  #[test]
  fn extraction_is_idempotent() {
    let url = "https://www.youtube.com/watch?v=dQw4w9WgXcQ&list=PL123";
    assert_eq!(extract_video_id(url), extract_video_id(url));
  }

  // --- URL builders ---

  #[test]
  fn embed_url_is_plain_concatenation() {
    assert_eq!(embed_url("dQw4w9WgXcQ"), "https://www.youtube.com/embed/dQw4w9WgXcQ");
    assert_eq!(embed_url("a b&c"), "https://www.youtube.com/embed/a b&c");
    assert_eq!(embed_url(""), "https://www.youtube.com/embed/");
  }

  #[test]
  fn watch_and_thumbnail_urls() {
    assert_eq!(watch_url("dQw4w9WgXcQ"), "https://www.youtube.com/watch?v=dQw4w9WgXcQ");
    let thumbs = thumbnail_urls("dQw4w9WgXcQ");
    assert_eq!(thumbs[0], "https://img.youtube.com/vi/dQw4w9WgXcQ/maxresdefault.jpg");
    assert_eq!(thumbs.last().map(String::as_str), Some("https://img.youtube.com/vi/dQw4w9WgXcQ/0.jpg"));
  }

  // --- EmbedFrame ---

  #[test]
  fn embed_frame_html() {
    let frame = EmbedFrame::from_url("https://youtu.be/dQw4w9WgXcQ").unwrap();
    let html = frame.to_html();
    assert!(html.starts_with(r#"<iframe src="https://www.youtube.com/embed/dQw4w9WgXcQ""#));
    assert!(html.contains(r#"title="YouTube video player""#));
    assert!(html.contains("allowfullscreen"));
  }

  #[test]
  fn embed_frame_escapes_attributes() {
    let frame = EmbedFrame::from_url("https://youtu.be/dQw4w9WgXcQ").unwrap().with_title(r#"Say "hi" <now>"#);
    assert!(frame.to_html().contains(r#"title="Say &quot;hi&quot; &lt;now&gt;""#));
  }

  #[test]
  fn render_embed_falls_back_for_invalid_url() {
    assert_eq!(render_embed("not a url"), INVALID_EMBED_HTML);
    assert!(render_embed("https://youtu.be/dQw4w9WgXcQ").starts_with("<iframe"));
  }
}
