//! Local state behind the portfolio site: YouTube URL recognition and the
//! key/value persistence each section reads and writes.

pub mod config;
pub mod constants;
pub mod keys;
pub mod logging;
pub mod media;
pub mod notify;
pub mod sections;
pub mod store;
pub mod youtube;

pub use store::{FileStore, KeyValueStore, MemoryStore, StoreError};
pub use youtube::{EmbedFrame, VideoId, embed_url, extract_video_id, is_valid_youtube_url};
