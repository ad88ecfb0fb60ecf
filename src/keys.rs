//! Every storage key the sections use, in one place.
//!
//! | Key                 | Owner           | Value                              |
//! |---------------------|-----------------|------------------------------------|
//! | `q{n}_answer`       | profiling sheet | answer text for question `n`       |
//! | `q{n}_video`        | profiling sheet | object URL of the uploaded video   |
//! | `profileImage`      | avatar          | `data:<mime>;base64,...` image     |
//! | `introVideo`        | intro video     | YouTube URL                        |
//! | `userYoutubeVideos` | video gallery   | JSON array of stored video entries |
//!
//! Names are kept identical to what the browser build wrote, so an exported
//! localStorage dump loads as-is.

pub const PROFILE_IMAGE: &str = "profileImage";
pub const INTRO_VIDEO: &str = "introVideo";
pub const GALLERY_VIDEOS: &str = "userYoutubeVideos";

pub fn answer(question: u32) -> String {
  format!("q{}_answer", question)
}

pub fn answer_video(question: u32) -> String {
  format!("q{}_video", question)
}
