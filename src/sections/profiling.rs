use tracing::{debug, info};

use super::{load_key, write_through};
use crate::constants::{QuestionSpec, constants};
use crate::keys;
use crate::media::{MediaFile, ObjectUrlRegistry};
use crate::notify::Notifier;
use crate::store::KeyValueStore;

const SAVE_FAILED: &str = "Could not save your response; it will be lost when you leave.";

/// One prompt with whatever the user has entered so far.
#[derive(Debug, Clone)]
pub struct Question {
  pub spec: QuestionSpec,
  pub answer: String,
  /// Object URL of the uploaded video response, if any.
  pub video: Option<String>,
}

impl Question {
  pub fn id(&self) -> u32 {
    self.spec.id
  }

  pub fn is_answered(&self) -> bool {
    !self.answer.trim().is_empty()
  }
}

/// The profiling sheet: every question's answer and video reference, each in its own key.
#[derive(Debug)]
pub struct ProfilingSheet {
  questions: Vec<Question>,
}

impl ProfilingSheet {
  pub fn load(store: &dyn KeyValueStore) -> Self {
    Self::load_questions(store, &constants().questions)
  }

  pub fn load_questions(store: &dyn KeyValueStore, specs: &[QuestionSpec]) -> Self {
    let questions: Vec<Question> = specs
      .iter()
      .map(|spec| Question {
        spec: spec.clone(),
        answer: load_key(store, &keys::answer(spec.id)).unwrap_or_default(),
        video: load_key(store, &keys::answer_video(spec.id)),
      })
      .collect();
    debug!(questions = questions.len(), "profiling: sheet loaded");
    Self { questions }
  }

  pub fn questions(&self) -> &[Question] {
    &self.questions
  }

  pub fn question(&self, id: u32) -> Option<&Question> {
    self.questions.iter().find(|q| q.id() == id)
  }

  pub fn answered_count(&self) -> usize {
    self.questions.iter().filter(|q| q.is_answered()).count()
  }

  fn question_mut(&mut self, notifier: &mut dyn Notifier, id: u32) -> Option<&mut Question> {
    let found = self.questions.iter_mut().find(|q| q.spec.id == id);
    if found.is_none() {
      notifier.error(&format!("There is no question {}", id));
    }
    found
  }

  /// Replace the answer text and write it straight through.
  /// Returns `false` only when `id` is not a question on the sheet.
  pub fn set_answer(&mut self, store: &mut dyn KeyValueStore, notifier: &mut dyn Notifier, id: u32, text: &str) -> bool {
    let Some(question) = self.question_mut(notifier, id) else { return false };
    question.answer = text.to_string();
    write_through(store, notifier, &keys::answer(id), Some(text), SAVE_FAILED);
    true
  }

  /// Attach an uploaded video to a question, releasing the one it replaces.
  /// Returns the new object URL.
  pub fn attach_video(
    &mut self,
    store: &mut dyn KeyValueStore,
    notifier: &mut dyn Notifier,
    registry: &mut ObjectUrlRegistry,
    id: u32,
    file: &MediaFile,
  ) -> Option<String> {
    let question = self.question_mut(notifier, id)?;
    if !question.spec.video_required {
      notifier.error(&format!("Question {} does not take a video response", id));
      return None;
    }
    if !file.is_video() {
      notifier.error("Please select a video file");
      return None;
    }

    let url = registry.create(file);
    if let Some(previous) = question.video.replace(url.clone()) {
      registry.revoke(&previous);
    }
    info!(question = id, name = %file.name, "profiling: video attached");
    write_through(store, notifier, &keys::answer_video(id), Some(&url), SAVE_FAILED);
    notifier.success("Video uploaded successfully!");
    Some(url)
  }

  /// Drop a question's video and release its object URL.
  pub fn remove_video(
    &mut self,
    store: &mut dyn KeyValueStore,
    notifier: &mut dyn Notifier,
    registry: &mut ObjectUrlRegistry,
    id: u32,
  ) -> bool {
    let Some(question) = self.question_mut(notifier, id) else { return false };
    let Some(url) = question.video.take() else {
      notifier.info(&format!("Question {} has no video", id));
      return false;
    };
    registry.revoke(&url);
    info!(question = id, "profiling: video removed");
    write_through(store, notifier, &keys::answer_video(id), None, SAVE_FAILED);
    true
  }

  /// Every edit is already written through; this only confirms it to the user.
  pub fn save_all(&self, notifier: &mut dyn Notifier) {
    info!(answered = self.answered_count(), total = self.questions.len(), "profiling: save requested");
    notifier.success("Profile sheet responses saved!");
  }
}
