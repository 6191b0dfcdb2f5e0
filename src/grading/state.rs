use serde::{Deserialize, Serialize};

use super::alignment::{align, AlignedRows};
use super::grade::LetterGrade;
use super::phrases::PhraseSample;

/// Everything the widget displays. Only changes through [`SessionState::reduce`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub listening: bool,
    /// Identifies the most recent listening request.
    pub generation: u64,
    pub spoken_text: String,
    pub pinyin: String,
    pub word_scores: Vec<f32>,
    pub grade: Option<LetterGrade>,
    pub has_recording: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    ListeningStarted,
    ListeningStopped,
    RecognitionCompleted {
        generation: u64,
        sample: PhraseSample,
    },
    RecordingFinalized {
        available: bool,
    },
    Failed(String),
    Reset,
}

impl SessionState {
    pub fn reduce(mut self, event: SessionEvent) -> Self {
        match event {
            SessionEvent::ListeningStarted => {
                if !self.listening {
                    self.listening = true;
                    self.generation += 1;
                    self.error = None;
                }
            }
            SessionEvent::ListeningStopped => {
                self.listening = false;
            }
            SessionEvent::RecognitionCompleted { generation, sample } => {
                // stale or cancelled requests never overwrite the display
                if self.listening && generation == self.generation {
                    self.grade = sample.grade();
                    self.spoken_text = sample.text;
                    self.pinyin = sample.pinyin;
                    self.word_scores = sample.scores;
                    self.listening = false;
                }
            }
            SessionEvent::RecordingFinalized { available } => {
                self.has_recording = available;
            }
            SessionEvent::Failed(message) => {
                self.error = Some(message);
            }
            SessionEvent::Reset => {
                self = Self {
                    generation: self.generation,
                    ..Self::default()
                };
            }
        }
        self
    }

    pub fn apply(&mut self, event: SessionEvent) {
        *self = std::mem::take(self).reduce(event);
    }

    pub fn has_result(&self) -> bool {
        !self.spoken_text.is_empty()
    }

    pub fn rows(&self) -> AlignedRows {
        align(&self.spoken_text, &self.pinyin, &self.word_scores)
    }
}
