pub mod alignment;
pub mod cli;
pub mod grade;
pub mod phrases;
pub mod recognizer;
pub mod session;
pub mod state;

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::audio::playback::Tone;

pub use alignment::{AlignedRows, DisplayUnit, ScoreBand};
pub use grade::{grade_scores, mean_score, LetterGrade};
pub use phrases::{PhraseBank, PhraseSample};
pub use recognizer::{MockRecognizer, Recognizer};
pub use session::{SessionController, SessionHandle, SessionRuntime};
pub use state::{SessionEvent, SessionState};

/// Default wait between "start listening" and the mocked result.
pub const DEFAULT_LISTEN_DELAY: Duration = Duration::from_millis(1500);
const MAX_LISTEN_DELAY: Duration = Duration::from_secs(60);
const MAX_CAPTURE_SECONDS: u32 = 300;

/// Convenient alias for results returned by grading modules.
pub type Result<T> = std::result::Result<T, GradingError>;

/// Message-carrying error shared by the session runtime and its collaborators.
#[derive(Debug, Clone)]
pub struct GradingError {
    message: Arc<str>,
}

impl GradingError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Arc::from(message.into()),
        }
    }
}

impl Display for GradingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for GradingError {}

/// Mono audio captured while the session was listening.
#[derive(Debug, Clone, Default)]
pub struct RecordedClip {
    pub samples: Arc<[f32]>,
    pub sample_rate: u32,
    pub duration: Duration,
}

impl RecordedClip {
    pub fn from_samples(samples: Vec<f32>, sample_rate: u32) -> Self {
        let duration = if sample_rate == 0 {
            Duration::ZERO
        } else {
            Duration::from_secs_f64(samples.len() as f64 / sample_rate as f64)
        };
        Self {
            samples: Arc::from(samples),
            sample_rate,
            duration,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Microphone settings for the optional live capture collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureSettings {
    pub enabled: bool,
    pub device_name: Option<String>,
    pub max_seconds: u32,
}

impl CaptureSettings {
    pub fn new(enabled: bool, device_name: Option<String>, max_seconds: u32) -> Self {
        Self {
            enabled,
            device_name,
            max_seconds,
        }
    }

    pub fn disabled() -> Self {
        Self::new(false, None, 30)
    }
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self::disabled()
    }
}

/// Session configuration shared across CLI, runtime, and UI.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub listen_delay: Duration,
    pub seed: Option<u64>,
    pub phrases: PhraseBank,
    pub tone: Tone,
    pub capture: CaptureSettings,
    pub save_recording: Option<PathBuf>,
    /// Font with CJK coverage for the window; system fonts are searched when unset.
    pub font: Option<PathBuf>,
    pub ui_enabled: bool,
}

impl SessionConfig {
    pub fn new(phrases: PhraseBank) -> Self {
        Self {
            phrases,
            ..Self::default()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.listen_delay = delay;
        self
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_tone(mut self, tone: Tone) -> Self {
        self.tone = tone;
        self
    }

    pub fn with_capture(mut self, capture: CaptureSettings) -> Self {
        self.capture = capture;
        self
    }

    pub fn with_recording_path(mut self, path: Option<PathBuf>) -> Self {
        self.save_recording = path;
        self
    }

    pub fn with_font(mut self, font: Option<PathBuf>) -> Self {
        self.font = font;
        self
    }

    pub fn with_ui(mut self, enabled: bool) -> Self {
        self.ui_enabled = enabled;
        self
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            listen_delay: DEFAULT_LISTEN_DELAY,
            seed: None,
            phrases: PhraseBank::builtin(),
            tone: Tone::default(),
            capture: CaptureSettings::default(),
            save_recording: None,
            font: None,
            ui_enabled: true,
        }
    }
}

pub(crate) fn validate_config(config: &SessionConfig) -> Result<()> {
    if config.listen_delay > MAX_LISTEN_DELAY {
        return Err(GradingError::new(format!(
            "listen delay {} ms exceeds the {} s limit",
            config.listen_delay.as_millis(),
            MAX_LISTEN_DELAY.as_secs()
        )));
    }
    if !(config.tone.frequency_hz > 0.0) {
        return Err(GradingError::new("feedback tone frequency must be positive"));
    }
    if config.tone.duration.is_zero() {
        return Err(GradingError::new("feedback tone duration must be positive"));
    }
    if config.capture.enabled
        && !(1..=MAX_CAPTURE_SECONDS).contains(&config.capture.max_seconds)
    {
        return Err(GradingError::new(format!(
            "capture length must be between 1 and {} seconds",
            MAX_CAPTURE_SECONDS
        )));
    }
    Ok(())
}

/// Validates the configuration and spawns the session worker.
pub fn run_session(config: SessionConfig) -> Result<SessionRuntime> {
    validate_config(&config)?;
    SessionRuntime::new(config)
}
