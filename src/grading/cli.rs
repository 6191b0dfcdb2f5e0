use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::ConfigOverrides;

#[derive(Parser, Debug)]
#[command(
    name = "tonegrader",
    version,
    about = "Chinese pronunciation practice widget with mocked grading"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Launch the interactive pronunciation window.
    Session(SessionArgs),
    /// Run one listening cycle without UI and print the result as JSON.
    Simulate(SimulateArgs),
    /// Print the phrase bank with each phrase's mean score and grade.
    Phrases(PhraseArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct PipelineArgs {
    /// Optional JSON configuration file.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
    /// Simulated listening delay in milliseconds.
    #[arg(long = "delay-ms", value_name = "MS")]
    pub delay_ms: Option<u64>,
    /// Seed for phrase selection; random when omitted.
    #[arg(long)]
    pub seed: Option<u64>,
    /// JSON phrase bank replacing the built-in phrases.
    #[arg(long, value_name = "PATH")]
    pub phrases: Option<PathBuf>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct CaptureArgs {
    /// Record from the microphone while listening.
    #[arg(long)]
    pub capture: bool,
    /// Optional input device name.
    #[arg(long, requires = "capture")]
    pub device: Option<String>,
    /// Write the last recording to this WAV file.
    #[arg(long = "save-recording", value_name = "PATH", requires = "capture")]
    pub save_recording: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct SessionArgs {
    #[command(flatten)]
    pub pipeline: PipelineArgs,
    #[command(flatten)]
    pub capture: CaptureArgs,
    /// Font file with Chinese glyphs (TTF/OTF/TTC).
    #[arg(long, value_name = "PATH")]
    pub font: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct SimulateArgs {
    #[command(flatten)]
    pub pipeline: PipelineArgs,
}

#[derive(Args, Debug, Clone)]
pub struct PhraseArgs {
    /// Optional JSON configuration file.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
    /// JSON phrase bank replacing the built-in phrases.
    #[arg(long, value_name = "PATH")]
    pub phrases: Option<PathBuf>,
}

impl PipelineArgs {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            listen_delay_ms: self.delay_ms,
            seed: self.seed,
            phrases: self.phrases.clone(),
            ..ConfigOverrides::default()
        }
    }
}

impl SessionArgs {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            capture: self.capture.capture.then_some(true),
            device: self.capture.device.clone(),
            save_recording: self.capture.save_recording.clone(),
            font: self.font.clone(),
            ..self.pipeline.overrides()
        }
    }
}

impl SimulateArgs {
    /// Headless runs never touch the microphone.
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            capture: Some(false),
            ..self.pipeline.overrides()
        }
    }
}

impl PhraseArgs {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            phrases: self.phrases.clone(),
            ..ConfigOverrides::default()
        }
    }
}
