use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::Serialize;
use tonegrader::config::AppConfig;
use tonegrader::grading::cli::{Cli, Command, PhraseArgs, SessionArgs, SimulateArgs};
use tonegrader::grading::{
    run_session, AlignedRows, LetterGrade, PhraseBank, SessionState,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Extra time allowed beyond the listen delay for a headless result.
const SIMULATE_GRACE: Duration = Duration::from_secs(5);

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Command::Session(args) => handle_session(&args),
        Command::Simulate(args) => handle_simulate(&args),
        Command::Phrases(args) => handle_phrases(&args),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn handle_session(args: &SessionArgs) -> Result<()> {
    let config = AppConfig::resolve(args.pipeline.config.as_deref(), &args.overrides())
        .context("failed to resolve configuration")?;
    info!(
        delay_ms = config.listen_delay_ms,
        capture = config.capture.enabled,
        "starting pronunciation session"
    );
    let session = config.session_config()?.with_ui(true);
    run_session(session)?.launch()?;
    Ok(())
}

#[derive(Serialize)]
struct SimulationReport {
    #[serde(flatten)]
    state: SessionState,
    mean_score: Option<f64>,
    rows: AlignedRows,
}

fn handle_simulate(args: &SimulateArgs) -> Result<()> {
    let config = AppConfig::resolve(args.pipeline.config.as_deref(), &args.overrides())
        .context("failed to resolve configuration")?;
    let session = config.session_config()?.with_ui(false);
    let timeout = session.listen_delay + SIMULATE_GRACE;
    let handle = run_session(session)?.into_handle()?;
    handle.controller().start()?;
    let state = handle
        .wait_for(timeout, |state| {
            state.error.is_some() || (state.generation > 0 && !state.listening)
        })
        .context("session did not publish a result in time")?;
    if let Some(message) = &state.error {
        bail!("simulation failed: {}", message);
    }
    let report = SimulationReport {
        mean_score: tonegrader::grading::mean_score(&state.word_scores),
        rows: state.rows(),
        state,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

#[derive(Serialize)]
struct PhraseSummary<'a> {
    text: &'a str,
    pinyin: &'a str,
    scores: &'a [f32],
    mean_score: Option<f64>,
    grade: Option<LetterGrade>,
}

fn summarize(bank: &PhraseBank) -> Vec<PhraseSummary<'_>> {
    bank.samples()
        .iter()
        .map(|sample| PhraseSummary {
            text: &sample.text,
            pinyin: &sample.pinyin,
            scores: &sample.scores,
            mean_score: sample.mean_score(),
            grade: sample.grade(),
        })
        .collect()
}

fn handle_phrases(args: &PhraseArgs) -> Result<()> {
    let config = AppConfig::resolve(args.config.as_deref(), &args.overrides())
        .context("failed to resolve configuration")?;
    let bank = config.phrase_bank()?;
    println!("{}", serde_json::to_string_pretty(&summarize(&bank))?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_summary_lists_grades() {
        let bank = PhraseBank::builtin();
        let grades: Vec<_> = summarize(&bank)
            .into_iter()
            .map(|summary| summary.grade)
            .collect();
        assert_eq!(
            grades,
            vec![Some(LetterGrade::B), Some(LetterGrade::C), Some(LetterGrade::B)]
        );
    }

    #[test]
    fn report_flattens_state_fields() {
        let report = SimulationReport {
            state: SessionState::default(),
            mean_score: None,
            rows: AlignedRows::default(),
        };
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["listening"], false);
        assert!(value["rows"]["characters"].as_array().unwrap().is_empty());
    }
}
