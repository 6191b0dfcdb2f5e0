use std::cell::RefCell;
use std::collections::VecDeque;
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, error, info};

use super::state::{SessionEvent, SessionState};
use super::{GradingError, Result, SessionConfig};

#[derive(Clone)]
pub struct SessionController {
    tx: Sender<SessionCommand>,
}

pub struct SessionRuntime {
    config: SessionConfig,
    controller: SessionController,
    updates: Option<Receiver<SessionState>>,
    join: Option<JoinHandle<()>>,
    auto_shutdown: bool,
}

pub struct SessionHandle {
    config: SessionConfig,
    controller: SessionController,
    updates: Receiver<SessionState>,
    join: Option<JoinHandle<()>>,
    pending: RefCell<VecDeque<SessionState>>,
}

impl SessionRuntime {
    pub fn new(config: SessionConfig) -> Result<Self> {
        let engine_config = config.clone();
        Self::with_engine(config, move || engine::SessionEngine::from_config(&engine_config))
    }

    /// Spawns the worker with a caller-supplied engine. The engine is built on
    /// the worker thread so its audio handles never cross threads.
    pub fn with_engine<F>(config: SessionConfig, build: F) -> Result<Self>
    where
        F: FnOnce() -> Result<engine::SessionEngine> + Send + 'static,
    {
        info!(
            delay_ms = config.listen_delay.as_millis() as u64,
            phrases = config.phrases.len(),
            capture = config.capture.enabled,
            "launching session runtime thread"
        );
        let (command_tx, command_rx) = channel();
        let (update_tx, update_rx) = channel();
        let join = thread::Builder::new()
            .name("session-runtime".to_string())
            .spawn(move || match build() {
                Ok(engine) => SessionWorker::new(engine).run(command_rx, update_tx),
                Err(err) => {
                    error!(error = %err, "failed to construct session engine");
                    let failed =
                        SessionState::default().reduce(SessionEvent::Failed(err.to_string()));
                    let _ = update_tx.send(failed);
                }
            })
            .map_err(|err| {
                error!(error = %err, "failed to spawn session runtime thread");
                GradingError::new(err.to_string())
            })?;
        Ok(Self {
            config,
            controller: SessionController { tx: command_tx },
            updates: Some(update_rx),
            join: Some(join),
            auto_shutdown: true,
        })
    }

    pub fn controller(&self) -> SessionController {
        self.controller.clone()
    }

    pub fn into_handle(mut self) -> Result<SessionHandle> {
        let updates = self
            .updates
            .take()
            .ok_or_else(|| GradingError::new("session updates channel already taken"))?;
        self.auto_shutdown = false;
        Ok(SessionHandle {
            config: self.config.clone(),
            controller: self.controller.clone(),
            updates,
            join: self.join.take(),
            pending: RefCell::new(VecDeque::new()),
        })
    }

    pub fn launch(self) -> Result<()> {
        if !self.config.ui_enabled {
            return Err(GradingError::new(
                "interactive session must enable UI; use `simulate` for headless runs",
            ));
        }
        crate::ui::launch_ui(self.into_handle()?)
    }
}

impl Drop for SessionRuntime {
    fn drop(&mut self) {
        if self.auto_shutdown {
            let _ = self.controller.shutdown();
            if let Some(join) = self.join.take() {
                let _ = join.join();
            }
        }
    }
}

impl SessionHandle {
    pub fn controller(&self) -> SessionController {
        self.controller.clone()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Most recent state published by the worker, discarding older ones.
    pub fn latest(&self) -> Option<SessionState> {
        let mut pending = self.pending.borrow_mut();
        while let Ok(state) = self.updates.try_recv() {
            pending.push_back(state);
        }
        let latest = pending.pop_back();
        pending.clear();
        latest
    }

    /// Blocks until a published state satisfies `done` or `timeout` elapses.
    pub fn wait_for<F>(&self, timeout: Duration, mut done: F) -> Option<SessionState>
    where
        F: FnMut(&SessionState) -> bool,
    {
        let deadline = Instant::now() + timeout;
        loop {
            if let Some(state) = self.pending.borrow_mut().pop_front() {
                if done(&state) {
                    return Some(state);
                }
                continue;
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return None;
            }
            match self.updates.recv_timeout(remaining) {
                Ok(state) => self.pending.borrow_mut().push_back(state),
                Err(_) => return None,
            }
        }
    }
}

impl Drop for SessionHandle {
    fn drop(&mut self) {
        let _ = self.controller.shutdown();
        if let Some(join) = self.join.take() {
            let _ = join.join();
        }
    }
}

impl SessionController {
    pub fn start(&self) -> Result<()> {
        self.send(SessionCommand::Start, "start listening")
    }

    pub fn stop(&self) -> Result<()> {
        self.send(SessionCommand::Stop, "stop listening")
    }

    /// Microphone button semantics: stop while listening, start otherwise.
    pub fn toggle(&self, listening: bool) -> Result<()> {
        if listening {
            self.stop()
        } else {
            self.start()
        }
    }

    pub fn replay(&self) -> Result<()> {
        self.send(SessionCommand::Replay, "replay feedback")
    }

    pub fn reset(&self) -> Result<()> {
        self.send(SessionCommand::Reset, "reset session")
    }

    pub fn shutdown(&self) -> Result<()> {
        self.send(SessionCommand::Shutdown, "shutdown session")
    }

    fn send(&self, command: SessionCommand, label: &str) -> Result<()> {
        self.tx
            .send(command)
            .map_err(|_| GradingError::new(format!("failed to {}", label)))
    }
}

pub mod engine {
    use std::path::PathBuf;
    use std::time::Duration;

    use tracing::{info, warn};

    use crate::audio::capture::{CaptureConfig, LiveCapture};
    use crate::audio::encoder;
    use crate::audio::playback::{FeedbackPlayer, RodioPlayer, Tone};
    use crate::grading::recognizer::{MockRecognizer, Recognizer};
    use crate::grading::state::{SessionEvent, SessionState};
    use crate::grading::{
        CaptureSettings, GradingError, PhraseSample, RecordedClip, Result, SessionConfig,
    };

    /// Microphone capability: opened when listening starts, finalized on stop.
    /// `start` reports the input sample rate, or 0 when nothing is recorded.
    pub trait CaptureSource {
        fn start(&mut self) -> Result<u32>;
        fn stop(&mut self) -> Option<RecordedClip>;
    }

    /// Owns the collaborators of one session and turns commands into events.
    pub struct SessionEngine {
        recognizer: Box<dyn Recognizer>,
        capture: Box<dyn CaptureSource>,
        player: Box<dyn FeedbackPlayer>,
        listen_delay: Duration,
        tone: Tone,
        save_recording: Option<PathBuf>,
        last_clip: Option<RecordedClip>,
    }

    impl SessionEngine {
        pub fn new(
            recognizer: Box<dyn Recognizer>,
            capture: Box<dyn CaptureSource>,
            player: Box<dyn FeedbackPlayer>,
            listen_delay: Duration,
        ) -> Self {
            Self {
                recognizer,
                capture,
                player,
                listen_delay,
                tone: Tone::default(),
                save_recording: None,
                last_clip: None,
            }
        }

        pub fn from_config(config: &SessionConfig) -> Result<Self> {
            let recognizer = MockRecognizer::new(config.phrases.clone(), config.seed);
            let capture: Box<dyn CaptureSource> = if config.capture.enabled {
                Box::new(LiveCaptureSource::new(&config.capture))
            } else {
                Box::new(NullCapture)
            };
            Ok(Self::new(
                Box::new(recognizer),
                capture,
                Box::new(RodioPlayer::new()),
                config.listen_delay,
            )
            .with_tone(config.tone)
            .with_recording_path(config.save_recording.clone()))
        }

        pub fn with_tone(mut self, tone: Tone) -> Self {
            self.tone = tone;
            self
        }

        pub fn with_recording_path(mut self, path: Option<PathBuf>) -> Self {
            self.save_recording = path;
            self
        }

        pub fn listen_delay(&self) -> Duration {
            self.listen_delay
        }

        pub fn begin(&mut self, state: &mut SessionState) {
            state.apply(SessionEvent::ListeningStarted);
            self.last_clip = None;
            state.apply(SessionEvent::RecordingFinalized { available: false });
            match self.capture.start() {
                Ok(0) => {}
                Ok(sample_rate) => info!(sample_rate, "recording while listening"),
                Err(err) => {
                    warn!(error = %err, "microphone unavailable; continuing with simulated result")
                }
            }
        }

        pub fn recognize(&mut self) -> Result<PhraseSample> {
            self.recognizer.recognize()
        }

        /// Closes the microphone and keeps whatever it recorded for replay.
        pub fn finish_capture(&mut self, state: &mut SessionState) {
            let Some(clip) = self.capture.stop().filter(|clip| !clip.is_empty()) else {
                return;
            };
            info!(
                duration_secs = clip.duration.as_secs_f64(),
                "recording finalized"
            );
            if let Some(path) = &self.save_recording {
                match encoder::write_clip(&clip, path) {
                    Ok(()) => info!(path = %path.display(), "recording saved"),
                    Err(err) => {
                        warn!(error = %err, path = %path.display(), "failed to save recording");
                        state.apply(SessionEvent::Failed(format!("{:#}", err)));
                    }
                }
            }
            self.last_clip = Some(clip);
            state.apply(SessionEvent::RecordingFinalized { available: true });
        }

        pub fn replay(&mut self, state: &mut SessionState) {
            let outcome = match &self.last_clip {
                Some(clip) => self.player.play_clip(clip),
                None => self.player.play_tone(self.tone),
            };
            if let Err(err) = outcome {
                warn!(error = %err, "feedback playback failed");
                state.apply(SessionEvent::Failed(format!("{:#}", err)));
            }
        }

        pub fn reset(&mut self, state: &mut SessionState) {
            let _ = self.capture.stop();
            self.last_clip = None;
            state.apply(SessionEvent::Reset);
        }

        pub fn shutdown(&mut self) {
            let _ = self.capture.stop();
        }
    }

    pub struct LiveCaptureSource {
        config: CaptureConfig,
        live: Option<LiveCapture>,
    }

    impl LiveCaptureSource {
        pub fn new(settings: &CaptureSettings) -> Self {
            Self {
                config: CaptureConfig::new(
                    settings.device_name.clone(),
                    Duration::from_secs(settings.max_seconds as u64),
                ),
                live: None,
            }
        }
    }

    impl CaptureSource for LiveCaptureSource {
        fn start(&mut self) -> Result<u32> {
            drop(self.live.take());
            let live = LiveCapture::start(&self.config)
                .map_err(|err| GradingError::new(format!("{:#}", err)))?;
            let sample_rate = live.sample_rate();
            self.live = Some(live);
            Ok(sample_rate)
        }

        fn stop(&mut self) -> Option<RecordedClip> {
            self.live.take().map(LiveCapture::finish)
        }
    }

    /// Capture source used when the microphone is disabled.
    pub struct NullCapture;

    impl CaptureSource for NullCapture {
        fn start(&mut self) -> Result<u32> {
            Ok(0)
        }

        fn stop(&mut self) -> Option<RecordedClip> {
            None
        }
    }
}

struct SessionWorker {
    engine: engine::SessionEngine,
    state: SessionState,
}

impl SessionWorker {
    fn new(engine: engine::SessionEngine) -> Self {
        Self {
            engine,
            state: SessionState::default(),
        }
    }

    fn run(mut self, commands: Receiver<SessionCommand>, updates: Sender<SessionState>) {
        info!("session runtime thread running; emitting initial state");
        let _ = updates.send(self.state.clone());
        while let Ok(command) = commands.recv() {
            match command {
                SessionCommand::Start => {
                    info!("received start command");
                    match self.listen(&commands, &updates) {
                        LoopExit::Finished => {}
                        LoopExit::Shutdown => break,
                    }
                }
                SessionCommand::Stop => {
                    debug!("stop command received while idle");
                }
                SessionCommand::Replay => {
                    self.engine.replay(&mut self.state);
                    self.publish(&updates);
                }
                SessionCommand::Reset => {
                    info!("received reset command");
                    self.engine.reset(&mut self.state);
                    self.publish(&updates);
                }
                SessionCommand::Shutdown => {
                    info!("received shutdown command");
                    break;
                }
            }
        }
        self.engine.shutdown();
        info!("session runtime thread exiting");
    }

    /// One listening cycle. The mocked delay is a timed wait on the command
    /// channel, so stop and reset cancel the pending result.
    fn listen(
        &mut self,
        commands: &Receiver<SessionCommand>,
        updates: &Sender<SessionState>,
    ) -> LoopExit {
        self.engine.begin(&mut self.state);
        let generation = self.state.generation;
        self.publish(updates);

        let sample = match self.engine.recognize() {
            Ok(sample) => sample,
            Err(err) => {
                error!(error = %err, "mock recognizer failed");
                self.engine.finish_capture(&mut self.state);
                self.state.apply(SessionEvent::ListeningStopped);
                self.state.apply(SessionEvent::Failed(err.to_string()));
                self.publish(updates);
                return LoopExit::Finished;
            }
        };

        let deadline = Instant::now() + self.engine.listen_delay();
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }
            match commands.recv_timeout(remaining) {
                Ok(SessionCommand::Stop) => {
                    info!(generation, "listening stopped; pending result cancelled");
                    self.engine.finish_capture(&mut self.state);
                    self.state.apply(SessionEvent::ListeningStopped);
                    self.publish(updates);
                    return LoopExit::Finished;
                }
                Ok(SessionCommand::Reset) => {
                    info!(generation, "reset while listening; pending result cancelled");
                    self.engine.reset(&mut self.state);
                    self.publish(updates);
                    return LoopExit::Finished;
                }
                Ok(SessionCommand::Replay) => {
                    self.engine.replay(&mut self.state);
                    self.publish(updates);
                }
                Ok(SessionCommand::Start) => {
                    debug!("start command received while already listening");
                }
                Ok(SessionCommand::Shutdown) | Err(RecvTimeoutError::Disconnected) => {
                    info!("shutdown while listening");
                    return LoopExit::Shutdown;
                }
                Err(RecvTimeoutError::Timeout) => break,
            }
        }

        self.engine.finish_capture(&mut self.state);
        self.state
            .apply(SessionEvent::RecognitionCompleted { generation, sample });
        info!(
            generation,
            text = %self.state.spoken_text,
            grade = ?self.state.grade,
            "recognition result published"
        );
        self.publish(updates);
        LoopExit::Finished
    }

    fn publish(&self, updates: &Sender<SessionState>) {
        let _ = updates.send(self.state.clone());
    }
}

enum LoopExit {
    Finished,
    Shutdown,
}

#[derive(Clone, Copy, Debug)]
enum SessionCommand {
    Start,
    Stop,
    Replay,
    Reset,
    Shutdown,
}
