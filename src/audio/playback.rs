use std::time::Duration;

use anyhow::{ensure, Context, Result};
use rodio::buffer::SamplesBuffer;
use rodio::source::{SineWave, Source};
use rodio::{OutputStream, OutputStreamHandle, Sink};
use tracing::debug;

use crate::grading::RecordedClip;

const TONE_VOLUME: f32 = 0.25;

/// Fixed feedback beep played when there is no recording to replay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub frequency_hz: f32,
    pub duration: Duration,
}

impl Tone {
    pub fn new(frequency_hz: f32, duration: Duration) -> Self {
        Self {
            frequency_hz,
            duration,
        }
    }
}

impl Default for Tone {
    fn default() -> Self {
        Self::new(440.0, Duration::from_millis(500))
    }
}

/// Output side of the replay control. Calls return once playback is queued.
pub trait FeedbackPlayer {
    fn play_tone(&mut self, tone: Tone) -> Result<()>;
    fn play_clip(&mut self, clip: &RecordedClip) -> Result<()>;
}

/// Plays through the default output device via detached rodio sinks.
#[derive(Default)]
pub struct RodioPlayer {
    output: Option<(OutputStream, OutputStreamHandle)>,
}

impl RodioPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    fn handle(&mut self) -> Result<&OutputStreamHandle> {
        let output = match self.output.take() {
            Some(output) => output,
            None => OutputStream::try_default().context("failed to open output stream")?,
        };
        Ok(&self.output.insert(output).1)
    }

    fn detach<S>(&mut self, source: S) -> Result<()>
    where
        S: Source<Item = f32> + Send + 'static,
    {
        let sink = Sink::try_new(self.handle()?).context("failed to create sink")?;
        sink.set_volume(1.0);
        sink.append(source);
        sink.detach();
        Ok(())
    }
}

impl FeedbackPlayer for RodioPlayer {
    fn play_tone(&mut self, tone: Tone) -> Result<()> {
        debug!(
            frequency_hz = tone.frequency_hz,
            duration_ms = tone.duration.as_millis() as u64,
            "playing feedback tone"
        );
        let source = SineWave::new(tone.frequency_hz)
            .take_duration(tone.duration)
            .amplify(TONE_VOLUME);
        self.detach(source)
    }

    fn play_clip(&mut self, clip: &RecordedClip) -> Result<()> {
        ensure!(clip.sample_rate > 0, "recording has no sample rate");
        debug!(
            duration_secs = clip.duration.as_secs_f64(),
            "replaying recording"
        );
        let stereo = duplicate_to_stereo(&clip.samples);
        self.detach(SamplesBuffer::new(2, clip.sample_rate, stereo))
    }
}

pub fn duplicate_to_stereo(samples: &[f32]) -> Vec<f32> {
    let mut output = Vec::with_capacity(samples.len() * 2);
    for &sample in samples {
        output.push(sample);
        output.push(sample);
    }
    output
}

#[cfg(test)]
mod tests {
    use super::{duplicate_to_stereo, Tone};
    use std::time::Duration;

    #[test]
    fn replicates_each_sample_into_two_channels() {
        let stereo = duplicate_to_stereo(&[0.3, -0.3]);
        assert_eq!(stereo, vec![0.3, 0.3, -0.3, -0.3]);
    }

    #[test]
    fn default_tone_is_half_second_a4() {
        let tone = Tone::default();
        assert_eq!(tone.frequency_hz, 440.0);
        assert_eq!(tone.duration, Duration::from_millis(500));
    }
}
