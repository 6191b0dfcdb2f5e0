use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{BufferSize, Device, SampleFormat, Stream, StreamConfig};
use tracing::{info, warn};

use crate::grading::RecordedClip;

#[derive(Clone, Debug)]
pub struct CaptureConfig {
    pub device_name: Option<String>,
    /// Audio beyond this length is dropped.
    pub max_duration: Duration,
}

impl CaptureConfig {
    pub fn new(device_name: Option<String>, max_duration: Duration) -> Self {
        Self {
            device_name,
            max_duration,
        }
    }
}

/// Shared sink the input callback appends mono frames into.
struct Recorder {
    buffer: Mutex<Vec<f32>>,
    capacity: usize,
    finished: AtomicBool,
}

impl Recorder {
    fn new(capacity: usize) -> Self {
        Self {
            buffer: Mutex::new(Vec::with_capacity(capacity.min(1 << 20))),
            capacity,
            finished: AtomicBool::new(false),
        }
    }

    fn push_frames(&self, data: &[f32], channels: usize) {
        if self.finished.load(Ordering::Relaxed) || channels == 0 {
            return;
        }
        let mut buffer = self.buffer.lock().unwrap_or_else(PoisonError::into_inner);
        for frame in data.chunks(channels) {
            if buffer.len() >= self.capacity {
                break;
            }
            buffer.push(mix_to_mono(frame));
        }
    }

    fn take(&self) -> Vec<f32> {
        let mut buffer = self.buffer.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::take(&mut *buffer)
    }
}

/// Microphone input stream that accumulates audio until finished.
pub struct LiveCapture {
    stream: Stream,
    recorder: Arc<Recorder>,
    sample_rate: u32,
}

impl LiveCapture {
    pub fn start(config: &CaptureConfig) -> Result<Self> {
        let device = select_device(config)?;
        let supported = device
            .default_input_config()
            .context("failed to query default input config")?;
        let stream_config = StreamConfig {
            channels: supported.channels(),
            sample_rate: supported.sample_rate(),
            buffer_size: BufferSize::Default,
        };
        let sample_rate = stream_config.sample_rate.0;
        let recorder = Arc::new(Recorder::new(frames_for_duration(
            config.max_duration,
            sample_rate,
        )));
        let stream = build_input_stream(
            &device,
            &stream_config,
            supported.sample_format(),
            recorder.clone(),
        )?;
        stream
            .play()
            .context("failed to start live capture stream")?;
        info!(
            device = ?config.device_name,
            sample_rate,
            channels = stream_config.channels,
            "live capture stream started"
        );
        Ok(Self {
            stream,
            recorder,
            sample_rate,
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Stops the stream and hands back everything recorded so far.
    pub fn finish(self) -> RecordedClip {
        self.halt();
        RecordedClip::from_samples(self.recorder.take(), self.sample_rate)
    }

    fn halt(&self) {
        self.recorder.finished.store(true, Ordering::SeqCst);
        let _ = self.stream.pause();
    }
}

impl Drop for LiveCapture {
    fn drop(&mut self) {
        self.halt();
    }
}

fn select_device(config: &CaptureConfig) -> Result<Device> {
    let host = cpal::default_host();
    if let Some(name) = config.device_name.as_deref() {
        for device in host
            .input_devices()
            .context("listing input devices failed")?
        {
            if device.name().map(|n| n == name).unwrap_or(false) {
                return Ok(device);
            }
        }
        return Err(anyhow!("input device '{}' not found", name));
    }
    host.default_input_device()
        .context("no default input device available")
}

fn build_input_stream(
    device: &Device,
    config: &StreamConfig,
    format: SampleFormat,
    recorder: Arc<Recorder>,
) -> Result<Stream> {
    let err_fn = |err: cpal::StreamError| warn!(error = %err, "audio input stream error");
    let channels = config.channels as usize;
    match format {
        SampleFormat::F32 => device.build_input_stream(
            config,
            move |data: &[f32], _| recorder.push_frames(data, channels),
            err_fn,
            None,
        ),
        SampleFormat::I16 => device.build_input_stream(
            config,
            move |data: &[i16], _| {
                let converted: Vec<f32> = data
                    .iter()
                    .map(|&sample| sample as f32 / i16::MAX as f32)
                    .collect();
                recorder.push_frames(&converted, channels)
            },
            err_fn,
            None,
        ),
        SampleFormat::U16 => device.build_input_stream(
            config,
            move |data: &[u16], _| {
                let converted: Vec<f32> = data
                    .iter()
                    .map(|&sample| (sample as f32 / u16::MAX as f32) * 2.0 - 1.0)
                    .collect();
                recorder.push_frames(&converted, channels)
            },
            err_fn,
            None,
        ),
        other => return Err(anyhow!("unsupported input sample format {:?}", other)),
    }
    .map_err(|err| anyhow!(err))
    .context("failed to build input stream")
}

fn frames_for_duration(duration: Duration, sample_rate: u32) -> usize {
    let frames = duration.as_secs_f64() * sample_rate as f64;
    frames.ceil() as usize
}

pub fn mix_to_mono(frame: &[f32]) -> f32 {
    if frame.is_empty() {
        return 0.0;
    }
    frame.iter().sum::<f32>() / frame.len() as f32
}
