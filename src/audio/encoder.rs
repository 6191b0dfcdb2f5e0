use std::path::Path;

use anyhow::{ensure, Context, Result};

use crate::grading::RecordedClip;

/// Writes a recording as 16-bit mono WAV.
pub fn write_clip<P: AsRef<Path>>(clip: &RecordedClip, path: P) -> Result<()> {
    let path = path.as_ref();
    ensure!(clip.sample_rate > 0, "recording has no sample rate");

    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: clip.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }
    let mut writer = hound::WavWriter::create(path, spec)
        .with_context(|| format!("failed to create WAV file: {}", path.display()))?;

    for &sample in clip.samples.iter() {
        let scaled = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
        writer
            .write_sample(scaled)
            .context("failed to write audio sample")?;
    }
    writer.finalize().context("failed to finalize WAV file")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::write_clip;
    use crate::grading::RecordedClip;

    #[test]
    fn round_trips_length_and_rate() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("takes").join("last.wav");
        let clip = RecordedClip::from_samples(vec![0.0, 0.5, -0.5, 1.5], 8_000);
        write_clip(&clip, &path).unwrap();

        let reader = hound::WavReader::open(&path).unwrap();
        assert_eq!(reader.spec().sample_rate, 8_000);
        assert_eq!(reader.len(), 4);
        let samples: Vec<i16> = reader.into_samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(samples[3], i16::MAX);
    }

    #[test]
    fn rejects_clip_without_rate() {
        let dir = tempfile::tempdir().unwrap();
        let clip = RecordedClip::from_samples(vec![0.1], 0);
        assert!(write_clip(&clip, dir.path().join("bad.wav")).is_err());
    }
}
