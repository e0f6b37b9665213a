use std::path::Path;

use crate::domain::{AudioInput, Samples};
use crate::error::{RagError, Result};

/// Writes `input` as a PCM (i16) or IEEE float (f32) WAV file.
pub fn write_wav(path: &Path, input: &AudioInput) -> Result<()> {
    if input.channels == 0 || input.sample_rate == 0 {
        return Err(RagError::Transcription(format!(
            "invalid recording format: {} channels at {} Hz",
            input.channels, input.sample_rate
        )));
    }

    let (bits_per_sample, sample_format) = match input.samples {
        Samples::I16(_) => (16, hound::SampleFormat::Int),
        Samples::F32(_) => (32, hound::SampleFormat::Float),
    };
    let spec = hound::WavSpec {
        channels: input.channels,
        sample_rate: input.sample_rate,
        bits_per_sample,
        sample_format,
    };

    let mut writer = hound::WavWriter::create(path, spec)?;
    match &input.samples {
        Samples::I16(samples) => {
            for &s in samples {
                writer.write_sample(s)?;
            }
        }
        Samples::F32(samples) => {
            for &s in samples {
                writer.write_sample(s)?;
            }
        }
    }
    writer.finalize()?;
    Ok(())
}

/// Reads a WAV file, keeping 16-bit PCM as-is and scaling other integer
/// depths to f32.
#[allow(clippy::cast_precision_loss)]
pub fn read_wav(path: &Path) -> Result<AudioInput> {
    let reader = hound::WavReader::open(path)?;
    let spec = reader.spec();

    let samples = match (spec.sample_format, spec.bits_per_sample) {
        (hound::SampleFormat::Int, 16) => {
            Samples::I16(reader.into_samples::<i16>().collect::<std::result::Result<_, _>>()?)
        }
        (hound::SampleFormat::Int, 8) => {
            let max_value = 128.0_f32;
            Samples::F32(
                reader
                    .into_samples::<i8>()
                    .map(|s| s.map(|v| f32::from(v) / max_value))
                    .collect::<std::result::Result<_, _>>()?,
            )
        }
        (hound::SampleFormat::Int, bits @ (24 | 32)) => {
            let max_value = (1u64 << (bits - 1)) as f32;
            Samples::F32(
                reader
                    .into_samples::<i32>()
                    .map(|s| s.map(|v| v as f32 / max_value))
                    .collect::<std::result::Result<_, _>>()?,
            )
        }
        (hound::SampleFormat::Float, _) => {
            Samples::F32(reader.into_samples::<f32>().collect::<std::result::Result<_, _>>()?)
        }
        (hound::SampleFormat::Int, bits) => {
            return Err(RagError::Transcription(format!(
                "unsupported bit depth: {bits}"
            )));
        }
    };

    Ok(AudioInput {
        sample_rate: spec.sample_rate,
        channels: spec.channels,
        samples,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_pcm_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("q.wav");
        let input = AudioInput::mono(16_000, Samples::I16(vec![0, 1200, -1200, i16::MAX]));

        write_wav(&path, &input).unwrap();
        assert_eq!(read_wav(&path).unwrap(), input);
    }

    #[test]
    fn test_float_stereo_keeps_layout() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("q.wav");
        let input = AudioInput {
            sample_rate: 48_000,
            channels: 2,
            samples: Samples::F32(vec![0.25, -0.25, 0.5, -0.5]),
        };

        write_wav(&path, &input).unwrap();
        let read = read_wav(&path).unwrap();
        assert_eq!(read.channels, 2);
        assert_eq!(read.sample_rate, 48_000);
        assert_eq!(read.samples, input.samples);
    }

    #[test]
    fn test_zero_channels_rejected() {
        let dir = TempDir::new().unwrap();
        let input = AudioInput {
            sample_rate: 16_000,
            channels: 0,
            samples: Samples::I16(vec![1]),
        };
        assert!(write_wav(&dir.path().join("bad.wav"), &input).is_err());
    }
}
