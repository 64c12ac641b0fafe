//! WAV reading and writing through `hound`.
//!
//! Integer PCM is scaled by `2^(bits-1)` into [-1, 1). 32-bit files are
//! written as IEEE float, 16- and 24-bit as PCM.

use crate::{Error, Result};
use hound::{SampleFormat, WavReader, WavWriter};
use lento_core::StereoBuffer;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Sample rate, channel count and bit depth of a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavSpec {
    /// 1 for mono, 2 for stereo.
    pub channels: u16,
    /// Frames per second.
    pub sample_rate: u32,
    /// 16, 24 or 32.
    pub bits_per_sample: u16,
}

impl Default for WavSpec {
    fn default() -> Self {
        Self {
            channels: 2,
            sample_rate: 44100,
            bits_per_sample: 32,
        }
    }
}

impl From<hound::WavSpec> for WavSpec {
    fn from(spec: hound::WavSpec) -> Self {
        Self {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
        }
    }
}

impl From<WavSpec> for hound::WavSpec {
    fn from(spec: WavSpec) -> Self {
        let sample_format = match spec.bits_per_sample {
            32 => SampleFormat::Float,
            _ => SampleFormat::Int,
        };
        hound::WavSpec {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
            sample_format,
        }
    }
}

/// Header summary, read without decoding any samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WavInfo {
    /// Layout of the file.
    pub spec: WavSpec,
    /// Whether samples are IEEE float rather than integer PCM.
    pub float: bool,
    /// Frames per channel.
    pub frames: u64,
    /// Length in seconds.
    pub duration_seconds: f64,
}

/// Summarize a file from its header.
pub fn read_wav_info<P: AsRef<Path>>(path: P) -> Result<WavInfo> {
    let source = Source::open(path.as_ref())?;
    let frames = u64::from(source.reader.len()) / u64::from(source.spec.channels);
    Ok(WavInfo {
        spec: source.spec,
        float: source.reader.spec().sample_format == SampleFormat::Float,
        frames,
        duration_seconds: frames as f64 / f64::from(source.spec.sample_rate),
    })
}

/// Largest magnitude of a PCM word, as a float.
fn full_scale(bits_per_sample: u16) -> f32 {
    (1u32 << (bits_per_sample - 1)) as f32
}

/// An opened file whose channel count has been checked.
struct Source {
    reader: WavReader<BufReader<File>>,
    spec: WavSpec,
}

impl Source {
    fn open(path: &Path) -> Result<Self> {
        let reader = WavReader::open(path)?;
        let spec = WavSpec::from(reader.spec());
        if spec.channels == 0 {
            return Err(Error::UnsupportedChannels(0));
        }
        Ok(Self { reader, spec })
    }

    /// Every sample in file order, scaled to [-1, 1).
    fn interleaved(self) -> Result<Vec<f32>> {
        let samples = if self.reader.spec().sample_format == SampleFormat::Float {
            self.reader.into_samples::<f32>().collect::<std::result::Result<_, _>>()?
        } else {
            let scale = full_scale(self.spec.bits_per_sample).recip();
            self.reader
                .into_samples::<i32>()
                .map(|word| word.map(|w| w as f32 * scale))
                .collect::<std::result::Result<_, _>>()?
        };
        Ok(samples)
    }
}

/// Read a file as mono, averaging its channels.
pub fn read_wav<P: AsRef<Path>>(path: P) -> Result<(Vec<f32>, WavSpec)> {
    let path = path.as_ref();
    let source = Source::open(path)?;
    let spec = source.spec;
    let width = usize::from(spec.channels);
    let mut samples = source.interleaved()?;
    if width > 1 {
        samples = samples
            .chunks_exact(width)
            .map(|frame| frame.iter().sum::<f32>() / width as f32)
            .collect();
    }
    tracing::debug!(path = %path.display(), frames = samples.len(), ?spec, "read wav");
    Ok((samples, spec))
}

/// Read a file as stereo.
///
/// Mono is copied to both sides; past two channels only the first pair is
/// kept.
pub fn read_wav_stereo<P: AsRef<Path>>(path: P) -> Result<(StereoBuffer, WavSpec)> {
    let path = path.as_ref();
    let source = Source::open(path)?;
    let spec = source.spec;
    let width = usize::from(spec.channels);
    let samples = source.interleaved()?;

    let buffer = match width {
        1 => StereoBuffer::from_mono(samples, spec.sample_rate),
        _ => {
            if width > 2 {
                tracing::warn!(
                    path = %path.display(),
                    channels = width,
                    "keeping the first two channels"
                );
            }
            let (left, right): (Vec<f32>, Vec<f32>) = samples
                .chunks_exact(width)
                .map(|frame| (frame[0], frame[1]))
                .unzip();
            StereoBuffer::new(left, right, spec.sample_rate)
        }
    };
    tracing::debug!(path = %path.display(), frames = buffer.len(), ?spec, "read wav");
    Ok((buffer, spec))
}

fn encode<'a, P: AsRef<Path>>(
    path: P,
    spec: WavSpec,
    samples: impl IntoIterator<Item = &'a f32>,
) -> Result<()> {
    let bits = spec.bits_per_sample;
    if !matches!(bits, 16 | 24 | 32) {
        return Err(Error::UnsupportedBitDepth(bits));
    }
    let mut writer = WavWriter::create(path, hound::WavSpec::from(spec))?;
    if bits == 32 {
        for &sample in samples {
            writer.write_sample(sample)?;
        }
    } else {
        let scale = full_scale(bits);
        for &sample in samples {
            writer.write_sample((sample * scale).clamp(-scale, scale - 1.0) as i32)?;
        }
    }
    writer.finalize()?;
    Ok(())
}

/// Write mono samples; `spec.channels` is ignored.
pub fn write_wav<P: AsRef<Path>>(path: P, samples: &[f32], spec: WavSpec) -> Result<()> {
    let spec = WavSpec { channels: 1, ..spec };
    encode(path, spec, samples)?;
    tracing::debug!(frames = samples.len(), ?spec, "wrote wav");
    Ok(())
}

/// Write a stereo buffer at its own sample rate.
pub fn write_wav_stereo<P: AsRef<Path>>(
    path: P,
    buffer: &StereoBuffer,
    bits_per_sample: u16,
) -> Result<()> {
    let spec = WavSpec {
        channels: 2,
        sample_rate: buffer.sample_rate,
        bits_per_sample,
    };
    encode(path, spec, &buffer.to_interleaved())?;
    tracing::debug!(frames = buffer.len(), ?spec, "wrote wav");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn ramp(len: usize) -> Vec<f32> {
        (0..len).map(|i| i as f32 / len as f32 - 0.5).collect()
    }

    #[test]
    fn float_mono_is_lossless() {
        let samples = ramp(1000);
        let file = NamedTempFile::new().unwrap();
        write_wav(file.path(), &samples, WavSpec::default()).unwrap();

        let (loaded, spec) = read_wav(file.path()).unwrap();
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.sample_rate, 44100);
        assert_eq!(loaded, samples);
    }

    #[test]
    fn pcm24_mono_within_one_lsb() {
        let samples = ramp(500);
        let spec = WavSpec {
            bits_per_sample: 24,
            ..WavSpec::default()
        };
        let file = NamedTempFile::new().unwrap();
        write_wav(file.path(), &samples, spec).unwrap();

        let (loaded, loaded_spec) = read_wav(file.path()).unwrap();
        assert_eq!(loaded_spec.bits_per_sample, 24);
        for (a, b) in samples.iter().zip(&loaded) {
            assert!((a - b).abs() < 1e-6);
        }
    }

    #[test]
    fn stereo_mixes_down_to_mono() {
        let buffer = StereoBuffer::new(vec![1.0, 0.5], vec![0.0, -0.5], 8000);
        let file = NamedTempFile::new().unwrap();
        write_wav_stereo(file.path(), &buffer, 32).unwrap();

        let (mono, spec) = read_wav(file.path()).unwrap();
        assert_eq!(spec.channels, 2);
        assert_eq!(mono, vec![0.5, 0.0]);
    }

    #[test]
    fn mono_reads_as_stereo() {
        let samples = ramp(100);
        let file = NamedTempFile::new().unwrap();
        write_wav(file.path(), &samples, WavSpec::default()).unwrap();

        let (stereo, _) = read_wav_stereo(file.path()).unwrap();
        assert_eq!(stereo.left, samples);
        assert_eq!(stereo.right, samples);
        assert_eq!(stereo.sample_rate, 44100);
    }

    #[test]
    fn extra_channels_are_dropped() {
        let file = NamedTempFile::new().unwrap();
        let spec = hound::WavSpec {
            channels: 4,
            sample_rate: 8000,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };
        let mut writer = WavWriter::create(file.path(), spec).unwrap();
        for frame in 0..10 {
            for ch in 0..4 {
                writer.write_sample(frame as f32 * 0.01 + ch as f32 * 0.1).unwrap();
            }
        }
        writer.finalize().unwrap();

        let (stereo, spec) = read_wav_stereo(file.path()).unwrap();
        assert_eq!(spec.channels, 4);
        assert_eq!(stereo.len(), 10);
        assert!((stereo.left[3] - 0.03).abs() < 1e-6);
        assert!((stereo.right[3] - 0.13).abs() < 1e-6);
    }

    #[test]
    fn twelve_bit_is_rejected() {
        let file = NamedTempFile::new().unwrap();
        let spec = WavSpec {
            bits_per_sample: 12,
            ..WavSpec::default()
        };
        let err = write_wav(file.path(), &[0.0], spec).unwrap_err();
        assert!(matches!(err, Error::UnsupportedBitDepth(12)));
    }

    #[test]
    fn header_summary() {
        let buffer = StereoBuffer::silent(16000, 16000);
        let file = NamedTempFile::new().unwrap();
        write_wav_stereo(file.path(), &buffer, 16).unwrap();

        let info = read_wav_info(file.path()).unwrap();
        assert_eq!(info.spec.channels, 2);
        assert_eq!(info.spec.bits_per_sample, 16);
        assert_eq!(info.frames, 16000);
        assert!(!info.float);
        assert!((info.duration_seconds - 1.0).abs() < 1e-9);
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(read_wav("/definitely/not/here.wav").is_err());
    }
}
