//! WAV file I/O for lento.
//!
//! Reads any PCM or float WAV into `f32` samples and writes 16/24-bit PCM
//! or 32-bit float. Stereo audio travels as [`lento_core::StereoBuffer`].
//!
//! ```rust,ignore
//! use lento_io::{read_wav_stereo, write_wav_stereo};
//!
//! let (track, spec) = read_wav_stereo("song.wav")?;
//! write_wav_stereo("copy.wav", &track, spec.bits_per_sample)?;
//! ```

mod wav;

pub use wav::{
    WavInfo, WavSpec, read_wav, read_wav_info, read_wav_stereo, write_wav,
    write_wav_stereo,
};

/// Error types for audio I/O operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// WAV file read/write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// File has a channel count lento cannot use.
    #[error("unsupported channel count: {0}")]
    UnsupportedChannels(u16),

    /// Bit depth that cannot be written.
    #[error("unsupported bit depth: {0} (expected 16, 24 or 32)")]
    UnsupportedBitDepth(u16),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type for audio I/O operations.
pub type Result<T> = std::result::Result<T, Error>;
