use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Extraction parameters, fixed for the lifetime of a batch.
///
/// Config keys (TOML): `sampling_rate`, `duration_seconds`, `hop_length`,
/// `n_fft`, `n_mels`, `fmin_hz`, `fmax_hz`, `trim_top_db`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpectrogramConfig {
    /// Target sample rate every input is resampled to, in Hz.
    #[serde(default = "default_sampling_rate")]
    pub sampling_rate: u32,
    /// Length every input is padded or truncated to, in seconds.
    #[serde(default = "default_duration_seconds")]
    pub duration_seconds: f32,
    /// Samples between successive STFT frames.
    #[serde(default = "default_hop_length")]
    pub hop_length: usize,
    /// FFT window size in samples; must be a power of two.
    #[serde(default = "default_n_fft")]
    pub n_fft: usize,
    /// Number of mel filterbank bands.
    #[serde(default = "default_n_mels")]
    pub n_mels: usize,
    /// Lower bound of the mel filterbank, in Hz.
    #[serde(default = "default_fmin_hz")]
    pub fmin_hz: f32,
    /// Upper bound of the mel filterbank, in Hz. Must not exceed Nyquist.
    #[serde(default = "default_fmax_hz")]
    pub fmax_hz: f32,
    /// Silence-trim threshold: frames this many dB below the peak frame
    /// are considered silent.
    #[serde(default = "default_trim_top_db")]
    pub trim_top_db: f32,
}

impl Default for SpectrogramConfig {
    fn default() -> Self {
        Self {
            sampling_rate: default_sampling_rate(),
            duration_seconds: default_duration_seconds(),
            hop_length: default_hop_length(),
            n_fft: default_n_fft(),
            n_mels: default_n_mels(),
            fmin_hz: default_fmin_hz(),
            fmax_hz: default_fmax_hz(),
            trim_top_db: default_trim_top_db(),
        }
    }
}

impl SpectrogramConfig {
    /// Fixed per-file sample count: `sampling_rate * duration_seconds`.
    pub fn samples(&self) -> usize {
        (self.sampling_rate as f64 * self.duration_seconds as f64).round() as usize
    }

    /// Load from a TOML file, or fall back to defaults when no path is given.
    ///
    /// The result is validated either way, so an invalid file fails here
    /// rather than partway through a batch.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;
                toml::from_str(&text).map_err(|source| ConfigError::Parse {
                    path: path.to_path_buf(),
                    source,
                })?
            }
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Check parameter invariants. Called once before any file is processed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sampling_rate == 0 {
            return Err(ConfigError::ZeroSamplingRate);
        }
        if !(self.duration_seconds > 0.0) || !self.duration_seconds.is_finite() {
            return Err(ConfigError::NonPositiveDuration(self.duration_seconds));
        }
        if self.hop_length == 0 {
            return Err(ConfigError::ZeroHopLength);
        }
        if !self.n_fft.is_power_of_two() {
            return Err(ConfigError::FftSizeNotPowerOfTwo(self.n_fft));
        }
        if self.n_fft < self.hop_length {
            return Err(ConfigError::HopExceedsFftSize {
                n_fft: self.n_fft,
                hop_length: self.hop_length,
            });
        }
        if self.n_mels == 0 {
            return Err(ConfigError::ZeroMelBands);
        }
        let nyquist = self.sampling_rate as f32 / 2.0;
        if !(self.fmin_hz >= 0.0 && self.fmin_hz < self.fmax_hz && self.fmax_hz <= nyquist) {
            return Err(ConfigError::InvalidMelRange {
                fmin_hz: self.fmin_hz,
                fmax_hz: self.fmax_hz,
                sampling_rate: self.sampling_rate,
            });
        }
        if !(self.trim_top_db > 0.0) || !self.trim_top_db.is_finite() {
            return Err(ConfigError::NonPositiveTrimThreshold(self.trim_top_db));
        }
        Ok(())
    }
}

fn default_sampling_rate() -> u32 {
    44_100
}

fn default_duration_seconds() -> f32 {
    4.0
}

fn default_hop_length() -> usize {
    512
}

fn default_n_fft() -> usize {
    2_048
}

fn default_n_mels() -> usize {
    128
}

fn default_fmin_hz() -> f32 {
    20.0
}

fn default_fmax_hz() -> f32 {
    22_050.0
}

fn default_trim_top_db() -> f32 {
    60.0
}

/// Errors from loading or validating a configuration. All are fatal at
/// startup; none are produced mid-batch.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the config file.
    #[error("Failed to read config {path}: {source}")]
    Read {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },
    /// Config file is not valid TOML for this schema.
    #[error("Failed to parse config {path}: {source}")]
    Parse {
        /// Path that failed to parse.
        path: PathBuf,
        /// Underlying TOML error.
        source: toml::de::Error,
    },
    /// `sampling_rate` is zero.
    #[error("sampling_rate must be nonzero")]
    ZeroSamplingRate,
    /// `duration_seconds` is zero, negative, or non-finite.
    #[error("duration_seconds must be positive, got {0}")]
    NonPositiveDuration(f32),
    /// `hop_length` is zero.
    #[error("hop_length must be nonzero")]
    ZeroHopLength,
    /// `n_fft` is not a power of two (the FFT is radix-2).
    #[error("n_fft must be a power of two, got {0}")]
    FftSizeNotPowerOfTwo(usize),
    /// `hop_length` exceeds `n_fft`, which would skip samples entirely.
    #[error("n_fft ({n_fft}) must be at least hop_length ({hop_length})")]
    HopExceedsFftSize {
        /// Configured FFT size.
        n_fft: usize,
        /// Configured hop length.
        hop_length: usize,
    },
    /// `n_mels` is zero.
    #[error("n_mels must be nonzero")]
    ZeroMelBands,
    /// The filterbank bounds are out of order or exceed Nyquist.
    #[error(
        "Mel range {fmin_hz}..{fmax_hz} Hz is invalid for sampling rate {sampling_rate} \
         (need 0 <= fmin < fmax <= sampling_rate/2)"
    )]
    InvalidMelRange {
        /// Configured lower bound.
        fmin_hz: f32,
        /// Configured upper bound.
        fmax_hz: f32,
        /// Configured sample rate.
        sampling_rate: u32,
    },
    /// `trim_top_db` is zero, negative, or non-finite.
    #[error("trim_top_db must be positive, got {0}")]
    NonPositiveTrimThreshold(f32),
}
