use crate::config::{ConfigError, SpectrogramConfig};

use super::fft::{Complex32, Fft, hann_window};
use super::mel::MelFilterBank;
use super::stft::{fill_windowed, power_spectrum_into};

/// Power floor applied before taking logarithms.
const AMIN: f32 = 1e-10;
/// Dynamic range kept below the loudest value, in dB.
const TOP_DB: f32 = 80.0;

/// Decibel-scale mel spectrogram, stored frame-major:
/// `values[frame * bands + band]`, band 0 being the lowest frequency.
#[derive(Debug, Clone)]
pub struct MelSpectrogram {
    values: Vec<f32>,
    bands: usize,
    frames: usize,
}

impl MelSpectrogram {
    /// Number of mel bands (rows).
    pub fn bands(&self) -> usize {
        self.bands
    }

    /// Number of time frames (columns).
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Value at `[band, frame]`.
    pub fn value(&self, band: usize, frame: usize) -> f32 {
        self.values[frame * self.bands + band]
    }

    /// One frame's band values, lowest band first.
    pub fn frame(&self, frame: usize) -> &[f32] {
        &self.values[frame * self.bands..(frame + 1) * self.bands]
    }

    /// Flat frame-major view of the whole matrix.
    pub fn values(&self) -> &[f32] {
        &self.values
    }
}

/// Converts a mono sample buffer into a decibel-scale mel spectrogram.
///
/// Holds the Hann window, FFT plan, filterbank, and scratch buffers so a
/// single extractor can be reused across a whole batch.
pub struct MelSpectrogramExtractor {
    hop: usize,
    window: Vec<f32>,
    fft: Fft,
    mel_bank: MelFilterBank,
    fft_buf: Vec<Complex32>,
    power_buf: Vec<f32>,
}

impl MelSpectrogramExtractor {
    /// Build an extractor for a validated configuration.
    pub fn new(config: &SpectrogramConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let fft =
            Fft::new(config.n_fft).map_err(|_| ConfigError::FftSizeNotPowerOfTwo(config.n_fft))?;
        let mel_bank = MelFilterBank::new(
            config.sampling_rate,
            config.n_fft,
            config.n_mels,
            config.fmin_hz,
            config.fmax_hz,
        );
        Ok(Self {
            hop: config.hop_length,
            window: hann_window(config.n_fft),
            fft,
            mel_bank,
            fft_buf: vec![Complex32::default(); config.n_fft],
            power_buf: vec![0.0_f32; config.n_fft / 2 + 1],
        })
    }

    /// Extract the mel spectrogram of `samples` in dB relative to the
    /// loudest value in the matrix.
    ///
    /// Frames advance by `hop_length`; the tail frame is zero-padded. An
    /// empty buffer produces a single silence frame. Output is always
    /// finite, even for all-zero input.
    pub fn extract(&mut self, samples: &[f32]) -> MelSpectrogram {
        let bands = self.mel_bank.bands();
        let frame_count = if samples.is_empty() {
            1
        } else {
            samples.len().div_ceil(self.hop)
        };
        let mut values = vec![0.0_f32; frame_count * bands];
        for frame_idx in 0..frame_count {
            let start = frame_idx * self.hop;
            fill_windowed(&mut self.fft_buf, samples, start, &self.window);
            // Power-of-two length is checked at construction.
            if self.fft.forward(&mut self.fft_buf).is_err() {
                break;
            }
            power_spectrum_into(&self.fft_buf, &mut self.power_buf);
            let out = &mut values[frame_idx * bands..(frame_idx + 1) * bands];
            self.mel_bank.apply_into(&self.power_buf, out);
        }
        power_to_db_in_place(&mut values);
        MelSpectrogram {
            values,
            bands,
            frames: frame_count,
        }
    }
}

/// Convert raw mel power to decibels referenced to the matrix maximum,
/// flooring AMIN before the log and clamping TOP_DB below the peak.
fn power_to_db_in_place(values: &mut [f32]) {
    let peak = values.iter().copied().fold(0.0_f32, f32::max);
    let ref_db = 10.0 * peak.max(AMIN).log10();
    for value in values.iter_mut() {
        let db = 10.0 * value.max(AMIN).log10() - ref_db;
        *value = db.max(-TOP_DB);
    }
}
