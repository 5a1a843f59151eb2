//! Spectral feature extraction: FFT, STFT power frames, mel projection.

mod fft;
mod mel;
mod spectrogram;
mod stft;

pub use fft::FftError;
pub use spectrogram::{MelSpectrogram, MelSpectrogramExtractor};
