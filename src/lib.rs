//! Batch conversion of audio recordings into fixed-size mel-spectrogram
//! images.

/// Audio decoding, downmixing, and resampling.
pub mod audio;
/// Directory conversion pipeline.
pub mod batch;
/// Extraction parameters and TOML loading.
pub mod config;
/// FFT, STFT power frames, and mel projection.
pub mod dsp;
/// Logging setup.
pub mod logging;
/// Sample-buffer conditioning: trim, pad, rescale.
pub mod preprocess;
/// Spectrogram image encoding.
pub mod render;
