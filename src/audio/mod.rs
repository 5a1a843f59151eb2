//! Decoding audio files into mono sample buffers at the analysis rate.

mod decode;
mod resample;

use std::path::Path;

pub use decode::DecodeError;

/// Mono samples plus the rate they are expressed at. After loading, the rate
/// always equals the configured sampling rate.
#[derive(Debug, Clone)]
pub struct AudioBuffer {
    /// Amplitude samples in [-1, 1].
    pub samples: Vec<f32>,
    /// Sample rate in Hz.
    pub sample_rate: u32,
}

impl AudioBuffer {
    /// Buffer length in seconds.
    pub fn duration_seconds(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / self.sample_rate as f32
    }
}

/// Decode `path`, downmix to mono, sanitize, and resample to `target_rate`.
pub fn load_mono(path: &Path, target_rate: u32) -> Result<AudioBuffer, DecodeError> {
    let decoded = decode::decode_file(path)?;
    let mono = downmix_to_mono(&decoded.samples, decoded.channels);
    let samples = resample::resample_linear(&mono, decoded.sample_rate, target_rate);
    Ok(AudioBuffer {
        samples,
        sample_rate: target_rate,
    })
}

fn downmix_to_mono(samples: &[f32], channels: u16) -> Vec<f32> {
    let channels = channels.max(1) as usize;
    if channels == 1 {
        return samples.iter().copied().map(sanitize_sample).collect();
    }
    let frames = samples.len() / channels;
    let mut mono = Vec::with_capacity(frames);
    for frame in 0..frames {
        let start = frame * channels;
        let end = start + channels;
        let slice = &samples[start..end.min(samples.len())];
        let mut sum = 0.0_f32;
        for &sample in slice {
            sum += sanitize_sample(sample);
        }
        mono.push(sum / channels as f32);
    }
    mono
}

fn sanitize_sample(sample: f32) -> f32 {
    if !sample.is_finite() {
        return 0.0;
    }
    let clamped = sample.clamp(-1.0, 1.0);
    if clamped != 0.0 && clamped.abs() < f32::MIN_POSITIVE {
        0.0
    } else {
        clamped
    }
}
