/// Analysis window for the frame energy envelope, in samples.
const TRIM_FRAME_LEN: usize = 2_048;
/// Hop between energy frames, in samples.
const TRIM_HOP: usize = 512;

/// Strip leading and trailing runs of frames whose energy stays more than
/// `top_db` below the loudest frame.
///
/// The envelope is frame mean-square energy over hop-stepped windows, and
/// the threshold is relative to the buffer's own peak frame. An empty buffer
/// is returned as-is, and an all-silent buffer trims to empty; neither is an
/// error.
pub fn trim_silence(samples: &[f32], top_db: f32) -> Vec<f32> {
    if samples.is_empty() {
        return Vec::new();
    }
    let energies = frame_energies(samples);
    let peak = energies.iter().copied().fold(0.0_f32, f32::max);
    if peak <= 0.0 {
        return Vec::new();
    }
    let threshold = peak * 10.0_f32.powf(-top_db / 10.0);
    let first = energies.iter().position(|&e| e > threshold);
    let last = energies.iter().rposition(|&e| e > threshold);
    let (Some(first), Some(last)) = (first, last) else {
        return Vec::new();
    };
    let start = first * TRIM_HOP;
    let end = ((last + 1) * TRIM_HOP).min(samples.len());
    samples[start..end].to_vec()
}

fn frame_energies(samples: &[f32]) -> Vec<f32> {
    let mut energies = Vec::new();
    let mut start = 0usize;
    while start < samples.len() {
        let end = (start + TRIM_FRAME_LEN).min(samples.len());
        energies.push(mean_square(&samples[start..end]));
        start += TRIM_HOP;
    }
    energies
}

fn mean_square(frame: &[f32]) -> f32 {
    if frame.is_empty() {
        return 0.0;
    }
    let mut sum = 0.0_f64;
    for &sample in frame {
        let sample = sample as f64;
        sum += sample * sample;
    }
    (sum / frame.len() as f64) as f32
}
