use super::fft::Complex32;

/// Copy one windowed frame into the FFT buffer, zero-padding past the end of
/// the sample slice so the final partial frame is still a full transform.
pub(crate) fn fill_windowed(
    target: &mut [Complex32],
    samples: &[f32],
    start: usize,
    window: &[f32],
) {
    for (i, cell) in target.iter_mut().enumerate() {
        let src = samples.get(start + i).copied().unwrap_or(0.0);
        let win = window.get(i).copied().unwrap_or(1.0);
        *cell = Complex32::new(sanitize(src) * win, 0.0);
    }
}

/// Magnitude-squared spectrum of the first `out.len()` bins (n_fft/2 + 1).
pub(crate) fn power_spectrum_into(fft: &[Complex32], out: &mut [f32]) {
    for (bin, slot) in out.iter_mut().enumerate() {
        let c = fft.get(bin).copied().unwrap_or_default();
        *slot = (c.re * c.re + c.im * c.im).max(0.0);
    }
}

fn sanitize(sample: f32) -> f32 {
    if sample.is_finite() {
        sample.clamp(-1.0, 1.0)
    } else {
        0.0
    }
}
