/// Triangular mel filterbank over linear-frequency power bins.
///
/// Band edges are spaced evenly on the HTK mel scale between `fmin` and
/// `fmax` (clamped to Nyquist), converted back to Hz and snapped to FFT bins.
/// Each filter rises linearly to 1.0 at its center bin and falls to zero at
/// its neighbors' centers.
pub(crate) struct MelFilterBank {
    bands: usize,
    filters: Vec<Vec<(usize, f32)>>,
}

impl MelFilterBank {
    pub(crate) fn new(sample_rate: u32, fft_len: usize, bands: usize, fmin: f32, fmax: f32) -> Self {
        let edges = band_edge_bins(sample_rate, fft_len, bands, fmin, fmax);
        let filters = build_filters(&edges, bands);
        Self { bands, filters }
    }

    pub(crate) fn bands(&self) -> usize {
        self.bands
    }

    /// Project a power spectrum onto the mel bands.
    pub(crate) fn apply_into(&self, power: &[f32], out: &mut [f32]) {
        for (idx, filter) in self.filters.iter().enumerate() {
            let mut sum = 0.0_f64;
            for &(bin, weight) in filter {
                let p = power.get(bin).copied().unwrap_or(0.0).max(0.0) as f64;
                sum += p * weight as f64;
            }
            if let Some(slot) = out.get_mut(idx) {
                *slot = sum as f32;
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn apply(&self, power: &[f32]) -> Vec<f32> {
        let mut out = vec![0.0_f32; self.bands];
        self.apply_into(power, &mut out);
        out
    }
}

fn band_edge_bins(
    sample_rate: u32,
    fft_len: usize,
    bands: usize,
    fmin: f32,
    fmax: f32,
) -> Vec<usize> {
    let sr = sample_rate.max(1) as f32;
    let nyquist = sr * 0.5;
    let fmax = fmax.min(nyquist).max(fmin);
    let mel_min = hz_to_mel(fmin);
    let mel_max = hz_to_mel(fmax);
    let mut hz_points = Vec::with_capacity(bands + 2);
    for i in 0..(bands + 2) {
        let t = i as f32 / (bands + 1) as f32;
        hz_points.push(mel_to_hz(mel_min + (mel_max - mel_min) * t));
    }
    hz_points
        .into_iter()
        .map(|hz| freq_to_bin(hz, sample_rate, fft_len))
        .collect()
}

fn build_filters(edges: &[usize], bands: usize) -> Vec<Vec<(usize, f32)>> {
    let mut filters = Vec::with_capacity(bands);
    for m in 0..bands {
        let left = edges[m];
        let center = edges[m + 1];
        let right = edges[m + 2].max(center + 1);
        filters.push(build_tri_filter(left, center, right));
    }
    filters
}

fn build_tri_filter(left: usize, center: usize, right: usize) -> Vec<(usize, f32)> {
    let mut weights = Vec::new();
    if right <= left {
        return weights;
    }
    for bin in left..=right {
        let w = if bin < center {
            if center == left {
                0.0
            } else {
                (bin as f32 - left as f32) / (center as f32 - left as f32)
            }
        } else if right == center {
            0.0
        } else {
            (right as f32 - bin as f32) / (right as f32 - center as f32)
        };
        if w > 0.0 {
            weights.push((bin, w));
        }
    }
    weights
}

pub(crate) fn freq_to_bin(freq_hz: f32, sample_rate: u32, fft_len: usize) -> usize {
    let nyquist = sample_rate.max(1) as f32 * 0.5;
    let freq = freq_hz.clamp(0.0, nyquist);
    (((freq * fft_len as f32) / sample_rate.max(1) as f32).floor() as usize).min(fft_len / 2)
}

pub(crate) fn hz_to_mel(hz: f32) -> f32 {
    2595.0_f32 * (1.0 + hz / 700.0).log10()
}

pub(crate) fn mel_to_hz(mel: f32) -> f32 {
    700.0_f32 * (10.0_f32.powf(mel / 2595.0) - 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mel_scale_round_trips() {
        for hz in [20.0_f32, 440.0, 4_000.0, 16_000.0] {
            let back = mel_to_hz(hz_to_mel(hz));
            assert!((back - hz).abs() < hz * 1e-4);
        }
    }

    #[test]
    fn band_edges_clamp_to_nyquist() {
        let edges = band_edge_bins(16_000, 512, 8, -10.0, 40_000.0);
        assert_eq!(edges.first().copied(), Some(0));
        assert_eq!(edges.last().copied(), Some(512 / 2));
    }

    #[test]
    fn band_edges_handle_fmax_below_fmin() {
        let edges = band_edge_bins(16_000, 512, 8, 10_000.0, 1_000.0);
        assert!(edges.iter().all(|&bin| bin <= 512 / 2));
    }

    #[test]
    fn filterbank_output_length_matches_band_count() {
        let bank = MelFilterBank::new(16_000, 512, 40, 20.0, 8_000.0);
        let power = vec![0.0_f32; 512 / 2 + 1];
        let mel = bank.apply(&power);
        assert_eq!(mel.len(), 40);
    }

    #[test]
    fn single_bin_impulse_lands_in_the_covering_band() {
        let bank = MelFilterBank::new(16_000, 512, 16, 20.0, 8_000.0);
        let mut power = vec![0.0_f32; 512 / 2 + 1];
        let tone_bin = freq_to_bin(2_000.0, 16_000, 512);
        power[tone_bin] = 1.0;
        let mel = bank.apply(&power);
        let hot = mel
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
            .unwrap();
        assert!(mel[hot] > 0.0);
        // The winning band's triangle must actually cover the tone bin.
        assert!(bank.filters[hot].iter().any(|&(bin, _)| bin == tone_bin));
    }
}
