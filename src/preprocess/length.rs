/// Force a sample buffer to `target_len` samples.
///
/// Longer input is truncated to its first `target_len` samples when
/// `trim_long_data` is set, and passed through untouched when it is not
/// (callers that accept variable-length output rely on this). Shorter input
/// is zero-padded symmetrically: `padding / 2` zeros in front, the rest
/// behind, so odd padding puts the extra zero at the end.
pub fn fit_to_length(samples: &[f32], target_len: usize, trim_long_data: bool) -> Vec<f32> {
    if samples.len() > target_len {
        if trim_long_data {
            return samples[..target_len].to_vec();
        }
        return samples.to_vec();
    }
    let padding = target_len - samples.len();
    let offset = padding / 2;
    let mut out = Vec::with_capacity(target_len);
    out.resize(offset, 0.0);
    out.extend_from_slice(samples);
    out.resize(target_len, 0.0);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_length_input_is_unchanged() {
        let samples = vec![0.1_f32, 0.2, 0.3, 0.4];
        assert_eq!(fit_to_length(&samples, 4, true), samples);
        assert_eq!(fit_to_length(&samples, 4, false), samples);
    }

    #[test]
    fn long_input_is_truncated_to_prefix_when_trimming() {
        let samples: Vec<f32> = (0..10).map(|i| i as f32).collect();
        let out = fit_to_length(&samples, 4, true);
        assert_eq!(out, vec![0.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn long_input_passes_through_when_not_trimming() {
        let samples: Vec<f32> = (0..10).map(|i| i as f32).collect();
        let out = fit_to_length(&samples, 4, false);
        assert_eq!(out, samples);
    }

    #[test]
    fn short_input_is_padded_symmetrically() {
        let samples = vec![1.0_f32, 2.0, 3.0, 4.0];
        let out = fit_to_length(&samples, 10, true);
        assert_eq!(
            out,
            vec![0.0, 0.0, 0.0, 1.0, 2.0, 3.0, 4.0, 0.0, 0.0, 0.0]
        );
    }

    #[test]
    fn odd_padding_puts_the_extra_zero_at_the_end() {
        let samples = vec![1.0_f32, 2.0];
        let out = fit_to_length(&samples, 5, true);
        assert_eq!(out, vec![0.0, 1.0, 2.0, 0.0, 0.0]);
    }

    #[test]
    fn fitting_is_idempotent() {
        let long: Vec<f32> = (0..100).map(|i| (i as f32 * 0.1).sin()).collect();
        let once = fit_to_length(&long, 40, true);
        let twice = fit_to_length(&once, 40, true);
        assert_eq!(once, twice);

        let short = vec![0.5_f32; 7];
        let once = fit_to_length(&short, 40, true);
        let twice = fit_to_length(&once, 40, true);
        assert_eq!(once.len(), 40);
        assert_eq!(once, twice);
    }

    #[test]
    fn empty_input_becomes_all_zeros() {
        let out = fit_to_length(&[], 6, true);
        assert_eq!(out, vec![0.0; 6]);
    }
}
