use thiserror::Error;

/// A constant sequence was handed to min-max scaling, so no range exists to
/// rescale. Callers pick an explicit fallback instead of dividing by zero.
#[derive(Debug, Clone, Copy, Error)]
#[error("Cannot min-max scale a constant sequence (all values equal {value})")]
pub struct DegenerateRange {
    /// The single value every element holds.
    pub value: f32,
}

/// Linearly rescale `values` so its global minimum maps to `lo` and its
/// global maximum to `hi`.
///
/// An empty slice stays empty. A constant slice is a `DegenerateRange`
/// error; it never silently produces NaN.
pub fn scale_to_range(values: &[f32], lo: f32, hi: f32) -> Result<Vec<f32>, DegenerateRange> {
    if values.is_empty() {
        return Ok(Vec::new());
    }
    let min = values.iter().copied().fold(f32::INFINITY, f32::min);
    let max = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let span = max - min;
    if !(span > 0.0) || !span.is_finite() {
        return Err(DegenerateRange { value: max });
    }
    Ok(values
        .iter()
        .map(|&v| (v - min) / span * (hi - lo) + lo)
        .collect())
}

/// Rescale to the unit interval.
pub fn scale_to_unit(values: &[f32]) -> Result<Vec<f32>, DegenerateRange> {
    scale_to_range(values, 0.0, 1.0)
}
