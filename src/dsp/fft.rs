use std::f32::consts::PI;

use thiserror::Error;

#[repr(C)]
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Complex32 {
    pub(crate) re: f32,
    pub(crate) im: f32,
}

impl Complex32 {
    pub(crate) fn new(re: f32, im: f32) -> Self {
        Self { re, im }
    }

    fn mul(self, other: Self) -> Self {
        Self {
            re: self.re * other.re - self.im * other.im,
            im: self.re * other.im + self.im * other.re,
        }
    }

    fn add(self, other: Self) -> Self {
        Self {
            re: self.re + other.re,
            im: self.im + other.im,
        }
    }

    fn sub(self, other: Self) -> Self {
        Self {
            re: self.re - other.re,
            im: self.im - other.im,
        }
    }
}

/// Errors from building or running the radix-2 transform.
#[derive(Debug, Error)]
pub enum FftError {
    /// The transform length is zero or not a power of two.
    #[error("FFT length must be a power of two, got {0}")]
    NotPowerOfTwo(usize),
    /// A buffer of the wrong length was handed to a prepared transform.
    #[error("FFT length mismatch: buffer {buffer}, transform {transform}")]
    LengthMismatch {
        /// Length of the supplied buffer.
        buffer: usize,
        /// Length the transform was prepared for.
        transform: usize,
    },
}

/// Radix-2 FFT with precomputed bit-reversal swaps and twiddle tables,
/// reused across every frame of a file and across files.
pub(crate) struct Fft {
    len: usize,
    swaps: Vec<(usize, usize)>,
    stages: Vec<Vec<Complex32>>,
}

impl Fft {
    pub(crate) fn new(len: usize) -> Result<Self, FftError> {
        if len == 0 || !len.is_power_of_two() {
            return Err(FftError::NotPowerOfTwo(len));
        }
        Ok(Self {
            len,
            swaps: build_swaps(len),
            stages: build_stages(len),
        })
    }

    pub(crate) fn forward(&self, buffer: &mut [Complex32]) -> Result<(), FftError> {
        if buffer.len() != self.len {
            return Err(FftError::LengthMismatch {
                buffer: buffer.len(),
                transform: self.len,
            });
        }
        for &(i, j) in &self.swaps {
            buffer.swap(i, j);
        }
        for stage in &self.stages {
            butterfly_stage(buffer, stage);
        }
        Ok(())
    }
}

pub(crate) fn hann_window(length: usize) -> Vec<f32> {
    if length <= 1 {
        return vec![1.0_f32; length.max(1)];
    }
    let denom = (length - 1) as f32;
    (0..length)
        .map(|n| 0.5_f32 * (1.0 - (2.0 * PI * n as f32 / denom).cos()))
        .collect()
}

fn build_swaps(len: usize) -> Vec<(usize, usize)> {
    let mut swaps = Vec::new();
    let mut j = 0usize;
    for i in 1..len {
        let mut bit = len >> 1;
        while j & bit != 0 {
            j ^= bit;
            bit >>= 1;
        }
        j ^= bit;
        if i < j {
            swaps.push((i, j));
        }
    }
    swaps
}

fn build_stages(len: usize) -> Vec<Vec<Complex32>> {
    let mut tables = Vec::new();
    let mut step = 2usize;
    while step <= len {
        let half = step / 2;
        let angle = -2.0_f32 * PI / step as f32;
        let mut stage = Vec::with_capacity(half);
        for i in 0..half {
            let theta = angle * i as f32;
            let (sin, cos) = theta.sin_cos();
            stage.push(Complex32::new(cos, sin));
        }
        tables.push(stage);
        step *= 2;
    }
    tables
}

fn butterfly_stage(buffer: &mut [Complex32], twiddles: &[Complex32]) {
    let half = twiddles.len();
    let step = half * 2;
    for start in (0..buffer.len()).step_by(step) {
        for i in 0..half {
            let u = buffer[start + i];
            let v = buffer[start + i + half].mul(twiddles[i]);
            buffer[start + i] = u.add(v);
            buffer[start + i + half] = u.sub(v);
        }
    }
}
