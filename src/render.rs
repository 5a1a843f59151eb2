//! Encoding a mel spectrogram as a grayscale image.

use std::path::{Path, PathBuf};

use image::GrayImage;
use thiserror::Error;
use tracing::warn;

use crate::dsp::MelSpectrogram;
use crate::preprocess::{DegenerateRange, scale_to_unit};

/// Errors from encoding one spectrogram image.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The matrix has no rows or no columns to draw.
    #[error("Spectrogram has no pixels to render for {0}")]
    EmptySpectrogram(PathBuf),
    /// The image could not be encoded or written.
    #[error("Failed to write image {path}: {source}")]
    Write {
        /// Destination path of the image.
        path: PathBuf,
        /// Underlying image error.
        source: image::ImageError,
    },
}

/// Write `mel` to `path` as an 8-bit grayscale PNG.
///
/// Columns are time frames, rows are mel bands with the lowest band at the
/// bottom. Intensity is the dB value min-max scaled across the whole matrix;
/// a constant matrix (silent input) renders as all black rather than failing
/// the file.
pub fn save_png(mel: &MelSpectrogram, path: &Path) -> Result<(), RenderError> {
    if mel.frames() == 0 || mel.bands() == 0 {
        return Err(RenderError::EmptySpectrogram(path.to_path_buf()));
    }
    let scaled = match scale_to_unit(mel.values()) {
        Ok(scaled) => scaled,
        Err(DegenerateRange { value }) => {
            warn!(
                path = %path.display(),
                value,
                "Spectrogram has zero dynamic range; rendering flat image"
            );
            vec![0.0_f32; mel.values().len()]
        }
    };

    let width = mel.frames() as u32;
    let height = mel.bands() as u32;
    let mut img = GrayImage::new(width, height);
    for frame in 0..mel.frames() {
        for band in 0..mel.bands() {
            let v = scaled[frame * mel.bands() + band];
            let level = (v * 255.0).round().clamp(0.0, 255.0) as u8;
            // Low bands at the bottom of the image.
            img.put_pixel(frame as u32, height - 1 - band as u32, image::Luma([level]));
        }
    }
    img.save(path).map_err(|source| RenderError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SpectrogramConfig;
    use crate::dsp::MelSpectrogramExtractor;
    use tempfile::TempDir;

    fn test_config() -> SpectrogramConfig {
        SpectrogramConfig {
            sampling_rate: 8_000,
            duration_seconds: 0.5,
            hop_length: 256,
            n_fft: 1_024,
            n_mels: 32,
            fmin_hz: 20.0,
            fmax_hz: 4_000.0,
            trim_top_db: 60.0,
        }
    }

    fn extract(samples: &[f32]) -> MelSpectrogram {
        MelSpectrogramExtractor::new(&test_config())
            .unwrap()
            .extract(samples)
    }

    #[test]
    fn writes_png_with_matrix_dimensions() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tone.png");
        let config = test_config();
        let samples: Vec<f32> = (0..config.samples())
            .map(|i| {
                let t = i as f32 / config.sampling_rate as f32;
                (2.0 * std::f32::consts::PI * 440.0 * t).sin() * 0.5
            })
            .collect();
        let mel = extract(&samples);
        save_png(&mel, &path).unwrap();

        let img = image::open(&path).unwrap().to_luma8();
        assert_eq!(img.width(), mel.frames() as u32);
        assert_eq!(img.height(), mel.bands() as u32);
    }

    #[test]
    fn silent_input_renders_flat_black_instead_of_failing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("silence.png");
        let mel = extract(&vec![0.0_f32; 4_000]);
        save_png(&mel, &path).unwrap();

        let img = image::open(&path).unwrap().to_luma8();
        assert!(img.pixels().all(|p| p.0[0] == 0));
    }

    #[test]
    fn unwritable_destination_is_a_write_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("no_such_dir").join("out.png");
        let mel = extract(&vec![0.1_f32; 2_000]);
        assert!(matches!(
            save_png(&mel, &path),
            Err(RenderError::Write { .. })
        ));
    }
}
