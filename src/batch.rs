//! Directory-to-directory conversion pipeline.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;
use tracing::{info, warn};

use crate::audio::{self, DecodeError};
use crate::config::{ConfigError, SpectrogramConfig};
use crate::dsp::MelSpectrogramExtractor;
use crate::preprocess::{fit_to_length, trim_silence};
use crate::render::{self, RenderError};

/// Errors that abort the whole batch before or between files. Per-file
/// failures are not among these; they land in `BatchSummary::failures`.
#[derive(Debug, Error)]
pub enum BatchError {
    /// The configuration failed validation.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The input path is not a directory.
    #[error("Input path is not a directory: {0}")]
    InvalidInputDir(PathBuf),
    /// The input directory could not be enumerated.
    #[error("Failed to read input directory {path}: {source}")]
    ReadInputDir {
        /// Directory that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },
    /// The output directory could not be created.
    #[error("Failed to create output directory {path}: {source}")]
    CreateOutputDir {
        /// Directory that failed to create.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },
    /// The caller canceled the batch between files.
    #[error("Batch canceled")]
    Canceled,
}

/// Why one input file produced no image.
#[derive(Debug, Error)]
pub enum FileError {
    /// The file could not be decoded as audio.
    #[error(transparent)]
    Decode(#[from] DecodeError),
    /// The spectrogram image could not be written.
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// One recorded per-file failure.
#[derive(Debug)]
pub struct FileFailure {
    /// Input file that failed.
    pub path: PathBuf,
    /// What went wrong.
    pub error: FileError,
}

/// Outcome of a directory conversion.
#[derive(Debug, Default)]
pub struct BatchSummary {
    /// Images written, in processing order.
    pub written: Vec<PathBuf>,
    /// Files that failed, with causes.
    pub failures: Vec<FileFailure>,
}

/// Convert every regular file directly inside `input_dir` into a
/// mel-spectrogram PNG inside `output_dir`.
///
/// Each output is named after its input file with a `.png` suffix appended.
/// Subdirectories and symlinks are skipped. A file that fails to decode or
/// render is logged and recorded, and the batch moves on; only directory
/// level problems (or cancellation via `cancel`) abort the run. Nothing is
/// written for a file that fails partway.
pub fn convert_directory(
    config: &SpectrogramConfig,
    input_dir: &Path,
    output_dir: &Path,
    cancel: Option<&AtomicBool>,
) -> Result<BatchSummary, BatchError> {
    let mut extractor = MelSpectrogramExtractor::new(config)?;
    if !input_dir.is_dir() {
        return Err(BatchError::InvalidInputDir(input_dir.to_path_buf()));
    }
    std::fs::create_dir_all(output_dir).map_err(|source| BatchError::CreateOutputDir {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let mut inputs = Vec::new();
    let entries =
        std::fs::read_dir(input_dir).map_err(|source| BatchError::ReadInputDir {
            path: input_dir.to_path_buf(),
            source,
        })?;
    for entry_result in entries {
        let entry = match entry_result {
            Ok(entry) => entry,
            Err(err) => {
                warn!(
                    dir = %input_dir.display(),
                    error = %err,
                    "Failed to read directory entry"
                );
                continue;
            }
        };
        let path = entry.path();
        let file_type = match entry.file_type() {
            Ok(file_type) => file_type,
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "Failed to read file type"
                );
                continue;
            }
        };
        if file_type.is_file() && !file_type.is_symlink() {
            inputs.push(path);
        }
    }
    inputs.sort();

    let mut summary = BatchSummary::default();
    for path in inputs {
        if let Some(cancel) = cancel
            && cancel.load(Ordering::Relaxed)
        {
            return Err(BatchError::Canceled);
        }
        let output_path = image_path_for(output_dir, &path);
        match convert_file(config, &mut extractor, &path, &output_path) {
            Ok(()) => {
                info!(
                    input = %path.display(),
                    output = %output_path.display(),
                    "Converted"
                );
                summary.written.push(output_path);
            }
            Err(error) => {
                warn!(
                    input = %path.display(),
                    error = %error,
                    "Skipping file"
                );
                summary.failures.push(FileFailure { path, error });
            }
        }
    }
    Ok(summary)
}

/// Run the per-file pipeline: load, trim, fit to the configured length,
/// extract, render.
fn convert_file(
    config: &SpectrogramConfig,
    extractor: &mut MelSpectrogramExtractor,
    input: &Path,
    output: &Path,
) -> Result<(), FileError> {
    let buffer = audio::load_mono(input, config.sampling_rate)?;
    let trimmed = trim_silence(&buffer.samples, config.trim_top_db);
    let fitted = fit_to_length(&trimmed, config.samples(), true);
    let mel = extractor.extract(&fitted);
    render::save_png(&mel, output)?;
    Ok(())
}

/// `<output_dir>/<input_file_name>.png`, keeping the input's own extension
/// in the name so `kick.wav` and `kick.flac` cannot collide.
fn image_path_for(output_dir: &Path, input: &Path) -> PathBuf {
    let name = input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "unnamed".to_string());
    output_dir.join(format!("{name}.png"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hound::{SampleFormat, WavSpec, WavWriter};
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

    fn write_tone_wav(path: &Path, freq_hz: f32, seconds: f32) {
        let spec = WavSpec {
            channels: 1,
            sample_rate: 8_000,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };
        let mut writer = WavWriter::create(path, spec).unwrap();
        let len = (8_000.0 * seconds) as usize;
        for i in 0..len {
            let t = i as f32 / 8_000.0;
            let sample = (2.0 * std::f32::consts::PI * freq_hz * t).sin() * 0.5;
            writer.write_sample::<f32>(sample).unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn image_name_appends_png_to_the_full_file_name() {
        let out = image_path_for(Path::new("/out"), Path::new("/in/kick.wav"));
        assert_eq!(out, PathBuf::from("/out/kick.wav.png"));
    }

    #[test]
    fn converts_every_file_and_records_failures() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        write_tone_wav(&input.path().join("a.wav"), 440.0, 0.3);
        write_tone_wav(&input.path().join("b.wav"), 880.0, 1.0);
        std::fs::write(input.path().join("notes.txt"), "not audio").unwrap();
        std::fs::create_dir(input.path().join("nested")).unwrap();

        let summary =
            convert_directory(&test_config(), input.path(), output.path(), None).unwrap();

        assert_eq!(summary.written.len(), 2);
        assert_eq!(summary.failures.len(), 1);
        assert!(output.path().join("a.wav.png").is_file());
        assert!(output.path().join("b.wav.png").is_file());
        assert!(
            summary.failures[0]
                .path
                .ends_with("notes.txt")
        );
        assert!(matches!(summary.failures[0].error, FileError::Decode(_)));
    }

    #[test]
    fn images_have_the_configured_fixed_size() {
        let config = test_config();
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        // Short and long inputs both land on the same image width.
        write_tone_wav(&input.path().join("short.wav"), 440.0, 0.1);
        write_tone_wav(&input.path().join("long.wav"), 440.0, 2.0);

        convert_directory(&config, input.path(), output.path(), None).unwrap();

        let expected_frames = config.samples().div_ceil(config.hop_length) as u32;
        for name in ["short.wav.png", "long.wav.png"] {
            let img = image::open(output.path().join(name)).unwrap().to_luma8();
            assert_eq!(img.width(), expected_frames);
            assert_eq!(img.height(), config.n_mels as u32);
        }
    }

    #[test]
    fn missing_input_directory_aborts() {
        let output = TempDir::new().unwrap();
        let result = convert_directory(
            &test_config(),
            Path::new("/no/such/dir"),
            output.path(),
            None,
        );
        assert!(matches!(result, Err(BatchError::InvalidInputDir(_))));
    }

    #[test]
    fn invalid_config_aborts_before_touching_files() {
        let config = SpectrogramConfig {
            fmax_hz: 100_000.0,
            ..test_config()
        };
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        let result = convert_directory(&config, input.path(), output.path(), None);
        assert!(matches!(result, Err(BatchError::Config(_))));
    }

    #[test]
    fn cancellation_stops_the_batch() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        write_tone_wav(&input.path().join("a.wav"), 440.0, 0.2);
        let cancel = AtomicBool::new(true);
        let result =
            convert_directory(&test_config(), input.path(), output.path(), Some(&cancel));
        assert!(matches!(result, Err(BatchError::Canceled)));
        assert!(!output.path().join("a.wav.png").exists());
    }
}
