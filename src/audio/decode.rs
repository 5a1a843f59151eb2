use std::fs::File;
use std::path::{Path, PathBuf};

use symphonia::core::{
    audio::SampleBuffer, codecs::DecoderOptions, errors::Error as SymphoniaError,
    formats::FormatOptions, io::MediaSourceStream, meta::MetadataOptions, probe::Hint,
};
use thiserror::Error;

/// Raw decoded audio in interleaved `f32` samples.
pub(crate) struct DecodedAudio {
    pub(crate) samples: Vec<f32>,
    pub(crate) sample_rate: u32,
    pub(crate) channels: u16,
}

/// Errors from opening or decoding one input file. Always scoped to a single
/// file; the batch records them and moves on.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The path could not be opened for reading.
    #[error("Failed to open {path}: {source}")]
    Open {
        /// Path that failed to open.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },
    /// No registered format reader recognizes the file.
    #[error("{path} is not recognizable audio: {source}")]
    Probe {
        /// Path that failed to probe.
        path: PathBuf,
        /// Underlying probe error.
        source: SymphoniaError,
    },
    /// The container holds no default audio track.
    #[error("No decodable audio track in {0}")]
    NoTrack(PathBuf),
    /// The track does not declare a sample rate.
    #[error("Missing sample rate in {0}")]
    MissingSampleRate(PathBuf),
    /// The track does not declare a channel layout.
    #[error("Missing channel layout in {0}")]
    MissingChannels(PathBuf),
    /// No codec is available for the track.
    #[error("No decoder available for {path}: {source}")]
    UnsupportedCodec {
        /// Path whose codec is unsupported.
        path: PathBuf,
        /// Underlying codec error.
        source: SymphoniaError,
    },
    /// Reading or decoding packets failed partway through.
    #[error("Failed while decoding {path}: {source}")]
    Decode {
        /// Path that failed mid-decode.
        path: PathBuf,
        /// Underlying decode error.
        source: SymphoniaError,
    },
    /// The stream decoded without error but produced no samples.
    #[error("Decoded zero samples from {0}")]
    EmptyStream(PathBuf),
}

/// Decode a file into interleaved `f32` samples at its native rate.
pub(crate) fn decode_file(path: &Path) -> Result<DecodedAudio, DecodeError> {
    let file = File::open(path).map_err(|source| DecodeError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());
    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|ext| ext.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|source| DecodeError::Probe {
            path: path.to_path_buf(),
            source,
        })?;
    let mut format = probed.format;
    let track = format
        .default_track()
        .ok_or_else(|| DecodeError::NoTrack(path.to_path_buf()))?;
    let codec_params = &track.codec_params;
    let sample_rate = codec_params
        .sample_rate
        .ok_or_else(|| DecodeError::MissingSampleRate(path.to_path_buf()))?;
    let channels = codec_params
        .channels
        .ok_or_else(|| DecodeError::MissingChannels(path.to_path_buf()))?
        .count() as u16;

    let mut decoder = symphonia::default::get_codecs()
        .make(codec_params, &DecoderOptions::default())
        .map_err(|source| DecodeError::UnsupportedCodec {
            path: path.to_path_buf(),
            source,
        })?;

    let mut samples = Vec::new();
    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            // End of stream surfaces as an IO error.
            Err(SymphoniaError::IoError(_)) => break,
            Err(source) => {
                return Err(DecodeError::Decode {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        let audio_buf = match decoder.decode(&packet) {
            Ok(audio_buf) => audio_buf,
            // Recoverable corruption in one packet; skip it.
            Err(SymphoniaError::DecodeError(_)) => continue,
            Err(source) => {
                return Err(DecodeError::Decode {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        let spec = *audio_buf.spec();
        let mut sample_buf = SampleBuffer::<f32>::new(audio_buf.capacity() as u64, spec);
        sample_buf.copy_interleaved_ref(audio_buf);
        samples.extend_from_slice(sample_buf.samples());
    }

    if samples.is_empty() {
        return Err(DecodeError::EmptyStream(path.to_path_buf()));
    }

    Ok(DecodedAudio {
        samples,
        sample_rate: sample_rate.max(1),
        channels: channels.max(1),
    })
}
