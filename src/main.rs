#![deny(missing_docs)]
#![deny(warnings)]

//! Command-line entry point: convert a directory of audio recordings into
//! mel-spectrogram PNGs.

use std::path::PathBuf;

use melpress::batch;
use melpress::config::SpectrogramConfig;
use melpress::logging;

struct Options {
    input_dir: PathBuf,
    output_dir: PathBuf,
    config_path: Option<PathBuf>,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let Some(options) = parse_args(std::env::args().skip(1).collect())? else {
        return Ok(());
    };
    if let Err(err) = logging::init() {
        eprintln!("Logging disabled: {err}");
    }
    let config = SpectrogramConfig::load_or_default(options.config_path.as_deref())
        .map_err(|err| err.to_string())?;
    let summary = batch::convert_directory(&config, &options.input_dir, &options.output_dir, None)
        .map_err(|err| err.to_string())?;
    tracing::info!(
        written = summary.written.len(),
        failed = summary.failures.len(),
        "Batch finished"
    );
    for failure in &summary.failures {
        eprintln!("{}: {}", failure.path.display(), failure.error);
    }
    Ok(())
}

fn parse_args(args: Vec<String>) -> Result<Option<Options>, String> {
    let mut input_dir = None;
    let mut output_dir = None;
    let mut config_path = None;

    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "-h" | "--help" => {
                println!("{}", help_text());
                return Ok(None);
            }
            "--config" => {
                idx += 1;
                let value = args
                    .get(idx)
                    .ok_or_else(|| "--config requires a value".to_string())?;
                config_path = Some(PathBuf::from(value));
            }
            arg if arg.starts_with('-') => {
                return Err(format!("Unknown option {arg}. Use --help for usage."));
            }
            arg => {
                if input_dir.is_none() {
                    input_dir = Some(PathBuf::from(arg));
                } else if output_dir.is_none() {
                    output_dir = Some(PathBuf::from(arg));
                } else {
                    return Err(format!("Unexpected argument {arg}"));
                }
            }
        }
        idx += 1;
    }

    let Some(input_dir) = input_dir else {
        println!("{}", help_text());
        return Ok(None);
    };
    let output_dir = output_dir.ok_or_else(|| "Missing output directory".to_string())?;
    Ok(Some(Options {
        input_dir,
        output_dir,
        config_path,
    }))
}

fn help_text() -> String {
    [
        "Usage: melpress <input-dir> <output-dir> [--config <path>]",
        "",
        "Converts every audio file directly inside <input-dir> into a",
        "mel-spectrogram PNG inside <output-dir>, one image per input,",
        "named <input-file-name>.png.",
        "",
        "Options:",
        "  --config <path>   TOML file with extraction parameters",
        "  -h, --help        Show this help",
    ]
    .join("\n")
}
