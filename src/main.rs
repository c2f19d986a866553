pub mod cancel;
pub mod codecs;
pub mod config;
pub mod containers;
pub mod controller;
pub mod error;
pub mod ffmpeg;
pub mod filescanner;
pub mod fstools;
pub mod logging;
pub mod presenter;
pub mod quality;
pub mod queue_processor;
pub mod resolution;
pub mod settings;
pub mod transcode_state;
pub mod transcode_task;
#[cfg(test)]
mod testing;

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use rustop::opts;
use tracing::warn;

use cancel::CancelToken;
use config::Config;
use controller::BatchController;
use error::CompressorError;
use ffmpeg::FFmpeg;
use fstools::suggest_output_directory;
use presenter::{drain, JsonPresenter, TerminalPresenter};
use transcode_state::BatchStatus;

fn main() -> ExitCode {
    let (args, _rest) = opts! {
        synopsis "Compress every video file under a directory with ffmpeg.";
        opt format:Option<String>, desc:"Output format. [mp4, mkv, webm]";
        opt quality:Option<String>, desc:"Quality preset. [high, medium, low, custom]";
        opt crf:Option<String>, desc:"CRF for the custom preset, 0-51, lower is better quality.";
        opt resolution:Option<String>, desc:"Output resolution. [original, 4k, 1080p, 720p, 480p]";
        opt config:Option<String>, desc:"JSON file with default settings.";
        opt ffmpeg:Option<String>, desc:"ffmpeg binary to use.";
        opt ffprobe:Option<String>, desc:"ffprobe binary to use.";
        opt json:bool=false, desc:"Print progress events as JSON lines instead of progress bars.";
        opt log_level:Option<String>, desc:"Log filter used when RUST_LOG is unset. [error, warn, info, debug, trace]";
        param input:String, desc:"Input directory";
        param output:Option<String>, desc:"Output directory (default: <input>_compressed)";
    }.parse_or_exit();

    let mut config = match &args.config {
        Some(path) => match Config::load(&PathBuf::from(path)) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("{}", err);
                return ExitCode::FAILURE;
            },
        },
        None => Config::default(),
    };
    if let Some(format) = args.format { config.format = format; }
    if let Some(quality) = args.quality { config.quality = Some(quality); }
    if let Some(crf) = args.crf { config.crf = Some(crf); }
    if let Some(resolution) = args.resolution { config.resolution = resolution; }
    if let Some(ffmpeg) = args.ffmpeg { config.ffmpeg = PathBuf::from(ffmpeg); }
    if let Some(ffprobe) = args.ffprobe { config.ffprobe = PathBuf::from(ffprobe); }
    if let Some(log_level) = args.log_level { config.log_level = log_level; }

    logging::init_tracing(&config.log_level);

    let input = PathBuf::from(&args.input);
    let output = args.output.map(PathBuf::from);
    match run(&config, input, output, args.json) {
        Ok(code) => code,
        Err(err) if err.is_rejection() => {
            eprintln!("Error: {}", err);
            ExitCode::from(2)
        },
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        },
    }
}

fn run(config: &Config, input: PathBuf, output: Option<PathBuf>, json: bool) -> Result<ExitCode, CompressorError> {
    let tools = FFmpeg::new(&config.ffmpeg, &config.ffprobe);
    tools.check_installed()?;

    let output = output.unwrap_or_else(|| suggest_output_directory(&input));
    let settings = config.job_settings(input, output)?;

    let cancel = CancelToken::new();
    if let Err(err) = cancel.cancel_on_interrupt() {
        warn!("Ctrl-C will not cancel the batch: {}", err);
    }

    let mut controller = BatchController::with_cancel_token(Arc::new(tools), cancel.clone());
    let rx = controller.subscribe();
    controller.start(&settings)?;

    let poll_interval = config.poll_interval();
    let status = if json {
        drain(&rx, &mut JsonPresenter::new(io::stdout()), &cancel, poll_interval)
    } else {
        drain(&rx, &mut TerminalPresenter::new(), &cancel, poll_interval)
    };

    let report = controller.join();
    match (status, report) {
        (Some(BatchStatus::Completed), Some(report)) if report.failed == 0 => Ok(ExitCode::SUCCESS),
        _ => Ok(ExitCode::FAILURE),
    }
}
