use std::ffi::OsString;
use std::path::Path;
use std::process::{Command, Stdio};

use tracing::debug;

use crate::error::CompressorError;

pub fn duration_args(path: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = [
        "-v", "error",
        "-show_entries", "format=duration",
        "-of", "default=noprint_wrappers=1:nokey=1",
    ].iter().map(OsString::from).collect();
    args.push(path.as_os_str().to_os_string());
    args
}

/// Asks ffprobe for the container duration of `path`, in seconds.
pub fn probe_duration(ffprobe: &Path, path: &Path) -> Result<f64, CompressorError> {
    let output = Command::new(ffprobe)
        .args(duration_args(path))
        .stdin(Stdio::null())
        .output()
        .map_err(|err| CompressorError::probe_failed(path, format!("unable to run {:?}: {}", ffprobe, err)))?;
    if !output.status.success() {
        return Err(CompressorError::probe_failed(path, "ffprobe did not exit successfully."));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    debug!("ffprobe duration of {:?}: {:?}", path, stdout.trim());
    parse_duration(&stdout)
        .ok_or_else(|| CompressorError::probe_failed(path, format!("unexpected duration {:?}", stdout.trim())))
}

pub fn parse_duration(stdout: &str) -> Option<f64> {
    match stdout.trim().parse::<f64>() {
        Ok(seconds) if seconds.is_finite() && seconds >= 0.0 => Some(seconds),
        _ => None,
    }
}
