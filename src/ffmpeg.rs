use std::ffi::OsString;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::{ChildStderr, Command, Stdio};
use std::thread;

use tracing::{debug, warn};

use crate::error::CompressorError;
use progress::ProgressParser;

pub mod command;
pub mod probe;
pub mod progress;

/// The two things a batch needs from the outside world.
pub trait MediaTools: Send + Sync {
    /// Duration of `source` in seconds.
    fn probe_duration(&self, source: &Path) -> Result<f64, CompressorError>;

    /// Runs one encode to completion, reporting percentages as they arrive.
    /// Any failure to produce the output is a `TaskFailed`.
    fn encode(
        &self,
        source: &Path,
        args: &[OsString],
        total_seconds: f64,
        on_progress: &mut dyn FnMut(f64),
    ) -> Result<(), CompressorError>;
}

#[derive(Clone, Debug)]
pub struct FFmpeg {
    pub ffmpeg: PathBuf,
    pub ffprobe: PathBuf,
}

impl Default for FFmpeg {
    fn default() -> Self {
        FFmpeg::new("ffmpeg", "ffprobe")
    }
}

impl FFmpeg {
    pub fn new(ffmpeg: impl Into<PathBuf>, ffprobe: impl Into<PathBuf>) -> Self {
        FFmpeg {
            ffmpeg: ffmpeg.into(),
            ffprobe: ffprobe.into(),
        }
    }

    /// Errors naming whichever of ffmpeg and ffprobe is missing.
    pub fn check_installed(&self) -> Result<(), CompressorError> {
        match (runs(&self.ffmpeg), runs(&self.ffprobe)) {
            (true, true) => Ok(()),
            (false, true) => Err(CompressorError::ToolNotFound(self.ffmpeg.display().to_string())),
            (true, false) => Err(CompressorError::ToolNotFound(self.ffprobe.display().to_string())),
            (false, false) => Err(CompressorError::ToolNotFound(format!(
                "{} and {}", self.ffmpeg.display(), self.ffprobe.display()))),
        }
    }
}

fn runs(program: &Path) -> bool {
    let cmd = Command::new(program)
        .arg("-version")
        .stdin(Stdio::null())
        .output();
    match cmd {
        Ok(output) => output.status.success(),
        Err(_) => false,
    }
}

impl MediaTools for FFmpeg {
    fn probe_duration(&self, source: &Path) -> Result<f64, CompressorError> {
        probe::probe_duration(&self.ffprobe, source)
    }

    fn encode(
        &self,
        source: &Path,
        args: &[OsString],
        total_seconds: f64,
        on_progress: &mut dyn FnMut(f64),
    ) -> Result<(), CompressorError> {
        debug!("{} {:?}", self.ffmpeg.display(), args);

        let mut command = Command::new(&self.ffmpeg);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        // keep terminal Ctrl-C away from ffmpeg so the running file can finish
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            command.process_group(0);
        }

        let mut child = command
            .spawn()
            .map_err(|err| CompressorError::task_failed(source, format!("There was an error executing ffmpeg: {err}"), ""))?;

        let stderr_thread = child.stderr.take().map(|stderr| thread::spawn(move || read_stderr_to_end(stderr)));

        if let Some(stdout) = child.stdout.take() {
            for progress in ProgressParser::new(BufReader::new(stdout), total_seconds) {
                on_progress(progress);
            }
        }

        let status = child
            .wait()
            .map_err(|err| CompressorError::task_failed(source, format!("There was an error waiting for the ffmpeg process: {err}"), ""))?;
        let stderr = stderr_thread
            .and_then(|handle| handle.join().ok())
            .unwrap_or_default();

        match status.success() {
            true => Ok(()),
            false => {
                let msg = match status.code() {
                    Some(code) => format!("ffmpeg exited with {}", code),
                    None => String::from("ffmpeg did not exit successfully."),
                };
                warn!("{} for {:?}: {}", msg, source, stderr.trim());
                Err(CompressorError::task_failed(source, msg, stderr))
            },
        }
    }
}

fn read_stderr_to_end(stderr: ChildStderr) -> String {
    let mut buf = Vec::new();
    match BufReader::new(stderr).read_to_end(&mut buf) {
        Ok(_) => String::from_utf8_lossy(&buf).into_owned(),
        Err(_) => String::new(),
    }
}
