use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong between reading the command line and the
/// last encode of a batch.
///
/// `InvalidDirectory`, `InvalidQuality` and `NoVideoFiles` reject a batch
/// before it starts. `TaskFailed` and `ProbeFailed` concern a single file and
/// never stop the batch. `UnexpectedError` aborts whatever is left of it.
#[derive(Error, Debug)]
pub enum CompressorError {
    #[error("Invalid directory {path:?}: {msg}")]
    InvalidDirectory { path: PathBuf, msg: String },

    #[error("Invalid CRF value {0:?}: must be a number between 0 and 51")]
    InvalidQuality(String),

    #[error("No video files found in {0:?}")]
    NoVideoFiles(PathBuf),

    #[error("Error compressing {path:?}: {msg}")]
    TaskFailed { path: PathBuf, msg: String, stderr: String },

    #[error("Unable to probe duration of {path:?}: {msg}")]
    ProbeFailed { path: PathBuf, msg: String },

    #[error("Unexpected error on {path:?}: {source}")]
    UnexpectedError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid {name}: {value:?} (expected one of: {expected})")]
    InvalidSetting {
        name: &'static str,
        value: String,
        expected: String,
    },

    #[error("Error reading config {path:?}: {msg}")]
    InvalidConfig { path: PathBuf, msg: String },

    #[error("{0} could not be found; install FFmpeg and make sure it is in your PATH")]
    ToolNotFound(String),
}

impl CompressorError {
    pub fn invalid_directory(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        CompressorError::InvalidDirectory {
            path: path.into(),
            msg: msg.into(),
        }
    }

    pub fn task_failed(path: impl Into<PathBuf>, msg: impl Into<String>, stderr: impl Into<String>) -> Self {
        CompressorError::TaskFailed {
            path: path.into(),
            msg: msg.into(),
            stderr: stderr.into(),
        }
    }

    pub fn probe_failed(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        CompressorError::ProbeFailed {
            path: path.into(),
            msg: msg.into(),
        }
    }

    pub fn unexpected(path: impl Into<PathBuf>, source: io::Error) -> Self {
        CompressorError::UnexpectedError {
            path: path.into(),
            source,
        }
    }

    pub fn invalid_setting(name: &'static str, value: &str, expected: &[&str]) -> Self {
        CompressorError::InvalidSetting {
            name,
            value: String::from(value),
            expected: expected.join(", "),
        }
    }

    /// Whether this error rejects a batch outright, as opposed to
    /// concerning one file of it.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            CompressorError::InvalidDirectory { .. }
                | CompressorError::InvalidQuality(_)
                | CompressorError::NoVideoFiles(_)
                | CompressorError::InvalidSetting { .. }
        )
    }
}
