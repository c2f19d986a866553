use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, mpsc};

use crate::cancel::CancelToken;
use crate::error::CompressorError;
use crate::ffmpeg::MediaTools;

/// Scripted stand-in for ffmpeg/ffprobe.
///
/// Successful encodes create an empty destination file. Files are matched by
/// their file name.
#[derive(Default)]
pub struct FakeTools {
    duration: Option<f64>,
    progress: Vec<f64>,
    failing: Vec<String>,
    cancel_during: Option<(String, CancelToken)>,
    gate: Option<Mutex<mpsc::Receiver<()>>>,
    encoded: Mutex<Vec<String>>,
}

impl FakeTools {
    pub fn new() -> Self {
        FakeTools::default()
    }

    /// Probed duration; without one every probe fails.
    pub fn duration(mut self, seconds: f64) -> Self {
        self.duration = Some(seconds);
        self
    }

    /// Percentages reported by each encode that knows its duration.
    pub fn progress(mut self, progress: &[f64]) -> Self {
        self.progress = progress.to_vec();
        self
    }

    pub fn fail(mut self, file_name: &str) -> Self {
        self.failing.push(String::from(file_name));
        self
    }

    pub fn cancel_during(mut self, file_name: &str, token: CancelToken) -> Self {
        self.cancel_during = Some((String::from(file_name), token));
        self
    }

    /// Every encode waits for one message on `gate` before finishing.
    pub fn gated(mut self, gate: mpsc::Receiver<()>) -> Self {
        self.gate = Some(Mutex::new(gate));
        self
    }

    pub fn encoded(&self) -> Vec<String> {
        self.encoded.lock().unwrap().clone()
    }
}

fn name_of(path: &Path) -> String {
    path.file_name().unwrap().to_string_lossy().into_owned()
}

impl MediaTools for FakeTools {
    fn probe_duration(&self, source: &Path) -> Result<f64, CompressorError> {
        self.duration.ok_or_else(|| CompressorError::probe_failed(source, "no duration"))
    }

    fn encode(
        &self,
        source: &Path,
        args: &[OsString],
        total_seconds: f64,
        on_progress: &mut dyn FnMut(f64),
    ) -> Result<(), CompressorError> {
        let input = args.iter().position(|a| a == "-i").map(|i| PathBuf::from(&args[i + 1])).unwrap();
        assert_eq!(input, source);
        let name = name_of(source);
        self.encoded.lock().unwrap().push(name.clone());

        if let Some((target, token)) = &self.cancel_during {
            if *target == name {
                token.cancel();
            }
        }
        if total_seconds > 0.0 {
            for p in &self.progress {
                on_progress(*p);
            }
        }
        if let Some(gate) = &self.gate {
            let _ = gate.lock().unwrap().recv();
        }

        if self.failing.contains(&name) {
            return Err(CompressorError::task_failed(source, "ffmpeg exited with 1", "fake failure"));
        }
        let destination = PathBuf::from(args.last().unwrap());
        fs::write(&destination, b"").unwrap();
        Ok(())
    }
}
