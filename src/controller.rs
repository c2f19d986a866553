use std::mem;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

use tracing::info;

use crate::cancel::CancelToken;
use crate::error::CompressorError;
use crate::ffmpeg::MediaTools;
use crate::ffmpeg::command::EncodeParameters;
use crate::filescanner::FileScanner;
use crate::fstools::{ensure_directory, require_directory, same_directory};
use crate::queue_processor::{BatchReport, QueueProcessor, QueueProcessorMessage};
use crate::settings::JobSettings;
use crate::transcode_task::build_tasks;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StartOutcome {
    Started,
    AlreadyRunning,
}

/// Front door for the presentation layer: start a batch, cancel it, and
/// listen to what the worker thread reports.
pub struct BatchController {
    tools: Arc<dyn MediaTools>,
    cancel: CancelToken,
    running: Arc<AtomicBool>,
    subscribers: Vec<Sender<QueueProcessorMessage>>,
    worker: Option<JoinHandle<BatchReport>>,
}

impl BatchController {
    pub fn new(tools: Arc<dyn MediaTools>) -> Self {
        BatchController::with_cancel_token(tools, CancelToken::new())
    }

    pub fn with_cancel_token(tools: Arc<dyn MediaTools>, cancel: CancelToken) -> Self {
        BatchController {
            tools,
            cancel,
            running: Arc::new(AtomicBool::new(false)),
            subscribers: vec![],
            worker: None,
        }
    }

    /// Events of the next batch started. The receiver disconnects once that
    /// batch's worker is gone.
    pub fn subscribe(&mut self) -> Receiver<QueueProcessorMessage> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn cancel(&self) {
        if self.is_running() {
            info!("cancellation requested; waiting for current file to finish");
            self.cancel.cancel();
        }
    }

    /// Validates `settings`, discovers the files and hands them to a new
    /// worker thread. Does nothing while a batch is running.
    pub fn start(&mut self, settings: &JobSettings) -> Result<StartOutcome, CompressorError> {
        if self.is_running() {
            return Ok(StartOutcome::AlreadyRunning);
        }
        // reap the previous worker, if any
        let _ = self.join();

        require_directory(&settings.input_dir)?;
        let parameters = EncodeParameters::from_settings(settings)?;
        if same_directory(&settings.input_dir, &settings.output_dir) {
            return Err(CompressorError::invalid_directory(
                &settings.output_dir,
                "output directory must differ from the input directory",
            ));
        }

        let sources = FileScanner::new().scan(&settings.input_dir)?;
        if sources.is_empty() {
            return Err(CompressorError::NoVideoFiles(settings.input_dir.clone()));
        }
        ensure_directory(&settings.output_dir)?;

        let input_dir = std::path::absolute(&settings.input_dir)
            .map_err(|err| CompressorError::invalid_directory(&settings.input_dir, err.to_string()))?;
        let tasks = build_tasks(sources, &input_dir, &settings.output_dir, settings.container);

        self.cancel.reset();
        let mut processor = QueueProcessor::new(tasks, parameters, Arc::clone(&self.tools), self.cancel.clone());
        for tx in mem::take(&mut self.subscribers) {
            processor.add_subscriber(tx);
        }

        self.running.store(true, Ordering::SeqCst);
        let running = Arc::clone(&self.running);
        self.worker = Some(thread::spawn(move || {
            let report = processor.run();
            running.store(false, Ordering::SeqCst);
            report
        }));
        Ok(StartOutcome::Started)
    }

    /// Waits for the current worker, returning its report.
    pub fn join(&mut self) -> Option<BatchReport> {
        self.worker.take().and_then(|handle| handle.join().ok())
    }
}
