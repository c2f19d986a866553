use std::fs;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::cancel::CancelToken;
use crate::error::CompressorError;
use crate::ffmpeg::MediaTools;
use crate::ffmpeg::command::EncodeParameters;
use crate::transcode_state::{BatchSnapshot, BatchState, BatchStatus};
use crate::transcode_task::{FileTask, TaskStatus};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TaskStartedMessage {
    pub index: usize,
    pub total: usize,
    pub file_name: String,
}

/// Events published by the worker. The presentation side only ever sees
/// these, never the batch state itself.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum QueueProcessorMessage {
    StateChanged(BatchStatus),
    TaskStarted(TaskStartedMessage),
    Progress(f64),
    TaskFinished(BatchSnapshot),
    Status(String),
    Error(String),
}

/// What a finished batch leaves behind.
#[derive(Clone, Debug, PartialEq)]
pub struct BatchReport {
    pub status: BatchStatus,
    pub tasks: Vec<FileTask>,
    pub processed: usize,
    pub failed: usize,
}

/// Runs the tasks of one batch, in order, one at a time.
pub struct QueueProcessor {
    state: BatchState,
    parameters: EncodeParameters,
    tools: Arc<dyn MediaTools>,
    cancel: CancelToken,
    subscribers: Vec<Sender<QueueProcessorMessage>>,
}

impl QueueProcessor {
    pub fn new(tasks: Vec<FileTask>, parameters: EncodeParameters, tools: Arc<dyn MediaTools>, cancel: CancelToken) -> Self {
        QueueProcessor {
            state: BatchState::new(tasks),
            parameters,
            tools,
            cancel,
            subscribers: vec![],
        }
    }

    pub fn subscribe(&mut self) -> Receiver<QueueProcessorMessage> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    pub fn add_subscriber(&mut self, tx: Sender<QueueProcessorMessage>) {
        self.subscribers.push(tx);
    }

    fn publish(&self, msg: QueueProcessorMessage) {
        for tx in &self.subscribers {
            let _ = tx.send(msg.clone());
        }
    }

    fn set_status(&mut self, status: BatchStatus) {
        self.state.status = status;
        self.publish(QueueProcessorMessage::StateChanged(status));
    }

    pub fn run(mut self) -> BatchReport {
        let total = self.state.total();
        info!("starting batch of {} files", total);
        self.set_status(BatchStatus::Running);

        let mut status = BatchStatus::Completed;
        for index in 0..total {
            if self.cancel.is_cancelled() {
                info!("batch cancelled before file {} of {}", index + 1, total);
                status = BatchStatus::Cancelled;
                break;
            }
            if let Err(err) = self.process_transcode_task(index) {
                warn!("aborting batch: {}", err);
                self.publish(QueueProcessorMessage::Status(format!("Error: {}", err)));
                self.publish(QueueProcessorMessage::Error(format!("An error occurred during compression: {}", err)));
                status = BatchStatus::Failed;
                break;
            }
        }
        if status == BatchStatus::Completed && self.cancel.is_cancelled() {
            info!("batch cancelled during its last file");
            status = BatchStatus::Cancelled;
        }

        if let Some(text) = final_status_text(status, self.state.failed) {
            self.publish(QueueProcessorMessage::Status(text));
        }
        info!("batch finished: {:?} ({} processed, {} failed)", status, self.state.processed, self.state.failed);
        self.set_status(status);

        BatchReport {
            status: self.state.status,
            tasks: self.state.tasks,
            processed: self.state.processed,
            failed: self.state.failed,
        }
    }

    /// Encodes one file. Only errors that should end the whole batch are
    /// returned; a failed encode is recorded and swallowed.
    fn process_transcode_task(&mut self, index: usize) -> Result<(), CompressorError> {
        let task = self.state.tasks[index].clone();
        if let Some(parent) = task.destination.parent() {
            fs::create_dir_all(parent).map_err(|err| CompressorError::unexpected(parent, err))?;
        }

        let file_name = task.file_name();
        self.state.set_task_status(index, TaskStatus::Running);
        self.publish(QueueProcessorMessage::TaskStarted(TaskStartedMessage {
            index,
            total: self.state.total(),
            file_name: file_name.clone(),
        }));
        self.publish(QueueProcessorMessage::Status(format!("Compressing: {}", file_name)));
        self.publish(QueueProcessorMessage::Progress(0.0));

        let duration = match self.tools.probe_duration(&task.source) {
            Ok(seconds) => seconds,
            Err(err) => {
                warn!("{}; progress will not be reported", err);
                0.0
            },
        };

        let args = self.parameters.build_args(&task.source, &task.destination);
        debug!("encoding {:?} -> {:?}", task.source, task.destination);
        let subscribers = &self.subscribers;
        let result = self.tools.encode(&task.source, &args, duration, &mut |progress| {
            for tx in subscribers {
                let _ = tx.send(QueueProcessorMessage::Progress(progress));
            }
        });

        match result {
            Ok(()) => {
                self.state.set_task_status(index, TaskStatus::Done);
                self.publish(QueueProcessorMessage::Progress(100.0));
            },
            Err(err) => {
                warn!("{}", err);
                self.state.set_task_status(index, TaskStatus::Failed);
                self.publish(QueueProcessorMessage::Status(format!("Error compressing {}", file_name)));
            },
        }

        self.publish(QueueProcessorMessage::TaskFinished(self.state.snapshot()));
        Ok(())
    }
}

fn final_status_text(status: BatchStatus, failed: usize) -> Option<String> {
    match status {
        BatchStatus::Completed if failed > 0 => Some(format!("Compression completed with {} failures.", failed)),
        BatchStatus::Completed => Some(String::from("Compression completed successfully!")),
        BatchStatus::Cancelled => Some(String::from("Compression cancelled.")),
        _ => None,
    }
}
