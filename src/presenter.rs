use std::io::Write;
use std::sync::mpsc::{Receiver, TryRecvError};
use std::thread;
use std::time::Duration;

use human_repr::HumanDuration;
use kdam::{term, tqdm, Bar, BarExt};

use crate::cancel::CancelToken;
use crate::queue_processor::QueueProcessorMessage;
use crate::transcode_state::BatchStatus;

pub const CANCELLING_TEXT: &str = "Cancelling... (waiting for current file to finish)";

/// Something that turns worker events into output.
pub trait Presenter {
    fn apply(&mut self, msg: &QueueProcessorMessage);
}

/// Polls `rx` every `poll_interval` until the batch reaches a terminal state,
/// handing each event to `presenter`. Returns `None` if the worker went away
/// without saying how it ended.
pub fn drain(
    rx: &Receiver<QueueProcessorMessage>,
    presenter: &mut dyn Presenter,
    cancel: &CancelToken,
    poll_interval: Duration,
) -> Option<BatchStatus> {
    let mut cancel_seen = false;
    loop {
        if !cancel_seen && cancel.is_cancelled() {
            cancel_seen = true;
            presenter.apply(&QueueProcessorMessage::Status(String::from(CANCELLING_TEXT)));
        }
        loop {
            match rx.try_recv() {
                Ok(msg) => {
                    presenter.apply(&msg);
                    if let QueueProcessorMessage::StateChanged(status) = msg {
                        if status.is_terminal() {
                            return Some(status);
                        }
                    }
                },
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => return None,
            }
        }
        thread::sleep(poll_interval);
    }
}

pub fn format_remaining(remaining: Option<Duration>) -> String {
    match remaining {
        None => String::from("--:--:--"),
        Some(d) => format!("{}", d.as_secs_f64().round().human_duration()),
    }
}

/// Two kdam bars: the whole batch on top, the current file below it.
pub struct TerminalPresenter {
    overall: Bar,
    file: Bar,
}

impl TerminalPresenter {
    pub fn new() -> Self {
        term::init(false);
        TerminalPresenter {
            overall: tqdm!(
                total = 100,
                desc = "0/0 files processed",
                position = 0,
                force_refresh = true
            ),
            file: tqdm!(
                total = 100,
                desc = "No file processing",
                position = 1,
                force_refresh = true
            ),
        }
    }

    fn print(&mut self, text: String) {
        let _ = self.overall.write(text);
    }
}

impl Presenter for TerminalPresenter {
    fn apply(&mut self, msg: &QueueProcessorMessage) {
        match msg {
            QueueProcessorMessage::StateChanged(status) => {
                if status.is_terminal() {
                    let _ = self.file.refresh();
                    let _ = self.overall.refresh();
                    eprintln!();
                }
            },
            QueueProcessorMessage::TaskStarted(task) => {
                self.file = tqdm!(
                    total = 100,
                    desc = task.file_name.clone(),
                    position = 1,
                    force_refresh = true
                );
                self.overall.set_description(format!("{}/{} files", task.index + 1, task.total));
                let _ = self.overall.refresh();
            },
            QueueProcessorMessage::Progress(progress) => {
                let _ = self.file.update_to(progress.round() as usize);
            },
            QueueProcessorMessage::TaskFinished(snapshot) => {
                self.overall.set_description(format!("{}/{} files processed", snapshot.processed, snapshot.total));
                self.overall.set_postfix(format!(
                    "{} failed, est. time remaining {}",
                    snapshot.failed,
                    format_remaining(snapshot.remaining)
                ));
                let _ = self.overall.update_to(snapshot.progress.round() as usize);
            },
            QueueProcessorMessage::Status(text) => self.print(text.clone()),
            QueueProcessorMessage::Error(text) => self.print(format!("Error: {}", text)),
        }
    }
}

/// One JSON object per event, for scripts and other front ends.
pub struct JsonPresenter<W: Write> {
    out: W,
}

impl<W: Write> JsonPresenter<W> {
    pub fn new(out: W) -> Self {
        JsonPresenter { out, }
    }
}

impl<W: Write> Presenter for JsonPresenter<W> {
    fn apply(&mut self, msg: &QueueProcessorMessage) {
        if let Ok(line) = serde_json::to_string(msg) {
            let _ = writeln!(self.out, "{}", line);
            let _ = self.out.flush();
        }
    }
}
