use std::time::{Duration, Instant};

use serde::Serialize;

use crate::transcode_task::{FileTask, TaskStatus};

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchStatus {
    Idle,
    Running,
    Completed,
    Cancelled,
    Failed,
}

impl BatchStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, BatchStatus::Completed | BatchStatus::Cancelled | BatchStatus::Failed)
    }
}

/// Read-only view of a batch handed to the presentation side.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BatchSnapshot {
    pub processed: usize,
    pub failed: usize,
    pub total: usize,
    pub progress: f64,
    pub remaining: Option<Duration>,
}

/// The worker's private record of a batch.
#[derive(Debug)]
pub struct BatchState {
    pub tasks: Vec<FileTask>,
    pub processed: usize,
    pub failed: usize,
    pub started: Instant,
    pub status: BatchStatus,
}

impl BatchState {
    pub fn new(tasks: Vec<FileTask>) -> Self {
        BatchState {
            tasks,
            processed: 0,
            failed: 0,
            started: Instant::now(),
            status: BatchStatus::Idle,
        }
    }

    pub fn total(&self) -> usize {
        self.tasks.len()
    }

    pub fn attempted(&self) -> usize {
        self.processed + self.failed
    }

    pub fn set_task_status(&mut self, index: usize, status: TaskStatus) {
        if let Some(task) = self.tasks.get_mut(index) {
            task.status = status;
        }
        match status {
            TaskStatus::Done => self.processed += 1,
            TaskStatus::Failed => self.failed += 1,
            TaskStatus::Pending | TaskStatus::Running => (),
        }
    }

    pub fn snapshot(&self) -> BatchSnapshot {
        self.snapshot_at(self.started.elapsed())
    }

    pub fn snapshot_at(&self, elapsed: Duration) -> BatchSnapshot {
        let total = self.total();
        BatchSnapshot {
            processed: self.processed,
            failed: self.failed,
            total,
            progress: match total {
                0 => 0.0,
                _ => 100.0 * self.attempted() as f64 / total as f64,
            },
            remaining: estimate_remaining(elapsed, self.attempted(), total),
        }
    }
}

/// Mean time per attempted task times the number of tasks not yet attempted.
/// `None` until a task has been attempted.
pub fn estimate_remaining(elapsed: Duration, attempted: usize, total: usize) -> Option<Duration> {
    if attempted == 0 {
        return None;
    }
    let per_task = elapsed.div_f64(attempted as f64);
    Some(per_task.mul_f64(total.saturating_sub(attempted) as f64))
}
