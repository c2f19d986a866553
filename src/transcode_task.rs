use std::collections::HashSet;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::containers::Container;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Running,
    Done,
    Failed,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FileTask {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub status: TaskStatus,
}

impl FileTask {
    pub fn new(source: PathBuf, destination: PathBuf) -> Self {
        FileTask {
            source,
            destination,
            status: TaskStatus::Pending,
        }
    }

    pub fn file_name(&self) -> String {
        self.source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.source.display().to_string())
    }
}

/// One task per source, each writing to the same relative path under
/// `output_dir` with the container's extension.
///
/// When two sources in one directory differ only by extension, the later one
/// keeps its original extension in the name (`a.avi` -> `a.avi.mp4`) so no
/// two tasks share a destination.
pub fn build_tasks(sources: Vec<PathBuf>, input_dir: &Path, output_dir: &Path, container: Container) -> Vec<FileTask> {
    let mut taken = HashSet::new();
    sources
        .into_iter()
        .map(|source| {
            let mut destination = destination_for(&source, input_dir, output_dir, container);
            if !taken.insert(destination.clone()) {
                destination = disambiguated_destination(&source, &destination, container);
                taken.insert(destination.clone());
            }
            FileTask::new(source, destination)
        })
        .collect()
}

pub fn destination_for(source: &Path, input_dir: &Path, output_dir: &Path, container: Container) -> PathBuf {
    let relative = source.strip_prefix(input_dir).unwrap_or_else(|_| {
        Path::new(source.file_name().unwrap_or(source.as_os_str()))
    });
    let mut destination = output_dir.join(relative);
    destination.set_extension(Container::extension(container));
    destination
}

fn disambiguated_destination(source: &Path, destination: &Path, container: Container) -> PathBuf {
    let mut name = source.file_name().map(OsString::from).unwrap_or_default();
    name.push(".");
    name.push(Container::extension(container));
    destination.with_file_name(name)
}
