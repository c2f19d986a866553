use std::fs;
use std::path::{Path, PathBuf};

use crate::error::CompressorError;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DirEntryCategory {
    DoesNotExist,
    RegularFile,
    Directory,
    Unknown,
}

/// Classifies `path`, following symlinks.
pub fn classify_file(path: &Path) -> DirEntryCategory {
    match fs::metadata(path) {
        Ok(metadata) => {
            if metadata.is_file() {
                DirEntryCategory::RegularFile
            } else if metadata.is_dir() {
                DirEntryCategory::Directory
            } else {
                DirEntryCategory::Unknown
            }
        },
        Err(_) => DirEntryCategory::DoesNotExist,
    }
}

pub fn require_directory(path: &Path) -> Result<(), CompressorError> {
    match classify_file(path) {
        DirEntryCategory::Directory => Ok(()),
        DirEntryCategory::DoesNotExist => Err(CompressorError::invalid_directory(path, "does not exist")),
        _ => Err(CompressorError::invalid_directory(path, "not a directory")),
    }
}

/// Creates `path` and its parents, reporting failure as an invalid directory.
pub fn ensure_directory(path: &Path) -> Result<(), CompressorError> {
    fs::create_dir_all(path)
        .map_err(|err| CompressorError::invalid_directory(path, format!("failed to create: {err}")))
}

/// `<parent>/<name>_compressed`, the output directory suggested for `input`.
pub fn suggest_output_directory(input: &Path) -> PathBuf {
    let input = std::path::absolute(input).unwrap_or_else(|_| input.to_path_buf());
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| String::from("videos"));
    let parent = input.parent().unwrap_or(Path::new(""));
    parent.join(format!("{name}_compressed"))
}

/// True when both paths name the same existing directory.
pub fn same_directory(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
