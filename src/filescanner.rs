use std::fs;
use std::path::{self, Path, PathBuf};

use tracing::warn;

use crate::error::CompressorError;
use crate::fstools::require_directory;

/// Lower-case extensions recognised as video files.
pub const VIDEO_EXTENSIONS: [&str; 9] = ["mp4", "mov", "avi", "mkv", "wmv", "flv", "webm", "m4v", "3gp"];

#[derive(Default)]
pub struct FileScanner;

impl FileScanner {
    pub fn new() -> Self {
        FileScanner
    }

    /// Returns the absolute paths of every video file under `dirpath`,
    /// sorted by their byte representation.
    pub fn scan(&self, dirpath: &Path) -> Result<Vec<PathBuf>, CompressorError> {
        require_directory(dirpath)?;
        let root = path::absolute(dirpath).map_err(|err| CompressorError::invalid_directory(dirpath, err.to_string()))?;

        let mut files = vec![];
        let mut dirpaths = vec![root];
        while let Some(current_dir) = dirpaths.pop() {
            let entries = match fs::read_dir(&current_dir) {
                Ok(entries) => entries,
                Err(err) => {
                    warn!("skipping unreadable directory {:?}: {}", current_dir, err);
                    continue;
                },
            };
            for entry in entries.filter_map(|e| e.ok()) {
                if let Ok(ft) = entry.file_type() {
                    let p = entry.path();
                    // symlinked files count; symlinked directories are not followed
                    if ft.is_file() || (ft.is_symlink() && p.is_file()) {
                        if is_video_file(&p) {
                            files.push(p);
                        }
                    } else if ft.is_dir() {
                        dirpaths.push(p);
                    }
                }
            }
        }

        files.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));
        Ok(files)
    }
}

pub fn is_video_file(path: &Path) -> bool {
    match path.extension() {
        Some(ext) => {
            let ext = ext.to_string_lossy().to_lowercase();
            VIDEO_EXTENSIONS.contains(&ext.as_str())
        },
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(root: &Path, relative: &str) -> PathBuf {
        let p = root.join(relative);
        fs::create_dir_all(p.parent().unwrap()).unwrap();
        fs::write(&p, b"").unwrap();
        p
    }

    #[test]
    fn test_is_video_file() {
        assert!(is_video_file(Path::new("a.mp4")));
        assert!(is_video_file(Path::new("dir/B.MKV")));
        assert!(is_video_file(Path::new("clip.3gp")));
        assert!(!is_video_file(Path::new("notes.txt")));
        assert!(!is_video_file(Path::new("mp4")));
        assert!(!is_video_file(Path::new("archive.mp4.zip")));
    }

    #[test]
    fn test_scan_recursive_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        let expected = vec![
            touch(root, "a/z.MOV"),
            touch(root, "b.mp4"),
            touch(root, "c/d/e.webm"),
            touch(root, "x.Mkv"),
        ];
        touch(root, "readme.txt");
        touch(root, "c/cover.jpg");
        fs::create_dir_all(root.join("empty")).unwrap();

        let files = FileScanner::new().scan(root).unwrap();
        assert_eq!(files, expected);
        assert!(files.iter().all(|f| f.is_absolute()));
    }

    #[test]
    fn test_scan_sorts_by_path_text() {
        let dir = tempfile::tempdir().unwrap();
        let dashed = touch(dir.path(), "a-b.mp4");
        let nested = touch(dir.path(), "a/z.mp4");
        let dotted = touch(dir.path(), "a.mp4");

        // '-' and '.' sort before '/'
        assert_eq!(FileScanner::new().scan(dir.path()).unwrap(), vec![dashed, dotted, nested]);
    }

    #[test]
    fn test_scan_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(FileScanner::new().scan(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_scan_not_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file = touch(dir.path(), "a.mp4");

        assert!(matches!(
            FileScanner::new().scan(&file),
            Err(CompressorError::InvalidDirectory { .. })
        ));
        assert!(matches!(
            FileScanner::new().scan(&dir.path().join("missing")),
            Err(CompressorError::InvalidDirectory { .. })
        ));
    }
}
