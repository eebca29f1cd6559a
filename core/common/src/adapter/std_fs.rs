//! 標準ファイルシステム実装（std::fs を委譲）

use crate::error::Error;
use crate::ports::outbound::{FileMetadata, FileSystem};
use std::io::Write;
use std::path::{Path, PathBuf};

/// 標準ライブラリの fs をそのまま委譲する FileSystem 実装
#[derive(Debug, Clone, Default)]
pub struct StdFileSystem;

impl FileSystem for StdFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String, Error> {
        std::fs::read_to_string(path).map_err(|e| {
            Error::io_msg(format!("Failed to read '{}': {}", path.display(), e))
        })
    }

    fn write(&self, path: &Path, contents: &str) -> Result<(), Error> {
        std::fs::write(path, contents).map_err(|e| {
            Error::io_msg(format!("Failed to write '{}': {}", path.display(), e))
        })
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<(), Error> {
        std::fs::rename(from, to).map_err(|e| {
            Error::io_msg(format!(
                "Failed to rename '{}' to '{}': {}",
                from.display(),
                to.display(),
                e
            ))
        })
    }

    fn create_dir_all(&self, path: &Path) -> Result<(), Error> {
        std::fs::create_dir_all(path).map_err(|e| {
            Error::io_msg(format!("Failed to create directory '{}': {}", path.display(), e))
        })
    }

    fn metadata(&self, path: &Path) -> Result<FileMetadata, Error> {
        let m = std::fs::metadata(path).map_err(|e| {
            Error::io_msg(format!(
                "Failed to get metadata for '{}': {}",
                path.display(),
                e
            ))
        })?;
        Ok(FileMetadata::new(m.len(), m.is_file(), m.is_dir()))
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>, Error> {
        let entries = std::fs::read_dir(path).map_err(|e| {
            Error::io_msg(format!(
                "Failed to read directory '{}': {}",
                path.display(),
                e
            ))
        })?;
        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                Error::io_msg(format!("Failed to read directory entry: {}", e))
            })?;
            paths.push(entry.path());
        }
        paths.sort();
        Ok(paths)
    }

    fn open_append(&self, path: &Path) -> Result<Box<dyn std::io::Write + Send>, Error> {
        let f = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| {
                Error::io_msg(format!("Failed to open '{}' for append: {}", path.display(), e))
            })?;
        Ok(Box::new(f))
    }

    fn write_new(&self, path: &Path, contents: &str) -> Result<bool, Error> {
        let mut f = match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
        {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => return Ok(false),
            Err(e) => {
                return Err(Error::io_msg(format!(
                    "Failed to create '{}': {}",
                    path.display(),
                    e
                )))
            }
        };
        f.write_all(contents.as_bytes()).map_err(|e| {
            Error::io_msg(format!("Failed to write '{}': {}", path.display(), e))
        })?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_atomic_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.json");
        let fs = StdFileSystem;
        fs.write_atomic(&path, "{\"x\":1}").unwrap();
        assert_eq!(fs.read_to_string(&path).unwrap(), "{\"x\":1}");
        assert!(!path.with_extension("tmp").exists());
        assert_eq!(fs.read_dir(dir.path()).unwrap(), vec![path.clone()]);
    }

    #[test]
    fn test_write_new_does_not_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("v1.json");
        let fs = StdFileSystem;
        assert!(fs.write_new(&path, "first").unwrap());
        assert!(!fs.write_new(&path, "second").unwrap());
        assert_eq!(fs.read_to_string(&path).unwrap(), "first");

        let err = fs.write_new(&dir.path().join("missing/v1.json"), "x").unwrap_err();
        assert_eq!(err.exit_code(), 74);
    }

    #[test]
    fn test_open_append_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.jsonl");
        let fs = StdFileSystem;
        for line in ["a\n", "b\n"] {
            let mut w = fs.open_append(&path).unwrap();
            w.write_all(line.as_bytes()).unwrap();
        }
        assert_eq!(fs.read_to_string(&path).unwrap(), "a\nb\n");
    }

    #[test]
    fn test_read_dir_sorted_and_missing() {
        let dir = tempfile::tempdir().unwrap();
        let fs = StdFileSystem;
        fs.write(&dir.path().join("b"), "").unwrap();
        fs.write(&dir.path().join("a"), "").unwrap();
        let entries = fs.read_dir(dir.path()).unwrap();
        assert_eq!(entries, vec![dir.path().join("a"), dir.path().join("b")]);

        let err = fs.read_dir(&dir.path().join("missing")).unwrap_err();
        assert_eq!(err.exit_code(), 74);
    }
}
