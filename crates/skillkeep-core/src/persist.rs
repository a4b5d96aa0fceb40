//! File helpers shared by the store and the ledger
//!
//! Writes are atomic (write to a temp file, then rename) so a document or
//! snapshot is never left partially written.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

use crate::error::{SkillError, SkillResult};

/// Write data to a file atomically
///
/// 1. Write to a temporary file in the same directory
/// 2. Sync the file to disk
/// 3. Rename the temp file to the target path
pub(crate) fn atomic_write(path: &Path, data: &[u8]) -> SkillResult<()> {
    if let Some(parent) = path.parent() {
        create_dir_all(parent)?;
    }

    let temp_path = path.with_extension("tmp");

    let mut file = File::create(&temp_path).map_err(|e| SkillError::from_io(e, &temp_path))?;
    file.write_all(data)
        .map_err(|e| SkillError::from_io(e, &temp_path))?;
    file.sync_all()
        .map_err(|e| SkillError::from_io(e, &temp_path))?;

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        SkillError::from_io(e, path)
    })
}

/// Create a directory and its parents
pub(crate) fn create_dir_all(path: &Path) -> SkillResult<()> {
    fs::create_dir_all(path).map_err(|source| match source.kind() {
        io::ErrorKind::PermissionDenied => SkillError::PermissionDenied {
            path: path.to_path_buf(),
            source,
        },
        _ => SkillError::CreateDirectory {
            path: path.to_path_buf(),
            source,
        },
    })
}

/// Read a UTF-8 file, returning `None` when it does not exist
pub(crate) fn read_optional(path: &Path) -> SkillResult<Option<String>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(SkillError::read(e, path)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_atomic_write_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let nested_path = temp_dir.path().join("a").join("b").join("file.md");

        atomic_write(&nested_path, b"test data").unwrap();

        assert_eq!(fs::read_to_string(&nested_path).unwrap(), "test data");
        assert!(!nested_path.with_extension("tmp").exists());
    }

    #[test]
    fn test_atomic_write_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("file.md");

        atomic_write(&path, b"one").unwrap();
        atomic_write(&path, b"two").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "two");
    }

    #[test]
    fn test_read_optional() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("file.md");

        assert_eq!(read_optional(&path).unwrap(), None);

        fs::write(&path, "hello").unwrap();
        assert_eq!(read_optional(&path).unwrap().as_deref(), Some("hello"));
    }
}
