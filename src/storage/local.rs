use std::fs;
use std::path::{Path, PathBuf};

use crate::error::AppError;

/// String key/value storage scoped to one user, one file per key.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    dir: PathBuf,
}

impl LocalStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Keys may contain characters that are awkward in file names.
    fn path_for(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{name}.json"))
    }

    pub fn get_item(&self, key: &str) -> Result<Option<String>, AppError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Storage(format!("read {key}: {e}"))),
        }
    }

    pub fn set_item(&self, key: &str, value: &str) -> Result<(), AppError> {
        fs::create_dir_all(&self.dir).map_err(|e| AppError::Storage(format!("create {}: {e}", self.dir.display())))?;
        fs::write(self.path_for(key), value).map_err(|e| AppError::Storage(format!("write {key}: {e}")))
    }

    pub fn remove_item(&self, key: &str) -> Result<(), AppError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Storage(format!("remove {key}: {e}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path().join("nested"));
        assert_eq!(storage.get_item("api-haven:k").unwrap(), None);
        storage.set_item("api-haven:k", "v").unwrap();
        assert_eq!(storage.get_item("api-haven:k").unwrap().as_deref(), Some("v"));
        assert!(dir.path().join("nested").join("api-haven_k.json").exists());
        storage.remove_item("api-haven:k").unwrap();
        assert_eq!(storage.get_item("api-haven:k").unwrap(), None);
    }

    #[test]
    fn test_write_into_file_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "x").unwrap();
        let storage = LocalStorage::new(&blocker);
        assert!(matches!(storage.set_item("k", "v"), Err(AppError::Storage(_))));
    }
}
