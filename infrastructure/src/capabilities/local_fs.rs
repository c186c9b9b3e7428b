//! Local filesystem adapter backed by `tokio::fs`.

use async_trait::async_trait;
use dispatch_application::ports::FileSystem;
use dispatch_domain::ToolError;
use std::path::{Path, PathBuf};

/// Maximum file size to read (10 MB)
const MAX_READ_SIZE: u64 = 10 * 1024 * 1024;

/// [`FileSystem`] over the local disk.
///
/// Relative paths resolve against `root` when one is set, otherwise against
/// the process working directory.
#[derive(Debug, Clone, Default)]
pub struct LocalFileSystem {
    root: Option<PathBuf>,
}

impl LocalFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        match &self.root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }
}

fn io_error(path: &str, err: std::io::Error) -> ToolError {
    match err.kind() {
        std::io::ErrorKind::NotFound => ToolError::not_found(path),
        std::io::ErrorKind::PermissionDenied => ToolError::permission_denied(path),
        _ => ToolError::from(err).with_details(path.to_string()),
    }
}

#[async_trait]
impl FileSystem for LocalFileSystem {
    async fn read_to_string(&self, path: &str) -> Result<String, ToolError> {
        let resolved = self.resolve(path);
        let metadata = tokio::fs::metadata(&resolved)
            .await
            .map_err(|e| io_error(path, e))?;

        if !metadata.is_file() {
            return Err(ToolError::invalid_argument(format!(
                "'{}' is not a file",
                path
            )));
        }
        if metadata.len() > MAX_READ_SIZE {
            return Err(ToolError::invalid_argument(format!(
                "File too large ({} bytes). Maximum size is {} bytes",
                metadata.len(),
                MAX_READ_SIZE
            )));
        }

        tokio::fs::read_to_string(&resolved)
            .await
            .map_err(|e| io_error(path, e))
    }

    async fn write(&self, path: &str, contents: &str) -> Result<(), ToolError> {
        let resolved = self.resolve(path);
        if let Some(parent) = resolved.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| io_error(path, e))?;
        }
        tokio::fs::write(&resolved, contents)
            .await
            .map_err(|e| io_error(path, e))
    }

    async fn list_dir(&self, path: &str) -> Result<Vec<String>, ToolError> {
        let mut entries = tokio::fs::read_dir(self.resolve(path))
            .await
            .map_err(|e| io_error(path, e))?;

        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(|e| io_error(path, e))? {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        names.sort();
        Ok(names)
    }

    async fn exists(&self, path: &str) -> bool {
        tokio::fs::try_exists(self.resolve(path))
            .await
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_then_read_under_root() {
        let dir = tempfile::tempdir().unwrap();
        let fs = LocalFileSystem::with_root(dir.path());

        fs.write("nested/note.txt", "hello").await.unwrap();

        assert!(dir.path().join("nested/note.txt").exists());
        assert_eq!(fs.read_to_string("nested/note.txt").await.unwrap(), "hello");
        assert!(fs.exists("nested").await);
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let fs = LocalFileSystem::with_root(dir.path());

        let err = fs.read_to_string("nope.txt").await.unwrap_err();
        assert_eq!(err.code, "NOT_FOUND");
        assert!(!fs.exists("nope.txt").await);
    }

    #[tokio::test]
    async fn test_reading_a_directory_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let fs = LocalFileSystem::with_root(dir.path());

        let err = fs.read_to_string(".").await.unwrap_err();
        assert_eq!(err.code, "INVALID_ARGUMENT");
    }

    #[tokio::test]
    async fn test_list_dir_sorted() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.txt"), "").unwrap();
        std::fs::write(dir.path().join("a.txt"), "").unwrap();
        std::fs::create_dir(dir.path().join("c")).unwrap();

        let fs = LocalFileSystem::new();
        let names = fs.list_dir(dir.path().to_str().unwrap()).await.unwrap();
        assert_eq!(names, vec!["a.txt", "b.txt", "c"]);
    }
}
