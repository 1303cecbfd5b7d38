//! Filesystem access used by artifacts and the server bundle.

use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Filesystem operations needed to generate a server.
pub trait FileSystem {
    /// Returns true if the path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Creates a directory and all of its missing parents.
    fn create_dir_all(&self, path: &Path) -> Result<()>;

    /// Writes `content` to `path`, truncating any existing content.
    fn write_file(&self, path: &Path, content: &str) -> Result<()>;
}

/// `std::fs` backed implementation. Relative paths resolve against the
/// current working directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

impl LocalFileSystem {
    pub fn new() -> Self {
        Self
    }

    fn absolute(path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().unwrap_or_default().join(path)
        }
    }
}

impl FileSystem for LocalFileSystem {
    fn exists(&self, path: &Path) -> bool {
        Self::absolute(path).exists()
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(Self::absolute(path))
            .map_err(|source| Error::WriteError { path: path.to_path_buf(), source })
    }

    fn write_file(&self, path: &Path, content: &str) -> Result<()> {
        let abs_path = Self::absolute(path);
        if let Some(parent) = abs_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|source| Error::WriteError { path: path.to_path_buf(), source })?;
        }
        fs::write(abs_path, content)
            .map_err(|source| Error::WriteError { path: path.to_path_buf(), source })
    }
}
