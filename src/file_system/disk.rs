//! File system backed by a workspace directory on disk.

use std::fs;
use std::path::{Path, PathBuf};

use super::{EditLedger, FileSystem, WorkspacePath};
use crate::error::UpdateResult;

/// Reads and writes real files below `root`.
#[derive(Debug)]
pub struct DiskFileSystem {
    root: PathBuf,
    ledger: EditLedger,
}

impl DiskFileSystem {
    /// Create a file system rooted at `root`.
    ///
    /// A relative root is taken relative to the current directory.
    pub fn new(root: impl AsRef<Path>) -> UpdateResult<Self> {
        let root = root.as_ref();
        let root = if root.is_absolute() {
            root.to_path_buf()
        } else {
            std::env::current_dir()?.join(root)
        };
        Ok(Self {
            root: super::normalize_path(&root, &[]),
            ledger: EditLedger::default(),
        })
    }
}

impl FileSystem for DiskFileSystem {
    fn root(&self) -> &Path {
        &self.root
    }

    fn exists(&self, path: &WorkspacePath) -> bool {
        path.as_path().is_file()
    }

    fn read(&self, path: &WorkspacePath) -> Option<String> {
        fs::read_to_string(path.as_path()).ok()
    }

    fn write(&mut self, path: &WorkspacePath, content: &str) -> UpdateResult<()> {
        fs::write(path.as_path(), content)?;
        Ok(())
    }

    fn ledger(&self) -> &EditLedger {
        &self.ledger
    }

    fn ledger_mut(&mut self) -> &mut EditLedger {
        &mut self.ledger
    }
}
