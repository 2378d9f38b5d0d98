//! In-memory virtual file tree.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::{EditLedger, FileSystem, WorkspacePath};
use crate::error::UpdateResult;

/// A virtual workspace, used by hosts that supply their own file tree.
#[derive(Debug)]
pub struct MemoryFileSystem {
    root: PathBuf,
    files: BTreeMap<WorkspacePath, String>,
    ledger: EditLedger,
}

impl Default for MemoryFileSystem {
    fn default() -> Self {
        Self::new("/")
    }
}

impl MemoryFileSystem {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            root: super::normalize_path(Path::new("/"), &[root.as_path()]),
            files: BTreeMap::new(),
            ledger: EditLedger::default(),
        }
    }

    /// Add or replace a file. Relative paths are taken from the root.
    pub fn insert(&mut self, path: impl AsRef<Path>, content: impl Into<String>) -> WorkspacePath {
        let key = self.resolve(&[path.as_ref()]);
        self.files.insert(key.clone(), content.into());
        key
    }

    pub fn with_file(mut self, path: impl AsRef<Path>, content: impl Into<String>) -> Self {
        self.insert(path, content);
        self
    }

    pub fn get(&self, path: impl AsRef<Path>) -> Option<&str> {
        let key = self.resolve(&[path.as_ref()]);
        self.files.get(&key).map(String::as_str)
    }

    /// Every file currently in the tree.
    pub fn paths(&self) -> impl Iterator<Item = &WorkspacePath> {
        self.files.keys()
    }
}

impl FileSystem for MemoryFileSystem {
    fn root(&self) -> &Path {
        &self.root
    }

    fn exists(&self, path: &WorkspacePath) -> bool {
        self.files.contains_key(path)
    }

    fn read(&self, path: &WorkspacePath) -> Option<String> {
        self.files.get(path).cloned()
    }

    fn write(&mut self, path: &WorkspacePath, content: &str) -> UpdateResult<()> {
        self.files.insert(path.clone(), content.to_string());
        Ok(())
    }

    fn ledger(&self) -> &EditLedger {
        &self.ledger
    }

    fn ledger_mut(&mut self) -> &mut EditLedger {
        &mut self.ledger
    }
}
