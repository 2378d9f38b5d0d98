//! File system abstraction and edit ledger.
//!
//! Migrations never write files directly. They ask the file system for the
//! [`UpdateRecorder`] of a path and queue text changes on it. Every request for
//! the same canonical path returns the same recorder, so unrelated migrations
//! accumulate into one ledger per file. Nothing touches storage until
//! [`FileSystem::commit_edits`] runs, once, after every migration of every
//! compilation unit has finished.

mod disk;
mod memory;
mod recorder;

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Component, Path, PathBuf};

use serde::Serialize;

pub use disk::DiskFileSystem;
pub use memory::MemoryFileSystem;
pub use recorder::{EditOperation, UpdateRecorder};

use crate::error::{ConflictKind, EditConflict, UpdateError, UpdateResult};

/// Canonical, absolute path used as the ledger key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct WorkspacePath(PathBuf);

impl WorkspacePath {
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Directory containing this file, used to resolve relative references.
    pub fn parent(&self) -> &Path {
        self.0.parent().unwrap_or(&self.0)
    }

    pub fn extension(&self) -> Option<&str> {
        self.0.extension().and_then(|e| e.to_str())
    }
}

impl AsRef<Path> for WorkspacePath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl From<WorkspacePath> for PathBuf {
    fn from(path: WorkspacePath) -> Self {
        path.0
    }
}

impl fmt::Display for WorkspacePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// Join `segments` onto `root` and remove `.`/`..` lexically.
///
/// Absolute segments replace what came before them, so a path that is
/// already absolute resolves to itself. Never touches the disk.
pub fn normalize_path(root: &Path, segments: &[&Path]) -> PathBuf {
    let mut joined = root.to_path_buf();
    for segment in segments {
        joined.push(segment);
    }

    let mut normalized = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::Prefix(prefix) => normalized.push(prefix.as_os_str()),
            Component::RootDir => normalized.push(Component::RootDir.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                if normalized.file_name().is_some() {
                    normalized.pop();
                }
            }
            Component::Normal(name) => normalized.push(name),
        }
    }
    normalized
}

/// Pending recorders keyed by canonical path.
#[derive(Debug, Default)]
pub struct EditLedger {
    recorders: BTreeMap<WorkspacePath, UpdateRecorder>,
}

impl EditLedger {
    /// Get the recorder for `path`, creating it on first use.
    pub fn recorder(&mut self, path: &WorkspacePath) -> &mut UpdateRecorder {
        self.recorders
            .entry(path.clone())
            .or_insert_with(|| UpdateRecorder::new(path.clone()))
    }

    pub fn get(&self, path: &WorkspacePath) -> Option<&UpdateRecorder> {
        self.recorders.get(path)
    }

    pub fn iter(&self) -> impl Iterator<Item = &UpdateRecorder> {
        self.recorders.values()
    }

    pub fn len(&self) -> usize {
        self.recorders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recorders.is_empty()
    }

    /// Total number of queued operations across all files.
    pub fn operation_count(&self) -> usize {
        self.recorders.values().map(|r| r.operations().len()).sum()
    }

    fn take(&mut self) -> BTreeMap<WorkspacePath, UpdateRecorder> {
        std::mem::take(&mut self.recorders)
    }
}

/// Storage plus edit ledger, as seen by migrations.
pub trait FileSystem {
    /// Workspace root that relative paths are resolved against.
    fn root(&self) -> &Path;

    fn exists(&self, path: &WorkspacePath) -> bool;

    /// Read a file. Missing or unreadable files yield `None`.
    fn read(&self, path: &WorkspacePath) -> Option<String>;

    fn write(&mut self, path: &WorkspacePath, content: &str) -> UpdateResult<()>;

    fn ledger(&self) -> &EditLedger;

    fn ledger_mut(&mut self) -> &mut EditLedger;

    /// Canonicalize a path. Equivalent inputs (absolute or root-relative)
    /// always produce the same key.
    fn resolve(&self, segments: &[&Path]) -> WorkspacePath {
        WorkspacePath(normalize_path(self.root(), segments))
    }

    /// The recorder for `path`. Repeated calls return the same recorder.
    fn edit(&mut self, path: &WorkspacePath) -> &mut UpdateRecorder {
        self.ledger_mut().recorder(path)
    }

    /// Apply every pending recorder and clear the ledger.
    ///
    /// Files whose edits conflict, or that cannot be written, are reported
    /// together once every other file has been written.
    fn commit_edits(&mut self) -> UpdateResult<()> {
        let recorders = self.ledger_mut().take();
        let mut conflicts = Vec::new();

        for (path, recorder) in recorders {
            if recorder.is_empty() {
                continue;
            }
            let Some(original) = self.read(&path) else {
                conflicts.push(EditConflict {
                    path: path.into(),
                    kind: ConflictKind::MissingFile,
                });
                continue;
            };
            match recorder.apply(&original) {
                Ok(updated) => {
                    if updated != original {
                        tracing::debug!(
                            "Writing {} ({} operations)",
                            path,
                            recorder.operations().len()
                        );
                        if let Err(e) = self.write(&path, &updated) {
                            tracing::warn!("Failed to write {}: {}", path, e);
                            conflicts.push(EditConflict {
                                path: path.into(),
                                kind: ConflictKind::WriteFailed { message: e.to_string() },
                            });
                        }
                    }
                }
                Err(kind) => conflicts.push(EditConflict {
                    path: path.into(),
                    kind,
                }),
            }
        }

        if conflicts.is_empty() {
            Ok(())
        } else {
            Err(UpdateError::EditConflicts(conflicts))
        }
    }
}
