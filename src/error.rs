//! Error types for refit.

use std::fmt;
use std::ops::Range;
use std::path::PathBuf;

use thiserror::Error;

/// The main error type for refit operations.
#[derive(Debug, Error)]
pub enum UpdateError {
    /// A migration asked for upgrade data that was never wired up.
    #[error("No upgrade data is configured for migration '{0}'")]
    MissingUpgradeData(&'static str),

    /// Failed to parse a source file.
    #[error("Parse error in {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    /// One or more files could not be committed.
    #[error("{} file(s) could not be updated: {}", .0.len(), render_conflicts(.0))]
    EditConflicts(Vec<EditConflict>),

    #[error("Invalid rule data: {0}")]
    RuleData(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl UpdateError {
    /// Create a parse error for the given file.
    pub fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

/// Why a recorder could not be applied to its file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictKind {
    /// Two removals cover part of the same text.
    OverlappingRemovals { first: Range<usize>, second: Range<usize> },
    /// An operation points past the end of the file or into a UTF-8 sequence.
    InvalidOffset { offset: usize },
    /// The file disappeared before the edits were applied.
    MissingFile,
    /// The updated text could not be written.
    WriteFailed { message: String },
}

/// A file whose pending edits were rejected at commit time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditConflict {
    pub path: PathBuf,
    pub kind: ConflictKind,
}

impl fmt::Display for EditConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ConflictKind::OverlappingRemovals { first, second } => write!(
                f,
                "{}: removal {}..{} overlaps {}..{}",
                self.path.display(),
                second.start,
                second.end,
                first.start,
                first.end
            ),
            ConflictKind::InvalidOffset { offset } => {
                write!(f, "{}: invalid edit offset {}", self.path.display(), offset)
            }
            ConflictKind::MissingFile => write!(f, "{}: file no longer exists", self.path.display()),
            ConflictKind::WriteFailed { message } => {
                write!(f, "{}: write failed: {}", self.path.display(), message)
            }
        }
    }
}

fn render_conflicts(conflicts: &[EditConflict]) -> String {
    conflicts
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result type alias for refit operations.
pub type UpdateResult<T> = Result<T, UpdateError>;
