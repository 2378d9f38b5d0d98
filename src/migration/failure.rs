use std::fmt;

use serde::Serialize;

use crate::file_system::WorkspacePath;
use crate::line_index::LineAndCharacter;

/// A pattern a migration found but could not fix. Informational only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationFailure {
    pub file_path: WorkspacePath,
    pub message: String,
    /// Zero-based; rendered one-based.
    pub position: Option<LineAndCharacter>,
}

impl fmt::Display for MigrationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.file_path)?;
        if let Some(position) = &self.position {
            write!(f, "@{}:{}", position.line + 1, position.character + 1)?;
        }
        write!(f, " - {}", self.message)
    }
}
