//! # refit
//!
//! Version-upgrade migrations for component-based UI code.
//!
//! A workspace is made of Rust sources declaring components with a
//! `#[component(...)]` attribute, plus the templates and stylesheets those
//! components reference. Migrations find outdated API usage in all three and
//! record precise text edits, which are applied in one commit at the end.
//!
//! ## Quick Example
//!
//! ```rust,ignore
//! use std::collections::HashSet;
//! use refit::prelude::*;
//!
//! let mut fs = DiskFileSystem::new(".")?;
//! let data = load_upgrade_data("upgrade-data.toml".as_ref())?;
//! let sources = vec![fs.resolve(&["src/app.rs".as_ref()])];
//! let program = Program::load(&fs, &sources, &[]);
//!
//! let mut analyzed = HashSet::new();
//! let result = UpdateProject::new(&program, &mut fs, &mut analyzed)
//!     .migrate(&default_rules(), TargetVersion::V8, &data, &[])?;
//! fs.commit_edits()?;
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod file_system;
pub mod html;
pub mod line_index;
pub mod migration;
pub mod migrations;
pub mod program;
pub mod resources;
pub mod runner;
pub mod string_utils;
pub mod update_project;

pub mod prelude {
    pub use crate::config::ToolConfig;
    pub use crate::data::{TargetVersion, UpgradeData, VersionChanges, load_upgrade_data};
    pub use crate::error::*;
    pub use crate::file_system::{DiskFileSystem, FileSystem, MemoryFileSystem, WorkspacePath};
    pub use crate::migration::{Migration, MigrationContext, MigrationFailure, MigrationRule, MigrationSetup};
    pub use crate::migrations::default_rules;
    pub use crate::program::{FileKind, Program, SourceFile};
    pub use crate::resources::ResolvedResource;
    pub use crate::update_project::{MigrationRunResult, UpdateProject};
}
