//! `refit.toml` project configuration.
//!
//! ```toml
//! target = "v8"
//! rules = "upgrade-data.toml"
//! global_stylesheets = ["styles/global.css"]
//! library_dirs = ["third_party"]
//! skip_dirs = ["generated"]
//! attributes = ["component"]
//!
//! [[units]]
//! name = "app"
//! roots = ["src"]
//!
//! [[units]]
//! name = "tests"
//! roots = ["tests", "src"]
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::data::TargetVersion;
use crate::error::{UpdateError, UpdateResult};

/// Default config file name, looked up in the project root.
pub const CONFIG_FILE: &str = "refit.toml";

/// One compilation unit: a named set of source roots.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UnitConfig {
    pub name: String,
    pub roots: Vec<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// Version to migrate to when `--to` is not given.
    pub target: Option<TargetVersion>,
    /// Rule data file, relative to the project root.
    pub rules: Option<PathBuf>,
    pub units: Vec<UnitConfig>,
    /// Stylesheets no component references.
    pub global_stylesheets: Vec<PathBuf>,
    /// Source directories of read-only libraries.
    pub library_dirs: Vec<PathBuf>,
    /// Directory names skipped during discovery, on top of the defaults.
    pub skip_dirs: Vec<String>,
    /// Attribute names that mark a struct as a component.
    pub attributes: Vec<String>,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            target: None,
            rules: None,
            units: Vec::new(),
            global_stylesheets: Vec::new(),
            library_dirs: Vec::new(),
            skip_dirs: Vec::new(),
            attributes: vec!["component".to_string()],
        }
    }
}

impl ToolConfig {
    pub fn parse(text: &str) -> UpdateResult<Self> {
        let config: Self = toml::from_str(text).map_err(|e| UpdateError::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load `refit.toml` from `project_root`; a missing file gives the defaults.
    pub fn load(project_root: &Path) -> UpdateResult<Self> {
        let path = project_root.join(CONFIG_FILE);
        if !path.exists() {
            tracing::debug!("No {} in {}, using defaults", CONFIG_FILE, project_root.display());
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(&path)?;
        Self::parse(&text).map_err(|e| match e {
            UpdateError::Config(msg) => UpdateError::config(format!("{}: {}", path.display(), msg)),
            other => other,
        })
    }

    /// Configured units, or a single `main` unit over `src` when none are given.
    pub fn units(&self) -> Vec<UnitConfig> {
        if self.units.is_empty() {
            vec![UnitConfig {
                name: "main".to_string(),
                roots: vec![PathBuf::from("src")],
            }]
        } else {
            self.units.clone()
        }
    }

    fn validate(&self) -> UpdateResult<()> {
        for unit in &self.units {
            if unit.roots.is_empty() {
                return Err(UpdateError::config(format!("unit '{}' has no roots", unit.name)));
            }
        }
        if self.attributes.is_empty() {
            return Err(UpdateError::config("at least one component attribute is required"));
        }
        Ok(())
    }
}
