//! Version-indexed rule data.
//!
//! Every rule category is a [`VersionChanges`] map from target version to the
//! entries introduced for it. Entries carry the change request they came from
//! for traceability; consumers only see the flattened changes.

mod rules;

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use rules::{
    AttributeSelectorUpgradeData, ClassNameUpgradeData, CssSelectorUpgradeData, ElementSelectorUpgradeData,
    InputNameUpgradeData, LimitedTo, OutputNameUpgradeData, ReplaceIn, SymbolRemovalUpgradeData,
};

use crate::error::{UpdateError, UpdateResult};

/// Major versions a project can be migrated to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(try_from = "String", into = "String")]
pub enum TargetVersion {
    V6,
    V7,
    V8,
    V9,
    V10,
    V11,
    V12,
    V13,
    V14,
    V15,
    V16,
    V17,
    V18,
    V19,
    V20,
}

impl TargetVersion {
    pub const ALL: [TargetVersion; 15] = [
        Self::V6,
        Self::V7,
        Self::V8,
        Self::V9,
        Self::V10,
        Self::V11,
        Self::V12,
        Self::V13,
        Self::V14,
        Self::V15,
        Self::V16,
        Self::V17,
        Self::V18,
        Self::V19,
        Self::V20,
    ];

    pub fn major(self) -> u32 {
        self as u32 + 6
    }

    pub fn from_major(major: u32) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.major() == major)
    }
}

impl fmt::Display for TargetVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.major())
    }
}

impl FromStr for TargetVersion {
    type Err = UpdateError;

    /// Accepts `v8`, `V8` and `8`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim().trim_start_matches(['v', 'V']);
        digits
            .parse::<u32>()
            .ok()
            .and_then(Self::from_major)
            .ok_or_else(|| UpdateError::RuleData(format!("unknown target version '{}'", s)))
    }
}

impl TryFrom<String> for TargetVersion {
    type Error = UpdateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TargetVersion> for String {
    fn from(version: TargetVersion) -> Self {
        version.to_string()
    }
}

/// The changes one change request introduced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionChangesEntry<T> {
    pub pr: String,
    pub changes: Vec<T>,
}

pub type VersionChanges<T> = BTreeMap<TargetVersion, Vec<VersionChangesEntry<T>>>;

/// Flattened changes of `target`.
///
/// A missing version key means "nothing to do"; missing data altogether is a
/// configuration error, reported with `name` for context.
pub fn get_changes_for_target<T: Clone>(
    target: TargetVersion,
    data: Option<&VersionChanges<T>>,
    name: &'static str,
) -> UpdateResult<Vec<T>> {
    let data = data.ok_or(UpdateError::MissingUpgradeData(name))?;
    Ok(data
        .get(&target)
        .map(|entries| flatten(entries))
        .unwrap_or_default())
}

/// Every change across all versions.
pub fn get_all_changes<T: Clone>(data: &VersionChanges<T>) -> Vec<T> {
    data.values().flat_map(|entries| flatten(entries)).collect()
}

fn flatten<T: Clone>(entries: &[VersionChangesEntry<T>]) -> Vec<T> {
    entries
        .iter()
        .flat_map(|entry| entry.changes.iter().cloned())
        .collect()
}

/// All rule data, one optional category per migration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpgradeData {
    pub attribute_selectors: Option<VersionChanges<AttributeSelectorUpgradeData>>,
    pub element_selectors: Option<VersionChanges<ElementSelectorUpgradeData>>,
    pub css_selectors: Option<VersionChanges<CssSelectorUpgradeData>>,
    pub input_names: Option<VersionChanges<InputNameUpgradeData>>,
    pub output_names: Option<VersionChanges<OutputNameUpgradeData>>,
    pub class_names: Option<VersionChanges<ClassNameUpgradeData>>,
    pub symbol_removals: Option<VersionChanges<SymbolRemovalUpgradeData>>,
    /// Crates whose exported identifiers `class_names` may rename.
    pub library_crates: Vec<String>,
}

impl UpgradeData {
    /// Parse rule data, TOML or JSON depending on `format_hint`.
    pub fn parse(text: &str, format_hint: DataFormat) -> UpdateResult<Self> {
        match format_hint {
            DataFormat::Toml => toml::from_str(text).map_err(|e| UpdateError::RuleData(e.to_string())),
            DataFormat::Json => serde_json::from_str(text).map_err(|e| UpdateError::RuleData(e.to_string())),
        }
    }
}

/// Serialization format of a rule data file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    Toml,
    Json,
}

impl DataFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Toml,
        }
    }
}

/// Load rule data from a file.
pub fn load_upgrade_data(path: &Path) -> UpdateResult<UpgradeData> {
    let text = std::fs::read_to_string(path)?;
    UpgradeData::parse(&text, DataFormat::from_path(path)).map_err(|e| match e {
        UpdateError::RuleData(msg) => UpdateError::RuleData(format!("{}: {}", path.display(), msg)),
        other => other,
    })
}
