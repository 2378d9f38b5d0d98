use serde::{Deserialize, Serialize};

/// Rename of an attribute selector, e.g. `[md-button]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeSelectorUpgradeData {
    pub replace: String,
    pub replace_with: String,
}

/// Rename of an element selector, e.g. `<md-card>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementSelectorUpgradeData {
    pub replace: String,
    pub replace_with: String,
}

/// Rename of a CSS class selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CssSelectorUpgradeData {
    pub replace: String,
    pub replace_with: String,
    #[serde(default)]
    pub replace_in: ReplaceIn,
}

/// Where besides stylesheets and templates a CSS selector is renamed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplaceIn {
    pub string_literals: bool,
}

/// Elements or attributes a binding rename is restricted to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitedTo {
    pub elements: Vec<String>,
    pub attributes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputNameUpgradeData {
    pub replace: String,
    pub replace_with: String,
    #[serde(default)]
    pub limited_to: Option<LimitedTo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputNameUpgradeData {
    pub replace: String,
    pub replace_with: String,
    #[serde(default)]
    pub limited_to: Option<LimitedTo>,
}

/// Rename of a type or function exported by a library crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassNameUpgradeData {
    pub replace: String,
    pub replace_with: String,
}

/// A symbol that no longer exists and has no automatic replacement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolRemovalUpgradeData {
    pub name: String,
    /// Module path the symbol was exported from, e.g. `ui_kit::legacy`.
    pub module: String,
    pub message: String,
}
