//! Renames types and functions exported by library crates.
//!
//! An identifier is only renamed when the file imports it from one of the
//! configured library crates, so a local type that happens to share the old
//! name is left alone.

use std::collections::HashSet;

use crate::data::{ClassNameUpgradeData, UpgradeData, get_changes_for_target};
use crate::error::UpdateResult;
use crate::file_system::WorkspacePath;
use crate::migration::{Migration, MigrationContext, MigrationSetup};
use crate::program::{Node, SourceFile};

use super::use_leaves;

/// Names one file imports from library crates.
///
/// Rebuilt from scratch whenever the traversal enters another file.
#[derive(Debug, Default)]
pub struct ImportScope {
    file: Option<WorkspacePath>,
    trusted: HashSet<String>,
}

impl ImportScope {
    pub fn enter(&mut self, file: &WorkspacePath) {
        if self.file.as_ref() != Some(file) {
            self.file = Some(file.clone());
            self.trusted.clear();
        }
    }

    /// Record the names `item` imports from any of `library_crates`.
    pub fn add_use(&mut self, item: &syn::ItemUse, library_crates: &[String]) {
        for leaf in use_leaves(item) {
            let from_library = leaf
                .module
                .first()
                .is_some_and(|root| library_crates.iter().any(|c| c == root));
            if from_library {
                self.trusted.insert(leaf.ident.to_string());
            }
        }
    }

    pub fn is_trusted(&self, name: &str) -> bool {
        self.trusted.contains(name)
    }
}

pub struct ClassNamesMigration {
    data: Vec<ClassNameUpgradeData>,
    library_crates: Vec<String>,
    scope: ImportScope,
}

impl ClassNamesMigration {
    pub fn create(setup: &MigrationSetup<'_, UpgradeData>) -> UpdateResult<Box<dyn Migration>> {
        let data = get_changes_for_target(setup.target, setup.data.class_names.as_ref(), "class_names")?;
        Ok(Box::new(Self {
            data,
            library_crates: setup.data.library_crates.clone(),
            scope: ImportScope::default(),
        }))
    }
}

impl Migration for ClassNamesMigration {
    fn name(&self) -> &'static str {
        "class-names"
    }

    fn enabled(&self) -> bool {
        !self.data.is_empty()
    }

    fn change_count(&self) -> usize {
        self.data.len()
    }

    fn init(&mut self, _ctx: &mut MigrationContext<'_>) {
        if self.library_crates.is_empty() {
            tracing::debug!("No library crates configured, class names will not be renamed");
        }
    }

    fn visit_node(&mut self, ctx: &mut MigrationContext<'_>, file: &SourceFile, node: Node<'_>) {
        self.scope.enter(file.path());

        match node {
            Node::Item(syn::Item::Use(item)) => self.scope.add_use(item, &self.library_crates),
            Node::Ident(ident) => {
                let name = ident.to_string();
                if !self.scope.is_trusted(&name) {
                    return;
                }
                if let Some(change) = self.data.iter().find(|c| c.replace == name) {
                    let start = file.span_start(ident.span());
                    ctx.edit(file.path())
                        .replace(start, change.replace.len(), change.replace_with.as_str());
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{TargetVersion, VersionChanges, VersionChangesEntry};
    use crate::file_system::MemoryFileSystem;
    use crate::migrations::test_support::run;
    use pretty_assertions::assert_eq;

    fn data() -> UpgradeData {
        let mut changes = VersionChanges::new();
        changes.insert(
            TargetVersion::V8,
            vec![VersionChangesEntry {
                pr: "#50".into(),
                changes: vec![ClassNameUpgradeData {
                    replace: "CardModule".into(),
                    replace_with: "PanelModule".into(),
                }],
            }],
        );
        UpgradeData {
            class_names: Some(changes),
            library_crates: vec!["ui_kit".into()],
            ..Default::default()
        }
    }

    #[test]
    fn test_renames_imported_identifiers_only() {
        let mut fs = MemoryFileSystem::new("/ws")
            .with_file(
                "src/app.rs",
                "use ui_kit::{CardModule, Button};\n\nfn modules() -> Vec<CardModule> { Vec::from([CardModule::new()]) }\n",
            )
            .with_file(
                "src/local.rs",
                "struct CardModule;\nfn local() -> CardModule { CardModule }\n",
            );

        let result = run(&mut fs, ClassNamesMigration::create, &data(), &[]);
        assert!(!result.has_failures);
        assert_eq!(
            fs.get("src/app.rs").unwrap(),
            "use ui_kit::{PanelModule, Button};\n\nfn modules() -> Vec<PanelModule> { Vec::from([PanelModule::new()]) }\n"
        );
        assert_eq!(
            fs.get("src/local.rs").unwrap(),
            "struct CardModule;\nfn local() -> CardModule { CardModule }\n"
        );
    }

    #[test]
    fn test_scope_resets_between_files() {
        let mut scope = ImportScope::default();
        let mut fs = MemoryFileSystem::new("/ws");
        let a = fs.insert("a.rs", "");
        let b = fs.insert("b.rs", "");
        let item: syn::ItemUse = syn::parse_str("use ui_kit::Old;").unwrap();

        scope.enter(&a);
        scope.add_use(&item, &["ui_kit".to_string()]);
        assert!(scope.is_trusted("Old"));
        scope.enter(&a);
        assert!(scope.is_trusted("Old"));
        scope.enter(&b);
        assert!(!scope.is_trusted("Old"));
    }

    #[test]
    fn test_other_crates_are_not_trusted() {
        let mut scope = ImportScope::default();
        let item: syn::ItemUse = syn::parse_str("use other::Old;").unwrap();
        scope.add_use(&item, &["ui_kit".to_string()]);
        assert!(!scope.is_trusted("Old"));
    }
}
