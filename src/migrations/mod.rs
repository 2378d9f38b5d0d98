//! Built-in migrations driven by [`UpgradeData`].

mod attribute_selectors;
mod class_names;
mod css_selectors;
mod element_selectors;
mod input_names;
mod output_names;
mod symbol_removal;

pub use attribute_selectors::AttributeSelectorsMigration;
pub use class_names::{ClassNamesMigration, ImportScope};
pub use css_selectors::CssSelectorsMigration;
pub use element_selectors::ElementSelectorsMigration;
pub use input_names::InputNamesMigration;
pub use output_names::OutputNamesMigration;
pub use symbol_removal::SymbolRemovalMigration;

use crate::data::UpgradeData;
use crate::file_system::WorkspacePath;
use crate::migration::{MigrationContext, MigrationRule};
use crate::program::{Node, SourceFile};
use crate::resources::{ResolvedResource, inline_resource_start, literal_body};
use crate::string_utils::find_disjoint_substring_indices;

/// Every built-in migration, in the order they visit.
pub fn default_rules() -> Vec<MigrationRule<UpgradeData>> {
    vec![
        AttributeSelectorsMigration::create,
        ElementSelectorsMigration::create,
        CssSelectorsMigration::create,
        InputNamesMigration::create,
        OutputNamesMigration::create,
        ClassNamesMigration::create,
        SymbolRemovalMigration::create,
    ]
}

/// Source text of a string literal node and the offset of its first content
/// character in the file.
pub(crate) fn string_literal_text<'f>(file: &'f SourceFile, node: Node<'_>) -> Option<(&'f str, usize)> {
    let lit = node.as_string_literal()?;
    let start = file.span_start(lit.span());
    let end = file.span_end(lit.span());
    let token = file.text().get(start..end)?;
    let body = literal_body(token)?;
    Some((body, inline_resource_start(start, token)))
}

/// Replace every occurrence of `needle` in a resource.
pub(crate) fn replace_all_in_resource(
    ctx: &mut MigrationContext<'_>,
    resource: &ResolvedResource,
    needle: &str,
    replacement: &str,
) {
    for offset in find_disjoint_substring_indices(&resource.content, needle) {
        ctx.replace_in_resource(resource, offset, needle.len(), replacement);
    }
}

/// Replace every occurrence of `needle` in `text`, which starts at `start` in `path`.
pub(crate) fn replace_all_in_text(
    ctx: &mut MigrationContext<'_>,
    path: &WorkspacePath,
    text: &str,
    start: usize,
    needle: &str,
    replacement: &str,
) {
    for offset in find_disjoint_substring_indices(text, needle) {
        ctx.edit(path).replace(start + offset, needle.len(), replacement);
    }
}

/// A name brought into scope by a `use` item.
pub(crate) struct UseLeaf<'ast> {
    /// Path segments before the name, e.g. `["ui_kit", "legacy"]`.
    pub module: Vec<String>,
    pub ident: &'ast syn::Ident,
}

impl UseLeaf<'_> {
    pub fn module_path(&self) -> String {
        self.module.join("::")
    }
}

/// Every imported name of a `use` item; globs and `self` imports are skipped.
pub(crate) fn use_leaves(item: &syn::ItemUse) -> Vec<UseLeaf<'_>> {
    let mut leaves = Vec::new();
    collect_use_leaves(&item.tree, &mut Vec::new(), &mut leaves);
    leaves
}

fn collect_use_leaves<'ast>(tree: &'ast syn::UseTree, prefix: &mut Vec<String>, out: &mut Vec<UseLeaf<'ast>>) {
    match tree {
        syn::UseTree::Path(path) => {
            prefix.push(path.ident.to_string());
            collect_use_leaves(&path.tree, prefix, out);
            prefix.pop();
        }
        syn::UseTree::Name(name) if name.ident != "self" => out.push(UseLeaf {
            module: prefix.clone(),
            ident: &name.ident,
        }),
        syn::UseTree::Rename(rename) if rename.ident != "self" => out.push(UseLeaf {
            module: prefix.clone(),
            ident: &rename.ident,
        }),
        syn::UseTree::Group(group) => {
            for item in &group.items {
                collect_use_leaves(item, prefix, out);
            }
        }
        _ => {}
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::TargetVersion;
    use crate::file_system::{FileSystem, MemoryFileSystem};
    use crate::migration::MigrationSetup;
    use crate::program::Program;
    use std::path::Path;

    #[test]
    fn test_use_leaves() {
        let item: syn::ItemUse =
            syn::parse_str("use ui_kit::{Button, legacy::{self, Old as New}, prelude::*};").unwrap();
        let leaves: Vec<_> = use_leaves(&item)
            .iter()
            .map(|l| format!("{}::{}", l.module_path(), l.ident))
            .collect();
        assert_eq!(leaves, vec!["ui_kit::Button", "ui_kit::legacy::Old"]);
    }

    #[test]
    fn test_default_rules_require_data() {
        let program = Program::new();
        let data = UpgradeData::default();
        let setup = MigrationSetup {
            program: &program,
            target: TargetVersion::V8,
            data: &data,
        };
        for rule in default_rules() {
            assert!(rule(&setup).is_err());
        }
    }

    #[test]
    fn test_replace_all_steps_past_each_match() {
        let mut fs = MemoryFileSystem::new("/ws").with_file("src/a.txt", "aaa");
        let path = fs.resolve(&[Path::new("src/a.txt")]);
        let program = Program::new();
        let mut failures = Vec::new();
        let mut ctx = MigrationContext::new(&program, TargetVersion::V8, &mut fs, &mut failures);
        replace_all_in_text(&mut ctx, &path, "aaa", 0, "aa", "b");
        drop(ctx);

        fs.commit_edits().unwrap();
        assert_eq!(fs.get("src/a.txt"), Some("ba"));
    }
}
