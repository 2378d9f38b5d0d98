//! Renames attribute selectors, e.g. `<button ui-raised>` to `<button ui-elevated>`.

use crate::data::{AttributeSelectorUpgradeData, UpgradeData, get_changes_for_target};
use crate::error::UpdateResult;
use crate::migration::{Migration, MigrationContext, MigrationSetup};
use crate::program::{Node, SourceFile};
use crate::resources::ResolvedResource;
use crate::string_utils::find_disjoint_substring_indices;

use super::{replace_all_in_resource, replace_all_in_text, string_literal_text};

pub struct AttributeSelectorsMigration {
    data: Vec<AttributeSelectorUpgradeData>,
}

impl AttributeSelectorsMigration {
    pub fn create(setup: &MigrationSetup<'_, UpgradeData>) -> UpdateResult<Box<dyn Migration>> {
        let data = get_changes_for_target(
            setup.target,
            setup.data.attribute_selectors.as_ref(),
            "attribute_selectors",
        )?;
        Ok(Box::new(Self { data }))
    }
}

impl Migration for AttributeSelectorsMigration {
    fn name(&self) -> &'static str {
        "attribute-selectors"
    }

    fn enabled(&self) -> bool {
        !self.data.is_empty()
    }

    fn change_count(&self) -> usize {
        self.data.len()
    }

    fn visit_node(&mut self, ctx: &mut MigrationContext<'_>, file: &SourceFile, node: Node<'_>) {
        let Some((text, start)) = string_literal_text(file, node) else {
            return;
        };
        for change in &self.data {
            replace_all_in_text(ctx, file.path(), text, start, &change.replace, &change.replace_with);
        }
    }

    fn visit_template(&mut self, ctx: &mut MigrationContext<'_>, template: &ResolvedResource) {
        for change in &self.data {
            replace_all_in_resource(ctx, template, &change.replace, &change.replace_with);
        }
    }

    fn visit_stylesheet(&mut self, ctx: &mut MigrationContext<'_>, stylesheet: &ResolvedResource) {
        for change in &self.data {
            // Only `[attr]` selectors; the name itself is replaced, not the brackets.
            let selector = format!("[{}]", change.replace);
            for offset in find_disjoint_substring_indices(&stylesheet.content, &selector) {
                ctx.replace_in_resource(stylesheet, offset + 1, change.replace.len(), &change.replace_with);
            }
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
                pr: "#1".into(),
                changes: vec![AttributeSelectorUpgradeData {
                    replace: "ui-raised".into(),
                    replace_with: "ui-elevated".into(),
                }],
            }],
        );
        UpgradeData {
            attribute_selectors: Some(changes),
            ..Default::default()
        }
    }

    #[test]
    fn test_renames_everywhere() {
        let mut fs = MemoryFileSystem::new("/ws")
            .with_file(
                "src/button.rs",
                concat!(
                    "#[component(template = \"<button ui-raised></button>\", style_urls = [\"button.css\"])]\n",
                    "struct Button;\n",
                    "fn selector() -> &'static str { \"[ui-raised]\" }\n",
                ),
            )
            .with_file("src/button.css", "button[ui-raised] { color: red; }\n.ui-raised {}\n");

        let result = run(&mut fs, AttributeSelectorsMigration::create, &data(), &[]);
        assert!(!result.has_failures);
        assert_eq!(
            fs.get("src/button.rs").unwrap(),
            concat!(
                "#[component(template = \"<button ui-elevated></button>\", style_urls = [\"button.css\"])]\n",
                "struct Button;\n",
                "fn selector() -> &'static str { \"[ui-elevated]\" }\n",
            )
        );
        assert_eq!(
            fs.get("src/button.css").unwrap(),
            "button[ui-elevated] { color: red; }\n.ui-raised {}\n"
        );
    }

    #[test]
    fn test_disabled_for_other_targets() {
        let program = crate::program::Program::new();
        let data = data();
        let setup = MigrationSetup {
            program: &program,
            target: TargetVersion::V9,
            data: &data,
        };
        assert!(!AttributeSelectorsMigration::create(&setup).unwrap().enabled());
    }
}
