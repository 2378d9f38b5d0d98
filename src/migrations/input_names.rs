//! Renames component inputs in template bindings.

use crate::data::{InputNameUpgradeData, LimitedTo, UpgradeData, get_changes_for_target};
use crate::error::UpdateResult;
use crate::html;
use crate::migration::{Migration, MigrationContext, MigrationSetup};
use crate::resources::ResolvedResource;
use crate::string_utils::find_disjoint_substring_indices;

pub struct InputNamesMigration {
    data: Vec<InputNameUpgradeData>,
}

impl InputNamesMigration {
    pub fn create(setup: &MigrationSetup<'_, UpgradeData>) -> UpdateResult<Box<dyn Migration>> {
        let data = get_changes_for_target(setup.target, setup.data.input_names.as_ref(), "input_names")?;
        Ok(Box::new(Self { data }))
    }
}

/// Offsets of the bare binding name, restricted by `limited_to` when given.
pub(super) fn binding_offsets(
    limited_to: Option<&LimitedTo>,
    unrestricted: impl Fn() -> Vec<usize>,
    on_tags: impl Fn(&[String]) -> Vec<usize>,
    on_attrs: impl Fn(&[String]) -> Vec<usize>,
) -> Vec<usize> {
    let Some(limited_to) = limited_to else {
        return unrestricted();
    };
    let mut offsets = Vec::new();
    if !limited_to.elements.is_empty() {
        offsets.extend(on_tags(&limited_to.elements));
    }
    if !limited_to.attributes.is_empty() {
        offsets.extend(on_attrs(&limited_to.attributes));
    }
    // An element can match both by tag and by attribute.
    offsets.sort_unstable();
    offsets.dedup();
    offsets
}

impl Migration for InputNamesMigration {
    fn name(&self) -> &'static str {
        "input-names"
    }

    fn enabled(&self) -> bool {
        !self.data.is_empty()
    }

    fn change_count(&self) -> usize {
        self.data.len()
    }

    fn visit_template(&mut self, ctx: &mut MigrationContext<'_>, template: &ResolvedResource) {
        let content = template.content.as_str();
        for change in &self.data {
            let offsets = binding_offsets(
                change.limited_to.as_ref(),
                || html::find_inputs(content, &change.replace),
                |tags| html::find_inputs_on_element_with_tag(content, &change.replace, tags),
                |attrs| html::find_inputs_on_element_with_attr(content, &change.replace, attrs),
            );
            for offset in offsets {
                ctx.replace_in_resource(template, offset, change.replace.len(), &change.replace_with);
            }
        }
    }

    /// Inputs double as attribute selectors, e.g. `ui-tip[align]`.
    fn visit_stylesheet(&mut self, ctx: &mut MigrationContext<'_>, stylesheet: &ResolvedResource) {
        for change in &self.data {
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

    fn data(limited_to: Option<LimitedTo>) -> UpgradeData {
        let mut changes = VersionChanges::new();
        changes.insert(
            TargetVersion::V8,
            vec![VersionChangesEntry {
                pr: "#21".into(),
                changes: vec![InputNameUpgradeData {
                    replace: "align".into(),
                    replace_with: "position".into(),
                    limited_to,
                }],
            }],
        );
        UpgradeData {
            input_names: Some(changes),
            ..Default::default()
        }
    }

    #[test]
    fn test_limited_to_elements() {
        let mut fs = MemoryFileSystem::new("/ws")
            .with_file("src/a.rs", "#[component(template_url = \"a.html\", style_url = \"a.css\")]\nstruct A;\n")
            .with_file(
                "src/a.html",
                "<ui-tip align=\"start\" [align]=\"x\"></ui-tip>\n<div align=\"left\"></div>",
            )
            .with_file("src/a.css", "ui-tip[align] {}");

        let limited = LimitedTo {
            elements: vec!["ui-tip".into()],
            attributes: Vec::new(),
        };
        run(&mut fs, InputNamesMigration::create, &data(Some(limited)), &[]);
        assert_eq!(
            fs.get("src/a.html").unwrap(),
            "<ui-tip position=\"start\" [position]=\"x\"></ui-tip>\n<div align=\"left\"></div>"
        );
        assert_eq!(fs.get("src/a.css").unwrap(), "ui-tip[position] {}");
    }

    #[test]
    fn test_tag_and_attribute_match_is_edited_once() {
        let mut fs = MemoryFileSystem::new("/ws")
            .with_file("src/a.rs", "#[component(template_url = \"a.html\")]\nstruct A;\n")
            .with_file("src/a.html", "<ui-tip uiTip [align]=\"x\"></ui-tip>");

        let limited = LimitedTo {
            elements: vec!["ui-tip".into()],
            attributes: vec!["uiTip".into()],
        };
        run(&mut fs, InputNamesMigration::create, &data(Some(limited)), &[]);
        assert_eq!(fs.get("src/a.html").unwrap(), "<ui-tip uiTip [position]=\"x\"></ui-tip>");
    }

    #[test]
    fn test_inline_template_with_escaped_quotes() {
        let mut fs = MemoryFileSystem::new("/ws")
            .with_file("src/a.rs", "#[component(template = \"<ui-tip [align]=\\\"x\\\"></ui-tip>\")]\nstruct A;\n");
        run(&mut fs, InputNamesMigration::create, &data(None), &[]);
        assert_eq!(
            fs.get("src/a.rs").unwrap(),
            "#[component(template = \"<ui-tip [position]=\\\"x\\\"></ui-tip>\")]\nstruct A;\n"
        );
    }

    #[test]
    fn test_unrestricted() {
        let mut fs = MemoryFileSystem::new("/ws")
            .with_file("src/a.rs", "#[component(template = \"<p bind-align=x></p>\")]\nstruct A;\n");
        run(&mut fs, InputNamesMigration::create, &data(None), &[]);
        assert_eq!(
            fs.get("src/a.rs").unwrap(),
            "#[component(template = \"<p bind-position=x></p>\")]\nstruct A;\n"
        );
    }
}
