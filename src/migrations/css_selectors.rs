//! Renames CSS class selectors such as `.ui-btn-raised`.
//!
//! Matches are bounded: `.ui-btn` never matches inside `.ui-btn-primary`.
//! Templates reference the bare class name, so there the leading `.` is
//! dropped from both sides of the change.

use regex::Regex;

use crate::data::{CssSelectorUpgradeData, UpgradeData, get_changes_for_target};
use crate::error::{UpdateError, UpdateResult};
use crate::migration::{Migration, MigrationContext, MigrationSetup};
use crate::program::{Node, SourceFile};
use crate::resources::ResolvedResource;

use super::string_literal_text;
use crate::string_utils::is_css_ident_char;

struct CompiledSelector {
    change: CssSelectorUpgradeData,
    /// Bounded pattern for the selector as written in stylesheets.
    selector: Regex,
    /// Bounded pattern for the bare class name, used in templates.
    class_name: Regex,
}

impl CompiledSelector {
    fn new(change: CssSelectorUpgradeData) -> UpdateResult<Self> {
        let selector = bounded(&change.replace)?;
        let class_name = bounded(bare(&change.replace))?;
        Ok(Self {
            change,
            selector,
            class_name,
        })
    }
}

fn bare(selector: &str) -> &str {
    selector.strip_prefix('.').unwrap_or(selector)
}

/// `needle` not followed by another identifier character, and not preceded
/// by one unless it starts with a `.` or `#` of its own. The match itself is
/// capture group 1.
fn bounded(needle: &str) -> UpdateResult<Regex> {
    let lead = if needle.starts_with(is_css_ident_char) { r"(?:^|[^\w-])" } else { "" };
    let pattern = format!(r"{}({})(?:$|[^\w-])", lead, regex::escape(needle));
    Regex::new(&pattern).map_err(|e| UpdateError::RuleData(format!("css selector '{}': {}", needle, e)))
}

/// Start offsets of every bounded match. Adjacent matches share a boundary
/// character, so the search resumes right after each match.
fn bounded_matches(pattern: &Regex, text: &str) -> Vec<usize> {
    let mut offsets = Vec::new();
    let mut from = 0;
    while from <= text.len() {
        let Some(found) = pattern.captures_at(text, from).and_then(|c| c.get(1)) else {
            break;
        };
        offsets.push(found.start());
        from = found.end();
    }
    offsets
}

pub struct CssSelectorsMigration {
    selectors: Vec<CompiledSelector>,
}

impl CssSelectorsMigration {
    pub fn create(setup: &MigrationSetup<'_, UpgradeData>) -> UpdateResult<Box<dyn Migration>> {
        let selectors = get_changes_for_target(setup.target, setup.data.css_selectors.as_ref(), "css_selectors")?
            .into_iter()
            .map(CompiledSelector::new)
            .collect::<UpdateResult<Vec<_>>>()?;
        Ok(Box::new(Self { selectors }))
    }
}

impl Migration for CssSelectorsMigration {
    fn name(&self) -> &'static str {
        "css-selectors"
    }

    fn enabled(&self) -> bool {
        !self.selectors.is_empty()
    }

    fn change_count(&self) -> usize {
        self.selectors.len()
    }

    fn visit_node(&mut self, ctx: &mut MigrationContext<'_>, file: &SourceFile, node: Node<'_>) {
        let Some((text, start)) = string_literal_text(file, node) else {
            return;
        };
        for compiled in self.selectors.iter().filter(|s| s.change.replace_in.string_literals) {
            let change = &compiled.change;
            for offset in bounded_matches(&compiled.selector, text) {
                ctx.edit(file.path())
                    .replace(start + offset, change.replace.len(), change.replace_with.as_str());
            }
        }
    }

    fn visit_template(&mut self, ctx: &mut MigrationContext<'_>, template: &ResolvedResource) {
        for compiled in &self.selectors {
            let needle = bare(&compiled.change.replace);
            let replacement = bare(&compiled.change.replace_with);
            for offset in bounded_matches(&compiled.class_name, &template.content) {
                ctx.replace_in_resource(template, offset, needle.len(), replacement);
            }
        }
    }

    fn visit_stylesheet(&mut self, ctx: &mut MigrationContext<'_>, stylesheet: &ResolvedResource) {
        for compiled in &self.selectors {
            let change = &compiled.change;
            for offset in bounded_matches(&compiled.selector, &stylesheet.content) {
                ctx.replace_in_resource(stylesheet, offset, change.replace.len(), &change.replace_with);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{ReplaceIn, TargetVersion, VersionChanges, VersionChangesEntry};
    use crate::file_system::MemoryFileSystem;
    use crate::migrations::test_support::run;
    use pretty_assertions::assert_eq;

    fn data(string_literals: bool) -> UpgradeData {
        let mut changes = VersionChanges::new();
        changes.insert(
            TargetVersion::V8,
            vec![VersionChangesEntry {
                pr: "#9".into(),
                changes: vec![CssSelectorUpgradeData {
                    replace: ".ui-btn".into(),
                    replace_with: ".ui-button".into(),
                    replace_in: ReplaceIn { string_literals },
                }],
            }],
        );
        UpgradeData {
            css_selectors: Some(changes),
            ..Default::default()
        }
    }

    #[test]
    fn test_bounded_matches() {
        let pattern = bounded(".ui-btn").unwrap();
        assert_eq!(bounded_matches(&pattern, ".ui-btn,.ui-btn-primary .ui-btn:hover"), vec![0, 24]);
        assert_eq!(bounded_matches(&pattern, "a.ui-btn"), vec![1]);
        assert!(bounded_matches(&bounded("ui-btn").unwrap(), "xui-btn").is_empty());
    }

    #[test]
    fn test_stylesheet_and_template() {
        let mut fs = MemoryFileSystem::new("/ws")
            .with_file(
                "a.rs",
                "#[component(template = \"<a class=\\\"ui-btn ui-btn-flat\\\"></a>\", styles = [\".ui-btn { }\"])]\nstruct A;\nconst S: &str = \".ui-btn\";\n",
            );

        run(&mut fs, CssSelectorsMigration::create, &data(false), &[]);
        assert_eq!(
            fs.get("a.rs").unwrap(),
            "#[component(template = \"<a class=\\\"ui-button ui-btn-flat\\\"></a>\", styles = [\".ui-button { }\"])]\nstruct A;\nconst S: &str = \".ui-btn\";\n"
        );
    }

    #[test]
    fn test_string_literals_opt_in() {
        let mut fs = MemoryFileSystem::new("/ws").with_file("a.rs", "const S: &str = \".ui-btn > span\";\n");
        run(&mut fs, CssSelectorsMigration::create, &data(true), &[]);
        assert_eq!(fs.get("a.rs").unwrap(), "const S: &str = \".ui-button > span\";\n");
    }
}
