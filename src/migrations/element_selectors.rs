//! Renames element selectors, e.g. `<ui-card>` to `<ui-panel>`.

use crate::data::{ElementSelectorUpgradeData, UpgradeData, get_changes_for_target};
use crate::error::UpdateResult;
use crate::migration::{Migration, MigrationContext, MigrationSetup};
use crate::program::{Node, SourceFile};
use crate::resources::ResolvedResource;

use super::{replace_all_in_resource, replace_all_in_text, string_literal_text};

pub struct ElementSelectorsMigration {
    data: Vec<ElementSelectorUpgradeData>,
}

impl ElementSelectorsMigration {
    pub fn create(setup: &MigrationSetup<'_, UpgradeData>) -> UpdateResult<Box<dyn Migration>> {
        let data = get_changes_for_target(setup.target, setup.data.element_selectors.as_ref(), "element_selectors")?;
        Ok(Box::new(Self { data }))
    }

    fn replace_in(&self, ctx: &mut MigrationContext<'_>, resource: &ResolvedResource) {
        for change in &self.data {
            replace_all_in_resource(ctx, resource, &change.replace, &change.replace_with);
        }
    }
}

impl Migration for ElementSelectorsMigration {
    fn name(&self) -> &'static str {
        "element-selectors"
    }

    fn enabled(&self) -> bool {
        !self.data.is_empty()
    }

    fn change_count(&self) -> usize {
        self.data.len()
    }

    fn visit_node(&mut self, ctx: &mut MigrationContext<'_>, file: &SourceFile, node: Node<'_>) {
        if let Some((text, start)) = string_literal_text(file, node) {
            for change in &self.data {
                replace_all_in_text(ctx, file.path(), text, start, &change.replace, &change.replace_with);
            }
        }
    }

    fn visit_template(&mut self, ctx: &mut MigrationContext<'_>, template: &ResolvedResource) {
        self.replace_in(ctx, template);
    }

    fn visit_stylesheet(&mut self, ctx: &mut MigrationContext<'_>, stylesheet: &ResolvedResource) {
        self.replace_in(ctx, stylesheet);
    }
}
