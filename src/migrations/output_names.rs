//! Renames component outputs in template event bindings.

use crate::data::{OutputNameUpgradeData, UpgradeData, get_changes_for_target};
use crate::error::UpdateResult;
use crate::html;
use crate::migration::{Migration, MigrationContext, MigrationSetup};
use crate::resources::ResolvedResource;

use super::input_names::binding_offsets;

pub struct OutputNamesMigration {
    data: Vec<OutputNameUpgradeData>,
}

impl OutputNamesMigration {
    pub fn create(setup: &MigrationSetup<'_, UpgradeData>) -> UpdateResult<Box<dyn Migration>> {
        let data = get_changes_for_target(setup.target, setup.data.output_names.as_ref(), "output_names")?;
        Ok(Box::new(Self { data }))
    }
}

impl Migration for OutputNamesMigration {
    fn name(&self) -> &'static str {
        "output-names"
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
                || html::find_outputs(content, &change.replace),
                |tags| html::find_outputs_on_element_with_tag(content, &change.replace, tags),
                |attrs| html::find_outputs_on_element_with_attr(content, &change.replace, attrs),
            );
            for offset in offsets {
                ctx.replace_in_resource(template, offset, change.replace.len(), &change.replace_with);
            }
        }
    }
}
