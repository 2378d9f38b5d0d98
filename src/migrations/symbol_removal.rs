//! Reports imports of symbols that were removed without a replacement.

use crate::data::{SymbolRemovalUpgradeData, UpgradeData, get_changes_for_target};
use crate::error::UpdateResult;
use crate::migration::{Migration, MigrationContext, MigrationSetup};
use crate::program::{Node, SourceFile};

use super::use_leaves;

pub struct SymbolRemovalMigration {
    data: Vec<SymbolRemovalUpgradeData>,
}

impl SymbolRemovalMigration {
    pub fn create(setup: &MigrationSetup<'_, UpgradeData>) -> UpdateResult<Box<dyn Migration>> {
        let data = get_changes_for_target(setup.target, setup.data.symbol_removals.as_ref(), "symbol_removals")?;
        Ok(Box::new(Self { data }))
    }
}

impl Migration for SymbolRemovalMigration {
    fn name(&self) -> &'static str {
        "symbol-removal"
    }

    fn enabled(&self) -> bool {
        !self.data.is_empty()
    }

    fn change_count(&self) -> usize {
        self.data.len()
    }

    fn visit_node(&mut self, ctx: &mut MigrationContext<'_>, file: &SourceFile, node: Node<'_>) {
        let Node::Item(syn::Item::Use(item)) = node else {
            return;
        };
        for leaf in use_leaves(item) {
            let module = leaf.module_path();
            let removed = self
                .data
                .iter()
                .find(|symbol| leaf.ident == symbol.name.as_str() && module == symbol.module);
            if let Some(symbol) = removed {
                ctx.create_failure_at_node(file, leaf.ident.span(), symbol.message.clone());
            }
        }
    }
}
