//! Migration lifecycle and the context migrations act through.
//!
//! A migration is created fresh for every run by a [`MigrationRule`], set up
//! once with [`Migration::init`], fed every node, template and stylesheet of
//! the run, and finalized with [`Migration::post_analysis`]. Migrations only
//! record edits and failures; they never write files.

mod failure;

use std::path::Path;

use proc_macro2::Span;

pub use failure::MigrationFailure;

use crate::data::TargetVersion;
use crate::error::UpdateResult;
use crate::file_system::{FileSystem, UpdateRecorder, WorkspacePath};
use crate::line_index::LineAndCharacter;
use crate::program::{Node, Program, SourceFile};
use crate::resources::ResolvedResource;

/// Everything a rule needs to build its migration for one run.
pub struct MigrationSetup<'a, D> {
    pub program: &'a Program,
    pub target: TargetVersion,
    pub data: &'a D,
}

/// Builds a migration for one run. Errors here are configuration errors and
/// abort the run.
pub type MigrationRule<D> = fn(&MigrationSetup<'_, D>) -> UpdateResult<Box<dyn Migration>>;

/// A single upgrade rule.
pub trait Migration {
    /// Stable name, used in logs and the rule listing.
    fn name(&self) -> &'static str;

    /// Decided at construction; disabled migrations never visit anything.
    fn enabled(&self) -> bool;

    /// Number of changes this migration applies for the run's target.
    fn change_count(&self) -> usize {
        0
    }

    fn init(&mut self, _ctx: &mut MigrationContext<'_>) {}

    fn visit_node(&mut self, _ctx: &mut MigrationContext<'_>, _file: &SourceFile, _node: Node<'_>) {}

    fn visit_template(&mut self, _ctx: &mut MigrationContext<'_>, _template: &ResolvedResource) {}

    fn visit_stylesheet(&mut self, _ctx: &mut MigrationContext<'_>, _stylesheet: &ResolvedResource) {}

    fn post_analysis(&mut self, _ctx: &mut MigrationContext<'_>) {}
}

/// Shared services handed to a migration on every callback.
pub struct MigrationContext<'a> {
    program: &'a Program,
    target: TargetVersion,
    file_system: &'a mut dyn FileSystem,
    failures: &'a mut Vec<MigrationFailure>,
}

impl<'a> MigrationContext<'a> {
    pub fn new(
        program: &'a Program,
        target: TargetVersion,
        file_system: &'a mut dyn FileSystem,
        failures: &'a mut Vec<MigrationFailure>,
    ) -> Self {
        Self {
            program,
            target,
            file_system,
            failures,
        }
    }

    pub fn program(&self) -> &Program {
        self.program
    }

    pub fn target(&self) -> TargetVersion {
        self.target
    }

    pub fn file_system(&self) -> &dyn FileSystem {
        &*self.file_system
    }

    pub fn resolve(&self, segments: &[&Path]) -> WorkspacePath {
        self.file_system.resolve(segments)
    }

    /// The edit recorder of `path`.
    pub fn edit(&mut self, path: &WorkspacePath) -> &mut UpdateRecorder {
        self.file_system.edit(path)
    }

    /// Replace `length` bytes at `offset` of a resource's content.
    pub fn replace_in_resource(&mut self, resource: &ResolvedResource, offset: usize, length: usize, text: &str) {
        let start = resource.absolute_offset(offset);
        self.file_system
            .edit(&resource.file_path)
            .remove(start, length)
            .insert_right(start, text);
    }

    pub fn failures(&self) -> &[MigrationFailure] {
        self.failures
    }

    pub fn create_failure(
        &mut self,
        file_path: WorkspacePath,
        message: impl Into<String>,
        position: Option<LineAndCharacter>,
    ) {
        self.failures.push(MigrationFailure {
            file_path,
            message: message.into(),
            position,
        });
    }

    /// Record a failure at the start of a syntax node.
    pub fn create_failure_at_node(&mut self, file: &SourceFile, span: Span, message: impl Into<String>) {
        let file_path = self.file_system.resolve(&[file.path().as_path()]);
        let position = file.line_and_character(file.span_start(span));
        self.create_failure(file_path, message, Some(position));
    }

    /// Record a failure at an offset of a resource's content.
    pub fn create_failure_at_resource(
        &mut self,
        resource: &ResolvedResource,
        offset: usize,
        message: impl Into<String>,
    ) {
        let position = resource.get_character_and_line_of_position(offset);
        self.create_failure(resource.file_path.clone(), message, Some(position));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_system::MemoryFileSystem;
    use crate::program::FileKind;

    #[test]
    fn test_failure_at_node_position() {
        let mut fs = MemoryFileSystem::new("/ws");
        let path = fs.insert("src/lib.rs", "use ui::Old;\n\nfn f() { let _ = Old; }\n");
        let mut program = Program::new();
        program
            .add_file(path.clone(), fs.get("src/lib.rs").unwrap().to_string(), FileKind::Source)
            .unwrap();
        let file = program.file(&path).unwrap();

        let mut idents = Vec::new();
        file.walk(&mut |node| {
            if let Some(ident) = node.as_ident().filter(|i| **i == "Old") {
                idents.push(ident.span());
            }
        });

        let mut failures = Vec::new();
        let mut ctx = MigrationContext::new(&program, TargetVersion::V8, &mut fs, &mut failures);
        ctx.create_failure_at_node(file, idents[1], "`Old` was removed");

        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].position, Some(LineAndCharacter { line: 2, character: 17 }));
        assert_eq!(failures[0].to_string(), "/ws/src/lib.rs@3:18 - `Old` was removed");
    }

    #[test]
    fn test_replace_in_resource_translates_offsets() {
        let mut fs = MemoryFileSystem::new("/ws");
        let path = fs.insert("a.html", "<div foo></div>");
        let resource = ResolvedResource::new(
            "<div foo></div>".to_string(),
            false,
            0,
            path.clone(),
            None,
            vec![0, 15].into(),
        );
        let program = Program::new();
        let mut failures = Vec::new();
        let mut ctx = MigrationContext::new(&program, TargetVersion::V8, &mut fs, &mut failures);
        ctx.replace_in_resource(&resource, 5, 3, "bar");

        let ops = fs.ledger().get(&path).unwrap().operations().len();
        assert_eq!(ops, 2);
    }
}
