//! Runs a set of migrations over one compilation unit.

use std::collections::HashSet;

use crate::data::TargetVersion;
use crate::error::UpdateResult;
use crate::file_system::{FileSystem, WorkspacePath};
use crate::migration::{Migration, MigrationContext, MigrationFailure, MigrationRule, MigrationSetup};
use crate::program::{AttributeMetadataResolver, ComponentMetadataResolver, FileKind, Program};
use crate::resources::{ComponentResourceCollector, ResolvedResource};

/// Outcome of one [`UpdateProject::migrate`] call.
#[derive(Debug, Default)]
pub struct MigrationRunResult {
    pub has_failures: bool,
    pub failures: Vec<MigrationFailure>,
}

/// A migration together with the failures it reported in this run.
struct ActiveMigration {
    migration: Box<dyn Migration>,
    failures: Vec<MigrationFailure>,
}

/// Orchestrates migrations for one program.
///
/// The analyzed set is borrowed so that several projects (compilation units)
/// of one invocation share it: a file that belongs to more than one unit is
/// visited by the first run only.
pub struct UpdateProject<'a> {
    program: &'a Program,
    file_system: &'a mut dyn FileSystem,
    analyzed_files: &'a mut HashSet<WorkspacePath>,
    resolver: Box<dyn ComponentMetadataResolver + 'a>,
}

impl<'a> UpdateProject<'a> {
    pub fn new(
        program: &'a Program,
        file_system: &'a mut dyn FileSystem,
        analyzed_files: &'a mut HashSet<WorkspacePath>,
    ) -> Self {
        Self {
            program,
            file_system,
            analyzed_files,
            resolver: Box::new(AttributeMetadataResolver::default()),
        }
    }

    /// Use a different component attribute lookup.
    pub fn with_resolver(mut self, resolver: impl ComponentMetadataResolver + 'a) -> Self {
        self.resolver = Box::new(resolver);
        self
    }

    /// Run `rules` against the program.
    ///
    /// Edits are only recorded; the caller commits them through the file
    /// system once every unit has been migrated.
    pub fn migrate<D>(
        &mut self,
        rules: &[MigrationRule<D>],
        target: TargetVersion,
        data: &D,
        extra_stylesheets: &[WorkspacePath],
    ) -> UpdateResult<MigrationRunResult> {
        let program = self.program;
        let setup = MigrationSetup { program, target, data };

        let mut migrations = Vec::with_capacity(rules.len());
        for rule in rules {
            let mut active = ActiveMigration {
                migration: rule(&setup)?,
                failures: Vec::new(),
            };
            active.migration.init(&mut MigrationContext::new(
                program,
                target,
                &mut *self.file_system,
                &mut active.failures,
            ));
            if active.migration.enabled() {
                migrations.push(active);
            } else {
                tracing::debug!("Migration {} has nothing to do for {}", active.migration.name(), target);
            }
        }

        tracing::info!(
            "Migrating {} file(s) to {} with {} migration(s)",
            program.len(),
            target,
            migrations.len()
        );

        let resolver = &*self.resolver;
        let mut collector = ComponentResourceCollector::new(resolver);

        for file in program.source_files() {
            if matches!(file.kind(), FileKind::Declaration | FileKind::Library) {
                continue;
            }
            if self.analyzed_files.contains(file.path()) {
                tracing::debug!("Already analyzed {}", file.path());
                continue;
            }

            let file_system = &mut *self.file_system;
            file.walk(&mut |node| {
                for active in migrations.iter_mut() {
                    let mut ctx = MigrationContext::new(program, target, &mut *file_system, &mut active.failures);
                    active.migration.visit_node(&mut ctx, file, node);
                }
                collector.visit_node(file, node, &*file_system);
            });
            self.analyzed_files.insert(file.path().clone());
        }

        let extra: Vec<ResolvedResource> = extra_stylesheets
            .iter()
            .filter_map(|path| collector.resolve_external_stylesheet(path, None, &*self.file_system))
            .collect();
        let ComponentResourceCollector {
            templates,
            stylesheets,
            ..
        } = collector;

        for template in &templates {
            if self.should_dispatch(template) {
                self.dispatch(&mut migrations, program, target, template, ResourceHook::Template);
            }
        }

        for stylesheet in stylesheets.iter().chain(&extra) {
            if self.should_dispatch(stylesheet) {
                self.dispatch(&mut migrations, program, target, stylesheet, ResourceHook::Stylesheet);
            }
        }

        for active in migrations.iter_mut() {
            let mut ctx = MigrationContext::new(program, target, &mut *self.file_system, &mut active.failures);
            active.migration.post_analysis(&mut ctx);
        }

        let failures: Vec<MigrationFailure> = migrations.into_iter().flat_map(|a| a.failures).collect();
        for failure in &failures {
            tracing::warn!("{}", failure);
        }

        Ok(MigrationRunResult {
            has_failures: !failures.is_empty(),
            failures,
        })
    }

    /// Inline resources always belong to a file visited in this run; external
    /// ones are dispatched once per invocation.
    fn should_dispatch(&mut self, resource: &ResolvedResource) -> bool {
        if resource.inline {
            return true;
        }
        self.analyzed_files.insert(resource.file_path.clone())
    }

    fn dispatch(
        &mut self,
        migrations: &mut [ActiveMigration],
        program: &Program,
        target: TargetVersion,
        resource: &ResolvedResource,
        hook: ResourceHook,
    ) {
        for active in migrations.iter_mut() {
            let mut ctx = MigrationContext::new(program, target, &mut *self.file_system, &mut active.failures);
            match hook {
                ResourceHook::Template => active.migration.visit_template(&mut ctx, resource),
                ResourceHook::Stylesheet => active.migration.visit_stylesheet(&mut ctx, resource),
            }
        }
    }
}

#[derive(Clone, Copy)]
enum ResourceHook {
    Template,
    Stylesheet,
}
