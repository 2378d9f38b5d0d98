//! Runs migrations over every configured compilation unit of a workspace.

use std::collections::HashSet;
use std::path::Path;

use crate::config::{ToolConfig, UnitConfig};
use crate::data::{TargetVersion, UpgradeData};
use crate::error::UpdateResult;
use crate::file_system::{FileSystem, WorkspacePath};
use crate::migration::{MigrationFailure, MigrationRule};
use crate::program::{AttributeMetadataResolver, Program, discover_sources};
use crate::update_project::UpdateProject;

/// Result of migrating one unit.
#[derive(Debug)]
pub struct UnitReport {
    pub name: String,
    pub files: usize,
    pub failures: Vec<MigrationFailure>,
}

#[derive(Debug, Default)]
pub struct RunReport {
    pub units: Vec<UnitReport>,
}

impl RunReport {
    pub fn has_failures(&self) -> bool {
        self.units.iter().any(|u| !u.failures.is_empty())
    }

    pub fn failures(&self) -> impl Iterator<Item = &MigrationFailure> {
        self.units.iter().flat_map(|u| u.failures.iter())
    }
}

/// Migrate every unit in `config` to `target`.
///
/// Units share one analyzed set, so a file listed by several units is only
/// migrated once. Edits stay in the file system's ledger; committing them is
/// left to the caller.
pub fn migrate_workspace(
    fs: &mut dyn FileSystem,
    config: &ToolConfig,
    rules: &[MigrationRule<UpgradeData>],
    target: TargetVersion,
    data: &UpgradeData,
) -> UpdateResult<RunReport> {
    let mut analyzed = HashSet::new();
    let mut report = RunReport::default();

    let libraries = collect_files(&*fs, &config.library_dirs, &config.skip_dirs);
    let stylesheets: Vec<WorkspacePath> = config
        .global_stylesheets
        .iter()
        .map(|p| fs.resolve(&[p.as_path()]))
        .collect();

    for unit in config.units() {
        let sources = unit_sources(&*fs, &unit, &config.skip_dirs);
        let program = Program::load(&*fs, &sources, &libraries);
        tracing::info!("Unit {}: {} source file(s)", unit.name, program.len());

        let result = UpdateProject::new(&program, &mut *fs, &mut analyzed)
            .with_resolver(AttributeMetadataResolver::new(config.attributes.iter().cloned()))
            .migrate(rules, target, data, &stylesheets)?;

        report.units.push(UnitReport {
            name: unit.name,
            files: program.len(),
            failures: result.failures,
        });
    }
    Ok(report)
}

fn unit_sources(fs: &dyn FileSystem, unit: &UnitConfig, skip_dirs: &[String]) -> Vec<WorkspacePath> {
    collect_files(fs, &unit.roots, skip_dirs)
}

fn collect_files<P: AsRef<Path>>(fs: &dyn FileSystem, roots: &[P], skip_dirs: &[String]) -> Vec<WorkspacePath> {
    let mut files: Vec<WorkspacePath> = roots
        .iter()
        .flat_map(|root| discover_sources(fs.resolve(&[root.as_ref()]).as_path(), skip_dirs))
        .map(|path| fs.resolve(&[path.as_path()]))
        .collect();
    files.sort();
    files.dedup();
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{ElementSelectorUpgradeData, VersionChanges, VersionChangesEntry};
    use crate::file_system::DiskFileSystem;
    use crate::migrations::ElementSelectorsMigration;
    use std::fs;

    #[test]
    fn test_overlapping_units_migrate_once() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("src")).unwrap();
        fs::create_dir_all(root.join("tests")).unwrap();
        fs::write(
            root.join("src/card.rs"),
            "#[component(template = \"<ui-card></ui-card>\")]\npub struct Card;\n",
        )
        .unwrap();
        fs::write(root.join("tests/card.rs"), "#[test]\nfn renders() {}\n").unwrap();

        let config = ToolConfig::parse(
            "[[units]]\nname = \"app\"\nroots = [\"src\"]\n\n[[units]]\nname = \"tests\"\nroots = [\"tests\", \"src\"]\n",
        )
        .unwrap();

        let mut changes = VersionChanges::new();
        changes.insert(
            TargetVersion::V8,
            vec![VersionChangesEntry {
                pr: "#1".into(),
                changes: vec![ElementSelectorUpgradeData {
                    replace: "ui-card".into(),
                    replace_with: "ui-panel".into(),
                }],
            }],
        );
        let data = UpgradeData {
            element_selectors: Some(changes),
            ..Default::default()
        };

        let mut disk = DiskFileSystem::new(root).unwrap();
        let report = migrate_workspace(
            &mut disk,
            &config,
            &[ElementSelectorsMigration::create],
            TargetVersion::V8,
            &data,
        )
        .unwrap();
        assert_eq!(report.units.len(), 2);
        assert_eq!(report.units[1].files, 2);
        assert!(!report.has_failures());

        disk.commit_edits().unwrap();
        assert_eq!(
            fs::read_to_string(root.join("src/card.rs")).unwrap(),
            "#[component(template = \"<ui-panel></ui-panel>\")]\npub struct Card;\n"
        );
    }
}
