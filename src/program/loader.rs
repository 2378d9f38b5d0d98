//! Source discovery on disk.

use std::fs;
use std::path::{Path, PathBuf};

/// Directory names never descended into.
pub const DEFAULT_SKIP_DIRS: &[&str] = &["target", "node_modules", ".git", "vendor", "dist"];

/// Recursively collect `.rs` files below `root`, sorted by path.
///
/// `root` may also be a single file. Unreadable directories are skipped.
pub fn discover_sources(root: &Path, skip_dirs: &[String]) -> Vec<PathBuf> {
    let mut found = Vec::new();
    if root.is_file() {
        if is_rust_source(root) {
            found.push(root.to_path_buf());
        }
    } else if root.is_dir() {
        scan_dir(root, skip_dirs, &mut found);
    }
    found.sort();
    found
}

fn scan_dir(dir: &Path, skip_dirs: &[String], found: &mut Vec<PathBuf>) {
    let entries = match fs::read_dir(dir) {
        Ok(e) => e,
        Err(e) => {
            tracing::debug!("Cannot read {}: {}", dir.display(), e);
            return;
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
            if DEFAULT_SKIP_DIRS.contains(&name) || skip_dirs.iter().any(|s| s == name) {
                continue;
            }
            scan_dir(&path, skip_dirs, found);
        } else if is_rust_source(&path) {
            found.push(path);
        }
    }
}

fn is_rust_source(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "rs")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discover_skips_build_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("src/widgets")).unwrap();
        fs::create_dir_all(root.join("target/debug")).unwrap();
        fs::create_dir_all(root.join("generated")).unwrap();
        fs::write(root.join("src/lib.rs"), "").unwrap();
        fs::write(root.join("src/widgets/button.rs"), "").unwrap();
        fs::write(root.join("src/widgets/button.html"), "").unwrap();
        fs::write(root.join("target/debug/build.rs"), "").unwrap();
        fs::write(root.join("generated/out.rs"), "").unwrap();

        let found = discover_sources(root, &["generated".to_string()]);
        assert_eq!(
            found,
            vec![root.join("src/lib.rs"), root.join("src/widgets/button.rs")]
        );
    }

    #[test]
    fn test_discover_single_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("main.rs");
        fs::write(&file, "fn main() {}").unwrap();
        assert_eq!(discover_sources(&file, &[]), vec![file]);
    }
}
