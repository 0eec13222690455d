//! Locating publishable content on the local filesystem

use crate::error::Result;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// File extensions recognized as datasources
pub const DATASOURCE_EXTENSIONS: &[&str] = &["tds", "tdsx"];

/// File extensions recognized as workbooks
pub const WORKBOOK_EXTENSIONS: &[&str] = &["twb", "twbx"];

/// Find datasource files directly inside `folder`
pub fn find_datasources(folder: &Path) -> Result<Vec<PathBuf>> {
    find_with_extensions(folder, DATASOURCE_EXTENSIONS)
}

/// Find workbook files directly inside `folder`
pub fn find_workbooks(folder: &Path) -> Result<Vec<PathBuf>> {
    find_with_extensions(folder, WORKBOOK_EXTENSIONS)
}

/// Single-level scan: subdirectories are not descended into, and results are
/// sorted so publish order is deterministic
fn find_with_extensions(folder: &Path, extensions: &[&str]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(folder).min_depth(1).max_depth(1) {
        let entry = entry.map_err(std::io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.into_path();
        let matches = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                let ext = ext.to_ascii_lowercase();
                extensions.iter().any(|candidate| *candidate == ext)
            })
            .unwrap_or(false);

        if matches {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(dir: &TempDir, name: &str) {
        fs::write(dir.path().join(name), b"content").unwrap();
    }

    #[test]
    fn test_find_datasources_matches_both_extensions() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "sales.tds");
        touch(&dir, "inventory.tdsx");
        touch(&dir, "notes.txt");
        touch(&dir, "report.twbx");

        let found = find_datasources(dir.path()).unwrap();
        let names: Vec<_> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();

        assert_eq!(names, vec!["inventory.tdsx", "sales.tds"]);
    }

    #[test]
    fn test_find_workbooks_ignores_subdirectories() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "report.twb");
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested").join("hidden.twb"), b"x").unwrap();

        let found = find_workbooks(dir.path()).unwrap();
        assert_eq!(found.len(), 1);
        assert!(found[0].ends_with("report.twb"));
    }

    #[test]
    fn test_extension_match_is_case_insensitive() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "SALES.TDS");

        let found = find_datasources(dir.path()).unwrap();
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn test_empty_folder_is_not_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(find_workbooks(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_missing_folder_is_an_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        assert!(find_datasources(&missing).is_err());
    }
}
