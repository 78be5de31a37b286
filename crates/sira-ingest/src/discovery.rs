//! Workbook discovery.

use std::path::{Path, PathBuf};

use crate::error::{IngestError, Result};

/// Recognized workbook extensions, matched case-insensitively.
const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xls"];

/// Lists all workbooks in a directory, sorted by file name.
pub fn list_workbooks(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let entries = std::fs::read_dir(dir).map_err(|e| IngestError::DirectoryRead {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut files = Vec::new();
    for entry_result in entries {
        let entry = entry_result.map_err(|e| IngestError::DirectoryRead {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        // Excel lock files start with "~$".
        if path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with("~$"))
        {
            continue;
        }
        let is_workbook = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                WORKBOOK_EXTENSIONS
                    .iter()
                    .any(|known| ext.eq_ignore_ascii_case(known))
            });
        if is_workbook {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        for name in &[
            "b_septiembre.xlsx",
            "a_agosto.xls",
            "notas.txt",
            "resumen.csv",
            "~$b_septiembre.xlsx",
        ] {
            std::fs::write(dir.path().join(name), b"stub").unwrap();
        }
        dir
    }

    #[test]
    fn lists_only_workbooks_sorted_by_name() {
        let dir = create_test_dir();
        let files = list_workbooks(dir.path()).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["a_agosto.xls", "b_septiembre.xlsx"]);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(
            list_workbooks(&missing),
            Err(IngestError::DirectoryNotFound { .. })
        ));
    }
}
