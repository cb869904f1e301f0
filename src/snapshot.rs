use std::path::{Path, PathBuf};

use tracing::warn;

use crate::page::PageInput;

/// Failures of the page source, raised before any extraction runs.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed snapshot {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("{} is not a directory", .0.display())]
    NotADirectory(PathBuf),
}

pub fn load_file(path: impl AsRef<Path>) -> Result<PageInput, SnapshotError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| SnapshotError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut page: PageInput =
        serde_json::from_str(&content).map_err(|source| SnapshotError::Json {
            path: path.to_path_buf(),
            source,
        })?;
    if page.source.trim().is_empty() {
        page.source = path.display().to_string();
    }
    Ok(page)
}

/// Every `*.json` snapshot in `dir`, sorted by file name. Unreadable or
/// malformed files are logged and skipped.
pub fn load_dir(dir: &Path, limit: Option<usize>) -> Result<Vec<PageInput>, SnapshotError> {
    if !dir.is_dir() {
        return Err(SnapshotError::NotADirectory(dir.to_path_buf()));
    }
    let entries = std::fs::read_dir(dir).map_err(|source| SnapshotError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|e| e.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    paths.sort();

    let mut pages = Vec::new();
    for path in paths {
        if limit.is_some_and(|n| pages.len() >= n) {
            break;
        }
        match load_file(&path) {
            Ok(page) => pages.push(page),
            Err(e) => warn!(error = %e, "skipping snapshot"),
        }
    }
    Ok(pages)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_fixture() {
        let page = load_file("tests/fixtures/ebay_sapphire.json").unwrap();
        assert_eq!(page.source, "https://www.ebay.com/itm/295512873301");
        assert_eq!(page.regions.structured_details.len(), 1);
        assert!(page.document_text.contains("itemAttributes"));
    }

    #[test]
    fn optional_regions_default() {
        let page = load_file("tests/fixtures/blank_page.json").unwrap();
        assert!(page.regions.structured_details.is_empty());
        assert!(page.regions.description.is_empty());
        assert!(page.is_blank());
    }

    #[test]
    fn malformed_and_missing() {
        assert!(matches!(
            load_file("tests/fixtures/truncated.json"),
            Err(SnapshotError::Json { .. })
        ));
        assert!(matches!(
            load_file("tests/fixtures/does_not_exist.json"),
            Err(SnapshotError::Io { .. })
        ));
    }

    #[test]
    fn directory_skips_broken_files() {
        let pages = load_dir(Path::new("tests/fixtures"), None).unwrap();
        let sources: Vec<&str> = pages.iter().map(|p| p.source.as_str()).collect();
        assert_eq!(pages.len(), 3);
        assert!(sources.contains(&"https://www.ebay.com/itm/295512873301"));

        let limited = load_dir(Path::new("tests/fixtures"), Some(1)).unwrap();
        assert_eq!(limited.len(), 1);
    }

    #[test]
    fn not_a_directory() {
        assert!(matches!(
            load_dir(Path::new("tests/fixtures/blank_page.json"), None),
            Err(SnapshotError::NotADirectory(_))
        ));
    }
}
