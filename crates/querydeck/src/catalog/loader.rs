use std::fs;
use std::path::Path;

use super::model::{IdSequence, Query};
use super::parser::QueryParser;
use crate::utils::time::now_secs;

/// Snapshot of all queries loaded for a session, plus load bookkeeping.
///
/// A reload produces a fresh `Catalog` that wholesale-replaces the previous
/// one; records are never mutated in place.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub queries: Vec<Query>,
    pub files_requested: usize,
    pub files_loaded: usize,
    pub loaded_at: u64,
}

/// Scans `sql_dir` for `*.sql` files (non-recursive, sorted by name) and
/// parses each one with a single shared id sequence.
///
/// A file that cannot be read is logged and skipped without aborting the rest
/// of the load. A missing directory yields an empty catalog.
pub fn load_catalog(sql_dir: &Path, parser: &QueryParser) -> Catalog {
    let mut catalog = Catalog {
        loaded_at: now_secs(),
        ..Default::default()
    };

    let names = match list_sql_file_names(sql_dir) {
        Ok(names) => names,
        Err(error) => {
            tracing::info!(dir = %sql_dir.display(), %error, "sql directory not readable, catalog is empty");
            return catalog;
        }
    };

    let mut ids = IdSequence::new();
    for name in names {
        catalog.files_requested += 1;
        let path = sql_dir.join(&name);
        match fs::read_to_string(&path) {
            Ok(text) => {
                let mut queries = parser.parse(&text, &name, &mut ids);
                tracing::debug!(file = %name, count = queries.len(), "parsed sql file");
                catalog.queries.append(&mut queries);
                catalog.files_loaded += 1;
            }
            Err(error) => {
                tracing::warn!(file = %name, %error, "skipping unreadable sql file");
            }
        }
    }

    tracing::info!(
        queries = catalog.queries.len(),
        files = catalog.files_loaded,
        requested = catalog.files_requested,
        "loaded query catalog"
    );
    catalog
}

/// Lists `*.sql` entries in the directory, sorted by name for a deterministic
/// load order.
pub fn list_sql_file_names(sql_dir: &Path) -> std::io::Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(sql_dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if name.ends_with(".sql") {
            names.push(name.to_string());
        }
    }
    names.sort();
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use tempfile::tempdir;

    #[test]
    fn loads_files_in_name_order() {
        let dir = tempdir().expect("tempdir");
        fs::write(
            dir.path().join("b_analytics.sql"),
            "-- Query 2.1: Later\nSELECT 2;\n",
        )
        .expect("write");
        fs::write(
            dir.path().join("a_demographics.sql"),
            "-- Query 1.1: Earlier\nSELECT 1;\n",
        )
        .expect("write");

        let catalog = load_catalog(dir.path(), &QueryParser::new());
        assert_eq!(catalog.files_requested, 2);
        assert_eq!(catalog.files_loaded, 2);
        assert_eq!(catalog.queries.len(), 2);
        assert_eq!(catalog.queries[0].title, "Earlier");
        assert_eq!(catalog.queries[1].title, "Later");
    }

    #[test]
    fn missing_directory_yields_empty_catalog() {
        let dir = tempdir().expect("tempdir");
        let catalog = load_catalog(&dir.path().join("nope"), &QueryParser::new());
        assert!(catalog.queries.is_empty());
        assert_eq!(catalog.files_requested, 0);
        assert_eq!(catalog.files_loaded, 0);
    }

    #[test]
    fn non_sql_files_are_ignored() {
        let dir = tempdir().expect("tempdir");
        fs::write(dir.path().join("readme.txt"), "not sql").expect("write");
        fs::write(dir.path().join("q.sql"), "-- Query 1.1: Q\nSELECT 1;\n").expect("write");

        let catalog = load_catalog(dir.path(), &QueryParser::new());
        assert_eq!(catalog.files_requested, 1);
        assert_eq!(catalog.queries.len(), 1);
    }

    #[test]
    fn unreadable_file_is_skipped_and_counted() {
        let dir = tempdir().expect("tempdir");
        // Invalid UTF-8 makes read_to_string fail for this entry only.
        fs::write(dir.path().join("broken.sql"), [0xff, 0xfe, 0x00]).expect("write");
        fs::write(dir.path().join("open.sql"), "-- Query 1.2: Visible\nSELECT 2;\n")
            .expect("write");

        let catalog = load_catalog(dir.path(), &QueryParser::new());
        assert_eq!(catalog.files_requested, 2);
        assert_eq!(catalog.files_loaded, 1);
        assert_eq!(catalog.queries.len(), 1);
        assert_eq!(catalog.queries[0].title, "Visible");
    }

    #[test]
    fn ids_are_unique_across_a_whole_load() {
        let dir = tempdir().expect("tempdir");
        // Same header in both files would collide without the shared sequence.
        let text = "-- Query 1.1: Same\nSELECT 1;\n";
        fs::write(dir.path().join("first_analytics.sql"), text).expect("write");
        fs::write(dir.path().join("second_analytics.sql"), text).expect("write");

        let catalog = load_catalog(dir.path(), &QueryParser::new());
        assert_eq!(catalog.queries.len(), 2);
        let ids: HashSet<&str> = catalog.queries.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids.len(), 2);
    }
}
