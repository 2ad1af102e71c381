//! Notebook persistence in `notebooks.json` next to the note files.

use crate::category::Category;
use crate::note::{ensure_dir, generate_id};
use crate::tree::build;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub fn notebooks_path(dir: &Path) -> PathBuf {
    dir.join("notebooks.json")
}

/// Load the notebook tree, seeding a single root named `default_name` when
/// nothing is stored yet or the stored list is empty. The result is always
/// rebuilt.
pub fn load_notebooks(dir: &Path, default_name: &str) -> io::Result<Vec<Category>> {
    let path = notebooks_path(dir);
    let stored: Vec<Category> = if path.exists() {
        serde_json::from_str(&fs::read_to_string(&path)?)?
    } else {
        Vec::new()
    };
    if stored.is_empty() {
        let id = generate_id(|_| false);
        let seeded = vec![Category::new(&id, default_name, None)];
        tracing::info!(name = default_name, "seeding default notebook");
        return save_notebooks(dir, &seeded);
    }
    Ok(build(&stored))
}

/// Rebuild and write the notebook tree, returning what was written.
pub fn save_notebooks(dir: &Path, nodes: &[Category]) -> io::Result<Vec<Category>> {
    ensure_dir(dir)?;
    let rebuilt = build(nodes);
    let json = serde_json::to_string_pretty(&rebuilt)?;
    fs::write(notebooks_path(dir), json)?;
    tracing::debug!(count = rebuilt.len(), "saved notebooks");
    Ok(rebuilt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_seeds_default_root() {
        let tmp = tempdir().unwrap();
        let nodes = load_notebooks(tmp.path(), "Inbox").unwrap();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].path, "Inbox");
        assert!(notebooks_path(tmp.path()).exists());

        let again = load_notebooks(tmp.path(), "Other").unwrap();
        assert_eq!(again, nodes);
    }

    #[test]
    fn test_save_rebuilds_derived_fields() {
        let tmp = tempdir().unwrap();
        let nodes = vec![
            Category::new("a", "Work", None),
            Category::new("b", "Projects", Some("a")),
        ];
        save_notebooks(tmp.path(), &nodes).unwrap();
        let loaded = load_notebooks(tmp.path(), "Inbox").unwrap();
        assert_eq!(loaded[1].path, "Work/Projects");
        assert_eq!(loaded[0].children, vec!["b"]);
    }

    #[test]
    fn test_load_reseeds_empty_list() {
        let tmp = tempdir().unwrap();
        fs::write(notebooks_path(tmp.path()), "[]").unwrap();
        let nodes = load_notebooks(tmp.path(), "Inbox").unwrap();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].path, "Inbox");
        assert!(nodes[0].parent_id.is_none());
    }

    #[test]
    fn test_load_rejects_garbage() {
        let tmp = tempdir().unwrap();
        fs::write(notebooks_path(tmp.path()), "not json").unwrap();
        assert!(load_notebooks(tmp.path(), "Inbox").is_err());
    }
}
