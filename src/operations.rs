use crate::category::Category;
use crate::error::TreeError;
use crate::note::{
    Note, generate_id, is_header_safe, load_notes, note_path, parse_note,
    timestamp_string, write_note,
};
use crate::revision::{Revision, save_revision};
use crate::store::save_notebooks;
use crate::tree::{self, build, deletion_set, ensure_deletable};
use std::collections::HashSet;
use std::error::Error;
use std::fs;
use std::path::Path;

/// What a notebook deletion removed.
#[derive(Debug)]
pub struct DeleteOutcome {
    pub notebooks: Vec<Category>,
    pub removed: HashSet<String>,
    pub trashed_notes: Vec<String>,
}

/// Load a note by id
pub fn load_note(dir: &Path, id: &str) -> Result<Note, Box<dyn Error>> {
    let path = note_path(dir, id);
    if !path.exists() {
        return Err(format!("Note {id} not found").into());
    }
    let size = fs::metadata(&path)?.len();
    Ok(parse_note(&path, size)?)
}

/// Add a notebook under `parent` (or as a root) and rebuild the tree.
pub fn create_notebook(
    nodes: &[Category],
    name: &str,
    parent: Option<&str>,
) -> Result<(Vec<Category>, String), TreeError> {
    let name = name.trim();
    if name.is_empty() || name.contains('/') || !is_header_safe(name) {
        return Err(TreeError::InvalidName);
    }
    if let Some(p) = parent {
        if !nodes.iter().any(|n| n.id == p) {
            return Err(TreeError::NotFound { id: p.to_string() });
        }
    }
    let id = generate_id(|candidate| nodes.iter().any(|n| n.id == candidate));
    let mut next = nodes.to_vec();
    next.push(Category::new(&id, name, parent));
    tracing::info!(%id, name, parent = ?parent, "created notebook");
    Ok((build(&next), id))
}

/// Delete a notebook with its whole subtree and persist the remaining tree.
///
/// The last root notebook cannot be deleted. Live notes whose notebook name
/// no longer matches any remaining notebook are moved to the trash, but only
/// once `notebooks.json` has been written.
pub fn delete_notebook(
    dir: &Path,
    nodes: &[Category],
    id: &str,
) -> Result<DeleteOutcome, Box<dyn Error>> {
    ensure_deletable(id, nodes)?;
    let removed = deletion_set(id, nodes);
    let remaining: Vec<Category> = nodes
        .iter()
        .filter(|n| !removed.contains(&n.id))
        .cloned()
        .collect();
    let remaining = save_notebooks(dir, &remaining)?;

    let orphaned: HashSet<&str> = nodes
        .iter()
        .filter(|n| removed.contains(&n.id))
        .map(|n| n.name.as_str())
        .filter(|name| !remaining.iter().any(|n| n.name == *name))
        .collect();

    let mut trashed_notes = Vec::new();
    let now = timestamp_string();
    for mut note in load_notes(dir)? {
        if note.deleted_at.is_none() && orphaned.contains(note.notebook.as_str()) {
            note.deleted_at = Some(now.clone());
            write_note(&note, dir)?;
            trashed_notes.push(note.id);
        }
    }

    tracing::info!(
        id,
        removed = removed.len(),
        trashed = trashed_notes.len(),
        "deleted notebook"
    );
    Ok(DeleteOutcome { notebooks: remaining, removed, trashed_notes })
}

/// Replace a note's body, snapshotting the previous body first. Returns the
/// snapshot, or `None` when the body did not change.
pub fn update_body(
    dir: &Path,
    id: &str,
    body: &str,
) -> Result<Option<Revision>, Box<dyn Error>> {
    let mut note = load_note(dir, id)?;
    if note.content() == body.trim_end_matches('\n') {
        return Ok(None);
    }
    let revision = save_revision(dir, id, note.content())?;
    note.body = body.to_string();
    note.updated = timestamp_string();
    write_note(&note, dir)?;
    Ok(Some(revision))
}

/// Resolve a notebook key, reporting unknown keys as errors.
pub fn resolve_notebook<'a>(
    nodes: &'a [Category],
    key: &str,
) -> Result<&'a Category, TreeError> {
    tree::find(nodes, key).ok_or_else(|| TreeError::NotFound { id: key.to_string() })
}
