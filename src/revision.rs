//! Snapshots of note bodies kept under `revisions/<note-id>/<rev-id>.md`.

use crate::note::{
    Note, ensure_dir, generate_id, list_note_files, split_header,
    timestamp_string,
};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Pseudo revision id naming a note's present body.
pub const CURRENT: &str = "current";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Revision {
    pub id: String,
    pub note_id: String,
    pub created: String,
    pub content: String,
}

impl Revision {
    pub fn new(id: &str, note_id: &str, content: &str) -> Self {
        Self {
            id: id.to_string(),
            note_id: note_id.to_string(),
            created: timestamp_string(),
            content: content.to_string(),
        }
    }

    /// The note as it stands now, as a comparable snapshot.
    pub fn current(note: &Note) -> Self {
        Self {
            id: CURRENT.to_string(),
            note_id: note.id.clone(),
            created: note.updated.clone(),
            content: note.content().to_string(),
        }
    }
}

pub fn revisions_dir(dir: &Path, note_id: &str) -> PathBuf {
    dir.join("revisions").join(note_id)
}

fn revision_path(dir: &Path, note_id: &str, rev_id: &str) -> PathBuf {
    revisions_dir(dir, note_id).join(format!("{rev_id}.md"))
}

/// Store `content` as a new snapshot of `note_id`.
pub fn save_revision(
    dir: &Path,
    note_id: &str,
    content: &str,
) -> io::Result<Revision> {
    let rev_dir = revisions_dir(dir, note_id);
    ensure_dir(&rev_dir)?;
    let id = generate_id(|candidate| {
        revision_path(dir, note_id, candidate).exists()
    });
    let revision = Revision::new(&id, note_id, content.trim_end_matches('\n'));
    fs::write(
        revision_path(dir, note_id, &id),
        format!("Created: {}\n---\n{}", revision.created, revision.content),
    )?;
    tracing::info!(note = note_id, revision = %id, "saved revision");
    Ok(revision)
}

pub fn load_revision(
    dir: &Path,
    note_id: &str,
    rev_id: &str,
) -> io::Result<Revision> {
    let path = revision_path(dir, note_id, rev_id);
    if !path.exists() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("Revision {rev_id} of note {note_id} not found"),
        ));
    }
    parse_revision(&path, note_id)
}

fn parse_revision(path: &Path, note_id: &str) -> io::Result<Revision> {
    let raw = fs::read_to_string(path)?;
    let (header, body) = split_header(&raw);
    let created = header
        .lines()
        .find_map(|l| l.strip_prefix("Created:"))
        .map(|v| v.trim().to_string())
        .unwrap_or_default();
    Ok(Revision {
        id: path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string(),
        note_id: note_id.to_string(),
        created,
        content: body.to_string(),
    })
}

/// Every stored snapshot of `note_id`, oldest first.
pub fn list_revisions(dir: &Path, note_id: &str) -> io::Result<Vec<Revision>> {
    let mut revisions = Vec::new();
    for (path, _) in list_note_files(&revisions_dir(dir, note_id))? {
        revisions.push(parse_revision(&path, note_id)?);
    }
    revisions.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(revisions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_save_and_load_revision() {
        let tmp = tempdir().unwrap();
        let saved = save_revision(tmp.path(), "n1", "a\nb\n").unwrap();
        assert_eq!(saved.content, "a\nb");

        let loaded = load_revision(tmp.path(), "n1", &saved.id).unwrap();
        assert_eq!(loaded.content, "a\nb");
        assert_eq!(loaded.note_id, "n1");
        assert_eq!(loaded.created, saved.created);
    }

    #[test]
    fn test_list_revisions_sorted() {
        let tmp = tempdir().unwrap();
        let first = save_revision(tmp.path(), "n1", "one").unwrap();
        let second = save_revision(tmp.path(), "n1", "two").unwrap();
        let all = list_revisions(tmp.path(), "n1").unwrap();
        let ids: Vec<&str> = all.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec![first.id.as_str(), second.id.as_str()]);
        assert!(list_revisions(tmp.path(), "other").unwrap().is_empty());
    }

    #[test]
    fn test_missing_revision_is_not_found() {
        let tmp = tempdir().unwrap();
        let err = load_revision(tmp.path(), "n1", "nope").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
