use crate::tree::CountableNote;
use chrono::{DateTime, FixedOffset, Local};
use std::cmp::Ordering;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const TIME_FMT: &str = "%d%b%y %H:%M %:z";
pub const ID_TS_WIDTH: usize = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NoteStatus {
    #[default]
    Active,
    OnHold,
    Completed,
    Dropped,
    Archived,
}

impl NoteStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            NoteStatus::Active => "active",
            NoteStatus::OnHold => "on-hold",
            NoteStatus::Completed => "completed",
            NoteStatus::Dropped => "dropped",
            NoteStatus::Archived => "archived",
        }
    }
}

impl fmt::Display for NoteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NoteStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(NoteStatus::Active),
            "on-hold" | "onhold" => Ok(NoteStatus::OnHold),
            "completed" => Ok(NoteStatus::Completed),
            "dropped" => Ok(NoteStatus::Dropped),
            "archived" => Ok(NoteStatus::Archived),
            other => Err(format!(
                "Unknown status `{other}` (expected active|on-hold|completed|dropped|archived)"
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Note {
    pub id: String,
    pub title: String,
    pub created: String,
    pub updated: String,
    pub notebook: String,
    pub status: NoteStatus,
    pub deleted_at: Option<String>,
    pub body: String,
    pub size_bytes: u64,
}

impl Note {
    /// Body without the trailing newline the file writer appends.
    pub fn content(&self) -> &str {
        self.body.trim_end_matches('\n')
    }
}

impl CountableNote for Note {
    fn notebook(&self) -> &str {
        &self.notebook
    }

    fn is_trashed(&self) -> bool {
        self.deleted_at.is_some()
    }

    fn status(&self) -> &str {
        self.status.as_str()
    }
}

pub fn ensure_dir(path: &Path) -> io::Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

pub fn note_path(dir: &Path, id: &str) -> PathBuf {
    dir.join(format!("{id}.md"))
}

pub fn timestamp_string() -> String {
    Local::now().format(TIME_FMT).to_string()
}

pub fn parse_timestamp(ts: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_str(ts, TIME_FMT).ok()
}

pub fn cmp_dt(a: &str, b: &str) -> Ordering {
    match (parse_timestamp(a), parse_timestamp(b)) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        _ => a.cmp(b),
    }
}

/// Whether `value` fits on a single `Key: value` header line.
pub fn is_header_safe(value: &str) -> bool {
    !value.chars().any(char::is_control)
}

/// Split a `Key: value` header block from the body at the first `---` line.
pub(crate) fn split_header(raw: &str) -> (&str, &str) {
    if let Some(idx) = raw.find("\n---\n") {
        (&raw[..idx], &raw[idx + 5..])
    } else {
        ("", raw)
    }
}

pub fn write_note(note: &Note, dir: &Path) -> io::Result<()> {
    let mut body = note.body.trim_end_matches('\n').to_string();
    body.push('\n');
    let deleted_line = note
        .deleted_at
        .as_ref()
        .map(|d| format!("Deleted: {d}\n"))
        .unwrap_or_default();
    let content = format!(
        "Title: {}\nCreated: {}\nUpdated: {}\nNotebook: {}\nStatus: {}\n{}---\n{}",
        note.title,
        note.created,
        note.updated,
        note.notebook,
        note.status,
        deleted_line,
        body
    );
    fs::write(note_path(dir, &note.id), content)
}

pub fn parse_note(path: &Path, size_bytes: u64) -> io::Result<Note> {
    let raw = fs::read_to_string(path)?;
    let (header, body) = split_header(&raw);

    let mut title = String::new();
    let mut created = String::new();
    let mut updated = String::new();
    let mut notebook = String::new();
    let mut status = NoteStatus::default();
    let mut deleted_at: Option<String> = None;

    for line in header.lines() {
        if let Some(val) = line.strip_prefix("Title:") {
            title = val.trim().to_string();
        } else if let Some(val) = line.strip_prefix("Created:") {
            created = val.trim().to_string();
        } else if let Some(val) = line.strip_prefix("Updated:") {
            updated = val.trim().to_string();
        } else if let Some(val) = line.strip_prefix("Notebook:") {
            notebook = val.trim().to_string();
        } else if let Some(val) = line.strip_prefix("Status:") {
            status = val.parse().unwrap_or_else(|err| {
                tracing::warn!(path = %path.display(), %err, "falling back to active status");
                NoteStatus::Active
            });
        } else if let Some(val) = line.strip_prefix("Deleted:") {
            deleted_at = Some(val.trim().to_string());
        }
    }

    Ok(Note {
        id: path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string(),
        title,
        created,
        updated,
        notebook,
        status,
        deleted_at,
        body: body.to_string(),
        size_bytes,
    })
}

/// All `*.md` files directly inside `dir`, with their sizes.
pub fn list_note_files(dir: &Path) -> io::Result<Vec<(PathBuf, u64)>> {
    let mut files = Vec::new();
    if !dir.exists() {
        return Ok(files);
    }
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file()
            && entry.path().extension().and_then(|s| s.to_str()) == Some("md")
        {
            let size = entry.metadata()?.len();
            files.push((entry.path(), size));
        }
    }
    Ok(files)
}

/// Parse every note in `dir`, skipping files that fail to read.
pub fn load_notes(dir: &Path) -> io::Result<Vec<Note>> {
    let mut notes = Vec::new();
    for (path, size) in list_note_files(dir)? {
        match parse_note(&path, size) {
            Ok(note) => notes.push(note),
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "skipping unreadable note")
            }
        }
    }
    Ok(notes)
}

/// Timestamp-derived id, bumped by one microsecond until `taken` rejects it.
pub fn generate_id(taken: impl Fn(&str) -> bool) -> String {
    let mut ts = Local::now().timestamp_micros().max(0) as u64;
    loop {
        let id = encode_base62_width(ts, ID_TS_WIDTH);
        if !taken(&id) {
            return id;
        }
        ts += 1;
    }
}

fn encode_base62(num: u64) -> String {
    const ALPHABET: &[u8] =
        b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";
    if num == 0 {
        return "0".to_string();
    }
    let mut n = num;
    let base = ALPHABET.len() as u64;
    let mut out = Vec::new();
    while n > 0 {
        out.push(ALPHABET[(n % base) as usize] as char);
        n /= base;
    }
    out.iter().rev().collect()
}

fn encode_base62_width(num: u64, width: usize) -> String {
    format!("{:0>width$}", encode_base62(num))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample() -> Note {
        Note {
            id: "abc".to_string(),
            title: "Plan".to_string(),
            created: "01Jan24 10:00 +00:00".to_string(),
            updated: "02Jan24 10:00 +00:00".to_string(),
            notebook: "Work".to_string(),
            status: NoteStatus::OnHold,
            deleted_at: None,
            body: "line one\nline two".to_string(),
            size_bytes: 0,
        }
    }

    #[test]
    fn test_write_then_parse_keeps_fields() {
        let tmp = tempdir().unwrap();
        let mut note = sample();
        note.deleted_at = Some("03Jan24 10:00 +00:00".to_string());
        write_note(&note, tmp.path()).unwrap();

        let path = note_path(tmp.path(), "abc");
        let parsed = parse_note(&path, 0).unwrap();
        assert_eq!(parsed.title, "Plan");
        assert_eq!(parsed.notebook, "Work");
        assert_eq!(parsed.status, NoteStatus::OnHold);
        assert_eq!(parsed.deleted_at.as_deref(), Some("03Jan24 10:00 +00:00"));
        assert_eq!(parsed.body, "line one\nline two\n");
        assert_eq!(parsed.content(), "line one\nline two");
        assert!(parsed.is_trashed());
    }

    #[test]
    fn test_header_safe_rejects_line_breaks() {
        assert!(is_header_safe("Work Projects"));
        assert!(!is_header_safe("Side\nStatus: archived"));
        assert!(!is_header_safe("tab\there"));
        assert!(!is_header_safe("cr\r"));
    }

    #[test]
    fn test_parse_unknown_status_falls_back() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("x.md");
        fs::write(&path, "Title: X\nStatus: someday\n---\nbody\n").unwrap();
        let note = parse_note(&path, 0).unwrap();
        assert_eq!(note.status, NoteStatus::Active);
        assert_eq!(note.id, "x");
    }

    #[test]
    fn test_status_round_trip_strings() {
        assert_eq!("On-Hold".parse::<NoteStatus>(), Ok(NoteStatus::OnHold));
        assert_eq!(NoteStatus::Archived.to_string(), "archived");
        assert!("later".parse::<NoteStatus>().is_err());
    }

    #[test]
    fn test_countable_note_excludes_terminal() {
        let mut note = sample();
        assert!(note.counts_toward("Work"));
        assert!(!note.counts_toward("Home"));
        note.status = NoteStatus::Completed;
        assert!(!note.counts_toward("Work"));
    }

    #[test]
    fn test_generate_id_skips_taken() {
        let first = generate_id(|_| false);
        assert_eq!(first.len(), ID_TS_WIDTH);
        let next = generate_id(|id| id <= first.as_str());
        assert!(next > first);
    }

    #[test]
    fn test_cmp_dt_prefers_parseable() {
        let early = "01Jan24 10:00 +00:00";
        let late = "01Jan24 11:00 +00:00";
        assert_eq!(cmp_dt(early, late), Ordering::Less);
        assert_eq!(cmp_dt(late, "garbage"), Ordering::Greater);
    }

    #[test]
    fn test_encode_base62_width_pads() {
        assert_eq!(encode_base62_width(0, 3), "000");
        assert_eq!(encode_base62_width(61, 2), "0z");
        assert_eq!(encode_base62_width(62, 1), "10");
    }
}
