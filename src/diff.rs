//! Revision comparison: positional line diff plus an edit-distance similarity.

use crate::revision::Revision;

/// Line-level differences between two snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffResult {
    /// `+{line}: {text}` for lines only present in the new snapshot.
    pub added: Vec<String>,
    /// `-{line}: {text}` for lines only present in the old snapshot.
    pub removed: Vec<String>,
    /// `~{line}: {old} → {new}` for lines that differ at the same position.
    pub modified: Vec<String>,
    pub unchanged: usize,
}

impl DiffResult {
    pub fn change_count(&self) -> usize {
        self.added.len() + self.removed.len() + self.modified.len()
    }

    pub fn is_identical(&self) -> bool {
        self.change_count() == 0
    }

    /// Every change line, ordered by line number.
    pub fn lines(&self) -> Vec<&str> {
        let mut lines: Vec<&str> = self
            .added
            .iter()
            .chain(&self.removed)
            .chain(&self.modified)
            .map(String::as_str)
            .collect();
        lines.sort_by_key(|line| line_number(line));
        lines
    }
}

fn line_number(line: &str) -> usize {
    line.get(1..)
        .and_then(|rest| rest.split(':').next())
        .and_then(|n| n.parse().ok())
        .unwrap_or(usize::MAX)
}

/// Result of comparing two revisions of the same note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison<'a> {
    pub old_revision: &'a Revision,
    pub new_revision: &'a Revision,
    pub diff: DiffResult,
    pub similarity: u8,
}

/// Compare two texts line by line at matching positions.
///
/// This is deliberately not an LCS diff: inserting a line shifts every later
/// line and each shifted line is reported as modified.
pub fn diff(old_text: &str, new_text: &str) -> DiffResult {
    let old_lines: Vec<&str> = old_text.split('\n').collect();
    let new_lines: Vec<&str> = new_text.split('\n').collect();
    let mut result = DiffResult::default();

    for i in 0..old_lines.len().max(new_lines.len()) {
        let line_no = i + 1;
        match (old_lines.get(i), new_lines.get(i)) {
            (None, Some(new)) => result.added.push(format!("+{line_no}: {new}")),
            (Some(old), None) => {
                result.removed.push(format!("-{line_no}: {old}"))
            }
            (Some(old), Some(new)) if old != new => {
                result.modified.push(format!("~{line_no}: {old} → {new}"))
            }
            (Some(_), Some(_)) => result.unchanged += 1,
            (None, None) => {}
        }
    }
    result
}

/// Unit-cost edit distance between two strings, counted in chars.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr: Vec<usize> = vec![0; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Similarity as an integer percentage: 100 for identical texts, 0 when only
/// one side is empty, otherwise the normalized edit distance.
///
/// The distance is a full O(n·m) computation, fine for note-sized text.
pub fn similarity(old_text: &str, new_text: &str) -> u8 {
    if old_text == new_text {
        return 100;
    }
    if old_text.is_empty() || new_text.is_empty() {
        return 0;
    }
    let max_len = old_text.chars().count().max(new_text.chars().count());
    let distance = levenshtein(old_text, new_text);
    let score = 100.0 * (max_len - distance) as f64 / max_len as f64;
    score.round() as u8
}

/// Diff and score two revisions, keeping both snapshots for display.
pub fn compare<'a>(
    old_revision: &'a Revision,
    new_revision: &'a Revision,
) -> Comparison<'a> {
    let diff = diff(&old_revision.content, &new_revision.content);
    let similarity = similarity(&old_revision.content, &new_revision.content);
    tracing::debug!(
        old = %old_revision.id,
        new = %new_revision.id,
        changes = diff.change_count(),
        similarity,
        "compared revisions"
    );
    Comparison { old_revision, new_revision, diff, similarity }
}
