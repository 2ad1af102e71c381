use quick_notebooks::Category;
use quick_notebooks::TreeError;
use quick_notebooks::note::{Note, NoteStatus};
use quick_notebooks::tree::{
    build, deletion_set, flatten, move_category, with_counts,
};
use std::collections::{HashMap, HashSet};

fn cat(id: &str, name: &str, parent: Option<&str>) -> Category {
    Category::new(id, name, parent)
}

/// A > B > C and A > D, listed children-first to show order does not matter.
fn abcd() -> Vec<Category> {
    vec![
        cat("c", "C", Some("b")),
        cat("d", "D", Some("a")),
        cat("b", "B", Some("a")),
        cat("a", "A", None),
    ]
}

fn by_id(nodes: &[Category]) -> HashMap<String, Category> {
    nodes.iter().map(|n| (n.id.clone(), n.clone())).collect()
}

fn note(notebook: &str, trashed: bool, status: NoteStatus) -> Note {
    Note {
        id: String::new(),
        title: String::new(),
        created: String::new(),
        updated: String::new(),
        notebook: notebook.to_string(),
        status,
        deleted_at: trashed.then(|| "01Jan24 10:00 +00:00".to_string()),
        body: String::new(),
        size_bytes: 0,
    }
}

#[test]
fn build_is_a_fixed_point() {
    let once = build(&abcd());
    let twice = build(&once);
    let (once, twice) = (by_id(&once), by_id(&twice));
    assert_eq!(once.len(), twice.len());
    for (id, node) in &once {
        let again = &twice[id];
        assert_eq!(node.path, again.path);
        assert_eq!(node.level, again.level);
        assert_eq!(node.children, again.children);
    }
}

#[test]
fn path_and_level_follow_parent() {
    let built = build(&abcd());
    let index = by_id(&built);
    for node in &built {
        match node.parent_id.as_deref().and_then(|p| index.get(p)) {
            Some(parent) => {
                assert_eq!(node.path, format!("{}/{}", parent.path, node.name));
                assert_eq!(node.level, parent.level + 1);
            }
            None => {
                assert_eq!(node.path, node.name);
                assert_eq!(node.level, 0);
            }
        }
    }
}

#[test]
fn children_match_parent_links() {
    let built = build(&abcd());
    for node in &built {
        let expected: HashSet<&str> = built
            .iter()
            .filter(|n| n.parent_id.as_deref() == Some(node.id.as_str()))
            .map(|n| n.id.as_str())
            .collect();
        let actual: HashSet<&str> =
            node.children.iter().map(String::as_str).collect();
        assert_eq!(actual, expected);
        assert_eq!(node.children.len(), expected.len());
    }
}

#[test]
fn move_rewrites_whole_subtree() {
    let moved = move_category("b", Some("d"), &build(&abcd())).unwrap();
    let index = by_id(&moved);
    assert_eq!(index["b"].path, "A/D/B");
    assert_eq!(index["c"].path, "A/D/B/C");
    assert_eq!(index["b"].level, 2);
    assert_eq!(index["c"].level, 3);
    assert_eq!(index["a"].children, vec!["d"]);
    assert_eq!(index["d"].children, vec!["b"]);
}

#[test]
fn move_under_own_descendant_is_rejected() {
    let tree = build(&abcd());
    let before = tree.clone();
    let err = move_category("a", Some("c"), &tree).unwrap_err();
    assert_eq!(
        err,
        TreeError::InvalidMove { id: "a".to_string(), target: "c".to_string() }
    );
    assert_eq!(tree, before);
}

#[test]
fn deletion_set_covers_all_descendants() {
    let expected: HashSet<String> =
        ["a", "b", "c", "d"].iter().map(|s| s.to_string()).collect();
    assert_eq!(deletion_set("a", &abcd()), expected);
}

#[test]
fn counts_skip_trashed_and_terminal_notes() {
    let nodes = build(&[
        cat("w", "Work", None),
        cat("p", "Projects", Some("w")),
    ]);
    let notes = vec![
        note("Work", false, NoteStatus::Active),
        note("Work", false, NoteStatus::OnHold),
        note("Projects", false, NoteStatus::Active),
        note("Projects", true, NoteStatus::Active),
        note("Projects", false, NoteStatus::Archived),
    ];
    let counts = with_counts(&nodes, &notes);
    let work = counts.iter().find(|c| c.category.id == "w").unwrap();
    let projects = counts.iter().find(|c| c.category.id == "p").unwrap();
    assert_eq!(work.direct_count, 2);
    assert_eq!(projects.direct_count, 1);
    assert_eq!(projects.total_count, 1);
    assert_eq!(work.total_count, 3);
}

#[test]
fn flatten_visits_parents_before_children() {
    let flat = flatten(&build(&abcd()), None, true);
    let ids: Vec<&str> = flat.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "d", "b", "c"]);
}
