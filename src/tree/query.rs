//! Read-only views over the notebook tree: traversal, lookup and note counts.

use super::math::TreeIndex;
use crate::category::{Category, CategoryWithCounts};
use std::collections::{HashMap, HashSet};

/// Statuses whose notes no longer count toward a notebook.
pub const TERMINAL_STATUSES: &[&str] = &["completed", "archived"];

/// The minimal view of a note the count aggregation needs.
pub trait CountableNote {
    /// Name of the notebook the note lives in.
    fn notebook(&self) -> &str;
    fn is_trashed(&self) -> bool;
    fn status(&self) -> &str;

    /// Whether this note contributes to the direct count of `name`.
    fn counts_toward(&self, name: &str) -> bool {
        self.notebook() == name
            && !self.is_trashed()
            && !TERMINAL_STATUSES.contains(&self.status())
    }
}

/// Parent id (or `None` for roots and dangling links) to children, in input
/// order.
fn adjacency(nodes: &[Category]) -> HashMap<Option<&str>, Vec<&Category>> {
    let index = TreeIndex::new(nodes);
    let mut map: HashMap<Option<&str>, Vec<&Category>> = HashMap::new();
    for node in nodes {
        let parent = index.parent_of(node).map(|p| p.id.as_str());
        map.entry(parent).or_default().push(node);
    }
    map
}

/// Nodes below `start` in pre-order (each parent immediately followed by its
/// subtree). `None` starts from the roots. With `include_descendants` false
/// only the immediate children are returned.
pub fn flatten(
    nodes: &[Category],
    start: Option<&str>,
    include_descendants: bool,
) -> Vec<Category> {
    let adj = adjacency(nodes);
    let mut out = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    fn walk<'a>(
        adj: &HashMap<Option<&'a str>, Vec<&'a Category>>,
        parent: Option<&'a str>,
        deep: bool,
        seen: &mut HashSet<&'a str>,
        out: &mut Vec<Category>,
    ) {
        let Some(children) = adj.get(&parent) else { return };
        for child in children {
            if !seen.insert(child.id.as_str()) {
                continue;
            }
            out.push((*child).clone());
            if deep {
                walk(adj, Some(child.id.as_str()), deep, seen, out);
            }
        }
    }

    walk(&adj, start, include_descendants, &mut seen, &mut out);
    out
}

/// Direct and recursive note counts for every category, in input order.
pub fn with_counts<N: CountableNote>(
    nodes: &[Category],
    notes: &[N],
) -> Vec<CategoryWithCounts> {
    let adj = adjacency(nodes);

    let mut direct_by_name: HashMap<&str, usize> = HashMap::new();
    for node in nodes {
        direct_by_name.entry(node.name.as_str()).or_insert_with(|| {
            notes.iter().filter(|n| n.counts_toward(&node.name)).count()
        });
    }

    fn total<'a>(
        node: &'a Category,
        adj: &HashMap<Option<&'a str>, Vec<&'a Category>>,
        direct: &HashMap<&str, usize>,
        memo: &mut HashMap<&'a str, usize>,
        visiting: &mut HashSet<&'a str>,
    ) -> usize {
        if let Some(&t) = memo.get(node.id.as_str()) {
            return t;
        }
        if !visiting.insert(node.id.as_str()) {
            return 0;
        }
        let mut sum = direct.get(node.name.as_str()).copied().unwrap_or(0);
        if let Some(children) = adj.get(&Some(node.id.as_str())) {
            for child in children {
                sum += total(child, adj, direct, memo, visiting);
            }
        }
        visiting.remove(node.id.as_str());
        memo.insert(node.id.as_str(), sum);
        sum
    }

    let mut memo = HashMap::new();
    let mut visiting = HashSet::new();
    nodes
        .iter()
        .map(|node| {
            let total_count =
                total(node, &adj, &direct_by_name, &mut memo, &mut visiting);
            CategoryWithCounts {
                category: node.clone(),
                direct_count: direct_by_name[node.name.as_str()],
                total_count,
            }
        })
        .collect()
}

/// Root records (including records whose parent is missing).
pub fn roots(nodes: &[Category]) -> Vec<&Category> {
    let index = TreeIndex::new(nodes);
    nodes.iter().filter(|n| index.parent_of(n).is_none()).collect()
}

/// Resolve user input to a category: exact id, then exact path, then a name
/// that matches exactly one category.
pub fn find<'a>(nodes: &'a [Category], key: &str) -> Option<&'a Category> {
    let key = key.trim().trim_matches('/');
    if let Some(found) = nodes.iter().find(|n| n.id == key) {
        return Some(found);
    }
    let index = TreeIndex::new(nodes);
    if let Some(found) = nodes
        .iter()
        .find(|n| index.path_of(&n.id).as_deref() == Some(key))
    {
        return Some(found);
    }
    let mut by_name = nodes.iter().filter(|n| n.name == key);
    match (by_name.next(), by_name.next()) {
        (Some(only), None) => Some(only),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct N(&'static str, bool, &'static str);

    impl CountableNote for N {
        fn notebook(&self) -> &str {
            self.0
        }
        fn is_trashed(&self) -> bool {
            self.1
        }
        fn status(&self) -> &str {
            self.2
        }
    }

    fn tree() -> Vec<Category> {
        vec![
            Category::new("a", "A", None),
            Category::new("b", "B", Some("a")),
            Category::new("c", "C", Some("b")),
            Category::new("d", "D", Some("a")),
            Category::new("e", "E", None),
        ]
    }

    fn ids(nodes: &[Category]) -> Vec<&str> {
        nodes.iter().map(|n| n.id.as_str()).collect()
    }

    #[test]
    fn test_flatten_pre_order_from_roots() {
        let flat = flatten(&tree(), None, true);
        assert_eq!(ids(&flat), vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn test_flatten_from_subtree() {
        let flat = flatten(&tree(), Some("a"), true);
        assert_eq!(ids(&flat), vec!["b", "c", "d"]);
    }

    #[test]
    fn test_flatten_immediate_children_only() {
        let flat = flatten(&tree(), Some("a"), false);
        assert_eq!(ids(&flat), vec!["b", "d"]);
        let roots = flatten(&tree(), None, false);
        assert_eq!(ids(&roots), vec!["a", "e"]);
    }

    #[test]
    fn test_flatten_unknown_start_is_empty() {
        assert!(flatten(&tree(), Some("zzz"), true).is_empty());
    }

    #[test]
    fn test_counts_exclude_trashed_and_terminal() {
        let notes = vec![
            N("B", false, "active"),
            N("B", true, "active"),
            N("B", false, "completed"),
            N("B", false, "on-hold"),
            N("C", false, "dropped"),
            N("A", false, "archived"),
        ];
        let counts = with_counts(&tree(), &notes);
        let get = |id: &str| counts.iter().find(|c| c.category.id == id).unwrap();
        assert_eq!(get("b").direct_count, 2);
        assert_eq!(get("c").direct_count, 1);
        assert_eq!(get("b").total_count, 3);
        assert_eq!(get("a").direct_count, 0);
        assert_eq!(get("a").total_count, 3);
        assert_eq!(get("e").total_count, 0);
    }

    #[test]
    fn test_roots_include_dangling() {
        let mut nodes = tree();
        nodes.push(Category::new("x", "X", Some("missing")));
        let r: Vec<&str> = roots(&nodes).iter().map(|n| n.id.as_str()).collect();
        assert_eq!(r, vec!["a", "e", "x"]);
    }

    #[test]
    fn test_find_by_id_path_and_name() {
        let nodes = tree();
        assert_eq!(find(&nodes, "c").map(|n| n.id.as_str()), Some("c"));
        assert_eq!(find(&nodes, "A/B/C").map(|n| n.id.as_str()), Some("c"));
        assert_eq!(find(&nodes, "/A/B/").map(|n| n.id.as_str()), Some("b"));
        assert_eq!(find(&nodes, "D").map(|n| n.id.as_str()), Some("d"));
        assert!(find(&nodes, "nope").is_none());
    }

    #[test]
    fn test_find_ambiguous_name() {
        let mut nodes = tree();
        nodes.push(Category::new("d2", "D", Some("e")));
        assert!(find(&nodes, "D").is_none());
        assert_eq!(find(&nodes, "E/D").map(|n| n.id.as_str()), Some("d2"));
    }
}
