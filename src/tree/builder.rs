use super::math::TreeIndex;
use crate::category::Category;
use std::collections::HashMap;

/// Rebuild derived fields (`path`, `level`, `children`) for every record.
///
/// The input is never modified. Paths and levels are computed against the
/// original slice, so the order of the records does not matter, and children
/// are re-derived from parent links in input order. Records whose parent is
/// missing are kept as effective roots. Output order follows input order.
pub fn build(nodes: &[Category]) -> Vec<Category> {
    let index = TreeIndex::new(nodes);
    let mut rebuilt: Vec<Category> = nodes.to_vec();
    let mut position: HashMap<String, usize> = HashMap::new();

    for (i, node) in rebuilt.iter_mut().enumerate() {
        node.path = index.path_of(&node.id).unwrap_or_else(|| node.name.clone());
        node.level = index.level_of(&node.id).unwrap_or(0);
        node.children.clear();
        position.entry(node.id.clone()).or_insert(i);
    }

    let mut dangling = 0;
    for node in nodes {
        let Some(parent_id) = node.parent_id.as_deref() else {
            continue;
        };
        match position.get(parent_id) {
            Some(&p) => {
                let children = &mut rebuilt[p].children;
                if !children.contains(&node.id) {
                    children.push(node.id.clone());
                }
            }
            None => dangling += 1,
        }
    }

    if dangling > 0 {
        tracing::warn!(dangling, "notebooks reference a missing parent; treating them as roots");
    }
    tracing::debug!(nodes = rebuilt.len(), "rebuilt notebook tree");
    rebuilt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_derives_children_in_input_order() {
        let nodes = vec![
            Category::new("a", "A", None),
            Category::new("c", "C", Some("a")),
            Category::new("b", "B", Some("a")),
        ];
        let built = build(&nodes);
        assert_eq!(built[0].children, vec!["c", "b"]);
        assert_eq!(built[1].path, "A/C");
        assert_eq!(built[2].level, 1);
    }

    #[test]
    fn test_build_drops_stale_children() {
        let mut root = Category::new("a", "A", None);
        root.children = vec!["ghost".to_string(), "b".to_string(), "b".to_string()];
        let nodes = vec![root, Category::new("b", "B", Some("a"))];
        let built = build(&nodes);
        assert_eq!(built[0].children, vec!["b"]);
    }

    #[test]
    fn test_build_does_not_touch_input() {
        let nodes = vec![
            Category::new("a", "A", None),
            Category::new("b", "B", Some("a")),
        ];
        let before = nodes.clone();
        let _ = build(&nodes);
        assert_eq!(nodes, before);
    }

    #[test]
    fn test_build_keeps_dangling_as_root() {
        let nodes = vec![Category::new("x", "X", Some("missing"))];
        let built = build(&nodes);
        assert_eq!(built[0].path, "X");
        assert_eq!(built[0].level, 0);
        assert_eq!(built[0].parent_id.as_deref(), Some("missing"));
    }

    #[test]
    fn test_build_empty() {
        assert!(build(&[]).is_empty());
    }
}
