//! Path and depth derivation from parent links.

use crate::category::Category;
use std::collections::HashMap;

/// Id-indexed view over a flat slice of categories.
pub struct TreeIndex<'a> {
    by_id: HashMap<&'a str, &'a Category>,
}

impl<'a> TreeIndex<'a> {
    pub fn new(nodes: &'a [Category]) -> Self {
        let by_id = nodes.iter().map(|n| (n.id.as_str(), n)).collect();
        Self { by_id }
    }

    pub fn get(&self, id: &str) -> Option<&'a Category> {
        self.by_id.get(id).copied()
    }

    fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Parent record, or `None` for roots and dangling parent links.
    pub fn parent_of(&self, node: &Category) -> Option<&'a Category> {
        node.parent_id.as_deref().and_then(|p| self.get(p))
    }

    /// The node followed by its ancestors, nearest first. The walk is bounded
    /// by the number of records so cyclic input still terminates.
    fn ancestry(&self, id: &str) -> Option<Vec<&'a Category>> {
        let mut current = self.get(id)?;
        let mut chain = vec![current];
        while let Some(parent) = self.parent_of(current) {
            if chain.len() > self.len() {
                tracing::warn!(id, "parent chain exceeds tree size; input has a cycle");
                break;
            }
            chain.push(parent);
            current = parent;
        }
        Some(chain)
    }

    pub fn path_of(&self, id: &str) -> Option<String> {
        let chain = self.ancestry(id)?;
        let names: Vec<&str> =
            chain.iter().rev().map(|n| n.name.as_str()).collect();
        Some(names.join("/"))
    }

    pub fn level_of(&self, id: &str) -> Option<usize> {
        self.ancestry(id).map(|chain| chain.len() - 1)
    }
}

/// Slash-joined names from the root down to `id`.
pub fn path_of(id: &str, nodes: &[Category]) -> Option<String> {
    TreeIndex::new(nodes).path_of(id)
}

/// Depth of `id`, 0 for roots.
pub fn level_of(id: &str, nodes: &[Category]) -> Option<usize> {
    TreeIndex::new(nodes).level_of(id)
}
