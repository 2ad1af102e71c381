use super::builder::build;
use super::math::TreeIndex;
use crate::category::Category;
use crate::error::TreeError;
use chrono::Utc;
use std::collections::{HashMap, HashSet};

/// `id` plus every transitive descendant, found through parent links.
///
/// This only reports what has to go; removing records, reassigning notes and
/// the last-root policy are up to the caller.
pub fn deletion_set(id: &str, nodes: &[Category]) -> HashSet<String> {
    let mut children: HashMap<&str, Vec<&str>> = HashMap::new();
    for node in nodes {
        if let Some(parent) = node.parent_id.as_deref() {
            children.entry(parent).or_default().push(node.id.as_str());
        }
    }

    let mut out: HashSet<String> = HashSet::new();
    let mut stack = vec![id];
    while let Some(current) = stack.pop() {
        if !out.insert(current.to_string()) {
            continue;
        }
        if let Some(kids) = children.get(current) {
            stack.extend(kids.iter().copied());
        }
    }
    out
}

/// Reparent `id` under `new_parent` (`None` makes it a root) and rebuild the
/// tree so the whole moved subtree gets fresh paths and levels.
///
/// Moving a notebook under itself or one of its descendants fails with
/// [`TreeError::InvalidMove`]; the input is left untouched in every case.
pub fn move_category(
    id: &str,
    new_parent: Option<&str>,
    nodes: &[Category],
) -> Result<Vec<Category>, TreeError> {
    let index = TreeIndex::new(nodes);
    if index.get(id).is_none() {
        return Err(TreeError::NotFound { id: id.to_string() });
    }
    if let Some(target) = new_parent {
        if index.get(target).is_none() {
            return Err(TreeError::NotFound { id: target.to_string() });
        }
        if deletion_set(id, nodes).contains(target) {
            return Err(TreeError::InvalidMove {
                id: id.to_string(),
                target: target.to_string(),
            });
        }
    }

    let mut moved: Vec<Category> = nodes.to_vec();
    for node in moved.iter_mut() {
        if node.id == id {
            node.parent_id = new_parent.map(str::to_string);
            node.updated_at = Utc::now();
        } else {
            node.children.retain(|c| c != id);
        }
    }
    if let Some(target) = new_parent {
        if let Some(parent) = moved.iter_mut().find(|n| n.id == target) {
            parent.children.push(id.to_string());
        }
    }

    tracing::debug!(id, parent = ?new_parent, "moved notebook");
    Ok(build(&moved))
}

/// Whether `id` is a root notebook.
pub fn is_root(id: &str, nodes: &[Category]) -> bool {
    let index = TreeIndex::new(nodes);
    index.get(id).is_some_and(|n| index.parent_of(n).is_none())
}

pub fn root_count(nodes: &[Category]) -> usize {
    super::query::roots(nodes).len()
}

/// Refuse to delete the last remaining root: every note needs a home.
pub fn ensure_deletable(id: &str, nodes: &[Category]) -> Result<(), TreeError> {
    let index = TreeIndex::new(nodes);
    if index.get(id).is_none() {
        return Err(TreeError::NotFound { id: id.to_string() });
    }
    if is_root(id, nodes) && root_count(nodes) <= 1 {
        return Err(TreeError::DegenerateTree { id: id.to_string() });
    }
    Ok(())
}
