use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A notebook record. `id`, `name` and `parent_id` are the source of truth;
/// `children`, `level` and `path` are derived and only written by
/// [`crate::tree::build`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub children: Vec<String>,
    #[serde(default)]
    pub level: usize,
    #[serde(default)]
    pub path: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Category {
    /// Fresh record with empty derived fields.
    pub fn new(id: &str, name: &str, parent_id: Option<&str>) -> Self {
        let now = Utc::now();
        Self {
            id: id.to_string(),
            name: name.to_string(),
            parent_id: parent_id.map(str::to_string),
            children: Vec::new(),
            level: 0,
            path: String::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// A category together with its note counts. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryWithCounts {
    pub category: Category,
    pub direct_count: usize,
    pub total_count: usize,
}
