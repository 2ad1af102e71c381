/// Failures surfaced by the notebook tree operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TreeError {
    #[error("cannot move notebook {id} under {target}: target is the notebook itself or one of its descendants")]
    InvalidMove { id: String, target: String },

    #[error("cannot delete notebook {id}: it is the last root notebook")]
    DegenerateTree { id: String },

    #[error("notebook {id} not found")]
    NotFound { id: String },

    #[error("notebook name must be non-empty, without '/' or control characters")]
    InvalidName,
}
