/// Record fields materialized at the moment a `page` element closes.
///
/// This is the view the filter evaluates: exactly the container children the
/// streaming walk has produced, copied out of the partial tree before its
/// nodes are reclaimed.
#[derive(Debug, Clone, Default)]
pub struct RecordState {
    pub title: Option<String>,
    pub namespace_ids: Vec<String>,
    pub revision_texts: Vec<String>,
}

/// How a walk over a dump ended. Both variants are normal outcomes from the
/// caller's point of view; `Aborted` still carries everything collected up to
/// the failure point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Termination {
    /// The byte stream was consumed to the end of a well-formed document.
    Exhausted,
    /// Malformed or truncated markup (or an I/O failure) stopped the walk.
    Aborted { position: u64, reason: String },
}

impl Termination {
    pub fn is_aborted(&self) -> bool {
        matches!(self, Termination::Aborted { .. })
    }
}
