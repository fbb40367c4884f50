use thiserror::Error;

/// Errors returned by [`PlanStore`](crate::PlanStore) operations.
///
/// `Validation` and `NotFound` are expected, caller-recoverable outcomes;
/// the store stays usable after either.
#[derive(Debug, Error)]
pub enum PlanStoreError {
    /// One or more required fields are empty or whitespace-only.
    /// Holds the wire names of the failing fields in declaration order.
    #[error("required fields must not be blank: {}", .fields.join(", "))]
    Validation { fields: Vec<&'static str> },

    #[error("plant plan {id} not found")]
    NotFound { id: String },

    /// The backing database failed.
    #[error("storage error: {0:#}")]
    Storage(#[from] anyhow::Error),
}

impl PlanStoreError {
    pub fn not_found(id: impl ToString) -> Self {
        Self::NotFound { id: id.to_string() }
    }
}
