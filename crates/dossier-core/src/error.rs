//! Error taxonomy for the reconciliation engine.
//!
//! Absence of optional state (no prior submissions, no matching template,
//! already-materialized ToC) is not an error; those paths return sentinel
//! values (`"0000"`, `false`). Errors here mean the operation was aborted
//! and nothing was persisted.

use thiserror::Error;

/// Engine-level errors surfaced to request-handling collaborators.
#[derive(Debug, Error)]
pub enum Error {
    /// A referenced row does not exist. The whole operation is rolled back.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i32 },

    /// Two allocations raced for the same sequence number, or the caller
    /// supplied one that is already taken. Retryable.
    #[error("sequence number conflict for application {application_id}; retry the operation")]
    SequenceConflict { application_id: i32 },

    /// Malformed input, rejected before any write.
    #[error("validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    Db(#[from] sqlx::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    pub(crate) fn not_found(entity: &'static str, id: i32) -> Self {
        Self::NotFound { entity, id }
    }

    /// Whether a database error is a unique-constraint violation, the
    /// backstop for sequence allocation races.
    pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
        match err {
            sqlx::Error::Database(db_err) => db_err.code().as_deref() == Some("23505"),
            _ => false,
        }
    }
}
