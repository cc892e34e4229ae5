//! Submission sequence numbers.
//!
//! Every submission gets a 4-digit zero-padded sequence number, unique
//! within its application and contiguous from `"0000"`. Zero-padding makes
//! lexicographic order match numeric order, so "the latest" is a simple
//! `ORDER BY sequence_number DESC LIMIT 1`.
//!
//! The pure read here ([`next_sequence_number`]) is advisory; the write
//! path in [`crate::submission::create_submission`] serializes allocation
//! per application with a transaction-scoped advisory lock and relies on
//! the `(application_id, sequence_number)` unique constraint as backstop.

use anyhow::Result;
use sqlx::PgPool;

use dossier_db::queries::submissions;

/// The sequence number assigned to an application's first submission.
pub const SEQUENCE_START: &str = "0000";

/// Format a sequence number as 4 digits with leading zeros.
pub fn format_sequence(n: u32) -> String {
    format!("{n:04}")
}

/// The sequence number following `current`.
///
/// A non-numeric value (legacy data) falls back to [`SEQUENCE_START`]
/// rather than failing the caller, as does a value too large to increment.
/// This is lossy: the next insert will then collide with any existing
/// numeric sequence and surface as a conflict.
pub fn next_after(current: &str) -> String {
    match current.parse::<u32>().ok().and_then(|n| n.checked_add(1)) {
        Some(next) => format_sequence(next),
        None => SEQUENCE_START.to_owned(),
    }
}

/// Compute the next sequence number for an application.
///
/// Returns [`SEQUENCE_START`] when the application has no submissions yet;
/// absence is the common first-time case, not an error.
///
/// This is a plain read with no lock. Callers that are about to insert must
/// go through [`crate::submission::create_submission`], which recomputes
/// the value under an application-scoped advisory lock.
pub async fn next_sequence_number(pool: &PgPool, application_id: i32) -> Result<String> {
    let latest = submissions::latest_sequence_number(pool, application_id).await?;

    Ok(match latest {
        None => SEQUENCE_START.to_owned(),
        Some(current) => next_after(&current),
    })
}
