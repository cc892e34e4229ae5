//! Database query functions for the `submissions` table.

use anyhow::{Context, Result};
use sqlx::PgPool;

use crate::models::Submission;

/// Fetch a submission by its ID.
pub async fn get_submission(pool: &PgPool, id: i32) -> Result<Option<Submission>> {
    let submission = sqlx::query_as::<_, Submission>("SELECT * FROM submissions WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("failed to fetch submission")?;

    Ok(submission)
}

/// List all submissions for an application, ordered by sequence number.
pub async fn list_for_application(pool: &PgPool, application_id: i32) -> Result<Vec<Submission>> {
    let submissions = sqlx::query_as::<_, Submission>(
        "SELECT * FROM submissions \
         WHERE application_id = $1 \
         ORDER BY sequence_number",
    )
    .bind(application_id)
    .fetch_all(pool)
    .await
    .context("failed to list submissions for application")?;

    Ok(submissions)
}

/// Fetch a submission by its application and sequence number.
pub async fn get_by_application_and_sequence(
    pool: &PgPool,
    application_id: i32,
    sequence_number: &str,
) -> Result<Option<Submission>> {
    let submission = sqlx::query_as::<_, Submission>(
        "SELECT * FROM submissions \
         WHERE application_id = $1 AND sequence_number = $2",
    )
    .bind(application_id)
    .bind(sequence_number)
    .fetch_optional(pool)
    .await
    .context("failed to fetch submission by sequence")?;

    Ok(submission)
}

/// The highest sequence number currently assigned within an application.
///
/// Sequence numbers are zero-padded to a fixed width, so lexicographic
/// ordering matches numeric ordering. Returns `None` when the application
/// has no submissions yet.
pub async fn latest_sequence_number(
    pool: &PgPool,
    application_id: i32,
) -> Result<Option<String>> {
    let latest: Option<(String,)> = sqlx::query_as(
        "SELECT sequence_number FROM submissions \
         WHERE application_id = $1 \
         ORDER BY sequence_number DESC \
         LIMIT 1",
    )
    .bind(application_id)
    .fetch_optional(pool)
    .await
    .context("failed to fetch latest sequence number")?;

    Ok(latest.map(|(seq,)| seq))
}

/// Soft-delete a submission by marking it inactive.
///
/// Returns `false` when the submission does not exist.
pub async fn deactivate_submission(pool: &PgPool, id: i32) -> Result<bool> {
    let result = sqlx::query(
        "UPDATE submissions SET is_active = FALSE, updated_at = now() WHERE id = $1",
    )
    .bind(id)
    .execute(pool)
    .await
    .context("failed to deactivate submission")?;

    Ok(result.rows_affected() > 0)
}
