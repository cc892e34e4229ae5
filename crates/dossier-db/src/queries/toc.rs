//! Database query functions for the `submission_toc` table.

use anyhow::{Context, Result};
use sqlx::PgPool;

use crate::models::SubmissionToc;

/// Fetch a submission's full table of contents, ordered by parent, then
/// section, then leaf title.
pub async fn get_submission_toc(pool: &PgPool, submission_id: i32) -> Result<Vec<SubmissionToc>> {
    let rows = sqlx::query_as::<_, SubmissionToc>(
        "SELECT * FROM submission_toc \
         WHERE submission_id = $1 \
         ORDER BY parent, section, leaf_title",
    )
    .bind(submission_id)
    .fetch_all(pool)
    .await
    .context("failed to fetch submission ToC")?;

    Ok(rows)
}

/// Whether any ToC rows exist for a submission. Used as the idempotency
/// guard before template materialization.
pub async fn toc_exists(pool: &PgPool, submission_id: i32) -> Result<bool> {
    let exists: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM submission_toc WHERE submission_id = $1)")
            .bind(submission_id)
            .fetch_one(pool)
            .await
            .context("failed to check for existing ToC rows")?;

    Ok(exists)
}

/// Fetch a single ToC entry by its ID.
pub async fn get_toc_entry(pool: &PgPool, id: i32) -> Result<Option<SubmissionToc>> {
    let row = sqlx::query_as::<_, SubmissionToc>("SELECT * FROM submission_toc WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("failed to fetch ToC entry")?;

    Ok(row)
}
