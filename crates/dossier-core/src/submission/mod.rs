//! Submission creation and updates.
//!
//! Creation assigns the sequence number, so it is the one place where two
//! concurrent requests can race: both read the same "latest" value and try
//! to insert the same next number. Allocation is therefore serialized per
//! application with `pg_advisory_xact_lock`, and the unique constraint on
//! `(application_id, sequence_number)` turns any remaining collision into a
//! retryable [`Error::SequenceConflict`] instead of a silent duplicate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::info;

use dossier_db::models::{Submission, SubmissionStatus};
use dossier_db::queries::submissions;

use crate::error::Error;
use crate::sequence;

/// Vocabulary category a submission's activity term must belong to.
pub const SUBMISSION_ACTIVITY_CATEGORY: &str = "submission_activity";

/// Advisory-lock class for sequence allocation. The lock key is
/// `(SEQUENCE_LOCK_CLASS, application_id)`, so allocation serializes per
/// application without blocking unrelated applications.
const SEQUENCE_LOCK_CLASS: i32 = 0x5EC0;

/// Input for creating a submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSubmission {
    pub application_id: i32,
    pub submission_activity_id: i32,
    /// Explicit sequence number. Usually `None`; the engine allocates the
    /// next one. When supplied, it must not already be taken.
    pub sequence_number: Option<String>,
    pub description: Option<String>,
    pub submission_number: Option<String>,
    pub submission_date: Option<DateTime<Utc>>,
    pub status: SubmissionStatus,
}

/// Create a submission, allocating its sequence number.
///
/// Validates that the application exists and that the activity id is a
/// `submission_activity` vocabulary term, then inserts inside a transaction
/// that holds an application-scoped advisory lock for the duration of the
/// read-increment-insert.
pub async fn create_submission(pool: &PgPool, new: NewSubmission) -> Result<Submission, Error> {
    let application_exists: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM applications WHERE id = $1)")
            .bind(new.application_id)
            .fetch_one(pool)
            .await?;
    if !application_exists {
        return Err(Error::not_found("application", new.application_id));
    }

    let activity_valid: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM controlled_vocabularies WHERE id = $1 AND category = $2)",
    )
    .bind(new.submission_activity_id)
    .bind(SUBMISSION_ACTIVITY_CATEGORY)
    .fetch_one(pool)
    .await?;
    if !activity_valid {
        return Err(Error::Validation(format!(
            "submission activity {} does not exist or is not in category {:?}",
            new.submission_activity_id, SUBMISSION_ACTIVITY_CATEGORY
        )));
    }

    let mut tx = pool.begin().await?;

    // Serialize allocation for this application. The lock is released
    // automatically at commit or rollback.
    sqlx::query("SELECT pg_advisory_xact_lock($1, $2)")
        .bind(SEQUENCE_LOCK_CLASS)
        .bind(new.application_id)
        .execute(&mut *tx)
        .await?;

    let sequence_number = match &new.sequence_number {
        Some(supplied) => {
            let taken: bool = sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM submissions \
                 WHERE application_id = $1 AND sequence_number = $2)",
            )
            .bind(new.application_id)
            .bind(supplied)
            .fetch_one(&mut *tx)
            .await?;
            if taken {
                return Err(Error::SequenceConflict {
                    application_id: new.application_id,
                });
            }
            supplied.clone()
        }
        None => {
            let latest: Option<(String,)> = sqlx::query_as(
                "SELECT sequence_number FROM submissions \
                 WHERE application_id = $1 \
                 ORDER BY sequence_number DESC \
                 LIMIT 1",
            )
            .bind(new.application_id)
            .fetch_optional(&mut *tx)
            .await?;
            match latest {
                None => sequence::SEQUENCE_START.to_owned(),
                Some((current,)) => sequence::next_after(&current),
            }
        }
    };

    let submission = sqlx::query_as::<_, Submission>(
        "INSERT INTO submissions \
         (application_id, sequence_number, submission_activity_id, description, \
          submission_number, submission_date, status, status_date) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, now()) \
         RETURNING *",
    )
    .bind(new.application_id)
    .bind(&sequence_number)
    .bind(new.submission_activity_id)
    .bind(&new.description)
    .bind(&new.submission_number)
    .bind(new.submission_date)
    .bind(new.status)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| {
        if Error::is_unique_violation(&e) {
            Error::SequenceConflict {
                application_id: new.application_id,
            }
        } else {
            Error::Db(e)
        }
    })?;

    tx.commit().await?;

    info!(
        submission_id = submission.id,
        application_id = submission.application_id,
        sequence = %submission.sequence_number,
        "submission created"
    );

    Ok(submission)
}

/// Input for updating an existing submission.
///
/// The application id and sequence number are fixed at creation and cannot
/// be changed here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateSubmission {
    pub id: i32,
    pub description: Option<String>,
    pub submission_number: Option<String>,
    pub submission_date: Option<DateTime<Utc>>,
    pub status: SubmissionStatus,
    pub status_date: Option<DateTime<Utc>>,
    pub is_active: bool,
    /// Replacement activity term. `None` keeps the current one; a new id
    /// must be a `submission_activity` vocabulary term.
    pub submission_activity_id: Option<i32>,
}

/// Update a submission's mutable fields.
pub async fn update_submission(pool: &PgPool, update: UpdateSubmission) -> Result<Submission, Error> {
    let existing = submissions::get_submission(pool, update.id)
        .await?
        .ok_or_else(|| Error::not_found("submission", update.id))?;

    let activity_id = match update.submission_activity_id {
        Some(id) if id != existing.submission_activity_id => {
            let activity_valid: bool = sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM controlled_vocabularies WHERE id = $1 AND category = $2)",
            )
            .bind(id)
            .bind(SUBMISSION_ACTIVITY_CATEGORY)
            .fetch_one(pool)
            .await?;
            if !activity_valid {
                return Err(Error::Validation(format!(
                    "submission activity {id} does not exist or is not in category {SUBMISSION_ACTIVITY_CATEGORY:?}"
                )));
            }
            id
        }
        _ => existing.submission_activity_id,
    };

    let submission = sqlx::query_as::<_, Submission>(
        "UPDATE submissions SET \
         description = $2, submission_number = $3, submission_date = $4, \
         status = $5, status_date = $6, is_active = $7, \
         submission_activity_id = $8, updated_at = now() \
         WHERE id = $1 \
         RETURNING *",
    )
    .bind(update.id)
    .bind(&update.description)
    .bind(&update.submission_number)
    .bind(update.submission_date)
    .bind(update.status)
    .bind(update.status_date)
    .bind(update.is_active)
    .bind(activity_id)
    .fetch_one(pool)
    .await?;

    info!(submission_id = submission.id, "submission updated");

    Ok(submission)
}
