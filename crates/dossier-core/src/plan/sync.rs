//! One-way schedule propagation from plan documents down to the submission
//! ToC entries linked to them.
//!
//! There is no reverse path: a schedule edit on the submission side is
//! never pulled back up into a plan. That asymmetry is a design property of
//! the tracker, not a gap.

use sqlx::PgPool;
use tracing::info;

use dossier_db::queries::plans;

use crate::error::Error;

/// How plan-side schedule values are applied to linked ToC rows.
///
/// Currently only [`SyncPolicy::Overwrite`] exists; naming the policy keeps
/// room for a merge-if-unset variant without changing the contract.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SyncPolicy {
    /// Unconditionally copy the document's `start_date`, `end_date`, and
    /// `estimated_days` onto every linked ToC row. Last writer wins; two
    /// plans mapping the same ToC row are not conflict-detected.
    #[default]
    Overwrite,
}

/// Push a plan document's schedule fields to every submission ToC entry
/// linked to it.
///
/// Returns the number of ToC rows written. A plan document that does not
/// exist, or one with no mappings, is a no-op returning `0`. Safe to call
/// repeatedly. The write is a single statement, so linked rows are updated
/// all together or not at all.
pub async fn sync_schedule_to_submissions(
    pool: &PgPool,
    plan_document_id: i32,
    policy: SyncPolicy,
) -> Result<u64, Error> {
    let Some(doc) = plans::get_plan_document(pool, plan_document_id).await? else {
        return Ok(0);
    };

    let updated = match policy {
        SyncPolicy::Overwrite => {
            let result = sqlx::query(
                "UPDATE submission_toc AS toc \
                 SET start_date = $1, end_date = $2, estimated_days = $3 \
                 FROM plan_document_submission_toc_map AS m \
                 WHERE m.submission_toc_id = toc.id AND m.plan_document_id = $4",
            )
            .bind(doc.start_date)
            .bind(doc.end_date)
            .bind(doc.estimated_days)
            .bind(plan_document_id)
            .execute(pool)
            .await?;
            result.rows_affected()
        }
    };

    info!(
        plan_document_id,
        rows = updated,
        "schedule synced to submission ToC entries"
    );

    Ok(updated)
}
