//! Template materialization: seed a brand-new submission's ToC from the
//! default template matching its activity type.
//!
//! Materialization happens at most once per submission. Every "nothing to
//! do" outcome (submission absent, ToC already populated, no matching
//! template, template has no content) is the benign `Ok(false)` path, not
//! an error.

use sqlx::PgPool;
use tracing::info;

use dossier_db::models::Submission;
use dossier_db::queries::templates;

use crate::error::Error;

/// Copy the matching default template's content rows into a submission's
/// ToC.
///
/// Returns `true` when rows were created, `false` when materialization was
/// skipped. All inserts run in a single transaction.
///
/// Template selection matches on the submission's activity type only.
/// Templates also record a country, and the data model intends selection to
/// match the application's country as well, but that filter is not applied
/// here; see DESIGN.md before changing this.
pub async fn populate_from_template(pool: &PgPool, submission_id: i32) -> Result<bool, Error> {
    let mut tx = pool.begin().await?;

    let submission = sqlx::query_as::<_, Submission>("SELECT * FROM submissions WHERE id = $1")
        .bind(submission_id)
        .fetch_optional(&mut *tx)
        .await?;
    let Some(submission) = submission else {
        return Ok(false);
    };

    // Idempotency guard: a ToC is materialized at most once.
    let already_populated: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM submission_toc WHERE submission_id = $1)")
            .bind(submission_id)
            .fetch_one(&mut *tx)
            .await?;
    if already_populated {
        return Ok(false);
    }

    let template =
        templates::find_active_template_for_activity(&mut *tx, submission.submission_activity_id)
            .await?;
    let Some(template) = template else {
        return Ok(false);
    };

    let contents = templates::get_template_content(&mut *tx, template.id).await?;
    if contents.is_empty() {
        return Ok(false);
    }

    // Copy structural fields verbatim; schedule fields stay unset until a
    // plan pushes values down.
    for content in &contents {
        sqlx::query(
            "INSERT INTO submission_toc \
             (submission_id, parent, section, leaf_title, file_name, href) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(submission_id)
        .bind(&content.parent)
        .bind(&content.section)
        .bind(&content.leaf_title)
        .bind(&content.file_name)
        .bind(&content.href)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    info!(
        submission_id,
        template_id = template.id,
        rows = contents.len(),
        "submission ToC materialized from template"
    );

    Ok(true)
}
