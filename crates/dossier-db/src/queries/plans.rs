//! Database query functions for the `plans` table family.

use anyhow::{Context, Result};
use sqlx::{PgPool, Postgres};

use crate::models::{Plan, PlanDocument, PlanDocumentSubmissionTocMap, PlanSubmissionMap};

/// Fetch a plan by its ID. Generic over the executor so existence checks
/// can run inside an assembly transaction.
pub async fn get_plan<'e, E>(executor: E, id: i32) -> Result<Option<Plan>>
where
    E: sqlx::Executor<'e, Database = Postgres>,
{
    let plan = sqlx::query_as::<_, Plan>("SELECT * FROM plans WHERE id = $1")
        .bind(id)
        .fetch_optional(executor)
        .await
        .context("failed to fetch plan")?;

    Ok(plan)
}

/// List all plans, ordered by creation time (newest first).
pub async fn list_plans(pool: &PgPool) -> Result<Vec<Plan>> {
    let plans = sqlx::query_as::<_, Plan>("SELECT * FROM plans ORDER BY created_date DESC")
        .fetch_all(pool)
        .await
        .context("failed to list plans")?;

    Ok(plans)
}

/// Fetch a plan document by its ID.
pub async fn get_plan_document(pool: &PgPool, id: i32) -> Result<Option<PlanDocument>> {
    let doc = sqlx::query_as::<_, PlanDocument>("SELECT * FROM plan_documents WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("failed to fetch plan document")?;

    Ok(doc)
}

/// List a plan's document tree, ordered by parent, then section, then leaf
/// title.
pub async fn list_plan_documents(pool: &PgPool, plan_id: i32) -> Result<Vec<PlanDocument>> {
    let docs = sqlx::query_as::<_, PlanDocument>(
        "SELECT * FROM plan_documents \
         WHERE plan_id = $1 \
         ORDER BY parent, section, leaf_title",
    )
    .bind(plan_id)
    .fetch_all(pool)
    .await
    .context("failed to list plan documents")?;

    Ok(docs)
}

/// List all ToC mappings for a plan document.
pub async fn list_mappings_for_document(
    pool: &PgPool,
    plan_document_id: i32,
) -> Result<Vec<PlanDocumentSubmissionTocMap>> {
    let maps = sqlx::query_as::<_, PlanDocumentSubmissionTocMap>(
        "SELECT * FROM plan_document_submission_toc_map \
         WHERE plan_document_id = $1 \
         ORDER BY id",
    )
    .bind(plan_document_id)
    .fetch_all(pool)
    .await
    .context("failed to list document mappings")?;

    Ok(maps)
}

/// List the submissions a plan aggregates (provenance records, in insertion
/// order, duplicates included).
pub async fn list_plan_submissions(pool: &PgPool, plan_id: i32) -> Result<Vec<PlanSubmissionMap>> {
    let maps = sqlx::query_as::<_, PlanSubmissionMap>(
        "SELECT * FROM plan_submission_map \
         WHERE plan_id = $1 \
         ORDER BY id",
    )
    .bind(plan_id)
    .fetch_all(pool)
    .await
    .context("failed to list plan submissions")?;

    Ok(maps)
}
