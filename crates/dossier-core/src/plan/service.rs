//! Plan assembly service.
//!
//! Creates a plan, its document tree, its document-to-ToC links, and its
//! plan-to-submission links inside a single database transaction. If any
//! step fails the whole operation rolls back; no orphaned rows are ever
//! observable.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::{info, warn};

use dossier_db::models::{Plan, SubmissionToc};
use dossier_db::queries::plans;

use crate::error::Error;
use crate::plan::key::{StructuralKey, find_plan_document};

/// One document node to create in the plan's tree, paired with the
/// submission ToC entries it should be linked to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanDocumentSpec {
    pub parent: String,
    pub section: String,
    pub leaf_title: String,
    pub file_name: String,
    pub href: String,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub estimated_days: Option<i32>,
    /// ToC entries this document represents, possibly across several
    /// submissions.
    pub submission_toc_ids: Vec<i32>,
}

impl PlanDocumentSpec {
    fn structural_key(&self) -> StructuralKey {
        StructuralKey::new(
            self.parent.clone(),
            self.section.clone(),
            self.leaf_title.clone(),
            self.file_name.clone(),
            self.href.clone(),
        )
    }
}

/// Input for [`create_plan_with_toc_and_mappings`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlanRequest {
    pub name: String,
    pub description: String,
    pub created_by: Option<String>,
    /// Submissions the plan aggregates. Inserted verbatim as provenance
    /// records: no dedup, existence enforced by the foreign key.
    pub submission_ids: Vec<i32>,
    pub documents: Vec<PlanDocumentSpec>,
}

fn validate(request: &CreatePlanRequest) -> Result<(), Error> {
    if request.name.trim().is_empty() {
        return Err(Error::Validation("plan name must not be empty".into()));
    }
    for (idx, doc) in request.documents.iter().enumerate() {
        if doc.parent.is_empty() || doc.section.is_empty() {
            return Err(Error::Validation(format!(
                "document {idx}: parent and section are required"
            )));
        }
    }
    Ok(())
}

/// Create a plan together with its document tree and all cross-links, as
/// one atomic operation.
///
/// Document ids are taken directly from each `INSERT ... RETURNING id`, so
/// they never need to be re-resolved by structural key after the fact. Two
/// document specs with the same structural key deliberately resolve to one
/// row: the first insert wins and later specs fan their ToC links into it
/// (a warning is logged when this happens).
///
/// A `submission_toc_ids` entry that does not exist fails the whole
/// operation with [`Error::NotFound`]; nothing is persisted.
pub async fn create_plan_with_toc_and_mappings(
    pool: &PgPool,
    request: CreatePlanRequest,
) -> Result<Plan, Error> {
    validate(&request)?;

    let mut tx = pool.begin().await?;

    // 1. The plan row.
    let plan = sqlx::query_as::<_, Plan>(
        "INSERT INTO plans (name, description, created_by) \
         VALUES ($1, $2, $3) \
         RETURNING *",
    )
    .bind(&request.name)
    .bind(&request.description)
    .bind(&request.created_by)
    .fetch_one(&mut *tx)
    .await?;

    // 2. The document tree. Track keys already inserted in this batch so a
    //    repeated structural key reuses the existing row instead of
    //    creating a duplicate node.
    let mut inserted: HashMap<StructuralKey, i32> = HashMap::new();
    let mut resolved_ids: Vec<i32> = Vec::with_capacity(request.documents.len());

    for doc in &request.documents {
        let key = doc.structural_key();
        let doc_id = match inserted.get(&key) {
            Some(&existing_id) => {
                warn!(
                    plan_id = plan.id,
                    document_id = existing_id,
                    section = %doc.section,
                    "duplicate structural key in plan request; reusing existing document"
                );
                existing_id
            }
            None => {
                let (id,): (i32,) = sqlx::query_as(
                    "INSERT INTO plan_documents \
                     (plan_id, parent, section, leaf_title, file_name, href, \
                      start_date, end_date, estimated_days) \
                     VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
                     RETURNING id",
                )
                .bind(plan.id)
                .bind(&doc.parent)
                .bind(&doc.section)
                .bind(&doc.leaf_title)
                .bind(&doc.file_name)
                .bind(&doc.href)
                .bind(doc.start_date)
                .bind(doc.end_date)
                .bind(doc.estimated_days)
                .fetch_one(&mut *tx)
                .await?;
                inserted.insert(key, id);
                id
            }
        };
        resolved_ids.push(doc_id);
    }

    // 3. Document-to-ToC links. A missing ToC entry aborts the whole
    //    operation rather than being silently skipped.
    for (doc, &doc_id) in request.documents.iter().zip(&resolved_ids) {
        for &toc_id in &doc.submission_toc_ids {
            let toc_exists: bool =
                sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM submission_toc WHERE id = $1)")
                    .bind(toc_id)
                    .fetch_one(&mut *tx)
                    .await?;
            if !toc_exists {
                // Transaction rolls back on drop (no commit).
                return Err(Error::not_found("submission ToC entry", toc_id));
            }

            sqlx::query(
                "INSERT INTO plan_document_submission_toc_map \
                 (plan_document_id, submission_toc_id) \
                 VALUES ($1, $2)",
            )
            .bind(doc_id)
            .bind(toc_id)
            .execute(&mut *tx)
            .await?;
        }
    }

    // 4. Plan-to-submission links, inserted verbatim.
    for &submission_id in &request.submission_ids {
        sqlx::query("INSERT INTO plan_submission_map (plan_id, submission_id) VALUES ($1, $2)")
            .bind(plan.id)
            .bind(submission_id)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;

    info!(
        plan_id = plan.id,
        documents = inserted.len(),
        submissions = request.submission_ids.len(),
        "plan created"
    );

    Ok(plan)
}

/// Link submission ToC entries into an existing plan's document tree.
///
/// For each ToC entry, the plan document with the same structural key is
/// reused when one exists; otherwise a new document is created on the fly,
/// copying the entry's structural fields (schedule fields start unset).
/// Returns the plan document id each ToC entry was linked to, in input
/// order. Runs in a single transaction; a missing plan or ToC entry aborts
/// the whole call.
pub async fn map_document_to_submission_toc(
    pool: &PgPool,
    plan_id: i32,
    submission_toc_ids: &[i32],
) -> Result<Vec<i32>, Error> {
    let mut tx = pool.begin().await?;

    if plans::get_plan(&mut *tx, plan_id).await?.is_none() {
        return Err(Error::not_found("plan", plan_id));
    }

    let mut linked_ids = Vec::with_capacity(submission_toc_ids.len());

    for &toc_id in submission_toc_ids {
        let toc = sqlx::query_as::<_, SubmissionToc>("SELECT * FROM submission_toc WHERE id = $1")
            .bind(toc_id)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(toc) = toc else {
            return Err(Error::not_found("submission ToC entry", toc_id));
        };

        let key = StructuralKey::from_toc(&toc);
        let doc_id = match find_plan_document(&mut *tx, plan_id, &key).await? {
            Some(existing) => existing,
            None => {
                let (id,): (i32,) = sqlx::query_as(
                    "INSERT INTO plan_documents \
                     (plan_id, parent, section, leaf_title, file_name, href) \
                     VALUES ($1, $2, $3, $4, $5, $6) \
                     RETURNING id",
                )
                .bind(plan_id)
                .bind(&toc.parent)
                .bind(&toc.section)
                .bind(&toc.leaf_title)
                .bind(&toc.file_name)
                .bind(&toc.href)
                .fetch_one(&mut *tx)
                .await?;
                id
            }
        };

        sqlx::query(
            "INSERT INTO plan_document_submission_toc_map \
             (plan_document_id, submission_toc_id) \
             VALUES ($1, $2)",
        )
        .bind(doc_id)
        .bind(toc_id)
        .execute(&mut *tx)
        .await?;

        linked_ids.push(doc_id);
    }

    tx.commit().await?;

    info!(
        plan_id,
        entries = submission_toc_ids.len(),
        "ToC entries mapped into plan"
    );

    Ok(linked_ids)
}
