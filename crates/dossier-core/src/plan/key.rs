//! Structural identity of document-tree nodes.
//!
//! ToC nodes, template content rows, and plan documents all share the same
//! five string fields. That tuple is the natural key used to decide whether
//! two nodes are "the same" logical document, independent of surrogate ids.
//! Equality is exact string equality: no trimming, no case folding, so
//! values differing only in trailing whitespace or case are distinct nodes.
//! That is deliberate, documented behavior; see DESIGN.md before adding
//! normalization.

use serde::{Deserialize, Serialize};
use sqlx::Postgres;

use dossier_db::models::SubmissionToc;

/// Composite natural key of a document node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StructuralKey {
    pub parent: String,
    pub section: String,
    pub leaf_title: String,
    pub file_name: String,
    pub href: String,
}

impl StructuralKey {
    pub fn new(
        parent: impl Into<String>,
        section: impl Into<String>,
        leaf_title: impl Into<String>,
        file_name: impl Into<String>,
        href: impl Into<String>,
    ) -> Self {
        Self {
            parent: parent.into(),
            section: section.into(),
            leaf_title: leaf_title.into(),
            file_name: file_name.into(),
            href: href.into(),
        }
    }

    /// Structural key of an existing submission ToC node.
    pub fn from_toc(toc: &SubmissionToc) -> Self {
        Self::new(
            toc.parent.clone(),
            toc.section.clone(),
            toc.leaf_title.clone(),
            toc.file_name.clone(),
            toc.href.clone(),
        )
    }
}

/// Find the plan document with this structural key within one plan.
///
/// Returns the document id, or `None` when the plan has no node with that
/// key (absence is the normal "create one" signal, not an error). Matches
/// on all five fields exactly.
pub async fn find_plan_document<'e, E>(
    executor: E,
    plan_id: i32,
    key: &StructuralKey,
) -> Result<Option<i32>, sqlx::Error>
where
    E: sqlx::Executor<'e, Database = Postgres>,
{
    let row: Option<(i32,)> = sqlx::query_as(
        "SELECT id FROM plan_documents \
         WHERE plan_id = $1 AND parent = $2 AND section = $3 \
           AND leaf_title = $4 AND file_name = $5 AND href = $6",
    )
    .bind(plan_id)
    .bind(&key.parent)
    .bind(&key.section)
    .bind(&key.leaf_title)
    .bind(&key.file_name)
    .bind(&key.href)
    .fetch_optional(executor)
    .await?;

    Ok(row.map(|(id,)| id))
}
