//! Database query functions for `default_templates` and
//! `default_template_content`.

use anyhow::{Context, Result};
use sqlx::{PgPool, Postgres};

use crate::models::{DefaultTemplate, DefaultTemplateContent};

/// Find an active template matching a submission activity type.
///
/// Templates also carry a country code, but selection does not filter on it
/// yet; see the repository design notes. Generic over the executor so it
/// can run inside a materialization transaction.
pub async fn find_active_template_for_activity<'e, E>(
    executor: E,
    submission_type_id: i32,
) -> Result<Option<DefaultTemplate>>
where
    E: sqlx::Executor<'e, Database = Postgres>,
{
    let template = sqlx::query_as::<_, DefaultTemplate>(
        "SELECT * FROM default_templates \
         WHERE submission_type_id = $1 AND is_active \
         ORDER BY id \
         LIMIT 1",
    )
    .bind(submission_type_id)
    .fetch_optional(executor)
    .await
    .context("failed to look up default template")?;

    Ok(template)
}

/// Fetch all content rows for a template, ordered by parent then section
/// for deterministic materialization.
pub async fn get_template_content<'e, E>(
    executor: E,
    template_id: i32,
) -> Result<Vec<DefaultTemplateContent>>
where
    E: sqlx::Executor<'e, Database = Postgres>,
{
    let rows = sqlx::query_as::<_, DefaultTemplateContent>(
        "SELECT * FROM default_template_content \
         WHERE template_id = $1 \
         ORDER BY parent, section",
    )
    .bind(template_id)
    .fetch_all(executor)
    .await
    .context("failed to fetch template content")?;

    Ok(rows)
}

/// Insert a template row. Returns the inserted template with
/// server-generated defaults.
pub async fn insert_template(
    pool: &PgPool,
    name: &str,
    submission_type_id: i32,
    country: &str,
) -> Result<DefaultTemplate> {
    let template = sqlx::query_as::<_, DefaultTemplate>(
        "INSERT INTO default_templates (name, submission_type_id, country) \
         VALUES ($1, $2, $3) \
         RETURNING *",
    )
    .bind(name)
    .bind(submission_type_id)
    .bind(country)
    .fetch_one(pool)
    .await
    .context("failed to insert default template")?;

    Ok(template)
}

/// Insert a single content row into a template.
pub async fn insert_template_content(
    pool: &PgPool,
    template_id: i32,
    parent: &str,
    section: &str,
    leaf_title: &str,
    file_name: &str,
    href: &str,
) -> Result<DefaultTemplateContent> {
    let row = sqlx::query_as::<_, DefaultTemplateContent>(
        "INSERT INTO default_template_content (template_id, parent, section, leaf_title, file_name, href) \
         VALUES ($1, $2, $3, $4, $5, $6) \
         RETURNING *",
    )
    .bind(template_id)
    .bind(parent)
    .bind(section)
    .bind(leaf_title)
    .bind(file_name)
    .bind(href)
    .fetch_one(pool)
    .await
    .context("failed to insert template content row")?;

    Ok(row)
}
