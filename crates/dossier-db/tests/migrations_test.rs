//! Integration tests for database migrations and schema constraints.
//!
//! Each test creates a unique temporary database within a shared
//! PostgreSQL container (see `dossier-test-utils`), runs migrations, and
//! drops it on completion so tests are fully isolated.

use sqlx::PgPool;

use dossier_db::pool;
use dossier_test_utils::{create_test_db, drop_test_db};

/// Expected tables created by the migrations, in name order.
const EXPECTED_TABLES: &[&str] = &[
    "applications",
    "controlled_vocabularies",
    "default_template_content",
    "default_templates",
    "plan_document_submission_toc_map",
    "plan_documents",
    "plan_submission_map",
    "plans",
    "submission_toc",
    "submissions",
];

async fn seed_application(pool: &PgPool) -> i32 {
    sqlx::query_scalar("INSERT INTO applications (name, country_code) VALUES ($1, $2) RETURNING id")
        .bind("ACME-BLA-2025")
        .bind("US")
        .fetch_one(pool)
        .await
        .expect("application insert should succeed")
}

async fn seed_activity(pool: &PgPool) -> i32 {
    sqlx::query_scalar(
        "INSERT INTO controlled_vocabularies (category, code, display_name) \
         VALUES ('submission_activity', 'original', 'Original Application') \
         RETURNING id",
    )
    .fetch_one(pool)
    .await
    .expect("vocabulary insert should succeed")
}

#[tokio::test]
async fn migrations_create_all_tables() {
    let (pool, db_name) = create_test_db().await;

    let rows: Vec<(String,)> = sqlx::query_as(
        "SELECT tablename::text FROM pg_tables \
         WHERE schemaname = 'public' \
         ORDER BY tablename",
    )
    .fetch_all(&pool)
    .await
    .expect("should list tables");

    // Filter out the sqlx metadata table.
    let user_tables: Vec<&str> = rows
        .iter()
        .map(|(name,)| name.as_str())
        .filter(|t| !t.starts_with("_sqlx"))
        .collect();

    assert_eq!(
        user_tables, EXPECTED_TABLES,
        "migrations should create exactly the expected tables"
    );

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let (pool, db_name) = create_test_db().await;

    // create_test_db already ran migrations once; a second run is a no-op.
    pool::run_migrations(&pool)
        .await
        .expect("second migration run should succeed (idempotent)");

    let counts = pool::table_counts(&pool)
        .await
        .expect("table_counts should succeed");
    for (name, count) in counts.iter().filter(|(n, _)| !n.starts_with("_sqlx")) {
        assert_eq!(*count, 0, "table {name} should be empty after migrations");
    }

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn sequence_number_unique_per_application() {
    let (pool, db_name) = create_test_db().await;

    let app_id = seed_application(&pool).await;
    let activity_id = seed_activity(&pool).await;

    let insert = "INSERT INTO submissions (application_id, sequence_number, submission_activity_id) \
                  VALUES ($1, $2, $3)";

    sqlx::query(insert)
        .bind(app_id)
        .bind("0000")
        .bind(activity_id)
        .execute(&pool)
        .await
        .expect("first insert should succeed");

    let dup = sqlx::query(insert)
        .bind(app_id)
        .bind("0000")
        .bind(activity_id)
        .execute(&pool)
        .await;
    assert!(
        dup.is_err(),
        "duplicate (application_id, sequence_number) must be rejected"
    );

    // The same sequence number under a different application is fine.
    let other_app = seed_application(&pool).await;
    sqlx::query(insert)
        .bind(other_app)
        .bind("0000")
        .bind(activity_id)
        .execute(&pool)
        .await
        .expect("same sequence under another application should succeed");

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn plan_documents_cascade_with_plan() {
    let (pool, db_name) = create_test_db().await;

    let plan_id: i32 =
        sqlx::query_scalar("INSERT INTO plans (name) VALUES ('Q3 rollout') RETURNING id")
            .fetch_one(&pool)
            .await
            .expect("plan insert should succeed");

    sqlx::query(
        "INSERT INTO plan_documents (plan_id, parent, section) VALUES ($1, 'm1', '1.1')",
    )
    .bind(plan_id)
    .execute(&pool)
    .await
    .expect("document insert should succeed");

    sqlx::query("DELETE FROM plans WHERE id = $1")
        .bind(plan_id)
        .execute(&pool)
        .await
        .expect("plan delete should succeed");

    let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM plan_documents")
        .fetch_one(&pool)
        .await
        .expect("count should succeed");
    assert_eq!(remaining, 0, "plan documents are owned by their plan");

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn map_rows_require_both_sides() {
    let (pool, db_name) = create_test_db().await;

    let result = sqlx::query(
        "INSERT INTO plan_document_submission_toc_map (plan_document_id, submission_toc_id) \
         VALUES (12345, 67890)",
    )
    .execute(&pool)
    .await;
    assert!(
        result.is_err(),
        "map rows must reference existing documents and ToC entries"
    );

    pool.close().await;
    drop_test_db(&db_name).await;
}
