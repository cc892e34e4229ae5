//! Integration tests for submission updates.

use chrono::{TimeZone, Utc};
use sqlx::PgPool;

use dossier_core::error::Error;
use dossier_core::submission::{
    NewSubmission, UpdateSubmission, create_submission, update_submission,
};
use dossier_db::models::{Submission, SubmissionStatus};
use dossier_test_utils::{create_test_db, drop_test_db};

async fn seed_application(pool: &PgPool) -> i32 {
    dossier_test_utils::init_tracing();

    sqlx::query_scalar("INSERT INTO applications (name, country_code) VALUES ('ACME-001', 'US') RETURNING id")
        .fetch_one(pool)
        .await
        .expect("application insert should succeed")
}

async fn seed_activity(pool: &PgPool, code: &str) -> i32 {
    sqlx::query_scalar(
        "INSERT INTO controlled_vocabularies (category, code, display_name) \
         VALUES ('submission_activity', $1, $1) \
         RETURNING id",
    )
    .bind(code)
    .fetch_one(pool)
    .await
    .expect("vocabulary insert should succeed")
}

async fn seed_submission(pool: &PgPool, app_id: i32, activity_id: i32) -> Submission {
    create_submission(
        pool,
        NewSubmission {
            application_id: app_id,
            submission_activity_id: activity_id,
            sequence_number: None,
            description: Some("initial".to_owned()),
            submission_number: None,
            submission_date: None,
            status: SubmissionStatus::Draft,
        },
    )
    .await
    .expect("create should succeed")
}

fn update_for(submission: &Submission) -> UpdateSubmission {
    UpdateSubmission {
        id: submission.id,
        description: submission.description.clone(),
        submission_number: submission.submission_number.clone(),
        submission_date: submission.submission_date,
        status: submission.status,
        status_date: submission.status_date,
        is_active: submission.is_active,
        submission_activity_id: None,
    }
}

#[tokio::test]
async fn update_applies_fields_and_keeps_sequence() {
    let (pool, db_name) = create_test_db().await;
    let app_id = seed_application(&pool).await;
    let activity_id = seed_activity(&pool, "original").await;
    let submission = seed_submission(&pool, app_id, activity_id).await;

    let submitted_on = Utc.with_ymd_and_hms(2025, 4, 1, 9, 0, 0).unwrap();
    let mut update = update_for(&submission);
    update.description = Some("resubmitted with corrections".to_owned());
    update.submission_number = Some("SN-2025-17".to_owned());
    update.submission_date = Some(submitted_on);
    update.status = SubmissionStatus::Submitted;
    update.status_date = Some(submitted_on);
    update.is_active = false;

    let updated = update_submission(&pool, update).await.expect("update should succeed");
    assert_eq!(updated.description.as_deref(), Some("resubmitted with corrections"));
    assert_eq!(updated.submission_number.as_deref(), Some("SN-2025-17"));
    assert_eq!(updated.submission_date, Some(submitted_on));
    assert_eq!(updated.status, SubmissionStatus::Submitted);
    assert!(!updated.is_active);

    // Identity fields never move.
    assert_eq!(updated.sequence_number, submission.sequence_number);
    assert_eq!(updated.application_id, submission.application_id);
    assert_eq!(updated.submission_activity_id, activity_id);
    assert!(updated.updated_at >= submission.updated_at);

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn activity_change_is_validated() {
    let (pool, db_name) = create_test_db().await;
    let app_id = seed_application(&pool).await;
    let activity_id = seed_activity(&pool, "original").await;
    let supplement_id = seed_activity(&pool, "supplement").await;
    let submission = seed_submission(&pool, app_id, activity_id).await;

    // A vocabulary term from the wrong category is a validation failure.
    let wrong_category: i32 = sqlx::query_scalar(
        "INSERT INTO controlled_vocabularies (category, code, display_name) \
         VALUES ('country', 'us', 'United States') RETURNING id",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    let mut update = update_for(&submission);
    update.submission_activity_id = Some(wrong_category);
    let err = update_submission(&pool, update).await.unwrap_err();
    assert!(matches!(err, Error::Validation(_)), "got {err:?}");

    // A valid term from the right category is accepted.
    let mut update = update_for(&submission);
    update.submission_activity_id = Some(supplement_id);
    let updated = update_submission(&pool, update).await.expect("update should succeed");
    assert_eq!(updated.submission_activity_id, supplement_id);

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn missing_submission_is_not_found() {
    let (pool, db_name) = create_test_db().await;
    let app_id = seed_application(&pool).await;
    let activity_id = seed_activity(&pool, "original").await;
    let submission = seed_submission(&pool, app_id, activity_id).await;

    let mut update = update_for(&submission);
    update.id = 999_999;
    let err = update_submission(&pool, update).await.unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }), "got {err:?}");

    pool.close().await;
    drop_test_db(&db_name).await;
}
