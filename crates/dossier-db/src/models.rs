use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Lifecycle status of a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    Draft,
    Submitted,
    Approved,
    Rejected,
    Withdrawn,
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Draft => "draft",
            Self::Submitted => "submitted",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Withdrawn => "withdrawn",
        };
        f.write_str(s)
    }
}

impl FromStr for SubmissionStatus {
    type Err = SubmissionStatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "submitted" => Ok(Self::Submitted),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            "withdrawn" => Ok(Self::Withdrawn),
            other => Err(SubmissionStatusParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`SubmissionStatus`] string.
#[derive(Debug, Clone)]
pub struct SubmissionStatusParseError(pub String);

impl fmt::Display for SubmissionStatusParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid submission status: {:?}", self.0)
    }
}

impl std::error::Error for SubmissionStatusParseError {}

// ---------------------------------------------------------------------------
// Reference data
// ---------------------------------------------------------------------------

/// A regulatory application. Reference data: the engine only reads it.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Application {
    pub id: i32,
    pub name: String,
    /// ISO country code of the market the application targets.
    pub country_code: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// A controlled-vocabulary term (e.g. category `submission_activity`).
/// Reference data: the engine only reads it.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ControlledVocabulary {
    pub id: i32,
    pub category: String,
    pub code: String,
    pub display_name: String,
    pub is_active: bool,
}

// ---------------------------------------------------------------------------
// Submissions and their document trees
// ---------------------------------------------------------------------------

/// A regulatory submission belonging to one application.
///
/// `sequence_number` is a 4-digit zero-padded string ("0000", "0001", ...)
/// unique within the owning application, assigned at creation and never
/// changed.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Submission {
    pub id: i32,
    pub application_id: i32,
    pub sequence_number: String,
    /// Reference to a `submission_activity` vocabulary term.
    pub submission_activity_id: i32,
    pub description: Option<String>,
    /// External submission reference number, if any.
    pub submission_number: Option<String>,
    pub submission_date: Option<DateTime<Utc>>,
    pub status: SubmissionStatus,
    pub status_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_active: bool,
}

/// One node of a submission's table of contents.
///
/// Structural identity is the five-field tuple of string fields; see
/// `dossier_core::plan::StructuralKey`. Schedule fields start unset and may
/// later be overwritten by plan-side sync.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct SubmissionToc {
    pub id: i32,
    pub submission_id: i32,
    /// Parent section name.
    pub parent: String,
    /// Section or folder name.
    pub section: String,
    /// Document title, if the node is a leaf.
    pub leaf_title: String,
    pub file_name: String,
    /// Path to the file or folder.
    pub href: String,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub estimated_days: Option<i32>,
}

// ---------------------------------------------------------------------------
// Templates
// ---------------------------------------------------------------------------

/// A reusable ToC blueprint, keyed by submission activity type and country.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct DefaultTemplate {
    pub id: i32,
    pub name: String,
    /// Reference to a `submission_activity` vocabulary term.
    pub submission_type_id: i32,
    pub country: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
}

/// One content row of a template. Same structural shape as a ToC node but
/// carries no schedule fields: templates are blueprints.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct DefaultTemplateContent {
    pub id: i32,
    pub template_id: i32,
    pub parent: String,
    pub section: String,
    pub leaf_title: String,
    pub file_name: String,
    pub href: String,
}

// ---------------------------------------------------------------------------
// Plans
// ---------------------------------------------------------------------------

/// A user-authored aggregation spanning one or more submissions.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Plan {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub created_by: Option<String>,
    pub created_date: DateTime<Utc>,
}

/// One node of a plan's document tree: the authoring side that a human
/// edits. Same structural shape as a ToC node plus schedule fields.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct PlanDocument {
    pub id: i32,
    pub plan_id: i32,
    pub parent: String,
    pub section: String,
    pub leaf_title: String,
    pub file_name: String,
    pub href: String,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub estimated_days: Option<i32>,
}

/// Many-to-many link between a plan document and a submission ToC node.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct PlanDocumentSubmissionTocMap {
    pub id: i32,
    pub plan_document_id: i32,
    pub submission_toc_id: i32,
}

/// Many-to-many link between a plan and a submission it aggregates.
/// A display/provenance record, not a matching key.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct PlanSubmissionMap {
    pub id: i32,
    pub plan_id: i32,
    pub submission_id: i32,
}
