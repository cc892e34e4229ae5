//! Plan assembly and synchronization: structural-key matching, atomic
//! plan/document/mapping creation, and one-way schedule propagation.

pub mod key;
pub mod service;
pub mod sync;

pub use key::{StructuralKey, find_plan_document};
pub use service::{
    CreatePlanRequest, PlanDocumentSpec, create_plan_with_toc_and_mappings,
    map_document_to_submission_toc,
};
pub use sync::{SyncPolicy, sync_schedule_to_submissions};
