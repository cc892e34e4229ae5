//! Plan/submission reconciliation and synchronization engine.
//!
//! The services here compose the query layer in `dossier-db` into the
//! multi-step, transactional workflows the tracker is built around:
//!
//! - [`sequence`]: per-application submission sequence numbers.
//! - [`submission`]: submission creation and updates, with serialized
//!   sequence allocation.
//! - [`template`]: one-time materialization of a submission's ToC from a
//!   default template.
//! - [`plan`]: atomic plan assembly (plan, document tree, cross-links),
//!   structural-key matching, and one-way schedule sync down into
//!   submission ToC rows.

pub mod error;
pub mod plan;
pub mod sequence;
pub mod submission;
pub mod template;

pub use error::Error;
