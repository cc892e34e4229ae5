//! Database layer for dossier: connection pooling, embedded migrations,
//! row models, and plain query functions grouped per table.
//!
//! Multi-step transactional workflows (plan assembly, template
//! materialization, schedule sync) live in `dossier-core`; this crate only
//! provides the building blocks.

pub mod config;
pub mod models;
pub mod pool;
pub mod queries;
