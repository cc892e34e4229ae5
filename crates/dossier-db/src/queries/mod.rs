//! Plain query functions, one module per table group.

pub mod plans;
pub mod submissions;
pub mod templates;
pub mod toc;
