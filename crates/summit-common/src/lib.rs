//! summit-common — Shared types and errors used across all SummitSelect crates.

pub mod error;
pub mod entities;

// Re-export commonly used types
pub use entities::{Attribute, Direction, ResortRecord, ResortTable};
pub use error::{Result, SummitError};
