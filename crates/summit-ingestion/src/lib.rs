//! summit-ingestion — Turns the three raw resort CSV sources into a
//! validated `ResortTable`:
//! - Reading and organising each source (trim, drop index columns, dedup)
//! - Outer merge on `Resort ID`
//! - Cleanup of holes and negative values
//! - Validation (unique ids, country allow-list, no missing values)
//! - Writing the processed table back to CSV

pub mod reader;
pub mod merge;
pub mod clean;
pub mod validate;
pub mod writer;
pub mod pipeline;

pub use pipeline::{preprocess, IngestionConfig, SourcePaths};
pub use validate::ValidationReport;
