//! Error types for the ranking engine.

use summit_common::Attribute;
use thiserror::Error;

use crate::scorer::Phase;

pub type Result<T> = std::result::Result<T, RankerError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RankerError {
    // ── Input shape ─────────────────────────────────────────────────────────
    #[error("Missing attribute '{attribute}' in resort table")]
    MissingAttribute { attribute: Attribute },

    #[error("Resort table has no rows")]
    EmptyTable,

    #[error("Non-finite value {value} for '{attribute}' on resort {id}")]
    NonFiniteValue { attribute: Attribute, id: i64, value: f64 },

    #[error("Cannot normalise an empty resort table")]
    EmptyInput,

    #[error("Normalised table is empty; run normalisation before scoring")]
    EmptyNormalizedInput,

    #[error("Scored table does not match the resort table it is ranked against")]
    TableMismatch,

    // ── Phase order ─────────────────────────────────────────────────────────
    #[error("'{operation}' called out of order: requires phase {required} to have completed")]
    PhaseOrder { operation: &'static str, required: Phase },

    // ── Domain violations ───────────────────────────────────────────────────
    #[error("No weight given for attribute '{attribute}'")]
    MissingWeight { attribute: Attribute },

    #[error("Weight {weight} for '{attribute}' is outside [-1, 1]")]
    WeightOutOfRange { attribute: Attribute, weight: f64 },

    #[error("Weight {weight} for '{attribute}' must be +1/3 or -1/3")]
    InvalidSignedWeight { attribute: Attribute, weight: f64 },

    #[error("Weight {weight} for '{attribute}' is negative")]
    NegativeWeight { attribute: Attribute, weight: f64 },

    #[error("Weights sum to {sum}, expected 1.0")]
    WeightSum { sum: f64 },

    #[error("Top-N count must be at least 1, got {n}")]
    InvalidCount { n: usize },

    #[error("Ranking is empty")]
    EmptyRanking,
}
