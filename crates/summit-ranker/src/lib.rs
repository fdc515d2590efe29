//! summit-ranker — Multi-criteria resort ranking engine.
//!
//! - [`attribute`]: independent per-attribute rankings.
//! - [`normalise`]: min-max normalisation onto [0, 1], 1.0 = preferred.
//! - [`weights`]: boolean preferences and weight vectors.
//! - [`scorer`]: the four-phase composite scorer.
//! - [`blend`]: rank-based blend of the three attribute lists.
//!
//! Everything here is synchronous and does no I/O.

pub mod attribute;
pub mod blend;
pub mod error;
pub mod normalise;
mod ordering;
pub mod scorer;
pub mod weights;

pub use attribute::{
    rank_all, rank_by, rank_by_criteria, rank_by_default, AttributeRankEntry, AttributeRanking, AttributeRankings,
};
pub use blend::{blend, blend_rankings, BlendEntry, BlendRanking};
pub use error::{RankerError, Result};
pub use normalise::{normalise_table, NormalizedTable};
pub use ordering::TopN;
pub use scorer::{run, score_batch, CompositeEntry, CompositeRanking, CompositeScorer, Phase};
pub use weights::{PreferenceVector, Preferences, WeightScheme};
