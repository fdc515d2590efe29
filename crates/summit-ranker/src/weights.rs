//! Preference weights for composite scoring.
//!
//! A weight's sign is the direction (positive: reward the preferred end of
//! the attribute, negative: penalise it) and its magnitude is importance.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use summit_common::Attribute;

use crate::error::{RankerError, Result};

/// Magnitude of every weight under the boolean-preference scheme.
pub const THIRD: f64 = 1.0 / 3.0;

/// Tolerance for weight-sum and signed-weight checks.
pub const WEIGHT_TOLERANCE: f64 = 1e-9;

/// Three yes/no answers collected from the user before scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Preferences {
    /// Looking for more runs.
    pub runs: bool,
    /// Looking for cheaper lift tickets.
    pub price: bool,
    /// Looking for a higher peak elevation.
    pub elevation: bool,
}

impl Preferences {
    pub fn new(runs: bool, price: bool, elevation: bool) -> Self {
        Self { runs, price, elevation }
    }

    pub fn get(&self, attribute: Attribute) -> bool {
        match attribute {
            Attribute::RunCount => self.runs,
            Attribute::Price => self.price,
            Attribute::PeakElevation => self.elevation,
        }
    }

    /// All eight combinations, all-true first.
    pub fn all_combinations() -> Vec<Preferences> {
        let mut out = Vec::with_capacity(8);
        for bits in (0u8..8).rev() {
            out.push(Preferences::new(bits & 4 != 0, bits & 2 != 0, bits & 1 != 0));
        }
        out
    }
}

/// Rule a [`PreferenceVector`] is validated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightScheme {
    /// Every weight is exactly +1/3 or -1/3; no sum constraint.
    Signed,
    /// Weights are non-negative and sum to 1.0.
    Normalised,
}

/// Per-attribute signed weights.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PreferenceVector {
    weights: BTreeMap<Attribute, f64>,
}

impl PreferenceVector {
    /// An empty vector; add weights with [`PreferenceVector::with_weight`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Map each answer to +1/3 (care) or -1/3 (don't care).
    ///
    /// All three `false` is valid and inverts the overall preference.
    pub fn from_preferences(prefs: Preferences) -> Self {
        let weights = Attribute::ALL
            .iter()
            .map(|&a| (a, if prefs.get(a) { THIRD } else { -THIRD }))
            .collect();
        Self { weights }
    }

    /// Explicit weights for the general scheme; validated as [`WeightScheme::Normalised`].
    pub fn general(run_count: f64, price: f64, peak_elevation: f64) -> Result<Self> {
        let v = Self::new()
            .with_weight(Attribute::RunCount, run_count)
            .with_weight(Attribute::Price, price)
            .with_weight(Attribute::PeakElevation, peak_elevation);
        v.validate(WeightScheme::Normalised)?;
        Ok(v)
    }

    pub fn with_weight(mut self, attribute: Attribute, weight: f64) -> Self {
        self.weights.insert(attribute, weight);
        self
    }

    pub fn get(&self, attribute: Attribute) -> Option<f64> {
        self.weights.get(&attribute).copied()
    }

    /// Weight for `attribute`, or `MissingWeight`.
    pub fn require(&self, attribute: Attribute) -> Result<f64> {
        self.get(attribute).ok_or(RankerError::MissingWeight { attribute })
    }

    pub fn sum(&self) -> f64 {
        self.weights.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Attribute, f64)> + '_ {
        self.weights.iter().map(|(&a, &w)| (a, w))
    }

    /// Check every attribute has a weight in [-1, 1] and that the vector
    /// satisfies `scheme`.
    pub fn validate(&self, scheme: WeightScheme) -> Result<()> {
        for attribute in Attribute::ALL {
            let weight = self.require(attribute)?;
            if !(-1.0..=1.0).contains(&weight) {
                return Err(RankerError::WeightOutOfRange { attribute, weight });
            }
            match scheme {
                WeightScheme::Signed => {
                    if (weight.abs() - THIRD).abs() > WEIGHT_TOLERANCE {
                        return Err(RankerError::InvalidSignedWeight { attribute, weight });
                    }
                }
                WeightScheme::Normalised => {
                    if weight < 0.0 {
                        return Err(RankerError::NegativeWeight { attribute, weight });
                    }
                }
            }
        }
        if scheme == WeightScheme::Normalised {
            let sum = self.sum();
            if (sum - 1.0).abs() > WEIGHT_TOLERANCE {
                return Err(RankerError::WeightSum { sum });
            }
        }
        Ok(())
    }
}
