//! Post-cleanup checks on the processed resorts.

use std::collections::HashSet;

use serde::Serialize;
use summit_common::{Attribute, ResortRecord, SummitError};
use tracing::warn;

use crate::pipeline::IngestionConfig;

/// Every problem found, in record order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationReport {
    pub checked: usize,
    pub problems: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.problems.is_empty()
    }

    /// `Ok(())` when clean, otherwise `SummitError::Validation` with every
    /// problem.
    pub fn into_result(self) -> summit_common::Result<()> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(SummitError::Validation(self.problems))
        }
    }
}

/// Check for missing values, duplicate ids and countries outside the
/// allow-list. `conflicting_ids` are ids the merge saw twice in one source.
pub fn validate(records: &[ResortRecord], conflicting_ids: &[i64], config: &IngestionConfig) -> ValidationReport {
    let mut problems = Vec::new();
    let mut seen = HashSet::new();

    for record in records {
        if !seen.insert(record.id) {
            problems.push(format!("Resort ID {} is not unique", record.id));
        }
        if record.name.trim().is_empty() {
            problems.push(format!("Resort ID {} has no name", record.id));
        }
        if record.country.trim().is_empty() {
            problems.push(format!("Resort ID {} has no country", record.id));
        } else if !config.allows_country(&record.country) {
            problems.push(format!(
                "Resort ID {} has country {:?} outside the allowed list",
                record.id, record.country
            ));
        }
        for attribute in Attribute::ALL {
            match record.value(attribute) {
                None => problems.push(format!("Resort ID {} is missing {}", record.id, attribute)),
                Some(v) if v < 0.0 => problems.push(format!("Resort ID {} has negative {}", record.id, attribute)),
                Some(_) => {}
            }
        }
    }
    for id in conflicting_ids {
        problems.push(format!("Resort ID {} is not unique", id));
    }

    for problem in &problems {
        warn!("{}", problem);
    }

    ValidationReport { checked: records.len(), problems }
}
