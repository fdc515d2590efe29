//! Reading a single CSV source into memory.

use std::collections::HashSet;
use std::path::Path;

use summit_common::{Result, SummitError};
use tracing::{debug, info};

/// Header prefix of exported index columns.
const INDEX_COLUMN_PREFIX: &str = "Unnamed:";

/// One organised CSV file: trimmed cells, no index columns, no duplicate
/// or blank rows.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSource {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawSource {
    /// Position of a column by header name.
    pub fn column(&self, header: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == header)
    }

    pub fn require_column(&self, header: &str) -> Result<usize> {
        self.column(header).ok_or_else(|| SummitError::MissingColumn {
            column: header.to_string(),
            source_name: self.name.clone(),
        })
    }

    /// Cell value, `None` when the row is short or the cell is blank.
    pub fn cell<'a>(&self, row: &'a [String], col: usize) -> Option<&'a str> {
        row.get(col).map(String::as_str).filter(|s| !s.is_empty())
    }
}

/// Read and organise a CSV file.
pub fn read_source(path: &Path) -> Result<RawSource> {
    let name = path.display().to_string();
    debug!("Loading source from {:?}", path);

    let content = std::fs::read_to_string(path)?;
    parse_source(&name, &content)
}

/// Organise CSV text already in memory.
pub fn parse_source(name: &str, content: &str) -> Result<RawSource> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(content.as_bytes());

    let all_headers: Vec<String> = reader.headers()?.iter().map(|s| s.to_string()).collect();
    let keep: Vec<usize> = all_headers
        .iter()
        .enumerate()
        .filter(|(_, h)| !h.starts_with(INDEX_COLUMN_PREFIX))
        .map(|(i, _)| i)
        .collect();
    let headers = keep.iter().map(|&i| all_headers[i].clone()).collect();

    let mut seen = HashSet::new();
    let mut rows = Vec::new();
    let mut duplicates = 0usize;
    let mut blank = 0usize;

    for result in reader.records() {
        let record = result?;
        let row: Vec<String> = keep
            .iter()
            .map(|&i| record.get(i).unwrap_or("").to_string())
            .collect();

        if row.iter().all(|c| c.is_empty()) {
            blank += 1;
            continue;
        }
        if !seen.insert(row.clone()) {
            duplicates += 1;
            continue;
        }
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(SummitError::EmptySource(name.to_string()));
    }

    info!(
        source = name,
        rows = rows.len(),
        "Removed {} duplicates and {} blank rows",
        duplicates,
        blank
    );

    Ok(RawSource { name: name.to_string(), headers, rows })
}
