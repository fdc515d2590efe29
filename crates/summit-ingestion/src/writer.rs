//! Writing the processed table back to CSV.

use std::path::Path;

use summit_common::{Result, ResortTable};
use tracing::info;

/// Write `table` to `path` with the source headers, creating parent
/// directories as needed.
pub fn write_processed(table: &ResortTable, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = csv::Writer::from_path(path)?;
    for record in table.rows() {
        writer.serialize(record)?;
    }
    writer.flush()?;
    info!("Processed data saved to {:?} ({} resorts)", path, table.len());
    Ok(())
}
