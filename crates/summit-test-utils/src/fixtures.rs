//! Resort tables and CSV sources for tests.

use std::fs;
use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use summit_common::{ResortRecord, ResortTable};
use tempfile::TempDir;

/// A(50 runs, $80, 3000 m), B(30, $40, 2000 m), C(30, $40, 3000 m),
/// with ids 1, 2, 3 in that order.
pub fn scenario_table() -> ResortTable {
    ResortTable::new(vec![
        ResortRecord::new(1, "A", "United States", 50, 80.0, 3000.0),
        ResortRecord::new(2, "B", "Canada", 30, 40.0, 2000.0),
        ResortRecord::new(3, "C", "United States", 30, 40.0, 3000.0),
    ])
    .expect("scenario ids are unique")
}

/// A handful of real-looking resorts.
pub fn sample_table() -> ResortTable {
    ResortTable::new(vec![
        ResortRecord::new(1, "Whistler Blackcomb", "Canada", 200, 229.0, 2284.0),
        ResortRecord::new(2, "Vail", "United States", 195, 299.0, 3527.0),
        ResortRecord::new(3, "Big Sky", "United States", 317, 254.0, 3403.0),
        ResortRecord::new(4, "Sunshine Village", "Canada", 137, 149.0, 2730.0),
        ResortRecord::new(5, "Mad River Glen", "United States", 45, 99.0, 1115.0),
    ])
    .expect("sample ids are unique")
}

/// Seeded random table of `n` resorts.
///
/// Values are drawn from small integer ranges so that ties are common.
pub fn random_table(seed: u64, n: usize) -> ResortTable {
    let mut rng = StdRng::seed_from_u64(seed);
    let rows = (0..n)
        .map(|i| {
            let country = if rng.gen_bool(0.5) { "Canada" } else { "United States" };
            ResortRecord::new(
                i as i64 + 1,
                format!("Resort {}", i + 1),
                country,
                rng.gen_range(0..40u32) * 5,
                f64::from(rng.gen_range(20..60u32)) * 5.0,
                f64::from(rng.gen_range(5..40u32)) * 100.0,
            )
        })
        .collect();
    ResortTable::new(rows).expect("generated ids are unique")
}

/// Temporary directory holding CSV sources.
pub struct CsvSources {
    pub dir: TempDir,
    pub runs: PathBuf,
    pub prices: PathBuf,
    pub elevation: PathBuf,
}

impl CsvSources {
    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

/// Write the three source files into a fresh temp dir.
pub fn write_sources(runs: &str, prices: &str, elevation: &str) -> anyhow::Result<CsvSources> {
    let dir = tempfile::tempdir()?;
    let runs_path = write_file(dir.path(), "runs.csv", runs)?;
    let prices_path = write_file(dir.path(), "prices.csv", prices)?;
    let elevation_path = write_file(dir.path(), "elevation.csv", elevation)?;
    Ok(CsvSources {
        dir,
        runs: runs_path,
        prices: prices_path,
        elevation: elevation_path,
    })
}

/// Clean sources for the scenario resorts.
pub fn scenario_sources() -> anyhow::Result<CsvSources> {
    write_sources(
        "Resort ID,Resort,Country,Run Count\n1,A,United States,50\n2,B,Canada,30\n3,C,United States,30\n",
        "Resort ID,Resort,Price (USD)\n1,A,80\n2,B,40\n3,C,40\n",
        "Resort ID,Resort,Peak Elevation (m)\n1,A,3000\n2,B,2000\n3,C,3000\n",
    )
}

fn write_file(dir: &Path, name: &str, contents: &str) -> anyhow::Result<PathBuf> {
    let path = dir.join(name);
    fs::write(&path, contents)?;
    Ok(path)
}
