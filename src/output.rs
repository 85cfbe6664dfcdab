//! District summary persistence.
//!
//! The summary is written as a directory holding a single CSV part file
//! and an empty `_SUCCESS` marker, replacing whatever the directory held.

use anyhow::{Context, Result};
use csv::WriterBuilder;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::metrics::types::DistrictSummary;

pub const PART_FILE: &str = "part-00000.csv";
pub const SUCCESS_MARKER: &str = "_SUCCESS";

/// Column names of [`DistrictSummary`] as serialized.
pub const SUMMARY_HEADER: [&str; 5] = [
    "State",
    "District",
    "TotalHouseholds",
    "CleanWaterHH",
    "PercentAccess",
];

/// Writes `rows` with a header to `<dir>/part-00000.csv` and returns that path.
///
/// An existing `dir` is removed first.
pub fn write_summary(dir: &Path, rows: &[DistrictSummary]) -> Result<PathBuf> {
    if dir.exists() {
        debug!(dir = %dir.display(), "Removing previous summary output");
        fs::remove_dir_all(dir)
            .with_context(|| format!("failed to clear summary directory {}", dir.display()))?;
    }
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create summary directory {}", dir.display()))?;

    let path = dir.join(PART_FILE);
    let mut writer = WriterBuilder::new()
        .has_headers(true)
        .from_path(&path)
        .with_context(|| format!("failed to create summary file {}", path.display()))?;

    // serialize() emits the header with the first row only
    if rows.is_empty() {
        writer
            .write_record(SUMMARY_HEADER)
            .with_context(|| format!("failed to write summary header to {}", path.display()))?;
    }
    for row in rows {
        writer
            .serialize(row)
            .with_context(|| format!("failed to write summary row to {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("failed to flush {}", path.display()))?;

    fs::write(dir.join(SUCCESS_MARKER), b"")
        .with_context(|| format!("failed to write success marker in {}", dir.display()))?;

    debug!(path = %path.display(), rows = rows.len(), "District summary written");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(state: &str, district: &str, total: i64, clean: i64, pct: f64) -> DistrictSummary {
        DistrictSummary {
            state: state.to_string(),
            district: district.to_string(),
            total_households: total,
            clean_water_hh: clean,
            percent_access: pct,
        }
    }

    #[test]
    fn test_write_summary_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("district_summary");

        let path = write_summary(
            &out,
            &[
                summary("S1", "D1", 150, 90, 60.0),
                summary("S1", "D2", 3, 2, 66.67),
            ],
        )
        .unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(
            lines,
            vec![
                "State,District,TotalHouseholds,CleanWaterHH,PercentAccess",
                "S1,D1,150,90,60.0",
                "S1,D2,3,2,66.67",
            ]
        );
        assert!(out.join(SUCCESS_MARKER).exists());
    }

    #[test]
    fn test_write_summary_empty_still_has_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_summary(&dir.path().join("district_summary"), &[]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.trim_end(), SUMMARY_HEADER.join(","));
    }

    #[test]
    fn test_header_constant_matches_serialized_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_summary(
            &dir.path().join("district_summary"),
            &[summary("S1", "D1", 1, 1, 100.0)],
        )
        .unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().next().unwrap(), SUMMARY_HEADER.join(","));
    }

    #[test]
    fn test_write_summary_replaces_previous_output() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("district_summary");
        fs::create_dir_all(&out).unwrap();
        fs::write(out.join("part-00001-stale.csv"), "old").unwrap();

        write_summary(&out, &[summary("S1", "D1", 1, 1, 100.0)]).unwrap();

        let mut names: Vec<_> = fs::read_dir(&out)
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        names.sort();
        assert_eq!(names, vec![SUCCESS_MARKER, PART_FILE]);
    }

    #[test]
    fn test_write_summary_quotes_commas() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_summary(
            &dir.path().join("district_summary"),
            &[summary("S1", "North, East", 10, 5, 50.0)],
        )
        .unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("S1,\"North, East\",10,5,50.0"));
    }
}
