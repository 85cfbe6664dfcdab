//! One-shot batch run: load, transform, aggregate, export.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::PipelineConfig;
use crate::geojson::{FeatureCollection, write_geojson};
use crate::loader::load_rows;
use crate::metrics::aggregate::summarize_districts;
use crate::metrics::transform::transform_rows;
use crate::output::write_summary;
use crate::web::write_bundle;

pub const SUMMARY_DIR: &str = "district_summary";
pub const GEOJSON_FILE: &str = "points.geojson";

/// What a run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub records: usize,
    pub districts: usize,
    pub coercion_failures: usize,
    pub inconsistent_records: usize,
    /// Summary directory, GeoJSON file, then the web bundle files.
    pub artifacts: Vec<PathBuf>,
}

/// Runs the whole pipeline from `input` into `output_dir`.
///
/// Everything is materialized before the first output is written. Outputs
/// are produced in order: summary CSV, GeoJSON, web bundle. Any failure
/// aborts the run; files already written are left in place.
#[tracing::instrument(skip(config), fields(input = %input.display(), output_dir = %output_dir.display()))]
pub fn run(input: &Path, output_dir: &Path, config: &PipelineConfig) -> Result<RunReport> {
    let rows = load_rows(input, &config.columns)?;
    info!(rows = rows.len(), "Input loaded");

    let outcome = transform_rows(&rows);
    let summary = summarize_districts(&outcome.records);
    let collection = FeatureCollection::from_records(&outcome.records);
    info!(
        records = outcome.records.len(),
        districts = summary.len(),
        coercion_failures = outcome.coercion_failures,
        inconsistent_records = outcome.inconsistent_records,
        "Metrics computed"
    );

    fs::create_dir_all(output_dir).with_context(|| {
        format!("failed to create output directory {}", output_dir.display())
    })?;

    let summary_dir = output_dir.join(SUMMARY_DIR);
    write_summary(&summary_dir, &summary)?;
    info!(dir = %summary_dir.display(), "District summary written");

    let geojson_path = output_dir.join(GEOJSON_FILE);
    write_geojson(&geojson_path, &collection)?;
    info!(path = %geojson_path.display(), "GeoJSON written");

    let bundle = write_bundle(output_dir, &config.map, GEOJSON_FILE)?;
    info!(files = bundle.len(), "Web map written");

    let mut artifacts = vec![summary_dir, geojson_path];
    artifacts.extend(bundle);

    Ok(RunReport {
        records: outcome.records.len(),
        districts: summary.len(),
        coercion_failures: outcome.coercion_failures,
        inconsistent_records: outcome.inconsistent_records,
        artifacts,
    })
}
