//! GeoJSON point export of village records.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

use crate::metrics::access::AccessLevel;
use crate::metrics::types::Record;
use crate::metrics::utility::round2;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Geometry {
    /// Coordinates are `[longitude, latitude]`.
    Point { coordinates: [f64; 2] },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureProperties {
    #[serde(rename = "Village")]
    pub village: String,
    #[serde(rename = "District")]
    pub district: String,
    #[serde(rename = "State")]
    pub state: String,
    #[serde(rename = "PercentAccess")]
    pub percent_access: f64,
    #[serde(rename = "AccessLevel")]
    pub access_level: AccessLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "Feature")]
pub struct Feature {
    /// `None` when either coordinate is absent; serialized as `null`.
    pub geometry: Option<Geometry>,
    pub properties: FeatureProperties,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "FeatureCollection")]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

impl Feature {
    pub fn from_record(record: &Record) -> Self {
        let geometry = match (record.lon, record.lat) {
            (Some(lon), Some(lat)) => Some(Geometry::Point {
                coordinates: [lon, lat],
            }),
            _ => None,
        };

        Feature {
            geometry,
            properties: FeatureProperties {
                village: record.village.clone(),
                district: record.district.clone(),
                state: record.state.clone(),
                percent_access: round2(record.percent_access),
                access_level: record.access_level,
            },
        }
    }
}

impl FeatureCollection {
    /// One feature per record, in record order.
    pub fn from_records(records: &[Record]) -> Self {
        FeatureCollection {
            features: records.iter().map(Feature::from_record).collect(),
        }
    }
}

/// Writes `collection` to `path` as 2-space indented JSON, replacing any
/// existing file.
pub fn write_geojson(path: &Path, collection: &FeatureCollection) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create GeoJSON file {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, collection)
        .with_context(|| format!("failed to write GeoJSON to {}", path.display()))?;
    writer
        .flush()
        .with_context(|| format!("failed to flush GeoJSON to {}", path.display()))?;

    debug!(
        path = %path.display(),
        features = collection.features.len(),
        "GeoJSON written"
    );
    Ok(())
}
