//! Run configuration: the input schema mapping and the web map view.
//!
//! Stored as a JSON object on disk. Both keys are optional:
//! ```json
//! {
//!   "columns": [
//!     { "source": "village_name", "canonical": "Village", "kind": "text" },
//!     { "source": "total_households", "canonical": "TotalHouseholds", "kind": "integer" }
//!   ],
//!   "map": { "center": [23.5, 80.0], "zoom": 6 }
//! }
//! ```
//! A `columns` list replaces the default mapping wholesale, so it must
//! name all seven canonical fields.

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// The fields every [`Record`](crate::metrics::types::Record) is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CanonicalField {
    Village,
    District,
    State,
    TotalHouseholds,
    CleanWaterHH,
    Lat,
    Lon,
}

impl CanonicalField {
    pub const ALL: [CanonicalField; 7] = [
        CanonicalField::Village,
        CanonicalField::District,
        CanonicalField::State,
        CanonicalField::TotalHouseholds,
        CanonicalField::CleanWaterHH,
        CanonicalField::Lat,
        CanonicalField::Lon,
    ];

    /// The coercion target this field carries.
    pub fn kind(self) -> ColumnKind {
        match self {
            CanonicalField::Village | CanonicalField::District | CanonicalField::State => {
                ColumnKind::Text
            }
            CanonicalField::TotalHouseholds | CanonicalField::CleanWaterHH => ColumnKind::Integer,
            CanonicalField::Lat | CanonicalField::Lon => ColumnKind::Float,
        }
    }

    /// Position of this field in [`CanonicalField::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Text,
    Integer,
    Float,
}

/// One `(source, canonical, kind)` triple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub source: String,
    pub canonical: CanonicalField,
    pub kind: ColumnKind,
}

impl ColumnMapping {
    fn new(source: &str, canonical: CanonicalField) -> Self {
        Self {
            source: source.to_string(),
            canonical,
            kind: canonical.kind(),
        }
    }
}

/// Ordered mapping from input header names to canonical fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaMapping {
    columns: Vec<ColumnMapping>,
}

impl Default for SchemaMapping {
    fn default() -> Self {
        Self {
            columns: vec![
                ColumnMapping::new("village_name", CanonicalField::Village),
                ColumnMapping::new("district", CanonicalField::District),
                ColumnMapping::new("state", CanonicalField::State),
                ColumnMapping::new("total_households", CanonicalField::TotalHouseholds),
                ColumnMapping::new("households_with_clean_water", CanonicalField::CleanWaterHH),
                ColumnMapping::new("latitude", CanonicalField::Lat),
                ColumnMapping::new("longitude", CanonicalField::Lon),
            ],
        }
    }
}

impl SchemaMapping {
    pub fn new(columns: Vec<ColumnMapping>) -> Result<Self> {
        let mapping = Self { columns };
        mapping.validate()?;
        Ok(mapping)
    }

    pub fn columns(&self) -> &[ColumnMapping] {
        &self.columns
    }

    /// Returns the mapping entry for `field`, if one is configured.
    pub fn get(&self, field: CanonicalField) -> Option<&ColumnMapping> {
        self.columns.iter().find(|c| c.canonical == field)
    }

    /// Checks that every canonical field is mapped exactly once with the
    /// kind it carries.
    pub fn validate(&self) -> Result<()> {
        for field in CanonicalField::ALL {
            let matches: Vec<_> = self
                .columns
                .iter()
                .filter(|c| c.canonical == field)
                .collect();

            match matches.as_slice() {
                [] => bail!("schema mapping has no column for {field}"),
                [column] if column.kind != field.kind() => bail!(
                    "schema mapping declares {field} as {:?}, expected {:?}",
                    column.kind,
                    field.kind()
                ),
                [column] if column.source.trim().is_empty() => {
                    bail!("schema mapping has an empty source name for {field}")
                }
                [_] => {}
                _ => bail!("schema mapping maps {field} more than once"),
            }
        }
        Ok(())
    }
}

/// Center, zoom and basemap of the generated web map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapView {
    /// `[latitude, longitude]`, the order Leaflet's `setView` takes.
    pub center: [f64; 2],
    pub zoom: u8,
    pub max_zoom: u8,
    pub tile_url: String,
    pub title: String,
}

impl Default for MapView {
    fn default() -> Self {
        Self {
            center: [23.5, 80.0],
            zoom: 6,
            max_zoom: 18,
            tile_url: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            title: "Mapping Access to Clean Water (SDG 6)".to_string(),
        }
    }
}

impl MapView {
    /// Rejects tile URLs that cannot be embedded in a quoted JS string.
    pub fn validate(&self) -> Result<()> {
        if self.tile_url.trim().is_empty() {
            bail!("map tile_url is empty");
        }
        if let Some(ch) = self
            .tile_url
            .chars()
            .find(|c| matches!(*c, '\'' | '"' | '\\' | '<' | '>' | '`') || c.is_control())
        {
            bail!("map tile_url contains unsupported character {ch:?}");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub columns: SchemaMapping,
    pub map: MapView,
}

impl PipelineConfig {
    /// Loads the config from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: PipelineConfig = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        config
            .columns
            .validate()
            .with_context(|| format!("invalid schema mapping in {}", path.display()))?;
        config
            .map
            .validate()
            .with_context(|| format!("invalid map view in {}", path.display()))?;
        Ok(config)
    }
}
