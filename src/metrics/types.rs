//! Data types used by the metrics pipeline.

use serde::Serialize;

use crate::metrics::access::AccessLevel;

/// A single village after renaming, coercion and derivation.
///
/// Numeric fields are `None` when the input value could not be coerced.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub village: String,
    pub district: String,
    pub state: String,
    pub total_households: Option<i64>,
    pub clean_water_hh: Option<i64>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    /// Unrounded; rounding happens on export.
    pub percent_access: f64,
    pub access_level: AccessLevel,
}

/// Household totals for one (State, District) pair, serialized as a
/// row of the district summary CSV.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistrictSummary {
    #[serde(rename = "State")]
    pub state: String,
    #[serde(rename = "District")]
    pub district: String,
    #[serde(rename = "TotalHouseholds")]
    pub total_households: i64,
    #[serde(rename = "CleanWaterHH")]
    pub clean_water_hh: i64,
    /// Recomputed from the summed totals, rounded to 2 decimals.
    #[serde(rename = "PercentAccess")]
    pub percent_access: f64,
}
