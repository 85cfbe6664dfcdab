use tracing::{debug, warn};

use crate::config::CanonicalField;
use crate::loader::SourceRow;
use crate::metrics::access::AccessLevel;
use crate::metrics::types::Record;
use crate::metrics::utility::pct;

/// Records built from a table, plus the data-quality counts gathered on the way.
#[derive(Debug, Default)]
pub struct TransformOutcome {
    pub records: Vec<Record>,
    /// Numeric fields that were empty or failed to parse.
    pub coercion_failures: usize,
    /// Records where `CleanWaterHH > TotalHouseholds`.
    pub inconsistent_records: usize,
}

/// Coerces text to a 32-bit household count, widened to `i64`.
///
/// Decimal literals truncate toward zero. Values outside the `i32` range,
/// anything else that does not parse, and empty text are `None`, so
/// district sums cannot overflow.
pub fn coerce_int(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if let Ok(v) = raw.parse::<i64>() {
        return i32::try_from(v).ok().map(i64::from);
    }
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => {
            let v = v.trunc();
            (v >= f64::from(i32::MIN) && v <= f64::from(i32::MAX)).then_some(v as i64)
        }
        _ => None,
    }
}

/// Coerces text to a finite float; `None` otherwise.
pub fn coerce_float(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Percentage of households with clean water. An absent clean count
/// counts as zero; an absent or non-positive total yields 0.
pub fn percent_access(total_households: Option<i64>, clean_water_hh: Option<i64>) -> f64 {
    match total_households {
        Some(total) if total > 0 => pct(clean_water_hh.unwrap_or(0), total),
        _ => 0.0,
    }
}

/// Builds a [`Record`] from one row, returning the numeric fields that
/// failed coercion alongside it.
pub fn transform_row(row: &SourceRow) -> (Record, Vec<CanonicalField>) {
    let mut failed = Vec::new();

    let mut int_field = |field: CanonicalField| {
        let value = coerce_int(row.get(field));
        if value.is_none() {
            failed.push(field);
        }
        value
    };
    let total_households = int_field(CanonicalField::TotalHouseholds);
    let clean_water_hh = int_field(CanonicalField::CleanWaterHH);

    let mut float_field = |field: CanonicalField| {
        let value = coerce_float(row.get(field));
        if value.is_none() {
            failed.push(field);
        }
        value
    };
    let lat = float_field(CanonicalField::Lat);
    let lon = float_field(CanonicalField::Lon);

    let percent_access = percent_access(total_households, clean_water_hh);

    let record = Record {
        village: row.get(CanonicalField::Village).to_string(),
        district: row.get(CanonicalField::District).to_string(),
        state: row.get(CanonicalField::State).to_string(),
        total_households,
        clean_water_hh,
        lat,
        lon,
        percent_access,
        access_level: AccessLevel::classify(percent_access),
    };

    (record, failed)
}

/// Transforms every row. Rows are never rejected; coercion failures and
/// inconsistent counts are logged and tallied instead.
#[tracing::instrument(skip(rows), fields(rows = rows.len()))]
pub fn transform_rows(rows: &[SourceRow]) -> TransformOutcome {
    let mut outcome = TransformOutcome {
        records: Vec::with_capacity(rows.len()),
        ..Default::default()
    };

    for row in rows {
        let (record, failed) = transform_row(row);

        for field in &failed {
            warn!(
                row = row.row,
                column = %field,
                value = row.get(*field),
                "Value could not be coerced, treating as absent"
            );
        }
        outcome.coercion_failures += failed.len();

        if let (Some(total), Some(clean)) = (record.total_households, record.clean_water_hh) {
            if clean > total {
                warn!(
                    row = row.row,
                    village = %record.village,
                    total,
                    clean,
                    "Clean-water households exceed total households"
                );
                outcome.inconsistent_records += 1;
            }
        }

        outcome.records.push(record);
    }

    debug!(
        records = outcome.records.len(),
        coercion_failures = outcome.coercion_failures,
        inconsistent_records = outcome.inconsistent_records,
        "Rows transformed"
    );
    outcome
}
