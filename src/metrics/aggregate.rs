use std::collections::BTreeMap;

use crate::metrics::types::{DistrictSummary, Record};
use crate::metrics::utility::{pct, round2};

#[derive(Default)]
struct DistrictTotals {
    total_households: i64,
    clean_water_hh: i64,
}

/// Groups records by (State, District) and sums their household counts.
///
/// Absent counts contribute zero. Each district's percentage is the rate
/// of the summed totals, not the mean of village percentages, rounded to
/// 2 decimals. Rows come out sorted by (State, District).
#[tracing::instrument(skip(records), fields(records = records.len()))]
pub fn summarize_districts(records: &[Record]) -> Vec<DistrictSummary> {
    let mut groups: BTreeMap<(&str, &str), DistrictTotals> = BTreeMap::new();

    for record in records {
        let totals = groups
            .entry((record.state.as_str(), record.district.as_str()))
            .or_default();
        totals.total_households += record.total_households.unwrap_or(0);
        totals.clean_water_hh += record.clean_water_hh.unwrap_or(0);
    }

    groups
        .into_iter()
        .map(|((state, district), totals)| DistrictSummary {
            state: state.to_string(),
            district: district.to_string(),
            total_households: totals.total_households,
            clean_water_hh: totals.clean_water_hh,
            percent_access: round2(pct(totals.clean_water_hh, totals.total_households)),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::access::AccessLevel;
    use crate::metrics::transform::percent_access;

    fn record(state: &str, district: &str, total: Option<i64>, clean: Option<i64>) -> Record {
        let percent = percent_access(total, clean);
        Record {
            village: format!("{district}-{}", total.unwrap_or(-1)),
            district: district.to_string(),
            state: state.to_string(),
            total_households: total,
            clean_water_hh: clean,
            lat: Some(0.0),
            lon: Some(0.0),
            percent_access: percent,
            access_level: AccessLevel::classify(percent),
        }
    }

    #[test]
    fn test_two_villages_one_district() {
        let records = vec![
            record("S1", "D1", Some(100), Some(80)),
            record("S1", "D1", Some(50), Some(10)),
        ];

        let summary = summarize_districts(&records);

        assert_eq!(summary.len(), 1);
        assert_eq!(summary[0].total_households, 150);
        assert_eq!(summary[0].clean_water_hh, 90);
        assert_eq!(summary[0].percent_access, 60.0);
    }

    #[test]
    fn test_rate_of_sums_is_not_mean_of_rates() {
        let records = vec![
            record("S1", "D1", Some(100), Some(80)),
            record("S1", "D1", Some(50), Some(10)),
        ];
        let mean_of_rates =
            records.iter().map(|r| r.percent_access).sum::<f64>() / records.len() as f64;

        let summary = summarize_districts(&records);

        assert_eq!(mean_of_rates, 50.0);
        assert_ne!(summary[0].percent_access, mean_of_rates);
    }

    #[test]
    fn test_sums_are_exact_per_district() {
        let records = vec![
            record("S1", "D1", Some(10), Some(3)),
            record("S1", "D2", Some(20), Some(20)),
            record("S2", "D1", Some(7), Some(1)),
            record("S1", "D1", Some(5), Some(4)),
        ];

        let summary = summarize_districts(&records);

        assert_eq!(summary.len(), 3);
        for row in &summary {
            let members = records
                .iter()
                .filter(|r| r.state == row.state && r.district == row.district);
            let (total, clean) = members.fold((0, 0), |(t, c), r| {
                (t + r.total_households.unwrap(), c + r.clean_water_hh.unwrap())
            });
            assert_eq!(row.total_households, total);
            assert_eq!(row.clean_water_hh, clean);
        }
    }

    #[test]
    fn test_same_district_name_in_different_states_is_separate() {
        let records = vec![
            record("S1", "Central", Some(10), Some(10)),
            record("S2", "Central", Some(10), Some(0)),
        ];

        let summary = summarize_districts(&records);

        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].state, "S1");
        assert_eq!(summary[0].percent_access, 100.0);
        assert_eq!(summary[1].state, "S2");
        assert_eq!(summary[1].percent_access, 0.0);
    }

    #[test]
    fn test_zero_and_absent_totals() {
        let records = vec![
            record("S1", "Empty", Some(0), Some(0)),
            record("S1", "Empty", None, Some(5)),
            record("S1", "Partial", Some(40), None),
            record("S1", "Partial", Some(10), Some(10)),
        ];

        let summary = summarize_districts(&records);

        let empty = summary.iter().find(|s| s.district == "Empty").unwrap();
        assert_eq!(empty.total_households, 0);
        assert_eq!(empty.clean_water_hh, 5);
        assert_eq!(empty.percent_access, 0.0);

        let partial = summary.iter().find(|s| s.district == "Partial").unwrap();
        assert_eq!(partial.total_households, 50);
        assert_eq!(partial.clean_water_hh, 10);
        assert_eq!(partial.percent_access, 20.0);
    }

    #[test]
    fn test_percent_is_rounded_to_two_decimals() {
        let records = vec![record("S1", "D1", Some(3), Some(2))];
        assert_eq!(summarize_districts(&records)[0].percent_access, 66.67);

        // exact half: 100 * 1 / 800 = 0.125
        let records = vec![record("S1", "D1", Some(800), Some(1))];
        assert_eq!(summarize_districts(&records)[0].percent_access, 0.13);
    }

    #[test]
    fn test_max_counts_sum_without_overflow() {
        let max = Some(i64::from(i32::MAX));
        let records = vec![
            record("S1", "D1", max, max),
            record("S1", "D1", max, Some(0)),
            record("S1", "D1", max, Some(0)),
        ];

        let summary = summarize_districts(&records);

        assert_eq!(summary[0].total_households, 3 * i64::from(i32::MAX));
        assert_eq!(summary[0].clean_water_hh, i64::from(i32::MAX));
        assert_eq!(summary[0].percent_access, 33.33);
    }

    #[test]
    fn test_empty_input() {
        assert!(summarize_districts(&[]).is_empty());
    }
}
