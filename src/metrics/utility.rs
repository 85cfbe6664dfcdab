/// Share of `part` in `total` as a percentage. Returns 0.0 when `total` is not positive.
pub fn pct(part: i64, total: i64) -> f64 {
    if total <= 0 {
        0.0
    } else {
        (part as f64 * 100.0) / total as f64
    }
}

/// Rounds to 2 decimal places, half away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
