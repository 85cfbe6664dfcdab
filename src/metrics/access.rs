use serde::{Deserialize, Serialize};
use std::fmt;

/// Access tier derived from a village's clean-water percentage.
///
/// | Range     | Level  | Marker color |
/// |-----------|--------|--------------|
/// | >= 75     | High   | green        |
/// | >= 40     | Medium | orange       |
/// | < 40      | Low    | red          |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccessLevel {
    High,
    Medium,
    Low,
}

impl AccessLevel {
    /// All levels, highest tier first. The last entry is the map fallback.
    pub const ALL: [AccessLevel; 3] = [AccessLevel::High, AccessLevel::Medium, AccessLevel::Low];

    /// Classifies a percentage. Lower bounds are inclusive.
    pub fn classify(percent: f64) -> Self {
        match percent {
            p if p >= 75.0 => AccessLevel::High,
            p if p >= 40.0 => AccessLevel::Medium,
            _ => AccessLevel::Low,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AccessLevel::High => "High",
            AccessLevel::Medium => "Medium",
            AccessLevel::Low => "Low",
        }
    }

    /// Marker fill color used by the web map.
    pub fn color(self) -> &'static str {
        match self {
            AccessLevel::High => "green",
            AccessLevel::Medium => "orange",
            AccessLevel::Low => "red",
        }
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_boundaries() {
        assert_eq!(AccessLevel::classify(100.0), AccessLevel::High);
        assert_eq!(AccessLevel::classify(75.0), AccessLevel::High);
        assert_eq!(AccessLevel::classify(74.99), AccessLevel::Medium);
        assert_eq!(AccessLevel::classify(40.0), AccessLevel::Medium);
        assert_eq!(AccessLevel::classify(39.99), AccessLevel::Low);
        assert_eq!(AccessLevel::classify(0.0), AccessLevel::Low);
    }

    #[test]
    fn test_classify_out_of_range() {
        assert_eq!(AccessLevel::classify(140.0), AccessLevel::High);
        assert_eq!(AccessLevel::classify(-5.0), AccessLevel::Low);
        assert_eq!(AccessLevel::classify(f64::NAN), AccessLevel::Low);
    }

    #[test]
    fn test_serializes_as_name() {
        assert_eq!(
            serde_json::to_string(&AccessLevel::Medium).unwrap(),
            "\"Medium\""
        );
        assert_eq!(AccessLevel::High.to_string(), "High");
    }

    #[test]
    fn test_colors() {
        assert_eq!(AccessLevel::High.color(), "green");
        assert_eq!(AccessLevel::Medium.color(), "orange");
        assert_eq!(AccessLevel::Low.color(), "red");
    }
}
