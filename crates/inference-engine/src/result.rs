//! Prediction Result and Severity Banding

use serde::{Deserialize, Serialize};
use std::fmt;

/// Qualitative urgency derived from the estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeverityBand {
    /// Under two hours
    Quick,
    /// Two to six hours inclusive
    Standard,
    /// Over six hours
    HighComplexity,
}

impl SeverityBand {
    /// Estimates strictly below this are quick
    pub const QUICK_BELOW_HOURS: f64 = 2.0;
    /// Estimates strictly above this are high complexity
    pub const HIGH_ABOVE_HOURS: f64 = 6.0;

    pub fn from_estimate(hours: f64) -> Self {
        if hours > Self::HIGH_ABOVE_HOURS {
            SeverityBand::HighComplexity
        } else if hours < Self::QUICK_BELOW_HOURS {
            SeverityBand::Quick
        } else {
            SeverityBand::Standard
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SeverityBand::Quick => "QUICK",
            SeverityBand::Standard => "STANDARD",
            SeverityBand::HighComplexity => "HIGH_COMPLEXITY",
        }
    }

    /// Advisory shown next to the estimate
    pub fn advisory(&self) -> &'static str {
        match self {
            SeverityBand::Quick => "Quick fix expected. This incident should be resolved shortly.",
            SeverityBand::Standard => {
                "Standard resolution time. Follow the normal handling process."
            }
            SeverityBand::HighComplexity => {
                "High complexity incident. Consider escalating or allocating additional resources."
            }
        }
    }
}

/// Estimated time to resolution
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResult {
    /// Model estimate in hours, never negative
    pub estimate_hours: f64,
    pub hours_part: u64,
    /// Always in `0..=59`
    pub minutes_part: u8,
    pub severity_band: SeverityBand,
}

impl PredictionResult {
    /// Derive the time breakdown and band from a finite estimate.
    /// Negative estimates are clamped to zero.
    pub fn from_estimate(estimate: f64) -> Self {
        let estimate = estimate.max(0.0);
        let whole_hours = estimate.floor();
        let mut hours_part = whole_hours as u64;
        let mut minutes = ((estimate - whole_hours) * 60.0).round() as u64;
        if minutes >= 60 {
            hours_part += 1;
            minutes = 0;
        }

        Self {
            estimate_hours: estimate,
            hours_part,
            minutes_part: minutes as u8,
            severity_band: SeverityBand::from_estimate(estimate),
        }
    }

    /// `"{hours}h {minutes}m"`
    pub fn display_time(&self) -> String {
        format!("{}h {}m", self.hours_part, self.minutes_part)
    }

    pub fn advisory(&self) -> &'static str {
        self.severity_band.advisory()
    }
}

impl fmt::Display for PredictionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}h {}m", self.hours_part, self.minutes_part)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_boundaries() {
        assert_eq!(SeverityBand::from_estimate(1.5), SeverityBand::Quick);
        assert_eq!(SeverityBand::from_estimate(1.999), SeverityBand::Quick);
        assert_eq!(SeverityBand::from_estimate(2.0), SeverityBand::Standard);
        assert_eq!(SeverityBand::from_estimate(6.0), SeverityBand::Standard);
        assert_eq!(SeverityBand::from_estimate(6.01), SeverityBand::HighComplexity);
    }

    #[test]
    fn test_quarter_hour() {
        let result = PredictionResult::from_estimate(7.25);
        assert_eq!(result.hours_part, 7);
        assert_eq!(result.minutes_part, 15);
        assert_eq!(result.display_time(), "7h 15m");
        assert_eq!(result.severity_band, SeverityBand::HighComplexity);
    }

    #[test]
    fn test_zero_estimate() {
        let result = PredictionResult::from_estimate(0.0);
        assert_eq!(result.to_string(), "0h 0m");
        assert_eq!(result.severity_band, SeverityBand::Quick);
    }

    #[test]
    fn test_minute_rounding_overflow() {
        let result = PredictionResult::from_estimate(2.999999);
        assert_eq!(result.hours_part, 3);
        assert_eq!(result.minutes_part, 0);
        assert_eq!(result.display_time(), "3h 0m");
    }

    #[test]
    fn test_negative_estimate_clamped() {
        let result = PredictionResult::from_estimate(-0.75);
        assert_eq!(result.estimate_hours, 0.0);
        assert_eq!(result.display_time(), "0h 0m");
        assert_eq!(result.severity_band, SeverityBand::Quick);
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(PredictionResult::from_estimate(4.5)).unwrap();
        assert_eq!(json["hoursPart"], 4);
        assert_eq!(json["minutesPart"], 30);
        assert_eq!(json["severityBand"], "STANDARD");
    }

    #[test]
    fn test_advisories_are_distinct() {
        let quick = SeverityBand::Quick.advisory();
        let standard = SeverityBand::Standard.advisory();
        let high = SeverityBand::HighComplexity.advisory();
        assert_ne!(quick, standard);
        assert_ne!(standard, high);
        assert_ne!(quick, high);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn parts_stay_in_range(estimate in 0.0f64..10_000.0) {
            let result = PredictionResult::from_estimate(estimate);
            prop_assert!(result.minutes_part <= 59);
            prop_assert!(result.hours_part as f64 <= estimate.ceil());
        }

        #[test]
        fn parts_reconstruct_within_a_minute(estimate in 0.0f64..1_000.0) {
            let result = PredictionResult::from_estimate(estimate);
            let rebuilt = result.hours_part as f64 + result.minutes_part as f64 / 60.0;
            prop_assert!((rebuilt - estimate).abs() <= 1.0 / 60.0);
        }

        #[test]
        fn band_depends_only_on_estimate(estimate in 0.0f64..48.0) {
            let band = PredictionResult::from_estimate(estimate).severity_band;
            prop_assert_eq!(band, SeverityBand::from_estimate(estimate));
            let expected = if estimate > 6.0 {
                SeverityBand::HighComplexity
            } else if estimate < 2.0 {
                SeverityBand::Quick
            } else {
                SeverityBand::Standard
            };
            prop_assert_eq!(band, expected);
        }
    }
}
