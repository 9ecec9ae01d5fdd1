//! Derived metrics, projections and advisories computed from monthly records.

pub mod comfort;
pub mod forecast;
pub mod fuel;
pub mod heating_curve;
pub mod metrics;
pub mod report;
pub mod season;
pub mod zones;

pub use comfort::*;
pub use forecast::*;
pub use fuel::*;
pub use heating_curve::*;
pub use metrics::*;
pub use report::*;
pub use season::*;
pub use zones::*;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::TariffError;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error("no monthly records supplied")]
    NoRecords,

    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error(transparent)]
    Tariff(#[from] TariffError),
}

impl AnalysisError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

/// Tunables for the analysis functions. Defaults follow the reference dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    /// Length of the heating season used for the seasonal projection.
    pub season_days: u32,
    /// Fraction of energy saved per degree of LWT reduction.
    pub savings_per_degree: f64,
    pub max_lwt_reduction_c: u32,
    pub default_lwt_reduction_c: u32,
    /// Comfort index below which the compressor is considered short cycling.
    pub comfort_threshold: u8,
    /// Deviation from the curve still considered "on curve".
    pub curve_tolerance_c: f64,
    pub reference_curve: HeatingCurve,
    pub recommended_curve: HeatingCurve,
    pub min_lwt_c: f64,
    pub max_lwt_c: f64,
    /// Days used to turn average daily use into a monthly projection.
    pub days_per_billing_month: u32,
    pub curve_sample_points: usize,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            season_days: 180,
            savings_per_degree: 0.03,
            max_lwt_reduction_c: 5,
            default_lwt_reduction_c: 1,
            comfort_threshold: 60,
            curve_tolerance_c: 2.0,
            reference_curve: HeatingCurve::REFERENCE,
            recommended_curve: HeatingCurve::RECOMMENDED,
            min_lwt_c: 25.0,
            max_lwt_c: 45.0,
            days_per_billing_month: 30,
            curve_sample_points: 10,
        }
    }
}

impl AnalysisSettings {
    /// Reject settings that would make every analysis request fail.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.season_days == 0 {
            return Err(AnalysisError::invalid("season_days", "must be at least 1"));
        }
        if self.days_per_billing_month == 0 {
            return Err(AnalysisError::invalid(
                "days_per_billing_month",
                "must be at least 1",
            ));
        }
        if !self.savings_per_degree.is_finite() || self.savings_per_degree < 0.0 {
            return Err(AnalysisError::invalid(
                "savings_per_degree",
                format!("must be non-negative, got {}", self.savings_per_degree),
            ));
        }
        if self.default_lwt_reduction_c > self.max_lwt_reduction_c {
            return Err(AnalysisError::invalid(
                "default_lwt_reduction_c",
                format!(
                    "{} exceeds max_lwt_reduction_c {}",
                    self.default_lwt_reduction_c, self.max_lwt_reduction_c
                ),
            ));
        }
        if self.comfort_threshold > 100 {
            return Err(AnalysisError::invalid(
                "comfort_threshold",
                format!("must be at most 100, got {}", self.comfort_threshold),
            ));
        }
        if !self.curve_tolerance_c.is_finite() || self.curve_tolerance_c < 0.0 {
            return Err(AnalysisError::invalid(
                "curve_tolerance_c",
                format!("must be non-negative, got {}", self.curve_tolerance_c),
            ));
        }
        for (name, curve) in [
            ("reference_curve", &self.reference_curve),
            ("recommended_curve", &self.recommended_curve),
        ] {
            if !curve.intercept_c.is_finite() || !curve.slope.is_finite() {
                return Err(AnalysisError::invalid(name, "coefficients must be finite"));
            }
        }
        if !self.min_lwt_c.is_finite() || !self.max_lwt_c.is_finite() {
            return Err(AnalysisError::invalid("lwt_band", "bounds must be finite"));
        }
        if self.min_lwt_c > self.max_lwt_c {
            return Err(AnalysisError::invalid(
                "lwt_band",
                format!("min {} exceeds max {}", self.min_lwt_c, self.max_lwt_c),
            ));
        }
        if self.curve_sample_points < 2 {
            return Err(AnalysisError::invalid(
                "curve_sample_points",
                format!("at least 2 required, got {}", self.curve_sample_points),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_default_settings_are_valid() {
        assert!(AnalysisSettings::default().validate().is_ok());
    }

    #[rstest]
    #[case::zero_season(AnalysisSettings { season_days: 0, ..Default::default() }, "season_days")]
    #[case::zero_billing_month(
        AnalysisSettings { days_per_billing_month: 0, ..Default::default() },
        "days_per_billing_month"
    )]
    #[case::negative_savings(
        AnalysisSettings { savings_per_degree: -0.1, ..Default::default() },
        "savings_per_degree"
    )]
    #[case::default_above_max(
        AnalysisSettings { default_lwt_reduction_c: 6, ..Default::default() },
        "default_lwt_reduction_c"
    )]
    #[case::threshold_over_100(
        AnalysisSettings { comfort_threshold: 101, ..Default::default() },
        "comfort_threshold"
    )]
    #[case::negative_tolerance(
        AnalysisSettings { curve_tolerance_c: -1.0, ..Default::default() },
        "curve_tolerance_c"
    )]
    #[case::nan_curve(
        AnalysisSettings {
            recommended_curve: HeatingCurve { intercept_c: f64::NAN, slope: -0.5 },
            ..Default::default()
        },
        "recommended_curve"
    )]
    #[case::inverted_band(AnalysisSettings { min_lwt_c: 50.0, ..Default::default() }, "lwt_band")]
    #[case::one_sample_point(
        AnalysisSettings { curve_sample_points: 1, ..Default::default() },
        "curve_sample_points"
    )]
    fn test_invalid_settings(#[case] settings: AnalysisSettings, #[case] field: &str) {
        match settings.validate() {
            Err(AnalysisError::InvalidParameter { name, .. }) => assert_eq!(name, field),
            other => panic!("expected invalid {}, got {:?}", field, other),
        }
    }
}
