use serde::{Deserialize, Serialize};

use super::AnalysisError;

/// Electricity use extrapolated over a whole heating season.
#[cfg_attr(feature = "swagger", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonProjection {
    pub average_kwh_per_day: f64,
    pub season_days: u32,
    pub projected_kwh: f64,
}

/// Estimated effect of lowering the leaving water temperature.
#[cfg_attr(feature = "swagger", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LwtSavings {
    pub reduction_c: u32,
    pub savings_fraction: f64,
    pub savings_kwh: f64,
    pub projected_kwh_after: f64,
}

pub fn project_season(
    average_kwh_per_day: f64,
    season_days: u32,
) -> Result<SeasonProjection, AnalysisError> {
    if season_days == 0 {
        return Err(AnalysisError::invalid("season_days", "must be at least 1"));
    }
    if !average_kwh_per_day.is_finite() || average_kwh_per_day < 0.0 {
        return Err(AnalysisError::invalid(
            "average_kwh_per_day",
            format!("must be a non-negative number, got {}", average_kwh_per_day),
        ));
    }

    Ok(SeasonProjection {
        average_kwh_per_day,
        season_days,
        projected_kwh: average_kwh_per_day * season_days as f64,
    })
}

/// Savings from running `reduction_c` degrees cooler, at `per_degree` of the
/// projected consumption per degree.
pub fn lwt_reduction_savings(
    projected_kwh: f64,
    reduction_c: u32,
    per_degree: f64,
    max_reduction_c: u32,
) -> Result<LwtSavings, AnalysisError> {
    if reduction_c > max_reduction_c {
        return Err(AnalysisError::invalid(
            "reduction_c",
            format!("must be between 0 and {}, got {}", max_reduction_c, reduction_c),
        ));
    }

    let savings_fraction = (reduction_c as f64 * per_degree).min(1.0);
    let savings_kwh = projected_kwh * savings_fraction;

    Ok(LwtSavings {
        reduction_c,
        savings_fraction,
        savings_kwh,
        projected_kwh_after: projected_kwh - savings_kwh,
    })
}
