use serde::{Deserialize, Serialize};

use super::AnalysisError;
use crate::domain::MonthlyRecord;

/// Ratios derived from one monthly record.
#[cfg_attr(feature = "swagger", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyMetrics {
    pub month: String,
    pub cop: Option<f64>,
    pub kwh_per_day: f64,
    pub starts_per_day: f64,
    pub hours_per_start: Option<f64>,
}

/// Totals and averages across all supplied months.
#[cfg_attr(feature = "swagger", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub months: usize,
    pub total_consumed_kwh: f64,
    pub total_produced_kwh: f64,
    /// Arithmetic mean of the monthly kWh/day values.
    pub average_kwh_per_day: f64,
    /// Total produced over total consumed.
    pub seasonal_cop: Option<f64>,
    pub average_starts_per_day: f64,
}

pub fn monthly_metrics(record: &MonthlyRecord) -> MonthlyMetrics {
    MonthlyMetrics {
        month: record.month.clone(),
        cop: record.cop(),
        kwh_per_day: record.kwh_per_day(),
        starts_per_day: record.starts_per_day(),
        hours_per_start: record.hours_per_start(),
    }
}

pub fn summarize(records: &[MonthlyRecord]) -> Result<Summary, AnalysisError> {
    if records.is_empty() {
        return Err(AnalysisError::NoRecords);
    }

    let n = records.len() as f64;
    let total_consumed_kwh: f64 = records.iter().map(|r| r.consumed_kwh).sum();
    let total_produced_kwh: f64 = records.iter().map(|r| r.produced_kwh).sum();
    let average_kwh_per_day = records.iter().map(|r| r.kwh_per_day()).sum::<f64>() / n;
    let average_starts_per_day = records.iter().map(|r| r.starts_per_day()).sum::<f64>() / n;

    let seasonal_cop = if total_consumed_kwh > 0.0 {
        Some(total_produced_kwh / total_consumed_kwh)
    } else {
        None
    };

    Ok(Summary {
        months: records.len(),
        total_consumed_kwh,
        total_produced_kwh,
        average_kwh_per_day,
        seasonal_cop,
        average_starts_per_day,
    })
}
