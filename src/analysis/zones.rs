//! Tariff zone alarm and per-month billing.

use serde::{Deserialize, Serialize};
use strum::Display;

use super::AnalysisError;
use crate::domain::{AllocationResult, MonthlyRecord, TariffSchedule};

#[cfg_attr(feature = "swagger", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AdvisoryLevel {
    /// Projection stays in the cheapest tier.
    Ok,
    Warning,
    /// Projection reaches the most expensive tier.
    Alarm,
}

#[cfg_attr(feature = "swagger", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneAdvisory {
    pub projected_kwh: f64,
    pub zone: String,
    pub tier_index: usize,
    pub level: AdvisoryLevel,
}

#[cfg_attr(feature = "swagger", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyBill {
    pub month: String,
    pub consumed_kwh: f64,
    pub allocation: AllocationResult,
}

#[cfg_attr(feature = "swagger", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Billing {
    pub months: Vec<MonthlyBill>,
    /// Per-tier quantities and cost summed over all months.
    pub total: AllocationResult,
}

/// Average daily use scaled to a billing month.
pub fn project_month(average_kwh_per_day: f64, days_per_month: u32) -> f64 {
    average_kwh_per_day * days_per_month as f64
}

pub fn zone_advisory(
    projected_kwh: f64,
    schedule: &TariffSchedule,
) -> Result<ZoneAdvisory, AnalysisError> {
    let (tier_index, tier) = schedule.zone_for(projected_kwh)?;
    let last = schedule.tiers().len() - 1;

    let level = if tier_index == 0 {
        AdvisoryLevel::Ok
    } else if tier_index == last {
        AdvisoryLevel::Alarm
    } else {
        AdvisoryLevel::Warning
    };

    Ok(ZoneAdvisory {
        projected_kwh,
        zone: tier.name.clone(),
        tier_index,
        level,
    })
}

/// Price each month's consumption independently against the schedule.
pub fn bill_months(
    records: &[MonthlyRecord],
    schedule: &TariffSchedule,
) -> Result<Billing, AnalysisError> {
    if records.is_empty() {
        return Err(AnalysisError::NoRecords);
    }

    let quantities: Vec<f64> = records.iter().map(|r| r.consumed_kwh).collect();
    let batch = schedule.allocate_batch(&quantities)?;

    let months = records
        .iter()
        .zip(batch.items)
        .map(|(record, allocation)| MonthlyBill {
            month: record.month.clone(),
            consumed_kwh: record.consumed_kwh,
            allocation,
        })
        .collect();

    Ok(Billing {
        months,
        total: batch.aggregate,
    })
}
