use serde::{Deserialize, Serialize};

use super::{
    assess_comfort, bill_months, compare_fuels, diagnose, lwt_reduction_savings,
    monthly_metrics, project_month, project_season, summarize, zone_advisory, AnalysisError,
    AnalysisSettings, Billing, ComfortAssessment, CurveDiagnostics, FuelCost, FuelOption,
    LwtSavings, MonthlyMetrics, SeasonProjection, Summary, ZoneAdvisory,
};
use crate::domain::{MonthlyRecord, TariffSchedule};

/// Per-request overrides of the configured settings.
#[cfg_attr(feature = "swagger", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportOptions {
    pub season_days: Option<u32>,
    pub lwt_reduction_c: Option<u32>,
}

/// Everything the dashboard shows for one table of monthly records.
#[cfg_attr(feature = "swagger", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub summary: Summary,
    pub months: Vec<MonthlyMetrics>,
    pub reference_curve: CurveDiagnostics,
    pub recommended_curve: CurveDiagnostics,
    pub season: SeasonProjection,
    pub savings: LwtSavings,
    pub comfort: ComfortAssessment,
    pub zone: ZoneAdvisory,
    pub billing: Billing,
    /// Cost of delivering the same heat (total produced) with other fuels.
    pub fuels: Vec<FuelCost>,
}

pub fn build_report(
    records: &[MonthlyRecord],
    schedule: &TariffSchedule,
    settings: &AnalysisSettings,
    fuels: &[FuelOption],
    options: &ReportOptions,
) -> Result<AnalysisReport, AnalysisError> {
    let summary = summarize(records)?;
    let months = records.iter().map(monthly_metrics).collect();

    let reference_curve = diagnose(
        records,
        &settings.reference_curve,
        settings.curve_tolerance_c,
        settings.curve_sample_points,
    )?;
    let recommended_curve = diagnose(
        records,
        &settings.recommended_curve,
        settings.curve_tolerance_c,
        settings.curve_sample_points,
    )?;

    let season = project_season(
        summary.average_kwh_per_day,
        options.season_days.unwrap_or(settings.season_days),
    )?;
    let savings = lwt_reduction_savings(
        season.projected_kwh,
        options
            .lwt_reduction_c
            .unwrap_or(settings.default_lwt_reduction_c),
        settings.savings_per_degree,
        settings.max_lwt_reduction_c,
    )?;

    let comfort = assess_comfort(summary.average_starts_per_day, settings.comfort_threshold);

    let monthly_projection =
        project_month(summary.average_kwh_per_day, settings.days_per_billing_month);
    let zone = zone_advisory(monthly_projection, schedule)?;
    let billing = bill_months(records, schedule)?;

    let fuels = compare_fuels(summary.total_produced_kwh, billing.total.total_cost, fuels)?;

    Ok(AnalysisReport {
        summary,
        months,
        reference_curve,
        recommended_curve,
        season,
        savings,
        comfort,
        zone,
        billing,
        fuels,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{AdvisoryLevel, ComfortStatus};
    use crate::domain::record::fixtures::winter_records;

    #[test]
    fn test_report_for_winter_months() {
        let report = build_report(
            &winter_records(),
            &TariffSchedule::default_three_zone(),
            &AnalysisSettings::default(),
            &[],
            &ReportOptions::default(),
        )
        .unwrap();

        assert_eq!(report.months.len(), 2);
        assert_eq!(report.season.season_days, 180);
        assert!((report.season.projected_kwh - 29.040 * 180.0).abs() < 0.1);
        assert_eq!(report.savings.reduction_c, 1);
        assert_eq!(report.comfort.index, 19);
        assert_eq!(report.comfort.status, ComfortStatus::ShortCycling);
        assert_eq!(report.zone.zone, "blue");
        assert_eq!(report.zone.level, AdvisoryLevel::Warning);
        assert!((report.billing.total.total_cost - 13709.5).abs() < 1e-9);
        assert!(report.fuels.is_empty());
    }

    #[test]
    fn test_report_options_override_settings() {
        let options = ReportOptions {
            season_days: Some(200),
            lwt_reduction_c: Some(3),
        };
        let report = build_report(
            &winter_records(),
            &TariffSchedule::default_three_zone(),
            &AnalysisSettings::default(),
            &[],
            &options,
        )
        .unwrap();

        assert_eq!(report.season.season_days, 200);
        assert!((report.savings.savings_fraction - 0.09).abs() < 1e-12);
    }

    #[test]
    fn test_report_rejects_excessive_reduction() {
        let options = ReportOptions {
            season_days: None,
            lwt_reduction_c: Some(9),
        };
        let result = build_report(
            &winter_records(),
            &TariffSchedule::default_three_zone(),
            &AnalysisSettings::default(),
            &[],
            &options,
        );
        assert!(matches!(result, Err(AnalysisError::InvalidParameter { .. })));
    }
}
