use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::analysis::{
    build_report, forecast_consumption, recommend_lwt, AnalysisError, AnalysisReport,
    AnalysisSettings, Billing, ConsumptionForecast, FuelOption, ReportOptions,
};
use crate::config::Config;
use crate::domain::{AllocationResult, MonthlyRecord, TariffError, TariffSchedule, TariffTier};

#[derive(Clone)]
pub struct AppState {
    pub cfg: Config,
    pub advisor: Arc<Advisor>,
}

impl AppState {
    pub fn new(cfg: Config) -> Result<Self> {
        cfg.validate()?;
        let advisor = Arc::new(Advisor::new(
            cfg.tariff.tiers.clone(),
            cfg.analysis.clone(),
            cfg.fuels.clone(),
        ));
        Ok(Self { cfg, advisor })
    }
}

/// A consumption forecast with the matching LWT set-point for each day.
#[cfg_attr(feature = "swagger", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherAdvice {
    pub consumption: ConsumptionForecast,
    pub recommended_lwt_c: Vec<f64>,
    /// Forecast consumption priced as if it were one billing period.
    pub allocation: AllocationResult,
}

/// Holds the active tariff and analysis settings; all computations run on a
/// snapshot so the lock is never held across them.
pub struct Advisor {
    schedule: RwLock<TariffSchedule>,
    settings: AnalysisSettings,
    fuels: Vec<FuelOption>,
}

impl Advisor {
    pub fn new(schedule: TariffSchedule, settings: AnalysisSettings, fuels: Vec<FuelOption>) -> Self {
        Self {
            schedule: RwLock::new(schedule),
            settings,
            fuels,
        }
    }

    pub async fn tariff(&self) -> TariffSchedule {
        self.schedule.read().await.clone()
    }

    /// Replace the active tariff. An invalid tier list leaves the old one in place.
    pub async fn set_tariff(&self, tiers: Vec<TariffTier>) -> Result<TariffSchedule, TariffError> {
        let schedule = TariffSchedule::new(tiers).map_err(|e| {
            warn!(error = %e, "rejected tariff update");
            e
        })?;
        *self.schedule.write().await = schedule.clone();
        info!(tiers = schedule.tiers().len(), "tariff updated");
        Ok(schedule)
    }

    pub async fn allocate(&self, quantity_kwh: f64) -> Result<AllocationResult, TariffError> {
        let schedule = self.tariff().await;
        let result = schedule.allocate(quantity_kwh)?;
        debug!(
            quantity_kwh,
            total_cost = result.total_cost,
            zone = result.zone_index(),
            "allocated consumption"
        );
        Ok(result)
    }

    pub async fn bill(&self, records: &[MonthlyRecord]) -> Result<Billing, AnalysisError> {
        let schedule = self.tariff().await;
        crate::analysis::bill_months(records, &schedule)
    }

    pub async fn analyze(
        &self,
        records: &[MonthlyRecord],
        options: &ReportOptions,
    ) -> Result<AnalysisReport, AnalysisError> {
        let schedule = self.tariff().await;
        let report = build_report(records, &schedule, &self.settings, &self.fuels, options)?;
        info!(
            months = records.len(),
            projected_kwh = report.season.projected_kwh,
            zone = %report.zone.zone,
            level = %report.zone.level,
            comfort = report.comfort.index,
            comfort_status = %report.comfort.status,
            "analysis complete"
        );
        Ok(report)
    }

    pub fn recommend_lwt(&self, outdoor_c: &[f64]) -> Result<Vec<f64>, AnalysisError> {
        outdoor_c
            .iter()
            .map(|t| {
                recommend_lwt(
                    *t,
                    &self.settings.recommended_curve,
                    self.settings.min_lwt_c,
                    self.settings.max_lwt_c,
                )
            })
            .collect()
    }

    pub async fn weather_advice(
        &self,
        records: &[MonthlyRecord],
        outdoor_forecast_c: &[f64],
    ) -> Result<WeatherAdvice, AnalysisError> {
        let consumption = forecast_consumption(records, outdoor_forecast_c)?;
        let recommended_lwt_c = self.recommend_lwt(outdoor_forecast_c)?;
        let allocation = self.tariff().await.allocate(consumption.total_kwh)?;

        Ok(WeatherAdvice {
            consumption,
            recommended_lwt_c,
            allocation,
        })
    }
}

impl Default for Advisor {
    fn default() -> Self {
        Self::new(
            TariffSchedule::default_three_zone(),
            AnalysisSettings::default(),
            Vec::new(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::fixtures::winter_records;

    #[tokio::test]
    async fn test_set_tariff_keeps_old_on_error() {
        let advisor = Advisor::default();
        let err = advisor.set_tariff(vec![]).await.unwrap_err();
        assert!(matches!(err, TariffError::Configuration(_)));
        assert_eq!(advisor.tariff().await, TariffSchedule::default_three_zone());

        advisor
            .set_tariff(vec![TariffTier::unbounded("flat", 10.0)])
            .await
            .unwrap();
        let result = advisor.allocate(120.0).await.unwrap();
        assert_eq!(result.total_cost, 1200.0);
    }

    #[tokio::test]
    async fn test_allocate_rejects_negative() {
        let advisor = Advisor::default();
        assert!(matches!(
            advisor.allocate(-5.0).await,
            Err(TariffError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_analyze_uses_active_tariff() {
        let advisor = Advisor::default();
        advisor
            .set_tariff(vec![TariffTier::unbounded("flat", 1.0)])
            .await
            .unwrap();

        let report = advisor
            .analyze(&winter_records(), &ReportOptions::default())
            .await
            .unwrap();
        assert_eq!(report.billing.total.total_cost, 1701.0);
        assert_eq!(report.zone.zone, "flat");
    }

    #[tokio::test]
    async fn test_weather_advice() {
        let advisor = Advisor::default();
        let advice = advisor
            .weather_advice(&winter_records(), &[-30.0, 5.0, 30.0])
            .await
            .unwrap();

        assert_eq!(advice.recommended_lwt_c, vec![45.0, 32.5, 25.0]);
        assert_eq!(advice.consumption.points.len(), 3);
        assert!(
            (advice.allocation.allocated_total() - advice.consumption.total_kwh).abs() < 1e-9
        );
    }
}
