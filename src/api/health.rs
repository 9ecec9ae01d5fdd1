use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

use crate::advisor::AppState;
use crate::domain::TariffSchedule;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    timestamp: chrono::DateTime<chrono::Utc>,
    checks: HealthChecks,
}

/// Individual health checks
#[derive(Debug, Serialize)]
pub struct HealthChecks {
    tariff: TariffInfo,
}

/// Shape of the active tariff. It is validated whenever it is set, so this
/// reports it rather than probing it.
#[derive(Debug, Serialize)]
pub struct TariffInfo {
    tiers: usize,
    zones: Vec<String>,
}

impl TariffInfo {
    fn from_schedule(schedule: &TariffSchedule) -> Self {
        Self {
            tiers: schedule.tiers().len(),
            zones: schedule.tiers().iter().map(|t| t.name.clone()).collect(),
        }
    }
}

/// GET /health - Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let tariff = state.advisor.tariff().await;

    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now(),
        checks: HealthChecks {
            tariff: TariffInfo::from_schedule(&tariff),
        },
    })
}

/// GET /health/ready - Readiness probe
///
/// Config is validated before the router exists, so a running router is ready.
pub async fn readiness_check() -> impl IntoResponse {
    StatusCode::OK
}

/// GET /health/live - Liveness probe
pub async fn liveness_check() -> impl IntoResponse {
    StatusCode::OK
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TariffTier;

    #[test]
    fn test_tariff_info_lists_zones() {
        let info = TariffInfo::from_schedule(&TariffSchedule::default_three_zone());
        assert_eq!(info.tiers, 3);
        assert_eq!(info.zones, vec!["green", "blue", "red"]);
    }

    #[test]
    fn test_tariff_info_single_tier() {
        let schedule = TariffSchedule::new(vec![TariffTier::unbounded("flat", 5.0)]).unwrap();
        let info = TariffInfo::from_schedule(&schedule);
        assert_eq!(info.tiers, 1);
        assert_eq!(info.zones, vec!["flat"]);
    }
}
