use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use validator::Validate;

use crate::{
    advisor::{AppState, WeatherAdvice},
    analysis::{AnalysisReport, ReportOptions},
    api::{error::ApiError, response::ApiResponse},
    domain::MonthlyRecord,
};

#[cfg_attr(feature = "swagger", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AnalysisRequest {
    #[validate(length(min = 1), nested)]
    pub records: Vec<MonthlyRecord>,
    #[validate(range(min = 1, max = 366))]
    pub season_days: Option<u32>,
    pub lwt_reduction_c: Option<u32>,
}

#[cfg_attr(feature = "swagger", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ForecastRequest {
    #[validate(length(min = 1), nested)]
    pub records: Vec<MonthlyRecord>,
    /// Daily mean outdoor temperatures for the coming days.
    #[validate(length(min = 1, max = 31))]
    pub outdoor_forecast_c: Vec<f64>,
}

/// POST /api/v1/analysis
#[cfg_attr(feature = "swagger", utoipa::path(
    post, path = "/api/v1/analysis", tag = "analysis", request_body = AnalysisRequest,
    responses(
        (status = 200, description = "Full analysis report", body = AnalysisReport),
        (status = 400, description = "Invalid records or options"),
    )
))]
pub async fn analyze(
    State(st): State<AppState>,
    Json(req): Json<AnalysisRequest>,
) -> Result<Json<ApiResponse<AnalysisReport>>, ApiError> {
    req.validate()?;
    let start = Instant::now();

    let options = ReportOptions {
        season_days: req.season_days,
        lwt_reduction_c: req.lwt_reduction_c,
    };
    let report = st.advisor.analyze(&req.records, &options).await?;

    Ok(Json(
        ApiResponse::success(report)
            .with_count(req.records.len())
            .with_duration(start.elapsed().as_micros() as u64),
    ))
}

/// POST /api/v1/forecast
#[cfg_attr(feature = "swagger", utoipa::path(
    post, path = "/api/v1/forecast", tag = "analysis", request_body = ForecastRequest,
    responses(
        (status = 200, description = "Consumption forecast and LWT set-points", body = WeatherAdvice),
        (status = 400, description = "Invalid records or temperatures"),
    )
))]
pub async fn forecast(
    State(st): State<AppState>,
    Json(req): Json<ForecastRequest>,
) -> Result<Json<ApiResponse<WeatherAdvice>>, ApiError> {
    req.validate()?;
    let advice = st
        .advisor
        .weather_advice(&req.records, &req.outdoor_forecast_c)
        .await?;
    Ok(Json(
        ApiResponse::success(advice).with_count(req.records.len()),
    ))
}
