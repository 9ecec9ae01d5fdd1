//! Tariff endpoints: inspect/replace the active tiers and price consumption.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    advisor::AppState,
    analysis::Billing,
    api::{error::ApiError, response::ApiResponse},
    domain::{allocate, AllocationResult, MonthlyRecord, TariffTier},
};

#[cfg_attr(feature = "swagger", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TariffBody {
    pub tiers: Vec<TariffTier>,
}

#[cfg_attr(feature = "swagger", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocateRequest {
    pub quantity_kwh: f64,
    /// Price against these tiers instead of the active tariff.
    #[serde(default)]
    pub tiers: Option<Vec<TariffTier>>,
}

#[cfg_attr(feature = "swagger", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecordsRequest {
    #[validate(length(min = 1), nested)]
    pub records: Vec<MonthlyRecord>,
}

/// GET /api/v1/tariff
#[cfg_attr(feature = "swagger", utoipa::path(
    get, path = "/api/v1/tariff", tag = "tariff",
    responses((status = 200, description = "Active tariff tiers"))
))]
pub async fn get_tariff(State(st): State<AppState>) -> Json<ApiResponse<TariffBody>> {
    let tiers = st.advisor.tariff().await.into_tiers();
    Json(ApiResponse::success(TariffBody { tiers }))
}

/// PUT /api/v1/tariff
#[cfg_attr(feature = "swagger", utoipa::path(
    put, path = "/api/v1/tariff", tag = "tariff", request_body = TariffBody,
    responses(
        (status = 200, description = "Tariff replaced"),
        (status = 400, description = "Tier list rejected"),
    )
))]
pub async fn put_tariff(
    State(st): State<AppState>,
    Json(body): Json<TariffBody>,
) -> Result<Json<ApiResponse<TariffBody>>, ApiError> {
    let schedule = st.advisor.set_tariff(body.tiers).await?;
    Ok(Json(ApiResponse::success(TariffBody {
        tiers: schedule.into_tiers(),
    })))
}

/// POST /api/v1/tariff/allocate
#[cfg_attr(feature = "swagger", utoipa::path(
    post, path = "/api/v1/tariff/allocate", tag = "tariff", request_body = AllocateRequest,
    responses(
        (status = 200, description = "Per-tier split and blended cost", body = AllocationResult),
        (status = 400, description = "Negative quantity or invalid tiers"),
    )
))]
pub async fn allocate_quantity(
    State(st): State<AppState>,
    Json(req): Json<AllocateRequest>,
) -> Result<Json<ApiResponse<AllocationResult>>, ApiError> {
    let result = match req.tiers {
        Some(tiers) => allocate(req.quantity_kwh, &tiers)?,
        None => st.advisor.allocate(req.quantity_kwh).await?,
    };
    Ok(Json(ApiResponse::success(result)))
}

/// POST /api/v1/tariff/bill
#[cfg_attr(feature = "swagger", utoipa::path(
    post, path = "/api/v1/tariff/bill", tag = "tariff", request_body = RecordsRequest,
    responses(
        (status = 200, description = "Monthly bills and season total", body = Billing),
        (status = 400, description = "Invalid records"),
    )
))]
pub async fn bill_records(
    State(st): State<AppState>,
    Json(req): Json<RecordsRequest>,
) -> Result<Json<ApiResponse<Billing>>, ApiError> {
    req.validate()?;
    let billing = st.advisor.bill(&req.records).await?;
    Ok(Json(
        ApiResponse::success(billing).with_count(req.records.len()),
    ))
}
