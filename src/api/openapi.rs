use utoipa::OpenApi;

use crate::advisor::WeatherAdvice;
use crate::analysis::{
    AdvisoryLevel, AnalysisReport, Billing, ComfortAssessment, ComfortStatus, ConsumptionForecast,
    ConsumptionModel, CurveDeviation, CurveDiagnostics, CurvePoint, CurvePosition, ForecastPoint,
    FuelCost, HeatingCurve, LwtSavings, MonthlyBill, MonthlyMetrics, SeasonProjection, Summary,
    ZoneAdvisory,
};
use crate::api::analysis::{AnalysisRequest, ForecastRequest};
use crate::api::tariff::{AllocateRequest, RecordsRequest, TariffBody};
use crate::domain::{AllocationResult, MonthlyRecord, TariffTier};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::api::tariff::get_tariff,
        crate::api::tariff::put_tariff,
        crate::api::tariff::allocate_quantity,
        crate::api::tariff::bill_records,
        crate::api::analysis::analyze,
        crate::api::analysis::forecast,
    ),
    components(schemas(
        TariffTier, TariffBody, AllocateRequest, AllocationResult, RecordsRequest, MonthlyRecord,
        Billing, MonthlyBill, AnalysisRequest, AnalysisReport, Summary, MonthlyMetrics,
        CurveDiagnostics, CurveDeviation, CurvePoint, CurvePosition, HeatingCurve,
        SeasonProjection, LwtSavings, ComfortAssessment, ComfortStatus, ZoneAdvisory,
        AdvisoryLevel, FuelCost, ForecastRequest, WeatherAdvice, ConsumptionForecast,
        ConsumptionModel, ForecastPoint,
    )),
    tags(
        (name = "tariff", description = "Tiered tariff pricing"),
        (name = "analysis", description = "Heat pump performance analysis"),
    )
)]
pub struct ApiDoc;
