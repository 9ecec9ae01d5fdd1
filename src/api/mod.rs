pub mod analysis;
pub mod error;
pub mod health;
#[cfg(feature = "swagger")]
pub mod openapi;
pub mod response;
pub mod tariff;
pub mod v1;

use axum::{http::StatusCode, routing::get, Router};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::{advisor::AppState, config::Config};

pub fn router(state: AppState) -> Router {
    let cfg = state.cfg.clone();

    let health = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/health/live", get(health::liveness_check))
        .with_state(state.clone());

    let mut router = Router::new()
        .nest("/api/v1", v1::router(state))
        .merge(health);

    if cfg.server.enable_cors {
        use axum::http::{header, HeaderValue, Method};
        let cors = CorsLayer::new()
            .allow_origin(HeaderValue::from_static("http://localhost:3000"))
            .allow_methods([Method::GET, Method::POST, Method::PUT])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);
        router = router.layer(cors);
    }

    router
        .layer(
            ServiceBuilder::new()
                .layer(axum::extract::DefaultBodyLimit::max(256 * 1024))
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::REQUEST_TIMEOUT,
                    Duration::from_secs(cfg.server.request_timeout_secs),
                )),
        )
        .layer(TraceLayer::new_for_http())
}

#[cfg(feature = "swagger")]
pub fn with_swagger(app: Router) -> Router {
    use crate::api::openapi::ApiDoc;
    use utoipa::OpenApi;
    use utoipa_swagger_ui::SwaggerUi;
    app.merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
}

#[cfg(feature = "metrics")]
pub fn with_metrics(app: Router, cfg: &Config) -> Router {
    use axum::middleware;
    use axum_prometheus::PrometheusMetricLayer;
    let (layer, handle) = PrometheusMetricLayer::pair();

    let auth = crate::auth::AuthConfig::new(cfg.auth.token.clone());
    let metrics_router = Router::new()
        .route("/metrics", get(move || async move { handle.render() }))
        .layer(middleware::from_fn_with_state(auth, crate::auth::require_bearer));

    app.layer(layer).merge(metrics_router)
}

#[cfg(not(feature = "metrics"))]
pub fn with_metrics(app: Router, _cfg: &Config) -> Router {
    app
}
