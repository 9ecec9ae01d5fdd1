use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::{
    advisor::AppState,
    api::{analysis, tariff},
    auth::{require_bearer, AuthConfig},
};

pub fn router(state: AppState) -> Router {
    let auth = AuthConfig::new(state.cfg.auth.token.clone());

    Router::new()
        .route("/tariff", get(tariff::get_tariff).put(tariff::put_tariff))
        .route("/tariff/allocate", post(tariff::allocate_quantity))
        .route("/tariff/bill", post(tariff::bill_records))
        .route("/analysis", post(analysis::analyze))
        .route("/forecast", post(analysis::forecast))
        .with_state(state)
        .layer(middleware::from_fn_with_state(auth, require_bearer))
}
