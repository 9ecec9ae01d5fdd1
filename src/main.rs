use anyhow::Result;
use axum::Router;
use heat_pump_advisor::{advisor, api, config, telemetry};
use config::Config;
use telemetry::init_tracing;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cfg = Config::load()?;
    init_tracing(&cfg.log);

    if cfg.auth.token.len() < 16 || cfg.auth.token.starts_with("__SET_VIA_ENV") {
        anyhow::bail!(
            "HPA__AUTH__TOKEN must be set to a random token of at least 16 characters \
            (e.g. openssl rand -base64 24)"
        );
    }

    let app_state = advisor::AppState::new(cfg.clone())?;
    info!(
        tiers = cfg.tariff.tiers.tiers().len(),
        fuels = cfg.fuels.len(),
        season_days = cfg.analysis.season_days,
        "tariff and analysis settings loaded"
    );

    let mut app: Router = api::router(app_state);

    #[cfg(feature = "swagger")]
    {
        app = api::with_swagger(app);
    }

    app = api::with_metrics(app, &cfg);

    let addr = cfg.server.socket_addr()?;

    if cfg.server.host == "0.0.0.0" {
        warn!("binding to 0.0.0.0 - the API will be reachable from the network");
    }

    info!(%addr, "starting heat pump advisor");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(telemetry::shutdown_signal())
        .await?;

    warn!("shutdown complete");
    Ok(())
}
