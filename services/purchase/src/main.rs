use anyhow::Context as _;
use sea_orm::Database;
use tracing::info;

use showroom_core::config::Config as _;
use showroom_core::tracing::init_tracing;
use showroom_purchase::config::PurchaseConfig;
use showroom_purchase::router::build_router;
use showroom_purchase::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing("info,showroom_purchase=debug,tower_http=info");

    let config = PurchaseConfig::from_env().context("load purchase config")?;

    let otp_ttl = config.otp_ttl()?;

    let db = Database::connect(&config.database_url)
        .await
        .context("connect to database")?;

    if config.otp_expose_codes {
        tracing::warn!("OTP_EXPOSE_CODES is enabled; issued codes are returned to callers");
    }

    let state = AppState {
        db,
        otp_ttl,
        otp_expose_codes: config.otp_expose_codes,
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.purchase_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("bind {addr}"))?;

    info!("purchase service listening on {addr}");
    axum::serve(listener, router).await.context("server error")?;
    Ok(())
}
