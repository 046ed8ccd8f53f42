use std::sync::Arc;
use std::time::Duration;

use actix_web::{web, HttpServer};
use anyhow::Context;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use otp_api::{create_app, ApiConfig, AppState};
use otp_core::{DeliveryChannel, OtpCleanupService, OtpService, OtpStore};
use otp_infra::{create_delivery_channel, create_store};
use otp_shared::{LogFormat, LoggingConfig};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = ApiConfig::from_env()?;
    init_tracing(&config.app.logging)?;

    tracing::info!(
        environment = %config.app.environment,
        storage = %config.app.storage.backend,
        delivery = %config.delivery.kind,
        "Starting dual OTP API server"
    );

    let store: Arc<dyn OtpStore> = create_store(&config.app.storage)
        .await
        .context("failed to open OTP store")?;
    let delivery: Arc<dyn DeliveryChannel> = create_delivery_channel(&config.delivery);

    let otp_service = Arc::new(OtpService::new(store.clone(), delivery, config.otp.clone())?);

    let cleanup_task = Arc::new(OtpCleanupService::new(store.clone(), config.cleanup.clone()))
        .start_background_task();

    let app_state = web::Data::new(AppState::new(otp_service));
    let app_config = config.app.clone();

    let bind_address = config.app.server.bind_address();
    tracing::info!(address = %bind_address, "Binding HTTP server");

    let mut server = HttpServer::new(move || create_app(app_state.clone(), &app_config))
        .keep_alive(Duration::from_secs(config.app.server.keep_alive));
    if config.app.server.workers > 0 {
        server = server.workers(config.app.server.workers);
    }

    let result = server
        .bind(&bind_address)
        .with_context(|| format!("failed to bind {}", bind_address))?
        .run()
        .await;

    tracing::info!("HTTP server stopped, releasing resources");
    if let Some(task) = cleanup_task {
        task.abort();
    }
    store.close().await;

    result.context("HTTP server failed")
}

/// Install the global subscriber; `RUST_LOG` overrides the configured level
fn init_tracing(config: &LoggingConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.filter_directive()))
        .context("invalid log filter")?;

    let registry = tracing_subscriber::registry().with(filter);
    let result = match config.format {
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_file(config.source_location)
                    .with_line_number(config.source_location),
            )
            .try_init(),
        LogFormat::Pretty => registry
            .with(
                fmt::layer()
                    .pretty()
                    .with_ansi(config.colored)
                    .with_file(config.source_location)
                    .with_line_number(config.source_location),
            )
            .try_init(),
        LogFormat::Compact => registry
            .with(fmt::layer().compact().with_ansi(config.colored))
            .try_init(),
    };

    result.context("failed to install tracing subscriber")
}
