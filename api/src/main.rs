use std::sync::Arc;

use actix_web::{web, HttpServer};
use anyhow::Context;
use tracing_subscriber::{fmt, EnvFilter};

use nt_api::app::create_app;
use nt_api::config::load_config;
use nt_api::routes::otp::AppState;
use nt_core::services::otp::{
    Notifier, OtpService, OtpServiceConfig, OtpStore, OtpSweepConfig, OtpSweepService,
};
use nt_infra::cache::{RedisClient, RedisOtpStore};
use nt_infra::database::{DatabasePool, MySqlOtpStore};
use nt_infra::mail::create_notifier;
use nt_infra::store::MemoryOtpStore;
use nt_shared::config::{AppConfig, LogFormat, LoggingConfig, StorageBackend};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = load_config().context("Failed to load configuration")?;
    init_tracing(&config.logging);

    tracing::info!(
        environment = %config.environment,
        storage = %config.storage.backend,
        "Starting notification OTP server"
    );

    let store = create_store(&config).await?;
    let notifier: Arc<dyn Notifier> =
        create_notifier(&config.mail).context("Failed to set up mail delivery")?;

    let otp_service = OtpService::new(
        store.clone(),
        notifier,
        OtpServiceConfig::from(&config.otp),
    )
    .context("Invalid OTP configuration")?;

    Arc::new(OtpSweepService::new(store, OtpSweepConfig::from(&config.otp)))
        .start_background_task();

    let app_state = web::Data::new(AppState::new(Arc::new(otp_service)));
    let json_limit = config.server.max_payload_size;
    let bind_address = config.server.bind_address();

    tracing::info!("Server will bind to: {}", bind_address);

    let mut server = HttpServer::new(move || create_app(app_state.clone(), json_limit))
        .keep_alive(std::time::Duration::from_secs(config.server.keep_alive));
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server
        .bind(&bind_address)
        .with_context(|| format!("Failed to bind {}", bind_address))?
        .run()
        .await
        .context("HTTP server error")
}

/// Build the passcode store for the configured backend
async fn create_store(config: &AppConfig) -> anyhow::Result<Arc<dyn OtpStore>> {
    let store: Arc<dyn OtpStore> = match config.storage.backend {
        StorageBackend::Mysql => {
            let pool = DatabasePool::new(config.database.clone())
                .await
                .context("Failed to connect to MySQL")?;
            pool.run_migrations()
                .await
                .context("Failed to prepare otp_codes table")?;
            Arc::new(MySqlOtpStore::new(pool))
        }
        StorageBackend::Redis => {
            let client = RedisClient::new(config.cache.clone())
                .await
                .context("Failed to connect to Redis")?;
            Arc::new(RedisOtpStore::new(client))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory OTP storage; codes are lost on restart");
            Arc::new(MemoryOtpStore::new())
        }
    };
    Ok(store)
}

/// Install the global tracing subscriber
///
/// `RUST_LOG` takes precedence over the configured level.
fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let builder = fmt()
        .with_env_filter(filter)
        .with_file(logging.source_location)
        .with_line_number(logging.source_location);

    match logging.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.pretty().init(),
        LogFormat::Compact => builder.compact().init(),
    }
}
