//! Backend entry-point: loads settings, prepares persistence, and serves the
//! REST API with its OpenAPI docs.

mod server;

use actix_web::web;
use color_eyre::eyre::{Result, WrapErr};
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use muncho_crm::inbound::http::health::HealthState;
use muncho_crm::inbound::http::session_config::fingerprint::key_fingerprint;
use muncho_crm::inbound::http::session_config::{BuildMode, session_settings_from_env};
use muncho_crm::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};

use server::{AppSettings, ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(error) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(%error, "tracing init failed");
    }

    let settings = AppSettings::load().wrap_err("failed to load settings")?;
    let env = DefaultEnv::new();
    let session = session_settings_from_env(&env, BuildMode::from_debug_assertions())
        .wrap_err("invalid session configuration")?;
    info!(
        fingerprint = %key_fingerprint(&session.key),
        "session key loaded"
    );

    let mut config = ServerConfig::new(session, &settings);
    if let Some(url) = settings.database_url() {
        if settings.run_migrations {
            let applied = run_pending_migrations(url)
                .await
                .wrap_err("database migrations failed")?;
            info!(applied, "database migrations applied");
        }
        let pool = DbPool::new(PoolConfig::new(url).with_max_size(settings.db_max_connections))
            .await
            .wrap_err("failed to create database pool")?;
        config = config.with_db_pool(pool);
    }
    #[cfg(feature = "metrics")]
    {
        config = config.with_metrics(server::prometheus_middleware());
    }

    let health_state = web::Data::new(HealthState::new());
    let bind_addr = settings.bind_addr();
    let server = create_server(health_state, config)
        .wrap_err_with(|| format!("failed to bind {bind_addr}"))?;
    info!(%bind_addr, "server listening");
    server.await.wrap_err("server terminated with an error")
}
