//! Application settings and the server configuration object.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use muncho_crm::domain::LoginThrottlePolicy;
use muncho_crm::inbound::http::session_config::SessionSettings;
use muncho_crm::outbound::persistence::DbPool;
use ortho_config::OrthoConfig;
use serde::Deserialize;

#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetrics;

const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);

/// Settings loaded from `MUNCHO_*` environment variables, config files, and
/// command-line flags.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "MUNCHO")]
pub struct AppSettings {
    /// Interface to bind; all interfaces when unset.
    pub host: Option<IpAddr>,
    #[ortho_config(default = 8080)]
    pub port: u16,
    /// PostgreSQL URL; in-memory stores are used when absent.
    pub database_url: Option<String>,
    /// Upper bound on pooled PostgreSQL connections.
    #[ortho_config(default = 10)]
    pub db_max_connections: u32,
    /// Apply embedded migrations before serving.
    #[ortho_config(default = true)]
    pub run_migrations: bool,
    /// Consecutive failed logins before an email is locked.
    #[ortho_config(default = 5)]
    pub max_failed_logins: u32,
    #[ortho_config(default = 15)]
    pub lockout_minutes: u32,
    /// Whether the tenant owns a WhatsApp sender header.
    #[ortho_config(default = false)]
    pub whatsapp_header: bool,
    /// Seconds workers get to finish in-flight requests on shutdown.
    #[ortho_config(default = 30)]
    pub shutdown_grace_secs: u64,
}

impl AppSettings {
    /// Socket address built from `host` and `port`.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host.unwrap_or(DEFAULT_HOST), self.port)
    }

    /// Login lockout policy.
    #[must_use]
    pub fn throttle_policy(&self) -> LoginThrottlePolicy {
        LoginThrottlePolicy::new(self.max_failed_logins, self.lockout_minutes)
    }

    /// Database URL with surrounding whitespace removed; blank counts as
    /// unset.
    #[must_use]
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) session: SessionSettings,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) throttle: LoginThrottlePolicy,
    pub(crate) whatsapp_header: bool,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) shutdown_grace_secs: u64,
    #[cfg(feature = "metrics")]
    pub(crate) prometheus: Option<PrometheusMetrics>,
}

impl ServerConfig {
    /// Construct a server configuration from session and application
    /// settings.
    #[must_use]
    pub fn new(session: SessionSettings, settings: &AppSettings) -> Self {
        Self {
            session,
            bind_addr: settings.bind_addr(),
            throttle: settings.throttle_policy(),
            whatsapp_header: settings.whatsapp_header,
            db_pool: None,
            shutdown_grace_secs: settings.shutdown_grace_secs,
            #[cfg(feature = "metrics")]
            prometheus: None,
        }
    }

    /// Attach a database connection pool for persistence adapters.
    ///
    /// When provided, the server uses Diesel repositories for accounts,
    /// restaurants, campaigns, and CRM records.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    #[cfg(feature = "metrics")]
    /// Attach Prometheus middleware to the configuration.
    #[must_use]
    pub fn with_metrics(mut self, prometheus: Option<PrometheusMetrics>) -> Self {
        self.prometheus = prometheus;
        self
    }
}
