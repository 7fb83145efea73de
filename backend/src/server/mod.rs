//! HTTP server assembly: route table, middleware order, and shutdown.
//!
//! Middleware runs outermost first: metrics (when enabled), then [`Trace`],
//! then the cookie session, which wraps only the `/api/v1` scope so health
//! probes and docs stay sessionless.

mod config;
#[cfg(feature = "metrics")]
mod metrics;
mod state_builders;

pub use config::{AppSettings, ServerConfig};

#[cfg(feature = "metrics")]
use metrics::MetricsLayer;
#[cfg(feature = "metrics")]
pub(crate) use metrics::prometheus_middleware;
use state_builders::build_http_state;

use actix_web::dev::{Server, ServerHandle, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, Scope, web};
use tracing::{info, warn};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use muncho_crm::Trace;
#[cfg(debug_assertions)]
use muncho_crm::doc::ApiDoc;
use muncho_crm::inbound::http::error::{json_config, query_config};
use muncho_crm::inbound::http::health::{HealthState, live, ready};
use muncho_crm::inbound::http::session_config::SessionSettings;
use muncho_crm::inbound::http::state::HttpState;
use muncho_crm::inbound::http::{
    auth, bootstrap, campaigns, dashboard, insights, loyalty, onboarding,
};

/// Shared values cloned into every worker's app.
#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    session: SessionSettings,
}

/// Versioned API routes behind the session cookie.
fn api_scope(session: SessionSettings) -> Scope<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    // Session middleware holds non-Send state, so each worker builds its own.
    web::scope("/api/v1")
        .wrap(session.middleware())
        .configure(|cfg| {
            auth::configure(cfg);
            bootstrap::configure(cfg);
            onboarding::configure(cfg);
            campaigns::configure(cfg);
            dashboard::configure(cfg);
            loyalty::configure(cfg);
            insights::configure(cfg);
        })
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let app = App::new()
        .app_data(deps.health_state)
        .app_data(deps.http_state)
        .app_data(json_config())
        .app_data(query_config())
        .wrap(Trace)
        .service(api_scope(deps.session))
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Bind the HTTP server and mark the health state ready.
///
/// Signal handling is owned here rather than by Actix: on Ctrl-C the
/// liveness probe flips to 503 before workers drain for up to
/// `shutdown_grace_secs`.
///
/// # Errors
/// Returns [`std::io::Error`] when the socket cannot be bound.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let http_state = build_http_state(&config);
    let ServerConfig {
        session,
        bind_addr,
        shutdown_grace_secs,
        #[cfg(feature = "metrics")]
        prometheus,
        ..
    } = config;

    #[cfg(feature = "metrics")]
    let metrics_layer = MetricsLayer::from_option(prometheus);

    let deps = AppDependencies {
        health_state: health_state.clone(),
        http_state,
        session,
    };
    let server = HttpServer::new(move || {
        let app = build_app(deps.clone());
        #[cfg(feature = "metrics")]
        let app = app.wrap(metrics_layer.clone());
        app
    })
    .disable_signals()
    .shutdown_timeout(shutdown_grace_secs)
    .bind(bind_addr)?
    .run();

    actix_web::rt::spawn(drain_on_interrupt(server.handle(), health_state.clone()));
    health_state.mark_ready();
    Ok(server)
}

async fn drain_on_interrupt(handle: ServerHandle, health_state: web::Data<HealthState>) {
    if let Err(error) = tokio::signal::ctrl_c().await {
        warn!(%error, "shutdown signal unavailable; stop the process externally");
        return;
    }
    info!("shutdown requested; draining connections");
    health_state.mark_unhealthy();
    handle.stop(true).await;
}
