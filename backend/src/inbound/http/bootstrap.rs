//! Session bootstrap handlers.
//!
//! ```text
//! GET /api/v1/session
//! POST /api/v1/session/reset
//! ```
//!
//! Both endpoints always answer with a view; an unreadable session cookie
//! is treated as signed out.

use actix_web::{get, post, web};
use tracing::warn;

use crate::domain::AccountId;
use crate::domain::ports::SessionView;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

fn account_or_none(state: &HttpState, session: &SessionContext) -> Option<AccountId> {
    session.account_id(state.now()).unwrap_or_else(|error| {
        warn!(%error, "ignoring unreadable session");
        None
    })
}

/// Resolve which view the client should show for the current session.
#[utoipa::path(
    get,
    path = "/api/v1/session",
    responses(
        (status = 200, description = "Bootstrap view", body = SessionView)
    ),
    tags = ["session"],
    operation_id = "currentSession",
    security([])
)]
#[get("/session")]
pub async fn current_session(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> web::Json<SessionView> {
    let account = account_or_none(&state, &session);
    web::Json(state.session.current(account).await)
}

/// Clear the session and any saved onboarding progress.
///
/// Used to escape a stuck loading screen; it never fails.
#[utoipa::path(
    post,
    path = "/api/v1/session/reset",
    responses(
        (status = 200, description = "Session reset to the login view", body = SessionView)
    ),
    tags = ["session"],
    operation_id = "resetSession",
    security([])
)]
#[post("/session/reset")]
pub async fn reset_session(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> web::Json<SessionView> {
    let account = account_or_none(&state, &session);
    session.clear();
    web::Json(state.session.emergency_reset(account).await)
}

/// Register the bootstrap routes on a scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(current_session).service(reset_session);
}
