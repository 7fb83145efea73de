//! Account authentication handlers.
//!
//! ```text
//! POST /api/v1/auth/signup {"email":"owner@example.com","password":"secret1","confirmPassword":"secret1","firstName":"Asha"}
//! POST /api/v1/auth/login {"email":"owner@example.com","password":"secret1","rememberMe":true}
//! POST /api/v1/auth/logout
//! GET /api/v1/auth/me
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::SessionView;
use crate::domain::{AccountProfile, LoginCredentials, SignupForm, SignupRequest};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::form_error;

/// Login request body for `POST /api/v1/auth/login`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    /// Keep the session for 30 days instead of 2 hours.
    #[serde(default)]
    pub remember_me: bool,
}

/// Signup request body for `POST /api/v1/auth/signup`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupBody {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub first_name: String,
}

/// Signed-in account and the view the client should show next.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: AccountProfile,
    pub session: SessionView,
}

/// Register a new owner account and sign it in.
#[utoipa::path(
    post,
    path = "/api/v1/auth/signup",
    request_body = SignupBody,
    responses(
        (status = 201, description = "Account created", body = AuthResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 409, description = "Email already registered", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "signup",
    security([])
)]
#[post("/auth/signup")]
pub async fn signup(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<SignupBody>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let request = SignupRequest::try_from_form(SignupForm {
        email: &body.email,
        password: &body.password,
        confirm_password: &body.confirm_password,
        first_name: &body.first_name,
    })
    .map_err(|errors| form_error(&errors))?;
    let user = state.auth.signup(request).await?;
    session.persist_account(&user.id, false, state.now())?;
    let view = state.session.signed_in(user.id.clone()).await;
    Ok(HttpResponse::Created().json(AuthResponse {
        user,
        session: view,
    }))
}

/// Authenticate an owner and establish a session.
///
/// Repeated failures lock the email out for a while; locked attempts
/// answer `403` with the remaining wait in the message.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = AuthResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema),
        (status = 403, description = "Temporarily locked", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<AuthResponse>> {
    let body = payload.into_inner();
    let credentials = LoginCredentials::try_from_parts(&body.email, &body.password, body.remember_me)
        .map_err(|errors| form_error(&errors))?;
    let remember_me = credentials.remember_me();
    let user = state.auth.login(credentials).await?;
    session.persist_account(&user.id, remember_me, state.now())?;
    let view = state.session.signed_in(user.id.clone()).await;
    Ok(web::Json(AuthResponse {
        user,
        session: view,
    }))
}

/// End the session and discard any unsaved onboarding draft.
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    responses(
        (status = 200, description = "Signed out", body = SessionView),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "logout"
)]
#[post("/auth/logout")]
pub async fn logout(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<SessionView>> {
    let account = session.account_id(state.now())?;
    let view = state.session.signed_out(account).await;
    session.clear();
    Ok(web::Json(view))
}

/// Profile of the signed-in owner.
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    responses(
        (status = 200, description = "Current account", body = AccountProfile),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Account no longer exists", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "currentAccount"
)]
#[get("/auth/me")]
pub async fn me(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<AccountProfile>> {
    let account = session.require_account_id(state.now())?;
    let profile = state.auth.profile(&account).await?;
    Ok(web::Json(profile))
}

/// Register the auth routes on a scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(signup)
        .service(login)
        .service(logout)
        .service(me);
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
