//! Restaurant onboarding handlers.
//!
//! ```text
//! GET /api/v1/onboarding
//! PUT /api/v1/onboarding/progress {"step":2,"draft":{"name":"Spice Route"}}
//! POST /api/v1/onboarding/complete {"name":"Spice Route","city":"Pune",...}
//! ```

use actix_web::{get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{CompletedOnboarding, SessionView};
use crate::domain::{OnboardingDraft, OnboardingProgress};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, missing_field_error};

/// Saved onboarding position, absent when the owner has none.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProgressResponse {
    pub progress: Option<OnboardingProgress>,
}

/// Request body for `PUT /api/v1/onboarding/progress`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveProgressRequest {
    #[schema(minimum = 1, maximum = 4)]
    pub step: Option<u8>,
    #[serde(default)]
    pub draft: OnboardingDraft,
}

/// Fetch the saved onboarding draft so the wizard can resume.
#[utoipa::path(
    get,
    path = "/api/v1/onboarding",
    responses(
        (status = 200, description = "Saved progress", body = ProgressResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["onboarding"],
    operation_id = "getOnboardingProgress"
)]
#[get("/onboarding")]
pub async fn get_progress(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<ProgressResponse>> {
    let owner = session.require_account_id(state.now())?;
    let progress = state.onboarding.progress(&owner).await?;
    Ok(web::Json(ProgressResponse { progress }))
}

/// Save the current step and draft, then leave for the dashboard.
#[utoipa::path(
    put,
    path = "/api/v1/onboarding/progress",
    request_body = SaveProgressRequest,
    responses(
        (status = 200, description = "Progress saved", body = SessionView),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["onboarding"],
    operation_id = "saveOnboardingProgress"
)]
#[put("/onboarding/progress")]
pub async fn save_progress(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<SaveProgressRequest>,
) -> ApiResult<web::Json<SessionView>> {
    let owner = session.require_account_id(state.now())?;
    let SaveProgressRequest { step, draft } = payload.into_inner();
    let step = step.ok_or_else(|| missing_field_error(FieldName::new("step")))?;
    let view = state.onboarding.save_and_exit(&owner, step, draft).await?;
    Ok(web::Json(view))
}

/// Validate the draft, create the restaurant, and finish onboarding.
#[utoipa::path(
    post,
    path = "/api/v1/onboarding/complete",
    request_body = OnboardingDraft,
    responses(
        (status = 200, description = "Restaurant created", body = CompletedOnboarding),
        (status = 400, description = "Invalid restaurant details", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["onboarding"],
    operation_id = "completeOnboarding"
)]
#[post("/onboarding/complete")]
pub async fn complete(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<OnboardingDraft>,
) -> ApiResult<web::Json<CompletedOnboarding>> {
    let owner = session.require_account_id(state.now())?;
    let completed = state
        .onboarding
        .complete(&owner, payload.into_inner())
        .await?;
    Ok(web::Json(completed))
}

/// Register the onboarding routes on a scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(get_progress)
        .service(save_progress)
        .service(complete);
}
