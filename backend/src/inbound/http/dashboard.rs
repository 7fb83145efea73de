//! Dashboard handler.
//!
//! ```text
//! GET /api/v1/dashboard?timeframe=Last%207%20days
//! ```

use actix_web::{get, web};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::domain::{DashboardData, Timeframe};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Dashboard query parameters.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DashboardParams {
    /// `Today`, `Yesterday`, `Last 7 days`, or `Last 30 days`. Other labels
    /// cover the last day.
    pub timeframe: Option<String>,
}

/// Headline figures, charts, and widgets for the owner's restaurant.
#[utoipa::path(
    get,
    path = "/api/v1/dashboard",
    params(DashboardParams),
    responses(
        (status = 200, description = "Dashboard figures", body = DashboardData),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["dashboard"],
    operation_id = "getDashboard"
)]
#[get("/dashboard")]
pub async fn get_dashboard(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<DashboardParams>,
) -> ApiResult<web::Json<DashboardData>> {
    let owner = session.require_account_id(state.now())?;
    let timeframe = query
        .timeframe
        .as_deref()
        .map_or_else(Timeframe::default, Timeframe::from_label);
    let data = state.dashboard.dashboard(&owner, timeframe).await?;
    Ok(web::Json(data))
}

/// Register the dashboard route on a scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(get_dashboard);
}
