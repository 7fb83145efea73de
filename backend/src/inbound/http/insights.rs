//! Customer insight handlers.
//!
//! ```text
//! GET /api/v1/insights/overview?range=Last%2030%20days
//! GET /api/v1/insights/segments?range=Lifetime
//! GET /api/v1/insights/customers?search=priya&visits=4-7&spend=500-999&limit=20
//! GET /api/v1/insights/activity?range=Today&feedback=false
//! ```

use actix_web::{HttpRequest, get, web};
use pagination::{PageParams, Paginated};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::domain::{
    ActivityEvent, ActivityFilter, CustomerQuery, CustomerRow, InsightsOverview, InsightsRange,
    SegmentSummary, SpendRange, VisitRange,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::paging::{PageQuery, paginate};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Reporting period shared by the insight views.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RangeParams {
    #[serde(default)]
    #[param(value_type = Option<InsightsRange>)]
    pub range: InsightsRange,
}

/// Customer list filters.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CustomerParams {
    /// Case-insensitive match on name, phone, or email.
    pub search: Option<String>,
    #[serde(default)]
    #[param(value_type = Option<VisitRange>)]
    pub visits: VisitRange,
    #[serde(default)]
    #[param(value_type = Option<SpendRange>)]
    pub spend: SpendRange,
}

impl From<CustomerParams> for CustomerQuery {
    fn from(params: CustomerParams) -> Self {
        Self {
            search: params.search.filter(|term| !term.trim().is_empty()),
            visits: params.visits,
            spend: params.spend,
        }
    }
}

/// Activity feed filters; every kind is shown unless switched off.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ActivityParams {
    #[serde(default)]
    #[param(value_type = Option<InsightsRange>)]
    pub range: InsightsRange,
    pub visits: Option<bool>,
    pub campaigns: Option<bool>,
    pub redemptions: Option<bool>,
    pub feedback: Option<bool>,
    pub points: Option<bool>,
}

impl ActivityParams {
    fn filter(&self) -> ActivityFilter {
        let shown = |flag: Option<bool>| flag.unwrap_or(true);
        ActivityFilter {
            visits: shown(self.visits),
            campaigns: shown(self.campaigns),
            redemptions: shown(self.redemptions),
            feedback: shown(self.feedback),
            points: shown(self.points),
        }
    }
}

/// Customer counts and averages for the period.
#[utoipa::path(
    get,
    path = "/api/v1/insights/overview",
    params(RangeParams),
    responses(
        (status = 200, description = "Insights overview", body = InsightsOverview),
        (status = 400, description = "Unknown range", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["insights"],
    operation_id = "getInsightsOverview"
)]
#[get("/insights/overview")]
pub async fn get_overview(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<RangeParams>,
) -> ApiResult<web::Json<InsightsOverview>> {
    let owner = session.require_account_id(state.now())?;
    let overview = state.insights.overview(&owner, query.range).await?;
    Ok(web::Json(overview))
}

/// Customers grouped into the ten segments.
#[utoipa::path(
    get,
    path = "/api/v1/insights/segments",
    params(RangeParams),
    responses(
        (status = 200, description = "Segment summaries", body = [SegmentSummary]),
        (status = 400, description = "Unknown range", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["insights"],
    operation_id = "listSegments"
)]
#[get("/insights/segments")]
pub async fn list_segments(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<RangeParams>,
) -> ApiResult<web::Json<Vec<SegmentSummary>>> {
    let owner = session.require_account_id(state.now())?;
    let segments = state.insights.segments(&owner, query.range).await?;
    Ok(web::Json(segments))
}

/// Filtered customer list, one page at a time.
#[utoipa::path(
    get,
    path = "/api/v1/insights/customers",
    params(CustomerParams, PageQuery),
    responses(
        (status = 200, description = "Customer page with cursor links"),
        (status = 400, description = "Invalid filter or cursor", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["insights"],
    operation_id = "listCustomers"
)]
#[get("/insights/customers")]
pub async fn list_customers(
    request: HttpRequest,
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<CustomerParams>,
    page: web::Query<PageParams>,
) -> ApiResult<web::Json<Paginated<CustomerRow>>> {
    let owner = session.require_account_id(state.now())?;
    let rows = state
        .insights
        .customers(&owner, query.into_inner().into())
        .await?;
    let page = paginate(&request, &page, rows, CustomerRow::key)?;
    Ok(web::Json(page))
}

/// Most recent customer events, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/insights/activity",
    params(ActivityParams),
    responses(
        (status = 200, description = "Activity feed", body = [ActivityEvent]),
        (status = 400, description = "Invalid filter", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["insights"],
    operation_id = "listActivity"
)]
#[get("/insights/activity")]
pub async fn list_activity(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<ActivityParams>,
) -> ApiResult<web::Json<Vec<ActivityEvent>>> {
    let owner = session.require_account_id(state.now())?;
    let events = state
        .insights
        .activity(&owner, query.filter(), query.range)
        .await?;
    Ok(web::Json(events))
}

/// Register the insight routes on a scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(get_overview)
        .service(list_segments)
        .service(list_customers)
        .service(list_activity);
}
