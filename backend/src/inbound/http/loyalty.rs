//! Loyalty overview handler.
//!
//! ```text
//! GET /api/v1/loyalty?range=Last%2090%20days
//! ```

use actix_web::{get, web};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::domain::{LoyaltyOverview, LoyaltyRange};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Loyalty query parameters.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LoyaltyParams {
    #[serde(default)]
    #[param(value_type = Option<LoyaltyRange>)]
    pub range: LoyaltyRange,
}

/// Enrolment, redemption, and tier figures for the loyalty page.
#[utoipa::path(
    get,
    path = "/api/v1/loyalty",
    params(LoyaltyParams),
    responses(
        (status = 200, description = "Loyalty overview", body = LoyaltyOverview),
        (status = 400, description = "Unknown range", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["loyalty"],
    operation_id = "getLoyaltyOverview"
)]
#[get("/loyalty")]
pub async fn get_loyalty(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<LoyaltyParams>,
) -> ApiResult<web::Json<LoyaltyOverview>> {
    let owner = session.require_account_id(state.now())?;
    let overview = state.loyalty.overview(&owner, query.range).await?;
    Ok(web::Json(overview))
}

/// Register the loyalty route on a scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(get_loyalty);
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use mockall::predicate::eq;
    use serde_json::Value;

    use super::*;
    use crate::domain::LoyaltyInputs;
    use crate::inbound::http::test_utils::{
        MockPorts, fixed_now, signed_in_cookie, test_account, test_app,
    };

    #[actix_web::test]
    async fn range_defaults_to_thirty_days() {
        let mut ports = MockPorts::default();
        ports
            .loyalty
            .expect_overview()
            .with(eq(test_account()), eq(LoyaltyRange::Last30Days))
            .times(1)
            .return_once(|_, range| {
                Ok(LoyaltyOverview::compute(
                    &LoyaltyInputs::default(),
                    range,
                    fixed_now(),
                ))
            });
        let app = actix_test::init_service(test_app(ports.into_state(), configure)).await;
        let cookie = signed_in_cookie(&app).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/loyalty")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["dateRange"], "Last 30 Days");
        assert_eq!(body["enrolledCustomers"], 0);
    }

    #[actix_web::test]
    async fn unknown_range_is_rejected() {
        let app =
            actix_test::init_service(test_app(MockPorts::default().into_state(), configure)).await;
        let cookie = signed_in_cookie(&app).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/loyalty?range=Forever")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
