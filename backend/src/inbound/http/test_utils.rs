//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpResponse, test as actix_test, web};
use chrono::{DateTime, TimeZone, Utc};
use mockable::MockClock;

use super::ApiResult;
use super::error::{json_config, query_config};
use super::session::SessionContext;
use super::session_config::SESSION_COOKIE_NAME;
use super::state::{HttpState, HttpStatePorts};
use crate::domain::AccountId;
use crate::domain::ports::{
    MockAuthCommand, MockCampaignCommand, MockCampaignQuery, MockDashboardQuery,
    MockInsightsQuery, MockLoyaltyQuery, MockOnboardingCommand, MockSessionBootstrap,
};

/// Account signed in by [`signed_in_cookie`].
pub const TEST_ACCOUNT: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

/// Route that signs [`TEST_ACCOUNT`] in without touching the auth port.
pub const TEST_SIGN_IN_PATH: &str = "/test/sign-in";

/// Build a session middleware configured for tests.
///
/// Uses a fresh key per invocation and disables the `Secure` flag so plain
/// HTTP test requests carry the cookie back.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name(SESSION_COOKIE_NAME.to_owned())
        .cookie_secure(false)
        .build()
}

/// Fixed instant used by the handler clock.
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 5, 20, 18, 0, 0)
        .single()
        .expect("valid timestamp")
}

/// Parsed [`TEST_ACCOUNT`].
pub fn test_account() -> AccountId {
    AccountId::new(TEST_ACCOUNT).expect("fixture account id")
}

/// One mock per driving port; set expectations, then call
/// [`MockPorts::into_state`].
#[derive(Default)]
pub struct MockPorts {
    pub auth: MockAuthCommand,
    pub session: MockSessionBootstrap,
    pub onboarding: MockOnboardingCommand,
    pub campaigns: MockCampaignCommand,
    pub campaigns_query: MockCampaignQuery,
    pub dashboard: MockDashboardQuery,
    pub loyalty: MockLoyaltyQuery,
    pub insights: MockInsightsQuery,
    pub whatsapp_header: bool,
}

impl MockPorts {
    /// Handler state over these mocks with a clock fixed at [`fixed_now`].
    pub fn into_state(self) -> web::Data<HttpState> {
        let mut clock = MockClock::new();
        clock.expect_utc().return_const(fixed_now());
        let ports = HttpStatePorts {
            auth: Arc::new(self.auth),
            session: Arc::new(self.session),
            onboarding: Arc::new(self.onboarding),
            campaigns: Arc::new(self.campaigns),
            campaigns_query: Arc::new(self.campaigns_query),
            dashboard: Arc::new(self.dashboard),
            loyalty: Arc::new(self.loyalty),
            insights: Arc::new(self.insights),
        };
        web::Data::new(HttpState::with_clock(
            ports,
            self.whatsapp_header,
            Arc::new(clock),
        ))
    }
}

/// Sign [`TEST_ACCOUNT`] in for a short session.
pub async fn test_sign_in(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    session.persist_account(&test_account(), false, state.now())?;
    Ok(HttpResponse::NoContent().finish())
}

/// App over `state` with the test session middleware, the sign-in helper
/// route, and `routes` mounted under `/api/v1`.
pub fn test_app<F>(
    state: web::Data<HttpState>,
    routes: F,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    F: FnOnce(&mut web::ServiceConfig),
{
    App::new()
        .app_data(state)
        .app_data(json_config())
        .app_data(query_config())
        .wrap(test_session_middleware())
        .route(TEST_SIGN_IN_PATH, web::post().to(test_sign_in))
        .service(web::scope("/api/v1").configure(routes))
}

/// Call [`TEST_SIGN_IN_PATH`] and return the session cookie it sets.
pub async fn signed_in_cookie<S>(app: &S) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let response = actix_test::call_service(
        app,
        actix_test::TestRequest::post()
            .uri(TEST_SIGN_IN_PATH)
            .to_request(),
    )
    .await;
    assert!(response.status().is_success(), "test sign-in failed");
    session_cookie(&response)
}

/// The session cookie set on `response`.
pub fn session_cookie<B>(response: &ServiceResponse<B>) -> Cookie<'static> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE_NAME)
        .expect("session cookie set")
        .into_owned()
}
