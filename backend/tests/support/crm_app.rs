//! In-process CRM app over in-memory adapters for behaviour tests.
//!
//! Each request spins up a fresh service over the same shared state and
//! session key, so cookies and stored data survive between steps.

use std::sync::Arc;

use actix_web::cookie::{Cookie, Key, SameSite};
use actix_web::http::Method;
use actix_web::{App, test as actix_test, web};
use mockable::{Clock, DefaultClock};
use muncho_crm::Trace;
use muncho_crm::domain::{
    AuthService, CampaignService, LoginThrottlePolicy, OnboardingService, ReportingService,
    SessionService,
};
use muncho_crm::inbound::http::error::{json_config, query_config};
use muncho_crm::inbound::http::session_config::{SESSION_COOKIE_NAME, SessionSettings};
use muncho_crm::inbound::http::state::{HttpState, HttpStatePorts};
use muncho_crm::inbound::http::{
    auth, bootstrap, campaigns, dashboard, insights, loyalty, onboarding,
};
use muncho_crm::outbound::memory::{
    InMemoryAccountRepository, InMemoryCampaignRepository, InMemoryCrmRecords,
    InMemoryLoginAttemptStore, InMemoryRestaurantRepository,
};
use serde_json::Value;

/// Failed logins allowed before lockout in scenarios.
pub const MAX_FAILED_LOGINS: u32 = 3;

/// Status and JSON body captured from one request.
#[derive(Debug, Clone)]
pub struct Captured {
    pub status: u16,
    pub body: Value,
}

/// Shared state plus the cookie jar of a single client.
pub struct CrmApp {
    state: web::Data<HttpState>,
    session: SessionSettings,
    cookie: Option<Cookie<'static>>,
}

impl CrmApp {
    /// Build every service over fresh in-memory stores.
    pub fn in_memory() -> Self {
        let throttle = LoginThrottlePolicy::new(MAX_FAILED_LOGINS, 15);
        let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
        let accounts = Arc::new(InMemoryAccountRepository::new());
        let restaurants = Arc::new(InMemoryRestaurantRepository::new());
        let campaign_store = Arc::new(InMemoryCampaignRepository::new());
        let records = Arc::new(InMemoryCrmRecords::new());

        let campaign_service = Arc::new(CampaignService::new(
            campaign_store.clone(),
            restaurants.clone(),
            records.clone(),
            clock.clone(),
            false,
        ));
        let reporting = Arc::new(ReportingService::new(
            restaurants.clone(),
            records,
            campaign_store,
            clock.clone(),
        ));
        let ports = HttpStatePorts {
            auth: Arc::new(AuthService::new(
                accounts.clone(),
                Arc::new(InMemoryLoginAttemptStore::new(throttle)),
                throttle,
                clock.clone(),
            )),
            session: Arc::new(SessionService::new(accounts, restaurants.clone())),
            onboarding: Arc::new(OnboardingService::new(restaurants, clock.clone())),
            campaigns: campaign_service.clone(),
            campaigns_query: campaign_service,
            dashboard: reporting.clone(),
            loyalty: reporting.clone(),
            insights: reporting,
        };

        Self {
            state: web::Data::new(HttpState::with_clock(ports, false, clock)),
            session: SessionSettings {
                key: Key::generate(),
                cookie_secure: false,
                same_site: SameSite::Lax,
            },
            cookie: None,
        }
    }

    /// Whether a session cookie is held.
    pub fn has_session(&self) -> bool {
        self.cookie.is_some()
    }

    /// Send one request and remember any session cookie it sets.
    pub fn request(&mut self, method: Method, path: &str, payload: Option<Value>) -> Captured {
        let state = self.state.clone();
        let middleware = self.session.clone();
        let cookie = self.cookie.clone();
        let path = path.to_owned();

        let (captured, set_cookie) = actix_rt::System::new().block_on(async move {
            let app = actix_test::init_service(
                App::new()
                    .app_data(state)
                    .app_data(json_config())
                    .app_data(query_config())
                    .wrap(Trace)
                    .service(
                        web::scope("/api/v1")
                            .wrap(middleware.middleware())
                            .configure(|cfg| {
                                auth::configure(cfg);
                                bootstrap::configure(cfg);
                                onboarding::configure(cfg);
                                campaigns::configure(cfg);
                                dashboard::configure(cfg);
                                loyalty::configure(cfg);
                                insights::configure(cfg);
                            }),
                    ),
            )
            .await;

            let mut request = actix_test::TestRequest::default()
                .method(method)
                .uri(&path);
            if let Some(cookie) = cookie {
                request = request.cookie(cookie);
            }
            if let Some(payload) = payload {
                request = request.set_json(payload);
            }
            let response = actix_test::call_service(&app, request.to_request()).await;
            let status = response.status().as_u16();
            let set_cookie = response
                .response()
                .cookies()
                .find(|c| c.name() == SESSION_COOKIE_NAME)
                .map(Cookie::into_owned);
            let bytes = actix_test::read_body(response).await;
            let body = if bytes.is_empty() {
                Value::Null
            } else {
                serde_json::from_slice(&bytes).expect("json body")
            };
            (Captured { status, body }, set_cookie)
        });

        if let Some(cookie) = set_cookie {
            self.cookie = (!cookie.value().is_empty()).then_some(cookie);
        }
        captured
    }
}
