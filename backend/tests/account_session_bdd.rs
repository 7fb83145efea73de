//! Behaviour tests for signup, onboarding, login lockout, and the emergency
//! reset, driven through the HTTP layer over in-memory stores.
//
// rstest-bdd generates guard variables with double underscores, which trips
// the non_snake_case lint under -D warnings.
#![allow(non_snake_case)]

#[path = "support/crm_app.rs"]
mod crm_app;

use std::cell::RefCell;

use actix_web::http::Method;
use crm_app::{Captured, CrmApp};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use serde_json::{Value, json};

const PASSWORD: &str = "correct-horse";

struct AccountWorld {
    app: RefCell<CrmApp>,
    email: RefCell<Option<String>>,
    last: RefCell<Option<Captured>>,
}

impl AccountWorld {
    fn new() -> Self {
        Self {
            app: RefCell::new(CrmApp::in_memory()),
            email: RefCell::new(None),
            last: RefCell::new(None),
        }
    }

    fn send(&self, method: Method, path: &str, payload: Option<Value>) -> Captured {
        let captured = self.app.borrow_mut().request(method, path, payload);
        *self.last.borrow_mut() = Some(captured.clone());
        captured
    }

    fn signup(&self, email: &str) -> Captured {
        *self.email.borrow_mut() = Some(email.to_owned());
        self.send(
            Method::POST,
            "/api/v1/auth/signup",
            Some(json!({
                "email": email,
                "password": PASSWORD,
                "confirmPassword": PASSWORD,
                "firstName": "Owner"
            })),
        )
    }

    fn login(&self, password: &str) -> Captured {
        let email = self.email.borrow().clone().expect("signed-up email");
        self.send(
            Method::POST,
            "/api/v1/auth/login",
            Some(json!({ "email": email, "password": password })),
        )
    }

    fn last(&self) -> Captured {
        self.last.borrow().clone().expect("a response was recorded")
    }
}

#[fixture]
fn world() -> AccountWorld {
    AccountWorld::new()
}

#[given("an in-memory CRM server")]
fn an_in_memory_crm_server(world: &AccountWorld) {
    assert!(!world.app.borrow().has_session());
}

#[given("a signed-up owner {email}")]
fn a_signed_up_owner(world: &AccountWorld, email: String) {
    let captured = world.signup(email.trim_matches('"'));
    assert_eq!(captured.status, 201, "signup failed: {}", captured.body);
}

#[when("the owner signs up as {email}")]
fn the_owner_signs_up_as(world: &AccountWorld, email: String) {
    world.signup(email.trim_matches('"'));
}

#[when("the owner completes onboarding for {name}")]
fn the_owner_completes_onboarding_for(world: &AccountWorld, name: String) {
    world.send(
        Method::POST,
        "/api/v1/onboarding/complete",
        Some(json!({
            "name": name.trim_matches('"'),
            "city": "Pune",
            "pincode": "411001",
            "restaurantType": "casual-dining",
            "numberOfOutlets": 1,
            "goals": ["repeat-visits"]
        })),
    );
}

#[when("the owner saves onboarding step {step}")]
fn the_owner_saves_onboarding_step(world: &AccountWorld, step: u8) {
    world.send(
        Method::PUT,
        "/api/v1/onboarding/progress",
        Some(json!({ "step": step, "draft": { "name": "Half Done" } })),
    );
}

#[when("the owner fails to log in {count} times")]
fn the_owner_fails_to_log_in(world: &AccountWorld, count: u32) {
    for _ in 0..count {
        world.login("wrong-password");
    }
}

#[when("the owner logs in with the correct password")]
fn the_owner_logs_in_with_the_correct_password(world: &AccountWorld) {
    world.login(PASSWORD);
}

#[when("the owner requests an emergency reset")]
fn the_owner_requests_an_emergency_reset(world: &AccountWorld) {
    world.send(Method::POST, "/api/v1/session/reset", None);
}

#[then("the response status is {status}")]
fn the_response_status_is(world: &AccountWorld, status: u16) {
    let last = world.last();
    assert_eq!(last.status, status, "unexpected body: {}", last.body);
}

#[then("the session view is {view}")]
fn the_session_view_is(world: &AccountWorld, view: String) {
    let body = world.last().body;
    let actual = body
        .pointer("/session/view")
        .or_else(|| body.get("view"))
        .and_then(Value::as_str);
    assert_eq!(actual, Some(view.trim_matches('"')));
}

#[then("the bootstrap view is {view}")]
fn the_bootstrap_view_is(world: &AccountWorld, view: String) {
    let captured = world.app.borrow_mut().request(Method::GET, "/api/v1/session", None);
    assert_eq!(captured.status, 200);
    assert_eq!(
        captured.body.get("view").and_then(Value::as_str),
        Some(view.trim_matches('"'))
    );
}

#[then("the dashboard is reachable")]
fn the_dashboard_is_reachable(world: &AccountWorld) {
    let captured = world
        .app
        .borrow_mut()
        .request(Method::GET, "/api/v1/dashboard", None);
    assert_eq!(captured.status, 200, "dashboard failed: {}", captured.body);
}

#[then("the saved onboarding step is {step}")]
fn the_saved_onboarding_step_is(world: &AccountWorld, step: u64) {
    let captured = world
        .app
        .borrow_mut()
        .request(Method::GET, "/api/v1/onboarding", None);
    assert_eq!(captured.status, 200);
    assert_eq!(
        captured.body.pointer("/progress/step").and_then(Value::as_u64),
        Some(step)
    );
}

#[then("the error message mentions {text}")]
fn the_error_message_mentions(world: &AccountWorld, text: String) {
    let body = world.last().body;
    let message = body
        .get("message")
        .and_then(Value::as_str)
        .expect("error message");
    assert!(message.contains(text.trim_matches('"')), "message: {message}");
}

#[scenario(
    path = "tests/features/account_session.feature",
    name = "New owner is sent to onboarding after signup"
)]
fn new_owner_is_sent_to_onboarding_after_signup(world: AccountWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/account_session.feature",
    name = "Completing onboarding opens the dashboard"
)]
fn completing_onboarding_opens_the_dashboard(world: AccountWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/account_session.feature",
    name = "Saving onboarding progress resumes later"
)]
fn saving_onboarding_progress_resumes_later(world: AccountWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/account_session.feature",
    name = "Repeated failed logins lock the email"
)]
fn repeated_failed_logins_lock_the_email(world: AccountWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/account_session.feature",
    name = "Emergency reset returns to the login view"
)]
fn emergency_reset_returns_to_the_login_view(world: AccountWorld) {
    drop(world);
}
