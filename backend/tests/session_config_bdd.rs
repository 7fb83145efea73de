//! Behaviour tests for reading session cookie settings at startup.
//
// rstest-bdd generates guard variables with double underscores, which trips
// the non_snake_case lint under -D warnings.
#![allow(non_snake_case)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::io::Write;

use actix_web::cookie::SameSite;
use mockable::MockEnv;
use muncho_crm::inbound::http::session_config::{
    ALLOW_EPHEMERAL_ENV, BuildMode, COOKIE_SECURE_ENV, KEY_FILE_ENV, SAMESITE_ENV,
    SessionConfigError, SessionSettings, session_settings_from_env,
};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tempfile::NamedTempFile;

/// Environment an operator would export before starting the server.
struct Deployment {
    mode: BuildMode,
    vars: HashMap<&'static str, String>,
    key_file: Option<NamedTempFile>,
}

impl Deployment {
    fn replace_key_file(&mut self, len: usize) {
        let mut file = NamedTempFile::new().expect("temp key file");
        file.write_all(&vec![b'k'; len]).expect("write key file");
        self.vars
            .insert(KEY_FILE_ENV, file.path().to_string_lossy().into_owned());
        self.key_file = Some(file);
    }

    fn env(&self) -> MockEnv {
        let vars = self.vars.clone();
        let mut env = MockEnv::new();
        env.expect_string()
            .times(0..)
            .returning(move |name| vars.get(name).cloned());
        env
    }
}

struct StartupWorld {
    deployment: RefCell<Deployment>,
    outcome: RefCell<Option<Result<SessionSettings, SessionConfigError>>>,
}

impl StartupWorld {
    fn settings(&self) -> SessionSettings {
        match self.outcome.borrow().as_ref().expect("settings were read") {
            Ok(settings) => settings.clone(),
            Err(error) => panic!("expected startup to succeed, got: {error}"),
        }
    }

    fn refusal(&self) -> String {
        match self.outcome.borrow().as_ref().expect("settings were read") {
            Ok(settings) => panic!("expected startup to be refused, got {settings:?}"),
            Err(error) => error.to_string(),
        }
    }
}

fn toggle_name(raw: &str) -> &'static str {
    [COOKIE_SECURE_ENV, SAMESITE_ENV, ALLOW_EPHEMERAL_ENV, KEY_FILE_ENV]
        .into_iter()
        .find(|name| *name == raw)
        .unwrap_or_else(|| panic!("unknown session toggle {raw}"))
}

#[fixture]
fn world() -> StartupWorld {
    StartupWorld {
        deployment: RefCell::new(Deployment {
            mode: BuildMode::Release,
            vars: HashMap::new(),
            key_file: None,
        }),
        outcome: RefCell::new(None),
    }
}

#[given("a release build with a 64 byte key file and secure cookie toggles")]
fn a_secure_release_build(world: &StartupWorld) {
    let mut deployment = world.deployment.borrow_mut();
    deployment.mode = BuildMode::Release;
    deployment.vars.insert(COOKIE_SECURE_ENV, "1".to_owned());
    deployment.vars.insert(SAMESITE_ENV, "Strict".to_owned());
    deployment.vars.insert(ALLOW_EPHEMERAL_ENV, "0".to_owned());
    deployment.replace_key_file(64);
}

#[given("a debug build with an empty environment")]
fn a_debug_build_with_an_empty_environment(world: &StartupWorld) {
    let mut deployment = world.deployment.borrow_mut();
    deployment.mode = BuildMode::Debug;
    deployment.vars.clear();
    deployment.key_file = None;
}

#[given("the operator leaves {name} unset")]
fn the_operator_leaves_unset(world: &StartupWorld, name: String) {
    world
        .deployment
        .borrow_mut()
        .vars
        .remove(toggle_name(&name));
}

#[given("the operator sets {name} to {value}")]
fn the_operator_sets(world: &StartupWorld, name: String, value: String) {
    world
        .deployment
        .borrow_mut()
        .vars
        .insert(toggle_name(&name), value.trim_matches('"').to_owned());
}

#[given("the key file holds only {len} bytes")]
fn the_key_file_holds_only(world: &StartupWorld, len: usize) {
    world.deployment.borrow_mut().replace_key_file(len);
}

#[when("the server reads its session settings")]
fn the_server_reads_its_session_settings(world: &StartupWorld) {
    let deployment = world.deployment.borrow();
    let outcome = session_settings_from_env(&deployment.env(), deployment.mode);
    *world.outcome.borrow_mut() = Some(outcome);
}

#[then("startup succeeds with Strict cookies marked secure")]
fn startup_succeeds_with_strict_cookies(world: &StartupWorld) {
    let settings = world.settings();
    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Strict);
}

#[then("startup succeeds with Lax cookies marked secure")]
fn startup_succeeds_with_lax_cookies(world: &StartupWorld) {
    let settings = world.settings();
    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Lax);
}

#[then("startup is refused with a message mentioning {text}")]
fn startup_is_refused(world: &StartupWorld, text: String) {
    let message = world.refusal();
    let expected = text.trim_matches('"');
    assert!(message.contains(expected), "refusal was: {message}");
}

#[scenario(
    path = "tests/features/session_config.feature",
    name = "A complete release configuration starts"
)]
fn a_complete_release_configuration_starts(world: StartupWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/session_config.feature",
    name = "Forgetting the secure-cookie toggle stops startup"
)]
fn forgetting_the_secure_cookie_toggle_stops_startup(world: StartupWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/session_config.feature",
    name = "Temporary keys are refused in release builds"
)]
fn temporary_keys_are_refused_in_release_builds(world: StartupWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/session_config.feature",
    name = "Cross-site cookies need the secure flag"
)]
fn cross_site_cookies_need_the_secure_flag(world: StartupWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/session_config.feature",
    name = "A truncated key file stops startup"
)]
fn a_truncated_key_file_stops_startup(world: StartupWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/session_config.feature",
    name = "A debug build starts without any session settings"
)]
fn a_debug_build_starts_without_any_session_settings(world: StartupWorld) {
    drop(world);
}
