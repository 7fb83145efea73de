//! Tests for the account service.

use chrono::{DateTime, Duration, TimeZone, Utc};
use mockable::MockClock;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ErrorCode;
use crate::domain::ports::{LoginAttemptStoreError, MockAccountRepository, MockLoginAttemptStore};
use crate::domain::{FirstName, SignupForm};

#[fixture]
fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

fn clock(now: DateTime<Utc>) -> Arc<dyn Clock> {
    let mut clock = MockClock::new();
    clock.expect_utc().return_const(now);
    Arc::new(clock)
}

fn stored(email: &str, password: &str) -> StoredAccount {
    StoredAccount {
        account: Account {
            id: AccountId::random(),
            email: EmailAddress::new(email).expect("valid email"),
            first_name: Some(FirstName::new("Asha").expect("valid name")),
            created_at: Utc::now(),
        },
        password: PasswordHash::derive(password),
    }
}

fn credentials(password: &str) -> LoginCredentials {
    LoginCredentials::try_from_parts("owner@example.com", password, false)
        .expect("credentials shape")
}

fn service(
    accounts: MockAccountRepository,
    attempts: MockLoginAttemptStore,
    now: DateTime<Utc>,
) -> AuthService<MockAccountRepository, MockLoginAttemptStore> {
    AuthService::new(
        Arc::new(accounts),
        Arc::new(attempts),
        LoginThrottlePolicy::new(3, 15),
        clock(now),
    )
}

#[rstest]
#[tokio::test]
async fn signup_creates_account_and_returns_profile(now: DateTime<Utc>) {
    let mut accounts = MockAccountRepository::new();
    accounts
        .expect_create()
        .withf(|stored| {
            stored.account.email.as_ref() == "owner@example.com"
                && stored.password.verify("correct horse")
        })
        .times(1)
        .return_once(|_| Ok(()));
    let request = SignupRequest::try_from_form(SignupForm {
        email: "Owner@Example.com",
        password: "correct horse",
        confirm_password: "correct horse",
        first_name: "Asha",
    })
    .expect("valid form");

    let profile = service(accounts, MockLoginAttemptStore::new(), now)
        .signup(request)
        .await
        .expect("signup succeeds");

    assert_eq!(profile.first_name, "Asha");
    assert_eq!(profile.role, "admin");
}

#[rstest]
#[tokio::test]
async fn signup_with_registered_email_conflicts(now: DateTime<Utc>) {
    let mut accounts = MockAccountRepository::new();
    accounts
        .expect_create()
        .return_once(|_| Err(AccountRepositoryError::duplicate_email("owner@example.com")));
    let request = SignupRequest::try_from_form(SignupForm {
        email: "owner@example.com",
        password: "password1",
        confirm_password: "password1",
        first_name: "Asha",
    })
    .expect("valid form");

    let err = service(accounts, MockLoginAttemptStore::new(), now)
        .signup(request)
        .await
        .expect_err("duplicate email");

    assert_eq!(err.code(), ErrorCode::Conflict);
    assert_eq!(err.message(), DUPLICATE_EMAIL_MESSAGE);
}

#[rstest]
#[tokio::test]
async fn login_clears_previous_failures(now: DateTime<Utc>) {
    let account = stored("owner@example.com", "password1");
    let mut accounts = MockAccountRepository::new();
    accounts
        .expect_find_by_email()
        .return_once(move |_| Ok(Some(account)));
    let mut attempts = MockLoginAttemptStore::new();
    attempts.expect_load().return_once(move |_| {
        Ok(Some(LoginAttempts {
            failures: 2,
            last_failure_at: now - Duration::minutes(1),
            locked_until: None,
        }))
    });
    attempts.expect_clear().times(1).return_once(|_| Ok(()));

    let profile = service(accounts, attempts, now)
        .login(credentials("password1"))
        .await
        .expect("login succeeds");
    assert_eq!(profile.email.as_ref(), "owner@example.com");
}

#[rstest]
#[case::unknown_email(None)]
#[case::wrong_password(Some("other-password"))]
#[tokio::test]
async fn bad_credentials_are_recorded(now: DateTime<Utc>, #[case] stored_password: Option<&str>) {
    let account = stored_password.map(|p| stored("owner@example.com", p));
    let mut accounts = MockAccountRepository::new();
    accounts
        .expect_find_by_email()
        .return_once(move |_| Ok(account));
    let mut attempts = MockLoginAttemptStore::new();
    attempts.expect_load().return_once(|_| Ok(None));
    attempts
        .expect_save()
        .withf(|_, a| a.failures == 1 && a.locked_until.is_none())
        .times(1)
        .return_once(|_, _| Ok(()));

    let err = service(accounts, attempts, now)
        .login(credentials("password1"))
        .await
        .expect_err("rejected");
    assert_eq!(err.code(), ErrorCode::Unauthorized);
    assert_eq!(err.message(), INVALID_CREDENTIALS_MESSAGE);
}

#[rstest]
#[tokio::test]
async fn final_failure_locks_the_email(now: DateTime<Utc>) {
    let mut accounts = MockAccountRepository::new();
    accounts.expect_find_by_email().return_once(|_| Ok(None));
    let mut attempts = MockLoginAttemptStore::new();
    attempts.expect_load().return_once(move |_| {
        Ok(Some(LoginAttempts {
            failures: 2,
            last_failure_at: now,
            locked_until: None,
        }))
    });
    attempts.expect_save().return_once(|_, _| Ok(()));

    let err = service(accounts, attempts, now)
        .login(credentials("password1"))
        .await
        .expect_err("locked");
    assert_eq!(err.code(), ErrorCode::Forbidden);
    assert_eq!(
        err.message(),
        "Temporarily locked—try again in 15 minutes or reset your password."
    );
}

#[rstest]
#[tokio::test]
async fn locked_email_is_refused_before_lookup(now: DateTime<Utc>) {
    let mut accounts = MockAccountRepository::new();
    accounts.expect_find_by_email().times(0);
    let mut attempts = MockLoginAttemptStore::new();
    attempts.expect_load().return_once(move |_| {
        Ok(Some(LoginAttempts {
            failures: 3,
            last_failure_at: now,
            locked_until: Some(now + Duration::seconds(61)),
        }))
    });

    let err = service(accounts, attempts, now)
        .login(credentials("password1"))
        .await
        .expect_err("locked");
    assert_eq!(
        err.message(),
        "Temporarily locked—try again in 2 minutes or reset your password."
    );
}

#[rstest]
#[tokio::test]
async fn unavailable_store_does_not_block_login(now: DateTime<Utc>) {
    let account = stored("owner@example.com", "password1");
    let mut accounts = MockAccountRepository::new();
    accounts
        .expect_find_by_email()
        .return_once(move |_| Ok(Some(account)));
    let mut attempts = MockLoginAttemptStore::new();
    attempts
        .expect_load()
        .return_once(|_| Err(LoginAttemptStoreError::unavailable("down")));
    attempts.expect_clear().times(0);

    let result = service(accounts, attempts, now)
        .login(credentials("password1"))
        .await;
    assert!(result.is_ok());
}

#[rstest]
#[tokio::test]
async fn repository_outage_maps_to_service_unavailable(now: DateTime<Utc>) {
    let mut accounts = MockAccountRepository::new();
    accounts
        .expect_find_by_id()
        .return_once(|_| Err(AccountRepositoryError::connection("pool exhausted")));

    let err = service(accounts, MockLoginAttemptStore::new(), now)
        .profile(&AccountId::random())
        .await
        .expect_err("unavailable");
    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
}
