//! Account signup, login, and profile services.
//!
//! Failed logins are throttled per email through [`LoginAttemptStore`]. The
//! store is advisory: when it cannot be reached the attempt proceeds and the
//! outage is logged.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::ports::{
    AccountRepository, AccountRepositoryError, AuthCommand, LoginAttemptStore, StoredAccount,
};
use crate::domain::{
    Account, AccountId, AccountProfile, EmailAddress, Error, LoginAttempts, LoginCredentials,
    LoginThrottlePolicy, PasswordHash, SignupRequest, ThrottleDecision, lockout_message,
    remaining_minutes,
};

/// Message for an unknown email or a wrong password.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid email or password. Please try again.";
/// Message for signing up with a registered email.
pub const DUPLICATE_EMAIL_MESSAGE: &str =
    "An account with this email already exists. Please sign in instead.";

fn map_account_error(error: AccountRepositoryError) -> Error {
    match error {
        AccountRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("account repository unavailable: {message}"))
        }
        AccountRepositoryError::Query { message } => {
            Error::internal(format!("account repository error: {message}"))
        }
        AccountRepositoryError::DuplicateEmail { .. } => Error::conflict(DUPLICATE_EMAIL_MESSAGE)
            .with_details(json!({ "field": "email", "code": "duplicate_email" })),
    }
}

fn locked_error(minutes: i64) -> Error {
    Error::forbidden(lockout_message(minutes)).with_details(json!({
        "code": "account_locked",
        "retryAfterMinutes": minutes,
    }))
}

/// Account service implementing [`AuthCommand`].
#[derive(Clone)]
pub struct AuthService<A, L> {
    accounts: Arc<A>,
    attempts: Arc<L>,
    policy: LoginThrottlePolicy,
    clock: Arc<dyn Clock>,
}

impl<A, L> AuthService<A, L> {
    /// Create a service over the account repository and attempt store.
    pub fn new(
        accounts: Arc<A>,
        attempts: Arc<L>,
        policy: LoginThrottlePolicy,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            accounts,
            attempts,
            policy,
            clock,
        }
    }
}

impl<A, L> AuthService<A, L>
where
    A: AccountRepository,
    L: LoginAttemptStore,
{
    async fn load_attempts(&self, email: &EmailAddress) -> Option<LoginAttempts> {
        match self.attempts.load(email).await {
            Ok(attempts) => attempts,
            Err(err) => {
                warn!(error = %err, "login throttling skipped");
                None
            }
        }
    }

    async fn reject(&self, email: &EmailAddress, previous: Option<LoginAttempts>) -> Error {
        let now = self.clock.utc();
        let attempts = self.policy.record_failure(previous, now);
        if let Err(err) = self.attempts.save(email, &attempts).await {
            warn!(error = %err, "failed to record login failure");
        }
        match attempts.locked_until {
            Some(until) => {
                info!(failures = attempts.failures, "login locked after repeated failures");
                locked_error(remaining_minutes(until, now))
            }
            None => Error::unauthorized(INVALID_CREDENTIALS_MESSAGE),
        }
    }
}

#[async_trait]
impl<A, L> AuthCommand for AuthService<A, L>
where
    A: AccountRepository,
    L: LoginAttemptStore,
{
    async fn signup(&self, request: SignupRequest) -> Result<AccountProfile, Error> {
        let stored = StoredAccount {
            account: Account {
                id: AccountId::random(),
                email: request.email().clone(),
                first_name: Some(request.first_name().clone()),
                created_at: self.clock.utc(),
            },
            password: PasswordHash::derive(request.password()),
        };
        self.accounts
            .create(&stored)
            .await
            .map_err(map_account_error)?;
        info!(account_id = %stored.account.id, "account created");
        Ok(AccountProfile::from(&stored.account))
    }

    async fn login(&self, credentials: LoginCredentials) -> Result<AccountProfile, Error> {
        let email = credentials.email();
        let previous = self.load_attempts(email).await;
        if let ThrottleDecision::Locked { until } =
            self.policy.check(previous.as_ref(), self.clock.utc())
        {
            return Err(locked_error(remaining_minutes(until, self.clock.utc())));
        }

        let stored = self
            .accounts
            .find_by_email(email)
            .await
            .map_err(map_account_error)?;
        let Some(stored) = stored.filter(|s| s.password.verify(credentials.password())) else {
            return Err(self.reject(email, previous).await);
        };

        if previous.is_some() {
            if let Err(err) = self.attempts.clear(email).await {
                warn!(error = %err, "failed to clear login failures");
            }
        }
        Ok(AccountProfile::from(&stored.account))
    }

    async fn profile(&self, id: &AccountId) -> Result<AccountProfile, Error> {
        self.accounts
            .find_by_id(id)
            .await
            .map_err(map_account_error)?
            .map(|account| AccountProfile::from(&account))
            .ok_or_else(|| Error::unauthorized("account no longer exists"))
    }
}

#[cfg(test)]
#[path = "auth_service_tests.rs"]
mod tests;
