//! Driving port for signup, login, and profile reads.
//!
//! Inbound adapters call this port with already-validated forms; the
//! service owns password hashing and failed-login throttling.

use async_trait::async_trait;

use crate::domain::{AccountId, AccountProfile, Error, LoginCredentials, SignupRequest};

/// Account use-cases driven by the HTTP adapter.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthCommand: Send + Sync {
    /// Create an account and return its profile.
    async fn signup(&self, request: SignupRequest) -> Result<AccountProfile, Error>;

    /// Verify credentials and return the signed-in profile.
    async fn login(&self, credentials: LoginCredentials) -> Result<AccountProfile, Error>;

    /// Profile for an existing account.
    async fn profile(&self, id: &AccountId) -> Result<AccountProfile, Error>;
}
