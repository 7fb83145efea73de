//! Port for failed-login bookkeeping.

use async_trait::async_trait;

use crate::domain::{EmailAddress, LoginAttempts};

use super::define_port_error;

define_port_error! {
    /// Errors raised by login attempt stores.
    pub enum LoginAttemptStoreError {
        /// The backing store could not be reached.
        Unavailable { message: String } => "login attempt store unavailable: {message}",
    }
}

/// Keyed store of [`LoginAttempts`] records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginAttemptStore: Send + Sync {
    /// Current record for `email`, if any.
    async fn load(&self, email: &EmailAddress)
    -> Result<Option<LoginAttempts>, LoginAttemptStoreError>;

    /// Replace the record for `email`.
    async fn save(
        &self,
        email: &EmailAddress,
        attempts: &LoginAttempts,
    ) -> Result<(), LoginAttemptStoreError>;

    /// Forget `email` after a successful login.
    async fn clear(&self, email: &EmailAddress) -> Result<(), LoginAttemptStoreError>;
}
