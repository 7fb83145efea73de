//! Port for account persistence.

use async_trait::async_trait;

use crate::domain::{Account, AccountId, EmailAddress, PasswordHash};

use super::define_port_error;

define_port_error! {
    /// Errors raised by account repository adapters.
    pub enum AccountRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "account repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "account repository query failed: {message}",
        /// Another account already uses the email.
        DuplicateEmail { email: String } => "account email already registered: {email}",
    }
}

/// Account together with its credential material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredAccount {
    pub account: Account,
    pub password: PasswordHash,
}

/// Port for creating and reading accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Insert a new account; the email must be unused.
    async fn create(&self, account: &StoredAccount) -> Result<(), AccountRepositoryError>;

    /// Find an account and its password hash by normalised email.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<StoredAccount>, AccountRepositoryError>;

    /// Find an account by identifier.
    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, AccountRepositoryError>;
}

/// Fixture implementation for tests that never reach persistence.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureAccountRepository;

#[async_trait]
impl AccountRepository for FixtureAccountRepository {
    async fn create(&self, _account: &StoredAccount) -> Result<(), AccountRepositoryError> {
        Ok(())
    }

    async fn find_by_email(
        &self,
        _email: &EmailAddress,
    ) -> Result<Option<StoredAccount>, AccountRepositoryError> {
        Ok(None)
    }

    async fn find_by_id(&self, _id: &AccountId) -> Result<Option<Account>, AccountRepositoryError> {
        Ok(None)
    }
}
