//! Process-local account storage.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::ports::{AccountRepository, AccountRepositoryError, StoredAccount};
use crate::domain::{Account, AccountId, EmailAddress};

/// [`AccountRepository`] enforcing unique emails in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAccountRepository {
    accounts: Arc<RwLock<HashMap<Uuid, StoredAccount>>>,
}

impl InMemoryAccountRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn create(&self, stored: &StoredAccount) -> Result<(), AccountRepositoryError> {
        let mut accounts = self.accounts.write().await;
        let email = &stored.account.email;
        if accounts.values().any(|existing| &existing.account.email == email) {
            return Err(AccountRepositoryError::duplicate_email(email.as_ref()));
        }
        accounts.insert(*stored.account.id.as_uuid(), stored.clone());
        Ok(())
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<StoredAccount>, AccountRepositoryError> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .values()
            .find(|stored| &stored.account.email == email)
            .cloned())
    }

    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, AccountRepositoryError> {
        let accounts = self.accounts.read().await;
        Ok(accounts.get(id.as_uuid()).map(|stored| stored.account.clone()))
    }
}
