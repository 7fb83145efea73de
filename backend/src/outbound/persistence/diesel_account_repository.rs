//! PostgreSQL-backed [`AccountRepository`].

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{AccountRepository, AccountRepositoryError, StoredAccount};
use crate::domain::{Account, AccountId, EmailAddress, FirstName, PasswordHash};

use super::error_mapping::{is_unique_violation, map_diesel_error, map_pool_error};
use super::models::{AccountRow, NewAccountRow};
use super::pool::{DbPool, PoolError};
use super::schema::accounts;

/// Diesel implementation of the account port.
#[derive(Clone)]
pub struct DieselAccountRepository {
    pool: DbPool,
}

impl DieselAccountRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> AccountRepositoryError {
    map_pool_error(error, AccountRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> AccountRepositoryError {
    map_diesel_error(
        error,
        AccountRepositoryError::query,
        AccountRepositoryError::connection,
    )
}

fn row_to_stored(row: AccountRow) -> Result<StoredAccount, AccountRepositoryError> {
    let email = EmailAddress::new(&row.email).map_err(|err| {
        AccountRepositoryError::query(format!("stored email for {} is invalid: {err}", row.id))
    })?;
    // A bad stored name only loses the greeting, never the account.
    let first_name = row.first_name.and_then(|name| match FirstName::new(&name) {
        Ok(valid) => Some(valid),
        Err(err) => {
            warn!(account_id = %row.id, error = %err, "ignoring invalid stored first name");
            None
        }
    });
    Ok(StoredAccount {
        account: Account {
            id: AccountId::from_uuid(row.id),
            email,
            first_name,
            created_at: row.created_at,
        },
        password: PasswordHash::from_parts(row.password_hash, row.password_salt),
    })
}

#[async_trait]
impl AccountRepository for DieselAccountRepository {
    async fn create(&self, stored: &StoredAccount) -> Result<(), AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let account = &stored.account;
        let row = NewAccountRow {
            id: *account.id.as_uuid(),
            email: account.email.as_ref(),
            password_hash: stored.password.hash(),
            password_salt: stored.password.salt(),
            first_name: account.first_name.as_ref().map(AsRef::as_ref),
            created_at: account.created_at,
        };
        diesel::insert_into(accounts::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| {
                if is_unique_violation(&err) {
                    AccountRepositoryError::duplicate_email(account.email.as_ref())
                } else {
                    diesel_error(err)
                }
            })
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<StoredAccount>, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row: Option<AccountRow> = accounts::table
            .filter(accounts::email.eq(email.as_ref()))
            .select(AccountRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        row.map(row_to_stored).transpose()
    }

    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row: Option<AccountRow> = accounts::table
            .filter(accounts::id.eq(id.as_uuid()))
            .select(AccountRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        Ok(row.map(row_to_stored).transpose()?.map(|stored| stored.account))
    }
}
