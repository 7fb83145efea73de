//! Port for the per-restaurant CRM tables read by reporting views.
//!
//! Each table is fetched separately so callers can tolerate the failure of
//! one table without losing the rest.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{
    CreditsBalance, Customer, Feedback, LoyaltyReward, Order, QrCode, RestaurantId,
    RewardRedemption,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised while reading CRM tables.
    pub enum CrmRecordsError {
        /// Repository connection could not be established.
        Connection { message: String } => "crm records connection failed: {message}",
        /// Query failed during execution.
        Query { table: String, message: String } => "crm records query on {table} failed: {message}",
    }
}

/// Read access to a restaurant's customers, orders, and engagement data.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CrmRecordsRepository: Send + Sync {
    async fn customers(&self, restaurant: &RestaurantId) -> Result<Vec<Customer>, CrmRecordsError>;

    /// Orders dated at or after `since`, or all orders when `None`.
    async fn orders(
        &self,
        restaurant: &RestaurantId,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<Order>, CrmRecordsError>;

    async fn redemptions(
        &self,
        restaurant: &RestaurantId,
    ) -> Result<Vec<RewardRedemption>, CrmRecordsError>;

    async fn loyalty_rewards(
        &self,
        restaurant: &RestaurantId,
    ) -> Result<Vec<LoyaltyReward>, CrmRecordsError>;

    async fn feedback(&self, restaurant: &RestaurantId) -> Result<Vec<Feedback>, CrmRecordsError>;

    async fn qr_codes(&self, restaurant: &RestaurantId) -> Result<Vec<QrCode>, CrmRecordsError>;

    /// Stored credit counters; `None` when the restaurant has no row.
    async fn credits(
        &self,
        restaurant: &RestaurantId,
    ) -> Result<Option<CreditsBalance>, CrmRecordsError>;
}

/// Fixture implementation returning empty tables.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCrmRecordsRepository;

#[async_trait]
impl CrmRecordsRepository for FixtureCrmRecordsRepository {
    async fn customers(&self, _restaurant: &RestaurantId) -> Result<Vec<Customer>, CrmRecordsError> {
        Ok(Vec::new())
    }

    async fn orders(
        &self,
        _restaurant: &RestaurantId,
        _since: Option<DateTime<Utc>>,
    ) -> Result<Vec<Order>, CrmRecordsError> {
        Ok(Vec::new())
    }

    async fn redemptions(
        &self,
        _restaurant: &RestaurantId,
    ) -> Result<Vec<RewardRedemption>, CrmRecordsError> {
        Ok(Vec::new())
    }

    async fn loyalty_rewards(
        &self,
        _restaurant: &RestaurantId,
    ) -> Result<Vec<LoyaltyReward>, CrmRecordsError> {
        Ok(Vec::new())
    }

    async fn feedback(&self, _restaurant: &RestaurantId) -> Result<Vec<Feedback>, CrmRecordsError> {
        Ok(Vec::new())
    }

    async fn qr_codes(&self, _restaurant: &RestaurantId) -> Result<Vec<QrCode>, CrmRecordsError> {
        Ok(Vec::new())
    }

    async fn credits(
        &self,
        _restaurant: &RestaurantId,
    ) -> Result<Option<CreditsBalance>, CrmRecordsError> {
        Ok(None)
    }
}
