//! Process-local CRM tables.
//!
//! Nothing in the server writes these tables; they start empty and can be
//! seeded per restaurant for demos and behaviour tests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::domain::ports::{CrmRecordsError, CrmRecordsRepository};
use crate::domain::{
    CreditsBalance, Customer, Feedback, LoyaltyReward, Order, QrCode, RestaurantId,
    RewardRedemption,
};

/// Every CRM table for one restaurant.
#[derive(Debug, Clone, Default)]
pub struct CrmTables {
    pub customers: Vec<Customer>,
    pub orders: Vec<Order>,
    pub redemptions: Vec<RewardRedemption>,
    pub loyalty_rewards: Vec<LoyaltyReward>,
    pub feedback: Vec<Feedback>,
    pub qr_codes: Vec<QrCode>,
    pub credits: Option<CreditsBalance>,
}

/// [`CrmRecordsRepository`] over seeded [`CrmTables`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryCrmRecords {
    tables: Arc<RwLock<HashMap<RestaurantId, CrmTables>>>,
}

impl InMemoryCrmRecords {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the tables for `restaurant`.
    pub async fn seed(&self, restaurant: RestaurantId, tables: CrmTables) {
        self.tables.write().await.insert(restaurant, tables);
    }

    async fn read<T>(&self, restaurant: &RestaurantId, pick: impl FnOnce(&CrmTables) -> T) -> T
    where
        T: Default,
    {
        self.tables
            .read()
            .await
            .get(restaurant)
            .map(pick)
            .unwrap_or_default()
    }
}

#[async_trait]
impl CrmRecordsRepository for InMemoryCrmRecords {
    async fn customers(&self, restaurant: &RestaurantId) -> Result<Vec<Customer>, CrmRecordsError> {
        Ok(self.read(restaurant, |t| t.customers.clone()).await)
    }

    async fn orders(
        &self,
        restaurant: &RestaurantId,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<Order>, CrmRecordsError> {
        Ok(self
            .read(restaurant, |t| {
                t.orders
                    .iter()
                    .filter(|o| since.is_none_or(|s| o.order_date.is_some_and(|d| d >= s)))
                    .cloned()
                    .collect()
            })
            .await)
    }

    async fn redemptions(
        &self,
        restaurant: &RestaurantId,
    ) -> Result<Vec<RewardRedemption>, CrmRecordsError> {
        Ok(self.read(restaurant, |t| t.redemptions.clone()).await)
    }

    async fn loyalty_rewards(
        &self,
        restaurant: &RestaurantId,
    ) -> Result<Vec<LoyaltyReward>, CrmRecordsError> {
        Ok(self.read(restaurant, |t| t.loyalty_rewards.clone()).await)
    }

    async fn feedback(&self, restaurant: &RestaurantId) -> Result<Vec<Feedback>, CrmRecordsError> {
        Ok(self.read(restaurant, |t| t.feedback.clone()).await)
    }

    async fn qr_codes(&self, restaurant: &RestaurantId) -> Result<Vec<QrCode>, CrmRecordsError> {
        Ok(self.read(restaurant, |t| t.qr_codes.clone()).await)
    }

    async fn credits(
        &self,
        restaurant: &RestaurantId,
    ) -> Result<Option<CreditsBalance>, CrmRecordsError> {
        Ok(self.read(restaurant, |t| t.credits).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rstest::rstest;
    use uuid::Uuid;

    fn order(at: Option<DateTime<Utc>>) -> Order {
        Order {
            id: Uuid::new_v4(),
            customer_id: None,
            order_number: "POS-1".to_owned(),
            total_amount: 100.0,
            order_date: at,
            status: None,
        }
    }

    #[rstest]
    #[tokio::test]
    async fn orders_window_excludes_undated_and_older_rows() {
        let records = InMemoryCrmRecords::new();
        let restaurant = RestaurantId::random();
        let now = Utc::now();
        records
            .seed(
                restaurant,
                CrmTables {
                    orders: vec![
                        order(Some(now)),
                        order(Some(now - Duration::days(10))),
                        order(None),
                    ],
                    ..CrmTables::default()
                },
            )
            .await;

        let recent = records
            .orders(&restaurant, Some(now - Duration::days(1)))
            .await
            .expect("orders");
        let all = records.orders(&restaurant, None).await.expect("orders");
        assert_eq!((recent.len(), all.len()), (1, 3));
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_restaurants_read_as_empty() {
        let records = InMemoryCrmRecords::new();
        let restaurant = RestaurantId::random();
        assert!(records.customers(&restaurant).await.expect("customers").is_empty());
        assert_eq!(records.credits(&restaurant).await.expect("credits"), None);
    }
}
