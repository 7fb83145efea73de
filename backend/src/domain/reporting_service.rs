//! Dashboard, loyalty, and customer-insight reads.
//!
//! Every table is read independently. A failed read is logged and counted
//! as empty so one broken table never blanks the whole view.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, warn};

use crate::domain::ports::{
    CampaignRepository, CrmRecordsRepository, DashboardQuery, InsightsQuery, LoyaltyQuery,
    RestaurantRepository,
};
use crate::domain::service_support::{or_empty, owned_restaurant_or_none};
use crate::domain::{
    AccountId, ActivityEvent, ActivityFilter, CustomerQuery, CustomerRow, DashboardData,
    DashboardInputs, Error, InsightsInputs, InsightsOverview, InsightsRange, LoyaltyInputs,
    LoyaltyOverview, LoyaltyRange, RestaurantId, SegmentSummary, Timeframe, activity_feed,
    list_customers, segment_customers,
};

/// Read-side service implementing [`DashboardQuery`], [`LoyaltyQuery`], and
/// [`InsightsQuery`].
#[derive(Clone)]
pub struct ReportingService<R, K, C> {
    restaurants: Arc<R>,
    records: Arc<K>,
    campaigns: Arc<C>,
    clock: Arc<dyn Clock>,
}

impl<R, K, C> ReportingService<R, K, C> {
    pub fn new(
        restaurants: Arc<R>,
        records: Arc<K>,
        campaigns: Arc<C>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            restaurants,
            records,
            campaigns,
            clock,
        }
    }
}

impl<R, K, C> ReportingService<R, K, C>
where
    R: RestaurantRepository,
    K: CrmRecordsRepository,
    C: CampaignRepository,
{
    async fn restaurant_id(&self, owner: &AccountId) -> Option<RestaurantId> {
        owned_restaurant_or_none(self.restaurants.as_ref(), owner)
            .await
            .map(|restaurant| restaurant.id)
    }

    async fn dashboard_inputs(&self, id: &RestaurantId, timeframe: Timeframe) -> DashboardInputs {
        let since = timeframe.fetch_since(self.clock.utc());
        let campaigns = match self.campaigns.list(id).await {
            Ok(campaigns) => campaigns,
            Err(err) => {
                warn!(table = "campaigns", error = %err, "table read failed; treating as empty");
                Vec::new()
            }
        };
        DashboardInputs {
            orders: or_empty("orders", self.records.orders(id, Some(since))).await,
            customers: or_empty("customers", self.records.customers(id)).await,
            campaigns,
            redemptions: or_empty("reward_redemptions", self.records.redemptions(id)).await,
            feedback: or_empty("feedback", self.records.feedback(id)).await,
            qr_codes: or_empty("qr_codes", self.records.qr_codes(id)).await,
            credits: or_empty("credits_balance", self.records.credits(id)).await,
            loyalty_rewards: or_empty("loyalty_rewards", self.records.loyalty_rewards(id)).await,
        }
    }

    async fn insights_inputs(&self, owner: &AccountId) -> InsightsInputs {
        let Some(id) = self.restaurant_id(owner).await else {
            return InsightsInputs::default();
        };
        InsightsInputs {
            customers: or_empty("customers", self.records.customers(&id)).await,
            orders: or_empty("orders", self.records.orders(&id, None)).await,
            redemptions: or_empty("reward_redemptions", self.records.redemptions(&id)).await,
            rewards: or_empty("loyalty_rewards", self.records.loyalty_rewards(&id)).await,
            feedback: or_empty("feedback", self.records.feedback(&id)).await,
        }
    }
}

#[async_trait]
impl<R, K, C> DashboardQuery for ReportingService<R, K, C>
where
    R: RestaurantRepository,
    K: CrmRecordsRepository,
    C: CampaignRepository,
{
    async fn dashboard(&self, owner: &AccountId, timeframe: Timeframe) -> Result<DashboardData, Error> {
        let Some(id) = self.restaurant_id(owner).await else {
            debug!("no restaurant yet; serving zeroed dashboard");
            return Ok(DashboardData::fallback());
        };
        let inputs = self.dashboard_inputs(&id, timeframe).await;
        Ok(DashboardData::compute(&inputs, timeframe, self.clock.utc()))
    }
}

#[async_trait]
impl<R, K, C> LoyaltyQuery for ReportingService<R, K, C>
where
    R: RestaurantRepository,
    K: CrmRecordsRepository,
    C: CampaignRepository,
{
    async fn overview(&self, owner: &AccountId, range: LoyaltyRange) -> Result<LoyaltyOverview, Error> {
        let now = self.clock.utc();
        let inputs = match self.restaurant_id(owner).await {
            Some(id) => LoyaltyInputs {
                customers: or_empty("customers", self.records.customers(&id)).await,
                redemptions: or_empty("reward_redemptions", self.records.redemptions(&id)).await,
                rewards: or_empty("loyalty_rewards", self.records.loyalty_rewards(&id)).await,
                orders: or_empty("orders", self.records.orders(&id, range.since(now))).await,
            },
            None => LoyaltyInputs::default(),
        };
        Ok(LoyaltyOverview::compute(&inputs, range, now))
    }
}

#[async_trait]
impl<R, K, C> InsightsQuery for ReportingService<R, K, C>
where
    R: RestaurantRepository,
    K: CrmRecordsRepository,
    C: CampaignRepository,
{
    async fn overview(&self, owner: &AccountId, range: InsightsRange) -> Result<InsightsOverview, Error> {
        let inputs = self.insights_inputs(owner).await;
        Ok(InsightsOverview::compute(&inputs, range, self.clock.utc()))
    }

    async fn segments(
        &self,
        owner: &AccountId,
        range: InsightsRange,
    ) -> Result<Vec<SegmentSummary>, Error> {
        let inputs = self.insights_inputs(owner).await;
        Ok(segment_customers(&inputs, range, self.clock.utc()))
    }

    async fn customers(
        &self,
        owner: &AccountId,
        query: CustomerQuery,
    ) -> Result<Vec<CustomerRow>, Error> {
        let inputs = self.insights_inputs(owner).await;
        Ok(list_customers(&inputs, &query, self.clock.utc()))
    }

    async fn activity(
        &self,
        owner: &AccountId,
        filter: ActivityFilter,
        range: InsightsRange,
    ) -> Result<Vec<ActivityEvent>, Error> {
        let inputs = self.insights_inputs(owner).await;
        Ok(activity_feed(&inputs, filter, range, self.clock.utc()))
    }
}

#[cfg(test)]
#[path = "reporting_service_tests.rs"]
mod tests;
