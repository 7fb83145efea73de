//! Driving ports for the dashboard, loyalty, and customer-insight views.
//!
//! These reads degrade rather than fail: missing restaurants and broken
//! tables produce zeroed figures.

use async_trait::async_trait;

use crate::domain::{
    AccountId, ActivityEvent, ActivityFilter, CustomerQuery, CustomerRow, DashboardData, Error,
    InsightsOverview, InsightsRange, LoyaltyOverview, LoyaltyRange, SegmentSummary, Timeframe,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DashboardQuery: Send + Sync {
    async fn dashboard(&self, owner: &AccountId, timeframe: Timeframe) -> Result<DashboardData, Error>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoyaltyQuery: Send + Sync {
    async fn overview(&self, owner: &AccountId, range: LoyaltyRange) -> Result<LoyaltyOverview, Error>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InsightsQuery: Send + Sync {
    async fn overview(&self, owner: &AccountId, range: InsightsRange) -> Result<InsightsOverview, Error>;

    async fn segments(
        &self,
        owner: &AccountId,
        range: InsightsRange,
    ) -> Result<Vec<SegmentSummary>, Error>;

    /// Matching customers in list order.
    async fn customers(
        &self,
        owner: &AccountId,
        query: CustomerQuery,
    ) -> Result<Vec<CustomerRow>, Error>;

    async fn activity(
        &self,
        owner: &AccountId,
        filter: ActivityFilter,
        range: InsightsRange,
    ) -> Result<Vec<ActivityEvent>, Error>;
}
