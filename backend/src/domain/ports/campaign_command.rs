//! Driving ports for launching and managing campaigns.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{
    AccountId, BulkAction, Campaign, Error, LaunchSummary, PerformanceFilter, PerformanceView,
    WizardDraft,
};

/// Outcome of a bulk action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BulkOutcome {
    pub action: BulkAction,
    /// Campaigns changed, created, or removed.
    pub affected: u64,
    /// Ids of copies made by `duplicate`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub created: Vec<Uuid>,
}

/// Campaign mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CampaignCommand: Send + Sync {
    /// Step 9 summary priced against the restaurant's credits.
    async fn review(&self, owner: &AccountId, draft: &WizardDraft) -> Result<LaunchSummary, Error>;

    /// Validate every step and persist the campaign.
    async fn launch(&self, owner: &AccountId, draft: WizardDraft) -> Result<Campaign, Error>;

    /// Apply `action` to the selected campaigns.
    async fn bulk(
        &self,
        owner: &AccountId,
        action: BulkAction,
        ids: Vec<Uuid>,
    ) -> Result<BulkOutcome, Error>;
}

/// Campaign reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CampaignQuery: Send + Sync {
    async fn performance(
        &self,
        owner: &AccountId,
        filter: PerformanceFilter,
    ) -> Result<PerformanceView, Error>;
}
