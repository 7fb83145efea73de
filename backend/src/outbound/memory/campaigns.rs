//! Process-local campaign storage.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::ports::{CampaignRepository, CampaignRepositoryError};
use crate::domain::{Campaign, CampaignStatus, RestaurantId};

/// [`CampaignRepository`] holding every tenant's campaigns in one map.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCampaignRepository {
    campaigns: Arc<RwLock<HashMap<Uuid, Campaign>>>,
}

impl InMemoryCampaignRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn owned_by<'a>(
    campaign: &'a Campaign,
    restaurant: &RestaurantId,
    ids: &[Uuid],
) -> Option<&'a Campaign> {
    (campaign.restaurant_id == *restaurant && ids.contains(&campaign.id)).then_some(campaign)
}

#[async_trait]
impl CampaignRepository for InMemoryCampaignRepository {
    async fn list(&self, restaurant: &RestaurantId) -> Result<Vec<Campaign>, CampaignRepositoryError> {
        let campaigns = self.campaigns.read().await;
        let mut listed: Vec<Campaign> = campaigns
            .values()
            .filter(|c| c.restaurant_id == *restaurant)
            .cloned()
            .collect();
        listed.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(listed)
    }

    async fn find_many(
        &self,
        restaurant: &RestaurantId,
        ids: &[Uuid],
    ) -> Result<Vec<Campaign>, CampaignRepositoryError> {
        let campaigns = self.campaigns.read().await;
        Ok(campaigns
            .values()
            .filter_map(|c| owned_by(c, restaurant, ids))
            .cloned()
            .collect())
    }

    async fn insert(&self, campaign: &Campaign) -> Result<(), CampaignRepositoryError> {
        let mut campaigns = self.campaigns.write().await;
        if campaigns.contains_key(&campaign.id) {
            return Err(CampaignRepositoryError::query(format!(
                "campaign {} already exists",
                campaign.id
            )));
        }
        campaigns.insert(campaign.id, campaign.clone());
        Ok(())
    }

    async fn set_status(
        &self,
        restaurant: &RestaurantId,
        ids: &[Uuid],
        status: CampaignStatus,
    ) -> Result<u64, CampaignRepositoryError> {
        let mut campaigns = self.campaigns.write().await;
        let mut changed = 0;
        for campaign in campaigns.values_mut() {
            if owned_by(campaign, restaurant, ids).is_some() {
                campaign.status = status;
                campaign.updated_at = chrono::Utc::now();
                changed += 1;
            }
        }
        Ok(changed)
    }

    async fn delete(
        &self,
        restaurant: &RestaurantId,
        ids: &[Uuid],
    ) -> Result<u64, CampaignRepositoryError> {
        let mut campaigns = self.campaigns.write().await;
        let before = campaigns.len();
        campaigns.retain(|_, c| owned_by(c, restaurant, ids).is_none());
        Ok(u64::try_from(before - campaigns.len()).unwrap_or(u64::MAX))
    }
}
