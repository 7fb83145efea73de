//! Port for campaign persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Campaign, CampaignStatus, RestaurantId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by campaign repository adapters.
    pub enum CampaignRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "campaign repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "campaign repository query failed: {message}",
    }
}

/// Port for a restaurant's campaigns. Every call is scoped to one restaurant
/// so ids belonging to another tenant are never touched.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CampaignRepository: Send + Sync {
    /// Campaigns newest first.
    async fn list(&self, restaurant: &RestaurantId) -> Result<Vec<Campaign>, CampaignRepositoryError>;

    /// Campaigns among `ids`; unknown ids are skipped.
    async fn find_many(
        &self,
        restaurant: &RestaurantId,
        ids: &[Uuid],
    ) -> Result<Vec<Campaign>, CampaignRepositoryError>;

    async fn insert(&self, campaign: &Campaign) -> Result<(), CampaignRepositoryError>;

    /// Set the status of `ids`, returning how many rows changed.
    async fn set_status(
        &self,
        restaurant: &RestaurantId,
        ids: &[Uuid],
        status: CampaignStatus,
    ) -> Result<u64, CampaignRepositoryError>;

    /// Delete `ids`, returning how many rows were removed.
    async fn delete(
        &self,
        restaurant: &RestaurantId,
        ids: &[Uuid],
    ) -> Result<u64, CampaignRepositoryError>;
}

/// Fixture implementation with no campaigns.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCampaignRepository;

#[async_trait]
impl CampaignRepository for FixtureCampaignRepository {
    async fn list(&self, _restaurant: &RestaurantId) -> Result<Vec<Campaign>, CampaignRepositoryError> {
        Ok(Vec::new())
    }

    async fn find_many(
        &self,
        _restaurant: &RestaurantId,
        _ids: &[Uuid],
    ) -> Result<Vec<Campaign>, CampaignRepositoryError> {
        Ok(Vec::new())
    }

    async fn insert(&self, _campaign: &Campaign) -> Result<(), CampaignRepositoryError> {
        Ok(())
    }

    async fn set_status(
        &self,
        _restaurant: &RestaurantId,
        _ids: &[Uuid],
        _status: CampaignStatus,
    ) -> Result<u64, CampaignRepositoryError> {
        Ok(0)
    }

    async fn delete(
        &self,
        _restaurant: &RestaurantId,
        _ids: &[Uuid],
    ) -> Result<u64, CampaignRepositoryError> {
        Ok(0)
    }
}
