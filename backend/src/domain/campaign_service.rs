//! Campaign services: review pricing, launch, bulk actions, and performance.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::{Map, Value, json};
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::ports::{
    BulkOutcome, CampaignCommand, CampaignQuery, CampaignRepository, CrmRecordsRepository,
    RestaurantRepository,
};
use crate::domain::service_support::{
    map_campaign_error, map_restaurant_error, owned_restaurant_or_none,
};
use crate::domain::{
    AccountId, BLOCKED_TEMPLATE_MESSAGE, BulkAction, Campaign, CampaignStatus, ChannelCredits,
    Error, LaunchSummary, PerformanceFilter, PerformanceView, Restaurant, RestaurantId,
    StepErrors, WizardDraft, launch_summary, summarise, validate_all,
};

/// Message when campaigns are used before onboarding finishes.
pub const NO_RESTAURANT_MESSAGE: &str =
    "Finish setting up your restaurant before creating campaigns.";

/// Error for a wizard step that failed validation.
pub fn step_error(step: u8, errors: &StepErrors) -> Error {
    let fields: Map<String, Value> = errors
        .iter()
        .map(|(field, message)| (field.to_owned(), Value::from(message)))
        .collect();
    Error::invalid_request(errors.to_string())
        .with_details(json!({ "step": step, "errors": fields }))
}

/// Campaign service implementing [`CampaignCommand`] and [`CampaignQuery`].
#[derive(Clone)]
pub struct CampaignService<C, R, K> {
    campaigns: Arc<C>,
    restaurants: Arc<R>,
    records: Arc<K>,
    clock: Arc<dyn Clock>,
    whatsapp_header: bool,
}

impl<C, R, K> CampaignService<C, R, K> {
    /// `whatsapp_header` records whether the tenant owns a WhatsApp sender.
    pub fn new(
        campaigns: Arc<C>,
        restaurants: Arc<R>,
        records: Arc<K>,
        clock: Arc<dyn Clock>,
        whatsapp_header: bool,
    ) -> Self {
        Self {
            campaigns,
            restaurants,
            records,
            clock,
            whatsapp_header,
        }
    }
}

impl<C, R, K> CampaignService<C, R, K>
where
    C: CampaignRepository,
    R: RestaurantRepository,
    K: CrmRecordsRepository,
{
    async fn restaurant(&self, owner: &AccountId) -> Result<Restaurant, Error> {
        self.restaurants
            .find_by_owner(owner)
            .await
            .map_err(map_restaurant_error)?
            .ok_or_else(|| Error::conflict(NO_RESTAURANT_MESSAGE))
    }

    async fn credits(&self, restaurant: &RestaurantId) -> ChannelCredits {
        match self.records.credits(restaurant).await {
            Ok(balance) => balance.unwrap_or_default().resolve(),
            Err(err) => {
                warn!(error = %err, "credits lookup failed; using defaults");
                ChannelCredits::default()
            }
        }
    }

    async fn duplicate(&self, restaurant: &RestaurantId, ids: &[Uuid]) -> Result<BulkOutcome, Error> {
        let originals = self
            .campaigns
            .find_many(restaurant, ids)
            .await
            .map_err(map_campaign_error)?;
        let now = self.clock.utc();
        let mut created = Vec::with_capacity(originals.len());
        for original in &originals {
            let copy = original.duplicate(Uuid::new_v4(), now);
            self.campaigns
                .insert(&copy)
                .await
                .map_err(map_campaign_error)?;
            created.push(copy.id);
        }
        Ok(BulkOutcome {
            action: BulkAction::Duplicate,
            affected: u64::try_from(created.len()).unwrap_or(u64::MAX),
            created,
        })
    }

    async fn pause(&self, restaurant: &RestaurantId, ids: &[Uuid]) -> Result<BulkOutcome, Error> {
        let pausable: Vec<Uuid> = self
            .campaigns
            .find_many(restaurant, ids)
            .await
            .map_err(map_campaign_error)?
            .into_iter()
            .filter(|c| c.status.is_pausable())
            .map(|c| c.id)
            .collect();
        let affected = if pausable.is_empty() {
            0
        } else {
            self.campaigns
                .set_status(restaurant, &pausable, CampaignStatus::Paused)
                .await
                .map_err(map_campaign_error)?
        };
        Ok(BulkOutcome {
            action: BulkAction::Pause,
            affected,
            created: Vec::new(),
        })
    }
}

#[async_trait]
impl<C, R, K> CampaignCommand for CampaignService<C, R, K>
where
    C: CampaignRepository,
    R: RestaurantRepository,
    K: CrmRecordsRepository,
{
    async fn review(&self, owner: &AccountId, draft: &WizardDraft) -> Result<LaunchSummary, Error> {
        let restaurant = self.restaurant(owner).await?;
        let credits = self.credits(&restaurant.id).await;
        Ok(launch_summary(draft, credits))
    }

    async fn launch(&self, owner: &AccountId, draft: WizardDraft) -> Result<Campaign, Error> {
        if draft.channels.whatsapp && !self.whatsapp_header {
            return Err(Error::invalid_request(BLOCKED_TEMPLATE_MESSAGE).with_details(json!({
                "step": 1,
                "errors": { "channels": BLOCKED_TEMPLATE_MESSAGE },
            })));
        }
        let now = self.clock.utc();
        validate_all(&draft, now).map_err(|(step, errors)| step_error(step, &errors))?;

        let restaurant = self.restaurant(owner).await?;
        let campaign = Campaign::launch(Uuid::new_v4(), restaurant.id, &draft, now);
        self.campaigns
            .insert(&campaign)
            .await
            .map_err(map_campaign_error)?;
        info!(
            campaign_id = %campaign.id,
            status = campaign.status.as_str(),
            "campaign launched"
        );
        Ok(campaign)
    }

    async fn bulk(
        &self,
        owner: &AccountId,
        action: BulkAction,
        ids: Vec<Uuid>,
    ) -> Result<BulkOutcome, Error> {
        if ids.is_empty() {
            return Err(Error::invalid_field(
                "ids",
                "empty_selection",
                "Select at least one campaign.",
            ));
        }
        let restaurant = self.restaurant(owner).await?;
        let outcome = match action {
            BulkAction::Duplicate => self.duplicate(&restaurant.id, &ids).await?,
            BulkAction::Pause => self.pause(&restaurant.id, &ids).await?,
            BulkAction::Delete => BulkOutcome {
                action,
                affected: self
                    .campaigns
                    .delete(&restaurant.id, &ids)
                    .await
                    .map_err(map_campaign_error)?,
                created: Vec::new(),
            },
        };
        info!(?action, affected = outcome.affected, "bulk campaign action");
        Ok(outcome)
    }
}

#[async_trait]
impl<C, R, K> CampaignQuery for CampaignService<C, R, K>
where
    C: CampaignRepository,
    R: RestaurantRepository,
    K: CrmRecordsRepository,
{
    async fn performance(
        &self,
        owner: &AccountId,
        filter: PerformanceFilter,
    ) -> Result<PerformanceView, Error> {
        let now = self.clock.utc();
        let Some(restaurant) = owned_restaurant_or_none(self.restaurants.as_ref(), owner).await
        else {
            return Ok(summarise(&[], filter, now));
        };
        let campaigns = self
            .campaigns
            .list(&restaurant.id)
            .await
            .map_err(map_campaign_error)?;
        Ok(summarise(&campaigns, filter, now))
    }
}

#[cfg(test)]
#[path = "campaign_service_tests.rs"]
mod tests;
