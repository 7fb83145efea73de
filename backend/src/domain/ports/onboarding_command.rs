//! Driving port for restaurant onboarding.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{AccountId, Error, OnboardingDraft, OnboardingProgress, RestaurantProfile};

use super::SessionView;

/// Result of finishing onboarding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompletedOnboarding {
    pub restaurant: RestaurantProfile,
    pub session: SessionView,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OnboardingCommand: Send + Sync {
    /// Saved progress, if the owner left setup part-way.
    async fn progress(&self, owner: &AccountId) -> Result<Option<OnboardingProgress>, Error>;

    /// Save a partial draft and leave setup for the dashboard.
    async fn save_and_exit(
        &self,
        owner: &AccountId,
        step: u8,
        draft: OnboardingDraft,
    ) -> Result<SessionView, Error>;

    /// Validate the draft and mark the restaurant ready.
    async fn complete(
        &self,
        owner: &AccountId,
        draft: OnboardingDraft,
    ) -> Result<CompletedOnboarding, Error>;
}
