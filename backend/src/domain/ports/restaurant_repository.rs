//! Port for restaurant and onboarding-progress persistence.

use async_trait::async_trait;

use crate::domain::{AccountId, OnboardingProgress, Restaurant};

use super::define_port_error;

define_port_error! {
    /// Errors raised by restaurant repository adapters.
    pub enum RestaurantRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "restaurant repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "restaurant repository query failed: {message}",
    }
}

/// Port for an owner's restaurant and saved onboarding progress.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RestaurantRepository: Send + Sync {
    /// Restaurant owned by `owner`; owners have at most one.
    async fn find_by_owner(
        &self,
        owner: &AccountId,
    ) -> Result<Option<Restaurant>, RestaurantRepositoryError>;

    /// Insert or update the owner's restaurant.
    async fn save(&self, restaurant: &Restaurant) -> Result<(), RestaurantRepositoryError>;

    /// Saved onboarding progress for `owner`.
    async fn load_progress(
        &self,
        owner: &AccountId,
    ) -> Result<Option<OnboardingProgress>, RestaurantRepositoryError>;

    /// Replace the owner's saved onboarding progress.
    async fn save_progress(
        &self,
        owner: &AccountId,
        progress: &OnboardingProgress,
    ) -> Result<(), RestaurantRepositoryError>;

    /// Discard saved onboarding progress. Clearing nothing is not an error.
    async fn clear_progress(&self, owner: &AccountId) -> Result<(), RestaurantRepositoryError>;
}

/// Fixture implementation: no restaurant and no saved progress.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureRestaurantRepository;

#[async_trait]
impl RestaurantRepository for FixtureRestaurantRepository {
    async fn find_by_owner(
        &self,
        _owner: &AccountId,
    ) -> Result<Option<Restaurant>, RestaurantRepositoryError> {
        Ok(None)
    }

    async fn save(&self, _restaurant: &Restaurant) -> Result<(), RestaurantRepositoryError> {
        Ok(())
    }

    async fn load_progress(
        &self,
        _owner: &AccountId,
    ) -> Result<Option<OnboardingProgress>, RestaurantRepositoryError> {
        Ok(None)
    }

    async fn save_progress(
        &self,
        _owner: &AccountId,
        _progress: &OnboardingProgress,
    ) -> Result<(), RestaurantRepositoryError> {
        Ok(())
    }

    async fn clear_progress(&self, _owner: &AccountId) -> Result<(), RestaurantRepositoryError> {
        Ok(())
    }
}
