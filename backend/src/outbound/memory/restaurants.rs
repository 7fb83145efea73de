//! Process-local restaurants and onboarding drafts.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::ports::{RestaurantRepository, RestaurantRepositoryError};
use crate::domain::{AccountId, OnboardingProgress, Restaurant};

#[derive(Debug, Default)]
struct Tables {
    restaurants: HashMap<AccountId, Restaurant>,
    progress: HashMap<AccountId, OnboardingProgress>,
}

/// [`RestaurantRepository`] keyed by owner.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRestaurantRepository {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryRestaurantRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RestaurantRepository for InMemoryRestaurantRepository {
    async fn find_by_owner(
        &self,
        owner: &AccountId,
    ) -> Result<Option<Restaurant>, RestaurantRepositoryError> {
        Ok(self.tables.read().await.restaurants.get(owner).cloned())
    }

    async fn save(&self, restaurant: &Restaurant) -> Result<(), RestaurantRepositoryError> {
        self.tables
            .write()
            .await
            .restaurants
            .insert(restaurant.owner_id.clone(), restaurant.clone());
        Ok(())
    }

    async fn load_progress(
        &self,
        owner: &AccountId,
    ) -> Result<Option<OnboardingProgress>, RestaurantRepositoryError> {
        Ok(self.tables.read().await.progress.get(owner).cloned())
    }

    async fn save_progress(
        &self,
        owner: &AccountId,
        progress: &OnboardingProgress,
    ) -> Result<(), RestaurantRepositoryError> {
        self.tables
            .write()
            .await
            .progress
            .insert(owner.clone(), progress.clone());
        Ok(())
    }

    async fn clear_progress(&self, owner: &AccountId) -> Result<(), RestaurantRepositoryError> {
        self.tables.write().await.progress.remove(owner);
        Ok(())
    }
}
