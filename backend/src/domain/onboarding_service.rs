//! Onboarding service: saved progress and restaurant creation.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::{Map, Value, json};
use tracing::{info, warn};

use crate::domain::ports::{
    CompletedOnboarding, OnboardingCommand, RestaurantRepository, SessionView,
};
use crate::domain::service_support::map_restaurant_error;
use crate::domain::{
    AccountId, BootstrapEvent, BootstrapState, Error, ONBOARDING_STEPS, OnboardingDraft,
    OnboardingErrors, OnboardingProgress, Restaurant, RestaurantId, RestaurantLookup,
    RestaurantProfile,
};

fn validation_error(errors: &OnboardingErrors) -> Error {
    let fields: Map<String, Value> = errors
        .iter()
        .map(|(field, message)| (field.to_owned(), Value::from(message)))
        .collect();
    Error::invalid_request("Please fix the highlighted fields.")
        .with_details(json!({ "code": "invalid_restaurant", "errors": fields }))
}

/// Service implementing [`OnboardingCommand`].
#[derive(Clone)]
pub struct OnboardingService<R> {
    restaurants: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> OnboardingService<R> {
    pub fn new(restaurants: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { restaurants, clock }
    }
}

#[async_trait]
impl<R> OnboardingCommand for OnboardingService<R>
where
    R: RestaurantRepository,
{
    async fn progress(&self, owner: &AccountId) -> Result<Option<OnboardingProgress>, Error> {
        self.restaurants
            .load_progress(owner)
            .await
            .map_err(map_restaurant_error)
    }

    async fn save_and_exit(
        &self,
        owner: &AccountId,
        step: u8,
        draft: OnboardingDraft,
    ) -> Result<SessionView, Error> {
        if !(1..=ONBOARDING_STEPS).contains(&step) {
            return Err(Error::invalid_field(
                "step",
                "out_of_range",
                format!("step must be between 1 and {ONBOARDING_STEPS}"),
            ));
        }
        let progress = OnboardingProgress {
            step,
            draft,
            updated_at: self.clock.utc(),
        };
        self.restaurants
            .save_progress(owner, &progress)
            .await
            .map_err(map_restaurant_error)?;

        let state = BootstrapState::replay([
            BootstrapEvent::SignedIn(RestaurantLookup::Incomplete {
                saved_progress: true,
            }),
            BootstrapEvent::OnboardingSavedAndExited,
        ]);
        Ok(SessionView::from_state(&state, None))
    }

    async fn complete(
        &self,
        owner: &AccountId,
        draft: OnboardingDraft,
    ) -> Result<CompletedOnboarding, Error> {
        let profile = RestaurantProfile::try_from_draft(&draft).map_err(|e| validation_error(&e))?;
        let now = self.clock.utc();
        let existing = self
            .restaurants
            .find_by_owner(owner)
            .await
            .map_err(map_restaurant_error)?;
        let restaurant = match existing {
            Some(current) => Restaurant {
                profile: profile.clone(),
                onboarding_complete: true,
                updated_at: now,
                ..current
            },
            None => Restaurant {
                id: RestaurantId::random(),
                owner_id: owner.clone(),
                profile: profile.clone(),
                onboarding_complete: true,
                created_at: now,
                updated_at: now,
            },
        };
        self.restaurants
            .save(&restaurant)
            .await
            .map_err(map_restaurant_error)?;
        info!(restaurant_id = %restaurant.id, "onboarding completed");

        if let Err(err) = self.restaurants.clear_progress(owner).await {
            warn!(error = %err, "failed to clear onboarding progress");
        }

        let state = BootstrapState::replay([
            BootstrapEvent::SignedIn(RestaurantLookup::Incomplete {
                saved_progress: false,
            }),
            BootstrapEvent::OnboardingCompleted,
        ]);
        Ok(CompletedOnboarding {
            restaurant: profile,
            session: SessionView::from_state(&state, None),
        })
    }
}
