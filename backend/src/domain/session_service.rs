//! Session bootstrap service.
//!
//! Feeds [`BootstrapEvent`]s into a fresh [`BootstrapState`] per request.
//! Remote failures are logged and resolved to the view that keeps the user
//! moving: a failed account check lands on login, a failed restaurant lookup
//! lands on onboarding.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::domain::ports::{
    AccountRepository, RestaurantRepository, SessionBootstrap, SessionView,
};
use crate::domain::{
    AccountId, AccountProfile, BootstrapEvent, BootstrapState, RestaurantLookup,
};

/// Service implementing [`SessionBootstrap`].
#[derive(Clone)]
pub struct SessionService<A, R> {
    accounts: Arc<A>,
    restaurants: Arc<R>,
}

impl<A, R> SessionService<A, R> {
    pub fn new(accounts: Arc<A>, restaurants: Arc<R>) -> Self {
        Self {
            accounts,
            restaurants,
        }
    }
}

impl<A, R> SessionService<A, R>
where
    A: AccountRepository,
    R: RestaurantRepository,
{
    async fn lookup_restaurant(&self, owner: &AccountId) -> RestaurantLookup {
        match self.restaurants.find_by_owner(owner).await {
            Ok(Some(restaurant)) if restaurant.onboarding_complete => RestaurantLookup::Complete,
            Ok(_) => {
                let saved_progress = match self.restaurants.load_progress(owner).await {
                    Ok(progress) => progress.is_some(),
                    Err(err) => {
                        warn!(error = %err, "onboarding progress lookup failed");
                        false
                    }
                };
                RestaurantLookup::Incomplete { saved_progress }
            }
            Err(err) => {
                warn!(error = %err, "restaurant lookup failed; defaulting to onboarding");
                RestaurantLookup::Failed
            }
        }
    }

    /// Resolve the account behind a session into a bootstrap event.
    async fn resolve(
        &self,
        account: &AccountId,
        found: fn(RestaurantLookup) -> BootstrapEvent,
    ) -> (BootstrapEvent, Option<AccountProfile>) {
        match self.accounts.find_by_id(account).await {
            Ok(Some(acc)) => {
                let lookup = self.lookup_restaurant(account).await;
                (found(lookup), Some(AccountProfile::from(&acc)))
            }
            Ok(None) => {
                info!(account_id = %account, "session refers to a missing account");
                (BootstrapEvent::NoSession, None)
            }
            Err(err) => {
                warn!(error = %err, "session check failed");
                (BootstrapEvent::SessionCheckFailed, None)
            }
        }
    }

    async fn discard_progress(&self, account: Option<&AccountId>) {
        let Some(owner) = account else {
            return;
        };
        if let Err(err) = self.restaurants.clear_progress(owner).await {
            warn!(error = %err, "failed to clear onboarding progress");
        }
    }
}

#[async_trait]
impl<A, R> SessionBootstrap for SessionService<A, R>
where
    A: AccountRepository,
    R: RestaurantRepository,
{
    async fn current(&self, account: Option<AccountId>) -> SessionView {
        let (event, profile) = match account {
            Some(id) => self.resolve(&id, BootstrapEvent::SessionFound).await,
            None => (BootstrapEvent::NoSession, None),
        };
        debug!(?event, "session bootstrap");
        SessionView::from_state(&BootstrapState::replay([event]), profile)
    }

    async fn signed_in(&self, account: AccountId) -> SessionView {
        let (event, profile) = self.resolve(&account, BootstrapEvent::SignedIn).await;
        SessionView::from_state(&BootstrapState::replay([event]), profile)
    }

    async fn signed_out(&self, account: Option<AccountId>) -> SessionView {
        self.discard_progress(account.as_ref()).await;
        SessionView::from_state(&BootstrapState::replay([BootstrapEvent::SignedOut]), None)
    }

    async fn emergency_reset(&self, account: Option<AccountId>) -> SessionView {
        let mut state = BootstrapState::initial();
        state.apply(BootstrapEvent::BeginEmergencyReset);
        info!(has_account = account.is_some(), "emergency reset");
        self.discard_progress(account.as_ref()).await;
        state.apply(BootstrapEvent::FinishEmergencyReset);
        SessionView::from_state(&state, None)
    }
}
