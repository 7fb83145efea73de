//! Driving port deciding which view a client lands on.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{AccountId, AccountProfile, AppView, BootstrapState};

/// Bootstrap outcome returned to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub view: AppView,
    pub loading: bool,
    pub resetting: bool,
    /// Toast to show after the transition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<AccountProfile>,
}

impl SessionView {
    /// Project a machine state, attaching the profile only when signed in.
    #[must_use]
    pub fn from_state(state: &BootstrapState, user: Option<AccountProfile>) -> Self {
        Self {
            view: state.view(),
            loading: state.is_loading(),
            resetting: state.is_resetting(),
            notice: state.notice().map(|n| n.message().to_owned()),
            user: user.filter(|_| state.is_signed_in()),
        }
    }
}

/// Session bootstrap use-cases. None of them fail: remote errors are logged
/// and resolved to the safest view.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionBootstrap: Send + Sync {
    /// Resolve the view for an existing (or missing) session.
    async fn current(&self, account: Option<AccountId>) -> SessionView;

    /// Resolve the view right after a successful login or signup.
    async fn signed_in(&self, account: AccountId) -> SessionView;

    /// Sign out, discarding saved onboarding progress.
    async fn signed_out(&self, account: Option<AccountId>) -> SessionView;

    /// Force the login view and clear persisted state for the account.
    async fn emergency_reset(&self, account: Option<AccountId>) -> SessionView;
}
