//! Session bootstrap state machine.
//!
//! Decides which top-level view a client lands on (`login`, `onboarding`,
//! or `dashboard`) from authentication events and the restaurant lookup.
//! Remote failures never block: a failed restaurant lookup lands on
//! onboarding, and a failed session check lands on login.
//!
//! An emergency reset forces the login view and suppresses every other
//! event until [`BootstrapEvent::FinishEmergencyReset`] arrives, which
//! mirrors unsubscribing and resubscribing the auth listener.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Top-level view shown to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AppView {
    Login,
    Onboarding,
    Dashboard,
}

/// Toast-style notice attached to a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum Notice {
    ResumingOnboarding,
    OnboardingComplete,
    ProgressSaved,
    LoggedOut,
}

impl Notice {
    /// Message shown to the user.
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::ResumingOnboarding => "Resuming your setup where you left off...",
            Self::OnboardingComplete => "🎉 Your Muncho CRM is ready! Welcome aboard!",
            Self::ProgressSaved => "Progress saved. You can resume setup anytime.",
            Self::LoggedOut => "You have been logged out successfully.",
        }
    }
}

/// Result of looking up the signed-in owner's restaurant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestaurantLookup {
    /// Restaurant exists with onboarding marked complete.
    Complete,
    /// No restaurant, or onboarding not finished yet.
    Incomplete { saved_progress: bool },
    /// The lookup itself failed.
    Failed,
}

/// Inputs driving the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapEvent {
    NoSession,
    SessionCheckFailed,
    SessionFound(RestaurantLookup),
    SignedIn(RestaurantLookup),
    SignedOut,
    BeginEmergencyReset,
    FinishEmergencyReset,
    OnboardingCompleted,
    OnboardingSavedAndExited,
}

/// Whether an event changed the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Applied,
    Ignored,
}

/// Current bootstrap state.
///
/// # Examples
/// ```
/// use muncho_crm::domain::{AppView, BootstrapEvent, BootstrapState, RestaurantLookup};
///
/// let mut state = BootstrapState::initial();
/// state.apply(BootstrapEvent::SessionFound(RestaurantLookup::Failed));
/// assert_eq!(state.view(), AppView::Onboarding);
/// assert!(!state.is_loading());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootstrapState {
    view: AppView,
    loading: bool,
    resetting: bool,
    signed_in: bool,
    notice: Option<Notice>,
}

impl Default for BootstrapState {
    fn default() -> Self {
        Self::initial()
    }
}

impl BootstrapState {
    /// State before the session check resolves.
    #[must_use]
    pub const fn initial() -> Self {
        Self {
            view: AppView::Login,
            loading: true,
            resetting: false,
            signed_in: false,
            notice: None,
        }
    }

    /// View currently selected.
    #[must_use]
    pub const fn view(&self) -> AppView {
        self.view
    }

    /// Whether the session check is still pending.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Whether an emergency reset is in progress.
    #[must_use]
    pub const fn is_resetting(&self) -> bool {
        self.resetting
    }

    /// Whether a user is attached to the state.
    #[must_use]
    pub const fn is_signed_in(&self) -> bool {
        self.signed_in
    }

    /// Notice produced by the latest transition.
    #[must_use]
    pub const fn notice(&self) -> Option<Notice> {
        self.notice
    }

    fn land_after_lookup(&mut self, lookup: RestaurantLookup) {
        self.signed_in = true;
        self.loading = false;
        let (view, notice) = match lookup {
            RestaurantLookup::Complete => (AppView::Dashboard, None),
            RestaurantLookup::Incomplete {
                saved_progress: true,
            } => (AppView::Onboarding, Some(Notice::ResumingOnboarding)),
            RestaurantLookup::Incomplete {
                saved_progress: false,
            }
            | RestaurantLookup::Failed => (AppView::Onboarding, None),
        };
        self.view = view;
        self.notice = notice;
    }

    fn land_on_login(&mut self, notice: Option<Notice>) {
        self.view = AppView::Login;
        self.loading = false;
        self.signed_in = false;
        self.notice = notice;
    }

    /// Feed one event into the machine.
    pub fn apply(&mut self, event: BootstrapEvent) -> Transition {
        if self.resetting && event != BootstrapEvent::FinishEmergencyReset {
            return Transition::Ignored;
        }

        match event {
            BootstrapEvent::NoSession | BootstrapEvent::SessionCheckFailed => {
                self.land_on_login(None);
            }
            BootstrapEvent::SessionFound(lookup) | BootstrapEvent::SignedIn(lookup) => {
                self.land_after_lookup(lookup);
            }
            BootstrapEvent::SignedOut => self.land_on_login(Some(Notice::LoggedOut)),
            BootstrapEvent::BeginEmergencyReset => {
                self.land_on_login(None);
                self.resetting = true;
            }
            BootstrapEvent::FinishEmergencyReset => {
                if !self.resetting {
                    return Transition::Ignored;
                }
                self.resetting = false;
            }
            BootstrapEvent::OnboardingCompleted => {
                if !self.signed_in {
                    return Transition::Ignored;
                }
                self.view = AppView::Dashboard;
                self.notice = Some(Notice::OnboardingComplete);
            }
            BootstrapEvent::OnboardingSavedAndExited => {
                if !self.signed_in {
                    return Transition::Ignored;
                }
                self.view = AppView::Dashboard;
                self.notice = Some(Notice::ProgressSaved);
            }
        }
        Transition::Applied
    }

    /// Fold a sequence of events, returning the final state.
    #[must_use]
    pub fn replay(events: impl IntoIterator<Item = BootstrapEvent>) -> Self {
        let mut state = Self::initial();
        for event in events {
            state.apply(event);
        }
        state
    }
}
