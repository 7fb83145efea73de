//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, `*Store`) are implemented by outbound
//! adapters. Driving ports (`*Command`, `*Query`, [`SessionBootstrap`]) are
//! implemented by domain services and called by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod account_repository;
mod auth_command;
mod campaign_command;
mod campaign_repository;
mod crm_records_repository;
mod login_attempt_store;
mod onboarding_command;
mod reporting_query;
mod restaurant_repository;
mod session_bootstrap;

#[cfg(test)]
pub use account_repository::MockAccountRepository;
pub use account_repository::{
    AccountRepository, AccountRepositoryError, FixtureAccountRepository, StoredAccount,
};
pub use auth_command::AuthCommand;
#[cfg(test)]
pub use auth_command::MockAuthCommand;
pub use campaign_command::{BulkOutcome, CampaignCommand, CampaignQuery};
#[cfg(test)]
pub use campaign_command::{MockCampaignCommand, MockCampaignQuery};
#[cfg(test)]
pub use campaign_repository::MockCampaignRepository;
pub use campaign_repository::{
    CampaignRepository, CampaignRepositoryError, FixtureCampaignRepository,
};
#[cfg(test)]
pub use crm_records_repository::MockCrmRecordsRepository;
pub use crm_records_repository::{
    CrmRecordsError, CrmRecordsRepository, FixtureCrmRecordsRepository,
};
#[cfg(test)]
pub use login_attempt_store::MockLoginAttemptStore;
pub use login_attempt_store::{LoginAttemptStore, LoginAttemptStoreError};
#[cfg(test)]
pub use onboarding_command::MockOnboardingCommand;
pub use onboarding_command::{CompletedOnboarding, OnboardingCommand};
#[cfg(test)]
pub use reporting_query::{MockDashboardQuery, MockInsightsQuery, MockLoyaltyQuery};
pub use reporting_query::{DashboardQuery, InsightsQuery, LoyaltyQuery};
#[cfg(test)]
pub use restaurant_repository::MockRestaurantRepository;
pub use restaurant_repository::{
    FixtureRestaurantRepository, RestaurantRepository, RestaurantRepositoryError,
};
#[cfg(test)]
pub use session_bootstrap::MockSessionBootstrap;
pub use session_bootstrap::{SessionBootstrap, SessionView};

#[cfg(test)]
mod tests;
