//! In-process adapters used when no database is configured.
//!
//! Login attempts always live here: lockouts are per-process and reset on
//! restart. The remaining stores back local runs and behaviour tests so the
//! full signup, onboarding, and campaign flows work without PostgreSQL.

mod accounts;
mod campaigns;
mod crm_records;
mod login_attempts;
mod restaurants;

pub use accounts::InMemoryAccountRepository;
pub use campaigns::InMemoryCampaignRepository;
pub use crm_records::{CrmTables, InMemoryCrmRecords};
pub use login_attempts::InMemoryLoginAttemptStore;
pub use restaurants::InMemoryRestaurantRepository;
