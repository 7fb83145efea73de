//! PostgreSQL persistence adapters using Diesel.
//!
//! Repositories here implement the domain's driven ports over a shared
//! [`DbPool`]. Row structs (`models`) and table definitions (`schema`) stay
//! private; only the adapters, the pool, and the migration runner are
//! exported.
//!
//! # Example
//!
//! ```no_run
//! use muncho_crm::outbound::persistence::{DbPool, DieselAccountRepository, PoolConfig};
//!
//! # async fn wire() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/crm")).await?;
//! let accounts = DieselAccountRepository::new(pool);
//! # let _ = accounts;
//! # Ok(())
//! # }
//! ```

mod diesel_account_repository;
mod diesel_campaign_repository;
mod diesel_crm_records_repository;
mod diesel_restaurant_repository;
mod error_mapping;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_account_repository::DieselAccountRepository;
pub use diesel_campaign_repository::DieselCampaignRepository;
pub use diesel_crm_records_repository::DieselCrmRecordsRepository;
pub use diesel_restaurant_repository::DieselRestaurantRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
