//! HTTP inbound adapter exposing the `/api/v1` REST endpoints.

pub mod auth;
pub mod bootstrap;
pub mod campaigns;
pub mod dashboard;
pub mod error;
pub mod health;
pub mod insights;
pub mod loyalty;
pub mod onboarding;
pub mod paging;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

pub use error::ApiResult;
