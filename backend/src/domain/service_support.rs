//! Error mapping and degraded-read helpers shared by domain services.

use std::future::Future;

use tracing::warn;

use crate::domain::ports::{
    CampaignRepositoryError, CrmRecordsError, RestaurantRepository, RestaurantRepositoryError,
};
use crate::domain::{AccountId, Error, Restaurant};

pub(crate) fn map_restaurant_error(error: RestaurantRepositoryError) -> Error {
    match error {
        RestaurantRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("restaurant repository unavailable: {message}"))
        }
        RestaurantRepositoryError::Query { message } => {
            Error::internal(format!("restaurant repository error: {message}"))
        }
    }
}

pub(crate) fn map_campaign_error(error: CampaignRepositoryError) -> Error {
    match error {
        CampaignRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("campaign repository unavailable: {message}"))
        }
        CampaignRepositoryError::Query { message } => {
            Error::internal(format!("campaign repository error: {message}"))
        }
    }
}

/// Restaurant owned by `owner`, with failures logged and read as absent.
pub(crate) async fn owned_restaurant_or_none<R>(restaurants: &R, owner: &AccountId) -> Option<Restaurant>
where
    R: RestaurantRepository + ?Sized,
{
    match restaurants.find_by_owner(owner).await {
        Ok(found) => found,
        Err(err) => {
            warn!(error = %err, "restaurant lookup failed; using empty figures");
            None
        }
    }
}

/// Await one table read, logging a failure and substituting the default.
pub(crate) async fn or_empty<T, F>(table: &'static str, read: F) -> T
where
    T: Default,
    F: Future<Output = Result<T, CrmRecordsError>>,
{
    match read.await {
        Ok(rows) => rows,
        Err(err) => {
            warn!(table, error = %err, "table read failed; treating as empty");
            T::default()
        }
    }
}
