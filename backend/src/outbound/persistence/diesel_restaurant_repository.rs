//! PostgreSQL-backed [`RestaurantRepository`].
//!
//! Restaurants are upserted by id; onboarding drafts live in their own table
//! as JSON so partially filled forms survive schema-level validation.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{RestaurantRepository, RestaurantRepositoryError};
use crate::domain::{
    AccountId, OnboardingDraft, OnboardingProgress, Restaurant, RestaurantId, RestaurantProfile,
};

use super::error_mapping::{map_diesel_error, map_pool_error, to_count};
use super::models::{OnboardingProgressRow, RestaurantRow};
use super::pool::{DbPool, PoolError};
use super::schema::{onboarding_progress, restaurants};

/// Diesel implementation of the restaurant port.
#[derive(Clone)]
pub struct DieselRestaurantRepository {
    pool: DbPool,
}

impl DieselRestaurantRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> RestaurantRepositoryError {
    map_pool_error(error, RestaurantRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> RestaurantRepositoryError {
    map_diesel_error(
        error,
        RestaurantRepositoryError::query,
        RestaurantRepositoryError::connection,
    )
}

fn row_to_restaurant(row: RestaurantRow) -> Restaurant {
    Restaurant {
        id: RestaurantId::from_uuid(row.id),
        owner_id: AccountId::from_uuid(row.owner_id),
        profile: RestaurantProfile {
            name: row.name,
            street_address: row.street_address,
            city: row.city,
            pincode: row.pincode,
            gstin: row.gstin,
            restaurant_type: row.restaurant_type,
            pos_system: row.pos_system,
            custom_pos_name: row.custom_pos_name,
            number_of_outlets: to_count(row.number_of_outlets),
            goals: row.goals,
        },
        onboarding_complete: row.onboarding_complete,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

fn restaurant_to_row(restaurant: &Restaurant) -> RestaurantRow {
    let profile = &restaurant.profile;
    RestaurantRow {
        id: *restaurant.id.as_uuid(),
        owner_id: *restaurant.owner_id.as_uuid(),
        name: profile.name.clone(),
        street_address: profile.street_address.clone(),
        city: profile.city.clone(),
        pincode: profile.pincode.clone(),
        gstin: profile.gstin.clone(),
        restaurant_type: profile.restaurant_type.clone(),
        pos_system: profile.pos_system.clone(),
        custom_pos_name: profile.custom_pos_name.clone(),
        number_of_outlets: i32::try_from(profile.number_of_outlets).unwrap_or(i32::MAX),
        goals: profile.goals.clone(),
        onboarding_complete: restaurant.onboarding_complete,
        created_at: restaurant.created_at,
        updated_at: restaurant.updated_at,
    }
}

fn row_to_progress(row: OnboardingProgressRow) -> Result<OnboardingProgress, RestaurantRepositoryError> {
    let draft: OnboardingDraft = serde_json::from_value(row.draft).map_err(|err| {
        RestaurantRepositoryError::query(format!("stored onboarding draft is invalid: {err}"))
    })?;
    Ok(OnboardingProgress {
        step: to_count(row.step),
        draft,
        updated_at: row.updated_at,
    })
}

#[async_trait]
impl RestaurantRepository for DieselRestaurantRepository {
    async fn find_by_owner(
        &self,
        owner: &AccountId,
    ) -> Result<Option<Restaurant>, RestaurantRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row: Option<RestaurantRow> = restaurants::table
            .filter(restaurants::owner_id.eq(owner.as_uuid()))
            .select(RestaurantRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        Ok(row.map(row_to_restaurant))
    }

    async fn save(&self, restaurant: &Restaurant) -> Result<(), RestaurantRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = restaurant_to_row(restaurant);
        diesel::insert_into(restaurants::table)
            .values(&row)
            .on_conflict(restaurants::id)
            .do_update()
            .set(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(diesel_error)
    }

    async fn load_progress(
        &self,
        owner: &AccountId,
    ) -> Result<Option<OnboardingProgress>, RestaurantRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row: Option<OnboardingProgressRow> = onboarding_progress::table
            .filter(onboarding_progress::owner_id.eq(owner.as_uuid()))
            .select(OnboardingProgressRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        row.map(row_to_progress).transpose()
    }

    async fn save_progress(
        &self,
        owner: &AccountId,
        progress: &OnboardingProgress,
    ) -> Result<(), RestaurantRepositoryError> {
        let draft = serde_json::to_value(&progress.draft).map_err(|err| {
            RestaurantRepositoryError::query(format!("onboarding draft not serialisable: {err}"))
        })?;
        let row = OnboardingProgressRow {
            owner_id: *owner.as_uuid(),
            step: i16::from(progress.step),
            draft,
            updated_at: progress.updated_at,
        };
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        diesel::insert_into(onboarding_progress::table)
            .values(&row)
            .on_conflict(onboarding_progress::owner_id)
            .do_update()
            .set(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(diesel_error)
    }

    async fn clear_progress(&self, owner: &AccountId) -> Result<(), RestaurantRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        diesel::delete(
            onboarding_progress::table.filter(onboarding_progress::owner_id.eq(owner.as_uuid())),
        )
        .execute(&mut conn)
        .await
        .map(|_| ())
        .map_err(diesel_error)
    }
}
