//! PostgreSQL-backed [`CampaignRepository`].
//!
//! Channel copy and audience selection are stored as JSON columns; the
//! status and offer type use their stable string forms.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{CampaignRepository, CampaignRepositoryError};
use crate::domain::{Campaign, CampaignStats, CampaignStatus, RestaurantId, RewardType};

use super::error_mapping::{map_diesel_error, map_pool_error, to_count};
use super::models::CampaignRow;
use super::pool::{DbPool, PoolError};
use super::schema::campaigns;

/// Diesel implementation of the campaign port.
#[derive(Clone)]
pub struct DieselCampaignRepository {
    pool: DbPool,
}

impl DieselCampaignRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> CampaignRepositoryError {
    map_pool_error(error, CampaignRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> CampaignRepositoryError {
    map_diesel_error(
        error,
        CampaignRepositoryError::query,
        CampaignRepositoryError::connection,
    )
}

fn decode<T: serde::de::DeserializeOwned>(
    column: &str,
    id: Uuid,
    value: serde_json::Value,
) -> Result<T, CampaignRepositoryError> {
    serde_json::from_value(value).map_err(|err| {
        CampaignRepositoryError::query(format!("campaign {id} has invalid {column}: {err}"))
    })
}

fn encode<T: serde::Serialize>(column: &str, value: &T) -> Result<serde_json::Value, CampaignRepositoryError> {
    serde_json::to_value(value)
        .map_err(|err| CampaignRepositoryError::query(format!("{column} not serialisable: {err}")))
}

fn row_to_campaign(row: CampaignRow) -> Result<Campaign, CampaignRepositoryError> {
    let status = CampaignStatus::parse(&row.status).ok_or_else(|| {
        CampaignRepositoryError::query(format!("campaign {} has unknown status {}", row.id, row.status))
    })?;
    let offer_type = RewardType::parse(&row.offer_type).ok_or_else(|| {
        CampaignRepositoryError::query(format!(
            "campaign {} has unknown offer type {}",
            row.id, row.offer_type
        ))
    })?;
    Ok(Campaign {
        id: row.id,
        restaurant_id: RestaurantId::from_uuid(row.restaurant_id),
        name: row.name,
        channel_label: row.channel_label,
        status,
        offer_type,
        has_whatsapp: row.has_whatsapp,
        messages: decode("message_content", row.id, row.message_content)?,
        audience: decode("target_audience", row.id, row.target_audience)?,
        scheduled_at: row.scheduled_at,
        sent_at: row.sent_at,
        stats: CampaignStats {
            sent: to_count(row.total_sent),
            delivered: to_count(row.total_delivered),
            opens: to_count(row.total_opened),
            redeems: to_count(row.total_clicked),
            revenue: row.revenue_generated,
        },
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn campaign_to_row(campaign: &Campaign) -> Result<CampaignRow, CampaignRepositoryError> {
    let count = |value: u64| i64::try_from(value).unwrap_or(i64::MAX);
    Ok(CampaignRow {
        id: campaign.id,
        restaurant_id: *campaign.restaurant_id.as_uuid(),
        name: campaign.name.clone(),
        channel_label: campaign.channel_label.clone(),
        status: campaign.status.as_str().to_owned(),
        message_content: encode("message_content", &campaign.messages)?,
        target_audience: encode("target_audience", &campaign.audience)?,
        offer_type: campaign.offer_type.as_str().to_owned(),
        has_whatsapp: campaign.has_whatsapp,
        scheduled_at: campaign.scheduled_at,
        sent_at: campaign.sent_at,
        total_sent: count(campaign.stats.sent),
        total_delivered: count(campaign.stats.delivered),
        total_opened: count(campaign.stats.opens),
        total_clicked: count(campaign.stats.redeems),
        revenue_generated: campaign.stats.revenue,
        created_at: campaign.created_at,
        updated_at: campaign.updated_at,
    })
}

fn collect(rows: Vec<CampaignRow>) -> Result<Vec<Campaign>, CampaignRepositoryError> {
    rows.into_iter().map(row_to_campaign).collect()
}

#[async_trait]
impl CampaignRepository for DieselCampaignRepository {
    async fn list(&self, restaurant: &RestaurantId) -> Result<Vec<Campaign>, CampaignRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<CampaignRow> = campaigns::table
            .filter(campaigns::restaurant_id.eq(restaurant.as_uuid()))
            .select(CampaignRow::as_select())
            .order_by((campaigns::created_at.desc(), campaigns::id.desc()))
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        collect(rows)
    }

    async fn find_many(
        &self,
        restaurant: &RestaurantId,
        ids: &[Uuid],
    ) -> Result<Vec<Campaign>, CampaignRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<CampaignRow> = campaigns::table
            .filter(campaigns::restaurant_id.eq(restaurant.as_uuid()))
            .filter(campaigns::id.eq_any(ids))
            .select(CampaignRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        collect(rows)
    }

    async fn insert(&self, campaign: &Campaign) -> Result<(), CampaignRepositoryError> {
        let row = campaign_to_row(campaign)?;
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        diesel::insert_into(campaigns::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(diesel_error)
    }

    async fn set_status(
        &self,
        restaurant: &RestaurantId,
        ids: &[Uuid],
        status: CampaignStatus,
    ) -> Result<u64, CampaignRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let updated = diesel::update(
            campaigns::table
                .filter(campaigns::restaurant_id.eq(restaurant.as_uuid()))
                .filter(campaigns::id.eq_any(ids)),
        )
        .set((
            campaigns::status.eq(status.as_str()),
            campaigns::updated_at.eq(diesel::dsl::now),
        ))
        .execute(&mut conn)
        .await
        .map_err(diesel_error)?;
        Ok(to_count(updated))
    }

    async fn delete(
        &self,
        restaurant: &RestaurantId,
        ids: &[Uuid],
    ) -> Result<u64, CampaignRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let removed = diesel::delete(
            campaigns::table
                .filter(campaigns::restaurant_id.eq(restaurant.as_uuid()))
                .filter(campaigns::id.eq_any(ids)),
        )
        .execute(&mut conn)
        .await
        .map_err(diesel_error)?;
        Ok(to_count(removed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{WizardDraft, find_template};
    use chrono::Utc;
    use rstest::rstest;

    fn campaign() -> Campaign {
        let template = find_template("sushi-1").expect("catalogue template");
        let mut draft = WizardDraft::from_template(template, false);
        draft.sms_message = Some("Sushi day!".to_owned());
        Campaign::launch(Uuid::new_v4(), RestaurantId::random(), &draft, Utc::now())
    }

    #[rstest]
    fn rows_round_trip_campaigns() {
        let mut original = campaign();
        original.stats.redeems = 7;
        let row = campaign_to_row(&original).expect("encodes");
        assert_eq!(row.total_clicked, 7);
        assert_eq!(row_to_campaign(row).expect("decodes"), original);
    }

    #[rstest]
    fn unknown_status_is_a_query_error() {
        let mut row = campaign_to_row(&campaign()).expect("encodes");
        row.status = "Archived".to_owned();
        assert!(matches!(
            row_to_campaign(row),
            Err(CampaignRepositoryError::Query { .. })
        ));
    }
}
