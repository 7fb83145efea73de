//! PostgreSQL-backed [`CrmRecordsRepository`].
//!
//! Every method reads one table scoped to a restaurant. Failures carry the
//! table name so the reporting service can log which read degraded.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{CrmRecordsError, CrmRecordsRepository};
use crate::domain::{
    CreditsBalance, Customer, Feedback, LoyaltyReward, Order, QrCode, RestaurantId,
    RewardRedemption,
};

use super::error_mapping::{map_diesel_error, map_pool_error, to_count};
use super::models::{
    CreditsRow, CustomerRow, FeedbackRow, LoyaltyRewardRow, OrderRow, QrCodeRow, RedemptionRow,
};
use super::pool::DbPool;
use super::schema::{
    credits_balance, customers, feedback, loyalty_rewards, orders, qr_codes, reward_redemptions,
};

/// Diesel implementation of the CRM records port.
#[derive(Clone)]
pub struct DieselCrmRecordsRepository {
    pool: DbPool,
}

impl DieselCrmRecordsRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn diesel_error(table: &'static str) -> impl FnOnce(diesel::result::Error) -> CrmRecordsError {
    move |error| {
        map_diesel_error(
            error,
            |message| CrmRecordsError::query(table, message),
            CrmRecordsError::connection,
        )
    }
}

/// Load every row of `$table` for a restaurant and convert it.
macro_rules! load_scoped {
    ($self:ident, $restaurant:expr, $table:ident, $row:ty, $convert:expr) => {{
        let mut conn = $self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, CrmRecordsError::connection))?;
        let rows: Vec<$row> = $table::table
            .filter($table::restaurant_id.eq($restaurant.as_uuid()))
            .select(<$row>::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error(stringify!($table)))?;
        Ok(rows.into_iter().map($convert).collect())
    }};
}

fn customer_from_row(row: CustomerRow) -> Customer {
    Customer {
        id: row.id,
        email: row.email,
        phone: row.phone,
        first_name: row.first_name,
        last_name: row.last_name,
        birthday: row.birthday,
        anniversary: row.anniversary,
        total_visits: to_count(row.total_visits),
        total_spent: row.total_spent,
        last_visit: row.last_visit,
        loyalty_points: to_count(row.loyalty_points),
        profile_completion: to_count(row.profile_completion),
        tags: row.tags,
        gender: row.gender,
        location: row.location,
    }
}

fn order_from_row(row: OrderRow) -> Order {
    Order {
        id: row.id,
        customer_id: row.customer_id,
        order_number: row.order_number,
        total_amount: row.total_amount,
        order_date: row.order_date,
        status: row.status,
    }
}

fn reward_from_row(row: LoyaltyRewardRow) -> LoyaltyReward {
    LoyaltyReward {
        id: row.id,
        name: row.name,
        points_required: to_count(row.points_required),
        reward_type: row.reward_type,
        reward_value: row.reward_value,
        is_active: row.is_active,
        total_redeemed: to_count(row.total_redeemed),
    }
}

fn redemption_from_row(row: RedemptionRow) -> RewardRedemption {
    RewardRedemption {
        id: row.id,
        customer_id: row.customer_id,
        reward_id: row.reward_id,
        points_used: to_count(row.points_used),
        redeemed_at: row.redeemed_at,
    }
}

fn feedback_from_row(row: FeedbackRow) -> Feedback {
    Feedback {
        id: row.id,
        customer_id: row.customer_id,
        rating: to_count(row.rating),
        comment: row.comment,
        created_at: row.created_at,
    }
}

fn qr_code_from_row(row: QrCodeRow) -> QrCode {
    QrCode {
        id: row.id,
        name: row.name,
        code: row.code,
        scan_count: to_count(row.scan_count),
        is_active: row.is_active,
    }
}

fn credits_from_row(row: CreditsRow) -> CreditsBalance {
    CreditsBalance {
        sms: row.sms_credits,
        email: row.email_credits,
        whatsapp_utility: row.whatsapp_utility_credits,
        whatsapp_marketing: row.whatsapp_marketing_credits,
    }
}

#[async_trait]
impl CrmRecordsRepository for DieselCrmRecordsRepository {
    async fn customers(&self, restaurant: &RestaurantId) -> Result<Vec<Customer>, CrmRecordsError> {
        load_scoped!(self, restaurant, customers, CustomerRow, customer_from_row)
    }

    async fn orders(
        &self,
        restaurant: &RestaurantId,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<Order>, CrmRecordsError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, CrmRecordsError::connection))?;
        let mut query = orders::table
            .filter(orders::restaurant_id.eq(restaurant.as_uuid()))
            .select(OrderRow::as_select())
            .order_by(orders::order_date.desc())
            .into_boxed();
        if let Some(since) = since {
            query = query.filter(orders::order_date.ge(since));
        }
        let rows: Vec<OrderRow> = query
            .load(&mut conn)
            .await
            .map_err(diesel_error("orders"))?;
        Ok(rows.into_iter().map(order_from_row).collect())
    }

    async fn redemptions(
        &self,
        restaurant: &RestaurantId,
    ) -> Result<Vec<RewardRedemption>, CrmRecordsError> {
        load_scoped!(
            self,
            restaurant,
            reward_redemptions,
            RedemptionRow,
            redemption_from_row
        )
    }

    async fn loyalty_rewards(
        &self,
        restaurant: &RestaurantId,
    ) -> Result<Vec<LoyaltyReward>, CrmRecordsError> {
        load_scoped!(
            self,
            restaurant,
            loyalty_rewards,
            LoyaltyRewardRow,
            reward_from_row
        )
    }

    async fn feedback(&self, restaurant: &RestaurantId) -> Result<Vec<Feedback>, CrmRecordsError> {
        load_scoped!(self, restaurant, feedback, FeedbackRow, feedback_from_row)
    }

    async fn qr_codes(&self, restaurant: &RestaurantId) -> Result<Vec<QrCode>, CrmRecordsError> {
        load_scoped!(self, restaurant, qr_codes, QrCodeRow, qr_code_from_row)
    }

    async fn credits(
        &self,
        restaurant: &RestaurantId,
    ) -> Result<Option<CreditsBalance>, CrmRecordsError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, CrmRecordsError::connection))?;
        let row: Option<CreditsRow> = credits_balance::table
            .filter(credits_balance::restaurant_id.eq(restaurant.as_uuid()))
            .select(CreditsRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error("credits_balance"))?;
        Ok(row.map(credits_from_row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use uuid::Uuid;

    #[rstest]
    fn negative_counters_read_as_zero() {
        let customer = customer_from_row(CustomerRow {
            id: Uuid::new_v4(),
            email: None,
            phone: "+91 90000 00000".to_owned(),
            first_name: "Asha".to_owned(),
            last_name: None,
            birthday: None,
            anniversary: None,
            total_visits: -1,
            total_spent: 0.0,
            last_visit: None,
            loyalty_points: 120,
            profile_completion: 40,
            tags: Vec::new(),
            gender: None,
            location: None,
        });
        assert_eq!(customer.total_visits, 0);
        assert_eq!(customer.loyalty_points, 120);
        assert_eq!(customer.profile_completion, 40);
    }

    #[rstest]
    fn credits_keep_missing_counters_unset() {
        let credits = credits_from_row(CreditsRow {
            sms_credits: Some(0),
            email_credits: None,
            whatsapp_utility_credits: Some(12),
            whatsapp_marketing_credits: None,
        });
        assert_eq!(credits.sms, Some(0));
        assert_eq!(credits.resolve().whatsapp_utility, 12);
    }
}
