//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Repositories convert them to and from
//! domain types at the adapter boundary.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{
    accounts, campaigns, credits_balance, customers, feedback, loyalty_rewards,
    onboarding_progress, orders, qr_codes, restaurants, reward_redemptions,
};

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = accounts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AccountRow {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub password_salt: String,
    pub first_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = accounts)]
pub(crate) struct NewAccountRow<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub password_salt: &'a str,
    pub first_name: Option<&'a str>,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Restaurants and onboarding progress
// ---------------------------------------------------------------------------

/// Restaurant row used for reads and upserts.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = restaurants)]
#[diesel(treat_none_as_null = true)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RestaurantRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub street_address: Option<String>,
    pub city: String,
    pub pincode: String,
    pub gstin: Option<String>,
    pub restaurant_type: String,
    pub pos_system: Option<String>,
    pub custom_pos_name: Option<String>,
    pub number_of_outlets: i32,
    pub goals: Vec<String>,
    pub onboarding_complete: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = onboarding_progress)]
#[diesel(primary_key(owner_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct OnboardingProgressRow {
    pub owner_id: Uuid,
    pub step: i16,
    pub draft: serde_json::Value,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// CRM records (read-only)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = customers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CustomerRow {
    pub id: Uuid,
    pub email: Option<String>,
    pub phone: String,
    pub first_name: String,
    pub last_name: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub anniversary: Option<NaiveDate>,
    pub total_visits: i32,
    pub total_spent: f64,
    pub last_visit: Option<DateTime<Utc>>,
    pub loyalty_points: i32,
    pub profile_completion: i16,
    pub tags: Vec<String>,
    pub gender: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct OrderRow {
    pub id: Uuid,
    pub customer_id: Option<Uuid>,
    pub order_number: String,
    pub total_amount: f64,
    pub order_date: Option<DateTime<Utc>>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = loyalty_rewards)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct LoyaltyRewardRow {
    pub id: Uuid,
    pub name: String,
    pub points_required: i32,
    pub reward_type: String,
    pub reward_value: f64,
    pub is_active: bool,
    pub total_redeemed: i32,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = reward_redemptions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RedemptionRow {
    pub id: Uuid,
    pub customer_id: Option<Uuid>,
    pub reward_id: Option<Uuid>,
    pub points_used: i32,
    pub redeemed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = feedback)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct FeedbackRow {
    pub id: Uuid,
    pub customer_id: Option<Uuid>,
    pub rating: i16,
    pub comment: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = qr_codes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct QrCodeRow {
    pub id: Uuid,
    pub name: String,
    pub code: String,
    pub scan_count: i32,
    pub is_active: bool,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = credits_balance)]
#[diesel(primary_key(restaurant_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CreditsRow {
    pub sms_credits: Option<i64>,
    pub email_credits: Option<i64>,
    pub whatsapp_utility_credits: Option<i64>,
    pub whatsapp_marketing_credits: Option<i64>,
}

// ---------------------------------------------------------------------------
// Campaigns
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = campaigns)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CampaignRow {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub name: String,
    pub channel_label: String,
    pub status: String,
    pub message_content: serde_json::Value,
    pub target_audience: serde_json::Value,
    pub offer_type: String,
    pub has_whatsapp: bool,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub sent_at: Option<DateTime<Utc>>,
    pub total_sent: i64,
    pub total_delivered: i64,
    pub total_opened: i64,
    pub total_clicked: i64,
    pub revenue_generated: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
