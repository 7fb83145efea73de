//! Read models for the restaurant's CRM data.
//!
//! These records are loaded per restaurant and aggregated by the dashboard,
//! loyalty, and customer-insight services. Money values are rupee amounts.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Restaurant identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RestaurantId(Uuid);

impl RestaurantId {
    /// Wrap an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Generate a new random identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for RestaurantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Customer known to the restaurant.
#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    pub id: Uuid,
    pub email: Option<String>,
    pub phone: String,
    pub first_name: String,
    pub last_name: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub anniversary: Option<NaiveDate>,
    pub total_visits: u32,
    pub total_spent: f64,
    pub last_visit: Option<DateTime<Utc>>,
    pub loyalty_points: u32,
    pub profile_completion: u8,
    pub tags: Vec<String>,
    pub gender: Option<String>,
    pub location: Option<String>,
}

impl Customer {
    /// First and last name joined, trimmed when the last name is absent.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!(
            "{} {}",
            self.first_name,
            self.last_name.as_deref().unwrap_or_default()
        )
        .trim()
        .to_owned()
    }

    /// Average spend per visit, zero for customers without visits.
    #[must_use]
    pub fn average_spend(&self) -> f64 {
        if self.total_visits == 0 {
            0.0
        } else {
            self.total_spent / f64::from(self.total_visits)
        }
    }

    /// Whole days since the last visit, `None` when never visited.
    #[must_use]
    pub fn days_since_visit(&self, now: DateTime<Utc>) -> Option<i64> {
        self.last_visit.map(|visit| (now - visit).num_days().max(0))
    }
}

/// Status string marking a completed order.
pub const ORDER_COMPLETED: &str = "completed";

/// Point-of-sale order.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: Uuid,
    pub customer_id: Option<Uuid>,
    pub order_number: String,
    pub total_amount: f64,
    pub order_date: Option<DateTime<Utc>>,
    pub status: Option<String>,
}

impl Order {
    /// Whether the order counts towards sales.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status.as_deref() == Some(ORDER_COMPLETED)
    }
}

/// Reward configured in the loyalty programme.
#[derive(Debug, Clone, PartialEq)]
pub struct LoyaltyReward {
    pub id: Uuid,
    pub name: String,
    pub points_required: u32,
    pub reward_type: String,
    pub reward_value: f64,
    pub is_active: bool,
    pub total_redeemed: u32,
}

/// Rupee value credited per loyalty point redeemed.
pub const RUPEES_PER_POINT: f64 = 3.0;

/// One reward redemption.
#[derive(Debug, Clone, PartialEq)]
pub struct RewardRedemption {
    pub id: Uuid,
    pub customer_id: Option<Uuid>,
    pub reward_id: Option<Uuid>,
    pub points_used: u32,
    pub redeemed_at: Option<DateTime<Utc>>,
}

impl RewardRedemption {
    /// Revenue attributed to the redemption.
    #[must_use]
    pub fn value(&self) -> f64 {
        f64::from(self.points_used) * RUPEES_PER_POINT
    }
}

/// Customer feedback entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Feedback {
    pub id: Uuid,
    pub customer_id: Option<Uuid>,
    pub rating: u8,
    pub comment: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Ratings strictly below this are negative.
pub const NEGATIVE_RATING_BELOW: u8 = 3;

/// Table-top or counter QR code.
#[derive(Debug, Clone, PartialEq)]
pub struct QrCode {
    pub id: Uuid,
    pub name: String,
    pub code: String,
    pub scan_count: u32,
    pub is_active: bool,
}

/// Rupee revenue attributed per QR scan.
pub const RUPEES_PER_QR_SCAN: f64 = 50.0;

/// Raw per-channel credit counters as stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CreditsBalance {
    pub sms: Option<i64>,
    pub email: Option<i64>,
    pub whatsapp_utility: Option<i64>,
    pub whatsapp_marketing: Option<i64>,
}

/// Credits shown when a counter is missing or zero.
pub const DEFAULT_CREDITS: ChannelCredits = ChannelCredits {
    sms: 150,
    email: 200,
    whatsapp_utility: 75,
    whatsapp_marketing: 50,
};

/// Per-channel credits after defaults are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChannelCredits {
    pub sms: i64,
    pub email: i64,
    pub whatsapp_utility: i64,
    pub whatsapp_marketing: i64,
}

impl Default for ChannelCredits {
    fn default() -> Self {
        DEFAULT_CREDITS
    }
}

fn or_default(value: Option<i64>, fallback: i64) -> i64 {
    value.filter(|v| *v != 0).unwrap_or(fallback)
}

impl CreditsBalance {
    /// Replace missing or zero counters with [`DEFAULT_CREDITS`].
    #[must_use]
    pub fn resolve(&self) -> ChannelCredits {
        ChannelCredits {
            sms: or_default(self.sms, DEFAULT_CREDITS.sms),
            email: or_default(self.email, DEFAULT_CREDITS.email),
            whatsapp_utility: or_default(self.whatsapp_utility, DEFAULT_CREDITS.whatsapp_utility),
            whatsapp_marketing: or_default(
                self.whatsapp_marketing,
                DEFAULT_CREDITS.whatsapp_marketing,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn customer() -> Customer {
        Customer {
            id: Uuid::new_v4(),
            email: None,
            phone: "9000000000".to_owned(),
            first_name: "Ravi".to_owned(),
            last_name: None,
            birthday: None,
            anniversary: None,
            total_visits: 4,
            total_spent: 1000.0,
            last_visit: None,
            loyalty_points: 0,
            profile_completion: 0,
            tags: Vec::new(),
            gender: None,
            location: None,
        }
    }

    #[test]
    fn full_name_trims_missing_last_name() {
        let mut c = customer();
        assert_eq!(c.full_name(), "Ravi");
        c.last_name = Some("Jani".to_owned());
        assert_eq!(c.full_name(), "Ravi Jani");
    }

    #[test]
    fn average_spend_handles_zero_visits() {
        let mut c = customer();
        assert!((c.average_spend() - 250.0).abs() < f64::EPSILON);
        c.total_visits = 0;
        assert!(c.average_spend().abs() < f64::EPSILON);
    }

    #[test]
    fn days_since_visit_counts_whole_days() {
        let now = Utc::now();
        let mut c = customer();
        assert_eq!(c.days_since_visit(now), None);
        c.last_visit = Some(now - Duration::hours(49));
        assert_eq!(c.days_since_visit(now), Some(2));
    }

    #[test]
    fn redemption_value_uses_point_rate() {
        let redemption = RewardRedemption {
            id: Uuid::new_v4(),
            customer_id: None,
            reward_id: None,
            points_used: 40,
            redeemed_at: None,
        };
        assert!((redemption.value() - 120.0).abs() < f64::EPSILON);
    }

    #[test]
    fn credits_fall_back_when_missing_or_zero() {
        let balance = CreditsBalance {
            sms: Some(0),
            email: Some(12),
            whatsapp_utility: None,
            whatsapp_marketing: Some(-3),
        };
        let credits = balance.resolve();
        assert_eq!(credits.sms, 150);
        assert_eq!(credits.email, 12);
        assert_eq!(credits.whatsapp_utility, 75);
        assert_eq!(credits.whatsapp_marketing, -3);
    }
}
