//! Dashboard metrics computed from a restaurant's CRM records.
//!
//! [`DashboardData::compute`] is pure: the service gathers the records and
//! hands them over together with the clock reading. Fetch failures are
//! handled upstream by substituting empty collections, so every metric
//! degrades to zero rather than failing the page.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::campaign::Campaign;
use crate::domain::records::{
    ChannelCredits, CreditsBalance, Customer, Feedback, LoyaltyReward, NEGATIVE_RATING_BELOW,
    Order, QrCode, RUPEES_PER_QR_SCAN, RewardRedemption,
};

/// Days shown in the sales and visits charts.
pub const SERIES_DAYS: i64 = 30;
/// Visit recency separating active from inactive customers.
pub const ACTIVE_WITHIN_DAYS: i64 = 30;
/// Look-ahead for upcoming birthdays and anniversaries.
pub const CELEBRATION_WINDOW_DAYS: i64 = 30;
/// Profile completion counted as complete.
pub const PROFILE_COMPLETE_AT: u8 = 80;

const TOP_REWARDS: usize = 4;
const CELEBRATIONS: usize = 4;
const VALID_SHARE: f64 = 0.9;
const BLOCKED_SHARE: f64 = 0.1;

/// Period the headline figures cover.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Timeframe {
    #[default]
    Today,
    Yesterday,
    #[serde(rename = "Last 7 days")]
    Last7Days,
    #[serde(rename = "Last 30 days")]
    Last30Days,
    /// Any unrecognised label; covers the last day.
    #[serde(other)]
    Other,
}

impl Timeframe {
    /// Parse a timeframe label, falling back to [`Timeframe::Other`].
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label {
            "Today" => Self::Today,
            "Yesterday" => Self::Yesterday,
            "Last 7 days" => Self::Last7Days,
            "Last 30 days" => Self::Last30Days,
            _ => Self::Other,
        }
    }

    /// Start of the period ending at `now`.
    #[must_use]
    pub fn start(self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            Self::Today => start_of_day(now),
            Self::Yesterday => start_of_day(now - Duration::days(1)),
            Self::Last7Days => now - Duration::days(7),
            Self::Last30Days => now - Duration::days(30),
            Self::Other => now - Duration::days(1),
        }
    }

    /// Earliest order date the dashboard needs for this timeframe.
    ///
    /// Covers both the headline period and the 30-day charts.
    #[must_use]
    pub fn fetch_since(self, now: DateTime<Utc>) -> DateTime<Utc> {
        let series_start = start_of_day(now - Duration::days(SERIES_DAYS - 1));
        self.start(now).min(series_start)
    }
}

fn start_of_day(at: DateTime<Utc>) -> DateTime<Utc> {
    at.date_naive().and_time(NaiveTime::MIN).and_utc()
}

/// Records the dashboard aggregates.
#[derive(Debug, Clone, Default)]
pub struct DashboardInputs {
    /// Orders since [`Timeframe::fetch_since`].
    pub orders: Vec<Order>,
    pub customers: Vec<Customer>,
    pub campaigns: Vec<Campaign>,
    pub redemptions: Vec<RewardRedemption>,
    pub feedback: Vec<Feedback>,
    pub qr_codes: Vec<QrCode>,
    pub credits: Option<CreditsBalance>,
    pub loyalty_rewards: Vec<LoyaltyReward>,
}

/// Sales on one day.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SalesPoint {
    pub date: NaiveDate,
    pub amount: f64,
    pub valid_amount: f64,
    pub blocked_amount: f64,
}

/// Visits on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VisitsPoint {
    pub date: NaiveDate,
    pub visits: u64,
    pub valid_visits: u64,
    pub blocked_visits: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoyaltyStats {
    pub redemptions: u64,
    pub revenue_gain: f64,
    pub redemption_rate: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CampaignStatsSummary {
    pub total_sent: u64,
    pub customers_visited: u64,
    pub revenue_gain: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackStats {
    pub total_feedbacks: u64,
    pub average_rating: f64,
    /// Share of ratings below 3, as a percentage.
    pub negative_feedback: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AutoCampaignStats {
    pub currently_active: u64,
    pub customers_visited: u64,
    pub revenue_gain: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QrCodeStats {
    pub active_qr_codes: u64,
    pub customers_captured: u64,
    pub revenue: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReferralStats {
    pub potential_customers: u64,
    pub new_customers: u64,
    pub revenue: f64,
}

/// Customers grouped by visit count.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct FrequencyBucket {
    pub label: String,
    pub count: u64,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct TopReward {
    pub name: String,
    pub redeemed: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub enum CelebrationKind {
    Birthday,
    Anniversary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Celebration {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: CelebrationKind,
    /// Display date such as `Mar 5`.
    pub date: String,
    pub phone: String,
    #[serde(skip)]
    on: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileCompletion {
    pub percentage: f64,
    pub completed_count: u64,
    pub total_count: u64,
}

/// Everything the dashboard page shows.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    pub total_sales: f64,
    pub total_orders: u64,
    pub total_customers: u64,
    pub new_customers: u64,
    pub repeat_customers: u64,
    pub rewards_redeemed: u64,
    pub sales_data: Vec<SalesPoint>,
    pub visits_data: Vec<VisitsPoint>,
    pub active_customers: u64,
    pub inactive_customers: u64,
    pub credits: ChannelCredits,
    pub revenue_from_crm: f64,
    pub visits_from_crm: u64,
    pub average_order_value: f64,
    pub average_visits_per_year: f64,
    pub loyalty_stats: LoyaltyStats,
    pub campaign_stats: CampaignStatsSummary,
    pub feedback_stats: FeedbackStats,
    pub auto_campaign_stats: AutoCampaignStats,
    pub qr_code_stats: QrCodeStats,
    pub referral_stats: ReferralStats,
    pub customer_frequency: Vec<FrequencyBucket>,
    pub top_rewards: Vec<TopReward>,
    pub upcoming_celebrations: Vec<Celebration>,
    pub profile_completion: ProfileCompletion,
}

const FREQUENCY_RANGES: [(&str, u32, u32); 4] = [
    ("Visit 1 time", 1, 1),
    ("Visit 2 times", 2, 2),
    ("Visit 3 to 5 times", 3, 5),
    ("Visit 5+ times", 6, u32::MAX),
];

fn percent(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

fn len(items: usize) -> u64 {
    u64::try_from(items).unwrap_or(u64::MAX)
}

impl DashboardData {
    /// Zeroed dashboard used when no restaurant data is available.
    #[must_use]
    pub fn fallback() -> Self {
        Self {
            total_sales: 0.0,
            total_orders: 0,
            total_customers: 0,
            new_customers: 0,
            repeat_customers: 0,
            rewards_redeemed: 0,
            sales_data: Vec::new(),
            visits_data: Vec::new(),
            active_customers: 0,
            inactive_customers: 0,
            credits: ChannelCredits::default(),
            revenue_from_crm: 0.0,
            visits_from_crm: 0,
            average_order_value: 0.0,
            average_visits_per_year: 0.0,
            loyalty_stats: LoyaltyStats::default(),
            campaign_stats: CampaignStatsSummary::default(),
            feedback_stats: FeedbackStats::default(),
            auto_campaign_stats: AutoCampaignStats::default(),
            qr_code_stats: QrCodeStats::default(),
            referral_stats: ReferralStats::default(),
            customer_frequency: frequency(&[]),
            top_rewards: Vec::new(),
            upcoming_celebrations: Vec::new(),
            profile_completion: ProfileCompletion::default(),
        }
    }

    /// Aggregate `inputs` for `timeframe`.
    #[must_use]
    pub fn compute(inputs: &DashboardInputs, timeframe: Timeframe, now: DateTime<Utc>) -> Self {
        let start = timeframe.start(now);
        let completed: Vec<&Order> = inputs
            .orders
            .iter()
            .filter(|o| o.is_completed())
            .filter(|o| o.order_date.is_some_and(|d| d >= start && d <= now))
            .collect();
        let total_sales: f64 = completed.iter().map(|o| o.total_amount).sum();
        let total_orders = len(completed.len());

        let customers = &inputs.customers;
        let total_customers = len(customers.len());
        let active_since = now - Duration::days(ACTIVE_WITHIN_DAYS);
        let active_customers = len(
            customers
                .iter()
                .filter(|c| c.last_visit.is_some_and(|v| v > active_since))
                .count(),
        );
        let new_customers = len(customers.iter().filter(|c| c.total_visits <= 1).count());
        let rewards_redeemed = len(inputs.redemptions.len());

        let (sales_data, visits_data) = series(&inputs.orders, now);

        let campaign_stats = CampaignStatsSummary {
            total_sent: inputs.campaigns.iter().map(|c| c.stats.sent).sum(),
            customers_visited: inputs.campaigns.iter().map(|c| c.stats.redeems).sum(),
            revenue_gain: inputs.campaigns.iter().map(|c| c.stats.revenue).sum(),
        };
        let loyalty_revenue: f64 = inputs.redemptions.iter().map(RewardRedemption::value).sum();

        let total_feedbacks = len(inputs.feedback.len());
        let rating_sum: u64 = inputs.feedback.iter().map(|f| u64::from(f.rating)).sum();
        let negative = len(
            inputs
                .feedback
                .iter()
                .filter(|f| f.rating < NEGATIVE_RATING_BELOW)
                .count(),
        );

        let qr_scans: u64 = inputs.qr_codes.iter().map(|q| u64::from(q.scan_count)).sum();

        let completed_profiles = len(
            customers
                .iter()
                .filter(|c| c.profile_completion >= PROFILE_COMPLETE_AT)
                .count(),
        );
        let total_visits: u64 = customers.iter().map(|c| u64::from(c.total_visits)).sum();

        let mut top_rewards: Vec<TopReward> = inputs
            .loyalty_rewards
            .iter()
            .map(|r| TopReward {
                name: r.name.clone(),
                redeemed: r.total_redeemed,
            })
            .collect();
        top_rewards.sort_by(|a, b| b.redeemed.cmp(&a.redeemed));
        top_rewards.truncate(TOP_REWARDS);

        Self {
            total_sales,
            total_orders,
            total_customers,
            new_customers,
            repeat_customers: total_customers - new_customers,
            rewards_redeemed,
            sales_data,
            visits_data,
            active_customers,
            inactive_customers: total_customers - active_customers,
            credits: inputs
                .credits
                .map_or_else(ChannelCredits::default, |c| c.resolve()),
            revenue_from_crm: campaign_stats.revenue_gain + loyalty_revenue,
            visits_from_crm: campaign_stats.customers_visited + rewards_redeemed,
            average_order_value: if total_orders == 0 {
                0.0
            } else {
                total_sales / total_orders as f64
            },
            average_visits_per_year: if total_customers == 0 {
                0.0
            } else {
                total_visits as f64 / total_customers as f64
            },
            loyalty_stats: LoyaltyStats {
                redemptions: rewards_redeemed,
                revenue_gain: loyalty_revenue,
                redemption_rate: percent(rewards_redeemed, total_customers),
            },
            campaign_stats,
            feedback_stats: FeedbackStats {
                total_feedbacks,
                average_rating: if total_feedbacks == 0 {
                    0.0
                } else {
                    rating_sum as f64 / total_feedbacks as f64
                },
                negative_feedback: percent(negative, total_feedbacks),
            },
            auto_campaign_stats: AutoCampaignStats::default(),
            qr_code_stats: QrCodeStats {
                active_qr_codes: len(inputs.qr_codes.iter().filter(|q| q.is_active).count()),
                customers_captured: qr_scans,
                revenue: qr_scans as f64 * RUPEES_PER_QR_SCAN,
            },
            referral_stats: ReferralStats::default(),
            customer_frequency: frequency(customers),
            top_rewards,
            upcoming_celebrations: upcoming_celebrations(customers, now.date_naive()),
            profile_completion: ProfileCompletion {
                percentage: percent(completed_profiles, total_customers),
                completed_count: completed_profiles,
                total_count: total_customers,
            },
        }
    }
}

fn series(orders: &[Order], now: DateTime<Utc>) -> (Vec<SalesPoint>, Vec<VisitsPoint>) {
    let mut per_day: HashMap<NaiveDate, (f64, u64)> = HashMap::new();
    for order in orders.iter().filter(|o| o.is_completed()) {
        if let Some(date) = order.order_date {
            let entry = per_day.entry(date.date_naive()).or_default();
            entry.0 += order.total_amount;
            entry.1 += 1;
        }
    }

    let today = now.date_naive();
    (0..SERIES_DAYS)
        .rev()
        .map(|back| {
            let date = today - Duration::days(back);
            let (amount, visits) = per_day.get(&date).copied().unwrap_or_default();
            (
                SalesPoint {
                    date,
                    amount,
                    valid_amount: amount * VALID_SHARE,
                    blocked_amount: amount * BLOCKED_SHARE,
                },
                VisitsPoint {
                    date,
                    visits,
                    valid_visits: (visits as f64 * VALID_SHARE).floor() as u64,
                    blocked_visits: (visits as f64 * BLOCKED_SHARE).floor() as u64,
                },
            )
        })
        .unzip()
}

fn frequency(customers: &[Customer]) -> Vec<FrequencyBucket> {
    let total = len(customers.len());
    let mut buckets: Vec<FrequencyBucket> = FREQUENCY_RANGES
        .iter()
        .map(|(label, min, max)| {
            let count = len(
                customers
                    .iter()
                    .filter(|c| c.total_visits >= *min && c.total_visits <= *max)
                    .count(),
            );
            FrequencyBucket {
                label: (*label).to_owned(),
                count,
                percentage: percent(count, total),
            }
        })
        .collect();
    buckets.push(FrequencyBucket {
        label: "Total Visitors".to_owned(),
        count: total,
        percentage: 100.0,
    });
    buckets
}

/// Next occurrence of an annual date on or after `today`.
///
/// February 29 falls on March 1 in common years.
fn next_occurrence(date: NaiveDate, today: NaiveDate) -> Option<NaiveDate> {
    let in_year = |year: i32| {
        NaiveDate::from_ymd_opt(year, date.month(), date.day())
            .or_else(|| NaiveDate::from_ymd_opt(year, 3, 1))
    };
    let this_year = in_year(today.year())?;
    if this_year < today {
        in_year(today.year() + 1)
    } else {
        Some(this_year)
    }
}

fn upcoming_celebrations(customers: &[Customer], today: NaiveDate) -> Vec<Celebration> {
    let horizon = today + Duration::days(CELEBRATION_WINDOW_DAYS);
    let mut found: Vec<Celebration> = customers
        .iter()
        .flat_map(|customer| {
            [
                (customer.birthday, CelebrationKind::Birthday),
                (customer.anniversary, CelebrationKind::Anniversary),
            ]
            .into_iter()
            .filter_map(move |(date, kind)| {
                let on = next_occurrence(date?, today)?;
                (on <= horizon).then(|| Celebration {
                    name: customer.full_name(),
                    kind,
                    date: on.format("%b %-d").to_string(),
                    phone: customer.phone.clone(),
                    on: Some(on),
                })
            })
        })
        .collect();
    found.sort_by_key(|c| c.on);
    found.truncate(CELEBRATIONS);
    found
}

#[cfg(test)]
#[path = "dashboard_tests.rs"]
mod tests;
