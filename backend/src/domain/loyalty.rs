//! Loyalty programme overview.
//!
//! Members are the restaurant's customers, tiered by loyalty points.
//! Redemption figures cover the selected date range.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Datelike, Duration, Months, Utc, Weekday};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::records::{Customer, LoyaltyReward, Order, RewardRedemption};

/// Points needed for Silver.
pub const SILVER_POINTS: u32 = 500;
/// Points needed for Gold.
pub const GOLD_POINTS: u32 = 1500;
/// Redemptions listed under recent activity.
pub const RECENT_ACTIVITY_LIMIT: usize = 10;

/// Period covered by redemption figures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum LoyaltyRange {
    #[serde(rename = "Last 7 days")]
    Last7Days,
    #[default]
    #[serde(rename = "Last 30 Days")]
    Last30Days,
    #[serde(rename = "Last 90 days")]
    Last90Days,
    #[serde(rename = "Last 6 months")]
    Last6Months,
    #[serde(rename = "Last 12 months")]
    Last12Months,
    #[serde(rename = "All time")]
    AllTime,
}

impl LoyaltyRange {
    /// Earliest instant included, `None` for all time.
    #[must_use]
    pub fn since(self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Self::Last7Days => Some(now - Duration::days(7)),
            Self::Last30Days => Some(now - Duration::days(30)),
            Self::Last90Days => Some(now - Duration::days(90)),
            Self::Last6Months => now.checked_sub_months(Months::new(6)),
            Self::Last12Months => now.checked_sub_months(Months::new(12)),
            Self::AllTime => None,
        }
    }
}

/// Membership tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Tier {
    Bronze,
    Silver,
    Gold,
}

impl Tier {
    /// Tier earned with `points`.
    #[must_use]
    pub fn for_points(points: u32) -> Self {
        if points >= GOLD_POINTS {
            Self::Gold
        } else if points >= SILVER_POINTS {
            Self::Silver
        } else {
            Self::Bronze
        }
    }
}

/// Records the overview aggregates.
#[derive(Debug, Clone, Default)]
pub struct LoyaltyInputs {
    pub customers: Vec<Customer>,
    pub redemptions: Vec<RewardRedemption>,
    pub rewards: Vec<LoyaltyReward>,
    /// Orders used for the power customer's spend.
    pub orders: Vec<Order>,
}

/// Member with the most redemptions in the period.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PowerCustomer {
    pub name: String,
    pub redemptions: u64,
    pub spent: f64,
    /// Length of the period in days, absent for all time.
    pub days: Option<i64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoyaltySummary {
    pub total_revenue_generated: f64,
    pub times_rewards_redeemed: u64,
    pub number_of_customers: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoyaltyInsights {
    pub total_members: u64,
    pub bronze_percentage: f64,
    pub silver_percentage: f64,
    pub gold_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct RedemptionSlab {
    pub range: String,
    pub count: u64,
    pub percentage: f64,
}

/// Weekdays with the most and fewest redemptions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RedemptionDays {
    #[schema(value_type = Option<String>)]
    pub busiest: Option<Weekday>,
    #[schema(value_type = Option<String>)]
    pub quietest: Option<Weekday>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoyaltyActivity {
    pub id: Uuid,
    pub customer_id: Option<Uuid>,
    pub customer_name: String,
    pub tier: Tier,
    pub action: String,
    pub cashback: f64,
    /// Display timestamp such as `Jun 28, 2025 2:17 PM`.
    pub date: String,
    pub phone: String,
}

/// Loyalty page payload.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoyaltyOverview {
    pub date_range: LoyaltyRange,
    pub enrolled_customers: u64,
    pub power_customer: Option<PowerCustomer>,
    pub summary: LoyaltySummary,
    pub insights: LoyaltyInsights,
    pub redemption_slabs: Vec<RedemptionSlab>,
    pub redemption_days: RedemptionDays,
    pub recent_activity: Vec<LoyaltyActivity>,
}

const SLABS: [(&str, f64, f64); 4] = [
    ("Below ₹100", f64::NEG_INFINITY, 100.0),
    ("₹100 - ₹250", 100.0, 251.0),
    ("₹251 - ₹500", 251.0, 501.0),
    ("Above ₹500", 501.0, f64::INFINITY),
];

fn percent(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

fn count(items: usize) -> u64 {
    u64::try_from(items).unwrap_or(u64::MAX)
}

impl LoyaltyOverview {
    /// Build the overview for `range`.
    #[must_use]
    pub fn compute(inputs: &LoyaltyInputs, range: LoyaltyRange, now: DateTime<Utc>) -> Self {
        let since = range.since(now);
        let in_range = |at: Option<DateTime<Utc>>| {
            at.is_some_and(|at| at <= now && since.is_none_or(|start| at >= start))
        };
        let redemptions: Vec<&RewardRedemption> = inputs
            .redemptions
            .iter()
            .filter(|r| in_range(r.redeemed_at))
            .collect();
        let customers: HashMap<Uuid, &Customer> =
            inputs.customers.iter().map(|c| (c.id, c)).collect();

        let members = count(inputs.customers.len());
        let tier_count = |tier: Tier| {
            count(
                inputs
                    .customers
                    .iter()
                    .filter(|c| Tier::for_points(c.loyalty_points) == tier)
                    .count(),
            )
        };

        let redeemed = count(redemptions.len());
        let distinct: HashSet<Uuid> = redemptions.iter().filter_map(|r| r.customer_id).collect();

        Self {
            date_range: range,
            enrolled_customers: members,
            power_customer: power_customer(&redemptions, &customers, inputs, range, now),
            summary: LoyaltySummary {
                total_revenue_generated: redemptions.iter().map(|r| r.value()).sum(),
                times_rewards_redeemed: redeemed,
                number_of_customers: count(distinct.len()),
            },
            insights: LoyaltyInsights {
                total_members: members,
                bronze_percentage: percent(tier_count(Tier::Bronze), members),
                silver_percentage: percent(tier_count(Tier::Silver), members),
                gold_percentage: percent(tier_count(Tier::Gold), members),
            },
            redemption_slabs: SLABS
                .iter()
                .map(|(label, low, high)| {
                    let n = count(
                        redemptions
                            .iter()
                            .filter(|r| r.value() >= *low && r.value() < *high)
                            .count(),
                    );
                    RedemptionSlab {
                        range: (*label).to_owned(),
                        count: n,
                        percentage: percent(n, redeemed),
                    }
                })
                .collect(),
            redemption_days: redemption_days(&redemptions),
            recent_activity: recent_activity(&redemptions, &customers, &inputs.rewards),
        }
    }
}

fn power_customer(
    redemptions: &[&RewardRedemption],
    customers: &HashMap<Uuid, &Customer>,
    inputs: &LoyaltyInputs,
    range: LoyaltyRange,
    now: DateTime<Utc>,
) -> Option<PowerCustomer> {
    let since = range.since(now);
    let mut per_customer: HashMap<Uuid, u64> = HashMap::new();
    for id in redemptions.iter().filter_map(|r| r.customer_id) {
        *per_customer.entry(id).or_default() += 1;
    }
    let spent = |id: Uuid| -> f64 {
        inputs
            .orders
            .iter()
            .filter(|o| o.customer_id == Some(id) && o.is_completed())
            .filter(|o| {
                o.order_date
                    .is_some_and(|d| d <= now && since.is_none_or(|start| d >= start))
            })
            .map(|o| o.total_amount)
            .sum()
    };

    per_customer
        .into_iter()
        .filter_map(|(id, n)| customers.get(&id).map(|c| (*c, n, spent(id))))
        .max_by(|a, b| a.1.cmp(&b.1).then(a.2.total_cmp(&b.2)))
        .map(|(customer, redemptions, spent)| PowerCustomer {
            name: customer.full_name(),
            redemptions,
            spent,
            days: since.map(|start| (now - start).num_days()),
        })
}

fn redemption_days(redemptions: &[&RewardRedemption]) -> RedemptionDays {
    let mut per_day: HashMap<Weekday, u64> = HashMap::new();
    for at in redemptions.iter().filter_map(|r| r.redeemed_at) {
        *per_day.entry(at.weekday()).or_default() += 1;
    }
    // Ties resolve to the earlier weekday.
    let ordered = |day: &Weekday| day.num_days_from_monday();
    RedemptionDays {
        busiest: per_day
            .iter()
            .max_by(|a, b| a.1.cmp(b.1).then(ordered(b.0).cmp(&ordered(a.0))))
            .map(|(day, _)| *day),
        quietest: per_day
            .iter()
            .min_by(|a, b| a.1.cmp(b.1).then(ordered(a.0).cmp(&ordered(b.0))))
            .map(|(day, _)| *day),
    }
}

fn recent_activity(
    redemptions: &[&RewardRedemption],
    customers: &HashMap<Uuid, &Customer>,
    rewards: &[LoyaltyReward],
) -> Vec<LoyaltyActivity> {
    let mut latest: Vec<&RewardRedemption> = redemptions.to_vec();
    latest.sort_by(|a, b| b.redeemed_at.cmp(&a.redeemed_at));
    latest
        .into_iter()
        .take(RECENT_ACTIVITY_LIMIT)
        .map(|r| {
            let customer = r.customer_id.and_then(|id| customers.get(&id));
            LoyaltyActivity {
                id: r.id,
                customer_id: r.customer_id,
                customer_name: customer.map_or_else(|| "Unknown".to_owned(), |c| c.full_name()),
                tier: Tier::for_points(customer.map_or(0, |c| c.loyalty_points)),
                action: r
                    .reward_id
                    .and_then(|id| rewards.iter().find(|w| w.id == id))
                    .map_or_else(|| "Reward Redemption".to_owned(), |w| w.name.clone()),
                cashback: r.value(),
                date: r
                    .redeemed_at
                    .map(|at| at.format("%b %-d, %Y %-I:%M %p").to_string())
                    .unwrap_or_default(),
                phone: customer.map(|c| c.phone.clone()).unwrap_or_default(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::{fixture, rstest};

    #[fixture]
    fn now() -> DateTime<Utc> {
        // A Sunday.
        Utc.with_ymd_and_hms(2025, 6, 29, 12, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    fn customer(name: &str, points: u32) -> Customer {
        Customer {
            id: Uuid::new_v4(),
            email: None,
            phone: format!("98{points:08}"),
            first_name: name.to_owned(),
            last_name: None,
            birthday: None,
            anniversary: None,
            total_visits: 3,
            total_spent: 1500.0,
            last_visit: None,
            loyalty_points: points,
            profile_completion: 0,
            tags: Vec::new(),
            gender: None,
            location: None,
        }
    }

    fn redemption(customer: &Customer, points: u32, at: DateTime<Utc>) -> RewardRedemption {
        RewardRedemption {
            id: Uuid::new_v4(),
            customer_id: Some(customer.id),
            reward_id: None,
            points_used: points,
            redeemed_at: Some(at),
        }
    }

    #[rstest]
    #[case(0, Tier::Bronze)]
    #[case(499, Tier::Bronze)]
    #[case(500, Tier::Silver)]
    #[case(1499, Tier::Silver)]
    #[case(1500, Tier::Gold)]
    fn tiers_follow_points(#[case] points: u32, #[case] tier: Tier) {
        assert_eq!(Tier::for_points(points), tier);
    }

    #[rstest]
    fn summary_and_slabs_cover_range(now: DateTime<Utc>) {
        let ravi = customer("Ravi", 100);
        let zee = customer("Zeeshan", 800);
        let inputs = LoyaltyInputs {
            redemptions: vec![
                redemption(&ravi, 20, now - Duration::days(1)),
                redemption(&ravi, 50, now - Duration::days(2)),
                redemption(&zee, 100, now - Duration::days(3)),
                redemption(&zee, 300, now - Duration::days(60)),
            ],
            customers: vec![ravi, zee],
            ..LoyaltyInputs::default()
        };
        let overview = LoyaltyOverview::compute(&inputs, LoyaltyRange::Last30Days, now);
        assert_eq!(overview.summary.times_rewards_redeemed, 3);
        assert_eq!(overview.summary.number_of_customers, 2);
        assert!((overview.summary.total_revenue_generated - 510.0).abs() < f64::EPSILON);

        let slabs: Vec<(&str, u64)> = overview
            .redemption_slabs
            .iter()
            .map(|s| (s.range.as_str(), s.count))
            .collect();
        assert_eq!(
            slabs,
            [
                ("Below ₹100", 1),
                ("₹100 - ₹250", 1),
                ("₹251 - ₹500", 1),
                ("Above ₹500", 0),
            ]
        );

        let all_time = LoyaltyOverview::compute(&inputs, LoyaltyRange::AllTime, now);
        assert_eq!(all_time.summary.times_rewards_redeemed, 4);
    }

    #[rstest]
    fn tier_mix_is_a_percentage_of_members(now: DateTime<Utc>) {
        let inputs = LoyaltyInputs {
            customers: vec![
                customer("A", 10),
                customer("B", 20),
                customer("C", 700),
                customer("D", 2000),
            ],
            ..LoyaltyInputs::default()
        };
        let overview = LoyaltyOverview::compute(&inputs, LoyaltyRange::AllTime, now);
        assert_eq!(overview.insights.total_members, 4);
        assert!((overview.insights.bronze_percentage - 50.0).abs() < f64::EPSILON);
        assert!((overview.insights.silver_percentage - 25.0).abs() < f64::EPSILON);
        assert!((overview.insights.gold_percentage - 25.0).abs() < f64::EPSILON);
        assert!(overview.power_customer.is_none());
    }

    #[rstest]
    fn power_customer_breaks_ties_on_spend(now: DateTime<Utc>) {
        let ravi = customer("Ravi", 100);
        let divit = customer("Divit", 100);
        let order = |c: &Customer, amount| Order {
            id: Uuid::new_v4(),
            customer_id: Some(c.id),
            order_number: "O".to_owned(),
            total_amount: amount,
            order_date: Some(now - Duration::days(2)),
            status: Some("completed".to_owned()),
        };
        let inputs = LoyaltyInputs {
            redemptions: vec![
                redemption(&ravi, 10, now - Duration::days(1)),
                redemption(&divit, 10, now - Duration::days(1)),
            ],
            orders: vec![order(&ravi, 400.0), order(&divit, 900.0)],
            customers: vec![ravi, divit],
            ..LoyaltyInputs::default()
        };
        let overview = LoyaltyOverview::compute(&inputs, LoyaltyRange::Last30Days, now);
        let power = overview.power_customer.expect("power customer");
        assert_eq!(power.name, "Divit");
        assert_eq!(power.redemptions, 1);
        assert!((power.spent - 900.0).abs() < f64::EPSILON);
        assert_eq!(power.days, Some(30));
    }

    #[rstest]
    fn recent_activity_lists_latest_first(now: DateTime<Utc>) {
        let jay = customer("Jayesh", 100);
        let reward = LoyaltyReward {
            id: Uuid::new_v4(),
            name: "Bonus Import".to_owned(),
            points_required: 0,
            reward_type: "cashback".to_owned(),
            reward_value: 0.0,
            is_active: true,
            total_redeemed: 0,
        };
        let mut named = redemption(&jay, 600, now - Duration::minutes(30));
        named.reward_id = Some(reward.id);
        let inputs = LoyaltyInputs {
            redemptions: vec![redemption(&jay, 10, now - Duration::days(2)), named],
            customers: vec![jay],
            rewards: vec![reward],
            ..LoyaltyInputs::default()
        };
        let overview = LoyaltyOverview::compute(&inputs, LoyaltyRange::Last7Days, now);
        let first = overview.recent_activity.first().expect("activity");
        assert_eq!(first.action, "Bonus Import");
        assert!((first.cashback - 1800.0).abs() < f64::EPSILON);
        assert_eq!(first.date, "Jun 29, 2025 11:30 AM");
        assert_eq!(first.tier, Tier::Bronze);
        assert_eq!(
            overview.recent_activity.get(1).map(|a| a.action.as_str()),
            Some("Reward Redemption")
        );
    }

    #[rstest]
    fn redemption_days_pick_extremes(now: DateTime<Utc>) {
        let ravi = customer("Ravi", 0);
        let inputs = LoyaltyInputs {
            redemptions: vec![
                redemption(&ravi, 1, now),
                redemption(&ravi, 1, now - Duration::days(7)),
                redemption(&ravi, 1, now - Duration::days(2)),
            ],
            customers: vec![ravi],
            ..LoyaltyInputs::default()
        };
        let overview = LoyaltyOverview::compute(&inputs, LoyaltyRange::Last30Days, now);
        assert_eq!(overview.redemption_days.busiest, Some(Weekday::Sun));
        assert_eq!(overview.redemption_days.quietest, Some(Weekday::Fri));
    }
}
