//! Customer insights: overview, segmentation, the customer list, and the
//! activity feed.
//!
//! Every view is computed from records already loaded for one restaurant.
//! The date range narrows the overview and segmentation to customers whose
//! last visit falls inside it; the list and feed apply their own filters.

use std::cmp::Reverse;
use std::collections::HashMap;

use chrono::{DateTime, Duration, Months, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::loyalty::Tier;
use crate::domain::records::{Customer, Feedback, LoyaltyReward, Order, RewardRedemption};

/// Customers needed before insights are considered meaningful.
pub const ENOUGH_DATA_CUSTOMERS: usize = 100;
/// Customers without a visit for longer than this are lost.
pub const LOST_AFTER_DAYS: i64 = 90;
/// Events returned by the activity feed.
pub const ACTIVITY_LIMIT: usize = 50;

/// Period selector shared by every insights tab.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum InsightsRange {
    Today,
    Yesterday,
    #[serde(rename = "Last 7 days")]
    Last7Days,
    #[serde(rename = "Last 30 days")]
    Last30Days,
    #[serde(rename = "Last 12 months")]
    Last12Months,
    #[default]
    Lifetime,
}

impl InsightsRange {
    /// Half-open `[start, end)` bounds; `None` means unbounded.
    #[must_use]
    pub fn bounds(self, now: DateTime<Utc>) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
        let midnight = now.date_naive().and_time(NaiveTime::MIN).and_utc();
        match self {
            Self::Today => (Some(midnight), None),
            Self::Yesterday => (Some(midnight - Duration::days(1)), Some(midnight)),
            Self::Last7Days => (Some(now - Duration::days(7)), None),
            Self::Last30Days => (Some(now - Duration::days(30)), None),
            Self::Last12Months => (now.checked_sub_months(Months::new(12)), None),
            Self::Lifetime => (None, None),
        }
    }

    /// Whether `at` falls inside the range.
    #[must_use]
    pub fn contains(self, at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        let (start, end) = self.bounds(now);
        start.is_none_or(|s| at >= s) && end.is_none_or(|e| at < e)
    }
}

/// Records the insights views read.
#[derive(Debug, Clone, Default)]
pub struct InsightsInputs {
    pub customers: Vec<Customer>,
    pub orders: Vec<Order>,
    pub redemptions: Vec<RewardRedemption>,
    pub rewards: Vec<LoyaltyReward>,
    pub feedback: Vec<Feedback>,
}

impl InsightsInputs {
    fn in_period<'a>(
        &'a self,
        range: InsightsRange,
        now: DateTime<Utc>,
    ) -> impl Iterator<Item = &'a Customer> + 'a {
        self.customers.iter().filter(move |c| match range {
            InsightsRange::Lifetime => true,
            _ => c.last_visit.is_some_and(|at| range.contains(at, now)),
        })
    }
}

/// Snapshot cards on the overview tab.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InsightsOverview {
    pub date_range: InsightsRange,
    pub total_customers: u64,
    /// Customers with at most one visit.
    pub new_customers: u64,
    /// Customers with two or more visits.
    pub repeat_customers: u64,
    pub lost_customers: u64,
    pub avg_visits_per_customer: f64,
    pub avg_spend_per_customer: f64,
    /// False until the restaurant has enough customers for insights.
    pub has_enough_data: bool,
}

impl InsightsOverview {
    #[must_use]
    pub fn compute(inputs: &InsightsInputs, range: InsightsRange, now: DateTime<Utc>) -> Self {
        let customers: Vec<&Customer> = inputs.in_period(range, now).collect();
        let total = count(customers.len());
        let visits: u64 = customers.iter().map(|c| u64::from(c.total_visits)).sum();
        let spent: f64 = customers.iter().map(|c| c.total_spent).sum();
        Self {
            date_range: range,
            total_customers: total,
            new_customers: count(customers.iter().filter(|c| c.total_visits <= 1).count()),
            repeat_customers: count(customers.iter().filter(|c| c.total_visits >= 2).count()),
            lost_customers: count(customers.iter().filter(|c| is_lost(c, now)).count()),
            avg_visits_per_customer: round2(ratio(visits as f64, total)),
            avg_spend_per_customer: round2(ratio(spent, total)),
            has_enough_data: inputs.customers.len() >= ENOUGH_DATA_CUSTOMERS,
        }
    }
}

fn is_lost(customer: &Customer, now: DateTime<Utc>) -> bool {
    customer
        .days_since_visit(now)
        .is_none_or(|days| days > LOST_AFTER_DAYS)
}

/// Recency/frequency/spend segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum Segment {
    Vip,
    Loyal,
    Promising,
    New,
    NeedsAttention,
    AtRisk,
    Lost,
    CantLoose,
    AboutToSleep,
    PotentialLoyalist,
}

/// Segments in display order.
pub const SEGMENTS: [Segment; 10] = [
    Segment::Vip,
    Segment::Loyal,
    Segment::Promising,
    Segment::New,
    Segment::NeedsAttention,
    Segment::AtRisk,
    Segment::Lost,
    Segment::CantLoose,
    Segment::AboutToSleep,
    Segment::PotentialLoyalist,
];

/// Spend a frequent recent customer needs to count as VIP.
pub const VIP_MIN_SPEND: f64 = 5000.0;

impl Segment {
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Vip => "vip",
            Self::Loyal => "loyal",
            Self::Promising => "promising",
            Self::New => "new",
            Self::NeedsAttention => "needs-attention",
            Self::AtRisk => "at-risk",
            Self::Lost => "lost",
            Self::CantLoose => "cant-loose",
            Self::AboutToSleep => "about-to-sleep",
            Self::PotentialLoyalist => "potential-loyalist",
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Vip => "VIP",
            Self::Loyal => "Loyal",
            Self::Promising => "Promising",
            Self::New => "New",
            Self::NeedsAttention => "Needs Attention",
            Self::AtRisk => "At Risk",
            Self::Lost => "Lost",
            Self::CantLoose => "Can't Loose",
            Self::AboutToSleep => "About to sleep",
            Self::PotentialLoyalist => "Potential Loyalist",
        }
    }

    /// Classify by days since the last visit, visit count, and spend.
    #[must_use]
    pub fn classify(customer: &Customer, now: DateTime<Utc>) -> Self {
        let visits = customer.total_visits;
        match customer.days_since_visit(now) {
            Some(0..=30) => {
                if visits <= 1 {
                    Self::New
                } else if visits >= 10 && customer.total_spent >= VIP_MIN_SPEND {
                    Self::Vip
                } else if visits >= 6 {
                    Self::Loyal
                } else if visits >= 3 {
                    Self::PotentialLoyalist
                } else {
                    Self::Promising
                }
            }
            Some(31..=60) if visits >= 3 => Self::NeedsAttention,
            Some(31..=60) => Self::AboutToSleep,
            Some(61..=120) if visits >= 6 => Self::CantLoose,
            Some(61..=120) => Self::AtRisk,
            _ => Self::Lost,
        }
    }
}

/// One row of the segmentation table.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SegmentSummary {
    #[schema(value_type = String)]
    pub id: &'static str,
    #[schema(value_type = String)]
    pub name: &'static str,
    pub count: u64,
    pub percentage: f64,
    pub visits: u64,
    pub avg_visit_per_customer: f64,
    /// Average order value: sales over visits.
    pub aov: f64,
    pub total_sales: f64,
}

/// Summaries for every segment, including empty ones.
#[must_use]
pub fn segment_customers(
    inputs: &InsightsInputs,
    range: InsightsRange,
    now: DateTime<Utc>,
) -> Vec<SegmentSummary> {
    #[derive(Default)]
    struct Tally {
        count: u64,
        visits: u64,
        sales: f64,
    }

    let mut tallies: HashMap<Segment, Tally> = HashMap::new();
    let mut total = 0_u64;
    for customer in inputs.in_period(range, now) {
        total += 1;
        let tally = tallies
            .entry(Segment::classify(customer, now))
            .or_default();
        tally.count += 1;
        tally.visits += u64::from(customer.total_visits);
        tally.sales += customer.total_spent;
    }

    SEGMENTS
        .iter()
        .map(|&segment| {
            let tally = tallies.remove(&segment).unwrap_or_default();
            SegmentSummary {
                id: segment.id(),
                name: segment.name(),
                count: tally.count,
                percentage: round2(ratio(tally.count as f64, total) * 100.0),
                visits: tally.visits,
                avg_visit_per_customer: round2(ratio(tally.visits as f64, tally.count)),
                aov: round2(ratio(tally.sales, tally.visits)),
                total_sales: round2(tally.sales),
            }
        })
        .collect()
}

/// Visit-count filter on the customer list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum VisitRange {
    #[default]
    All,
    #[serde(rename = "1-3")]
    OneToThree,
    #[serde(rename = "4-7")]
    FourToSeven,
    #[serde(rename = "8-15")]
    EightToFifteen,
    #[serde(rename = "16-30")]
    SixteenToThirty,
    #[serde(rename = "30+")]
    OverThirty,
}

impl VisitRange {
    #[must_use]
    pub const fn matches(self, visits: u32) -> bool {
        match self {
            Self::All => true,
            Self::OneToThree => visits >= 1 && visits <= 3,
            Self::FourToSeven => visits >= 4 && visits <= 7,
            Self::EightToFifteen => visits >= 8 && visits <= 15,
            Self::SixteenToThirty => visits >= 16 && visits <= 30,
            Self::OverThirty => visits > 30,
        }
    }
}

/// Lifetime-spend filter on the customer list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum SpendRange {
    #[default]
    All,
    #[serde(rename = "0-499", alias = "₹0-499")]
    UpTo499,
    #[serde(rename = "500-999", alias = "₹500-999")]
    UpTo999,
    #[serde(rename = "1000-1999", alias = "₹1,000-1,999")]
    UpTo1999,
    #[serde(rename = "2000+", alias = "₹2,000+")]
    From2000,
}

impl SpendRange {
    /// Bands are half-open so fractional rupees never fall between them.
    #[must_use]
    pub fn matches(self, spend: f64) -> bool {
        match self {
            Self::All => true,
            Self::UpTo499 => (0.0..500.0).contains(&spend),
            Self::UpTo999 => (500.0..1000.0).contains(&spend),
            Self::UpTo1999 => (1000.0..2000.0).contains(&spend),
            Self::From2000 => spend >= 2000.0,
        }
    }
}

/// Filters on the customer list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerQuery {
    pub search: Option<String>,
    pub visits: VisitRange,
    pub spend: SpendRange,
}

impl CustomerQuery {
    /// Name matches ignore case; phone and tag matches are substrings.
    #[must_use]
    pub fn matches(&self, customer: &Customer) -> bool {
        self.matches_search(customer)
            && self.visits.matches(customer.total_visits)
            && self.spend.matches(customer.total_spent)
    }

    fn matches_search(&self, customer: &Customer) -> bool {
        let Some(term) = self.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) else {
            return true;
        };
        let needle = term.to_lowercase();
        customer.full_name().to_lowercase().contains(&needle)
            || customer.phone.contains(term)
            || customer
                .tags
                .iter()
                .any(|tag| tag.to_lowercase().contains(&needle))
    }
}

/// Customer list row.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRow {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub last_visit: Option<DateTime<Utc>>,
    pub total_visits: u32,
    pub lifetime_spend: f64,
    pub average_spend: f64,
    pub loyalty_points: u32,
    pub tags: Vec<String>,
    pub gender: Option<String>,
    pub birthday: Option<chrono::NaiveDate>,
    pub location: Option<String>,
    pub tier: Tier,
    #[schema(value_type = String)]
    pub segment: &'static str,
    pub pts_balance: u32,
    /// Rewards redeemed by the customer.
    pub redemption: u64,
}

/// Ordering key for the customer list: most recent visit first, then id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CustomerKey {
    last_visit: Reverse<Option<DateTime<Utc>>>,
    id: Uuid,
}

impl CustomerRow {
    #[must_use]
    pub const fn key(&self) -> CustomerKey {
        CustomerKey {
            last_visit: Reverse(self.last_visit),
            id: self.id,
        }
    }
}

/// Matching customers in list order.
#[must_use]
pub fn list_customers(
    inputs: &InsightsInputs,
    query: &CustomerQuery,
    now: DateTime<Utc>,
) -> Vec<CustomerRow> {
    let mut redemptions: HashMap<Uuid, u64> = HashMap::new();
    for id in inputs.redemptions.iter().filter_map(|r| r.customer_id) {
        *redemptions.entry(id).or_default() += 1;
    }
    let mut rows: Vec<CustomerRow> = inputs
        .customers
        .iter()
        .filter(|c| query.matches(c))
        .map(|c| CustomerRow {
            id: c.id,
            name: c.full_name(),
            phone: c.phone.clone(),
            email: c.email.clone(),
            last_visit: c.last_visit,
            total_visits: c.total_visits,
            lifetime_spend: c.total_spent,
            average_spend: round2(c.average_spend()),
            loyalty_points: c.loyalty_points,
            tags: c.tags.clone(),
            gender: c.gender.clone(),
            birthday: c.birthday,
            location: c.location.clone(),
            tier: Tier::for_points(c.loyalty_points),
            segment: Segment::classify(c, now).name(),
            pts_balance: c.loyalty_points,
            redemption: redemptions.get(&c.id).copied().unwrap_or_default(),
        })
        .collect();
    rows.sort_by_key(CustomerRow::key);
    rows
}

/// Kind of activity event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Visit,
    Campaign,
    Redemption,
    Feedback,
    Points,
}

/// Event types shown in the feed; all enabled by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct ActivityFilter {
    pub visits: bool,
    pub campaigns: bool,
    pub redemptions: bool,
    pub feedback: bool,
    pub points: bool,
}

impl Default for ActivityFilter {
    fn default() -> Self {
        Self {
            visits: true,
            campaigns: true,
            redemptions: true,
            feedback: true,
            points: true,
        }
    }
}

impl ActivityFilter {
    #[must_use]
    pub const fn allows(&self, kind: ActivityKind) -> bool {
        match kind {
            ActivityKind::Visit => self.visits,
            ActivityKind::Campaign => self.campaigns,
            ActivityKind::Redemption => self.redemptions,
            ActivityKind::Feedback => self.feedback,
            ActivityKind::Points => self.points,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEvent {
    pub id: Uuid,
    pub customer_id: Option<Uuid>,
    pub customer_name: String,
    /// Initials shown in the avatar bubble.
    pub customer_avatar: String,
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    #[schema(value_type = String)]
    pub icon: &'static str,
    pub description: String,
    pub timestamp: DateTime<Utc>,
    pub amount: Option<f64>,
    pub points: Option<u32>,
}

const UNKNOWN_CUSTOMER: &str = "Guest";

fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .take(2)
        .flat_map(char::to_uppercase)
        .collect()
}

/// Most recent events first, at most [`ACTIVITY_LIMIT`].
#[must_use]
pub fn activity_feed(
    inputs: &InsightsInputs,
    filter: ActivityFilter,
    range: InsightsRange,
    now: DateTime<Utc>,
) -> Vec<ActivityEvent> {
    let names: HashMap<Uuid, String> = inputs
        .customers
        .iter()
        .map(|c| (c.id, c.full_name()))
        .collect();
    let rewards: HashMap<Uuid, &str> = inputs
        .rewards
        .iter()
        .map(|r| (r.id, r.name.as_str()))
        .collect();
    let event = |id: Uuid,
                 customer_id: Option<Uuid>,
                 kind: ActivityKind,
                 icon: &'static str,
                 description: String,
                 timestamp: DateTime<Utc>| {
        let name = customer_id
            .and_then(|cid| names.get(&cid).cloned())
            .unwrap_or_else(|| UNKNOWN_CUSTOMER.to_owned());
        ActivityEvent {
            id,
            customer_id,
            customer_avatar: initials(&name),
            customer_name: name,
            kind,
            icon,
            description,
            timestamp,
            amount: None,
            points: None,
        }
    };

    let mut events = Vec::new();
    if filter.visits {
        events.extend(
            inputs
                .orders
                .iter()
                .filter(|o| o.is_completed())
                .filter_map(|o| {
                    let at = o.order_date?;
                    let mut e = event(
                        o.id,
                        o.customer_id,
                        ActivityKind::Visit,
                        "🍽️",
                        format!("₹{:.0} bill paid", o.total_amount),
                        at,
                    );
                    e.amount = Some(o.total_amount);
                    Some(e)
                }),
        );
    }
    if filter.redemptions {
        events.extend(inputs.redemptions.iter().filter_map(|r| {
            let at = r.redeemed_at?;
            let reward = r
                .reward_id
                .and_then(|id| rewards.get(&id).copied())
                .unwrap_or("a reward");
            let mut e = event(
                r.id,
                r.customer_id,
                ActivityKind::Redemption,
                "🎁",
                format!("Redeemed {reward} for {} pts", r.points_used),
                at,
            );
            e.points = Some(r.points_used);
            Some(e)
        }));
    }
    if filter.feedback {
        events.extend(inputs.feedback.iter().filter_map(|f| {
            let at = f.created_at?;
            let description = match f.comment.as_deref().map(str::trim) {
                Some(comment) if !comment.is_empty() => {
                    format!("Left {}★ feedback: \"{comment}\"", f.rating)
                }
                _ => format!("Left {}★ feedback", f.rating),
            };
            Some(event(
                f.id,
                f.customer_id,
                ActivityKind::Feedback,
                "⭐",
                description,
                at,
            ))
        }));
    }

    events.retain(|e| e.timestamp <= now && range.contains(e.timestamp, now));
    events.sort_by_key(|e| Reverse(e.timestamp));
    events.truncate(ACTIVITY_LIMIT);
    events
}

fn count(items: usize) -> u64 {
    u64::try_from(items).unwrap_or(u64::MAX)
}

fn ratio(part: f64, whole: u64) -> f64 {
    if whole == 0 { 0.0 } else { part / whole as f64 }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
#[path = "customer_insights_tests.rs"]
mod tests;
