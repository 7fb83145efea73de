//! Tests for the customer insights views.

use super::*;
use chrono::TimeZone;
use rstest::{fixture, rstest};

#[fixture]
fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 15, 18, 0, 0)
        .single()
        .expect("valid timestamp")
}

fn customer(
    name: &str,
    visits: u32,
    spent: f64,
    days_ago: Option<i64>,
    now: DateTime<Utc>,
) -> Customer {
    let mut parts = name.splitn(2, ' ');
    Customer {
        id: Uuid::new_v4(),
        email: None,
        phone: format!("+91 98{visits:03}{:05}", spent as u32 % 100_000),
        first_name: parts.next().unwrap_or_default().to_owned(),
        last_name: parts.next().map(str::to_owned),
        birthday: None,
        anniversary: None,
        total_visits: visits,
        total_spent: spent,
        last_visit: days_ago.map(|d| now - Duration::days(d)),
        loyalty_points: visits * 100,
        profile_completion: 60,
        tags: Vec::new(),
        gender: None,
        location: None,
    }
}

#[rstest]
#[case(Some(5), 1, 100.0, Segment::New)]
#[case(Some(5), 12, 6000.0, Segment::Vip)]
#[case(Some(5), 12, 4000.0, Segment::Loyal)]
#[case(Some(30), 6, 900.0, Segment::Loyal)]
#[case(Some(10), 3, 900.0, Segment::PotentialLoyalist)]
#[case(Some(10), 2, 900.0, Segment::Promising)]
#[case(Some(31), 3, 900.0, Segment::NeedsAttention)]
#[case(Some(60), 2, 900.0, Segment::AboutToSleep)]
#[case(Some(61), 6, 900.0, Segment::CantLoose)]
#[case(Some(120), 5, 900.0, Segment::AtRisk)]
#[case(Some(121), 40, 90_000.0, Segment::Lost)]
#[case(None, 0, 0.0, Segment::Lost)]
fn customers_are_segmented_by_recency_and_frequency(
    now: DateTime<Utc>,
    #[case] days_ago: Option<i64>,
    #[case] visits: u32,
    #[case] spent: f64,
    #[case] expected: Segment,
) {
    let c = customer("Test Customer", visits, spent, days_ago, now);
    assert_eq!(Segment::classify(&c, now), expected);
}

#[rstest]
fn segment_table_lists_every_segment(now: DateTime<Utc>) {
    let inputs = InsightsInputs {
        customers: vec![
            customer("Priya Sharma", 12, 6000.0, Some(2), now),
            customer("Rahul Kumar", 8, 2400.0, Some(3), now),
            customer("Anita Rao", 7, 2100.0, Some(4), now),
            customer("Vidur Bala", 0, 0.0, None, now),
        ],
        ..InsightsInputs::default()
    };
    let table = segment_customers(&inputs, InsightsRange::Lifetime, now);
    assert_eq!(table.len(), SEGMENTS.len());
    let ids: Vec<&str> = table.iter().map(|s| s.id).collect();
    assert_eq!(ids.first(), Some(&"vip"));
    assert_eq!(ids.last(), Some(&"potential-loyalist"));

    let loyal = table.iter().find(|s| s.id == "loyal").expect("loyal row");
    assert_eq!(loyal.name, "Loyal");
    assert_eq!(loyal.count, 2);
    assert!((loyal.percentage - 50.0).abs() < f64::EPSILON);
    assert_eq!(loyal.visits, 15);
    assert!((loyal.avg_visit_per_customer - 7.5).abs() < f64::EPSILON);
    assert!((loyal.aov - 300.0).abs() < f64::EPSILON);
    assert!((loyal.total_sales - 4500.0).abs() < f64::EPSILON);

    let promising = table.iter().find(|s| s.id == "promising").expect("row");
    assert_eq!(promising.count, 0);
    assert!(promising.aov.abs() < f64::EPSILON);
}

#[rstest]
fn overview_counts_new_repeat_and_lost(now: DateTime<Utc>) {
    let inputs = InsightsInputs {
        customers: vec![
            customer("Priya Sharma", 1, 650.0, Some(1), now),
            customer("Rahul Kumar", 4, 1200.0, Some(10), now),
            customer("Saanvi Goswami", 2, 400.0, Some(200), now),
            customer("Vidur Bala", 0, 0.0, None, now),
        ],
        ..InsightsInputs::default()
    };
    let overview = InsightsOverview::compute(&inputs, InsightsRange::Lifetime, now);
    assert_eq!(overview.total_customers, 4);
    assert_eq!(overview.new_customers, 2);
    assert_eq!(overview.repeat_customers, 2);
    assert_eq!(overview.lost_customers, 2);
    assert!((overview.avg_visits_per_customer - 1.75).abs() < f64::EPSILON);
    assert!((overview.avg_spend_per_customer - 562.5).abs() < f64::EPSILON);
    assert!(!overview.has_enough_data);
}

#[rstest]
fn overview_range_narrows_to_recent_visitors(now: DateTime<Utc>) {
    let inputs = InsightsInputs {
        customers: vec![
            customer("Priya Sharma", 1, 650.0, Some(1), now),
            customer("Rahul Kumar", 4, 1200.0, Some(10), now),
        ],
        ..InsightsInputs::default()
    };
    let overview = InsightsOverview::compute(&inputs, InsightsRange::Last7Days, now);
    assert_eq!(overview.total_customers, 1);
    assert_eq!(overview.date_range, InsightsRange::Last7Days);
}

#[rstest]
fn enough_data_needs_a_hundred_customers(now: DateTime<Utc>) {
    let customers = (0..ENOUGH_DATA_CUSTOMERS)
        .map(|i| customer("Guest Diner", 1, 100.0, Some(i as i64 % 20), now))
        .collect();
    let inputs = InsightsInputs {
        customers,
        ..InsightsInputs::default()
    };
    assert!(InsightsOverview::compute(&inputs, InsightsRange::Today, now).has_enough_data);
}

#[rstest]
#[case(InsightsRange::Today, 0, true)]
#[case(InsightsRange::Today, 1, false)]
#[case(InsightsRange::Yesterday, 1, true)]
#[case(InsightsRange::Yesterday, 0, false)]
#[case(InsightsRange::Last30Days, 29, true)]
#[case(InsightsRange::Last30Days, 31, false)]
#[case(InsightsRange::Last12Months, 360, true)]
#[case(InsightsRange::Lifetime, 4000, true)]
fn ranges_bound_timestamps(
    now: DateTime<Utc>,
    #[case] range: InsightsRange,
    #[case] days_ago: i64,
    #[case] expected: bool,
) {
    assert_eq!(range.contains(now - Duration::days(days_ago), now), expected);
}

#[rstest]
#[case(VisitRange::OneToThree, 3, true)]
#[case(VisitRange::OneToThree, 0, false)]
#[case(VisitRange::FourToSeven, 4, true)]
#[case(VisitRange::EightToFifteen, 16, false)]
#[case(VisitRange::SixteenToThirty, 30, true)]
#[case(VisitRange::OverThirty, 30, false)]
#[case(VisitRange::OverThirty, 31, true)]
fn visit_ranges_are_inclusive(#[case] range: VisitRange, #[case] visits: u32, #[case] hit: bool) {
    assert_eq!(range.matches(visits), hit);
}

#[rstest]
#[case(SpendRange::UpTo499, 499.5, true)]
#[case(SpendRange::UpTo999, 500.0, true)]
#[case(SpendRange::UpTo1999, 2000.0, false)]
#[case(SpendRange::From2000, 2000.0, true)]
#[case(SpendRange::All, 0.0, true)]
fn spend_ranges_are_half_open(#[case] range: SpendRange, #[case] spend: f64, #[case] hit: bool) {
    assert_eq!(range.matches(spend), hit);
}

#[rstest]
fn spend_range_accepts_rupee_labels() {
    let range: SpendRange = serde_json::from_str("\"₹1,000-1,999\"").expect("label");
    assert_eq!(range, SpendRange::UpTo1999);
}

#[rstest]
#[case("priya", 1)]
#[case("98765", 1)]
#[case("brunch", 1)]
#[case("  ", 3)]
#[case("nobody", 0)]
fn search_matches_name_phone_or_tag(
    now: DateTime<Utc>,
    #[case] term: &str,
    #[case] expected: usize,
) {
    let mut priya = customer("Priya Sharma", 5, 2500.0, Some(2), now);
    priya.phone = "+91 98765 43210".to_owned();
    let mut saanvi = customer("Saanvi Goswami", 1, 200.0, Some(40), now);
    saanvi.tags = vec!["Weekend-Brunch".to_owned()];
    let vidur = customer("Vidur Bala", 0, 0.0, None, now);
    let inputs = InsightsInputs {
        customers: vec![priya, saanvi, vidur],
        ..InsightsInputs::default()
    };
    let query = CustomerQuery {
        search: Some(term.to_owned()),
        ..CustomerQuery::default()
    };
    assert_eq!(list_customers(&inputs, &query, now).len(), expected);
}

#[rstest]
fn list_orders_by_recent_visit_and_carries_derived_fields(now: DateTime<Utc>) {
    let older = customer("Rahul Kumar", 20, 9000.0, Some(45), now);
    let recent = customer("Priya Sharma", 2, 500.0, Some(1), now);
    let never = customer("Vidur Bala", 0, 0.0, None, now);
    let redemption = RewardRedemption {
        id: Uuid::new_v4(),
        customer_id: Some(older.id),
        reward_id: None,
        points_used: 50,
        redeemed_at: Some(now),
    };
    let inputs = InsightsInputs {
        customers: vec![older, never, recent],
        redemptions: vec![redemption],
        ..InsightsInputs::default()
    };
    let rows = list_customers(&inputs, &CustomerQuery::default(), now);
    let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["Priya Sharma", "Rahul Kumar", "Vidur Bala"]);

    let rahul = rows.get(1).expect("second row");
    assert_eq!(rahul.tier, Tier::Gold);
    assert_eq!(rahul.segment, "Needs Attention");
    assert_eq!(rahul.redemption, 1);
    assert!((rahul.average_spend - 450.0).abs() < f64::EPSILON);
    assert!(rows.windows(2).all(|w| match w {
        [a, b] => a.key() <= b.key(),
        _ => true,
    }));
}

#[rstest]
fn activity_feed_merges_sources_newest_first(now: DateTime<Utc>) {
    let priya = customer("Priya Sharma", 5, 2500.0, Some(2), now);
    let reward = LoyaltyReward {
        id: Uuid::new_v4(),
        name: "Free Dessert".to_owned(),
        points_required: 100,
        reward_type: "free_item".to_owned(),
        reward_value: 150.0,
        is_active: true,
        total_redeemed: 1,
    };
    let inputs = InsightsInputs {
        orders: vec![Order {
            id: Uuid::new_v4(),
            customer_id: Some(priya.id),
            order_number: "A-1".to_owned(),
            total_amount: 650.0,
            order_date: Some(now - Duration::hours(3)),
            status: Some("completed".to_owned()),
        }],
        redemptions: vec![RewardRedemption {
            id: Uuid::new_v4(),
            customer_id: Some(priya.id),
            reward_id: Some(reward.id),
            points_used: 100,
            redeemed_at: Some(now - Duration::hours(1)),
        }],
        feedback: vec![Feedback {
            id: Uuid::new_v4(),
            customer_id: None,
            rating: 4,
            comment: Some("Lovely biryani".to_owned()),
            created_at: Some(now - Duration::days(3)),
        }],
        rewards: vec![reward],
        customers: vec![priya],
    };

    let feed = activity_feed(&inputs, ActivityFilter::default(), InsightsRange::Lifetime, now);
    let kinds: Vec<ActivityKind> = feed.iter().map(|e| e.kind).collect();
    assert_eq!(
        kinds,
        [ActivityKind::Redemption, ActivityKind::Visit, ActivityKind::Feedback]
    );
    let redemption = feed.first().expect("redemption event");
    assert_eq!(redemption.customer_avatar, "PS");
    assert_eq!(redemption.description, "Redeemed Free Dessert for 100 pts");
    assert_eq!(redemption.points, Some(100));
    let visit = feed.get(1).expect("visit event");
    assert_eq!(visit.description, "₹650 bill paid");
    assert_eq!(visit.amount, Some(650.0));
    let feedback = feed.get(2).expect("feedback event");
    assert_eq!(feedback.customer_name, "Guest");

    let today_only = activity_feed(&inputs, ActivityFilter::default(), InsightsRange::Today, now);
    assert_eq!(today_only.len(), 2);

    let filter = ActivityFilter {
        visits: false,
        ..ActivityFilter::default()
    };
    let without_visits = activity_feed(&inputs, filter, InsightsRange::Lifetime, now);
    assert!(without_visits.iter().all(|e| e.kind != ActivityKind::Visit));
}
