//! Tests for dashboard aggregation.

use super::*;
use crate::domain::campaign::{Audience, CampaignStats, CampaignStatus, ChannelMessages, RewardType};
use crate::domain::records::RestaurantId;
use chrono::TimeZone;
use rstest::{fixture, rstest};
use uuid::Uuid;

#[fixture]
fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 6, 15, 14, 30, 0)
        .single()
        .expect("valid timestamp")
}

fn order(amount: f64, at: DateTime<Utc>, status: &str) -> Order {
    Order {
        id: Uuid::new_v4(),
        customer_id: None,
        order_number: "ORD-1".to_owned(),
        total_amount: amount,
        order_date: Some(at),
        status: Some(status.to_owned()),
    }
}

fn customer(visits: u32, last_visit_days: Option<i64>, now: DateTime<Utc>) -> Customer {
    Customer {
        id: Uuid::new_v4(),
        email: None,
        phone: "9800000000".to_owned(),
        first_name: "Asha".to_owned(),
        last_name: Some("Rao".to_owned()),
        birthday: None,
        anniversary: None,
        total_visits: visits,
        total_spent: f64::from(visits) * 400.0,
        last_visit: last_visit_days.map(|d| now - Duration::days(d)),
        loyalty_points: 0,
        profile_completion: 50,
        tags: Vec::new(),
        gender: None,
        location: None,
    }
}

fn campaign(sent: u64, redeems: u64, revenue: f64, now: DateTime<Utc>) -> Campaign {
    Campaign {
        id: Uuid::new_v4(),
        restaurant_id: RestaurantId::random(),
        name: "Weekend".to_owned(),
        channel_label: "SMS".to_owned(),
        status: CampaignStatus::Completed,
        offer_type: RewardType::Flat,
        has_whatsapp: false,
        messages: ChannelMessages::default(),
        audience: Audience::default(),
        scheduled_at: None,
        sent_at: None,
        stats: CampaignStats {
            sent,
            delivered: sent,
            opens: 0,
            redeems,
            revenue,
        },
        created_at: now,
        updated_at: now,
    }
}

#[rstest]
#[case("Today", Timeframe::Today)]
#[case("Last 7 days", Timeframe::Last7Days)]
#[case("Last fortnight", Timeframe::Other)]
fn parses_timeframe_labels(#[case] label: &str, #[case] expected: Timeframe) {
    assert_eq!(Timeframe::from_label(label), expected);
}

#[rstest]
fn timeframe_starts(now: DateTime<Utc>) {
    let midnight = Utc
        .with_ymd_and_hms(2026, 6, 15, 0, 0, 0)
        .single()
        .expect("valid timestamp");
    assert_eq!(Timeframe::Today.start(now), midnight);
    assert_eq!(Timeframe::Yesterday.start(now), midnight - Duration::days(1));
    assert_eq!(Timeframe::Other.start(now), now - Duration::days(1));
    assert_eq!(
        Timeframe::Today.fetch_since(now),
        midnight - Duration::days(29)
    );
    assert_eq!(
        Timeframe::Last30Days.fetch_since(now),
        now - Duration::days(30)
    );
}

#[rstest]
fn headline_totals_use_completed_orders_in_range(now: DateTime<Utc>) {
    let inputs = DashboardInputs {
        orders: vec![
            order(500.0, now - Duration::hours(1), "completed"),
            order(300.0, now - Duration::hours(2), "cancelled"),
            order(700.0, now - Duration::days(3), "completed"),
        ],
        ..DashboardInputs::default()
    };
    let today = DashboardData::compute(&inputs, Timeframe::Today, now);
    assert!((today.total_sales - 500.0).abs() < f64::EPSILON);
    assert_eq!(today.total_orders, 1);
    assert!((today.average_order_value - 500.0).abs() < f64::EPSILON);

    let week = DashboardData::compute(&inputs, Timeframe::Last7Days, now);
    assert!((week.total_sales - 1200.0).abs() < f64::EPSILON);
    assert_eq!(week.total_orders, 2);
}

#[rstest]
fn series_covers_thirty_days_ending_today(now: DateTime<Utc>) {
    let inputs = DashboardInputs {
        orders: vec![
            order(1000.0, now - Duration::hours(1), "completed"),
            order(200.0, now - Duration::hours(3), "completed"),
            order(50.0, now - Duration::days(2), "completed"),
        ],
        ..DashboardInputs::default()
    };
    let data = DashboardData::compute(&inputs, Timeframe::Today, now);
    assert_eq!(data.sales_data.len(), 30);
    assert_eq!(data.visits_data.len(), 30);

    let last_sales = data.sales_data.last().expect("today point");
    assert_eq!(last_sales.date, now.date_naive());
    assert!((last_sales.amount - 1200.0).abs() < f64::EPSILON);
    assert!((last_sales.valid_amount - 1080.0).abs() < 1e-9);

    let last_visits = data.visits_data.last().expect("today point");
    assert_eq!(last_visits.visits, 2);
    assert_eq!(last_visits.valid_visits, 1);
    assert_eq!(last_visits.blocked_visits, 0);

    let first = data.sales_data.first().expect("first point");
    assert_eq!(first.date, now.date_naive() - Duration::days(29));
}

#[rstest]
fn customer_metrics(now: DateTime<Utc>) {
    let mut complete = customer(8, Some(40), now);
    complete.profile_completion = 90;
    let inputs = DashboardInputs {
        customers: vec![
            customer(1, Some(2), now),
            customer(2, Some(10), now),
            customer(4, None, now),
            complete,
        ],
        ..DashboardInputs::default()
    };
    let data = DashboardData::compute(&inputs, Timeframe::Today, now);
    assert_eq!(data.total_customers, 4);
    assert_eq!(data.active_customers, 2);
    assert_eq!(data.inactive_customers, 2);
    assert_eq!(data.new_customers, 1);
    assert_eq!(data.repeat_customers, 3);
    assert!((data.average_visits_per_year - 3.75).abs() < f64::EPSILON);
    assert_eq!(data.profile_completion.completed_count, 1);
    assert!((data.profile_completion.percentage - 25.0).abs() < f64::EPSILON);

    let counts: Vec<(&str, u64)> = data
        .customer_frequency
        .iter()
        .map(|b| (b.label.as_str(), b.count))
        .collect();
    assert_eq!(
        counts,
        [
            ("Visit 1 time", 1),
            ("Visit 2 times", 1),
            ("Visit 3 to 5 times", 1),
            ("Visit 5+ times", 1),
            ("Total Visitors", 4),
        ]
    );
}

#[rstest]
fn crm_attribution_combines_campaigns_and_loyalty(now: DateTime<Utc>) {
    let redemption = RewardRedemption {
        id: Uuid::new_v4(),
        customer_id: None,
        reward_id: None,
        points_used: 100,
        redeemed_at: Some(now),
    };
    let inputs = DashboardInputs {
        customers: vec![customer(3, Some(1), now), customer(1, Some(1), now)],
        campaigns: vec![campaign(200, 12, 4000.0, now), campaign(50, 3, 500.0, now)],
        redemptions: vec![redemption.clone(), redemption],
        ..DashboardInputs::default()
    };
    let data = DashboardData::compute(&inputs, Timeframe::Today, now);
    assert_eq!(data.campaign_stats.total_sent, 250);
    assert_eq!(data.campaign_stats.customers_visited, 15);
    assert!((data.loyalty_stats.revenue_gain - 600.0).abs() < f64::EPSILON);
    assert!((data.revenue_from_crm - 5100.0).abs() < f64::EPSILON);
    assert_eq!(data.visits_from_crm, 17);
    assert!((data.loyalty_stats.redemption_rate - 100.0).abs() < f64::EPSILON);
}

#[rstest]
fn feedback_and_qr_stats(now: DateTime<Utc>) {
    let feedback = |rating| Feedback {
        id: Uuid::new_v4(),
        customer_id: None,
        rating,
        comment: None,
        created_at: Some(now),
    };
    let qr = |scans, active| QrCode {
        id: Uuid::new_v4(),
        name: "Table".to_owned(),
        code: "T1".to_owned(),
        scan_count: scans,
        is_active: active,
    };
    let inputs = DashboardInputs {
        feedback: vec![feedback(5), feedback(2), feedback(4), feedback(1)],
        qr_codes: vec![qr(10, true), qr(4, false)],
        ..DashboardInputs::default()
    };
    let data = DashboardData::compute(&inputs, Timeframe::Today, now);
    assert_eq!(data.feedback_stats.total_feedbacks, 4);
    assert!((data.feedback_stats.average_rating - 3.0).abs() < f64::EPSILON);
    assert!((data.feedback_stats.negative_feedback - 50.0).abs() < f64::EPSILON);
    assert_eq!(data.qr_code_stats.active_qr_codes, 1);
    assert_eq!(data.qr_code_stats.customers_captured, 14);
    assert!((data.qr_code_stats.revenue - 700.0).abs() < f64::EPSILON);
}

#[rstest]
fn missing_credits_use_defaults(now: DateTime<Utc>) {
    let data = DashboardData::compute(&DashboardInputs::default(), Timeframe::Today, now);
    assert_eq!(data.credits, ChannelCredits::default());
    let inputs = DashboardInputs {
        credits: Some(CreditsBalance {
            sms: Some(20),
            ..CreditsBalance::default()
        }),
        ..DashboardInputs::default()
    };
    let data = DashboardData::compute(&inputs, Timeframe::Today, now);
    assert_eq!(data.credits.sms, 20);
    assert_eq!(data.credits.email, 200);
}

#[rstest]
fn top_rewards_keep_four_most_redeemed(now: DateTime<Utc>) {
    let reward = |name: &str, redeemed| LoyaltyReward {
        id: Uuid::new_v4(),
        name: name.to_owned(),
        points_required: 100,
        reward_type: "discount".to_owned(),
        reward_value: 50.0,
        is_active: true,
        total_redeemed: redeemed,
    };
    let inputs = DashboardInputs {
        loyalty_rewards: vec![
            reward("Coffee", 3),
            reward("Dessert", 9),
            reward("Starter", 1),
            reward("Main", 7),
            reward("Drink", 5),
        ],
        ..DashboardInputs::default()
    };
    let data = DashboardData::compute(&inputs, Timeframe::Today, now);
    let names: Vec<&str> = data.top_rewards.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["Dessert", "Main", "Drink", "Coffee"]);
}

#[rstest]
fn celebrations_within_thirty_days_sorted_by_date(now: DateTime<Utc>) {
    let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).expect("valid date");
    let mut soon = customer(2, None, now);
    soon.birthday = Some(date(1990, 7, 1));
    soon.anniversary = Some(date(2015, 6, 20));
    let mut today = customer(2, None, now);
    today.first_name = "Dev".to_owned();
    today.last_name = None;
    today.birthday = Some(date(1988, 6, 15));
    let mut far = customer(2, None, now);
    far.birthday = Some(date(1990, 9, 1));
    let mut past = customer(2, None, now);
    past.birthday = Some(date(1990, 6, 1));

    let inputs = DashboardInputs {
        customers: vec![soon, today, far, past],
        ..DashboardInputs::default()
    };
    let data = DashboardData::compute(&inputs, Timeframe::Today, now);
    let seen: Vec<(&str, CelebrationKind, &str)> = data
        .upcoming_celebrations
        .iter()
        .map(|c| (c.name.as_str(), c.kind, c.date.as_str()))
        .collect();
    assert_eq!(
        seen,
        [
            ("Dev", CelebrationKind::Birthday, "Jun 15"),
            ("Asha Rao", CelebrationKind::Anniversary, "Jun 20"),
            ("Asha Rao", CelebrationKind::Birthday, "Jul 1"),
        ]
    );
}

#[rstest]
fn leap_day_birthdays_fall_on_march_first() {
    let leap = NaiveDate::from_ymd_opt(2000, 2, 29).expect("valid date");
    let today = NaiveDate::from_ymd_opt(2026, 2, 20).expect("valid date");
    assert_eq!(
        next_occurrence(leap, today),
        NaiveDate::from_ymd_opt(2026, 3, 1)
    );
}

#[rstest]
fn fallback_is_zeroed_with_default_credits() {
    let data = DashboardData::fallback();
    assert_eq!(data.total_customers, 0);
    assert_eq!(data.credits, ChannelCredits::default());
    assert_eq!(data.customer_frequency.len(), 5);
    assert!(
        (data
            .customer_frequency
            .last()
            .map_or(0.0, |b| b.percentage)
            - 100.0)
            .abs()
            < f64::EPSILON
    );
}
