//! Campaign performance summary and filtering.

use std::cmp::Reverse;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::model::{Campaign, CampaignStatus};
use super::template::RewardType;

/// Period covered by the performance view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum PerformanceRange {
    #[serde(rename = "Last 7 days")]
    Last7Days,
    #[default]
    #[serde(rename = "Last 30 days")]
    Last30Days,
    #[serde(rename = "Last 90 days")]
    Last90Days,
    #[serde(rename = "All time")]
    AllTime,
}

impl PerformanceRange {
    /// Earliest creation time included, `None` for all time.
    #[must_use]
    pub fn since(self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let days = match self {
            Self::Last7Days => 7,
            Self::Last30Days => 30,
            Self::Last90Days => 90,
            Self::AllTime => return None,
        };
        Some(now - Duration::days(days))
    }
}

/// Offer-type filter as labelled in the performance table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum OfferFilter {
    #[default]
    All,
    #[serde(rename = "No Discount")]
    NoDiscount,
    #[serde(rename = "Free Item")]
    FreeItem,
    #[serde(rename = "Flat Discount")]
    FlatDiscount,
    #[serde(rename = "% Discount")]
    PercentDiscount,
}

impl OfferFilter {
    fn matches(self, offer: RewardType) -> bool {
        match self {
            Self::All => true,
            Self::NoDiscount => offer == RewardType::NoDiscount,
            Self::FreeItem => offer == RewardType::FreeItem,
            Self::FlatDiscount => offer == RewardType::Flat,
            Self::PercentDiscount => offer == RewardType::Percentage,
        }
    }
}

/// Filters applied to the campaign table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerformanceFilter {
    pub range: PerformanceRange,
    pub offer: OfferFilter,
    pub whatsapp_only: bool,
}

/// Headline figures above the campaign table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceTotals {
    pub campaigns_sent: u64,
    pub revenue: f64,
    pub visits: u64,
    pub avg_visit_rate: f64,
}

impl PerformanceTotals {
    /// Totals over `campaigns`.
    ///
    /// The visit rate is redemptions over messages sent, as a percentage,
    /// and zero when nothing was sent.
    #[must_use]
    pub fn from_campaigns<'a>(campaigns: impl IntoIterator<Item = &'a Campaign>) -> Self {
        let mut totals = Self::default();
        let mut sent = 0_u64;
        for campaign in campaigns {
            if campaign.stats.sent > 0 {
                totals.campaigns_sent += 1;
            }
            sent += campaign.stats.sent;
            totals.revenue += campaign.stats.revenue;
            totals.visits += campaign.stats.redeems;
        }
        if totals.campaigns_sent > 0 && sent > 0 {
            totals.avg_visit_rate = totals.visits as f64 / sent as f64 * 100.0;
        }
        totals
    }
}

/// Row of the campaign table.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CampaignRow {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub sent: u64,
    pub opens: u64,
    pub redeems: u64,
    pub revenue: f64,
    pub status: CampaignStatus,
    pub has_whatsapp: bool,
    pub offer_type: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Campaign> for CampaignRow {
    fn from(campaign: &Campaign) -> Self {
        Self {
            id: campaign.id,
            name: campaign.name.clone(),
            kind: campaign.channel_label.clone(),
            sent: campaign.stats.sent,
            opens: campaign.stats.opens,
            redeems: campaign.stats.redeems,
            revenue: campaign.stats.revenue,
            status: campaign.status,
            has_whatsapp: campaign.has_whatsapp,
            offer_type: campaign.offer_type.performance_label().to_owned(),
            created_at: campaign.created_at,
        }
    }
}

/// Table ordering: newest first, ties broken by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CampaignKey {
    created_at: Reverse<DateTime<Utc>>,
    id: Uuid,
}

impl CampaignRow {
    #[must_use]
    pub const fn key(&self) -> CampaignKey {
        CampaignKey {
            created_at: Reverse(self.created_at),
            id: self.id,
        }
    }
}

/// Campaign table with totals.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceView {
    pub totals: PerformanceTotals,
    /// Shown when no campaign has been sent in the period.
    pub zero_state: bool,
    pub rows: Vec<CampaignRow>,
}

/// Build the performance view.
///
/// Totals cover every campaign in the period; offer and WhatsApp filters
/// narrow only the table rows, which are ordered by [`CampaignRow::key`].
#[must_use]
pub fn summarise(
    campaigns: &[Campaign],
    filter: PerformanceFilter,
    now: DateTime<Utc>,
) -> PerformanceView {
    let since = filter.range.since(now);
    let in_range: Vec<&Campaign> = campaigns
        .iter()
        .filter(|c| since.is_none_or(|start| c.created_at >= start))
        .collect();
    let totals = PerformanceTotals::from_campaigns(in_range.iter().copied());
    let mut rows: Vec<CampaignRow> = in_range
        .into_iter()
        .filter(|c| filter.offer.matches(c.offer_type))
        .filter(|c| !filter.whatsapp_only || c.has_whatsapp)
        .map(CampaignRow::from)
        .collect();
    rows.sort_by_key(CampaignRow::key);
    PerformanceView {
        zero_state: totals.campaigns_sent == 0,
        totals,
        rows,
    }
}

/// Action applied to several selected campaigns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BulkAction {
    Duplicate,
    Pause,
    Delete,
}
