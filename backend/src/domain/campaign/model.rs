//! Persisted campaign records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::audience::Audience;
use super::template::RewardType;
use super::wizard::{SendTime, WizardDraft};
use crate::domain::records::RestaurantId;

/// Campaign lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum CampaignStatus {
    Draft,
    Scheduled,
    Live,
    Paused,
    Completed,
}

impl CampaignStatus {
    /// Stored representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Scheduled => "Scheduled",
            Self::Live => "Live",
            Self::Paused => "Paused",
            Self::Completed => "Completed",
        }
    }

    /// Inverse of [`CampaignStatus::as_str`].
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        [
            Self::Draft,
            Self::Scheduled,
            Self::Live,
            Self::Paused,
            Self::Completed,
        ]
        .into_iter()
        .find(|status| status.as_str() == raw)
    }

    /// Whether the campaign may be paused.
    #[must_use]
    pub fn is_pausable(self) -> bool {
        matches!(self, Self::Live | Self::Scheduled)
    }
}

/// Per-channel copy stored with a campaign.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ChannelMessages {
    pub whatsapp: Option<String>,
    pub sms: Option<String>,
    pub email_subject: Option<String>,
    pub email_preheader: Option<String>,
    pub email_body: Option<String>,
}

/// Delivery statistics accumulated after sending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CampaignStats {
    pub sent: u64,
    pub delivered: u64,
    pub opens: u64,
    /// Redemptions attributed to the campaign.
    pub redeems: u64,
    pub revenue: f64,
}

/// Stored campaign.
#[derive(Debug, Clone, PartialEq)]
pub struct Campaign {
    pub id: Uuid,
    pub restaurant_id: RestaurantId,
    pub name: String,
    /// Channel list label, e.g. `WhatsApp + SMS`.
    pub channel_label: String,
    pub status: CampaignStatus,
    pub offer_type: RewardType,
    pub has_whatsapp: bool,
    pub messages: ChannelMessages,
    pub audience: Audience,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub sent_at: Option<DateTime<Utc>>,
    pub stats: CampaignStats,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Campaign {
    /// Campaign created by launching a validated wizard draft.
    ///
    /// Sending now makes it `Live`; scheduling makes it `Scheduled`.
    #[must_use]
    pub fn launch(
        id: Uuid,
        restaurant_id: RestaurantId,
        draft: &WizardDraft,
        now: DateTime<Utc>,
    ) -> Self {
        let (status, scheduled_at, sent_at) = match draft.send_time {
            SendTime::Now => (CampaignStatus::Live, None, Some(now)),
            SendTime::Later => (CampaignStatus::Scheduled, draft.scheduled_date, None),
        };
        Self {
            id,
            restaurant_id,
            name: draft.title.trim().to_owned(),
            channel_label: draft.channels.joined(" + "),
            status,
            offer_type: draft.reward_type,
            has_whatsapp: draft.channels.whatsapp,
            messages: ChannelMessages {
                whatsapp: draft.whatsapp_message.clone().filter(|_| draft.channels.whatsapp),
                sms: draft.sms_message.clone().filter(|_| draft.channels.sms),
                email_subject: draft.email_subject.clone().filter(|_| draft.channels.email),
                email_preheader: draft.email_preheader.clone().filter(|_| draft.channels.email),
                email_body: draft.email_body.clone().filter(|_| draft.channels.email),
            },
            audience: draft.audience.clone(),
            scheduled_at,
            sent_at,
            stats: CampaignStats::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Draft copy with fresh statistics.
    #[must_use]
    pub fn duplicate(&self, id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: format!("{} (Copy)", self.name),
            status: CampaignStatus::Draft,
            scheduled_at: None,
            sent_at: None,
            stats: CampaignStats::default(),
            created_at: now,
            updated_at: now,
            ..self.clone()
        }
    }
}
