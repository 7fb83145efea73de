//! The ten-step campaign creation wizard.
//!
//! The wizard is stateless on the server: clients hold a [`WizardDraft`]
//! and submit it with each navigation request. Steps 4 to 6 review the
//! per-channel message and are skipped when that channel is off.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::audience::Audience;
use super::template::{RewardType, Template};
use crate::domain::records::ChannelCredits;

/// Number of wizard steps.
pub const WIZARD_STEPS: u8 = 10;
/// Terms pre-filled into every draft.
pub const STANDARD_TERMS: &str = "Standard terms and conditions apply. Offer valid for limited \
time only. Cannot be combined with other offers. Reward cannot be exchanged for cash.";
/// Brand colours offered by the preview picker.
pub const BRAND_COLORS: [&str; 6] = [
    "#e74c3c", "#3498db", "#2ecc71", "#f39c12", "#9b59b6", "#1abc9c",
];
/// Largest accepted hero image upload.
pub const HERO_IMAGE_MAX_BYTES: usize = 500 * 1024;
/// Minimum lead time for scheduled sends.
pub const MIN_SCHEDULE_LEAD_MINUTES: i64 = 15;
/// Days an offer stays valid after launch.
pub const OFFER_VALIDITY_DAYS: i64 = 30;
/// Contact number printed on offers when enabled.
pub const OFFER_PHONE: &str = "+91 98765 43210";

const TITLE_MAX: usize = 40;
const SUBTITLE_MAX: usize = 60;
const WHATSAPP_MAX: usize = 1000;
const SMS_MAX: usize = 160;
const EMAIL_SUBJECT_MAX: usize = 80;
const EMAIL_PREHEADER_MAX: usize = 120;
const EMAIL_BODY_MAX: usize = 1000;

/// Delivery channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    WhatsApp,
    Sms,
    Email,
}

impl Channel {
    /// Display label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::WhatsApp => "WhatsApp",
            Self::Sms => "SMS",
            Self::Email => "Email",
        }
    }
}

/// Selected delivery channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Channels {
    pub whatsapp: bool,
    pub sms: bool,
    pub email: bool,
}

impl Channels {
    /// Selected channels in display order.
    #[must_use]
    pub fn selected(self) -> Vec<Channel> {
        [
            (self.whatsapp, Channel::WhatsApp),
            (self.sms, Channel::Sms),
            (self.email, Channel::Email),
        ]
        .into_iter()
        .filter_map(|(on, channel)| on.then_some(channel))
        .collect()
    }

    /// Whether any channel is on.
    #[must_use]
    pub fn any(self) -> bool {
        self.whatsapp || self.sms || self.email
    }

    /// Labels joined with `separator`, e.g. `WhatsApp + SMS`.
    #[must_use]
    pub fn joined(self, separator: &str) -> String {
        self.selected()
            .into_iter()
            .map(Channel::label)
            .collect::<Vec<_>>()
            .join(separator)
    }
}

/// Whether the offer covers the whole bill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PurchaseType {
    Entire,
    Specific,
}

/// How often a customer may redeem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RedemptionFrequency {
    Once,
    Multiple,
}

impl RedemptionFrequency {
    fn preview_line(self) -> &'static str {
        match self {
            Self::Once => "Can be redeemed once per customer",
            Self::Multiple => "Can be redeemed multiple times",
        }
    }
}

/// When the campaign goes out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SendTime {
    Now,
    Later,
}

/// Campaign being assembled by the wizard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WizardDraft {
    pub template_id: String,
    pub channels: Channels,
    pub reward_type: RewardType,
    #[serde(default)]
    pub reward_value: Option<u32>,
    #[serde(default)]
    pub reward_item: Option<String>,
    pub purchase_type: PurchaseType,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub min_purchase: Option<u32>,
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    pub redemption_frequency: RedemptionFrequency,
    pub terms: String,
    pub show_phone: bool,
    #[serde(default)]
    pub whatsapp_message: Option<String>,
    #[serde(default)]
    pub sms_message: Option<String>,
    #[serde(default)]
    pub email_subject: Option<String>,
    #[serde(default)]
    pub email_preheader: Option<String>,
    #[serde(default)]
    pub email_body: Option<String>,
    pub audience: Audience,
    pub send_time: SendTime,
    #[serde(default)]
    pub scheduled_date: Option<DateTime<Utc>>,
    pub hero_image: String,
    pub brand_color: String,
}

impl WizardDraft {
    /// Draft pre-filled from `template`.
    ///
    /// WhatsApp starts on only when the template supports it and the
    /// tenant owns a WhatsApp header.
    #[must_use]
    pub fn from_template(template: &Template, has_whatsapp_header: bool) -> Self {
        Self {
            template_id: template.id.clone(),
            channels: Channels {
                whatsapp: template.has_whatsapp && has_whatsapp_header,
                sms: true,
                email: true,
            },
            reward_type: template.default_reward.kind,
            reward_value: template.default_reward.value,
            reward_item: template.default_reward.item.clone(),
            purchase_type: PurchaseType::Entire,
            category: None,
            min_purchase: None,
            title: template.headline.clone(),
            subtitle: template.subtitle.clone(),
            redemption_frequency: RedemptionFrequency::Once,
            terms: STANDARD_TERMS.to_owned(),
            show_phone: true,
            whatsapp_message: None,
            sms_message: None,
            email_subject: None,
            email_preheader: None,
            email_body: None,
            audience: Audience::default(),
            send_time: SendTime::Now,
            scheduled_date: None,
            hero_image: template.hero_image.clone(),
            brand_color: template.brand_color.clone(),
        }
    }

    /// Text shown on the reward pill.
    ///
    /// # Examples
    /// ```
    /// use muncho_crm::domain::campaign::{find_template, WizardDraft};
    ///
    /// let template = find_template("sushi-2").unwrap();
    /// let draft = WizardDraft::from_template(template, false);
    /// assert_eq!(draft.reward_text(), "₹500 OFF");
    /// ```
    #[must_use]
    pub fn reward_text(&self) -> String {
        let value = self.reward_value.filter(|v| *v > 0);
        match self.reward_type {
            RewardType::Percentage => {
                value.map_or_else(|| "DISCOUNT".to_owned(), |v| format!("{v}% OFF"))
            }
            RewardType::Flat => value.map_or_else(|| "₹ OFF".to_owned(), |v| format!("₹{v} OFF")),
            RewardType::FreeItem => self
                .reward_item
                .clone()
                .filter(|item| !item.is_empty())
                .unwrap_or_else(|| "FREE ITEM".to_owned()),
            RewardType::NoDiscount => "SPECIAL OFFER".to_owned(),
        }
    }

    /// Pick a colour from [`BRAND_COLORS`].
    pub fn set_brand_color(&mut self, color: &str) -> Result<(), PreviewError> {
        if !BRAND_COLORS.contains(&color) {
            return Err(PreviewError::UnknownColor);
        }
        color.clone_into(&mut self.brand_color);
        Ok(())
    }

    /// Replace the hero image with a URL or an uploaded data URL.
    ///
    /// Uploads larger than [`HERO_IMAGE_MAX_BYTES`] are rejected and leave
    /// the current image in place.
    pub fn set_hero_image(&mut self, image: String) -> Result<(), PreviewError> {
        if let Some(rest) = image.strip_prefix("data:") {
            let size = data_url_size(rest).ok_or(PreviewError::MalformedImage)?;
            if size > HERO_IMAGE_MAX_BYTES {
                return Err(PreviewError::ImageTooLarge { size });
            }
        } else if !(image.starts_with("https://") || image.starts_with("http://")) {
            return Err(PreviewError::MalformedImage);
        }
        self.hero_image = image;
        Ok(())
    }

    /// Rendered offer card.
    #[must_use]
    pub fn preview(&self, now: DateTime<Utc>) -> OfferPreview {
        OfferPreview {
            reward_pill: (self.reward_type != RewardType::NoDiscount).then(|| self.reward_text()),
            title: self.title.clone(),
            subtitle: Some(self.subtitle.clone()).filter(|s| !s.is_empty()),
            min_purchase: self
                .min_purchase
                .filter(|v| *v > 0)
                .map(|v| format!("On min purchase of ₹{v}")),
            valid_till: format!("Valid till {}", expiry_date(now)),
            redemption: self.redemption_frequency.preview_line().to_owned(),
            fine_print: vec![
                "2 offers cannot be clubbed.".to_owned(),
                "Reward cannot be exchanged for cash.".to_owned(),
            ],
            phone: self.show_phone.then(|| format!("Call: {OFFER_PHONE}")),
            hero_image: self.hero_image.clone(),
            brand_color: self.brand_color.clone(),
        }
    }
}

fn data_url_size(rest: &str) -> Option<usize> {
    let (meta, payload) = rest.split_once(',')?;
    if meta.ends_with(";base64") {
        let padding = payload.bytes().rev().take_while(|b| *b == b'=').count();
        (payload.len() * 3 / 4).checked_sub(padding)
    } else {
        Some(payload.len())
    }
}

/// Offer expiry printed on previews, `dd/mm/yyyy`.
#[must_use]
pub fn expiry_date(now: DateTime<Utc>) -> String {
    (now + Duration::days(OFFER_VALIDITY_DAYS))
        .format("%d/%m/%Y")
        .to_string()
}

/// Rejected preview customisation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PreviewError {
    #[error("brand colour must be one of the palette colours")]
    UnknownColor,
    #[error("image must be a URL or a data URL")]
    MalformedImage,
    #[error("image is {size} bytes; the limit is 500 KB")]
    ImageTooLarge { size: usize },
}

/// Offer card as rendered in the wizard preview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OfferPreview {
    pub reward_pill: Option<String>,
    pub title: String,
    pub subtitle: Option<String>,
    pub min_purchase: Option<String>,
    pub valid_till: String,
    pub redemption: String,
    pub fine_print: Vec<String>,
    pub phone: Option<String>,
    pub hero_image: String,
    pub brand_color: String,
}

/// Field-keyed errors for one step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StepErrors(BTreeMap<&'static str, &'static str>);

impl StepErrors {
    fn set(&mut self, field: &'static str, message: &'static str) {
        self.0.insert(field, message);
    }

    /// Message recorded for `field`.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&'static str> {
        self.0.get(field).copied()
    }

    /// Whether the step passed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate `(field, message)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.0.iter().map(|(field, message)| (*field, *message))
    }
}

impl fmt::Display for StepErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<&str> = self.0.values().copied().collect();
        f.write_str(&joined.join("; "))
    }
}

fn too_long(value: &str, max: usize) -> bool {
    value.chars().count() > max
}

fn missing_or_too_long(value: Option<&str>, max: usize) -> bool {
    value.is_none_or(|v| v.is_empty() || too_long(v, max))
}

/// Validate `step` of `draft`.
#[must_use]
pub fn validate_step(draft: &WizardDraft, step: u8, now: DateTime<Utc>) -> StepErrors {
    let mut errors = StepErrors::default();
    match step {
        1 => {
            if !draft.channels.any() {
                errors.set("channels", "Please select at least one channel");
            }
        }
        2 => {
            if draft.title.trim().is_empty() {
                errors.set("title", "Campaign title is required");
            }
            if too_long(&draft.title, TITLE_MAX) {
                errors.set("title", "Campaign title must be 40 characters or less");
            }
            if too_long(&draft.subtitle, SUBTITLE_MAX) {
                errors.set("subtitle", "Campaign subtitle must be 60 characters or less");
            }
        }
        3 => {
            if draft.terms.trim().is_empty() {
                errors.set("terms", "At least one term must be included");
            }
        }
        4 => {
            if draft.channels.whatsapp
                && missing_or_too_long(draft.whatsapp_message.as_deref(), WHATSAPP_MAX)
            {
                errors.set(
                    "whatsappMessage",
                    "WhatsApp message is required and must be 1000 characters or less",
                );
            }
        }
        5 => {
            if draft.channels.sms && missing_or_too_long(draft.sms_message.as_deref(), SMS_MAX) {
                errors.set(
                    "smsMessage",
                    "SMS message is required and must be 160 characters or less",
                );
            }
        }
        6 => validate_email(draft, &mut errors),
        7 => validate_audience(&draft.audience, &mut errors),
        8 => {
            if draft.send_time == SendTime::Later {
                match draft.scheduled_date {
                    None => errors.set("scheduledDate", "Please select a date and time"),
                    Some(at) if at < now + Duration::minutes(MIN_SCHEDULE_LEAD_MINUTES) => {
                        errors.set(
                            "scheduledDate",
                            "Scheduled time must be at least 15 minutes from now",
                        );
                    }
                    Some(_) => {}
                }
            }
        }
        _ => {}
    }
    errors
}

fn validate_email(draft: &WizardDraft, errors: &mut StepErrors) {
    if !draft.channels.email {
        return;
    }
    if missing_or_too_long(draft.email_subject.as_deref(), EMAIL_SUBJECT_MAX) {
        errors.set(
            "emailSubject",
            "Email subject is required and must be 80 characters or less",
        );
    }
    if draft
        .email_preheader
        .as_deref()
        .is_some_and(|v| too_long(v, EMAIL_PREHEADER_MAX))
    {
        errors.set(
            "emailPreheader",
            "Email preheader must be 120 characters or less",
        );
    }
    if draft
        .email_body
        .as_deref()
        .is_some_and(|v| too_long(v, EMAIL_BODY_MAX))
    {
        errors.set("emailBody", "Email body must be 1000 characters or less");
    }
}

fn validate_audience(audience: &Audience, errors: &mut StepErrors) {
    use super::audience::AudienceMode;

    match audience.mode {
        AudienceMode::Groups if audience.selected_groups.is_empty() => {
            errors.set(
                "audience",
                "Select at least one group or switch to another option",
            );
        }
        AudienceMode::Advanced if audience.advanced_filters.is_empty() => {
            errors.set("audience", "Please add at least one filter rule");
        }
        AudienceMode::Advanced if !audience.filters_valid() => {
            errors.set(
                "audience",
                "Complete each rule or delete it before continuing.",
            );
        }
        _ => {}
    }
    if audience.estimated_total() == 0 {
        errors.set(
            "audience",
            "Your selected audience is empty—please adjust your groups or filters",
        );
    }
}

/// Outcome of moving forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "kind", content = "step", rename_all = "camelCase")]
pub enum ForwardMove {
    Step(u8),
    Complete,
}

/// Outcome of moving backward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "kind", content = "step", rename_all = "camelCase")]
pub enum BackwardMove {
    Step(u8),
    Exit,
}

/// Step after `step`, skipping review steps for channels that are off.
#[must_use]
pub fn next_step(step: u8, channels: Channels) -> ForwardMove {
    let mut next = step.saturating_add(1);
    if next == 4 && !channels.whatsapp {
        next = 5;
    }
    if next == 5 && !channels.sms {
        next = 6;
    }
    if next == 6 && !channels.email {
        next = 7;
    }
    if next <= WIZARD_STEPS {
        ForwardMove::Step(next)
    } else {
        ForwardMove::Complete
    }
}

/// Step before `step`; leaving step 1 exits to the template library.
#[must_use]
pub fn previous_step(step: u8, channels: Channels) -> BackwardMove {
    if step <= 1 {
        return BackwardMove::Exit;
    }
    let mut prev = step - 1;
    if prev == 6 && !channels.email {
        prev = 5;
    }
    if prev == 5 && !channels.sms {
        prev = 4;
    }
    if prev == 4 && !channels.whatsapp {
        prev = 3;
    }
    BackwardMove::Step(prev)
}

/// Validate `step` and move forward when it passes.
pub fn advance(
    draft: &WizardDraft,
    step: u8,
    now: DateTime<Utc>,
) -> Result<ForwardMove, StepErrors> {
    let errors = validate_step(draft, step, now);
    if errors.is_empty() {
        Ok(next_step(step, draft.channels))
    } else {
        Err(errors)
    }
}

/// Validate every step, returning the first failure.
pub fn validate_all(draft: &WizardDraft, now: DateTime<Utc>) -> Result<(), (u8, StepErrors)> {
    (1..=WIZARD_STEPS)
        .map(|step| (step, validate_step(draft, step, now)))
        .find(|(_, errors)| !errors.is_empty())
        .map_or(Ok(()), Err)
}

/// One row of the review cost table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CostLine {
    pub channel: Channel,
    pub recipients: u64,
    pub credits: u64,
    pub balance_after: i64,
}

/// Review summary shown before launch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LaunchSummary {
    pub channels: String,
    pub audience: String,
    pub title: String,
    pub send_time: String,
    pub costs: Vec<CostLine>,
}

fn channel_balance(channel: Channel, credits: ChannelCredits) -> i64 {
    match channel {
        Channel::WhatsApp => credits.whatsapp_marketing,
        Channel::Sms => credits.sms,
        Channel::Email => credits.email,
    }
}

/// Recipients and credits per selected channel.
///
/// Each recipient costs one credit on every channel.
#[must_use]
pub fn cost_table(draft: &WizardDraft, credits: ChannelCredits) -> Vec<CostLine> {
    let total = draft.audience.estimated_total();
    let spend = i64::try_from(total).unwrap_or(i64::MAX);
    draft
        .channels
        .selected()
        .into_iter()
        .map(|channel| CostLine {
            channel,
            recipients: total,
            credits: total,
            balance_after: channel_balance(channel, credits).saturating_sub(spend),
        })
        .collect()
}

/// Summary for the review and launch steps.
#[must_use]
pub fn launch_summary(draft: &WizardDraft, credits: ChannelCredits) -> LaunchSummary {
    let send_time = match (draft.send_time, draft.scheduled_date) {
        (SendTime::Now, _) => "Immediately".to_owned(),
        (SendTime::Later, Some(at)) => at.format("%d/%m/%Y, %H:%M").to_string(),
        (SendTime::Later, None) => "Not set".to_owned(),
    };
    LaunchSummary {
        channels: draft.channels.joined(", "),
        audience: format!("{} customers", draft.audience.estimated_total()),
        title: draft.title.clone(),
        send_time,
        costs: cost_table(draft, credits),
    }
}
