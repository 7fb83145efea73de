//! Campaign creation and performance.
//!
//! - [`template`]: objectives and the template library.
//! - [`audience`]: group and advanced-filter targeting.
//! - [`wizard`]: the ten-step draft editor with per-step validation.
//! - [`model`]: persisted campaigns.
//! - [`performance`]: totals and filtering over sent campaigns.

pub mod audience;
pub mod model;
pub mod performance;
pub mod template;
pub mod wizard;

pub use self::audience::{
    AdvancedFilter, Audience, AudienceGroup, AudienceMode, FilterField, FilterOperator,
    FilterUnit, FilterUpdate, LiveCounts,
};
pub use self::model::{Campaign, CampaignStats, CampaignStatus, ChannelMessages};
pub use self::performance::{
    BulkAction, CampaignKey, CampaignRow, OfferFilter, PerformanceFilter, PerformanceRange, PerformanceTotals,
    PerformanceView, summarise,
};
pub use self::template::{
    BLOCKED_TEMPLATE_MESSAGE, DefaultReward, Objective, RewardType, Template, TemplateFilter,
    find_template, objectives, templates, templates_for,
};
pub use self::wizard::{
    BackwardMove, Channel, Channels, CostLine, ForwardMove, LaunchSummary, OfferPreview,
    PreviewError, StepErrors, WizardDraft, advance, cost_table, launch_summary, next_step,
    previous_step, validate_all, validate_step,
};
