//! Domain primitives, aggregates, and services.
//!
//! Purpose: Define strongly typed CRM entities and the pure computations over
//! them (validation, bootstrap transitions, campaign and reporting
//! aggregates). Services implement the driving ports in [`ports`] over the
//! driven repository ports, so inbound adapters never touch persistence.
//!
//! Public surface:
//! - [`Error`] and [`ErrorCode`]: the error payload every adapter renders.
//! - [`Account`], [`RestaurantProfile`], [`Campaign`]: persisted aggregates.
//! - [`BootstrapState`]: the session bootstrap state machine.

pub mod account;
pub mod auth;
pub mod auth_service;
pub mod campaign;
pub mod campaign_service;
pub mod customer_insights;
pub mod dashboard;
pub mod error;
pub mod login_throttle;
pub mod loyalty;
pub mod onboarding_service;
pub mod paging;
pub mod password;
pub mod ports;
pub mod records;
pub mod reporting_service;
pub mod restaurant;
pub mod session_bootstrap;
pub mod session_service;
mod service_support;
pub mod trace_id;

pub use self::account::{
    ACCOUNT_ROLE, Account, AccountId, AccountProfile, AccountValidationError, DEFAULT_FIRST_NAME,
    EmailAddress, FIRST_NAME_MAX, FirstName,
};
pub use self::auth::{
    AuthFormErrors, LoginCredentials, PASSWORD_MIN_LEN, SignupForm, SignupRequest,
};
pub use self::auth_service::{AuthService, DUPLICATE_EMAIL_MESSAGE, INVALID_CREDENTIALS_MESSAGE};
pub use self::campaign::*;
pub use self::campaign_service::{CampaignService, NO_RESTAURANT_MESSAGE, step_error};
pub use self::customer_insights::{
    ACTIVITY_LIMIT, ActivityEvent, ActivityFilter, ActivityKind, CustomerKey, CustomerQuery,
    CustomerRow, ENOUGH_DATA_CUSTOMERS, InsightsInputs, InsightsOverview, InsightsRange,
    LOST_AFTER_DAYS, SEGMENTS, Segment, SegmentSummary, SpendRange, VIP_MIN_SPEND, VisitRange,
    activity_feed, list_customers, segment_customers,
};
pub use self::dashboard::{
    DashboardData, DashboardInputs, Timeframe,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::login_throttle::{
    LoginAttempts, LoginThrottlePolicy, ThrottleDecision, lockout_message, remaining_minutes,
};
pub use self::loyalty::{LoyaltyInputs, LoyaltyOverview, LoyaltyRange, Tier};
pub use self::onboarding_service::OnboardingService;
pub use self::paging::{KeyedPage, page_by_key};
pub use self::password::PasswordHash;
pub use self::records::{
    ChannelCredits, CreditsBalance, Customer, DEFAULT_CREDITS, Feedback, LoyaltyReward,
    ORDER_COMPLETED, Order, QrCode, RestaurantId, RewardRedemption,
};
pub use self::reporting_service::ReportingService;
pub use self::restaurant::{
    ONBOARDING_STEPS, OnboardingDraft, OnboardingErrors, OnboardingProgress, Restaurant,
    RestaurantProfile,
};
pub use self::session_bootstrap::{
    AppView, BootstrapEvent, BootstrapState, Notice, RestaurantLookup, Transition,
};
pub use self::session_service::SessionService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use muncho_crm::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
