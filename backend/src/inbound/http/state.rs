//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use mockable::{Clock, DefaultClock};

use crate::domain::ports::{
    AuthCommand, CampaignCommand, CampaignQuery, DashboardQuery, InsightsQuery, LoyaltyQuery,
    OnboardingCommand, SessionBootstrap,
};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub auth: Arc<dyn AuthCommand>,
    pub session: Arc<dyn SessionBootstrap>,
    pub onboarding: Arc<dyn OnboardingCommand>,
    pub campaigns: Arc<dyn CampaignCommand>,
    pub campaigns_query: Arc<dyn CampaignQuery>,
    pub dashboard: Arc<dyn DashboardQuery>,
    pub loyalty: Arc<dyn LoyaltyQuery>,
    pub insights: Arc<dyn InsightsQuery>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub auth: Arc<dyn AuthCommand>,
    pub session: Arc<dyn SessionBootstrap>,
    pub onboarding: Arc<dyn OnboardingCommand>,
    pub campaigns: Arc<dyn CampaignCommand>,
    pub campaigns_query: Arc<dyn CampaignQuery>,
    pub dashboard: Arc<dyn DashboardQuery>,
    pub loyalty: Arc<dyn LoyaltyQuery>,
    pub insights: Arc<dyn InsightsQuery>,
    /// Whether the tenant owns a WhatsApp sender header.
    pub whatsapp_header: bool,
    clock: Arc<dyn Clock>,
}

impl HttpState {
    /// Construct state from a ports bundle using the system clock.
    pub fn new(ports: HttpStatePorts, whatsapp_header: bool) -> Self {
        Self::with_clock(ports, whatsapp_header, Arc::new(DefaultClock))
    }

    /// Construct state with an explicit clock for session deadlines and
    /// wizard validation.
    pub fn with_clock(ports: HttpStatePorts, whatsapp_header: bool, clock: Arc<dyn Clock>) -> Self {
        let HttpStatePorts {
            auth,
            session,
            onboarding,
            campaigns,
            campaigns_query,
            dashboard,
            loyalty,
            insights,
        } = ports;
        Self {
            auth,
            session,
            onboarding,
            campaigns,
            campaigns_query,
            dashboard,
            loyalty,
            insights,
            whatsapp_header,
            clock,
        }
    }

    /// Current time according to the state's clock.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.utc()
    }
}
