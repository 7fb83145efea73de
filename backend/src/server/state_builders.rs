//! Builders wiring domain services over repository adapters.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::info;

use muncho_crm::domain::ports::{
    AccountRepository, CampaignRepository, CrmRecordsRepository, RestaurantRepository,
};
use muncho_crm::domain::{
    AuthService, CampaignService, OnboardingService, ReportingService, SessionService,
};
use muncho_crm::inbound::http::state::{HttpState, HttpStatePorts};
use muncho_crm::outbound::memory::{
    InMemoryAccountRepository, InMemoryCampaignRepository, InMemoryCrmRecords,
    InMemoryLoginAttemptStore, InMemoryRestaurantRepository,
};
use muncho_crm::outbound::persistence::{
    DbPool, DieselAccountRepository, DieselCampaignRepository, DieselCrmRecordsRepository,
    DieselRestaurantRepository,
};

use super::ServerConfig;

/// Driven adapters the services are built over.
struct Repositories<A, R, C, K> {
    accounts: Arc<A>,
    restaurants: Arc<R>,
    campaigns: Arc<C>,
    records: Arc<K>,
}

impl Repositories<
    DieselAccountRepository,
    DieselRestaurantRepository,
    DieselCampaignRepository,
    DieselCrmRecordsRepository,
> {
    fn diesel(pool: &DbPool) -> Self {
        Self {
            accounts: Arc::new(DieselAccountRepository::new(pool.clone())),
            restaurants: Arc::new(DieselRestaurantRepository::new(pool.clone())),
            campaigns: Arc::new(DieselCampaignRepository::new(pool.clone())),
            records: Arc::new(DieselCrmRecordsRepository::new(pool.clone())),
        }
    }
}

impl Repositories<
    InMemoryAccountRepository,
    InMemoryRestaurantRepository,
    InMemoryCampaignRepository,
    InMemoryCrmRecords,
> {
    fn in_memory() -> Self {
        Self {
            accounts: Arc::new(InMemoryAccountRepository::new()),
            restaurants: Arc::new(InMemoryRestaurantRepository::new()),
            campaigns: Arc::new(InMemoryCampaignRepository::new()),
            records: Arc::new(InMemoryCrmRecords::new()),
        }
    }
}

/// Build every port from one set of repositories.
///
/// Login attempts always use the in-process store whatever the backing
/// repositories are.
fn build_ports<A, R, C, K>(
    repos: Repositories<A, R, C, K>,
    config: &ServerConfig,
    clock: &Arc<dyn Clock>,
) -> HttpStatePorts
where
    A: AccountRepository + 'static,
    R: RestaurantRepository + 'static,
    C: CampaignRepository + 'static,
    K: CrmRecordsRepository + 'static,
{
    let Repositories {
        accounts,
        restaurants,
        campaigns,
        records,
    } = repos;

    let auth = AuthService::new(
        accounts.clone(),
        Arc::new(InMemoryLoginAttemptStore::new(config.throttle)),
        config.throttle,
        clock.clone(),
    );
    let session = SessionService::new(accounts, restaurants.clone());
    let onboarding = OnboardingService::new(restaurants.clone(), clock.clone());
    let campaign_service = Arc::new(CampaignService::new(
        campaigns.clone(),
        restaurants.clone(),
        records.clone(),
        clock.clone(),
        config.whatsapp_header,
    ));
    let reporting = Arc::new(ReportingService::new(
        restaurants,
        records,
        campaigns,
        clock.clone(),
    ));

    HttpStatePorts {
        auth: Arc::new(auth),
        session: Arc::new(session),
        onboarding: Arc::new(onboarding),
        campaigns: campaign_service.clone(),
        campaigns_query: campaign_service,
        dashboard: reporting.clone(),
        loyalty: reporting.clone(),
        insights: reporting,
    }
}

/// Build the HTTP state, using Diesel repositories when a pool is
/// configured and in-memory stores otherwise.
pub(crate) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let ports = match &config.db_pool {
        Some(pool) => build_ports(Repositories::diesel(pool), config, &clock),
        None => {
            info!("no database configured; using in-memory stores");
            build_ports(Repositories::in_memory(), config, &clock)
        }
    };
    web::Data::new(HttpState::with_clock(ports, config.whatsapp_header, clock))
}
