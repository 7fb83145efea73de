//! Campaign wizard and performance handlers.
//!
//! ```text
//! GET  /api/v1/campaigns/objectives
//! GET  /api/v1/campaigns/templates?objective=sushi-day&offerType=Free%20Item&whatsappOnly=true
//! GET  /api/v1/campaigns/audience/options?search=vip
//! POST /api/v1/campaigns/wizard {"templateId":"sushi-2"}
//! POST /api/v1/campaigns/wizard/next {"step":1,"draft":{...}}
//! POST /api/v1/campaigns/wizard/back {"step":7,"draft":{...}}
//! POST /api/v1/campaigns/wizard/preview {"draft":{...},"brandColor":"#0F766E"}
//! POST /api/v1/campaigns/wizard/audience {"audience":{...},"action":{"kind":"toggleGroup","groupId":"vip-customers"}}
//! POST /api/v1/campaigns/wizard/review {...draft}
//! POST /api/v1/campaigns {...draft}
//! GET  /api/v1/campaigns?range=Last%2030%20days&offer=All&whatsappOnly=false
//! POST /api/v1/campaigns/bulk {"action":"pause","ids":["..."]}
//! ```
//!
//! The wizard is stateless on the server: the client holds the draft and
//! sends it with every step, and nothing is stored until launch.

use actix_web::{HttpRequest, HttpResponse, get, post, web};
use pagination::{PageParams, Paginated};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::domain::campaign::audience::{FILTER_FIELDS, GENDERS, MONTHS, groups, search_groups};
use crate::domain::campaign::wizard::WIZARD_STEPS;
use crate::domain::ports::BulkOutcome;
use crate::domain::{
    Audience, AudienceGroup, AudienceMode, BLOCKED_TEMPLATE_MESSAGE, BackwardMove, BulkAction,
    CampaignRow, Error, FilterField, FilterOperator, FilterUnit, FilterUpdate, ForwardMove,
    LaunchSummary, LiveCounts, Objective, OfferFilter, OfferPreview, PerformanceFilter,
    PerformanceRange, PerformanceTotals, PreviewError, RewardType, Template, TemplateFilter,
    WizardDraft, advance, find_template, objectives, previous_step, step_error, templates_for,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::paging::{PageQuery, paginate};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, missing_field_error, parse_uuid_list};

// ---------------------------------------------------------------------------
// Catalogue
// ---------------------------------------------------------------------------

/// Template-library query parameters.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct TemplateQuery {
    /// Objective identifier, e.g. `sushi-day`.
    pub objective: Option<String>,
    /// `All`, `No Discount`, `Free Item`, `₹ Discount`, or `% Discount`.
    pub offer_type: Option<String>,
    #[serde(default)]
    pub whatsapp_only: bool,
}

/// Library card: a template plus whether this tenant may open it.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TemplateCard {
    #[serde(flatten)]
    pub template: Template,
    pub blocked: bool,
}

fn parse_offer_type(raw: Option<&str>) -> Result<Option<RewardType>, Error> {
    match raw.map(str::trim) {
        None | Some("" | "All") => Ok(None),
        Some(label) => RewardType::from_library_label(label).map(Some).ok_or_else(|| {
            Error::invalid_request(format!("unknown offer type: {label}")).with_details(json!({
                "field": "offerType",
                "value": label,
                "code": "invalid_offer_type",
            }))
        }),
    }
}

/// Campaign objectives shown above the template library.
#[utoipa::path(
    get,
    path = "/api/v1/campaigns/objectives",
    responses(
        (status = 200, description = "Objectives", body = [Objective]),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["campaigns"],
    operation_id = "listObjectives"
)]
#[get("/campaigns/objectives")]
pub async fn list_objectives(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<Objective>>> {
    session.require_account_id(state.now())?;
    Ok(web::Json(objectives().to_vec()))
}

/// Templates for one objective, filtered by offer type and WhatsApp
/// support.
#[utoipa::path(
    get,
    path = "/api/v1/campaigns/templates",
    params(TemplateQuery),
    responses(
        (status = 200, description = "Templates", body = [TemplateCard]),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["campaigns"],
    operation_id = "listTemplates"
)]
#[get("/campaigns/templates")]
pub async fn list_templates(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<TemplateQuery>,
) -> ApiResult<web::Json<Vec<TemplateCard>>> {
    session.require_account_id(state.now())?;
    let query = query.into_inner();
    let objective = query
        .objective
        .ok_or_else(|| missing_field_error(FieldName::new("objective")))?;
    let filter = TemplateFilter {
        offer: parse_offer_type(query.offer_type.as_deref())?,
        whatsapp_only: query.whatsapp_only,
    };
    let cards = templates_for(&objective, filter)
        .into_iter()
        .map(|template| TemplateCard {
            blocked: template.is_blocked(state.whatsapp_header),
            template: template.clone(),
        })
        .collect();
    Ok(web::Json(cards))
}

/// Audience picker query parameters.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AudienceOptionsQuery {
    /// Case-insensitive match on group name or description.
    pub search: Option<String>,
}

/// Operator offered for a filter field.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OperatorOption {
    pub operator: FilterOperator,
    pub label: String,
}

/// Filter field with its operators and units.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FilterFieldOption {
    pub field: FilterField,
    pub label: String,
    pub operators: Vec<OperatorOption>,
    pub units: Vec<FilterUnit>,
}

/// Everything the audience step offers.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AudienceOptions {
    pub groups: Vec<AudienceGroup>,
    pub filter_fields: Vec<FilterFieldOption>,
    pub months: Vec<String>,
    pub genders: Vec<String>,
}

fn filter_field_option(field: FilterField) -> FilterFieldOption {
    FilterFieldOption {
        field,
        label: field.label().to_owned(),
        operators: field
            .operators()
            .iter()
            .map(|operator| OperatorOption {
                operator: *operator,
                label: operator.label().to_owned(),
            })
            .collect(),
        units: field.units().to_vec(),
    }
}

/// Groups, filter fields, and value lists for the audience step.
#[utoipa::path(
    get,
    path = "/api/v1/campaigns/audience/options",
    params(AudienceOptionsQuery),
    responses(
        (status = 200, description = "Audience options", body = AudienceOptions),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["campaigns"],
    operation_id = "audienceOptions"
)]
#[get("/campaigns/audience/options")]
pub async fn audience_options(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<AudienceOptionsQuery>,
) -> ApiResult<web::Json<AudienceOptions>> {
    session.require_account_id(state.now())?;
    let groups = match query.search.as_deref().map(str::trim) {
        Some(term) if !term.is_empty() => search_groups(term),
        _ => groups().to_vec(),
    };
    Ok(web::Json(AudienceOptions {
        groups,
        filter_fields: FILTER_FIELDS.into_iter().map(filter_field_option).collect(),
        months: MONTHS.iter().map(|m| (*m).to_owned()).collect(),
        genders: GENDERS.iter().map(|g| (*g).to_owned()).collect(),
    }))
}

// ---------------------------------------------------------------------------
// Wizard
// ---------------------------------------------------------------------------

/// Request body for `POST /api/v1/campaigns/wizard`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StartWizardRequest {
    pub template_id: Option<String>,
}

/// Draft and preview for the current wizard step.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WizardState {
    pub step: u8,
    pub draft: WizardDraft,
    pub preview: OfferPreview,
}

/// Request body for moving between wizard steps.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StepRequest {
    pub step: u8,
    pub draft: WizardDraft,
}

/// Where the wizard goes next.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ForwardResponse {
    #[serde(rename = "move")]
    pub next: ForwardMove,
}

/// Where the wizard goes back to.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BackwardResponse {
    #[serde(rename = "move")]
    pub back: BackwardMove,
}

/// Request body for `POST /api/v1/campaigns/wizard/preview`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PreviewRequest {
    pub draft: WizardDraft,
    /// Palette colour to apply before rendering.
    pub brand_color: Option<String>,
    /// Image URL or data URL (at most 500 KB) to apply before rendering.
    pub hero_image: Option<String>,
}

/// Updated draft and rendered offer card.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PreviewResponse {
    pub draft: WizardDraft,
    pub preview: OfferPreview,
}

/// Edit applied on the audience step.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum AudienceAction {
    SetMode {
        mode: AudienceMode,
    },
    #[serde(rename_all = "camelCase")]
    ToggleGroup {
        group_id: String,
    },
    AddFilter {
        id: Option<String>,
    },
    RemoveFilter {
        id: String,
    },
    UpdateFilter {
        id: String,
        #[serde(default)]
        update: FilterUpdate,
    },
    /// Toggle skipping of invalid phone numbers.
    #[serde(rename_all = "camelCase")]
    SkipInvalidNumbers {
        skip: bool,
    },
}

/// Request body for `POST /api/v1/campaigns/wizard/audience`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AudienceRequest {
    pub audience: Audience,
    pub action: AudienceAction,
}

/// Audience after an edit with its estimates.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AudienceResponse {
    pub audience: Audience,
    pub live_counts: LiveCounts,
    pub estimated_total: u64,
    pub narrative: String,
}

fn check_step(step: u8) -> Result<u8, Error> {
    if (1..=WIZARD_STEPS).contains(&step) {
        Ok(step)
    } else {
        Err(
            Error::invalid_field(
                "step",
                "out_of_range",
                format!("step must be between 1 and {WIZARD_STEPS}"),
            ),
        )
    }
}

fn blocked_channel_error() -> Error {
    Error::invalid_request(BLOCKED_TEMPLATE_MESSAGE).with_details(json!({
        "step": 1,
        "errors": { "channels": BLOCKED_TEMPLATE_MESSAGE },
    }))
}

fn preview_error(field: &'static str, error: &PreviewError) -> Error {
    let code = match error {
        PreviewError::UnknownColor => "unknown_color",
        PreviewError::MalformedImage => "malformed_image",
        PreviewError::ImageTooLarge { .. } => "image_too_large",
    };
    Error::invalid_field(field, code, error.to_string())
}

fn missing_rule(id: &str) -> Error {
    Error::not_found(format!("no audience rule with id {id}"))
        .with_details(json!({ "field": "id", "code": "unknown_rule" }))
}

/// Open a template in the wizard with its defaults.
#[utoipa::path(
    post,
    path = "/api/v1/campaigns/wizard",
    request_body = StartWizardRequest,
    responses(
        (status = 200, description = "Draft at step 1", body = WizardState),
        (status = 400, description = "Invalid request or blocked template", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Unknown template", body = ErrorSchema)
    ),
    tags = ["campaigns"],
    operation_id = "startWizard"
)]
#[post("/campaigns/wizard")]
pub async fn start_wizard(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<StartWizardRequest>,
) -> ApiResult<web::Json<WizardState>> {
    session.require_account_id(state.now())?;
    let template_id = payload
        .into_inner()
        .template_id
        .ok_or_else(|| missing_field_error(FieldName::new("templateId")))?;
    let template = find_template(&template_id).ok_or_else(|| {
        Error::not_found(format!("unknown template: {template_id}"))
            .with_details(json!({ "field": "templateId", "code": "unknown_template" }))
    })?;
    if template.is_blocked(state.whatsapp_header) {
        return Err(Error::invalid_field(
            "templateId",
            "whatsapp_header_required",
            BLOCKED_TEMPLATE_MESSAGE,
        ));
    }
    let draft = WizardDraft::from_template(template, state.whatsapp_header);
    let preview = draft.preview(state.now());
    Ok(web::Json(WizardState {
        step: 1,
        draft,
        preview,
    }))
}

/// Validate the current step and move forward.
///
/// Review steps for unselected channels are skipped; moving past step 10
/// completes the wizard.
#[utoipa::path(
    post,
    path = "/api/v1/campaigns/wizard/next",
    request_body = StepRequest,
    responses(
        (status = 200, description = "Next step", body = ForwardResponse),
        (status = 400, description = "Step failed validation", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["campaigns"],
    operation_id = "wizardNext"
)]
#[post("/campaigns/wizard/next")]
pub async fn wizard_next(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<StepRequest>,
) -> ApiResult<web::Json<ForwardResponse>> {
    session.require_account_id(state.now())?;
    let StepRequest { step, draft } = payload.into_inner();
    let step = check_step(step)?;
    if step == 1 && draft.channels.whatsapp && !state.whatsapp_header {
        return Err(blocked_channel_error());
    }
    let next = advance(&draft, step, state.now()).map_err(|errors| step_error(step, &errors))?;
    Ok(web::Json(ForwardResponse { next }))
}

/// Move back one step; leaving step 1 exits to the template library.
#[utoipa::path(
    post,
    path = "/api/v1/campaigns/wizard/back",
    request_body = StepRequest,
    responses(
        (status = 200, description = "Previous step", body = BackwardResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["campaigns"],
    operation_id = "wizardBack"
)]
#[post("/campaigns/wizard/back")]
pub async fn wizard_back(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<StepRequest>,
) -> ApiResult<web::Json<BackwardResponse>> {
    session.require_account_id(state.now())?;
    let StepRequest { step, draft } = payload.into_inner();
    let step = check_step(step)?;
    Ok(web::Json(BackwardResponse {
        back: previous_step(step, draft.channels),
    }))
}

/// Apply colour or image edits and render the offer card.
#[utoipa::path(
    post,
    path = "/api/v1/campaigns/wizard/preview",
    request_body = PreviewRequest,
    responses(
        (status = 200, description = "Rendered preview", body = PreviewResponse),
        (status = 400, description = "Rejected customisation", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["campaigns"],
    operation_id = "wizardPreview"
)]
#[post("/campaigns/wizard/preview")]
pub async fn wizard_preview(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<PreviewRequest>,
) -> ApiResult<web::Json<PreviewResponse>> {
    session.require_account_id(state.now())?;
    let PreviewRequest {
        mut draft,
        brand_color,
        hero_image,
    } = payload.into_inner();
    if let Some(color) = brand_color {
        draft
            .set_brand_color(&color)
            .map_err(|error| preview_error("brandColor", &error))?;
    }
    if let Some(image) = hero_image {
        draft
            .set_hero_image(image)
            .map_err(|error| preview_error("heroImage", &error))?;
    }
    let preview = draft.preview(state.now());
    Ok(web::Json(PreviewResponse { draft, preview }))
}

/// Apply one audience edit and return fresh estimates.
#[utoipa::path(
    post,
    path = "/api/v1/campaigns/wizard/audience",
    request_body = AudienceRequest,
    responses(
        (status = 200, description = "Updated audience", body = AudienceResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Unknown rule", body = ErrorSchema)
    ),
    tags = ["campaigns"],
    operation_id = "wizardAudience"
)]
#[post("/campaigns/wizard/audience")]
pub async fn wizard_audience(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<AudienceRequest>,
) -> ApiResult<web::Json<AudienceResponse>> {
    session.require_account_id(state.now())?;
    let AudienceRequest {
        mut audience,
        action,
    } = payload.into_inner();
    match action {
        AudienceAction::SetMode { mode } => audience.set_mode(mode),
        AudienceAction::ToggleGroup { group_id } => audience.toggle_group(&group_id),
        AudienceAction::AddFilter { id } => {
            audience.add_filter(id.unwrap_or_else(|| Uuid::new_v4().to_string()));
        }
        AudienceAction::RemoveFilter { id } => {
            if !audience.remove_filter(&id) {
                return Err(missing_rule(&id));
            }
        }
        AudienceAction::UpdateFilter { id, update } => {
            if !audience.update_filter(&id, update) {
                return Err(missing_rule(&id));
            }
        }
        AudienceAction::SkipInvalidNumbers { skip } => audience.skip_invalid_numbers = skip,
    }
    Ok(web::Json(AudienceResponse {
        live_counts: audience.live_counts(),
        estimated_total: audience.estimated_total(),
        narrative: audience.narrative(),
        audience,
    }))
}

/// Cost table and summary shown on the review step.
#[utoipa::path(
    post,
    path = "/api/v1/campaigns/wizard/review",
    request_body = WizardDraft,
    responses(
        (status = 200, description = "Launch summary", body = LaunchSummary),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 409, description = "Onboarding not finished", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["campaigns"],
    operation_id = "wizardReview"
)]
#[post("/campaigns/wizard/review")]
pub async fn wizard_review(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<WizardDraft>,
) -> ApiResult<web::Json<LaunchSummary>> {
    let owner = session.require_account_id(state.now())?;
    let summary = state.campaigns.review(&owner, &payload).await?;
    Ok(web::Json(summary))
}

/// Re-validate every step and launch the campaign.
#[utoipa::path(
    post,
    path = "/api/v1/campaigns",
    request_body = WizardDraft,
    responses(
        (status = 201, description = "Campaign launched", body = CampaignRow),
        (status = 400, description = "A step failed validation", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 409, description = "Onboarding not finished", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["campaigns"],
    operation_id = "launchCampaign"
)]
#[post("/campaigns")]
pub async fn launch_campaign(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<WizardDraft>,
) -> ApiResult<HttpResponse> {
    let owner = session.require_account_id(state.now())?;
    let campaign = state.campaigns.launch(&owner, payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(CampaignRow::from(&campaign)))
}

// ---------------------------------------------------------------------------
// Performance
// ---------------------------------------------------------------------------

/// Campaign table filters.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct PerformanceQuery {
    #[serde(default)]
    #[param(value_type = Option<PerformanceRange>)]
    pub range: PerformanceRange,
    #[serde(default)]
    #[param(value_type = Option<OfferFilter>)]
    pub offer: OfferFilter,
    #[serde(default)]
    pub whatsapp_only: bool,
}

/// Campaign totals with one page of the table.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CampaignListResponse {
    pub totals: PerformanceTotals,
    pub zero_state: bool,
    #[schema(value_type = Object)]
    pub page: Paginated<CampaignRow>,
}

/// Campaign performance totals and the paged campaign table.
#[utoipa::path(
    get,
    path = "/api/v1/campaigns",
    params(PerformanceQuery, PageQuery),
    responses(
        (status = 200, description = "Campaign performance", body = CampaignListResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["campaigns"],
    operation_id = "listCampaigns"
)]
#[get("/campaigns")]
pub async fn list_campaigns(
    request: HttpRequest,
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<PerformanceQuery>,
    page: web::Query<PageParams>,
) -> ApiResult<web::Json<CampaignListResponse>> {
    let owner = session.require_account_id(state.now())?;
    let PerformanceQuery {
        range,
        offer,
        whatsapp_only,
    } = query.into_inner();
    let view = state
        .campaigns_query
        .performance(
            &owner,
            PerformanceFilter {
                range,
                offer,
                whatsapp_only,
            },
        )
        .await?;
    let page = paginate(&request, &page, view.rows, CampaignRow::key)?;
    Ok(web::Json(CampaignListResponse {
        totals: view.totals,
        zero_state: view.zero_state,
        page,
    }))
}

/// Request body for `POST /api/v1/campaigns/bulk`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BulkRequest {
    pub action: BulkAction,
    pub ids: Option<Vec<String>>,
}

/// Duplicate, pause, or delete the selected campaigns.
#[utoipa::path(
    post,
    path = "/api/v1/campaigns/bulk",
    request_body = BulkRequest,
    responses(
        (status = 200, description = "Bulk action applied", body = BulkOutcome),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 409, description = "Onboarding not finished", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["campaigns"],
    operation_id = "bulkCampaigns"
)]
#[post("/campaigns/bulk")]
pub async fn bulk_campaigns(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<BulkRequest>,
) -> ApiResult<web::Json<BulkOutcome>> {
    let owner = session.require_account_id(state.now())?;
    let BulkRequest { action, ids } = payload.into_inner();
    let field = FieldName::new("ids");
    let ids = parse_uuid_list(ids.ok_or_else(|| missing_field_error(field))?, field)?;
    let outcome = state.campaigns.bulk(&owner, action, ids).await?;
    Ok(web::Json(outcome))
}

/// Register the campaign routes on a scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_objectives)
        .service(list_templates)
        .service(audience_options)
        .service(start_wizard)
        .service(wizard_next)
        .service(wizard_back)
        .service(wizard_preview)
        .service(wizard_audience)
        .service(wizard_review)
        .service(bulk_campaigns)
        .service(list_campaigns)
        .service(launch_campaign);
}

#[cfg(test)]
#[path = "campaigns_tests.rs"]
mod tests;
