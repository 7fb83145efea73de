//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every `/api/v1` handler plus the health probes, the
//! [`ErrorSchema`] wrapper for the shared error envelope, and the session
//! cookie security scheme. Request and response DTOs referenced by handler
//! annotations are collected automatically.
//!
//! The generated document backs Swagger UI in debug builds and is exported
//! via `cargo run --bin openapi-dump` for client generation.

use crate::domain::ErrorCode;
use crate::inbound::http::schemas::ErrorSchema;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Private session cookie issued by POST /api/v1/auth/login or /api/v1/auth/signup.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Muncho CRM API",
        description = "Restaurant CRM: accounts, onboarding, campaigns, loyalty, and customer insights."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::signup,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::auth::me,
        crate::inbound::http::bootstrap::current_session,
        crate::inbound::http::bootstrap::reset_session,
        crate::inbound::http::onboarding::get_progress,
        crate::inbound::http::onboarding::save_progress,
        crate::inbound::http::onboarding::complete,
        crate::inbound::http::campaigns::list_objectives,
        crate::inbound::http::campaigns::list_templates,
        crate::inbound::http::campaigns::audience_options,
        crate::inbound::http::campaigns::start_wizard,
        crate::inbound::http::campaigns::wizard_next,
        crate::inbound::http::campaigns::wizard_back,
        crate::inbound::http::campaigns::wizard_preview,
        crate::inbound::http::campaigns::wizard_audience,
        crate::inbound::http::campaigns::wizard_review,
        crate::inbound::http::campaigns::launch_campaign,
        crate::inbound::http::campaigns::list_campaigns,
        crate::inbound::http::campaigns::bulk_campaigns,
        crate::inbound::http::dashboard::get_dashboard,
        crate::inbound::http::loyalty::get_loyalty,
        crate::inbound::http::insights::get_overview,
        crate::inbound::http::insights::list_segments,
        crate::inbound::http::insights::list_customers,
        crate::inbound::http::insights::list_activity,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(ErrorSchema, ErrorCode)),
    tags(
        (name = "auth", description = "Signup, login, and the signed-in account"),
        (name = "session", description = "Session bootstrap and emergency reset"),
        (name = "onboarding", description = "Restaurant onboarding steps"),
        (name = "campaigns", description = "Campaign wizard, launch, and performance"),
        (name = "dashboard", description = "Restaurant dashboard metrics"),
        (name = "loyalty", description = "Loyalty programme overview"),
        (name = "insights", description = "Customer segments, lists, and activity"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying the registered OpenAPI surface.

    use super::*;
    use rstest::rstest;
    use utoipa::OpenApi;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    // utoipa replaces :: with . in schema names
    const ERROR_SCHEMA_NAME: &str = "crate.domain.Error";

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[test]
    fn error_schema_has_required_fields() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let error_schema = schemas.get(ERROR_SCHEMA_NAME).expect("Error schema");

        assert_object_schema_has_field(error_schema, "code");
        assert_object_schema_has_field(error_schema, "message");
    }

    #[rstest]
    #[case("/api/v1/auth/login")]
    #[case("/api/v1/session/reset")]
    #[case("/api/v1/campaigns/wizard/next")]
    #[case("/api/v1/insights/customers")]
    #[case("/health/ready")]
    fn documents_path(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }

    #[test]
    fn registers_session_cookie_scheme() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("SessionCookie"));
    }
}
