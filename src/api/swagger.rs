use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Task Manager Pro API",
        version = "1.0.0",
        description = "JSON endpoints of the Task Manager Pro web shell.\n\n**Authentication:** pages and the session endpoint read the signed `session` cookie set by the sign-in form."
    ),
    paths(
        crate::api::health::health_check,
        crate::api::session::session_status,
    ),
    components(
        schemas(
            crate::api::health::HealthResponse,
            crate::api::session::SessionStatusResponse,
            crate::models::SessionPayload,
        )
    ),
    tags(
        (name = "Health", description = "Liveness check for load balancers and monitoring."),
        (name = "Auth", description = "Session inspection. Sign-in itself happens through the HTML forms."),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "session_cookie",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                    crate::services::session_service::SESSION_COOKIE_NAME,
                    "Signed session token issued at sign-in",
                ))),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_json_endpoints_and_cookie_scheme() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/health"));
        assert!(doc.paths.paths.contains_key("/api/v1/auth/session"));

        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("session_cookie"));
    }
}
