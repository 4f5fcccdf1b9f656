use actix_web::{web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};

use super::current_session;
use crate::{models::SessionPayload, state::AppState};

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct SessionStatusResponse {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<SessionPayload>,
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/session",
    tag = "Auth",
    responses(
        (status = 200, description = "Session state for the request's cookie", body = SessionStatusResponse)
    ),
    security(("session_cookie" = []))
)]
pub async fn session_status(req: HttpRequest, state: web::Data<AppState>) -> HttpResponse {
    let user = current_session(&req, &state);
    HttpResponse::Ok().json(SessionStatusResponse {
        authenticated: user.is_some(),
        user,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::session_service::SESSION_COOKIE_NAME;
    use crate::test_support::{test_app, TestContext};
    use actix_web::{cookie::Cookie, test};

    #[actix_web::test]
    async fn reports_cookie_state() {
        let ctx = TestContext::new();
        let app = test_app!(ctx).await;

        let anonymous: SessionStatusResponse = test::call_and_read_body_json(
            &app,
            test::TestRequest::get().uri("/api/v1/auth/session").to_request(),
        )
        .await;
        assert!(!anonymous.authenticated);
        assert!(anonymous.user.is_none());

        let req = test::TestRequest::get()
            .uri("/api/v1/auth/session")
            .cookie(Cookie::new(SESSION_COOKIE_NAME, ctx.session_token()))
            .to_request();
        let signed_in: SessionStatusResponse = test::call_and_read_body_json(&app, req).await;
        assert!(signed_in.authenticated);
        let user = signed_in.user.expect("user");
        assert_eq!(user.user_id, "sub-ada");
        assert!(user.exp.is_some());
    }

    #[actix_web::test]
    async fn tampered_cookie_is_anonymous() {
        let ctx = TestContext::new();
        let app = test_app!(ctx).await;

        let mut token = ctx.session_token();
        token.push('x');
        let req = test::TestRequest::get()
            .uri("/api/v1/auth/session")
            .cookie(Cookie::new(SESSION_COOKIE_NAME, token))
            .to_request();
        let resp: SessionStatusResponse = test::call_and_read_body_json(&app, req).await;
        assert!(!resp.authenticated);
    }
}
