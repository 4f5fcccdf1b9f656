use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;

use super::{current_session, found, html};
use crate::{
    middleware::route_guard::SIGN_IN_PATH,
    models::{AccountType, CreateUserInput, SessionPayload, UpdateUserInput},
    services::user_service,
    state::AppState,
    utils::{ActionResult, AppError, FieldErrors},
    views::{self, ProfileView},
};

#[derive(Debug, Deserialize)]
pub struct ProfileForm {
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "accountType")]
    pub account_type: String,
}

fn record_input(session: &SessionPayload) -> CreateUserInput {
    CreateUserInput {
        user_id: session.user_id.clone(),
        email: session.email.clone(),
        name: session.name.clone(),
        account_type: None,
    }
}

pub async fn home(req: HttpRequest, state: web::Data<AppState>) -> HttpResponse {
    let session = current_session(&req, &state);
    html(views::home_page(session.as_ref()))
}

pub async fn dashboard(req: HttpRequest, state: web::Data<AppState>) -> HttpResponse {
    match current_session(&req, &state) {
        Some(session) => html(views::dashboard_page(&session)),
        None => found(SIGN_IN_PATH),
    }
}

pub async fn app_home(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let session = match current_session(&req, &state) {
        Some(session) => session,
        None => return Ok(found(SIGN_IN_PATH)),
    };

    let user = user_service::get_user(state.users.as_ref(), &session.user_id).await?;
    let display_name = user
        .and_then(|u| u.name)
        .or(session.name)
        .unwrap_or_else(|| "User".to_string());

    Ok(html(views::app_page(&display_name)))
}

pub async fn profile(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let session = match current_session(&req, &state) {
        Some(session) => session,
        None => return Ok(found(SIGN_IN_PATH)),
    };

    let user = user_service::get_user(state.users.as_ref(), &session.user_id).await?;
    let view = ProfileView::resolve(&session, user.as_ref());
    Ok(html(views::profile_page(&view, user.as_ref(), None)))
}

pub async fn update_profile(
    req: HttpRequest,
    state: web::Data<AppState>,
    form: web::Form<ProfileForm>,
) -> Result<HttpResponse, AppError> {
    let session = match current_session(&req, &state) {
        Some(session) => session,
        None => return Ok(found(SIGN_IN_PATH)),
    };
    log::info!("👤 POST /app/profile - user: {}", session.user_id);

    let raw_type = form.account_type.trim();
    let account_type = if raw_type.is_empty() {
        None
    } else {
        match raw_type.parse::<AccountType>() {
            Ok(account_type) => Some(account_type),
            Err(_) => {
                let mut errors = FieldErrors::new();
                errors.insert("accountType", vec!["Please choose a valid account type".to_string()]);
                let result = ActionResult::invalid(errors);
                let user = user_service::get_user(state.users.as_ref(), &session.user_id).await?;
                let view = ProfileView::resolve(&session, user.as_ref());
                return Ok(html(views::profile_page(&view, user.as_ref(), Some(&result))));
            }
        }
    };

    let name = form.name.trim();
    let input = UpdateUserInput {
        name: Some(name.to_string()).filter(|n| !n.is_empty()),
        account_type,
    };

    // Sessions issued before the store was reachable may have no record yet.
    user_service::get_or_create_user(state.users.as_ref(), record_input(&session)).await?;
    let user = user_service::update_user(state.users.as_ref(), &session.user_id, input).await?;
    log::info!("✅ Profile updated: {}", session.user_id);

    let view = ProfileView::resolve(&session, Some(&user));
    let result = ActionResult::ok("Profile updated successfully");
    Ok(html(views::profile_page(&view, Some(&user), Some(&result))))
}

#[cfg(test)]
mod tests {
    use crate::database::UserStore;
    use crate::models::{AccountType, CreateUserInput};
    use crate::services::{session_service::SESSION_COOKIE_NAME, user_service};
    use crate::test_support::{test_app, TestContext};
    use actix_web::{cookie::Cookie, http::header, http::StatusCode, test};

    fn body_text(bytes: &[u8]) -> String {
        String::from_utf8_lossy(bytes).into_owned()
    }

    #[actix_web::test]
    async fn protected_page_redirects_without_session() {
        let ctx = TestContext::new();
        let app = test_app!(ctx).await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/app/profile").to_request()).await;
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(
            resp.headers().get(header::LOCATION).and_then(|v| v.to_str().ok()),
            Some("/auth/signin?redirect=%2Fapp%2Fprofile")
        );
    }

    #[actix_web::test]
    async fn percent_encoded_page_path_keeps_redirect_target() {
        let ctx = TestContext::new();
        let app = test_app!(ctx).await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/%64ashboard").to_request()).await;
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(
            resp.headers().get(header::LOCATION).and_then(|v| v.to_str().ok()),
            Some("/auth/signin?redirect=%2Fdashboard")
        );
    }

    #[actix_web::test]
    async fn dashboard_shows_session_identity() {
        let ctx = TestContext::new();
        let app = test_app!(ctx).await;

        let req = test::TestRequest::get()
            .uri("/dashboard")
            .cookie(Cookie::new(SESSION_COOKIE_NAME, ctx.session_token()))
            .to_request();
        let body = body_text(&test::call_and_read_body(&app, req).await);
        assert!(body.contains("Welcome, Ada!"));
        assert!(body.contains("sub-ada"));
    }

    #[actix_web::test]
    async fn app_home_prefers_stored_name() {
        let ctx = TestContext::new();
        user_service::create_user(
            ctx.users.as_ref(),
            CreateUserInput {
                user_id: "sub-ada".to_string(),
                email: "ada@example.com".to_string(),
                name: Some("Countess Lovelace".to_string()),
                account_type: None,
            },
        )
        .await
        .unwrap();
        let app = test_app!(ctx).await;

        let req = test::TestRequest::get()
            .uri("/app")
            .cookie(Cookie::new(SESSION_COOKIE_NAME, ctx.session_token()))
            .to_request();
        let body = body_text(&test::call_and_read_body(&app, req).await);
        assert!(body.contains("Welcome, Countess Lovelace"));
    }

    #[actix_web::test]
    async fn profile_without_record_falls_back_to_session() {
        let ctx = TestContext::new();
        let app = test_app!(ctx).await;

        let req = test::TestRequest::get()
            .uri("/app/profile")
            .cookie(Cookie::new(SESSION_COOKIE_NAME, ctx.session_token()))
            .to_request();
        let body = body_text(&test::call_and_read_body(&app, req).await);
        assert!(body.contains("<dd>Ada</dd>"));
        assert!(body.contains("<dd>individual</dd>"));
        assert!(!body.contains("Account Details"));
    }

    #[actix_web::test]
    async fn profile_update_creates_then_updates_record() {
        let ctx = TestContext::new();
        let app = test_app!(ctx).await;

        let req = test::TestRequest::post()
            .uri("/app/profile")
            .cookie(Cookie::new(SESSION_COOKIE_NAME, ctx.session_token()))
            .set_form([("name", "Ada King"), ("accountType", "enterprise")])
            .to_request();
        let body = body_text(&test::call_and_read_body(&app, req).await);
        assert!(body.contains("Profile updated successfully"));

        let user = ctx.users.find_user("sub-ada").await.unwrap().expect("record");
        assert_eq!(user.name.as_deref(), Some("Ada King"));
        assert_eq!(user.account_type, AccountType::Enterprise);
    }

    #[actix_web::test]
    async fn profile_update_rejects_unknown_account_type() {
        let ctx = TestContext::new();
        let app = test_app!(ctx).await;

        let req = test::TestRequest::post()
            .uri("/app/profile")
            .cookie(Cookie::new(SESSION_COOKIE_NAME, ctx.session_token()))
            .set_form([("name", "Ada"), ("accountType", "premium")])
            .to_request();
        let body = body_text(&test::call_and_read_body(&app, req).await);
        assert!(body.contains("Please choose a valid account type"));
        assert_eq!(ctx.users.len().await, 0);
    }

    #[actix_web::test]
    async fn home_links_signed_in_users_to_app() {
        let ctx = TestContext::new();
        let app = test_app!(ctx).await;

        let body = body_text(&test::call_and_read_body(&app, test::TestRequest::get().uri("/").to_request()).await);
        assert!(body.contains("href=\"/auth/signin\""));

        let req = test::TestRequest::get()
            .uri("/")
            .cookie(Cookie::new(SESSION_COOKIE_NAME, ctx.session_token()))
            .to_request();
        let body = body_text(&test::call_and_read_body(&app, req).await);
        assert!(body.contains("href=\"/app\""));
    }
}
