use actix_web::{web, HttpResponse};
use serde::Deserialize;

use super::{found_with_cookie, html};
use crate::{
    models::{CreateUserInput, SessionPayload},
    services::{identity_service::IdentityError, user_service},
    state::AppState,
    utils::{
        safe_redirect_target, validate_confirm_password, validate_forgot_password, validate_sign_in, validate_sign_up,
        ActionResult, AppError,
    },
    views,
};

/// Where a successful sign-in lands when the form carries no usable `redirect`.
const DEFAULT_AFTER_SIGN_IN: &str = "/dashboard";

#[derive(Debug, Deserialize)]
pub struct RedirectQuery {
    pub redirect: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SignUpForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct SignInForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    pub redirect: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordForm {
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub code: String,
    #[serde(default, rename = "newPassword")]
    pub new_password: String,
}

/// Provider rejections are shown verbatim; anything else gets the fallback.
fn provider_failure(action: &str, error: IdentityError, fallback: &str) -> ActionResult {
    match error {
        IdentityError::Rejected(message) if !message.is_empty() => {
            log::warn!("⚠️  {} rejected: {}", action, message);
            ActionResult::failed(message)
        }
        other => {
            log::error!("❌ {} failed: {}", action, other);
            ActionResult::failed(fallback)
        }
    }
}

// ==================== SIGN UP ====================

pub async fn sign_up_form() -> HttpResponse {
    html(views::sign_up_page(None, "", ""))
}

pub async fn sign_up(state: web::Data<AppState>, form: web::Form<SignUpForm>) -> HttpResponse {
    let form = form.into_inner();
    let email = form.email.trim();
    let name = form.name.trim();
    log::info!("📝 POST /auth/signup - email: {}", email);

    if let Err(result) = validate_sign_up(email, &form.password) {
        return html(views::sign_up_page(Some(&result), email, name));
    }

    let name_attr = Some(name).filter(|n| !n.is_empty());
    let result = match state.identity.sign_up(email, &form.password, name_attr).await {
        Ok(outcome) => {
            log::info!(
                "✅ Sign up accepted: {} (sub: {}, confirmed: {})",
                email,
                outcome.user_sub,
                outcome.user_confirmed
            );
            ActionResult::ok("Sign up successful! Please check your email for verification.")
        }
        Err(e) => provider_failure("Sign up", e, "Sign up failed. Please try again."),
    };

    html(views::sign_up_page(Some(&result), email, name))
}

// ==================== SIGN IN ====================

pub async fn sign_in_form(query: web::Query<RedirectQuery>) -> HttpResponse {
    html(views::sign_in_page(None, "", query.redirect.as_deref()))
}

pub async fn sign_in(state: web::Data<AppState>, form: web::Form<SignInForm>) -> Result<HttpResponse, AppError> {
    let form = form.into_inner();
    let email = form.email.trim();
    log::info!("🔐 POST /auth/signin - email: {}", email);

    if let Err(result) = validate_sign_in(email, &form.password) {
        return Ok(html(views::sign_in_page(Some(&result), email, form.redirect.as_deref())));
    }

    let claims = match state.identity.sign_in(email, &form.password).await {
        Ok(claims) => claims,
        Err(e) => {
            let result = provider_failure("Sign in", e, "Sign in failed. Please check your credentials.");
            return Ok(html(views::sign_in_page(Some(&result), email, form.redirect.as_deref())));
        }
    };

    let payload = SessionPayload::new(claims.sub.clone(), claims.email.clone(), claims.name.clone());
    let token = state.sessions.issue(&payload)?;

    // The record is a convenience; sign-in succeeds even if the store is down.
    let input = CreateUserInput {
        user_id: claims.sub,
        email: claims.email,
        name: claims.name,
        account_type: None,
    };
    if let Err(e) = user_service::get_or_create_user(state.users.as_ref(), input).await {
        log::warn!("⚠️  Could not ensure user record for {}: {}", email, e);
    }

    let target = safe_redirect_target(form.redirect.as_deref()).unwrap_or(DEFAULT_AFTER_SIGN_IN);
    log::info!("✅ Sign in successful: {} → {}", email, target);

    Ok(found_with_cookie(target, state.sessions.session_cookie(token)))
}

// ==================== SIGN OUT ====================

pub async fn sign_out(state: web::Data<AppState>) -> HttpResponse {
    log::info!("👋 POST /auth/signout");
    found_with_cookie("/", state.sessions.removal_cookie())
}

// ==================== PASSWORD RESET ====================

pub async fn forgot_password_form() -> HttpResponse {
    html(views::forgot_password_page(None, None, ""))
}

pub async fn forgot_password(state: web::Data<AppState>, form: web::Form<ForgotPasswordForm>) -> HttpResponse {
    let email = form.email.trim();
    log::info!("🔑 POST /auth/forgot-password - email: {}", email);

    let result = match validate_forgot_password(email) {
        Err(result) => result,
        Ok(()) => match state.identity.forgot_password(email).await {
            Ok(()) => ActionResult::ok("Password reset code sent to your email"),
            Err(e) => provider_failure("Forgot password", e, "Password reset failed. Please try again."),
        },
    };

    html(views::forgot_password_page(Some(&result), None, email))
}

pub async fn reset_password(state: web::Data<AppState>, form: web::Form<ResetPasswordForm>) -> HttpResponse {
    let form = form.into_inner();
    let email = form.email.trim();
    let code = form.code.trim();
    log::info!("🔑 POST /auth/reset-password - email: {}", email);

    let result = match validate_confirm_password(email, code, &form.new_password) {
        Err(result) => result,
        Ok(()) => match state.identity.confirm_forgot_password(email, code, &form.new_password).await {
            Ok(()) => ActionResult::ok("Password reset successful! You can now sign in with your new password."),
            Err(e) => provider_failure("Password confirmation", e, "Password confirmation failed. Please try again."),
        },
    };

    html(views::forgot_password_page(None, Some(&result), email))
}
