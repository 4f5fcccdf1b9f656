pub mod auth;
pub mod health;
pub mod pages;
pub mod session;
pub mod swagger;

use actix_web::{cookie::Cookie, http::header, web, HttpRequest, HttpResponse};

use crate::{models::SessionPayload, services::session_service::SESSION_COOKIE_NAME, state::AppState};

/// Routes shared by the server and the HTTP tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(pages::home))
        // Health check
        .route("/health", web::get().to(health::health_check))
        // Auth forms and actions
        .service(
            web::scope("/auth")
                .route("/signin", web::get().to(auth::sign_in_form))
                .route("/signin", web::post().to(auth::sign_in))
                .route("/signup", web::get().to(auth::sign_up_form))
                .route("/signup", web::post().to(auth::sign_up))
                .route("/forgot-password", web::get().to(auth::forgot_password_form))
                .route("/forgot-password", web::post().to(auth::forgot_password))
                .route("/reset-password", web::post().to(auth::reset_password))
                .route("/signout", web::post().to(auth::sign_out)),
        )
        // Protected pages (the route guard has already checked the cookie)
        .route("/dashboard", web::get().to(pages::dashboard))
        .service(
            web::scope("/app")
                .route("", web::get().to(pages::app_home))
                .route("/profile", web::get().to(pages::profile))
                .route("/profile", web::post().to(pages::update_profile)),
        )
        // JSON
        .service(web::scope("/api/v1/auth").route("/session", web::get().to(session::session_status)));
}

/// Re-reads and verifies the session cookie; handlers do not rely on the guard alone.
pub(crate) fn current_session(req: &HttpRequest, state: &AppState) -> Option<SessionPayload> {
    state.sessions.from_cookie(req.cookie(SESSION_COOKIE_NAME))
}

pub(crate) fn html(body: String) -> HttpResponse {
    HttpResponse::Ok().content_type("text/html; charset=utf-8").body(body)
}

pub(crate) fn found(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location.to_string()))
        .finish()
}

pub(crate) fn found_with_cookie(location: &str, cookie: Cookie<'static>) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location.to_string()))
        .cookie(cookie)
        .finish()
}
