use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    Error, HttpMessage, HttpResponse,
};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::sync::Arc;

use crate::services::session_service::{SessionCodec, SESSION_COOKIE_NAME};

/// Paths that need a valid session.
pub const PROTECTED_PREFIXES: &[&str] = &["/dashboard", "/app"];
/// Sign-in and sign-up flows; signed-in visitors are sent to the app instead.
pub const AUTH_ONLY_PREFIXES: &[&str] = &["/auth/signin", "/auth/signup"];

pub const SIGN_IN_PATH: &str = "/auth/signin";
pub const APP_HOME_PATH: &str = "/app";

const STATIC_PREFIXES: &[&str] = &["/static/", "/_image/", "/favicon.ico"];
const IMAGE_EXTENSIONS: &[&str] = &[".svg", ".png", ".jpg", ".jpeg", ".gif", ".webp"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    RedirectToSignIn { location: String },
    RedirectToApp,
}

/// Static files and images bypass the guard entirely.
pub fn is_static_asset(path: &str) -> bool {
    STATIC_PREFIXES.iter().any(|prefix| path.starts_with(prefix))
        || IMAGE_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}

pub fn is_protected(path: &str) -> bool {
    PROTECTED_PREFIXES.iter().any(|prefix| path.starts_with(prefix))
}

pub fn is_auth_only(path: &str) -> bool {
    AUTH_ONLY_PREFIXES.iter().any(|prefix| path.starts_with(prefix))
}

pub fn sign_in_location(original_path: &str) -> String {
    format!("{}?redirect={}", SIGN_IN_PATH, urlencoding::encode(original_path))
}

pub fn decide(path: &str, has_session: bool) -> GuardDecision {
    if is_protected(path) && !has_session {
        return GuardDecision::RedirectToSignIn {
            location: sign_in_location(path),
        };
    }
    if is_auth_only(path) && has_session {
        return GuardDecision::RedirectToApp;
    }
    GuardDecision::Allow
}

pub struct RouteGuard {
    sessions: Arc<SessionCodec>,
}

impl RouteGuard {
    pub fn new(sessions: Arc<SessionCodec>) -> Self {
        Self { sessions }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RouteGuard
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RouteGuardMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RouteGuardMiddleware {
            service,
            sessions: self.sessions.clone(),
        }))
    }
}

pub struct RouteGuardMiddleware<S> {
    service: S,
    sessions: Arc<SessionCodec>,
}

impl<S, B> Service<ServiceRequest> for RouteGuardMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // Same decoded path the router matches on
        let path = req.match_info().as_str().to_string();

        if is_static_asset(&path) {
            let fut = self.service.call(req);
            return Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) });
        }

        let session = self.sessions.from_cookie(req.cookie(SESSION_COOKIE_NAME));

        let location = match decide(&path, session.is_some()) {
            GuardDecision::Allow => {
                if let Some(session) = session {
                    req.extensions_mut().insert(session);
                }
                let fut = self.service.call(req);
                return Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) });
            }
            GuardDecision::RedirectToSignIn { location } => {
                log::info!("🔒 {} requires a session, redirecting to sign-in", path);
                location
            }
            GuardDecision::RedirectToApp => {
                log::debug!("{} is for signed-out visitors, redirecting to {}", path, APP_HOME_PATH);
                APP_HOME_PATH.to_string()
            }
        };

        let response = HttpResponse::Found()
            .insert_header((header::LOCATION, location))
            .finish()
            .map_into_right_body();

        Box::pin(async move { Ok(req.into_response(response)) })
    }
}
