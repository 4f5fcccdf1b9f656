// Signed session tokens and the cookie that carries them.
//
// Sessions are stateless: signing out deletes the cookie, but a copied token
// stays valid until it expires. Revocation would need server-side session
// storage, which this service does not keep.

use actix_web::cookie::{time::Duration as CookieDuration, Cookie, SameSite};
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::Serialize;

use crate::{models::SessionPayload, utils::AppError};

pub const SESSION_COOKIE_NAME: &str = "session";
/// 7 days, in seconds. Used for both the token `exp` and the cookie Max-Age.
pub const SESSION_DURATION_SECS: i64 = 60 * 60 * 24 * 7;

// Wire claims
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionClaims<'a> {
    user_id: &'a str,
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    iat: i64,
    exp: i64,
}

pub struct SessionCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    secure_cookies: bool,
}

impl SessionCodec {
    pub fn new(secret: &str, secure_cookies: bool) -> Result<Self, AppError> {
        if secret.is_empty() {
            return Err(AppError::Config("SESSION_SECRET environment variable is not set".to_string()));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            secure_cookies,
        })
    }

    /// Signs a new token for `payload`. Any `exp` already on the payload is ignored.
    pub fn issue(&self, payload: &SessionPayload) -> Result<String, AppError> {
        self.issue_at(payload, Utc::now().timestamp())
    }

    fn issue_at(&self, payload: &SessionPayload, issued_at: i64) -> Result<String, AppError> {
        let claims = SessionClaims {
            user_id: &payload.user_id,
            email: &payload.email,
            name: payload.name.as_deref(),
            iat: issued_at,
            exp: issued_at + SESSION_DURATION_SECS,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Config(format!("Failed to sign session token: {}", e)))
    }

    /// Returns the payload of a well-signed, unexpired token whose `userId` and
    /// `email` are strings. Every failure collapses to `None`.
    pub fn verify(&self, token: &str) -> Option<SessionPayload> {
        let data = match decode::<serde_json::Value>(token, &self.decoding_key, &self.validation) {
            Ok(data) => data,
            Err(e) => {
                log::debug!("Rejected session token: {}", e);
                return None;
            }
        };

        let claims = data.claims.as_object()?;
        let user_id = claims.get("userId")?.as_str()?;
        let email = claims.get("email")?.as_str()?;

        Some(SessionPayload {
            user_id: user_id.to_string(),
            email: email.to_string(),
            name: claims.get("name").and_then(|v| v.as_str()).map(String::from),
            exp: claims.get("exp").and_then(|v| v.as_i64()),
        })
    }

    pub fn from_cookie(&self, cookie: Option<Cookie<'_>>) -> Option<SessionPayload> {
        let cookie = cookie?;
        if cookie.value().is_empty() {
            return None;
        }
        self.verify(cookie.value())
    }

    pub fn session_cookie(&self, token: String) -> Cookie<'static> {
        Cookie::build(SESSION_COOKIE_NAME, token)
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure_cookies)
            .max_age(CookieDuration::seconds(SESSION_DURATION_SECS))
            .finish()
    }

    pub fn removal_cookie(&self) -> Cookie<'static> {
        let mut cookie = Cookie::build(SESSION_COOKIE_NAME, "")
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure_cookies)
            .finish();
        cookie.make_removal();
        cookie
    }
}
