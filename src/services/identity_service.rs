// ==================== IDENTITY PROVIDER ====================
// Credentials, sign-up confirmation and password resets belong to the managed
// identity provider. This service only proxies form submissions to it.

use async_trait::async_trait;
use base64::Engine;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fmt;

use crate::config::CognitoConfig;

const TARGET_PREFIX: &str = "AWSCognitoIdentityProviderService";
const AMZ_JSON: &str = "application/x-amz-json-1.1";

#[derive(Debug, Clone, PartialEq)]
pub enum IdentityError {
    NotConfigured(String),
    /// The provider refused the request; carries its message.
    Rejected(String),
    Transport(String),
}

impl fmt::Display for IdentityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentityError::NotConfigured(msg) => write!(f, "{}", msg),
            IdentityError::Rejected(msg) => write!(f, "{}", msg),
            IdentityError::Transport(msg) => write!(f, "Identity provider unreachable: {}", msg),
        }
    }
}

impl std::error::Error for IdentityError {}

#[derive(Debug, Clone, PartialEq)]
pub struct SignUpOutcome {
    pub user_sub: String,
    pub user_confirmed: bool,
}

/// Profile claims of an authenticated user, read from the provider's ID token.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IdentityClaims {
    pub sub: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_up(&self, email: &str, password: &str, name: Option<&str>) -> Result<SignUpOutcome, IdentityError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<IdentityClaims, IdentityError>;

    async fn forgot_password(&self, email: &str) -> Result<(), IdentityError>;

    async fn confirm_forgot_password(&self, email: &str, code: &str, new_password: &str) -> Result<(), IdentityError>;
}

// ==================== COGNITO WIRE TYPES ====================

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct AttributeType<'a> {
    name: &'a str,
    value: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct SignUpBody<'a> {
    client_id: &'a str,
    username: &'a str,
    password: &'a str,
    user_attributes: Vec<AttributeType<'a>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SignUpResponse {
    user_sub: String,
    #[serde(default)]
    user_confirmed: bool,
}

#[derive(Serialize)]
struct AuthParameters<'a> {
    #[serde(rename = "USERNAME")]
    username: &'a str,
    #[serde(rename = "PASSWORD")]
    password: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct InitiateAuthBody<'a> {
    auth_flow: &'a str,
    client_id: &'a str,
    auth_parameters: AuthParameters<'a>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InitiateAuthResponse {
    authentication_result: Option<AuthenticationResult>,
    challenge_name: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AuthenticationResult {
    id_token: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct ForgotPasswordBody<'a> {
    client_id: &'a str,
    username: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct ConfirmForgotPasswordBody<'a> {
    client_id: &'a str,
    username: &'a str,
    confirmation_code: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(rename = "__type")]
    kind: Option<String>,
    #[serde(alias = "Message")]
    message: Option<String>,
}

/// Extracts the profile claims from the payload segment of an ID token.
///
/// The token comes straight from the provider over TLS, so the signature is
/// not checked here.
pub fn decode_id_token_claims(id_token: &str) -> Result<IdentityClaims, IdentityError> {
    let payload = id_token
        .split('.')
        .nth(1)
        .ok_or_else(|| IdentityError::Rejected("Malformed ID token".to_string()))?;

    let bytes = base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| IdentityError::Rejected(format!("Malformed ID token: {}", e)))?;

    serde_json::from_slice(&bytes).map_err(|e| IdentityError::Rejected(format!("Malformed ID token: {}", e)))
}

fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody { message: Some(message), .. }) if !message.is_empty() => message,
        Ok(ErrorBody { kind: Some(kind), .. }) => kind.rsplit('#').next().unwrap_or(&kind).to_string(),
        _ => "Request rejected by identity provider".to_string(),
    }
}

pub struct CognitoIdentityProvider {
    http: reqwest::Client,
    config: CognitoConfig,
}

impl CognitoIdentityProvider {
    pub fn new(config: CognitoConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self { http, config }
    }

    fn client_id(&self) -> Result<&str, IdentityError> {
        if !self.config.is_configured() {
            let missing = self.config.missing_variables();
            let detail = if missing.is_empty() {
                "placeholder values".to_string()
            } else {
                missing.join(", ")
            };
            return Err(IdentityError::NotConfigured(format!(
                "Cognito configuration not set ({}). Please update your .env file with valid credentials.",
                detail
            )));
        }
        Ok(&self.config.client_id)
    }

    async fn call<B, R>(&self, action: &str, body: &B) -> Result<R, IdentityError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let payload = serde_json::to_vec(body).map_err(|e| IdentityError::Transport(e.to_string()))?;

        let response = self
            .http
            .post(self.config.endpoint_url())
            .header("X-Amz-Target", format!("{}.{}", TARGET_PREFIX, action))
            .header(reqwest::header::CONTENT_TYPE, AMZ_JSON)
            .body(payload)
            .send()
            .await
            .map_err(|e| IdentityError::Transport(e.to_string()))?;

        let status = response.status();
        let text = response.text().await.map_err(|e| IdentityError::Transport(e.to_string()))?;

        if !status.is_success() {
            log::warn!("Cognito {} rejected ({}): {}", action, status, text);
            return Err(IdentityError::Rejected(error_message(&text)));
        }

        // Some actions answer with an empty body
        let text = if text.trim().is_empty() { "{}" } else { text.as_str() };
        serde_json::from_str(text).map_err(|e| IdentityError::Transport(format!("Unexpected {} response: {}", action, e)))
    }
}

#[async_trait]
impl IdentityProvider for CognitoIdentityProvider {
    async fn sign_up(&self, email: &str, password: &str, name: Option<&str>) -> Result<SignUpOutcome, IdentityError> {
        let client_id = self.client_id()?;

        let mut user_attributes = vec![AttributeType { name: "email", value: email }];
        if let Some(name) = name.filter(|n| !n.is_empty()) {
            user_attributes.push(AttributeType { name: "name", value: name });
        }

        let response: SignUpResponse = self
            .call(
                "SignUp",
                &SignUpBody {
                    client_id,
                    username: email,
                    password,
                    user_attributes,
                },
            )
            .await?;

        Ok(SignUpOutcome {
            user_sub: response.user_sub,
            user_confirmed: response.user_confirmed,
        })
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<IdentityClaims, IdentityError> {
        let client_id = self.client_id()?;

        let response: InitiateAuthResponse = self
            .call(
                "InitiateAuth",
                &InitiateAuthBody {
                    auth_flow: "USER_PASSWORD_AUTH",
                    client_id,
                    auth_parameters: AuthParameters {
                        username: email,
                        password,
                    },
                },
            )
            .await?;

        match (response.authentication_result, response.challenge_name.as_deref()) {
            (Some(AuthenticationResult { id_token: Some(id_token) }), _) => decode_id_token_claims(&id_token),
            (_, Some("NEW_PASSWORD_REQUIRED")) => Err(IdentityError::Rejected(
                "New password required. Please reset your password.".to_string(),
            )),
            _ => Err(IdentityError::Rejected("Authentication failed".to_string())),
        }
    }

    async fn forgot_password(&self, email: &str) -> Result<(), IdentityError> {
        let client_id = self.client_id()?;
        let _: serde_json::Value = self
            .call("ForgotPassword", &ForgotPasswordBody { client_id, username: email })
            .await?;
        Ok(())
    }

    async fn confirm_forgot_password(&self, email: &str, code: &str, new_password: &str) -> Result<(), IdentityError> {
        let client_id = self.client_id()?;
        let _: serde_json::Value = self
            .call(
                "ConfirmForgotPassword",
                &ConfirmForgotPasswordBody {
                    client_id,
                    username: email,
                    confirmation_code: code,
                    password: new_password,
                },
            )
            .await?;
        Ok(())
    }
}
