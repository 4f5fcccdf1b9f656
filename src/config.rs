use std::env;

use crate::utils::AppError;

const PLACEHOLDER_POOL_ID: &str = "your-user-pool-id";
const PLACEHOLDER_CLIENT_ID: &str = "your-client-id";

/// Cognito user pool coordinates.
#[derive(Debug, Clone)]
pub struct CognitoConfig {
    pub region: String,
    pub user_pool_id: String,
    pub client_id: String,
    /// Overrides the regional endpoint (local emulators).
    pub endpoint: Option<String>,
}

impl CognitoConfig {
    /// Pool coordinates that are missing or still the `.env` placeholders count as unset.
    pub fn is_configured(&self) -> bool {
        !self.region.is_empty()
            && !self.user_pool_id.is_empty()
            && self.user_pool_id != PLACEHOLDER_POOL_ID
            && !self.client_id.is_empty()
            && self.client_id != PLACEHOLDER_CLIENT_ID
    }

    pub fn endpoint_url(&self) -> String {
        match &self.endpoint {
            Some(endpoint) => endpoint.clone(),
            None => format!("https://cognito-idp.{}.amazonaws.com/", self.region),
        }
    }

    pub fn missing_variables(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.region.is_empty() {
            missing.push("AWS_REGION");
        }
        if self.user_pool_id.is_empty() {
            missing.push("COGNITO_USER_POOL_ID");
        }
        if self.client_id.is_empty() {
            missing.push("COGNITO_CLIENT_ID");
        }
        missing
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub session_secret: String,
    pub production: bool,
    pub cognito: CognitoConfig,
    pub database_url: Option<String>,
    pub users_collection: String,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let session_secret = var("SESSION_SECRET")
            .ok_or_else(|| AppError::Config("SESSION_SECRET environment variable is not set".to_string()))?;

        let port = match var("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|_| AppError::Config(format!("PORT is not a valid port: {}", raw)))?,
            None => 3000,
        };

        let cognito = CognitoConfig {
            region: var("AWS_REGION").or_else(|| var("COGNITO_REGION")).unwrap_or_default(),
            user_pool_id: var("COGNITO_USER_POOL_ID").unwrap_or_default(),
            client_id: var("COGNITO_CLIENT_ID").unwrap_or_default(),
            endpoint: var("COGNITO_ENDPOINT"),
        };

        Ok(Self {
            host: var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            session_secret,
            production: var("APP_ENV").map(|v| v == "production").unwrap_or(false),
            cognito,
            database_url: var("DATABASE_URL"),
            users_collection: var("USERS_COLLECTION").unwrap_or_else(|| "users".to_string()),
        })
    }
}
