use serde::{Deserialize, Serialize};

/// Identity carried by the session cookie.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionPayload {
    pub user_id: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Expiry as a unix timestamp; only set on payloads read back from a token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

impl SessionPayload {
    pub fn new(user_id: impl Into<String>, email: impl Into<String>, name: Option<String>) -> Self {
        Self {
            user_id: user_id.into(),
            email: email.into(),
            name,
            exp: None,
        }
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.email)
    }
}
