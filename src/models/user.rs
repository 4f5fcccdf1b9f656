use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    #[default]
    Individual,
    Team,
    Enterprise,
}

impl AccountType {
    pub const ALL: [AccountType; 3] = [AccountType::Individual, AccountType::Team, AccountType::Enterprise];

    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Individual => "individual",
            AccountType::Team => "team",
            AccountType::Enterprise => "enterprise",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "individual" => Ok(AccountType::Individual),
            "team" => Ok(AccountType::Team),
            "enterprise" => Ok(AccountType::Enterprise),
            other => Err(format!("Unknown account type: {}", other)),
        }
    }
}

/// Profile record kept in the user store.
///
/// `user_id` is the identity provider's subject (`sub`) and is the primary key.
/// Timestamps are ISO-8601 strings with millisecond precision.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub account_type: AccountType,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Default)]
pub struct CreateUserInput {
    pub user_id: String,
    pub email: String,
    pub name: Option<String>,
    pub account_type: Option<AccountType>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateUserInput {
    pub name: Option<String>,
    pub account_type: Option<AccountType>,
}

/// Fields written by a partial update. `updated_at` is always set.
#[derive(Debug, Clone)]
pub struct UserChanges {
    pub name: Option<String>,
    pub account_type: Option<AccountType>,
    pub updated_at: String,
}

impl UserChanges {
    pub fn apply(&self, user: &mut User) {
        if let Some(name) = &self.name {
            user.name = Some(name.clone());
        }
        if let Some(account_type) = self.account_type {
            user.account_type = account_type;
        }
        user.updated_at = self.updated_at.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_type_serializes_lowercase() {
        let json = serde_json::to_string(&AccountType::Enterprise).unwrap();
        assert_eq!(json, "\"enterprise\"");
        assert_eq!("team".parse::<AccountType>().unwrap(), AccountType::Team);
        assert!("admin".parse::<AccountType>().is_err());
    }

    #[test]
    fn user_uses_camel_case_attributes() {
        let user = User {
            user_id: "sub-1".to_string(),
            email: "a@example.com".to_string(),
            name: None,
            account_type: AccountType::Individual,
            created_at: "2026-01-01T00:00:00.000Z".to_string(),
            updated_at: "2026-01-01T00:00:00.000Z".to_string(),
        };
        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(value["userId"], "sub-1");
        assert_eq!(value["accountType"], "individual");
        assert_eq!(value["createdAt"], "2026-01-01T00:00:00.000Z");
        assert!(value.get("name").is_none());
    }

    #[test]
    fn changes_merge_only_present_fields() {
        let mut user = User {
            user_id: "sub-1".to_string(),
            email: "a@example.com".to_string(),
            name: Some("Ada".to_string()),
            account_type: AccountType::Team,
            created_at: "2026-01-01T00:00:00.000Z".to_string(),
            updated_at: "2026-01-01T00:00:00.000Z".to_string(),
        };
        let changes = UserChanges {
            name: None,
            account_type: Some(AccountType::Enterprise),
            updated_at: "2026-02-01T00:00:00.000Z".to_string(),
        };
        changes.apply(&mut user);
        assert_eq!(user.name.as_deref(), Some("Ada"));
        assert_eq!(user.account_type, AccountType::Enterprise);
        assert_eq!(user.updated_at, "2026-02-01T00:00:00.000Z");
        assert_eq!(user.created_at, "2026-01-01T00:00:00.000Z");
    }
}
