// Shared fixtures for handler and middleware tests.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::{
    database::InMemoryUserStore,
    models::SessionPayload,
    services::{
        identity_service::{IdentityClaims, IdentityError, IdentityProvider, SignUpOutcome},
        session_service::SessionCodec,
    },
    state::AppState,
};

pub const TEST_SECRET: &str = "test-secret-key-for-testing-only";
pub const GOOD_PASSWORD: &str = "correct-horse";
/// Requests for this address fail as if the provider were unreachable.
pub const OFFLINE_EMAIL: &str = "offline@example.com";

/// Identity provider that knows a single account and records every call.
#[derive(Default)]
pub struct FakeIdentityProvider {
    pub calls: Mutex<Vec<String>>,
}

impl FakeIdentityProvider {
    fn record(&self, call: String) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentityProvider {
    async fn sign_up(&self, email: &str, _password: &str, name: Option<&str>) -> Result<SignUpOutcome, IdentityError> {
        self.record(format!("sign_up:{}:{}", email, name.unwrap_or("")));
        if email == "taken@example.com" {
            return Err(IdentityError::Rejected("An account with the given email already exists.".to_string()));
        }
        Ok(SignUpOutcome {
            user_sub: "new-sub".to_string(),
            user_confirmed: false,
        })
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<IdentityClaims, IdentityError> {
        self.record(format!("sign_in:{}", email));
        if email == "ada@example.com" && password == GOOD_PASSWORD {
            Ok(IdentityClaims {
                sub: "sub-ada".to_string(),
                email: email.to_string(),
                name: Some("Ada".to_string()),
            })
        } else {
            Err(IdentityError::Rejected("Incorrect username or password.".to_string()))
        }
    }

    async fn forgot_password(&self, email: &str) -> Result<(), IdentityError> {
        self.record(format!("forgot_password:{}", email));
        if email == OFFLINE_EMAIL {
            return Err(IdentityError::Transport("connection refused".to_string()));
        }
        Ok(())
    }

    async fn confirm_forgot_password(&self, email: &str, code: &str, _new_password: &str) -> Result<(), IdentityError> {
        self.record(format!("confirm_forgot_password:{}:{}", email, code));
        if email == OFFLINE_EMAIL {
            return Err(IdentityError::Transport("connection refused".to_string()));
        }
        if code == "000000" {
            return Err(IdentityError::Rejected("Invalid verification code provided, please try again.".to_string()));
        }
        Ok(())
    }
}

pub struct TestContext {
    pub state: AppState,
    pub identity: Arc<FakeIdentityProvider>,
    pub users: Arc<InMemoryUserStore>,
}

impl TestContext {
    pub fn new() -> Self {
        let identity = Arc::new(FakeIdentityProvider::default());
        let users = Arc::new(InMemoryUserStore::new());
        let sessions = Arc::new(SessionCodec::new(TEST_SECRET, false).expect("test codec"));
        let state = AppState::new(sessions, identity.clone(), users.clone());
        Self { state, identity, users }
    }

    /// Signed `session` cookie value for Ada.
    pub fn session_token(&self) -> String {
        self.state
            .sessions
            .issue(&SessionPayload::new("sub-ada", "ada@example.com", Some("Ada".to_string())))
            .expect("issue token")
    }
}

/// Full application (guard + routes) over a [`TestContext`]; `.await` the result.
macro_rules! test_app {
    ($ctx:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new($ctx.state.clone()))
                .wrap(crate::middleware::RouteGuard::new($ctx.state.sessions.clone()))
                .configure(crate::api::configure),
        )
    };
}

pub(crate) use test_app;
