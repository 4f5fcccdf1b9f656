use std::sync::Arc;

use crate::{database::UserStore, services::identity_service::IdentityProvider, services::session_service::SessionCodec};

/// Service context shared by every handler through `web::Data`.
///
/// Built once at startup; nothing in it is mutated afterwards.
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionCodec>,
    pub identity: Arc<dyn IdentityProvider>,
    pub users: Arc<dyn UserStore>,
}

impl AppState {
    pub fn new(sessions: Arc<SessionCodec>, identity: Arc<dyn IdentityProvider>, users: Arc<dyn UserStore>) -> Self {
        Self {
            sessions,
            identity,
            users,
        }
    }
}
