pub mod identity_service;
pub mod session_service;
pub mod user_service;
