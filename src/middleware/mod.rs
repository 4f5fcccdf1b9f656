pub mod route_guard;
pub mod security_headers;

pub use route_guard::RouteGuard;
pub use security_headers::SecurityHeaders;
