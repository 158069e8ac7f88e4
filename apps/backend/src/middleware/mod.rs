pub mod cors;
pub mod require_auth;
pub mod request_trace;
pub mod security_headers;
pub mod structured_logger;

pub use cors::cors_middleware;
pub use require_auth::RequireAuth;
pub use request_trace::RequestTrace;
pub use security_headers::SecurityHeaders;
pub use structured_logger::StructuredLogger;
