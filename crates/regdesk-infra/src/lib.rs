//! Regdesk Infrastructure Library
//!
//! Shared infrastructure used by the storage, table and API crates:
//! - Middleware (request ID)
//! - Telemetry initialization
//! - Retry policy for calls to external services
//! - Google service-account access tokens

pub mod google;
pub mod middleware;
pub mod retry;
pub mod telemetry;

// Re-export commonly used types
pub use google::{
    is_transient_transport, is_unsent_transport, ServiceAccountKey, ServiceAccountTokenProvider,
    StaticTokenProvider, TokenError, TokenProvider, DRIVE_SCOPE, SHEETS_SCOPE,
};
pub use middleware::{get_request_id, request_id_middleware, RequestId};
pub use retry::{is_transient_status, retry_with_policy, RetryPolicy, Retryable};
pub use telemetry::{init_telemetry, shutdown_telemetry};
