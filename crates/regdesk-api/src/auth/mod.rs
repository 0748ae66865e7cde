pub mod middleware;

pub use middleware::{auth_middleware, AuthState, API_KEY_HEADER};
