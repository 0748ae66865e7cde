//! Data models for the application
//!
//! Every value here lives for a single submission. Nothing is persisted by
//! the service itself.

mod file;
mod registration;

pub use file::*;
pub use registration::*;
