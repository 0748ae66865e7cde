//! Regdesk Storage Library
//!
//! Object storage for submitted documents: the `ObjectStore` trait, the
//! Google Drive and local filesystem backends, and the retrying
//! `ObjectStoreClient` the submission pipeline talks to.
//!
//! # Object names
//!
//! Every stored document is named
//! `{student_id}_{NameWithoutSpaces}_{CLASS}_{role}_{timestamp}.pdf`.
//! Names never contain `/` or `..`. Name generation lives in the `keys`
//! module so all backends agree.

pub mod client;
#[cfg(feature = "storage-drive")]
pub mod drive;
pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
pub mod traits;

// Re-export commonly used types
pub use client::ObjectStoreClient;
#[cfg(feature = "storage-drive")]
pub use drive::DriveStorage;
pub use factory::create_object_store;
pub use keys::{generate_storage_name, validate_object_name};
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
pub use regdesk_core::StorageBackend;
pub use traits::{ObjectStore, StorageError, StorageResult, StoredObject};
