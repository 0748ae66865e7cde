//! Regdesk Services Layer
//!
//! The append-only registration table and a single facade over the storage
//! crate, so the API crate depends on one service surface. Keep business
//! coordination here; keep thin HTTP handling in regdesk-api.

pub mod table;

pub use regdesk_storage::{
    create_object_store, generate_storage_name, validate_object_name, LocalStorage, ObjectStore,
    ObjectStoreClient, StorageBackend, StorageError, StorageResult, StoredObject,
};
pub use table::{create_table, Table, TableClient, TableError, TableResult};
