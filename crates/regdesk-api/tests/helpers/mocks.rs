//! Counting in-memory collaborators for the submission pipeline.

#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use regdesk_core::{StorageBackend, TableBackend};
use regdesk_services::{
    validate_object_name, ObjectStore, StorageError, StorageResult, StoredObject, Table,
    TableError, TableResult,
};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;

pub fn storage_status(status: u16) -> StorageError {
    StorageError::BackendError {
        status,
        message: format!("backend returned {}", status),
    }
}

pub fn table_status(status: u16) -> TableError {
    TableError::BackendError {
        status,
        message: format!("backend returned {}", status),
    }
}

/// Object store that records every call.
///
/// Names are checked with the same rules the real backends apply.
/// `put_failures` are handed out in order to whichever upload asks first.
/// `failing_role` makes every put whose object name contains `_{role}_` fail.
#[derive(Default)]
pub struct CountingStore {
    put_failures: Mutex<VecDeque<StorageError>>,
    failing_role: Option<(&'static str, u16)>,
    pub puts: AtomicU32,
    pub grants: AtomicU32,
    pub names: Mutex<Vec<String>>,
    pub deletes: Mutex<Vec<String>>,
}

impl CountingStore {
    pub fn with_put_failures(failures: Vec<StorageError>) -> Self {
        Self {
            put_failures: Mutex::new(failures.into()),
            ..Default::default()
        }
    }

    pub fn failing_role(role: &'static str, status: u16) -> Self {
        Self {
            failing_role: Some((role, status)),
            ..Default::default()
        }
    }

    pub fn put_count(&self) -> u32 {
        self.puts.load(Ordering::SeqCst)
    }

    pub fn deleted(&self) -> Vec<String> {
        self.deletes.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectStore for CountingStore {
    async fn put(
        &self,
        name: &str,
        _content_type: &str,
        _data: Bytes,
    ) -> StorageResult<StoredObject> {
        let n = self.puts.fetch_add(1, Ordering::SeqCst);
        validate_object_name(name)?;
        if let Some((role, status)) = self.failing_role {
            if name.contains(&format!("_{}_", role)) {
                return Err(storage_status(status));
            }
        }
        if let Some(err) = self.put_failures.lock().unwrap().pop_front() {
            return Err(err);
        }
        self.names.lock().unwrap().push(name.to_string());
        Ok(StoredObject {
            id: format!("file-{}", n),
        })
    }

    async fn grant_public_read(&self, object: &StoredObject) -> StorageResult<String> {
        self.grants.fetch_add(1, Ordering::SeqCst);
        Ok(format!("https://drive.test/file/d/{}/view", object.id))
    }

    async fn delete(&self, object_id: &str) -> StorageResult<()> {
        self.deletes.lock().unwrap().push(object_id.to_string());
        Ok(())
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Drive
    }
}

/// Table that records every append attempt and the rows it accepted.
#[derive(Default)]
pub struct CountingTable {
    failures: Mutex<VecDeque<TableError>>,
    pub appends: AtomicU32,
    pub rows: Mutex<Vec<Vec<String>>>,
}

impl CountingTable {
    pub fn with_failures(failures: Vec<TableError>) -> Self {
        Self {
            failures: Mutex::new(failures.into()),
            ..Default::default()
        }
    }

    pub fn append_count(&self) -> u32 {
        self.appends.load(Ordering::SeqCst)
    }

    pub fn rows(&self) -> Vec<Vec<String>> {
        self.rows.lock().unwrap().clone()
    }
}

#[async_trait]
impl Table for CountingTable {
    async fn append(&self, rows: &[Vec<String>]) -> TableResult<()> {
        self.appends.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.failures.lock().unwrap().pop_front() {
            return Err(err);
        }
        self.rows.lock().unwrap().extend_from_slice(rows);
        Ok(())
    }

    async fn read_all(&self) -> TableResult<Vec<Vec<String>>> {
        Ok(self.rows())
    }

    fn backend_type(&self) -> TableBackend {
        TableBackend::Sheets
    }
}

/// Poll until `done` holds; detached cleanup runs after the response.
pub async fn wait_for(mut done: impl FnMut() -> bool) {
    for _ in 0..200 {
        if done() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not reached within 2s");
}
