//! Retrying front end over an [`ObjectStore`].

use std::sync::Arc;

use bytes::Bytes;
use regdesk_core::StoredFile;
use regdesk_infra::{retry_with_policy, RetryPolicy};
use tokio_util::task::TaskTracker;

use crate::traits::{ObjectStore, StorageResult};
use crate::StorageBackend;

#[derive(Clone)]
pub struct ObjectStoreClient {
    store: Arc<dyn ObjectStore>,
    policy: RetryPolicy,
    cleanup_orphans: bool,
    tasks: TaskTracker,
}

impl ObjectStoreClient {
    pub fn new(store: Arc<dyn ObjectStore>, policy: RetryPolicy) -> Self {
        Self {
            store,
            policy,
            cleanup_orphans: true,
            tasks: TaskTracker::new(),
        }
    }

    /// Run detached deletes on `tasks`, so shutdown can wait for them.
    pub fn with_task_tracker(mut self, tasks: TaskTracker) -> Self {
        self.tasks = tasks;
        self
    }

    pub fn task_tracker(&self) -> &TaskTracker {
        &self.tasks
    }

    /// Whether an object stored without a public link is deleted again.
    pub fn with_orphan_cleanup(mut self, enabled: bool) -> Self {
        self.cleanup_orphans = enabled;
        self
    }

    pub fn backend_type(&self) -> StorageBackend {
        self.store.backend_type()
    }

    /// Store `data` and make it publicly readable.
    ///
    /// Storing and publishing are retried separately, so a failed grant never
    /// uploads the bytes a second time.
    pub async fn upload(
        &self,
        name: &str,
        content_type: &str,
        data: Bytes,
    ) -> StorageResult<StoredFile> {
        let object = retry_with_policy(&self.policy, "object_store.put", || {
            self.store.put(name, content_type, data.clone())
        })
        .await?;

        let url = match retry_with_policy(&self.policy, "object_store.grant_public_read", || {
            self.store.grant_public_read(&object)
        })
        .await
        {
            Ok(url) => url,
            Err(e) => {
                tracing::error!(
                    storage_name = %name,
                    object_id = %object.id,
                    error = %e,
                    "Failed to publish stored object"
                );
                if self.cleanup_orphans {
                    self.spawn_delete(object.id.clone());
                }
                return Err(e);
            }
        };

        Ok(StoredFile {
            object_id: object.id,
            url,
        })
    }

    /// Best-effort delete, detached from the caller but tracked.
    pub fn spawn_delete(&self, object_id: String) {
        let store = self.store.clone();
        self.tasks.spawn(async move {
            match store.delete(&object_id).await {
                Ok(()) => tracing::info!(object_id = %object_id, "Deleted orphaned object"),
                Err(e) => tracing::warn!(
                    object_id = %object_id,
                    error = %e,
                    "Failed to delete orphaned object"
                ),
            }
        });
    }
}
