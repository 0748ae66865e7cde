use regdesk_core::constants::{truncate_message, PDF_MEDIA_TYPE};
use regdesk_core::validation::validate_registration;
use regdesk_core::{
    AppError, FilePayload, RegistrationFields, RegistrationResponse, RegistrationRow, StoredFile,
    StorageBackend, TableBackend,
};
use regdesk_services::{generate_storage_name, ObjectStoreClient, TableClient};
use tokio::task::{JoinError, JoinHandle};
use tokio::time::Instant;
use tokio_util::task::TaskTracker;

use super::types::{Submission, SubmissionSettings, SubmissionStage};

type UploadOutcome = Result<StoredFile, AppError>;

/// Runs the registration pipeline against an object store and a table.
#[derive(Clone)]
pub struct SubmissionService {
    objects: ObjectStoreClient,
    table: TableClient,
    settings: SubmissionSettings,
    tasks: TaskTracker,
}

fn log_stage(request_id: &str, stage: SubmissionStage) {
    tracing::debug!(request_id = %request_id, stage = %stage, "Submission stage");
}

impl SubmissionService {
    pub fn new(
        objects: ObjectStoreClient,
        table: TableClient,
        settings: SubmissionSettings,
    ) -> Self {
        let tasks = objects.task_tracker().clone();
        Self {
            objects,
            table,
            settings,
            tasks,
        }
    }

    /// Every task the pipeline detaches, including cleanup deletes.
    pub fn tasks(&self) -> &TaskTracker {
        &self.tasks
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.objects.backend_type()
    }

    pub fn table_backend(&self) -> TableBackend {
        self.table.backend_type()
    }

    /// Process one submission to completion.
    ///
    /// The pipeline runs on its own task: if the caller is dropped (client
    /// disconnect), uploads and the append still finish.
    pub async fn submit(
        &self,
        submission: Submission,
        request_id: &str,
    ) -> Result<RegistrationResponse, AppError> {
        let service = self.clone();
        let request_id = request_id.to_string();
        self.tasks
            .spawn(async move { service.run(submission, &request_id).await })
            .await
            .map_err(|e| AppError::Internal(format!("Submission task failed: {}", e)))?
    }

    async fn run(
        &self,
        submission: Submission,
        request_id: &str,
    ) -> Result<RegistrationResponse, AppError> {
        let started = Instant::now();
        let deadline = started + self.settings.deadline;
        log_stage(request_id, SubmissionStage::Received);

        log_stage(request_id, SubmissionStage::Validating);
        let request = match validate_registration(
            &submission.fields,
            submission.cv,
            submission.transcript,
            self.settings.max_file_size_bytes,
        ) {
            Ok(request) => request,
            Err(e) => {
                log_stage(request_id, SubmissionStage::Rejected);
                return Err(e.into());
            }
        };
        log_stage(request_id, SubmissionStage::FilesValidated);

        log_stage(request_id, SubmissionStage::Uploading);
        let (cv, transcript) = match self
            .upload_both(&request.fields, request.cv, request.transcript, deadline, request_id)
            .await
        {
            Ok(stored) => stored,
            Err(e) => {
                log_stage(request_id, SubmissionStage::Failed);
                return Err(e);
            }
        };
        log_stage(request_id, SubmissionStage::BothUploaded);

        // Last point at which giving up is safe: once the append starts it
        // runs to completion.
        if Instant::now() >= deadline {
            self.discard(&cv, request_id);
            self.discard(&transcript, request_id);
            log_stage(request_id, SubmissionStage::Failed);
            return Err(AppError::Timeout(format!(
                "Submission exceeded {}s before the table append",
                self.settings.deadline.as_secs()
            )));
        }

        log_stage(request_id, SubmissionStage::Appending);
        let row = RegistrationRow::new(&request.fields, &cv, &transcript);
        if let Err(e) = self.table.append_registration(row).await {
            tracing::error!(
                request_id = %request_id,
                student_id = %request.fields.student_id(),
                error = %e,
                "Registration append failed"
            );
            self.discard(&cv, request_id);
            self.discard(&transcript, request_id);
            log_stage(request_id, SubmissionStage::Failed);
            return Err(AppError::AppendFailed(truncate_message(&e.to_string())));
        }

        log_stage(request_id, SubmissionStage::Completed);
        tracing::info!(
            request_id = %request_id,
            student_id = %request.fields.student_id(),
            duration_ms = started.elapsed().as_secs_f64() * 1000.0,
            "Registration completed"
        );
        Ok(RegistrationResponse::success(&cv, &transcript))
    }

    /// Upload both documents as independent tasks and wait for both.
    ///
    /// When both fail, the cv error is reported.
    async fn upload_both(
        &self,
        fields: &RegistrationFields,
        cv: FilePayload,
        transcript: FilePayload,
        deadline: Instant,
        request_id: &str,
    ) -> Result<(StoredFile, StoredFile), AppError> {
        let cv_task = self.spawn_upload(fields, cv);
        let transcript_task = self.spawn_upload(fields, transcript);
        let mut uploads = self
            .tasks
            .spawn(async move { (cv_task.await, transcript_task.await) });

        let (cv, transcript) = match tokio::time::timeout_at(deadline, &mut uploads).await {
            Ok(Ok((cv, transcript))) => (flatten(cv), flatten(transcript)),
            Ok(Err(e)) => return Err(AppError::Internal(format!("Upload join failed: {}", e))),
            Err(_) => {
                tracing::warn!(
                    request_id = %request_id,
                    "Submission deadline passed during upload"
                );
                if self.settings.cleanup_orphans {
                    let objects = self.objects.clone();
                    self.tasks.spawn(async move {
                        if let Ok((cv, transcript)) = uploads.await {
                            for stored in [flatten(cv), flatten(transcript)].into_iter().flatten() {
                                objects.spawn_delete(stored.object_id);
                            }
                        }
                    });
                }
                return Err(AppError::Timeout(format!(
                    "Uploads did not finish within {}s",
                    self.settings.deadline.as_secs()
                )));
            }
        };

        match (cv, transcript) {
            (Ok(cv), Ok(transcript)) => Ok((cv, transcript)),
            (Ok(stored), Err(e)) | (Err(e), Ok(stored)) => {
                self.discard(&stored, request_id);
                Err(e)
            }
            (Err(cv_error), Err(_)) => Err(cv_error),
        }
    }

    fn spawn_upload(
        &self,
        fields: &RegistrationFields,
        file: FilePayload,
    ) -> JoinHandle<UploadOutcome> {
        let objects = self.objects.clone();
        let name = generate_storage_name(fields, &file);
        self.tasks.spawn(async move {
            let role = file.role;
            let start = std::time::Instant::now();
            let stored = objects
                .upload(&name, PDF_MEDIA_TYPE, file.data)
                .await
                .map_err(|e| {
                    AppError::UploadFailed(format!(
                        "{} upload failed: {}",
                        role,
                        truncate_message(&e.to_string())
                    ))
                })?;
            tracing::debug!(
                storage_name = %name,
                role = %role,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Document uploaded"
            );
            Ok(stored)
        })
    }

    fn discard(&self, stored: &StoredFile, request_id: &str) {
        if !self.settings.cleanup_orphans {
            tracing::warn!(
                request_id = %request_id,
                object_id = %stored.object_id,
                "Leaving orphaned object in place"
            );
            return;
        }
        self.objects.spawn_delete(stored.object_id.clone());
    }
}

fn flatten(joined: Result<UploadOutcome, JoinError>) -> UploadOutcome {
    joined.map_err(|e| AppError::UploadFailed(format!("Upload task failed: {}", e)))?
}
