//! Document attachment service
//!
//! Binds documents to workflow steps through the document store. Only
//! materialized steps can own documents: attaching to a virtual step first
//! runs the same create-with-status sequence as a status change, seeded
//! with the placeholder's pending draft. Reads never materialize anything.

use std::sync::Arc;

use futures::future::try_join_all;
use tracing::{info, instrument, warn};

use super::steps::StepService;
use crate::domain::document::{Document, DocumentId, DocumentStore, DocumentUpload};
use crate::domain::notification::{Notification, StepId};
use crate::domain::workflow::{StepKind, WorkflowError};

/// Document service configuration
#[derive(Debug, Clone)]
pub struct DocumentServiceConfig {
    /// Largest accepted upload in bytes
    pub max_upload_bytes: u64,
}

impl Default for DocumentServiceConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: 25 * 1024 * 1024, // 25 MiB
        }
    }
}

/// Service attaching, refreshing, and removing step documents
#[derive(Debug, Clone)]
pub struct DocumentService {
    steps: StepService,
    store: Arc<dyn DocumentStore>,
    config: DocumentServiceConfig,
}

impl DocumentService {
    /// Create a new document service with the default configuration
    pub fn new(steps: StepService, store: Arc<dyn DocumentStore>) -> Self {
        Self::with_config(steps, store, DocumentServiceConfig::default())
    }

    /// Create with custom configuration
    pub fn with_config(
        steps: StepService,
        store: Arc<dyn DocumentStore>,
        config: DocumentServiceConfig,
    ) -> Self {
        Self {
            steps,
            store,
            config,
        }
    }

    /// Upload a file and attach it to a step
    ///
    /// A virtual step is materialized first; if that fails the upload is
    /// never attempted and the step stays virtual. If the upload itself
    /// fails the step keeps its durable identity but its document list is
    /// unchanged. The document type label should be one of the step's
    /// declared types, but an undeclared label is only warned about.
    #[instrument(
        skip(self, notification, upload),
        fields(notification = %notification.id(), step = %kind, file = %upload.file_name)
    )]
    pub async fn attach(
        &self,
        notification: &mut Notification,
        kind: StepKind,
        upload: DocumentUpload,
    ) -> Result<Document, WorkflowError> {
        if upload.file_name.is_empty() {
            return Err(WorkflowError::document_upload_failed(
                kind,
                "File name cannot be empty",
            ));
        }

        if upload.size_bytes() > self.config.max_upload_bytes {
            return Err(WorkflowError::document_upload_failed(
                kind,
                format!(
                    "File of {} bytes exceeds the {} byte upload limit",
                    upload.size_bytes(),
                    self.config.max_upload_bytes
                ),
            ));
        }

        let declared = notification
            .definition()
            .document_types(kind)
            .ok_or_else(|| WorkflowError::unknown_step_kind(kind, notification.workflow_kind()))?;
        if !declared.contains(&upload.document_type.as_str()) {
            warn!(
                document_type = %upload.document_type,
                "Attaching a document with an undeclared type label"
            );
        }

        let step_id = self.steps.materialize(notification, kind).await?;

        let document = self
            .store
            .upload_document(&step_id, upload)
            .await
            .map_err(|e| WorkflowError::document_upload_failed(kind, e.to_string()))?;

        if let Some(step) = notification
            .step_mut(kind)
            .and_then(|s| s.as_materialized_mut())
        {
            step.push_document(document.clone());
        }

        info!(document_id = %document.id(), "Attached document");
        Ok(document)
    }

    /// Re-fetch a step's document list from the store
    ///
    /// Virtual steps have no backend record to read and are left untouched.
    #[instrument(
        skip(self, notification),
        fields(notification = %notification.id(), step = %kind)
    )]
    pub async fn refresh(
        &self,
        notification: &mut Notification,
        kind: StepKind,
    ) -> Result<(), WorkflowError> {
        let record = notification
            .step(kind)
            .ok_or_else(|| WorkflowError::unknown_step_kind(kind, notification.workflow_kind()))?;

        let Some(step_id) = record.id().cloned() else {
            return Ok(());
        };

        let documents = self
            .store
            .list_documents(&step_id)
            .await
            .map_err(|e| WorkflowError::document_list_failed(kind, e.to_string()))?;

        if let Some(step) = notification
            .step_mut(kind)
            .and_then(|s| s.as_materialized_mut())
        {
            step.replace_documents(documents);
        }

        Ok(())
    }

    /// Re-fetch the document lists of every materialized step
    #[instrument(skip(self, notification), fields(notification = %notification.id()))]
    pub async fn refresh_all(&self, notification: &mut Notification) -> Result<(), WorkflowError> {
        let targets: Vec<(StepKind, StepId)> = notification
            .steps()
            .iter()
            .filter_map(|record| record.id().cloned().map(|id| (record.kind(), id)))
            .collect();

        let fetches = targets.iter().map(|(kind, step_id)| {
            let kind = *kind;
            async move {
                self.store
                    .list_documents(step_id)
                    .await
                    .map(|documents| (kind, documents))
                    .map_err(|e| WorkflowError::document_list_failed(kind, e.to_string()))
            }
        });

        for (kind, documents) in try_join_all(fetches).await? {
            if let Some(step) = notification
                .step_mut(kind)
                .and_then(|s| s.as_materialized_mut())
            {
                step.replace_documents(documents);
            }
        }

        Ok(())
    }

    /// Remove a document from a step
    ///
    /// Removing a document the step does not have, or any document from a
    /// virtual step, reports [`WorkflowError::DocumentNotFound`]; the end
    /// state the caller asked for already holds, so flows treat it as
    /// satisfied rather than fatal.
    #[instrument(
        skip(self, notification),
        fields(notification = %notification.id(), step = %kind, document = %document_id)
    )]
    pub async fn remove(
        &self,
        notification: &mut Notification,
        kind: StepKind,
        document_id: &DocumentId,
    ) -> Result<(), WorkflowError> {
        let record = notification
            .step(kind)
            .ok_or_else(|| WorkflowError::unknown_step_kind(kind, notification.workflow_kind()))?;

        let Some(step) = record.as_materialized() else {
            return Err(WorkflowError::document_not_found(kind, document_id.as_str()));
        };

        if !step.has_document(document_id) {
            return Err(WorkflowError::document_not_found(kind, document_id.as_str()));
        }
        let step_id = step.id().clone();

        match self.store.delete_document(&step_id, document_id).await {
            Ok(()) => {}
            Err(err) if err.is_not_found() => {
                // The backend already forgot it; drop the local entry too
                warn!(error = %err, "Document missing in the store during removal");
            }
            Err(err) => {
                return Err(WorkflowError::document_removal_failed(kind, err.to_string()));
            }
        }

        if let Some(step) = notification
            .step_mut(kind)
            .and_then(|s| s.as_materialized_mut())
        {
            step.remove_document(document_id);
        }

        info!("Removed document");
        Ok(())
    }
}
