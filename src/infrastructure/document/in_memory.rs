//! In-memory document store

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;

use crate::domain::document::{Document, DocumentId, DocumentStore, DocumentUpload};
use crate::domain::error::StoreError;
use crate::domain::notification::StepId;

/// A document together with its file contents
#[derive(Debug, Clone)]
struct StoredDocument {
    document: Document,
    body: Bytes,
}

/// In-memory implementation of [`DocumentStore`]
///
/// Reference backend for tests and development. Keeps file contents in
/// memory alongside the metadata; everything is lost when the process
/// terminates.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    documents: RwLock<HashMap<String, Vec<StoredDocument>>>,
}

impl InMemoryDocumentStore {
    /// Creates a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// The stored file contents, if the document exists
    pub fn body(&self, step_id: &StepId, document_id: &DocumentId) -> Option<Bytes> {
        let documents = self.documents.read().ok()?;
        documents
            .get(step_id.as_str())?
            .iter()
            .find(|stored| stored.document.id() == document_id)
            .map(|stored| stored.body.clone())
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn upload_document(
        &self,
        step_id: &StepId,
        upload: DocumentUpload,
    ) -> Result<Document, StoreError> {
        if upload.file_name.is_empty() {
            return Err(StoreError::validation("File name cannot be empty"));
        }

        let document = Document::new(
            DocumentId::generate(),
            upload.file_name.clone(),
            upload.document_type.clone(),
        )
        .with_size_bytes(upload.size_bytes())
        .with_content_type(upload.resolved_content_type())
        .with_uploaded_at(Utc::now());

        let mut documents = self
            .documents
            .write()
            .map_err(|_| StoreError::backend("Failed to acquire lock"))?;

        documents
            .entry(step_id.as_str().to_string())
            .or_default()
            .push(StoredDocument {
                document: document.clone(),
                body: upload.body,
            });

        Ok(document)
    }

    async fn list_documents(&self, step_id: &StepId) -> Result<Vec<Document>, StoreError> {
        let documents = self
            .documents
            .read()
            .map_err(|_| StoreError::backend("Failed to acquire lock"))?;

        Ok(documents
            .get(step_id.as_str())
            .map(|stored| stored.iter().map(|s| s.document.clone()).collect())
            .unwrap_or_default())
    }

    async fn delete_document(
        &self,
        step_id: &StepId,
        document_id: &DocumentId,
    ) -> Result<(), StoreError> {
        let mut documents = self
            .documents
            .write()
            .map_err(|_| StoreError::backend("Failed to acquire lock"))?;

        let list = documents.get_mut(step_id.as_str()).ok_or_else(|| {
            StoreError::not_found(format!("Step '{}' has no documents", step_id))
        })?;

        let pos = list
            .iter()
            .position(|stored| stored.document.id() == document_id)
            .ok_or_else(|| {
                StoreError::not_found(format!("Document '{}' not found", document_id))
            })?;

        list.remove(pos);
        Ok(())
    }
}
