//! Document store trait

use async_trait::async_trait;

use super::entity::{Document, DocumentId, DocumentUpload};
use crate::domain::error::StoreError;
use crate::domain::notification::StepId;

/// Backend interface for step documents
///
/// The file storage mechanics behind uploads live with the backend; the
/// engine only ever sees document metadata. All methods address documents
/// through the durable ID of their owning step, so no operation here can
/// touch a virtual step.
#[async_trait]
pub trait DocumentStore: Send + Sync + std::fmt::Debug {
    /// Upload a file and bind it to a step
    async fn upload_document(
        &self,
        step_id: &StepId,
        upload: DocumentUpload,
    ) -> Result<Document, StoreError>;

    /// List the documents bound to a step
    async fn list_documents(&self, step_id: &StepId) -> Result<Vec<Document>, StoreError>;

    /// Delete a document from a step
    async fn delete_document(
        &self,
        step_id: &StepId,
        document_id: &DocumentId,
    ) -> Result<(), StoreError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Mock document store for testing
    #[derive(Debug, Default)]
    pub struct MockDocumentStore {
        documents: Mutex<HashMap<String, Vec<Document>>>,
        should_fail: Mutex<Option<String>>,
        delete_error: Mutex<Option<StoreError>>,
        upload_calls: Mutex<usize>,
        delete_calls: Mutex<usize>,
    }

    impl MockDocumentStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_document(self, step_id: &StepId, document: Document) -> Self {
            self.documents
                .lock()
                .unwrap()
                .entry(step_id.as_str().to_string())
                .or_default()
                .push(document);
            self
        }

        pub fn with_error(self, error: impl Into<String>) -> Self {
            *self.should_fail.lock().unwrap() = Some(error.into());
            self
        }

        pub fn with_delete_error(self, error: StoreError) -> Self {
            *self.delete_error.lock().unwrap() = Some(error);
            self
        }

        pub fn upload_count(&self) -> usize {
            *self.upload_calls.lock().unwrap()
        }

        pub fn delete_count(&self) -> usize {
            *self.delete_calls.lock().unwrap()
        }

        fn check_error(&self) -> Result<(), StoreError> {
            if let Some(ref msg) = *self.should_fail.lock().unwrap() {
                return Err(StoreError::backend(msg.clone()));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl DocumentStore for MockDocumentStore {
        async fn upload_document(
            &self,
            step_id: &StepId,
            upload: DocumentUpload,
        ) -> Result<Document, StoreError> {
            *self.upload_calls.lock().unwrap() += 1;
            self.check_error()?;

            let document = Document::new(
                DocumentId::generate(),
                upload.file_name.clone(),
                upload.document_type.clone(),
            )
            .with_size_bytes(upload.size_bytes())
            .with_content_type(upload.resolved_content_type());

            self.documents
                .lock()
                .unwrap()
                .entry(step_id.as_str().to_string())
                .or_default()
                .push(document.clone());

            Ok(document)
        }

        async fn list_documents(&self, step_id: &StepId) -> Result<Vec<Document>, StoreError> {
            self.check_error()?;

            let documents = self.documents.lock().unwrap();
            Ok(documents.get(step_id.as_str()).cloned().unwrap_or_default())
        }

        async fn delete_document(
            &self,
            step_id: &StepId,
            document_id: &DocumentId,
        ) -> Result<(), StoreError> {
            *self.delete_calls.lock().unwrap() += 1;
            self.check_error()?;

            if let Some(error) = self.delete_error.lock().unwrap().clone() {
                return Err(error);
            }

            let mut documents = self.documents.lock().unwrap();
            let list = documents.get_mut(step_id.as_str()).ok_or_else(|| {
                StoreError::not_found(format!("Step '{}' has no documents", step_id))
            })?;

            let pos = list.iter().position(|d| d.id() == document_id).ok_or_else(|| {
                StoreError::not_found(format!("Document '{}' not found", document_id))
            })?;

            list.remove(pos);
            Ok(())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[tokio::test]
        async fn test_mock_upload_and_list() {
            let store = MockDocumentStore::new();
            let step_id = StepId::generate();

            let upload = DocumentUpload::new("plan.pdf", "Site plan", "content");
            let document = store.upload_document(&step_id, upload).await.unwrap();

            assert_eq!(document.file_name(), "plan.pdf");
            assert_eq!(document.content_type(), "application/pdf");
            assert_eq!(store.upload_count(), 1);

            let listed = store.list_documents(&step_id).await.unwrap();
            assert_eq!(listed.len(), 1);
            assert_eq!(listed[0].id(), document.id());
        }

        #[tokio::test]
        async fn test_mock_list_unknown_step_is_empty() {
            let store = MockDocumentStore::new();
            let listed = store.list_documents(&StepId::generate()).await.unwrap();
            assert!(listed.is_empty());
        }

        #[tokio::test]
        async fn test_mock_delete() {
            let step_id = StepId::generate();
            let document = Document::new(DocumentId::generate(), "a.pdf", "Other");
            let doc_id = document.id().clone();
            let store = MockDocumentStore::new().with_document(&step_id, document);

            store.delete_document(&step_id, &doc_id).await.unwrap();

            let result = store.delete_document(&step_id, &doc_id).await;
            assert!(matches!(result, Err(StoreError::NotFound { .. })));
        }

        #[tokio::test]
        async fn test_mock_with_error() {
            let store = MockDocumentStore::new().with_error("Simulated outage");
            let upload = DocumentUpload::new("a.pdf", "Other", "x");

            let result = store.upload_document(&StepId::generate(), upload).await;
            assert!(result.is_err());
            assert!(result.unwrap_err().to_string().contains("Simulated outage"));
        }
    }
}
