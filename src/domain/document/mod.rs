//! Document domain module
//!
//! Metadata for files attached to workflow steps, the upload payload, and
//! the store trait the file storage backend implements.

mod entity;
pub mod store;

pub use entity::{validate_document_id, Document, DocumentId, DocumentUpload};
pub use store::DocumentStore;
