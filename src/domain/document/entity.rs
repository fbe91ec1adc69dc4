//! Document domain entities

use std::fmt;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::error::StoreError;

/// Regex pattern for valid document IDs: backend-assigned, opaque
static ID_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_-]*$").unwrap());

/// Maximum length for document IDs
const MAX_ID_LENGTH: usize = 64;

/// Validated document identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DocumentId(String);

impl DocumentId {
    /// Create a new validated document ID
    pub fn new(id: impl Into<String>) -> Result<Self, StoreError> {
        let id = id.into();
        validate_document_id(&id)?;
        Ok(Self(id))
    }

    /// Generate a new document ID with UUID
    pub fn generate() -> Self {
        let uuid = Uuid::new_v4();
        Self(format!("doc-{}", uuid))
    }

    /// Get the ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for DocumentId {
    type Error = StoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DocumentId> for String {
    fn from(id: DocumentId) -> Self {
        id.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for DocumentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Validate a document ID string
pub fn validate_document_id(id: &str) -> Result<(), StoreError> {
    if id.is_empty() {
        return Err(StoreError::validation("Document ID cannot be empty"));
    }

    if id.len() > MAX_ID_LENGTH {
        return Err(StoreError::validation(format!(
            "Document ID exceeds maximum length of {} characters",
            MAX_ID_LENGTH
        )));
    }

    if !ID_PATTERN.is_match(id) {
        return Err(StoreError::validation(format!(
            "Invalid document ID '{}': must be alphanumeric with hyphens or underscores",
            id
        )));
    }

    Ok(())
}

/// A document attached to a workflow step
///
/// Owned by exactly one step. The file body lives with the storage backend;
/// this entity carries the metadata the admin pages render.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Backend-assigned durable identifier
    id: DocumentId,

    /// Original file name
    file_name: String,

    /// Document type label chosen at upload
    document_type: String,

    /// File size in bytes
    size_bytes: u64,

    /// MIME content type
    content_type: String,

    /// When the document was uploaded
    uploaded_at: DateTime<Utc>,
}

impl Document {
    /// Create a new document
    pub fn new(
        id: DocumentId,
        file_name: impl Into<String>,
        document_type: impl Into<String>,
    ) -> Self {
        Self {
            id,
            file_name: file_name.into(),
            document_type: document_type.into(),
            size_bytes: 0,
            content_type: "application/octet-stream".to_string(),
            uploaded_at: Utc::now(),
        }
    }

    // Builder methods

    pub fn with_size_bytes(mut self, size_bytes: u64) -> Self {
        self.size_bytes = size_bytes;
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    pub fn with_uploaded_at(mut self, uploaded_at: DateTime<Utc>) -> Self {
        self.uploaded_at = uploaded_at;
        self
    }

    // Getters

    pub fn id(&self) -> &DocumentId {
        &self.id
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn document_type(&self) -> &str {
        &self.document_type
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn uploaded_at(&self) -> DateTime<Utc> {
        self.uploaded_at
    }
}

/// Payload for attaching a document to a step
#[derive(Debug, Clone)]
pub struct DocumentUpload {
    /// Original file name
    pub file_name: String,

    /// Document type label, usually one of the step's declared types
    pub document_type: String,

    /// Explicit MIME type; guessed from the file name when absent
    pub content_type: Option<String>,

    /// File contents
    pub body: Bytes,
}

impl DocumentUpload {
    /// Create a new upload payload
    pub fn new(
        file_name: impl Into<String>,
        document_type: impl Into<String>,
        body: impl Into<Bytes>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            document_type: document_type.into(),
            content_type: None,
            body: body.into(),
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Size of the file contents in bytes
    pub fn size_bytes(&self) -> u64 {
        self.body.len() as u64
    }

    /// The MIME type to store: explicit if given, otherwise guessed from
    /// the file name
    pub fn resolved_content_type(&self) -> String {
        match &self.content_type {
            Some(explicit) => explicit.clone(),
            None => mime_guess::from_path(&self.file_name)
                .first_or_octet_stream()
                .essence_str()
                .to_string(),
        }
    }
}
