//! Sled-based storage for documents and their FAQ sets.

use crate::faq::Faq;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("database error: {0}")]
    DbError(#[from] sled::Error),
    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
    #[error("document not found: {0}")]
    NotFound(String),
}

/// Where a document's text came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Source {
    /// Pasted, piped or typed text
    Text,
    /// A local file, identified by its file name
    File { name: String },
    /// A fetched web page
    Url { url: String },
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Text => write!(f, "text"),
            Source::File { name } => write!(f, "file: {name}"),
            Source::Url { url } => write!(f, "url: {url}"),
        }
    }
}

/// A stored document with its generated FAQs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredDocument {
    /// Opaque identifier assigned by the store
    pub id: String,
    pub title: String,
    pub source: Source,
    /// The text FAQs were generated from
    pub text: String,
    pub faqs: Vec<Faq>,
    pub created_at: DateTime<Utc>,
    /// Last time the FAQ set was replaced
    pub updated_at: DateTime<Utc>,
}

/// Sled-based document store.
///
/// Documents are keyed by an id derived from sled's monotonic id generator.
pub struct Storage {
    db: sled::Db,
}

impl Storage {
    /// Open or create storage at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let db = sled::open(path)?;
        Ok(Self { db })
    }

    /// Store a new document and return it with its assigned id
    pub fn create(
        &self,
        title: &str,
        source: Source,
        text: &str,
        faqs: Vec<Faq>,
    ) -> Result<StoredDocument, StorageError> {
        let id = format!("{:016x}", self.db.generate_id()?);
        let now = Utc::now();
        let document = StoredDocument {
            id,
            title: title.to_string(),
            source,
            text: text.to_string(),
            faqs,
            created_at: now,
            updated_at: now,
        };
        self.put(&document)?;
        debug!(id = %document.id, faqs = document.faqs.len(), "Stored document");
        Ok(document)
    }

    /// Retrieve a document by id
    pub fn get(&self, id: &str) -> Result<StoredDocument, StorageError> {
        match self.db.get(id.as_bytes())? {
            Some(data) => Ok(serde_json::from_slice(&data)?),
            None => Err(StorageError::NotFound(id.to_string())),
        }
    }

    /// List all stored documents, newest first
    pub fn list_all(&self) -> Result<Vec<StoredDocument>, StorageError> {
        let mut results = Vec::new();
        for item in self.db.iter() {
            let (_key, value) = item?;
            let document: StoredDocument = serde_json::from_slice(&value)?;
            results.push(document);
        }
        // Ids grow monotonically, so they break ties between equal timestamps
        results.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(results)
    }

    /// Replace the FAQ set of an existing document
    pub fn replace_faqs(&self, id: &str, faqs: Vec<Faq>) -> Result<StoredDocument, StorageError> {
        let mut document = self.get(id)?;
        document.faqs = faqs;
        document.updated_at = Utc::now();
        self.put(&document)?;
        Ok(document)
    }

    /// Delete a document by id
    pub fn delete(&self, id: &str) -> Result<(), StorageError> {
        if self.db.remove(id.as_bytes())?.is_none() {
            return Err(StorageError::NotFound(id.to_string()));
        }
        self.db.flush()?;
        Ok(())
    }

    /// Get the number of stored documents
    pub fn count(&self) -> usize {
        self.db.len()
    }

    fn put(&self, document: &StoredDocument) -> Result<(), StorageError> {
        let value = serde_json::to_vec(document)?;
        self.db.insert(document.id.as_bytes(), value)?;
        self.db.flush()?;
        Ok(())
    }
}
