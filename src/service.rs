//! Document service: validation, generation, storage and search in one place.
//!
//! The store is the source of truth. Search index failures are logged and
//! never fail an operation.

use crate::config::{Config, IngestConfig};
use crate::extract::ExtractedText;
use crate::generator::generate_faqs;
use crate::ingest::{validate_text, IngestError};
use crate::search::{SearchError, SearchIndex};
use crate::storage::{Source, Storage, StorageError, StoredDocument};
use thiserror::Error;
use tracing::{info, warn};

/// Longest title derived from document text
const MAX_DERIVED_TITLE_CHARS: usize = 60;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    Ingest(#[from] IngestError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Search(#[from] SearchError),
}

pub struct FaqService {
    storage: Storage,
    search: Option<SearchIndex>,
    ingest: IngestConfig,
}

impl FaqService {
    /// Open the store and search index configured in `config`
    pub fn open(config: &Config) -> Result<Self, ServiceError> {
        let storage = Storage::open(config.storage.documents_path())?;
        let search = match SearchIndex::open(config.storage.search_index_path()) {
            Ok(index) => Some(index),
            Err(e) => {
                warn!(error = %e, "Search index unavailable, falling back to scans");
                None
            }
        };
        Ok(Self {
            storage,
            search,
            ingest: config.ingest.clone(),
        })
    }

    /// Validate extracted text, generate its FAQs and store the document
    pub fn create(
        &self,
        title: Option<&str>,
        source: Source,
        content: ExtractedText,
    ) -> Result<StoredDocument, ServiceError> {
        let text = validate_text(&content.text, &self.ingest)?;
        let faqs = generate_faqs(text);
        let title = title
            .map(str::to_string)
            .or(content.title)
            .unwrap_or_else(|| derive_title(text));

        let document = self.storage.create(&title, source, text, faqs)?;
        info!(id = %document.id, faqs = document.faqs.len(), "Created document");
        self.reindex(&document);
        Ok(document)
    }

    /// List stored documents, newest first
    pub fn list(&self) -> Result<Vec<StoredDocument>, ServiceError> {
        Ok(self.storage.list_all()?)
    }

    pub fn get(&self, id: &str) -> Result<StoredDocument, ServiceError> {
        Ok(self.storage.get(id)?)
    }

    /// Re-run generation on a stored document and replace its FAQ set
    pub fn regenerate(&self, id: &str) -> Result<StoredDocument, ServiceError> {
        let current = self.storage.get(id)?;
        let faqs = generate_faqs(&current.text);
        let document = self.storage.replace_faqs(id, faqs)?;
        info!(id, faqs = document.faqs.len(), "Regenerated FAQs");
        self.reindex(&document);
        Ok(document)
    }

    pub fn delete(&self, id: &str) -> Result<(), ServiceError> {
        self.storage.delete(id)?;
        if let Some(index) = &self.search {
            if let Err(e) = index.remove_document(id) {
                warn!(id, error = %e, "Failed to remove document from search index");
            }
        }
        info!(id, "Deleted document");
        Ok(())
    }

    /// Find documents matching `query`.
    ///
    /// Uses the full-text index when it returns hits, otherwise scans the
    /// store for a case-insensitive substring match.
    pub fn search(&self, query: &str, limit: usize) -> Result<Vec<StoredDocument>, ServiceError> {
        if let Some(index) = &self.search {
            match index.search(query, limit) {
                Ok(ids) if !ids.is_empty() => {
                    let mut documents = Vec::with_capacity(ids.len());
                    for id in ids {
                        match self.storage.get(&id) {
                            Ok(document) => documents.push(document),
                            // Stale index entry
                            Err(StorageError::NotFound(_)) => {}
                            Err(e) => return Err(e.into()),
                        }
                    }
                    return Ok(documents);
                }
                Ok(_) => {}
                Err(e) => warn!(error = %e, "Search index query failed, scanning store"),
            }
        }
        self.scan(query, limit)
    }

    fn scan(&self, query: &str, limit: usize) -> Result<Vec<StoredDocument>, ServiceError> {
        let needle = query.to_lowercase();
        Ok(self
            .storage
            .list_all()?
            .into_iter()
            .filter(|document| {
                document.title.to_lowercase().contains(&needle)
                    || document.text.to_lowercase().contains(&needle)
                    || document.faqs.iter().any(|faq| {
                        faq.question.to_lowercase().contains(&needle)
                            || faq.answer.to_lowercase().contains(&needle)
                    })
            })
            .take(limit)
            .collect())
    }

    fn reindex(&self, document: &StoredDocument) {
        if let Some(index) = &self.search {
            if let Err(e) = index.index_document(document) {
                warn!(id = %document.id, error = %e, "Failed to index document");
            }
        }
    }
}

/// Title from the first line of text, shortened on a word boundary
pub fn derive_title(text: &str) -> String {
    let first_line = text.lines().map(str::trim).find(|l| !l.is_empty()).unwrap_or("");
    if first_line.is_empty() {
        return "Untitled document".to_string();
    }
    if first_line.chars().count() <= MAX_DERIVED_TITLE_CHARS {
        return first_line.to_string();
    }

    let mut title = String::new();
    for word in first_line.split_whitespace() {
        if title.chars().count() + word.chars().count() + 1 > MAX_DERIVED_TITLE_CHARS {
            break;
        }
        if !title.is_empty() {
            title.push(' ');
        }
        title.push_str(word);
    }
    if title.is_empty() {
        title = first_line.chars().take(MAX_DERIVED_TITLE_CHARS).collect();
    }
    title.push('…');
    title
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_title_uses_first_line() {
        assert_eq!(derive_title("\n  Release notes \nbody"), "Release notes");
        assert_eq!(derive_title("   "), "Untitled document");
    }

    #[test]
    fn derive_title_shortens_on_word_boundary() {
        let text = "This first line is far too long to be used as a title without being shortened";
        let title = derive_title(text);
        assert!(title.ends_with('…'));
        assert!(title.chars().count() <= MAX_DERIVED_TITLE_CHARS + 1);
        assert!(text.starts_with(title.trim_end_matches('…')));
    }
}
