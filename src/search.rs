//! Tantivy-based full-text search over stored documents and their FAQs.

use crate::storage::StoredDocument;
use std::path::Path;
use tantivy::collector::TopDocs;
use tantivy::query::QueryParser;
use tantivy::schema::{Field, Schema, Value, STORED, STRING, TEXT};
use tantivy::{doc, Index, IndexWriter, ReloadPolicy, TantivyDocument, Term};
use thiserror::Error;

/// Memory budget for a single index writer
const WRITER_HEAP_BYTES: usize = 50_000_000;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("index error: {0}")]
    IndexError(#[from] tantivy::TantivyError),
    #[error("query parse error: {0}")]
    QueryError(#[from] tantivy::query::QueryParserError),
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
}

struct Fields {
    id: Field,
    title: Field,
    questions: Field,
    answers: Field,
    body: Field,
}

/// Tantivy-based search index for stored documents.
pub struct SearchIndex {
    index: Index,
    fields: Fields,
}

impl SearchIndex {
    /// Open or create a search index at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, SearchError> {
        let mut schema_builder = Schema::builder();
        let id = schema_builder.add_text_field("id", STRING | STORED);
        let title = schema_builder.add_text_field("title", TEXT | STORED);
        let questions = schema_builder.add_text_field("questions", TEXT);
        let answers = schema_builder.add_text_field("answers", TEXT);
        let body = schema_builder.add_text_field("body", TEXT);
        let schema: Schema = schema_builder.build();

        let index_path = path.as_ref();
        std::fs::create_dir_all(index_path)?;

        let index = Index::create_in_dir(index_path, schema)
            .or_else(|_| Index::open_in_dir(index_path))?;

        Ok(Self {
            index,
            fields: Fields {
                id,
                title,
                questions,
                answers,
                body,
            },
        })
    }

    /// Index a document, replacing any earlier entry with the same id
    pub fn index_document(&self, document: &StoredDocument) -> Result<(), SearchError> {
        let mut index_writer: IndexWriter =
            self.index.writer_with_num_threads(1, WRITER_HEAP_BYTES)?;
        index_writer.delete_term(Term::from_field_text(self.fields.id, &document.id));

        let questions: Vec<&str> = document.faqs.iter().map(|f| f.question.as_str()).collect();
        let answers: Vec<&str> = document.faqs.iter().map(|f| f.answer.as_str()).collect();
        index_writer.add_document(doc!(
            self.fields.id => document.id.as_str(),
            self.fields.title => document.title.as_str(),
            self.fields.questions => questions.join(" "),
            self.fields.answers => answers.join(" "),
            self.fields.body => document.text.as_str(),
        ))?;

        index_writer.commit()?;
        Ok(())
    }

    /// Remove a document from the index
    pub fn remove_document(&self, id: &str) -> Result<(), SearchError> {
        let mut index_writer: IndexWriter =
            self.index.writer_with_num_threads(1, WRITER_HEAP_BYTES)?;
        index_writer.delete_term(Term::from_field_text(self.fields.id, id));
        index_writer.commit()?;
        Ok(())
    }

    /// Search for documents matching the query, returning their ids
    pub fn search(&self, query_str: &str, limit: usize) -> Result<Vec<String>, SearchError> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        let reader = self
            .index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()?;
        let searcher = reader.searcher();

        let query_parser = QueryParser::for_index(
            &self.index,
            vec![
                self.fields.title,
                self.fields.questions,
                self.fields.answers,
                self.fields.body,
            ],
        );
        let query = query_parser.parse_query(query_str)?;

        let top_docs = searcher.search(&query, &TopDocs::with_limit(limit))?;

        let mut results = Vec::new();
        for (_score, doc_address) in top_docs {
            let retrieved: TantivyDocument = searcher.doc(doc_address)?;
            if let Some(id) = retrieved.get_first(self.fields.id).and_then(|v| v.as_str()) {
                results.push(id.to_string());
            }
        }

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::faq::Faq;
    use crate::storage::Source;
    use chrono::Utc;

    fn document(id: &str, text: &str) -> StoredDocument {
        StoredDocument {
            id: id.to_string(),
            title: "Printer setup".to_string(),
            source: Source::Text,
            text: text.to_string(),
            faqs: vec![Faq::new("What is Duplexing?", "Duplexing prints both sides.")],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn reindexing_replaces_the_previous_entry() {
        let dir = tempfile::tempdir().unwrap();
        let index = SearchIndex::open(dir.path()).unwrap();
        index.index_document(&document("00000000000000aa", "toner cartridges")).unwrap();
        index.index_document(&document("00000000000000aa", "toner and paper trays")).unwrap();

        assert_eq!(index.search("toner", 10).unwrap(), vec!["00000000000000aa"]);
        assert_eq!(index.search("trays", 10).unwrap(), vec!["00000000000000aa"]);
        assert!(index.search("cartridges", 10).unwrap().is_empty());
    }

    #[test]
    fn questions_are_searchable() {
        let dir = tempfile::tempdir().unwrap();
        let index = SearchIndex::open(dir.path()).unwrap();
        index.index_document(&document("00000000000000bb", "nothing relevant")).unwrap();
        assert_eq!(index.search("duplexing", 10).unwrap(), vec!["00000000000000bb"]);
        assert!(index.search("duplexing", 0).unwrap().is_empty());
    }

    #[test]
    fn removed_documents_are_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let index = SearchIndex::open(dir.path()).unwrap();
        index.index_document(&document("00000000000000cc", "staples")).unwrap();
        index.remove_document("00000000000000cc").unwrap();
        assert!(index.search("staples", 10).unwrap().is_empty());
    }
}
