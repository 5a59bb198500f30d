//! # faqgen
//!
//! Heuristic FAQ generation from free text and documents.
//!
//! ## Features
//!
//! - **Rule-based generation**: sentence segmentation, keyword ranking and
//!   topic detection feed five question generators (definition, process,
//!   feature, benefit, general); no models, fully deterministic
//! - **Document ingestion**: PDF, PPTX, HTML, plain text and web pages
//! - **Hybrid Storage**: sled for documents, tantivy for full-text search

pub mod analysis;
pub mod config;
pub mod extract;
pub mod faq;
pub mod generator;
pub mod ingest;
pub mod lexicon;
pub mod search;
pub mod service;
pub mod storage;

pub use analysis::Analysis;
pub use config::Config;
pub use faq::Faq;
pub use generator::{generate_faqs, Category};
pub use search::SearchIndex;
pub use service::FaqService;
pub use storage::{Source, Storage, StoredDocument};
