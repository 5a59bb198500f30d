// Composition tests for FaqService.
//
// Wires the real store, search index and generator together in a temporary
// data directory and drives them the way the CLI does.

use faqgen::extract::ExtractedText;
use faqgen::ingest::IngestError;
use faqgen::service::ServiceError;
use faqgen::storage::StorageError;
use faqgen::{generate_faqs, Config, FaqService, Source};
use tempfile::TempDir;

const GREENHOUSE: &str = "Greenhouse Monitor tracks humidity and temperature in real time. \
    Greenhouse Monitor offers alerts by text message and email. \
    It helps growers reduce crop losses during heat waves. \
    Greenhouse Monitor requires a sensor hub and a wireless network.";

fn open_service() -> (TempDir, FaqService) {
    let dir = tempfile::tempdir().unwrap();
    let mut config = Config::default();
    config.storage.path = dir.path().to_path_buf();
    let service = FaqService::open(&config).unwrap();
    (dir, service)
}

fn text(body: &str) -> ExtractedText {
    ExtractedText {
        title: None,
        text: body.to_string(),
    }
}

#[test]
fn create_generates_and_stores_faqs() {
    let (_dir, service) = open_service();
    let document = service.create(None, Source::Text, text(GREENHOUSE)).unwrap();

    assert_eq!(document.faqs, generate_faqs(GREENHOUSE));
    assert!(document
        .faqs
        .iter()
        .any(|f| f.question == "What are the requirements for Greenhouse Monitor?"));
    assert_eq!(service.get(&document.id).unwrap().faqs, document.faqs);
}

#[test]
fn titles_prefer_explicit_then_extracted_then_derived() {
    let (_dir, service) = open_service();

    let explicit = service
        .create(Some("Monitoring"), Source::Text, text(GREENHOUSE))
        .unwrap();
    assert_eq!(explicit.title, "Monitoring");

    let extracted = service
        .create(
            None,
            Source::Url {
                url: "https://example.com/monitor".to_string(),
            },
            ExtractedText {
                title: Some("Monitor product page".to_string()),
                text: GREENHOUSE.to_string(),
            },
        )
        .unwrap();
    assert_eq!(extracted.title, "Monitor product page");

    let derived = service
        .create(None, Source::Text, text("Short first line\nfollowed by plenty more text to pass validation."))
        .unwrap();
    assert_eq!(derived.title, "Short first line");
}

#[test]
fn short_text_is_rejected_and_not_stored() {
    let (_dir, service) = open_service();
    let err = service
        .create(None, Source::Text, text("Far too short to analyze."))
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Ingest(IngestError::TextTooShort { min: 50, .. })
    ));
    assert!(service.list().unwrap().is_empty());
}

#[test]
fn regenerate_replaces_faq_set() {
    let (_dir, service) = open_service();
    let document = service.create(None, Source::Text, text(GREENHOUSE)).unwrap();

    let regenerated = service.regenerate(&document.id).unwrap();
    assert_eq!(regenerated.id, document.id);
    assert_eq!(regenerated.faqs, generate_faqs(GREENHOUSE));
    assert_eq!(regenerated.created_at, document.created_at);
}

#[test]
fn search_finds_documents_by_faq_content() {
    let (_dir, service) = open_service();
    let document = service.create(None, Source::Text, text(GREENHOUSE)).unwrap();
    service
        .create(
            None,
            Source::Text,
            text("Bread baking needs patience, flour, water and a hot oven to succeed."),
        )
        .unwrap();

    let hits = service.search("humidity", 10).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, document.id);
}

#[test]
fn delete_removes_from_store_and_search() {
    let (_dir, service) = open_service();
    let document = service.create(None, Source::Text, text(GREENHOUSE)).unwrap();

    service.delete(&document.id).unwrap();
    assert!(matches!(
        service.get(&document.id),
        Err(ServiceError::Storage(StorageError::NotFound(_)))
    ));
    assert!(service.search("humidity", 10).unwrap().is_empty());
}

#[test]
fn unknown_ids_are_reported() {
    let (_dir, service) = open_service();
    assert!(matches!(
        service.regenerate("0000000000000000"),
        Err(ServiceError::Storage(StorageError::NotFound(_)))
    ));
    assert!(matches!(
        service.delete("0000000000000000"),
        Err(ServiceError::Storage(StorageError::NotFound(_)))
    ));
}
