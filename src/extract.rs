//! Content extraction: turn documents and web pages into plain text.
//!
//! PDFs go through pdf-extract, PPTX decks are read slide by slide with zip
//! and quick-xml, and HTML (files or fetched pages) is parsed with scraper.

use lazy_static::lazy_static;
use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use std::io::{Cursor, Read};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// User-Agent string sent when fetching pages
const USER_AGENT: &str = concat!(
    "faqgen/",
    env!("CARGO_PKG_VERSION"),
    " (https://github.com/cladam/faqgen)"
);

/// Default timeout for HTTP requests
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Elements that usually wrap the main content of a page, most specific first
const MAIN_CONTENT_SELECTORS: [&str; 5] = ["article", "main", "[role='main']", ".content", "#content"];

/// Blocks whose text is collected from HTML
const TEXT_BLOCK_SELECTOR: &str = "p, h1, h2, h3, h4, h5, h6, li, td, blockquote";

lazy_static! {
    static ref SLIDE_NAME: Regex = Regex::new(r"^ppt/slides/slide(\d+)\.xml$").unwrap();
}

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("failed to read PDF: {0}")]
    Pdf(String),
    #[error("failed to read PPTX: {0}")]
    Pptx(String),
    #[error("document is not valid UTF-8 text")]
    Encoding,
    #[error("no readable text found in document")]
    NoText,
    #[error("failed to fetch URL: {0}")]
    FetchError(#[from] reqwest::Error),
}

/// Document formats the extractor understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Pptx,
    Html,
    PlainText,
}

impl DocumentKind {
    /// Guess the kind from a file extension, ignoring case
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "pdf" => Some(Self::Pdf),
            "pptx" => Some(Self::Pptx),
            "html" | "htm" => Some(Self::Html),
            "txt" | "text" | "md" | "markdown" => Some(Self::PlainText),
            _ => None,
        }
    }
}

/// Text pulled out of a document, with a title when one was found
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText {
    pub title: Option<String>,
    pub text: String,
}

/// Extract plain text from the raw bytes of a document
pub fn extract_bytes(kind: DocumentKind, bytes: &[u8]) -> Result<ExtractedText, ExtractError> {
    let extracted = match kind {
        DocumentKind::Pdf => ExtractedText {
            title: None,
            text: pdf_extract::extract_text_from_mem(bytes)
                .map_err(|e| ExtractError::Pdf(e.to_string()))?,
        },
        DocumentKind::Pptx => ExtractedText {
            title: None,
            text: extract_pptx(bytes)?,
        },
        DocumentKind::Html => {
            let html = std::str::from_utf8(bytes).map_err(|_| ExtractError::Encoding)?;
            extract_html(html)
        }
        DocumentKind::PlainText => ExtractedText {
            title: None,
            text: std::str::from_utf8(bytes)
                .map_err(|_| ExtractError::Encoding)?
                .to_string(),
        },
    };

    if extracted.text.trim().is_empty() {
        return Err(ExtractError::NoText);
    }
    debug!(?kind, chars = extracted.text.len(), "Extracted document text");
    Ok(extracted)
}

/// Fetch a web page and extract its readable text
pub async fn fetch_url(url: &str) -> Result<ExtractedText, ExtractError> {
    let client = Client::builder()
        .user_agent(USER_AGENT)
        .timeout(REQUEST_TIMEOUT)
        .build()?;

    let html = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;
    info!(url, bytes = html.len(), "Fetched page");

    let extracted = extract_html(&html);
    if extracted.text.trim().is_empty() {
        return Err(ExtractError::NoText);
    }
    Ok(extracted)
}

/// Extract the title and readable text of an HTML document.
///
/// Text comes from the first main-content container that yields any,
/// falling back to the whole document. Each block becomes one paragraph.
pub fn extract_html(html: &str) -> ExtractedText {
    let document = Html::parse_document(html);
    let title = first_text(&document, "title").or_else(|| first_text(&document, "h1"));

    let mut text = String::new();
    for selector_str in MAIN_CONTENT_SELECTORS {
        let Ok(selector) = Selector::parse(selector_str) else {
            continue;
        };
        if let Some(container) = document.select(&selector).next() {
            text = block_text(container);
            if !text.is_empty() {
                break;
            }
        }
    }
    if text.is_empty() {
        text = block_text(document.root_element());
    }

    ExtractedText { title, text }
}

fn first_text(document: &Html, selector_str: &str) -> Option<String> {
    let selector = Selector::parse(selector_str).ok()?;
    let element = document.select(&selector).next()?;
    let text = collapse(element.text());
    (!text.is_empty()).then_some(text)
}

fn block_text(container: ElementRef<'_>) -> String {
    let Ok(selector) = Selector::parse(TEXT_BLOCK_SELECTOR) else {
        return String::new();
    };
    container
        .select(&selector)
        .filter(|block| !inside_block(block, container, &selector))
        .map(|block| collapse(block.text()))
        .filter(|block| !block.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Whether `block` sits inside another text block of `container`, whose
/// text already includes it
fn inside_block(block: &ElementRef<'_>, container: ElementRef<'_>, selector: &Selector) -> bool {
    block
        .ancestors()
        .take_while(|node| node.id() != container.id())
        .filter_map(ElementRef::wrap)
        .any(|ancestor| selector.matches(&ancestor))
}

fn collapse<'a>(pieces: impl Iterator<Item = &'a str>) -> String {
    pieces
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Read the text runs of every slide, in slide order.
///
/// Paragraphs within a slide end up on their own lines, slides are
/// separated by a blank line.
fn extract_pptx(bytes: &[u8]) -> Result<String, ExtractError> {
    let mut archive =
        zip::ZipArchive::new(Cursor::new(bytes)).map_err(|e| ExtractError::Pptx(e.to_string()))?;

    let mut slides: Vec<(u32, String)> = archive
        .file_names()
        .filter_map(|name| {
            let number = SLIDE_NAME.captures(name)?.get(1)?.as_str().parse().ok()?;
            Some((number, name.to_string()))
        })
        .collect();
    slides.sort_by_key(|(number, _)| *number);

    let mut pages = Vec::with_capacity(slides.len());
    for (_, name) in slides {
        let mut xml = String::new();
        archive
            .by_name(&name)
            .map_err(|e| ExtractError::Pptx(e.to_string()))?
            .read_to_string(&mut xml)
            .map_err(|e| ExtractError::Pptx(e.to_string()))?;
        let page = slide_text(&xml)?;
        if !page.is_empty() {
            pages.push(page);
        }
    }

    Ok(pages.join("\n\n"))
}

/// Collect `<a:t>` runs of a slide, one line per `<a:p>` paragraph
fn slide_text(xml: &str) -> Result<String, ExtractError> {
    let mut reader = Reader::from_str(xml);
    let mut lines: Vec<String> = Vec::new();
    let mut line = String::new();
    let mut in_run = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.name().as_ref() == b"a:t" => in_run = true,
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"a:t" => in_run = false,
                b"a:p" => {
                    let finished = std::mem::take(&mut line);
                    if !finished.trim().is_empty() {
                        lines.push(finished.trim().to_string());
                    }
                }
                _ => {}
            },
            Ok(Event::Text(e)) if in_run => {
                let decoded = e.decode().map_err(|e| ExtractError::Pptx(e.to_string()))?;
                line.push_str(&decoded);
            }
            Ok(Event::GeneralRef(e)) if in_run => {
                if let Ok(Some(c)) = e.resolve_char_ref() {
                    line.push(c);
                } else {
                    let name = e.decode().map_err(|e| ExtractError::Pptx(e.to_string()))?;
                    line.push_str(match name.as_ref() {
                        "amp" => "&",
                        "lt" => "<",
                        "gt" => ">",
                        "quot" => "\"",
                        "apos" => "'",
                        _ => "",
                    });
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ExtractError::Pptx(e.to_string())),
            _ => {}
        }
    }
    if !line.trim().is_empty() {
        lines.push(line.trim().to_string());
    }

    Ok(lines.join("\n"))
}
