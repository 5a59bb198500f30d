//! faqgen CLI - FAQ generation from text and documents
//!
//! The application logic is contained in lib.rs, and this file is responsible
//! for parsing arguments, resolving input and printing results.

use anyhow::{bail, Context};
use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;
use faqgen::extract::{self, ExtractedText};
use faqgen::ingest::{self, validate_text};
use faqgen::{generate_faqs, Analysis, Config, Faq, FaqService, Source, StoredDocument};
use std::io::{self, Read};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Most search hits printed
const SEARCH_LIMIT: usize = 20;

#[derive(Parser)]
#[command(name = "faqgen")]
#[command(author, version, about = "Generate FAQs from text and documents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Where the text comes from. Without any of these, piped stdin is read.
#[derive(Args)]
struct InputArgs {
    /// Text to process
    text: Option<String>,
    /// Read a document (pdf, pptx, html, txt, md)
    #[arg(long, short, conflicts_with_all = ["text", "url", "edit"])]
    file: Option<PathBuf>,
    /// Fetch a web page
    #[arg(long, conflicts_with_all = ["text", "edit"])]
    url: Option<String>,
    /// Compose the text in $EDITOR
    #[arg(long, conflicts_with = "text")]
    edit: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate FAQs for a text or document
    Generate {
        #[command(flatten)]
        input: InputArgs,
        /// Title for the stored document
        #[arg(long)]
        title: Option<String>,
        /// Store the document and its FAQs
        #[arg(long)]
        save: bool,
        /// Print JSON instead of formatted text
        #[arg(long)]
        json: bool,
    },
    /// Show the sentences, keywords and topics found in a text
    Analyze {
        #[command(flatten)]
        input: InputArgs,
        /// Print JSON instead of formatted text
        #[arg(long)]
        json: bool,
    },
    /// List stored documents, newest first
    List,
    /// Show a stored document and its FAQs
    Show {
        id: String,
        #[arg(long)]
        json: bool,
    },
    /// Regenerate the FAQs of a stored document
    Regenerate { id: String },
    /// Delete a stored document
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
    /// Search stored documents and FAQs
    Search { query: String },
    /// Print shell completions
    Completions { shell: Shell },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter)),
        )
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Commands::Generate {
            input,
            title,
            save,
            json,
        } => {
            let (source, content) = resolve_input(&input, &config).await?;
            if save {
                let service = FaqService::open(&config)?;
                let document = service.create(title.as_deref(), source, content)?;
                if json {
                    println!("{}", serde_json::to_string_pretty(&document)?);
                } else {
                    print_document(&document);
                }
            } else {
                let text = validate_text(&content.text, &config.ingest)?;
                let faqs = generate_faqs(text);
                if json {
                    println!("{}", serde_json::to_string_pretty(&faqs)?);
                } else if faqs.is_empty() {
                    println!("No FAQs could be generated from this text.");
                } else {
                    print_faqs(&faqs);
                }
            }
        }
        Commands::Analyze { input, json } => {
            let (_, content) = resolve_input(&input, &config).await?;
            let analysis = Analysis::of(&content.text);
            if json {
                println!("{}", serde_json::to_string_pretty(&analysis)?);
            } else {
                print_analysis(&analysis);
            }
        }
        Commands::List => {
            let service = FaqService::open(&config)?;
            let documents = service.list()?;
            if documents.is_empty() {
                println!("No stored documents found.");
            } else {
                println!("Stored documents ({}):\n", documents.len());
                for document in &documents {
                    print_listing(document);
                }
            }
        }
        Commands::Show { id, json } => {
            let service = FaqService::open(&config)?;
            let document = service.get(&id)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&document)?);
            } else {
                print_document(&document);
            }
        }
        Commands::Regenerate { id } => {
            let service = FaqService::open(&config)?;
            let document = service.regenerate(&id)?;
            print_document(&document);
        }
        Commands::Delete { id, yes } => {
            let service = FaqService::open(&config)?;
            let document = service.get(&id)?;
            let confirmed = yes
                || dialoguer::Confirm::new()
                    .with_prompt(format!("Delete \"{}\"?", document.title))
                    .default(false)
                    .interact()?;
            if confirmed {
                service.delete(&id)?;
                println!("Deleted {}", id);
            } else {
                println!("Nothing deleted.");
            }
        }
        Commands::Search { query } => {
            let service = FaqService::open(&config)?;
            let results = service.search(&query, SEARCH_LIMIT)?;
            if results.is_empty() {
                println!("No results found for: {}", query);
            } else {
                println!("Search results for '{}':\n", query);
                for document in &results {
                    print_listing(document);
                }
            }
        }
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "faqgen", &mut io::stdout());
        }
    }

    Ok(())
}

/// Turn the input flags into text, reading files, pages, the editor or stdin
async fn resolve_input(
    input: &InputArgs,
    config: &Config,
) -> anyhow::Result<(Source, ExtractedText)> {
    if let Some(path) = &input.file {
        let content = ingest::read_file(path, &config.ingest)
            .with_context(|| format!("could not use {}", path.display()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        return Ok((Source::File { name }, content));
    }

    if let Some(url) = &input.url {
        let content = extract::fetch_url(url).await?;
        return Ok((Source::Url { url: url.clone() }, content));
    }

    let text = if input.edit {
        edit::edit("")?
    } else if let Some(text) = &input.text {
        text.clone()
    } else if !atty::is(atty::Stream::Stdin) {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        bail!("no input: pass TEXT, --file, --url or --edit, or pipe text on stdin");
    };
    debug!(chars = text.len(), "Read input text");

    Ok((Source::Text, ExtractedText { title: None, text }))
}

fn print_faqs(faqs: &[Faq]) {
    for (i, faq) in faqs.iter().enumerate() {
        println!("{} {}", format!("Q{}.", i + 1).cyan().bold(), faq.question.bold());
        println!("    {}\n", faq.answer);
    }
}

fn print_document(document: &StoredDocument) {
    println!("=== {} ===", document.title.bold());
    println!(
        "{}",
        format!(
            "id: {} · {} · updated {}\n",
            document.id,
            document.source,
            document.updated_at.format("%Y-%m-%d %H:%M")
        )
        .dimmed()
    );
    if document.faqs.is_empty() {
        println!("No FAQs could be generated from this text.");
    } else {
        print_faqs(&document.faqs);
    }
}

fn print_listing(document: &StoredDocument) {
    println!(
        "📄 {} ({})",
        document.title.bold(),
        document.created_at.format("%Y-%m-%d %H:%M")
    );
    println!("   id: {} · {}", document.id, document.source);
    println!("   {} FAQs\n", document.faqs.len());
}

fn print_analysis(analysis: &Analysis) {
    println!("{} {}", "Sentences:".bold(), analysis.sentences.len());

    println!("\n{}", "Keywords:".bold());
    for keyword in &analysis.keywords {
        println!("  • {} ({})", keyword.word, keyword.count);
    }

    println!("\n{}", "Topics:".bold());
    if analysis.topics.is_empty() {
        println!("  (none)");
    }
    for topic in &analysis.topics {
        println!("  • {}", topic);
    }
}
