//! # resume-dock CLI (`rdock`)
//!
//! The `rdock` binary drives the dual-store resume pipeline. It provides
//! commands for database initialization, document ingestion, metadata
//! search, and starting the HTTP server.
//!
//! ## Usage
//!
//! ```bash
//! rdock --config ./config/rdock.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `rdock init` | Create both databases and their schemas |
//! | `rdock ingest <file>` | Extract, embed, and store one resume |
//! | `rdock search` | Query stored resumes by name/type/occupation |
//! | `rdock serve http` | Start the HTTP server |
//!
//! ## Examples
//!
//! ```bash
//! # Initialize the databases
//! rdock init --config ./config/rdock.toml
//!
//! # Ingest a resume with descriptive fields
//! rdock ingest r1.txt --name "Jane Doe" --resume-type Engineering \
//!     --occupation "Software Engineer"
//!
//! # Strict search by name (other filters would be ignored)
//! rdock search --name "Jane"
//!
//! # Flexible search without a name
//! rdock search --resume-type Engineering --occupation Software
//!
//! # Start the HTTP API
//! rdock serve http
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use resume_dock::config;
use resume_dock::models::{ResumeFields, SearchFilter};
use resume_dock::server;
use resume_dock::service::ResumeService;

/// resume-dock CLI — a dual-store resume ingestion and retrieval service.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. See `config/rdock.example.toml` for a full example.
#[derive(Parser)]
#[command(
    name = "rdock",
    about = "resume-dock — a dual-store resume ingestion and retrieval service",
    version,
    long_about = "resume-dock ingests resume documents (PDF, DOCX, plain text), extracts \
    their text, computes a semantic embedding, and stores each document in a vector index \
    plus a relational metadata store linked by a correlation identifier. Retrieval runs \
    structured name-priority searches against the metadata store."
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/rdock.toml`. Database paths, embedding
    /// provider, and server settings are read from this file.
    #[arg(long, global = true, default_value = "./config/rdock.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Initialize both database schemas.
    ///
    /// Creates the metadata and vector database files and their tables.
    /// This command is idempotent — running it multiple times is safe.
    Init,

    /// Ingest one resume document.
    ///
    /// Extracts text from the file, computes its embedding, writes the
    /// vector record, then the metadata record, and prints the stored
    /// result. A failure at any stage aborts the whole operation.
    Ingest {
        /// Path to the document (`.pdf`, `.docx`, `.txt`, `.md`).
        file: PathBuf,

        /// Candidate name to attach to the record.
        #[arg(long)]
        name: Option<String>,

        /// Free-text resume category (e.g. `Engineering`).
        #[arg(long)]
        resume_type: Option<String>,

        /// Free-text occupation (e.g. `Software Engineer`).
        #[arg(long)]
        occupation: Option<String>,
    },

    /// Search stored resumes.
    ///
    /// A non-empty `--name` runs a strict name-only search; the other
    /// filters are ignored in that case. Without a name, the present
    /// filters are AND-combined. All matching is case-insensitive
    /// substring.
    Search {
        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        resume_type: Option<String>,

        #[arg(long)]
        occupation: Option<String>,
    },

    /// Start the HTTP server.
    Serve {
        #[command(subcommand)]
        service: ServeService,
    },
}

/// Server subcommands.
#[derive(Subcommand)]
enum ServeService {
    /// Serve the JSON HTTP API on `[server].bind`.
    Http,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Init => {
            let service = ResumeService::init(&cfg).await?;
            service.close().await;
            println!("Databases initialized successfully.");
        }
        Commands::Ingest {
            file,
            name,
            resume_type,
            occupation,
        } => {
            let bytes = std::fs::read(&file)
                .with_context(|| format!("Failed to read file: {}", file.display()))?;
            let filename = file
                .file_name()
                .and_then(|n| n.to_str())
                .map(str::to_string)
                .with_context(|| format!("Invalid file name: {}", file.display()))?;

            let fields = ResumeFields {
                name,
                resume_type,
                occupation,
            };

            let service = ResumeService::init(&cfg).await?;
            let record = service.ingest(&filename, &bytes, &fields).await?;

            println!("ingest {}", record.filename);
            println!("  record id: {}", record.id);
            println!("  vector id: {}", record.vector_id);
            if let Some(ref name) = record.name {
                println!("  name: {}", name);
            }
            println!(
                "  snippet: \"{}\"",
                record.snippet.replace('\n', " ").trim()
            );
            println!("ok");

            service.close().await;
        }
        Commands::Search {
            name,
            resume_type,
            occupation,
        } => {
            let filter = SearchFilter {
                name,
                resume_type,
                occupation,
            };

            let service = ResumeService::init(&cfg).await?;
            let results = service.search(&filter).await?;

            if results.is_empty() {
                println!("No results.");
            } else {
                for (i, record) in results.iter().enumerate() {
                    let name = record.name.as_deref().unwrap_or("(unnamed)");
                    println!("{}. {} / {}", i + 1, name, record.filename);
                    if let Some(ref resume_type) = record.resume_type {
                        println!("    type: {}", resume_type);
                    }
                    if let Some(ref occupation) = record.occupation {
                        println!("    occupation: {}", occupation);
                    }
                    println!("    ingested: {}", record.created_at.format("%Y-%m-%d"));
                    println!(
                        "    snippet: \"{}\"",
                        record.snippet.replace('\n', " ").trim()
                    );
                    println!("    id: {} (vector {})", record.id, record.vector_id);
                    println!();
                }
            }

            service.close().await;
        }
        Commands::Serve { service } => match service {
            ServeService::Http => {
                server::run_server(&cfg).await?;
            }
        },
    }

    Ok(())
}
