//! # resume-dock
//!
//! A dual-store resume ingestion and retrieval service.
//!
//! Uploaded resume documents are text-extracted, embedded, and persisted
//! twice: the full text and its embedding go to a vector index, while a
//! relational metadata row (with a display snippet) goes to a separate
//! store for structured filtering and audit. A correlation identifier
//! minted per ingestion binds the two records together.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌───────────────┐   ┌─────────────┐
//! │  Upload  │──▶│   Pipeline     │──▶│ Vector index │
//! │ PDF/DOCX │   │ Extract+Embed │   │  (SQLite)    │
//! └──────────┘   └──────┬────────┘   └─────────────┘
//!                       │ same correlation id
//!                       ▼
//!                ┌─────────────┐       ┌──────────┐
//!                │  Metadata   │◀──────│  Search   │
//!                │  (SQLite)   │       │  policy   │
//!                └─────────────┘       └──────────┘
//! ```
//!
//! The vector write always precedes the metadata write; retrieval is
//! metadata-only (strict by name, or flexible AND-filtering) and never
//! consults the vector index.
//!
//! ## Quick Start
//!
//! ```bash
//! rdock init                                    # create databases
//! rdock ingest r1.txt --name "Jane Doe"         # ingest a resume
//! rdock search --name Jane                      # strict name search
//! rdock search --resume-type Engineering        # flexible filtering
//! rdock serve http                              # start HTTP server
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`extract`] | Document text extraction |
//! | [`embedding`] | Embedding provider abstraction |
//! | [`index`] | Vector index adapter |
//! | [`store`] | Metadata store adapter |
//! | [`ingest`] | Ingestion pipeline orchestration |
//! | [`search`] | Name-priority search policy |
//! | [`service`] | Process-wide service lifecycle |
//! | [`server`] | HTTP service layer |
//! | [`db`] | Database connection |

pub mod config;
pub mod db;
pub mod embedding;
pub mod extract;
pub mod index;
pub mod ingest;
pub mod models;
pub mod search;
pub mod server;
pub mod service;
pub mod store;
