//! seo-audit core library.
//!
//! This crate exposes programmatic APIs for auditing a file-routed web project
//! for SEO defects, from page sources and optionally from a running server.
//!
//! High-level modules:
//! - `cli`: CLI argument parsing (binary uses this).
//! - `config`: Discovery and effective configuration resolution.
//! - `routes`: Page route discovery from the app directory.
//! - `sources`: Source file enumeration.
//! - `text`: Visible-text extraction and word counting.
//! - `checks`: Static analyzers (metadata, structure, content, schema, links, graph, global files, keywords).
//! - `live`: HTTP crawler for a running server.
//! - `audit`: Orchestrates the phases into an `AuditOutcome`.
//! - `report`: Health score and Markdown report.
//! - `models`: Issues, routes, and crawl data.
//! - `output`: Human/JSON printers.
//! - `utils`: Supporting helpers.
pub mod audit;
pub mod checks;
pub mod cli;
pub mod config;
pub mod error;
pub mod live;
pub mod models;
pub mod output;
pub mod report;
pub mod routes;
pub mod sources;
pub mod text;
pub mod utils;
