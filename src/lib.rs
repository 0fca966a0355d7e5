//! Library Genesis Client
//!
//! This library provides programmatic access to Library Genesis mirrors,
//! which expose no formal API - only server-rendered HTML search pages.
//! It builds search URLs, parses the HTML results table into typed [`Book`]
//! records, derives direct download links from the mirror's path-sharding
//! scheme, and enriches results with cover-image URLs.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`config`] - Mirror hosts, limits, and client policy
//! - [`query`] - The [`Query`] orchestrator and [`LibgenClient`]
//! - [`parse`] - HTML results-table extraction
//! - [`links`] - Download-link derivation and the alternative-mirror resolver
//! - [`cover`] - Batch cover-image enrichment via the JSON metadata endpoint
//!
//! # Example
//!
//! ```no_run
//! use libgen_client::{LibgenClient, Query, SearchField};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = LibgenClient::new()?;
//! let mut query = Query::new(SearchField::Author, "Karl Marx");
//! query.search(&client).await?;
//!
//! for book in query.results() {
//!     println!("{} -> {}", book.title, book.download_link);
//! }
//! # Ok(())
//! # }
//! ```

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod book;
pub mod config;
pub mod cover;
pub mod error;
pub mod field;
mod http;
pub mod links;
pub mod parse;
pub mod query;
mod url;

// Re-export commonly used types
pub use book::Book;
pub use config::MirrorConfig;
pub use error::ClientError;
pub use field::SearchField;
pub use links::{download_link, shard_for_id};
pub use parse::parse_search_page;
pub use query::{LibgenClient, Query};
pub use self::url::search_url;
