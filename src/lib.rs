//! # arxiv-feed
//!
//! Builds arXiv API requests, extracts article records from the Atom feed the
//! API returns, and scrapes the arXiv category taxonomy page.
//!
//! ## Architecture
//!
//! - [`models`]: Query parameters, prepared requests, article records, taxonomy rows
//! - [`feed`]: Atom entry extraction and whole-feed parsing
//! - [`taxonomy`]: Category taxonomy HTML scraper
//! - [`client`]: Async client that sends one request per call
//! - [`utils`]: Shared HTTP client
//! - [`config`]: Configuration management
//!
//! ```rust
//! use arxiv_feed::feed::parse_feed;
//! use arxiv_feed::models::QueryBuilder;
//!
//! let request = QueryBuilder::search("cat:cs.CL")
//!     .max_results(5)
//!     .sort_by("submittedDate")
//!     .build_request()?;
//! assert_eq!(request.url().host_str(), Some("export.arxiv.org"));
//!
//! let feed = parse_feed(r#"<feed xmlns="http://www.w3.org/2005/Atom"/>"#)?;
//! assert!(feed.is_empty());
//! # Ok::<(), arxiv_feed::ArxivError>(())
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod feed;
pub mod models;
pub mod taxonomy;
pub mod utils;

// Re-export commonly used types
pub use client::ArxivClient;
pub use error::ArxivError;
pub use feed::{extract_article_record, parse_feed, read_feed, ArxivFeed};
pub use models::{ArticleRecord, QueryBuilder};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
