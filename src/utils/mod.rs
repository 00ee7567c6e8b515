//! Utility modules supporting arXiv requests.
//!
//! - [`HttpClient`]: shared reqwest client with a user agent and timeouts
//!
//! ```rust,no_run
//! use arxiv_feed::utils::HttpClient;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpClient::new()?;
//! let body = client.get("https://arxiv.org/category_taxonomy")
//!     .send()
//!     .await?
//!     .text()
//!     .await?;
//! # Ok(())
//! # }
//! ```

mod http;

pub use http::{HttpClient, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT};
