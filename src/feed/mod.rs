//! Parsing of arXiv Atom feeds.
//!
//! - [`extract_article_record`]: one `<entry>` DOM node to an [`ArticleRecord`]
//! - [`parse_feed`]: a whole API response, with OpenSearch paging totals
//! - [`read_feed`]: the same, reading the response from a file or stdin
//!
//! Both look elements up by namespace through the fixed [`ATOM_NAMESPACES`]
//! table, never by prefix, so documents that bind other prefixes still parse.

mod entry;
mod xml;

pub use entry::{dedup_categories, extract_article_record, normalize_text, split_article_id};
pub use xml::{
    attributes, child_text, find_child, find_children, get_text, is_named, Namespaces, QName,
    ARXIV_NS, ATOM_NAMESPACES, ATOM_NS, OPENSEARCH_NS,
};

use roxmltree::Document;
use serde::{Deserialize, Serialize};
use std::io::Read;

use crate::error::ArxivError;
use crate::models::ArticleRecord;

/// Prefix of the `atom:id` arXiv uses for error entries
const ARXIV_ERROR_ID_PREFIX: &str = "http://arxiv.org/api/errors";

/// One page of arXiv API results
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArxivFeed {
    /// Total number of matches for the query
    pub total_results: Option<u64>,

    /// Offset of the first entry on this page
    pub start_index: Option<u64>,

    /// Requested page size
    pub items_per_page: Option<u64>,

    /// Records in document order
    pub entries: Vec<ArticleRecord>,

    /// Entries dropped because they were malformed
    pub skipped: usize,
}

impl ArxivFeed {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parse a complete arXiv API response.
///
/// Malformed entries are logged and skipped; the error entry arXiv returns
/// for a bad query becomes [`ArxivError::Api`].
pub fn parse_feed(xml: &str) -> Result<ArxivFeed, ArxivError> {
    let doc = Document::parse(xml)?;
    let root = doc.root_element();

    if !is_named(root, QName::atom("feed")) {
        return Err(ArxivError::Parse(format!(
            "expected atom:feed root element, found <{}>",
            root.tag_name().name()
        )));
    }

    let mut feed = ArxivFeed {
        total_results: opensearch_count(root, "totalResults"),
        start_index: opensearch_count(root, "startIndex"),
        items_per_page: opensearch_count(root, "itemsPerPage"),
        ..Default::default()
    };

    for entry in find_children(root, QName::atom("entry")) {
        let entry_id = child_text(entry, QName::atom("id")).unwrap_or_default();

        if entry_id.trim().starts_with(ARXIV_ERROR_ID_PREFIX) {
            let message = child_text(entry, QName::atom("summary"))
                .map(|s| normalize_text(&s))
                .unwrap_or(entry_id);
            return Err(ArxivError::Api(message.trim().to_string()));
        }

        match extract_article_record(entry) {
            Ok(record) => feed.entries.push(record),
            Err(e) if e.is_malformed_entry() => {
                tracing::warn!("Skipping arXiv entry '{}': {}", entry_id.trim(), e);
                feed.skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    tracing::debug!(
        "Parsed arXiv feed: {} entries, {} skipped, {:?} total results",
        feed.entries.len(),
        feed.skipped,
        feed.total_results
    );

    Ok(feed)
}

/// Read a whole arXiv API response from `reader` and parse it.
///
/// Read failures (including invalid UTF-8) surface as [`ArxivError::Io`].
pub fn read_feed<R: Read>(reader: R) -> Result<ArxivFeed, ArxivError> {
    let xml = std::io::read_to_string(reader)?;
    parse_feed(&xml)
}

fn opensearch_count(root: roxmltree::Node<'_, '_>, local: &'static str) -> Option<u64> {
    child_text(root, QName::opensearch(local)).and_then(|text| text.trim().parse().ok())
}
