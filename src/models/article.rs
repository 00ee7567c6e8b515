//! Article record extracted from one arXiv Atom entry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Attribute name to value mapping of an XML element
pub type Attributes = BTreeMap<String, String>;

/// Link role used for the `rel="alternate"` link
pub const ABSTRACT_LINK_ROLE: &str = "abstract";

/// An author of an arXiv article
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorDetail {
    pub name: String,

    /// Declared affiliations, `None` when the entry declares none
    pub affiliation: Option<Vec<String>>,
}

/// A subject classification, kept as the raw attributes of the category element
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Category(pub Attributes);

impl Category {
    /// Category code, e.g. `cs.CL`
    pub fn term(&self) -> Option<&str> {
        self.0.get("term").map(String::as_str)
    }

    pub fn scheme(&self) -> Option<&str> {
        self.0.get("scheme").map(String::as_str)
    }

    pub fn attributes(&self) -> &Attributes {
        &self.0
    }
}

impl From<Attributes> for Category {
    fn from(attributes: Attributes) -> Self {
        Self(attributes)
    }
}

/// One arXiv article version, flattened from an Atom `<entry>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRecord {
    /// Full abstract URI, e.g. `http://arxiv.org/abs/1234.5678v2`
    pub full_article_id: String,

    /// Identifier without version, e.g. `1234.5678`
    pub article_id: String,

    /// Version token, e.g. `v2`
    pub article_version: String,

    /// Last update time, verbatim from the feed (ISO-8601)
    pub updated: String,

    /// First publication time, verbatim from the feed (ISO-8601)
    pub published: String,

    pub title: String,

    pub summary: String,

    pub authors: Vec<AuthorDetail>,

    /// Link role (`abstract`, `pdf`, `doi`, ...) to link attributes
    pub links: BTreeMap<String, Attributes>,

    /// Distinct categories, primary category first
    pub categories: Vec<Category>,
}

impl ArticleRecord {
    /// The primary category, always the first entry
    pub fn primary_category(&self) -> Option<&Category> {
        self.categories.first()
    }

    pub fn author_names(&self) -> Vec<&str> {
        self.authors.iter().map(|a| a.name.as_str()).collect()
    }

    /// `href` of the link registered under `role`
    pub fn link_href(&self, role: &str) -> Option<&str> {
        self.links
            .get(role)
            .and_then(|attrs| attrs.get("href"))
            .map(String::as_str)
    }

    pub fn abstract_url(&self) -> Option<&str> {
        self.link_href(ABSTRACT_LINK_ROLE)
    }

    pub fn pdf_url(&self) -> Option<&str> {
        self.link_href("pdf")
    }

    /// `published` parsed as RFC 3339, if it is well formed
    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.published)
    }

    /// `updated` parsed as RFC 3339, if it is well formed
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.updated)
    }
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}
