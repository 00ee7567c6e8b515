//! Core data models for arXiv queries, article records and taxonomy rows.

mod article;
mod query;
mod taxonomy;

pub use article::{ArticleRecord, Attributes, AuthorDetail, Category, ABSTRACT_LINK_ROLE};
pub use query::{
    PreparedRequest, QueryBuilder, QueryParameters, SortBy, SortOrder, ARXIV_API_URL,
    MAX_MAX_RESULTS,
};
pub use taxonomy::TaxonomyRow;
