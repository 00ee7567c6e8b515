//! Extraction of one Atom `<entry>` into an [`ArticleRecord`].

use roxmltree::Node;
use std::collections::BTreeMap;

use super::xml::{attributes, child_text, find_child, find_children, get_text, QName};
use crate::error::ArxivError;
use crate::models::{ArticleRecord, Attributes, AuthorDetail, Category, ABSTRACT_LINK_ROLE};

const ATOM_ID: QName = QName::atom("id");
const ATOM_UPDATED: QName = QName::atom("updated");
const ATOM_PUBLISHED: QName = QName::atom("published");
const ATOM_TITLE: QName = QName::atom("title");
const ATOM_SUMMARY: QName = QName::atom("summary");
const ATOM_AUTHOR: QName = QName::atom("author");
const ATOM_NAME: QName = QName::atom("name");
const ATOM_LINK: QName = QName::atom("link");
const ATOM_CATEGORY: QName = QName::atom("category");
const ARXIV_AFFILIATION: QName = QName::arxiv("affiliation");
const ARXIV_PRIMARY_CATEGORY: QName = QName::arxiv("primary_category");

/// Build an [`ArticleRecord`] from one parsed Atom `entry` element.
///
/// Fails with [`ArxivError::MalformedEntry`] when the entry lacks a field the
/// record needs: `atom:id` with a version marker, the dates, title, summary,
/// an author name, a `title` on a non-alternate link, or
/// `arxiv:primary_category`.
pub fn extract_article_record(entry: Node<'_, '_>) -> Result<ArticleRecord, ArxivError> {
    let full_article_id = required_text(entry, ATOM_ID)?;
    let (article_id, article_version) = split_article_id(&full_article_id)?;

    Ok(ArticleRecord {
        article_id,
        article_version,
        updated: required_text(entry, ATOM_UPDATED)?,
        published: required_text(entry, ATOM_PUBLISHED)?,
        title: normalize_text(&required_text(entry, ATOM_TITLE)?),
        summary: normalize_text(&required_text(entry, ATOM_SUMMARY)?),
        authors: extract_authors(entry)?,
        links: extract_links(entry)?,
        categories: extract_categories(entry)?,
        full_article_id,
    })
}

/// Split `http://arxiv.org/abs/1234.5678v2` into `("1234.5678", "v2")`.
///
/// Only the last path segment is considered. The version marker is the last
/// `v` in it and must be followed by digits.
pub fn split_article_id(full_article_id: &str) -> Result<(String, String), ArxivError> {
    let segment = full_article_id
        .trim()
        .rsplit('/')
        .next()
        .unwrap_or_default();

    let v_index = segment.rfind('v').ok_or_else(|| {
        ArxivError::MalformedEntry(format!(
            "article id '{}' has no version marker",
            full_article_id
        ))
    })?;

    let (id, version) = segment.split_at(v_index);
    let digits = &version[1..];
    if id.is_empty() || digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ArxivError::MalformedEntry(format!(
            "article id '{}' does not end in a version like 'v2'",
            full_article_id
        )));
    }

    Ok((id.to_string(), version.to_string()))
}

/// Collapse line-wrapped feed text onto one line.
///
/// Each line is trimmed and the lines are joined with single spaces.
pub fn normalize_text(raw: &str) -> String {
    raw.split('\n').map(str::trim).collect::<Vec<_>>().join(" ")
}

fn required_text(entry: Node<'_, '_>, name: QName) -> Result<String, ArxivError> {
    child_text(entry, name)
        .ok_or_else(|| ArxivError::MalformedEntry(format!("entry has no {} element", name)))
}

fn extract_authors(entry: Node<'_, '_>) -> Result<Vec<AuthorDetail>, ArxivError> {
    find_children(entry, ATOM_AUTHOR)
        .map(|author| -> Result<AuthorDetail, ArxivError> {
            let name = find_child(author, ATOM_NAME).map(get_text).ok_or_else(|| {
                ArxivError::MalformedEntry(format!("author has no {} element", ATOM_NAME))
            })?;

            let affiliations: Vec<String> = find_children(author, ARXIV_AFFILIATION)
                .map(get_text)
                .collect();

            Ok(AuthorDetail {
                name,
                affiliation: (!affiliations.is_empty()).then_some(affiliations),
            })
        })
        .collect()
}

fn extract_links(entry: Node<'_, '_>) -> Result<BTreeMap<String, Attributes>, ArxivError> {
    let mut links = BTreeMap::new();

    for link in find_children(entry, ATOM_LINK) {
        let role = if link.attribute("rel") == Some("alternate") {
            ABSTRACT_LINK_ROLE.to_string()
        } else {
            link.attribute("title").map(str::to_string).ok_or_else(|| {
                ArxivError::MalformedEntry(format!(
                    "non-alternate link {} has no title attribute",
                    link.attribute("href").unwrap_or("<no href>")
                ))
            })?
        };

        // later links with the same role replace earlier ones
        links.insert(role, attributes(link));
    }

    Ok(links)
}

fn extract_categories(entry: Node<'_, '_>) -> Result<Vec<Category>, ArxivError> {
    let primary = find_child(entry, ARXIV_PRIMARY_CATEGORY)
        .map(|node| Category(attributes(node)))
        .ok_or_else(|| {
            ArxivError::MalformedEntry(format!("entry has no {} element", ARXIV_PRIMARY_CATEGORY))
        })?;

    let others = find_children(entry, ATOM_CATEGORY).map(|node| Category(attributes(node)));

    Ok(dedup_categories(primary, others))
}

/// Distinct categories with `primary` first, the rest in their original order.
///
/// Two categories are duplicates when their attribute sets are equal.
pub fn dedup_categories(
    primary: Category,
    others: impl IntoIterator<Item = Category>,
) -> Vec<Category> {
    let mut categories = vec![primary];
    for category in others {
        if !categories.contains(&category) {
            categories.push(category);
        }
    }
    categories
}
