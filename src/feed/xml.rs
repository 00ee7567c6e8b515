//! Namespace table and helpers for navigating Atom DOM trees.

use roxmltree::Node;
use std::fmt;

use crate::models::Attributes;

/// Atom 1.0 namespace
pub const ATOM_NS: &str = "http://www.w3.org/2005/Atom";
/// OpenSearch 1.1 namespace (paging totals)
pub const OPENSEARCH_NS: &str = "http://a9.com/-/spec/opensearch/1.1/";
/// arXiv extension namespace
pub const ARXIV_NS: &str = "http://arxiv.org/schemas/atom";

/// Prefix to namespace URI table used by arXiv feeds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Namespaces {
    pub atom: &'static str,
    pub opensearch: &'static str,
    pub arxiv: &'static str,
}

/// The namespaces every arXiv API response declares
pub const ATOM_NAMESPACES: Namespaces = Namespaces {
    atom: ATOM_NS,
    opensearch: OPENSEARCH_NS,
    arxiv: ARXIV_NS,
};

/// A namespace-qualified element name, e.g. `atom:entry`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QName {
    pub prefix: &'static str,
    pub namespace: &'static str,
    pub local: &'static str,
}

impl QName {
    pub const fn new(prefix: &'static str, namespace: &'static str, local: &'static str) -> Self {
        Self {
            prefix,
            namespace,
            local,
        }
    }

    pub const fn atom(local: &'static str) -> Self {
        Self::new("atom", ATOM_NAMESPACES.atom, local)
    }

    pub const fn opensearch(local: &'static str) -> Self {
        Self::new("opensearch", ATOM_NAMESPACES.opensearch, local)
    }

    pub const fn arxiv(local: &'static str) -> Self {
        Self::new("arxiv", ATOM_NAMESPACES.arxiv, local)
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.prefix, self.local)
    }
}

/// Check whether `node` is an element with the given qualified name.
pub fn is_named(node: Node<'_, '_>, name: QName) -> bool {
    node.is_element() && node.has_tag_name((name.namespace, name.local))
}

/// Find the first child element with the given qualified name.
pub fn find_child<'a, 'input>(node: Node<'a, 'input>, name: QName) -> Option<Node<'a, 'input>> {
    node.children().find(|child| is_named(*child, name))
}

/// Find all child elements with the given qualified name, in document order.
pub fn find_children<'a, 'input>(
    node: Node<'a, 'input>,
    name: QName,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(move |child| is_named(*child, name))
}

/// Text content of an element, untrimmed.
///
/// Concatenates every descendant text node so entity-split or CDATA text
/// comes back whole. Empty elements give an empty string.
pub fn get_text(node: Node<'_, '_>) -> String {
    node.descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect()
}

/// Text content of the first child named `name`.
pub fn child_text(node: Node<'_, '_>, name: QName) -> Option<String> {
    find_child(node, name).map(get_text)
}

/// All attributes of an element.
///
/// Unqualified attributes are keyed by their local name; namespaced ones by
/// `{namespace}name`.
pub fn attributes(node: Node<'_, '_>) -> Attributes {
    node.attributes()
        .map(|attr| {
            let key = match attr.namespace() {
                Some(ns) => format!("{{{}}}{}", ns, attr.name()),
                None => attr.name().to_string(),
            };
            (key, attr.value().to_string())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use roxmltree::Document;

    const FEED: &str = r#"<feed xmlns="http://www.w3.org/2005/Atom"
        xmlns:arxiv="http://arxiv.org/schemas/atom">
        <entry>
            <title>One &amp; two</title>
            <arxiv:comment>5 pages</arxiv:comment>
            <comment>unqualified</comment>
            <link href="http://a" rel="alternate" arxiv:extra="x"/>
            <empty/>
        </entry>
    </feed>"#;

    #[test]
    fn test_qnames_use_namespace_table() {
        assert_eq!(QName::atom("entry").namespace, ATOM_NAMESPACES.atom);
        assert_eq!(QName::opensearch("totalResults").namespace, OPENSEARCH_NS);
        assert_eq!(QName::arxiv("affiliation").namespace, ARXIV_NS);
        assert_eq!(QName::arxiv("affiliation").to_string(), "arxiv:affiliation");
    }

    #[test]
    fn test_qualified_lookup() {
        let doc = Document::parse(FEED).unwrap();
        let entry = find_child(doc.root_element(), QName::atom("entry")).unwrap();

        // arxiv:comment must not match the default-namespace <comment>
        let comment = find_child(entry, QName::arxiv("comment")).unwrap();
        assert_eq!(get_text(comment), "5 pages");
        assert_eq!(find_children(entry, QName::atom("comment")).count(), 1);
        assert!(find_child(entry, QName::atom("summary")).is_none());
    }

    #[test]
    fn test_text_helpers() {
        let doc = Document::parse(FEED).unwrap();
        let entry = find_child(doc.root_element(), QName::atom("entry")).unwrap();

        assert_eq!(child_text(entry, QName::atom("title")).as_deref(), Some("One & two"));
        assert_eq!(child_text(entry, QName::atom("empty")).as_deref(), Some(""));
        assert_eq!(child_text(entry, QName::atom("missing")), None);
    }

    #[test]
    fn test_attributes() {
        let doc = Document::parse(FEED).unwrap();
        let entry = find_child(doc.root_element(), QName::atom("entry")).unwrap();
        let link = find_child(entry, QName::atom("link")).unwrap();

        let attrs = attributes(link);
        assert_eq!(attrs.get("href").map(String::as_str), Some("http://a"));
        assert_eq!(attrs.get("rel").map(String::as_str), Some("alternate"));
        assert_eq!(
            attrs.get("{http://arxiv.org/schemas/atom}extra").map(String::as_str),
            Some("x")
        );
        assert_eq!(attrs.len(), 3);
    }

    #[test]
    fn test_qname_display() {
        assert_eq!(QName::arxiv("primary_category").to_string(), "arxiv:primary_category");
    }
}
