//! Scraper for the arXiv category taxonomy page.

use scraper::{ElementRef, Html, Selector};

use crate::models::TaxonomyRow;

/// Page listing every arXiv category
pub const CATEGORY_TAXONOMY_URL: &str = "https://arxiv.org/category_taxonomy";

/// Extract one row per category block from the taxonomy page.
///
/// Category blocks are `div.columns.divided`. The first one on the page is an
/// example explaining the layout and is skipped.
pub fn parse_category_taxonomy(html: &str) -> Vec<TaxonomyRow> {
    let document = Html::parse_document(html);

    let (Ok(block_selector), Ok(heading_selector), Ok(span_selector), Ok(paragraph_selector)) = (
        Selector::parse("div.columns.divided"),
        Selector::parse("h4"),
        Selector::parse("span"),
        Selector::parse("p"),
    ) else {
        return Vec::new();
    };

    let mut rows = Vec::new();

    for block in document.select(&block_selector).skip(1) {
        let Some(heading) = block.select(&heading_selector).next() else {
            tracing::debug!("Skipping taxonomy block without a heading");
            continue;
        };

        let heading_text = element_text(&heading);
        let short_name = heading_text
            .split('(')
            .next()
            .unwrap_or_default()
            .trim()
            .to_string();

        let long_name = heading
            .select(&span_selector)
            .next()
            .map(|span| {
                element_text(&span)
                    .trim_matches(|c| c == '(' || c == ')')
                    .trim()
                    .to_string()
            })
            .unwrap_or_default();

        let description = block
            .select(&paragraph_selector)
            .next()
            .map(|p| element_text(&p))
            .unwrap_or_default();

        rows.push(TaxonomyRow {
            short_name,
            long_name,
            description,
        });
    }

    tracing::debug!("Parsed {} taxonomy rows", rows.len());
    rows
}

/// Text of an element with runs of whitespace collapsed to single spaces
fn element_text(elem: &ElementRef) -> String {
    elem.text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html><body>
<div class="columns divided">
  <div class="column"><h4>cs.XX <span>(Example Category)</span></h4></div>
  <div class="column"><p>Explains the layout.</p></div>
</div>
<h2 class="accordion-head">Computer Science</h2>
<div class="columns divided">
  <div class="column is-one-fifth"><h4>cs.AI <span>(Artificial Intelligence)</span></h4></div>
  <div class="column"><p>Covers all areas of AI except Vision,
     Robotics, Machine Learning.</p></div>
</div>
<div class="columns divided">
  <div class="column is-one-fifth"><h4>hep-th <span>(High Energy Physics - Theory)</span></h4></div>
  <div class="column"><p>Formal aspects of <em>quantum</em> field theory.</p></div>
</div>
<div class="columns divided">
  <div class="column"><p>No heading here.</p></div>
</div>
<div class="columns">
  <h4>not.divided <span>(Ignored)</span></h4>
</div>
</body></html>"#;

    #[test]
    fn test_parse_category_taxonomy() {
        let rows = parse_category_taxonomy(PAGE);

        assert_eq!(
            rows,
            vec![
                TaxonomyRow::new(
                    "cs.AI",
                    "Artificial Intelligence",
                    "Covers all areas of AI except Vision, Robotics, Machine Learning."
                ),
                TaxonomyRow::new(
                    "hep-th",
                    "High Energy Physics - Theory",
                    "Formal aspects of quantum field theory."
                ),
            ]
        );
    }

    #[test]
    fn test_first_block_is_skipped() {
        let rows = parse_category_taxonomy(PAGE);
        assert!(rows.iter().all(|row| row.short_name != "cs.XX"));
    }

    #[test]
    fn test_missing_span_and_paragraph() {
        let page = r#"<div class="columns divided"></div>
<div class="columns divided"><h4>math.AG</h4></div>"#;
        let rows = parse_category_taxonomy(page);
        assert_eq!(rows, vec![TaxonomyRow::new("math.AG", "", "")]);
    }

    #[test]
    fn test_empty_page() {
        assert!(parse_category_taxonomy("<html></html>").is_empty());
    }
}
