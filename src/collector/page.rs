//! Homepage fact extraction.
//!
//! Turns the homepage HTML into the boolean/count signals the rule
//! catalog consumes. Parsing happens once; each fact is read off the
//! parsed tree.

use crate::collector::jsonld::{self, JsonLdFacts};
use scraper::{Html, Selector};
use serde_json::Value;
use tracing::debug;
use url::Url;

/// Minimum number of headings with a stable id for the anchors check.
pub const ANCHOR_MIN_HEADINGS: usize = 3;

/// Signals extracted from the homepage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageFacts {
    pub has_canonical: bool,
    pub has_viewport: bool,
    pub anchors_ok: bool,
    pub has_lists: bool,
    pub internal_links_count: usize,
    pub jsonld: JsonLdFacts,
}

fn selector(source: &str) -> Selector {
    Selector::parse(source).expect("static selector")
}

/// Extracts all homepage facts from raw HTML.
///
/// An unreachable homepage is represented by an empty string and yields
/// all-negative facts; extraction itself never fails.
pub fn extract(html: &str, base_url: &str) -> PageFacts {
    let document = Html::parse_document(html);

    PageFacts {
        has_canonical: has_canonical(&document),
        has_viewport: has_viewport(&document),
        anchors_ok: heading_anchor_count(&document) >= ANCHOR_MIN_HEADINGS,
        has_lists: has_lists(&document),
        internal_links_count: internal_links_count(&document, base_url),
        jsonld: jsonld::collect_facts(&jsonld_blocks(&document)),
    }
}

fn has_canonical(document: &Html) -> bool {
    document
        .select(&selector("link[rel]"))
        .any(|link| {
            link.value()
                .attr("rel")
                .map(|rel| rel.to_lowercase().contains("canonical"))
                .unwrap_or(false)
        })
}

fn has_viewport(document: &Html) -> bool {
    document
        .select(&selector(r#"meta[name="viewport"]"#))
        .next()
        .is_some()
}

/// Count of heading elements (h1..h6) carrying a non-empty id.
fn heading_anchor_count(document: &Html) -> usize {
    document
        .select(&selector("h1, h2, h3, h4, h5, h6"))
        .filter(|heading| {
            heading
                .value()
                .attr("id")
                .map(|id| !id.trim().is_empty())
                .unwrap_or(false)
        })
        .count()
}

fn has_lists(document: &Html) -> bool {
    document.select(&selector("ol, ul")).next().is_some()
}

/// Number of hyperlinks whose resolved host matches the base host.
fn internal_links_count(document: &Html, base_url: &str) -> usize {
    let base = match Url::parse(base_url) {
        Ok(base) => base,
        Err(e) => {
            debug!("Unparseable base URL {}: {}", base_url, e);
            return 0;
        }
    };
    let host = match base.host_str() {
        Some(host) => host.to_string(),
        None => return 0,
    };

    document
        .select(&selector("a[href]"))
        .filter_map(|anchor| anchor.value().attr("href"))
        .filter_map(|href| base.join(href).ok())
        .filter(|resolved| resolved.host_str() == Some(host.as_str()))
        .count()
}

/// Parses every JSON-LD script block, skipping blocks that fail to parse.
fn jsonld_blocks(document: &Html) -> Vec<Value> {
    document
        .select(&selector(r#"script[type="application/ld+json"]"#))
        .filter_map(|script| {
            let raw: String = script.text().collect();
            match serde_json::from_str::<Value>(&raw) {
                Ok(value) => Some(value),
                Err(e) => {
                    debug!("Skipping malformed JSON-LD block: {}", e);
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://example.com";

    #[test]
    fn test_empty_page_has_no_facts() {
        let facts = extract("", BASE);
        assert!(!facts.has_canonical);
        assert!(!facts.has_viewport);
        assert!(!facts.anchors_ok);
        assert!(!facts.has_lists);
        assert_eq!(facts.internal_links_count, 0);
        assert!(facts.jsonld.types.is_empty());
    }

    #[test]
    fn test_canonical_and_viewport() {
        let html = r#"<html><head>
            <link rel="Canonical" href="https://example.com/">
            <meta name="viewport" content="width=device-width">
        </head><body></body></html>"#;

        let facts = extract(html, BASE);
        assert!(facts.has_canonical);
        assert!(facts.has_viewport);
    }

    #[test]
    fn test_anchor_threshold() {
        let two = r#"<h2 id="a">A</h2><h3 id="b">B</h3><h2>No id</h2>"#;
        assert!(!extract(two, BASE).anchors_ok);

        let three = r#"<h2 id="a">A</h2><h3 id="b">B</h3><h4 id="c">C</h4>"#;
        assert!(extract(three, BASE).anchors_ok);
    }

    #[test]
    fn test_blank_heading_id_does_not_count() {
        let html = r#"<h2 id=" ">A</h2><h2 id="b">B</h2><h2 id="c">C</h2>"#;
        assert!(!extract(html, BASE).anchors_ok);
    }

    #[test]
    fn test_internal_links_ignore_other_hosts() {
        let html = r##"<body>
            <a href="/pricing">Pricing</a>
            <a href="https://example.com/docs">Docs</a>
            <a href="https://other.org/page">Elsewhere</a>
            <a href="#faq">FAQ</a>
        </body>"##;

        let facts = extract(html, BASE);
        assert_eq!(facts.internal_links_count, 3);
    }

    #[test]
    fn test_jsonld_parse_failure_is_per_block() {
        let html = r#"<head>
            <script type="application/ld+json">{"@type": "FAQPage"}</script>
            <script type="application/ld+json">{not json</script>
            <script type="application/ld+json">{"@type": "HowTo", "sameAs": "x"}</script>
        </head>"#;

        let facts = extract(html, BASE);
        assert!(facts.jsonld.types.contains("FAQPage"));
        assert!(facts.jsonld.types.contains("HowTo"));
        assert!(facts.jsonld.same_as_present);
    }

    #[test]
    fn test_lists_detected() {
        assert!(extract("<ul><li>a</li></ul>", BASE).has_lists);
        assert!(extract("<ol><li>a</li></ol>", BASE).has_lists);
        assert!(!extract("<p>plain</p>", BASE).has_lists);
    }
}
