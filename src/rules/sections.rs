//! Auxiliary report sections.
//!
//! Two fixed sections accompany the main checklist: how well the site
//! lends itself to generative-AI snippets, and a map from common user
//! intents to concrete pages.

use crate::collector::RawSignalBundle;
use crate::models::{short, AuditItem, Section, Status};

pub const SNIPPETABILITY: &str = "Generative AI Snippetability";
pub const INTENT_MAP: &str = "Intent to Page Map";

/// Intents matched against discovered page URLs by keyword containment.
pub const INTENTS: [(&str, &str); 5] = [
    ("How to upload", "upload"),
    ("How to monetize", "monetiz"),
    ("How to delete", "delete"),
    ("What is it", "about"),
    ("How to report", "report"),
];

/// Eight fixed sub-rules on snippet friendliness.
pub fn snippetability_section(bundle: &RawSignalBundle) -> Section {
    let faq = bundle.structured_data_types.contains("FAQPage");
    let howto = bundle.structured_data_types.contains("HowTo");
    let has_types = !bundle.structured_data_types.is_empty();
    let has_policy = bundle.policy_file().is_some();

    let items = vec![
        if faq {
            AuditItem::new(
                "Q&A",
                Status::Ok,
                "FAQPage markup is present.",
                "Keep the FAQ up to date.",
            )
        } else {
            AuditItem::new(
                "Q&A",
                Status::Warn,
                "Structured Q&A coverage is limited.",
                "Add an FAQ section with JSON-LD.",
            )
        },
        AuditItem::new(
            "HowTo",
            if howto { Status::Ok } else { Status::Fail },
            format!("HowTo markup: {}", if howto { "yes" } else { "no" }),
            if howto {
                "Maintain the HowTo content."
            } else {
                "Structure guides as HowTo."
            },
        ),
        AuditItem::new(
            "Answer-Box",
            Status::Warn,
            "Short summaries are not verified automatically.",
            "Add concise answers/summaries to pages.",
        ),
        AuditItem::new(
            "Lists / Tables",
            if bundle.has_lists {
                Status::Ok
            } else {
                Status::Warn
            },
            format!(
                "Lists/tables on the homepage: {}",
                if bundle.has_lists { "present" } else { "none" }
            ),
            "Use step lists and comparison tables.",
        ),
        AuditItem::new(
            "Atomic Answers",
            if bundle.has_lists {
                Status::Ok
            } else {
                Status::Warn
            },
            if bundle.has_lists {
                "Extractable short-answer elements are present."
            } else {
                "Few atomic answers."
            },
            "Highlight atomic answers (short facts).",
        ),
        AuditItem::new(
            "Citations",
            Status::Warn,
            "Sources in the content are not verified automatically.",
            "Add sources/links to educational content.",
        ),
        AuditItem::new(
            "JSON-LD",
            if has_types { Status::Ok } else { Status::Warn },
            format!("JSON-LD: {}", if has_types { "present" } else { "none" }),
            "Extend coverage with FAQPage/HowTo/WebPage/BreadcrumbList.",
        ),
        AuditItem::new(
            "Licensing",
            if has_policy { Status::Warn } else { Status::Fail },
            if has_policy {
                "An LLM policy is partially present."
            } else {
                "No explicit LLM policy."
            },
            "Include a license (for example CC BY 4.0) in the LLM policy.",
        ),
    ];

    Section::new(SNIPPETABILITY, items)
}

/// Maps the fixed intents to discovered pages, falling back to the
/// base URL when no page URL contains the intent keyword.
pub fn intent_map_section(bundle: &RawSignalBundle) -> Section {
    let items = INTENTS
        .iter()
        .map(|(intent, keyword)| {
            let page = pick_url(&bundle.discovered_page_urls, keyword)
                .unwrap_or(bundle.base_url.as_str());
            AuditItem::new(
                *intent,
                Status::Ok,
                format!("Page/section: {}", short(page, 180)),
                "Tune the page content to the intent and add JSON-LD.",
            )
        })
        .collect();

    Section::new(INTENT_MAP, items)
}

/// First discovered URL containing the keyword, case-insensitive.
fn pick_url<'a>(urls: &'a [String], keyword: &str) -> Option<&'a str> {
    urls.iter()
        .find(|url| url.to_lowercase().contains(keyword))
        .map(String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snippetability_has_eight_fixed_rules() {
        let section = snippetability_section(&RawSignalBundle::empty("https://example.com"));
        assert_eq!(section.name, SNIPPETABILITY);

        let order: Vec<&str> = section.items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(
            order,
            vec![
                "Q&A",
                "HowTo",
                "Answer-Box",
                "Lists / Tables",
                "Atomic Answers",
                "Citations",
                "JSON-LD",
                "Licensing",
            ]
        );
    }

    #[test]
    fn test_snippetability_degrades_conservatively() {
        let section = snippetability_section(&RawSignalBundle::empty("https://example.com"));
        let by_name = |name: &str| {
            section
                .items
                .iter()
                .find(|i| i.name == name)
                .map(|i| i.status)
        };

        assert_eq!(by_name("Q&A"), Some(Status::Warn));
        assert_eq!(by_name("HowTo"), Some(Status::Fail));
        assert_eq!(by_name("JSON-LD"), Some(Status::Warn));
        assert_eq!(by_name("Licensing"), Some(Status::Fail));
    }

    #[test]
    fn test_licensing_softens_with_policy_file() {
        let mut bundle = RawSignalBundle::empty("https://example.com");
        bundle.ai.body = Some("Policy: open".to_string());

        let section = snippetability_section(&bundle);
        let licensing = section.items.iter().find(|i| i.name == "Licensing");
        assert_eq!(licensing.map(|i| i.status), Some(Status::Warn));
    }

    #[test]
    fn test_intent_map_matches_and_falls_back() {
        let mut bundle = RawSignalBundle::empty("https://example.com");
        bundle.discovered_page_urls = vec![
            "https://example.com/help/Upload-video".to_string(),
            "https://example.com/about".to_string(),
        ];

        let section = intent_map_section(&bundle);
        assert_eq!(section.items.len(), INTENTS.len());

        let upload = &section.items[0];
        assert!(upload.note.contains("Upload-video"));

        let delete = &section.items[2];
        assert!(delete.note.contains("Page/section: https://example.com"));
        assert!(!delete.note.contains("Upload"));
    }
}
