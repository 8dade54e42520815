//! The audit rule catalog.
//!
//! `evaluate` maps a [`RawSignalBundle`] to the main checklist and the
//! auxiliary sections. Evaluation is pure and deterministic: the same
//! bundle always yields byte-identical items, and the rule order is
//! fixed because downstream priority weights are looked up by rule
//! name. A rule never fails; an absent signal takes the rule's most
//! conservative branch.

pub mod sections;

use crate::collector::RawSignalBundle;
use crate::models::{AuditItem, Section, Status};

/// Crawler identifiers looked for in robots.txt.
pub const LLM_AGENTS: [&str; 4] = ["GPTBot", "CCBot", "ClaudeBot", "PerplexityBot"];

/// Structured-data types counted as core coverage.
pub const CORE_TYPES: [&str; 6] = [
    "Organization",
    "VideoObject",
    "FAQPage",
    "HowTo",
    "WebPage",
    "BreadcrumbList",
];

/// Same-host link count needed for a healthy internal-linking signal.
pub const INTERNAL_LINKS_OK: usize = 20;

/// Stable rule names. The priority ranker weights rules by these, so
/// they are fixed identifiers, not display strings.
pub mod names {
    pub const CRAWLING: &str = "AI Crawling robots.txt";
    pub const POLICY: &str = "llms.txt / ai.txt";
    pub const SCHEMA: &str = "Schema.org";
    pub const SITEMAP: &str = "Sitemap";
    pub const CANONICAL: &str = "Indexability / Canonical";
    pub const WEB_VITALS: &str = "Core Web Vitals";
    pub const MOBILE: &str = "Mobile";
    pub const INTERNAL_LINKING: &str = "Internal Linking";
    pub const FAQ_HOWTO: &str = "FAQ / HowTo / Glossary";
    pub const EEAT: &str = "EEAT";
    pub const BRAND: &str = "Brand / Authority";
    pub const SOCIAL: &str = "Social";
    pub const FRESHNESS: &str = "Freshness / Monitoring";
    pub const GEO_EXTRACT: &str = "GEO Extractability";
    pub const ANCHORS: &str = "Anchors";
}

/// Result of one evaluation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub main_items: Vec<AuditItem>,
    pub sections: Vec<Section>,
}

/// Runs the full catalog against a bundle.
pub fn evaluate(bundle: &RawSignalBundle) -> Evaluation {
    let main_items = vec![
        crawling_rule(bundle),
        policy_rule(bundle),
        schema_rule(bundle),
        sitemap_rule(bundle),
        canonical_rule(bundle),
        web_vitals_rule(),
        mobile_rule(bundle),
        internal_linking_rule(bundle),
        faq_howto_rule(bundle),
        eeat_rule(),
        brand_rule(),
        social_rule(bundle),
        freshness_rule(),
        geo_extractability_rule(),
        anchors_rule(bundle),
    ];

    let sections = vec![
        sections::snippetability_section(bundle),
        sections::intent_map_section(bundle),
    ];

    Evaluation {
        main_items,
        sections,
    }
}

/// LLM agents mentioned in the robots body, catalog order.
fn llm_mentions(robots_body: &str) -> Vec<&'static str> {
    let haystack = robots_body.to_lowercase();
    LLM_AGENTS
        .iter()
        .copied()
        .filter(|agent| haystack.contains(&agent.to_lowercase()))
        .collect()
}

fn crawling_rule(bundle: &RawSignalBundle) -> AuditItem {
    match bundle.robots.present() {
        Some(body) => {
            let mentions = llm_mentions(body);
            if mentions.is_empty() {
                AuditItem::new(
                    names::CRAWLING,
                    Status::Warn,
                    "Search crawlers are addressed, but there are no explicit directives \
                     for GPTBot/ClaudeBot/Perplexity.",
                    "Add explicit rules for LLM crawlers to robots.txt.",
                )
            } else {
                AuditItem::new(
                    names::CRAWLING,
                    Status::Ok,
                    format!("Directives found for: {}", mentions.join(", ")),
                    "Keep Allow/Disallow rules for LLM crawlers up to date.",
                )
            }
        }
        None => AuditItem::new(
            names::CRAWLING,
            Status::Fail,
            "robots.txt not found.",
            "Create robots.txt and define crawl rules.",
        ),
    }
}

fn policy_rule(bundle: &RawSignalBundle) -> AuditItem {
    let Some((which, body)) = bundle.policy_file() else {
        return AuditItem::new(
            names::POLICY,
            Status::Fail,
            "No LLM indexing policy is published.",
            "Create llms.txt (or ai.txt) with Policy, Contact and Sitemap.",
        );
    };

    let haystack = body.to_lowercase();
    let missing: Vec<&str> = [("policy", "Policy"), ("contact", "Contact"), ("sitemap", "Sitemap")]
        .iter()
        .filter(|(keyword, _)| !haystack.contains(*keyword))
        .map(|(_, label)| *label)
        .collect();

    if missing.is_empty() {
        AuditItem::new(
            names::POLICY,
            Status::Ok,
            format!("Found {} with the key fields.", which),
            "Keep the document up to date.",
        )
    } else {
        AuditItem::new(
            names::POLICY,
            Status::Warn,
            format!("Found {}, but missing fields: {}.", which, missing.join(", ")),
            "Fill in Policy/Contact/Sitemap in the LLM policy file.",
        )
    }
}

fn schema_rule(bundle: &RawSignalBundle) -> AuditItem {
    if bundle.structured_data_types.is_empty() {
        return AuditItem::new(
            names::SCHEMA,
            Status::Warn,
            "No structured data detected.",
            "Add JSON-LD for key entities.",
        );
    }

    let core: Vec<&str> = CORE_TYPES
        .iter()
        .copied()
        .filter(|t| bundle.structured_data_types.contains(*t))
        .collect();

    if core.is_empty() {
        AuditItem::new(
            names::SCHEMA,
            Status::Warn,
            "JSON-LD found, but few key types.",
            "Add FAQPage/HowTo/BreadcrumbList/WebPage.",
        )
    } else {
        let mut sorted = core;
        sorted.sort_unstable();
        let status = if sorted.len() < 3 {
            Status::Warn
        } else {
            Status::Ok
        };
        AuditItem::new(
            names::SCHEMA,
            status,
            format!("Types found: {}", sorted.join(", ")),
            "Extend JSON-LD coverage with key types (FAQPage, HowTo, WebPage, BreadcrumbList).",
        )
    }
}

fn sitemap_rule(bundle: &RawSignalBundle) -> AuditItem {
    if bundle.sitemap_urls.is_empty() {
        return AuditItem::new(
            names::SITEMAP,
            Status::Fail,
            "Sitemap not found.",
            "Add sitemap.xml and/or declare it in robots.txt.",
        );
    }

    let listed: Vec<&str> = bundle
        .sitemap_urls
        .iter()
        .take(3)
        .map(String::as_str)
        .collect();
    let ellipsis = if bundle.sitemap_urls.len() > 3 { "…" } else { "" };

    AuditItem::new(
        names::SITEMAP,
        Status::Ok,
        format!("Found: {}{}", listed.join(", "), ellipsis),
        "Review sitemap freshness weekly.",
    )
}

fn canonical_rule(bundle: &RawSignalBundle) -> AuditItem {
    if bundle.has_canonical {
        AuditItem::new(
            names::CANONICAL,
            Status::Ok,
            "The homepage declares <link rel='canonical'>.",
            "Keep canonicals stable.",
        )
    } else {
        AuditItem::new(
            names::CANONICAL,
            Status::Warn,
            "No canonical link on the homepage.",
            "Add rel=canonical to pages.",
        )
    }
}

fn web_vitals_rule() -> AuditItem {
    AuditItem::new(
        names::WEB_VITALS,
        Status::Warn,
        "No lab measurement available, so Core Web Vitals are not assessed.",
        "Check LCP/INP/CLS via PageSpeed Insights and optimize.",
    )
}

fn mobile_rule(bundle: &RawSignalBundle) -> AuditItem {
    AuditItem::new(
        names::MOBILE,
        if bundle.has_viewport {
            Status::Ok
        } else {
            Status::Warn
        },
        format!(
            "Viewport meta tag: {}",
            if bundle.has_viewport { "yes" } else { "no" }
        ),
        "Add <meta name='viewport'> and run a mobile-friendly test.",
    )
}

fn internal_linking_rule(bundle: &RawSignalBundle) -> AuditItem {
    AuditItem::new(
        names::INTERNAL_LINKING,
        if bundle.internal_links_count >= INTERNAL_LINKS_OK {
            Status::Ok
        } else {
            Status::Warn
        },
        format!(
            "Internal links on the homepage: {}",
            bundle.internal_links_count
        ),
        "Add topic clusters/hubs and navigation blocks.",
    )
}

fn faq_howto_rule(bundle: &RawSignalBundle) -> AuditItem {
    let faq = bundle.structured_data_types.contains("FAQPage");
    let howto = bundle.structured_data_types.contains("HowTo");

    if !faq && !howto {
        return AuditItem::new(
            names::FAQ_HOWTO,
            Status::Fail,
            "No structured FAQ/HowTo found.",
            "Add FAQPage/HowTo with JSON-LD.",
        );
    }

    AuditItem::new(
        names::FAQ_HOWTO,
        if faq && howto {
            Status::Ok
        } else {
            Status::Warn
        },
        format!(
            "FAQPage: {}, HowTo: {}",
            if faq { "yes" } else { "no" },
            if howto { "yes" } else { "no" }
        ),
        "Extend structured Q&A/HowTo sections.",
    )
}

fn eeat_rule() -> AuditItem {
    AuditItem::new(
        names::EEAT,
        Status::Ok,
        "Brand authority is assessed at a baseline level.",
        "Maintain author pages and cited sources.",
    )
}

fn brand_rule() -> AuditItem {
    AuditItem::new(
        names::BRAND,
        Status::Ok,
        "Baseline assessment: the brand is present.",
        "Monitor mentions and AI answer snippets.",
    )
}

fn social_rule(bundle: &RawSignalBundle) -> AuditItem {
    AuditItem::new(
        names::SOCIAL,
        if bundle.same_as_present {
            Status::Ok
        } else {
            Status::Warn
        },
        format!(
            "sameAs references in JSON-LD: {}",
            if bundle.same_as_present { "yes" } else { "no" }
        ),
        "Add sameAs links to social profiles in JSON-LD.",
    )
}

fn freshness_rule() -> AuditItem {
    AuditItem::new(
        names::FRESHNESS,
        Status::Warn,
        "Update cadence is not measured.",
        "Add RSS/JSON feeds and freshness monitoring.",
    )
}

fn geo_extractability_rule() -> AuditItem {
    AuditItem::new(
        names::GEO_EXTRACT,
        Status::Warn,
        "Explicit geo entities are not checked.",
        "Structure contacts/addresses in JSON-LD.",
    )
}

fn anchors_rule(bundle: &RawSignalBundle) -> AuditItem {
    AuditItem::new(
        names::ANCHORS,
        if bundle.anchors_ok {
            Status::Ok
        } else {
            Status::Fail
        },
        format!(
            "Stable heading anchors: {}",
            if bundle.anchors_ok { "yes" } else { "no" }
        ),
        "Add id attributes to h2/h3 headings so answers can be cited.",
    )
}
