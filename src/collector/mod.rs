//! Signal collection.
//!
//! Fetches the homepage and the well-known auxiliary resources and
//! assembles the immutable [`RawSignalBundle`] the rule catalog runs
//! against. Collection is best-effort throughout: any unreachable
//! resource is recorded as absent, never as an error.

pub mod fetch;
pub mod jsonld;
pub mod page;

use crate::session::ProgressSink;
use fetch::{FetchOptions, FetchRecord, Fetcher};
use regex::Regex;
use std::collections::BTreeSet;
use tracing::{debug, info};

/// Cap on page URLs pulled out of sitemaps.
pub const MAX_DISCOVERED_PAGES: usize = 200;

/// How many sitemaps are read for page discovery.
pub const SITEMAPS_TO_SCAN: usize = 2;

/// Every raw signal one audit run is based on.
///
/// Owned by a single run and immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSignalBundle {
    /// Normalized scheme+host, no path.
    pub base_url: String,
    pub home: FetchRecord,
    pub robots: FetchRecord,
    pub llms: FetchRecord,
    pub ai: FetchRecord,
    /// Structured-data type names, duplicates collapsed.
    pub structured_data_types: BTreeSet<String>,
    pub same_as_present: bool,
    pub has_canonical: bool,
    pub has_viewport: bool,
    /// At least three headings carry a stable id.
    pub anchors_ok: bool,
    pub has_lists: bool,
    /// Same-host hyperlinks on the homepage.
    pub internal_links_count: usize,
    /// Known sitemap locations: robots-declared first, default fallback
    /// appended when reachable.
    pub sitemap_urls: Vec<String>,
    /// Page URLs pulled from the first sitemaps, capped.
    pub discovered_page_urls: Vec<String>,
}

impl RawSignalBundle {
    /// A bundle with every signal absent.
    #[allow(dead_code)] // Constructor for degraded runs, exercised by tests
    pub fn empty(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            home: FetchRecord::absent(base_url),
            robots: FetchRecord::absent(&format!("{}/robots.txt", base_url)),
            llms: FetchRecord::absent(&format!("{}/llms.txt", base_url)),
            ai: FetchRecord::absent(&format!("{}/ai.txt", base_url)),
            structured_data_types: BTreeSet::new(),
            same_as_present: false,
            has_canonical: false,
            has_viewport: false,
            anchors_ok: false,
            has_lists: false,
            internal_links_count: 0,
            sitemap_urls: Vec::new(),
            discovered_page_urls: Vec::new(),
        }
    }

    pub fn robots_present(&self) -> bool {
        self.robots.is_present()
    }

    /// The reachable policy file, preferring `llms.txt`.
    pub fn policy_file(&self) -> Option<(&'static str, &str)> {
        if let Some(body) = self.llms.present() {
            return Some(("llms.txt", body));
        }
        self.ai.present().map(|body| ("ai.txt", body))
    }

    /// True when both policy files answered.
    pub fn policy_files_complete(&self) -> bool {
        self.llms.is_present() && self.ai.is_present()
    }
}

/// Harvests `Sitemap:` directives from a robots body, deduplicated in
/// declaration order.
pub fn sitemap_directives(robots_body: &str) -> Vec<String> {
    let mut urls: Vec<String> = Vec::new();

    for line in robots_body.lines() {
        let Some((directive, rest)) = line.trim().split_once(':') else {
            continue;
        };
        if !directive.eq_ignore_ascii_case("sitemap") {
            continue;
        }

        let value = rest.trim();
        if !value.is_empty() && !urls.iter().any(|u| u == value) {
            urls.push(value.to_string());
        }
    }

    urls
}

/// Extracts `<loc>` values from sitemap XML.
pub fn extract_locs(xml: &str) -> Vec<String> {
    let re = Regex::new(r"<loc>\s*([^<]+?)\s*</loc>").expect("static regex");
    re.captures_iter(xml).map(|cap| cap[1].to_string()).collect()
}

/// Collects all signals for one audit run.
pub struct SignalCollector {
    fetcher: Fetcher,
}

impl SignalCollector {
    pub fn new(options: &FetchOptions) -> Self {
        Self {
            fetcher: Fetcher::new(options),
        }
    }

    /// Fetch everything and build the bundle.
    ///
    /// The homepage, robots and policy-file fetches run concurrently;
    /// sitemap discovery waits for robots so declared sitemaps are seen
    /// before the default `/sitemap.xml` probe.
    pub async fn collect(&self, base_url: &str, progress: &dyn ProgressSink) -> RawSignalBundle {
        progress.notify("🔎 Fetching the homepage, robots.txt and policy files…");

        let robots_url = format!("{}/robots.txt", base_url);
        let llms_url = format!("{}/llms.txt", base_url);
        let ai_url = format!("{}/ai.txt", base_url);

        let (home, robots, llms, ai) = futures::join!(
            self.fetcher.fetch_text(base_url),
            self.fetcher.fetch_text(&robots_url),
            self.fetcher.fetch_text(&llms_url),
            self.fetcher.fetch_text(&ai_url),
        );

        progress.notify("🧭 Discovering sitemaps…");
        let sitemap_urls = self.discover_sitemaps(base_url, &robots).await;

        progress.notify("🗂️ Collecting page URLs from sitemaps…");
        let discovered_page_urls = self.discover_pages(&sitemap_urls).await;

        progress.notify("📦 Analyzing the homepage markup…");
        let facts = page::extract(home.present().unwrap_or(""), base_url);

        info!(
            "Collected signals for {}: {} sitemaps, {} pages, {} structured-data types",
            base_url,
            sitemap_urls.len(),
            discovered_page_urls.len(),
            facts.jsonld.types.len()
        );

        RawSignalBundle {
            base_url: base_url.to_string(),
            home,
            robots,
            llms,
            ai,
            structured_data_types: facts.jsonld.types,
            same_as_present: facts.jsonld.same_as_present,
            has_canonical: facts.has_canonical,
            has_viewport: facts.has_viewport,
            anchors_ok: facts.anchors_ok,
            has_lists: facts.has_lists,
            internal_links_count: facts.internal_links_count,
            sitemap_urls,
            discovered_page_urls,
        }
    }

    /// Robots-declared sitemaps first; the default path is probed only
    /// when not already declared, and appended only if reachable.
    async fn discover_sitemaps(&self, base_url: &str, robots: &FetchRecord) -> Vec<String> {
        let mut sitemaps = robots.present().map(sitemap_directives).unwrap_or_default();

        let default_sitemap = format!("{}/sitemap.xml", base_url);
        if !sitemaps.iter().any(|s| *s == default_sitemap)
            && self.fetcher.fetch_ok(&default_sitemap).await
        {
            sitemaps.push(default_sitemap);
        }

        sitemaps
    }

    /// Reads the first sitemaps and gathers unique page URLs up to the cap.
    async fn discover_pages(&self, sitemap_urls: &[String]) -> Vec<String> {
        let mut pages: Vec<String> = Vec::new();

        'sitemaps: for sitemap in sitemap_urls.iter().take(SITEMAPS_TO_SCAN) {
            let record = self.fetcher.fetch_text(sitemap).await;
            let Some(xml) = record.present() else {
                debug!("Sitemap unreachable: {}", sitemap);
                continue;
            };

            for loc in extract_locs(xml) {
                if !pages.iter().any(|p| *p == loc) {
                    pages.push(loc);
                    if pages.len() >= MAX_DISCOVERED_PAGES {
                        break 'sitemaps;
                    }
                }
            }
        }

        pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sitemap_directives_case_and_dedup() {
        let robots = "User-agent: *\n\
                      SITEMAP: https://example.com/a.xml\n\
                      sitemap:   https://example.com/b.xml\n\
                      Sitemap: https://example.com/a.xml\n\
                      Disallow: /private\n";

        let urls = sitemap_directives(robots);
        assert_eq!(
            urls,
            vec![
                "https://example.com/a.xml".to_string(),
                "https://example.com/b.xml".to_string(),
            ]
        );
    }

    #[test]
    fn test_sitemap_directives_skips_empty_value() {
        assert!(sitemap_directives("Sitemap:\nSitemap:   ").is_empty());
        assert!(sitemap_directives("").is_empty());
    }

    #[test]
    fn test_extract_locs() {
        let xml = "<urlset>\
                   <url><loc>https://example.com/a</loc></url>\
                   <url><loc>  https://example.com/b  </loc></url>\
                   </urlset>";

        assert_eq!(
            extract_locs(xml),
            vec![
                "https://example.com/a".to_string(),
                "https://example.com/b".to_string(),
            ]
        );
    }

    #[test]
    fn test_empty_bundle_accessors() {
        let bundle = RawSignalBundle::empty("https://example.com");
        assert!(!bundle.robots_present());
        assert!(bundle.policy_file().is_none());
        assert!(!bundle.policy_files_complete());
        assert!(bundle.sitemap_urls.is_empty());
    }

    #[test]
    fn test_policy_file_prefers_llms() {
        let mut bundle = RawSignalBundle::empty("https://example.com");
        bundle.ai.body = Some("ai policy".to_string());
        assert_eq!(bundle.policy_file(), Some(("ai.txt", "ai policy")));

        bundle.llms.body = Some("llms policy".to_string());
        assert_eq!(bundle.policy_file(), Some(("llms.txt", "llms policy")));
    }
}
