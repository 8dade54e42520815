//! Interactive surface and per-requester state.
//!
//! Interprets free-text input as commands or candidate URLs, runs the
//! full audit pipeline and keeps the latest result per requester in an
//! injected overwrite-only cache. Transport details (chat, CLI) stay
//! outside; this module only produces replies.

use crate::collector::fetch::FetchOptions;
use crate::collector::{RawSignalBundle, SignalCollector};
use crate::config::Config;
use crate::models::{short, NarrativeResult, Report};
use crate::narrative::{NarrativeBundle, NarrativeClient, NarrativeOptions};
use crate::report::text::CHUNK_BUDGET;
use crate::{report, rules};
use anyhow::Result;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{error, info};
use url::Url;

/// Fixed reply to the start command.
pub const USAGE_BANNER: &str = "Send a site URL and I will run the audit.\n\n\
I collect the technical signals, ask an AI collaborator for a plain-language \
interpretation and deliver: 1) the technical report, 2) a plain-language \
explanation, 3) five tips, 4) the exported document (/report).";

/// Fixed reply to unusable input.
pub const CORRECTION_PROMPT: &str =
    "⚠️ Please send a valid URL, for example: https://example.com";

/// Fixed reply when no document is cached for the requester.
pub const REPORT_NOT_FOUND: &str = "Report not found. Send a URL to run a new audit.";

/// Best-effort progress notifications; implementations never fail.
pub trait ProgressSink: Send + Sync {
    fn notify(&self, text: &str);
}

/// Sink that drops every notification.
#[allow(dead_code)] // Sink for headless runs and tests
pub struct NullProgress;

impl ProgressSink for NullProgress {
    fn notify(&self, _text: &str) {}
}

/// Normalizes raw user input to `scheme://host[:port]`, dropping any
/// path. Input without a scheme gets `https://`.
pub fn normalize_url(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_matches('`').trim();
    if trimmed.is_empty() {
        return None;
    }

    let lower = trimmed.to_lowercase();
    let candidate = if lower.starts_with("http://") || lower.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    let parsed = Url::parse(&candidate).ok()?;
    let host = parsed.host_str()?;
    Some(match parsed.port() {
        Some(port) => format!("{}://{}:{}", parsed.scheme(), host, port),
        None => format!("{}://{}", parsed.scheme(), host),
    })
}

/// What one incoming message asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show the usage banner.
    Start,
    /// Return the previously generated document.
    Document,
    /// Treat the text as a candidate URL and audit it.
    Audit(String),
}

impl Command {
    pub fn parse(text: &str) -> Self {
        match text.trim() {
            "/start" => Command::Start,
            "/report" => Command::Document,
            other => Command::Audit(other.to_string()),
        }
    }
}

/// Cached result of the requester's most recent audit.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub text: String,
    pub report: Report,
    pub document: String,
}

/// Overwrite-only store of the latest entry per requester. Each write
/// replaces the prior value wholesale; there is no partial update.
pub trait ReportCache: Send + Sync {
    fn store(&self, requester: u64, entry: CacheEntry);
    fn load(&self, requester: u64) -> Option<CacheEntry>;
}

/// In-memory cache, the only persistence this service has.
#[derive(Default)]
pub struct MemoryReportCache {
    entries: Mutex<HashMap<u64, CacheEntry>>,
}

impl MemoryReportCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReportCache for MemoryReportCache {
    fn store(&self, requester: u64, entry: CacheEntry) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(requester, entry);
    }

    fn load(&self, requester: u64) -> Option<CacheEntry> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.get(&requester).cloned()
    }
}

/// One outgoing message.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Text(String),
    /// The exported Markdown document.
    Document(String),
}

/// Everything one audit run produces.
#[derive(Debug, Clone)]
pub struct AuditOutcome {
    pub report: Report,
    pub text: String,
    pub chunks: Vec<String>,
    pub narrative: NarrativeResult,
    pub document: String,
}

/// The audit pipeline behind the interactive surface.
pub struct AuditPipeline {
    collector: SignalCollector,
    narrative: NarrativeClient,
    narrative_enabled: bool,
}

impl AuditPipeline {
    pub fn new(config: &Config) -> Self {
        Self {
            collector: SignalCollector::new(&FetchOptions::from(&config.fetch)),
            narrative: NarrativeClient::new(NarrativeOptions::from(&config.narrative)),
            narrative_enabled: config.narrative.enabled,
        }
    }

    /// Runs the full pipeline for a normalized base URL.
    pub async fn run(&self, base_url: &str, progress: &dyn ProgressSink) -> Result<AuditOutcome> {
        let bundle = self.collector.collect(base_url, progress).await;
        progress.notify("📦 Data collection complete.");

        let evaluation = rules::evaluate(&bundle);
        let report = report::assemble(base_url, evaluation);

        let advisory = !bundle.policy_files_complete();
        let text = report::text::render_text(&report, advisory);
        let chunks = report::text::chunk_text(&text, CHUNK_BUDGET);

        let narrative = self.narrative_step(&bundle, &report, progress).await;

        let document =
            report::document::generate_markdown_document(&report, &narrative, Utc::now());

        info!(
            "Audit finished for {}: {} chunks, narrative {}",
            base_url,
            chunks.len(),
            if narrative.is_empty() { "empty" } else { "present" }
        );

        Ok(AuditOutcome {
            report,
            text,
            chunks,
            narrative,
            document,
        })
    }

    /// The narrative call never blocks the technical report: failures
    /// and the disabled state both yield an empty result.
    async fn narrative_step(
        &self,
        bundle: &RawSignalBundle,
        report: &Report,
        progress: &dyn ProgressSink,
    ) -> NarrativeResult {
        if !self.narrative_enabled {
            return NarrativeResult::default();
        }

        progress.notify("🤖 Preparing a plain-language interpretation…");
        let payload = NarrativeBundle::from_parts(bundle, report);
        let result = self.narrative.generate(&payload).await;

        if result.is_empty() {
            progress.notify("⚠️ The narrative step was skipped; delivering the technical report.");
        } else {
            progress.notify("✅ Narrative received.");
        }

        result
    }

    /// Handles one incoming message for one requester.
    ///
    /// A fatal pipeline error is reported as a truncated diagnostic and
    /// leaves the requester's previously cached report untouched.
    pub async fn handle(
        &self,
        requester: u64,
        input: &str,
        cache: &dyn ReportCache,
        progress: &dyn ProgressSink,
    ) -> Vec<Reply> {
        match Command::parse(input) {
            Command::Start => vec![Reply::Text(USAGE_BANNER.to_string())],
            Command::Document => match cache.load(requester) {
                Some(entry) => vec![Reply::Document(entry.document)],
                None => vec![Reply::Text(REPORT_NOT_FOUND.to_string())],
            },
            Command::Audit(raw) => {
                let Some(base_url) = normalize_url(&raw) else {
                    return vec![Reply::Text(CORRECTION_PROMPT.to_string())];
                };

                progress.notify(&format!("🔍 Starting the audit for: {}", base_url));
                match self.run(&base_url, progress).await {
                    Ok(outcome) => {
                        cache.store(
                            requester,
                            CacheEntry {
                                text: outcome.text.clone(),
                                report: outcome.report.clone(),
                                document: outcome.document.clone(),
                            },
                        );
                        audit_replies(outcome)
                    }
                    Err(e) => {
                        error!("Audit failed for {}: {:#}", base_url, e);
                        vec![Reply::Text(format!(
                            "❌ Something went wrong: {}",
                            short(&format!("{:#}", e), 300)
                        ))]
                    }
                }
            }
        }
    }
}

/// Renders a successful audit as an ordered reply sequence.
fn audit_replies(outcome: AuditOutcome) -> Vec<Reply> {
    let mut replies: Vec<Reply> = outcome.chunks.into_iter().map(Reply::Text).collect();

    if !outcome.narrative.explainer.is_empty() {
        replies.push(Reply::Text(format!(
            "Plain-language explanation\n{}",
            outcome.narrative.explainer
        )));
    }
    if !outcome.narrative.tips.is_empty() {
        let tips = outcome
            .narrative
            .tips
            .iter()
            .map(|tip| format!("• {}", tip))
            .collect::<Vec<_>>()
            .join("\n");
        replies.push(Reply::Text(format!("Five improvement tips\n{}", tips)));
    }
    if !outcome.narrative.summary.is_empty() {
        replies.push(Reply::Text(format!(
            "Conclusion\n{}",
            outcome.narrative.summary
        )));
    }

    replies.push(Reply::Text(
        "Done ✅ Send /report to get the exported document.".to_string(),
    ));
    replies
}
