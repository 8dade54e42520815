//! Narrative generation via a chat-style completion API.
//!
//! The raw signals and the finished report are compacted into a bounded
//! bundle, serialized into a two-role prompt and sent to the narrative
//! collaborator. The answer must be a single JSON object with three
//! named fields. Any failure on this path degrades to an empty
//! [`NarrativeResult`]; the technical report never depends on it.

use crate::collector::RawSignalBundle;
use crate::models::{AuditItem, NarrativeResult, Report, Scores};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

/// Caps applied to the compacted bundle, independent of site size.
pub const MAX_SITEMAPS: usize = 10;
pub const MAX_TYPES: usize = 20;
pub const MAX_MAIN_ITEMS: usize = 30;
pub const MAX_SECTION_ITEMS: usize = 30;

/// Maximum number of tips kept after normalization.
pub const MAX_TIPS: usize = 5;

/// Options for the narrative client.
#[derive(Debug, Clone)]
pub struct NarrativeOptions {
    pub api_url: String,
    pub model: String,
    pub temperature: f32,
    pub timeout_seconds: u64,
}

impl Default for NarrativeOptions {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:11434".to_string(),
            model: "llama3.2:latest".to_string(),
            temperature: 0.2,
            timeout_seconds: 120,
        }
    }
}

impl From<&crate::config::NarrativeConfig> for NarrativeOptions {
    fn from(config: &crate::config::NarrativeConfig) -> Self {
        Self {
            api_url: config.api_url.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            timeout_seconds: config.timeout_seconds,
        }
    }
}

/// Why a narrative call produced no content.
#[derive(Debug, Error)]
pub enum NarrativeError {
    #[error("request timed out after {0}s")]
    Timeout(u64),
    #[error("cannot connect to the narrative API at {0}")]
    Connect(String),
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("narrative API error {status}: {body}")]
    Api { status: u16, body: String },
    #[error("malformed narrative response: {0}")]
    MalformedResponse(String),
}

/// One section of the compacted payload.
#[derive(Debug, Clone, Serialize)]
pub struct SectionPayload {
    pub name: String,
    pub items: Vec<AuditItem>,
}

/// Bounded projection of one audit run sent to the collaborator.
#[derive(Debug, Clone, Serialize)]
pub struct NarrativeBundle {
    pub base_url: String,
    pub scores: Scores,
    pub robots_present: bool,
    pub sitemaps: Vec<String>,
    pub structured_data_types: Vec<String>,
    pub has_canonical: bool,
    pub has_viewport: bool,
    pub anchors_ok: bool,
    pub internal_links_count: usize,
    pub top_todos: Vec<AuditItem>,
    pub main_items: Vec<AuditItem>,
    pub sections: Vec<SectionPayload>,
}

impl NarrativeBundle {
    /// Compacts signals and report under the payload caps.
    pub fn from_parts(bundle: &RawSignalBundle, report: &Report) -> Self {
        Self {
            base_url: bundle.base_url.clone(),
            scores: report.scores,
            robots_present: bundle.robots_present(),
            sitemaps: bundle
                .sitemap_urls
                .iter()
                .take(MAX_SITEMAPS)
                .cloned()
                .collect(),
            structured_data_types: bundle
                .structured_data_types
                .iter()
                .take(MAX_TYPES)
                .cloned()
                .collect(),
            has_canonical: bundle.has_canonical,
            has_viewport: bundle.has_viewport,
            anchors_ok: bundle.anchors_ok,
            internal_links_count: bundle.internal_links_count,
            top_todos: report.top_remediations.clone(),
            main_items: report
                .main_items
                .iter()
                .take(MAX_MAIN_ITEMS)
                .cloned()
                .collect(),
            sections: report
                .sections
                .iter()
                .map(|section| SectionPayload {
                    name: section.name.clone(),
                    items: section
                        .items
                        .iter()
                        .take(MAX_SECTION_ITEMS)
                        .cloned()
                        .collect(),
                })
                .collect(),
        }
    }
}

/// Message in the chat request.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// Chat API request.
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    stream: bool,
    format: String,
    options: ChatOptions,
}

#[derive(Debug, Serialize)]
struct ChatOptions {
    temperature: f32,
}

/// Chat API response.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}

const SYSTEM_PROMPT: &str = "You are an SEO and AI-visibility consultant. \
Explain in plain language, without jargon. Keep answers brief and constructive. \
Return strictly one JSON object and nothing else.";

/// Builds the two-role prompt around the serialized bundle.
pub fn build_prompt(bundle: &NarrativeBundle) -> Vec<ChatMessage> {
    let payload =
        serde_json::to_string_pretty(bundle).unwrap_or_else(|_| "{}".to_string());

    let user = format!(
        "Review the site audit data and prepare three blocks:\n\
         1) friendly_explainer - 6-10 sentences in plain language: what is going on \
         with the site and why it matters.\n\
         2) five_tips - 5 short tips a person without a technical background can act on. \
         One sentence each, no complex terms.\n\
         3) final_summary - 2-4 sentences with the overall conclusion, mentioning the scores.\n\n\
         Data (compact):\n{}",
        payload
    );

    vec![
        ChatMessage {
            role: "system".to_string(),
            content: SYSTEM_PROMPT.to_string(),
        },
        ChatMessage {
            role: "user".to_string(),
            content: user,
        },
    ]
}

/// Normalizes the `five_tips` field, accepted as a list or as one
/// newline-delimited string.
pub fn normalize_tips(value: Option<&Value>) -> Vec<String> {
    let raw: Vec<String> = match value {
        Some(Value::String(text)) => text.lines().map(str::to_string).collect(),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    };

    raw.iter()
        .map(|tip| tip.trim())
        .filter(|tip| !tip.is_empty())
        .take(MAX_TIPS)
        .map(str::to_string)
        .collect()
}

/// Maps the response object onto a [`NarrativeResult`], tolerating
/// missing fields.
pub fn normalize_response(value: &Value) -> NarrativeResult {
    let text_field = |name: &str| {
        value
            .get(name)
            .and_then(Value::as_str)
            .unwrap_or("")
            .trim()
            .to_string()
    };

    NarrativeResult {
        explainer: text_field("friendly_explainer"),
        tips: normalize_tips(value.get("five_tips")),
        summary: text_field("final_summary"),
    }
}

/// Client for the narrative collaborator.
pub struct NarrativeClient {
    options: NarrativeOptions,
    http_client: reqwest::Client,
}

impl NarrativeClient {
    pub fn new(options: NarrativeOptions) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(options.timeout_seconds))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            options,
            http_client,
        }
    }

    /// Generate narrative blocks for one audit run.
    ///
    /// Never fails: any transport, status or parse problem is logged
    /// and yields an empty result.
    pub async fn generate(&self, bundle: &NarrativeBundle) -> NarrativeResult {
        info!("Requesting narrative from model {}", self.options.model);

        match self.try_generate(bundle).await {
            Ok(result) => result,
            Err(e) => {
                warn!("Narrative generation failed: {}", e);
                NarrativeResult::default()
            }
        }
    }

    async fn try_generate(
        &self,
        bundle: &NarrativeBundle,
    ) -> Result<NarrativeResult, NarrativeError> {
        let url = format!("{}/api/chat", self.options.api_url);

        let request = ChatRequest {
            model: self.options.model.clone(),
            messages: build_prompt(bundle),
            stream: false,
            format: "json".to_string(),
            options: ChatOptions {
                temperature: self.options.temperature,
            },
        };

        let response = self
            .http_client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    NarrativeError::Timeout(self.options.timeout_seconds)
                } else if e.is_connect() {
                    NarrativeError::Connect(self.options.api_url.clone())
                } else {
                    NarrativeError::Transport(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NarrativeError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| NarrativeError::MalformedResponse(e.to_string()))?;

        let value: Value = serde_json::from_str(&chat_response.message.content)
            .map_err(|e| NarrativeError::MalformedResponse(e.to_string()))?;
        if !value.is_object() {
            return Err(NarrativeError::MalformedResponse(
                "expected a single JSON object".to_string(),
            ));
        }

        Ok(normalize_response(&value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Status;
    use serde_json::json;

    fn oversized_parts() -> (RawSignalBundle, Report) {
        let mut bundle = RawSignalBundle::empty("https://example.com");
        bundle.sitemap_urls = (0..15)
            .map(|i| format!("https://example.com/s{}.xml", i))
            .collect();
        bundle.structured_data_types =
            (0..25).map(|i| format!("Type{:02}", i)).collect();

        let many =
            |count: usize| -> Vec<AuditItem> {
                (0..count)
                    .map(|i| AuditItem::new(format!("Rule {}", i), Status::Warn, "n", "t"))
                    .collect()
            };

        let report = Report {
            base_url: bundle.base_url.clone(),
            main_items: many(40),
            sections: vec![crate::models::Section::new("S", many(40))],
            scores: Scores::default(),
            top_remediations: many(5),
        };

        (bundle, report)
    }

    #[test]
    fn test_bundle_caps() {
        let (bundle, report) = oversized_parts();
        let payload = NarrativeBundle::from_parts(&bundle, &report);

        assert_eq!(payload.sitemaps.len(), MAX_SITEMAPS);
        assert_eq!(payload.structured_data_types.len(), MAX_TYPES);
        assert_eq!(payload.main_items.len(), MAX_MAIN_ITEMS);
        assert_eq!(payload.sections[0].items.len(), MAX_SECTION_ITEMS);
        assert_eq!(payload.top_todos.len(), 5);
    }

    #[test]
    fn test_prompt_has_two_roles_and_payload() {
        let (bundle, report) = oversized_parts();
        let payload = NarrativeBundle::from_parts(&bundle, &report);
        let messages = build_prompt(&payload);

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "system");
        assert_eq!(messages[1].role, "user");
        assert!(messages[1].content.contains("friendly_explainer"));
        assert!(messages[1].content.contains("https://example.com"));
    }

    #[test]
    fn test_tips_from_newline_string() {
        let value = json!("First tip.\n\n  Second tip.  \nThird.\nFourth.\nFifth.\nSixth.");
        let tips = normalize_tips(Some(&value));

        assert_eq!(
            tips,
            vec!["First tip.", "Second tip.", "Third.", "Fourth.", "Fifth."]
        );
    }

    #[test]
    fn test_tips_from_list() {
        let value = json!(["  one ", "", "two", 3, "three"]);
        let tips = normalize_tips(Some(&value));
        assert_eq!(tips, vec!["one", "two", "three"]);
    }

    #[test]
    fn test_tips_from_missing_or_odd_shapes() {
        assert!(normalize_tips(None).is_empty());
        assert!(normalize_tips(Some(&json!(42))).is_empty());
    }

    #[test]
    fn test_normalize_response_tolerates_missing_fields() {
        let full = json!({
            "friendly_explainer": "  The site looks closed to AI crawlers. ",
            "five_tips": ["Open robots.txt."],
            "final_summary": "Scores are low."
        });
        let result = normalize_response(&full);
        assert_eq!(result.explainer, "The site looks closed to AI crawlers.");
        assert_eq!(result.tips, vec!["Open robots.txt."]);
        assert_eq!(result.summary, "Scores are low.");

        let partial = json!({ "five_tips": "only\ntips" });
        let result = normalize_response(&partial);
        assert!(result.explainer.is_empty());
        assert_eq!(result.tips.len(), 2);
        assert!(result.summary.is_empty());
    }
}
