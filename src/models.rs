//! Data models for the site auditor.
//!
//! This module contains the core value types shared by the pipeline:
//! checklist items, statuses, scores and the final report.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of a single checklist item.
///
/// `Na` marks items that carry no score and are excluded from the
/// score denominator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Check passed.
    Ok,
    /// Check passed partially or could not be fully verified.
    Warn,
    /// Check failed.
    Fail,
    /// Check not applicable; excluded from scoring.
    Na,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Ok => write!(f, "OK"),
            Status::Warn => write!(f, "WARN"),
            Status::Fail => write!(f, "FAIL"),
            Status::Na => write!(f, "N/A"),
        }
    }
}

impl Status {
    /// Returns the badge used in rendered reports.
    pub fn badge(&self) -> &'static str {
        match self {
            Status::Ok => "✅",
            Status::Warn => "🟡",
            Status::Fail => "❌",
            Status::Na => "➖",
        }
    }

    /// Score contribution of this status, `None` for unscored items.
    pub fn points(&self) -> Option<u32> {
        match self {
            Status::Ok => Some(2),
            Status::Warn => Some(1),
            Status::Fail => Some(0),
            Status::Na => None,
        }
    }

    /// Rank used by the remediation shortlist: failures outrank warnings.
    pub fn severity_rank(&self) -> u32 {
        match self {
            Status::Fail => 2,
            Status::Warn => 1,
            Status::Ok | Status::Na => 0,
        }
    }
}

/// One evaluated checklist entry.
///
/// `name` is the rule's stable identifier; the priority ranker looks
/// weights up by it, so it must not vary between runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditItem {
    /// Stable rule name, unique within its section.
    pub name: String,
    /// Evaluation outcome.
    pub status: Status,
    /// What was observed.
    pub note: String,
    /// What to do about it.
    pub todo: String,
}

impl AuditItem {
    /// Creates a new item.
    pub fn new(
        name: impl Into<String>,
        status: Status,
        note: impl Into<String>,
        todo: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            status,
            note: note.into(),
            todo: todo.into(),
        }
    }
}

/// A named, ordered group of items rendered after the main checklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub name: String,
    pub items: Vec<AuditItem>,
}

impl Section {
    pub fn new(name: impl Into<String>, items: Vec<AuditItem>) -> Self {
        Self {
            name: name.into(),
            items,
        }
    }
}

/// The three axis scores, each rounded to one decimal in `[0, 10]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Scores {
    pub visibility: f64,
    pub seo: f64,
    pub geo: f64,
}

/// The complete audit report.
///
/// Immutable once assembled; consumers render it but never modify it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Normalized scheme+host of the audited site.
    pub base_url: String,
    /// Main checklist in fixed rule order.
    pub main_items: Vec<AuditItem>,
    /// Auxiliary sections in insertion order.
    pub sections: Vec<Section>,
    /// Axis scores derived from the main checklist.
    pub scores: Scores,
    /// Ranked remediation shortlist, at most five entries drawn from
    /// `main_items` with status other than `Ok`.
    pub top_remediations: Vec<AuditItem>,
}

impl Report {
    /// First main-checklist item with `Fail` status, if any.
    pub fn first_failure(&self) -> Option<&AuditItem> {
        self.main_items.iter().find(|i| i.status == Status::Fail)
    }
}

/// Free-text blocks produced by the narrative collaborator.
///
/// Every field is empty when the narrative step failed or was skipped;
/// the technical report is delivered either way.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NarrativeResult {
    /// Plain-language explanation of the findings.
    pub explainer: String,
    /// Up to five one-sentence improvement tips.
    pub tips: Vec<String>,
    /// Short closing summary.
    pub summary: String,
}

impl NarrativeResult {
    /// True when no narrative content is available.
    pub fn is_empty(&self) -> bool {
        self.explainer.is_empty() && self.tips.is_empty() && self.summary.is_empty()
    }
}

/// Collapses whitespace and truncates to at most `max` characters,
/// appending an ellipsis when content was cut.
pub fn short(text: &str, max: usize) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= max {
        return collapsed;
    }
    let mut cut: String = collapsed.chars().take(max.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_badges() {
        assert_eq!(Status::Ok.badge(), "✅");
        assert_eq!(Status::Warn.badge(), "🟡");
        assert_eq!(Status::Fail.badge(), "❌");
        assert_eq!(Status::Na.badge(), "➖");
    }

    #[test]
    fn test_status_points() {
        assert_eq!(Status::Ok.points(), Some(2));
        assert_eq!(Status::Warn.points(), Some(1));
        assert_eq!(Status::Fail.points(), Some(0));
        assert_eq!(Status::Na.points(), None);
    }

    #[test]
    fn test_severity_rank() {
        assert!(Status::Fail.severity_rank() > Status::Warn.severity_rank());
        assert!(Status::Warn.severity_rank() > Status::Ok.severity_rank());
    }

    #[test]
    fn test_status_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Status::Warn).unwrap(), "\"warn\"");
        let parsed: Status = serde_json::from_str("\"fail\"").unwrap();
        assert_eq!(parsed, Status::Fail);
    }

    #[test]
    fn test_short_collapses_and_truncates() {
        assert_eq!(short("  a   b\n c ", 10), "a b c");
        let long = "x".repeat(50);
        let cut = short(&long, 10);
        assert_eq!(cut.chars().count(), 10);
        assert!(cut.ends_with('…'));
    }

    #[test]
    fn test_first_failure() {
        let report = Report {
            base_url: "https://example.com".to_string(),
            main_items: vec![
                AuditItem::new("A", Status::Ok, "", ""),
                AuditItem::new("B", Status::Fail, "broken", "fix"),
                AuditItem::new("C", Status::Fail, "", ""),
            ],
            sections: Vec::new(),
            scores: Scores::default(),
            top_remediations: Vec::new(),
        };
        assert_eq!(report.first_failure().map(|i| i.name.as_str()), Some("B"));
    }

    #[test]
    fn test_narrative_result_empty() {
        assert!(NarrativeResult::default().is_empty());
        let filled = NarrativeResult {
            explainer: "text".to_string(),
            tips: Vec::new(),
            summary: String::new(),
        };
        assert!(!filled.is_empty());
    }
}
