//! Exported audit document.
//!
//! Renders the report (and the narrative blocks, when present) as a
//! multi-section Markdown artifact with one four-column table per
//! section, plus a JSON export of the raw report value.

use crate::models::{short, AuditItem, NarrativeResult, Report};
use crate::report::text::display_host;
use anyhow::Result;
use chrono::{DateTime, Utc};

/// Generate the complete Markdown document.
pub fn generate_markdown_document(
    report: &Report,
    narrative: &NarrativeResult,
    generated_at: DateTime<Utc>,
) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "# Site Audit: {}\n\n",
        display_host(&report.base_url)
    ));
    output.push_str(&format!("- **Base URL:** {}\n", report.base_url));
    output.push_str(&format!(
        "- **Generated:** {}\n\n",
        generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    output.push_str(&generate_scores_section(report));
    output.push_str(&generate_items_table("Main Checklist", &report.main_items));
    for section in &report.sections {
        output.push_str(&generate_items_table(&section.name, &section.items));
    }
    output.push_str(&generate_top_section(report));
    output.push_str(&generate_narrative_section(narrative));
    output.push_str(&generate_footer());

    output
}

/// Generate the scores table.
fn generate_scores_section(report: &Report) -> String {
    let mut section = String::new();

    section.push_str("## Scores\n\n");
    section.push_str("| Axis | Score |\n");
    section.push_str("|:---|:---:|\n");
    section.push_str(&format!("| Visibility | {:.1}/10 |\n", report.scores.visibility));
    section.push_str(&format!("| SEO | {:.1}/10 |\n", report.scores.seo));
    section.push_str(&format!("| GEO | {:.1}/10 |\n\n", report.scores.geo));

    section
}

/// Generate one four-column table for a group of items.
fn generate_items_table(title: &str, items: &[AuditItem]) -> String {
    let mut section = String::new();

    section.push_str(&format!("## {}\n\n", title));
    section.push_str("| Criterion | Status | Observation | Remediation |\n");
    section.push_str("|:---|:---:|:---|:---|\n");

    for item in items {
        section.push_str(&format!(
            "| {} | {} {} | {} | {} |\n",
            cell(&item.name, 60),
            item.status.badge(),
            item.status,
            cell(&item.note, 220),
            cell(&item.todo, 220)
        ));
    }
    section.push('\n');

    section
}

/// Generate the remediation shortlist.
fn generate_top_section(report: &Report) -> String {
    if report.top_remediations.is_empty() {
        return String::new();
    }

    let mut section = String::new();
    section.push_str("## Top-5 To-Dos\n\n");
    for (index, item) in report.top_remediations.iter().enumerate() {
        section.push_str(&format!(
            "{}. {} **{}** - {}\n",
            index + 1,
            item.status.badge(),
            item.name,
            cell(&item.todo, 220)
        ));
    }
    section.push('\n');

    section
}

/// Generate the narrative blocks, when any are present.
fn generate_narrative_section(narrative: &NarrativeResult) -> String {
    if narrative.is_empty() {
        return String::new();
    }

    let mut section = String::new();

    if !narrative.explainer.is_empty() {
        section.push_str("## Plain-Language Explanation\n\n");
        section.push_str(narrative.explainer.trim());
        section.push_str("\n\n");
    }

    if !narrative.tips.is_empty() {
        section.push_str("## Five Tips\n\n");
        for (index, tip) in narrative.tips.iter().enumerate() {
            section.push_str(&format!("{}. {}\n", index + 1, tip));
        }
        section.push('\n');
    }

    if !narrative.summary.is_empty() {
        section.push_str("## Overall Conclusion\n\n");
        section.push_str(narrative.summary.trim());
        section.push_str("\n\n");
    }

    section
}

fn generate_footer() -> String {
    "---\n\n*Report generated by aiready*\n".to_string()
}

/// Table cell: display-bounded, pipes escaped.
fn cell(text: &str, max: usize) -> String {
    short(text, max).replace('|', "\\|")
}

/// Generate a JSON export of the report.
pub fn generate_json_report(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::RawSignalBundle;
    use crate::{report, rules};

    fn sample() -> (Report, NarrativeResult) {
        let bundle = RawSignalBundle::empty("https://example.com");
        let report = report::assemble("https://example.com", rules::evaluate(&bundle));
        let narrative = NarrativeResult {
            explainer: "The site is hard for AI assistants to read.".to_string(),
            tips: vec!["Publish llms.txt.".to_string(), "Add an FAQ.".to_string()],
            summary: "Fix the policy file first.".to_string(),
        };
        (report, narrative)
    }

    #[test]
    fn test_document_contains_tables_and_narrative() {
        let (report, narrative) = sample();
        let document = generate_markdown_document(&report, &narrative, Utc::now());

        assert!(document.contains("# Site Audit: example.com"));
        assert!(document.contains("## Scores"));
        assert!(document.contains("## Main Checklist"));
        assert!(document.contains("| Criterion | Status | Observation | Remediation |"));
        assert!(document.contains(rules::sections::SNIPPETABILITY));
        assert!(document.contains("## Plain-Language Explanation"));
        assert!(document.contains("1. Publish llms.txt."));
        assert!(document.contains("## Overall Conclusion"));
    }

    #[test]
    fn test_empty_narrative_is_omitted() {
        let (report, _) = sample();
        let document =
            generate_markdown_document(&report, &NarrativeResult::default(), Utc::now());

        assert!(!document.contains("Plain-Language Explanation"));
        assert!(!document.contains("Five Tips"));
        assert!(document.contains("## Main Checklist"));
    }

    #[test]
    fn test_cell_escapes_pipes() {
        assert_eq!(cell("a | b", 50), "a \\| b");
    }

    #[test]
    fn test_json_export() {
        let (report, _) = sample();
        let json = generate_json_report(&report).unwrap();
        assert!(json.contains("\"base_url\""));
        assert!(json.contains("\"main_items\""));
        assert!(json.contains("\"top_remediations\""));
    }
}
