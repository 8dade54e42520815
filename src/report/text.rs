//! Line-oriented textual report and transport chunking.

use crate::models::{short, Report};
use url::Url;

/// Character budget per transport chunk.
pub const CHUNK_BUDGET: usize = 3500;

/// Host shown in headers, with port when one is declared.
pub fn display_host(base_url: &str) -> String {
    let Ok(parsed) = Url::parse(base_url) else {
        return base_url.to_string();
    };
    match (parsed.host_str(), parsed.port()) {
        (Some(host), Some(port)) => format!("{}:{}", host, port),
        (Some(host), None) => host.to_string(),
        _ => base_url.to_string(),
    }
}

/// Renders the report as a newline-joined text document.
///
/// `policy_advisory` adds the note that one of the policy files did not
/// answer, so the assessment is based on the available data.
pub fn render_text(report: &Report, policy_advisory: bool) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push(format!("Site audit: {}", display_host(&report.base_url)));
    if policy_advisory {
        lines.push(
            "Some files (llms.txt / ai.txt) may be missing; the assessment uses the \
             available data."
                .to_string(),
        );
    }

    lines.push(String::new());
    lines.push("Main checklist".to_string());
    lines.push("Criterion / Status / Observation / To-Do".to_string());
    for item in &report.main_items {
        lines.push(format!("{} {}", item.status.badge(), item.name));
        lines.push(format!("- {}", short(&item.note, 220)));
        lines.push(format!("- To-Do: {}", short(&item.todo, 220)));
        lines.push(String::new());
    }

    for section in &report.sections {
        lines.push(section.name.clone());
        for item in &section.items {
            lines.push(format!(
                "{} {} - {} - To-Do: {}",
                item.status.badge(),
                item.name,
                short(&item.note, 200),
                short(&item.todo, 160)
            ));
        }
        lines.push(String::new());
    }

    lines.push("Scores".to_string());
    lines.push(format!("• Visibility score: {:.1}/10", report.scores.visibility));
    lines.push(format!("• SEO score: {:.1}/10", report.scores.seo));
    lines.push(format!("• GEO score: {:.1}/10", report.scores.geo));

    lines.push(String::new());
    lines.push("Top-5 To-Dos (impact first)".to_string());
    for (index, item) in report.top_remediations.iter().enumerate() {
        lines.push(format!(
            "{}. {} {} - {}",
            index + 1,
            item.status.badge(),
            item.name,
            item.todo
        ));
    }

    lines.push(String::new());
    lines.push("Summary".to_string());
    match report.first_failure() {
        Some(item) => lines.push(format!(
            "1. Main problem: {} - {}",
            item.name.to_lowercase(),
            item.note
        )),
        None => lines.push("1. No critical issues found at this level of checks.".to_string()),
    }
    lines.push("2. Key priority for the next 14 days: close the Top-5 To-Dos.".to_string());

    lines.join("\n")
}

/// Packs lines greedily into chunks of at most `budget` characters.
///
/// A line is never split; a chunk closes when appending the next line
/// would exceed the budget. Joining the chunks with `\n` reproduces the
/// input exactly.
pub fn chunk_text(text: &str, budget: usize) -> Vec<String> {
    let mut chunks: Vec<String> = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut current_len = 0usize;

    for line in text.split('\n') {
        let line_len = line.chars().count();
        if !current.is_empty() && current_len + line_len + 1 > budget {
            chunks.push(current.join("\n"));
            current.clear();
            current_len = 0;
        }
        current.push(line);
        current_len += line_len + 1;
    }

    if !current.is_empty() {
        chunks.push(current.join("\n"));
    }

    chunks
}
