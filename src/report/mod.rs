//! Report assembly and rendering.

pub mod document;
pub mod text;

use crate::analysis::{compute_scores, priority::TOP_LIMIT, top_remediations};
use crate::models::Report;
use crate::rules::Evaluation;

/// Combines an evaluation into the immutable [`Report`] value.
pub fn assemble(base_url: &str, evaluation: Evaluation) -> Report {
    let scores = compute_scores(&evaluation.main_items);
    let top = top_remediations(&evaluation.main_items, TOP_LIMIT);

    Report {
        base_url: base_url.to_string(),
        main_items: evaluation.main_items,
        sections: evaluation.sections,
        scores,
        top_remediations: top,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::RawSignalBundle;
    use crate::models::Status;
    use crate::rules;

    #[test]
    fn test_assemble_invariants() {
        let bundle = RawSignalBundle::empty("https://example.com");
        let report = assemble("https://example.com", rules::evaluate(&bundle));

        assert_eq!(report.base_url, "https://example.com");
        assert!(report.top_remediations.len() <= 5);
        assert!(report
            .top_remediations
            .iter()
            .all(|i| i.status != Status::Ok));
        for item in &report.top_remediations {
            assert!(report.main_items.contains(item));
        }

        for score in [
            report.scores.visibility,
            report.scores.seo,
            report.scores.geo,
        ] {
            assert!((0.0..=10.0).contains(&score));
        }
    }

    #[test]
    fn test_policy_rule_tops_shortlist_for_degraded_site() {
        let mut bundle = RawSignalBundle::empty("https://example.com");
        bundle.robots.body = Some("User-agent: GPTBot\nAllow: /".to_string());
        bundle.robots.status = 200;
        bundle.internal_links_count = 5;

        let report = assemble("https://example.com", rules::evaluate(&bundle));
        assert_eq!(
            report.top_remediations.first().map(|i| i.name.as_str()),
            Some(rules::names::POLICY)
        );
    }
}
