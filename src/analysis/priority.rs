//! Remediation shortlist ranking.
//!
//! Unresolved main-checklist items are ordered by severity first, then
//! by a fixed per-rule impact weight; ties keep the original checklist
//! order (stable sort).

use crate::models::{AuditItem, Status};
use crate::rules::names;
use std::cmp::Reverse;

/// Shortlist size.
pub const TOP_LIMIT: usize = 5;

/// Fixed impact weight per rule name; unlisted rules weigh 0.
pub fn name_weight(name: &str) -> u32 {
    match name {
        names::POLICY => 3,
        names::FAQ_HOWTO
        | names::WEB_VITALS
        | names::SCHEMA
        | names::SITEMAP
        | names::CRAWLING => 2,
        names::ANCHORS => 1,
        _ => 0,
    }
}

/// The top unresolved items, at most `limit`, drawn from `items` only.
pub fn top_remediations(items: &[AuditItem], limit: usize) -> Vec<AuditItem> {
    let mut open: Vec<&AuditItem> = items.iter().filter(|i| i.status != Status::Ok).collect();
    open.sort_by_key(|i| Reverse((i.status.severity_rank(), name_weight(&i.name))));
    open.into_iter().take(limit).cloned().collect()
}
