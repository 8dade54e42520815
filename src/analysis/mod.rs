//! Score aggregation and remediation ranking.

pub mod priority;
pub mod scoring;

pub use priority::top_remediations;
pub use scoring::compute_scores;
