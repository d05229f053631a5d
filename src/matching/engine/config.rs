use serde::{Deserialize, Serialize};

/// Policy table for the composite match score and the eligibility
/// bucketing boundary. Weights are data, not law: the illustrative
/// defaults can be tuned per deployment without touching the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringPolicy {
    pub eligible_base: f64,
    pub partially_eligible_base: f64,
    pub not_eligible_base: f64,
    pub rate_weight: f64,
    pub reputation_weight: f64,
    pub fit_weight: f64,
    /// Predicate failures at or above this count classify as not eligible;
    /// below it (but non-zero) the verdict is partially eligible.
    pub not_eligible_failure_threshold: u8,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            eligible_base: 60.0,
            partially_eligible_base: 35.0,
            not_eligible_base: 10.0,
            rate_weight: 20.0,
            reputation_weight: 15.0,
            fit_weight: 5.0,
            not_eligible_failure_threshold: 3,
        }
    }
}
