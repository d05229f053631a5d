//! Loan-lender matching: eligibility classification, batch scoring, and the
//! catalogue plumbing around them.
//!
//! The engine itself is a pure computation; the catalogue provider and HTTP
//! router are the seams to the outside world.

pub mod catalogue;
pub mod domain;
pub mod engine;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use catalogue::{Catalogue, CatalogueError, CatalogueProvider, CatalogueStatistics};
pub use domain::{
    BorrowerProfile, EligibilityCriteria, EligibilityVerdict, EmploymentType, LenderCategory,
    LenderOffer, OfferId, Recommendation,
};
pub use engine::{EngineError, RecommendationEngine, ScoringPolicy};
pub use router::matching_router;
pub use service::{LenderSummaryView, RecommendationService, RecommendationServiceError};
