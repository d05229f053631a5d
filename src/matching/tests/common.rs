use std::collections::BTreeSet;
use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::matching::catalogue::{Catalogue, CatalogueError, CatalogueProvider};
use crate::matching::domain::{
    BorrowerProfile, EligibilityCriteria, EmploymentType, LenderCategory, LenderOffer, OfferId,
};
use crate::matching::engine::{RecommendationEngine, ScoringPolicy};
use crate::matching::router::matching_router;
use crate::matching::service::RecommendationService;

/// Spec-example borrower: comfortably qualified salaried applicant.
pub(super) fn borrower() -> BorrowerProfile {
    BorrowerProfile {
        credit_score: 720,
        monthly_income: 30_000.0,
        age: 35,
        employment_type: EmploymentType::Salaried,
        requested_amount: 500_000.0,
        requested_term_months: 36,
        purpose: "home renovation".to_string(),
    }
}

pub(super) fn criteria() -> EligibilityCriteria {
    EligibilityCriteria {
        min_credit_score: 650,
        min_monthly_income: 25_000.0,
        max_age: 65,
        allowed_employment_types: BTreeSet::from([
            EmploymentType::Salaried,
            EmploymentType::SelfEmployed,
        ]),
    }
}

/// Offer the spec-example borrower fully qualifies for.
pub(super) fn standard_offer() -> LenderOffer {
    LenderOffer {
        id: OfferId("std-loan".to_string()),
        name: "Standard Bank Loan".to_string(),
        category: LenderCategory::Bank,
        interest_rate_annual_percent: 8.5,
        min_amount: 50_000.0,
        max_amount: 1_000_000.0,
        max_term_months: 60,
        processing_fee_percent: 1.0,
        eligibility: criteria(),
        features: vec!["No prepayment penalty".to_string()],
        rating: 4.5,
        review_count: 1_000,
        processing_time_label: "2 days".to_string(),
    }
}

/// Builder for batch tests: vary id, rate, and rating while keeping the
/// borrower fully eligible.
pub(super) fn offer_with(id: &str, rate: f64, rating: f32) -> LenderOffer {
    let mut offer = standard_offer();
    offer.id = OfferId(id.to_string());
    offer.name = format!("Lender {id}");
    offer.interest_rate_annual_percent = rate;
    offer.rating = rating;
    offer
}

pub(super) fn engine() -> RecommendationEngine {
    RecommendationEngine::default()
}

pub(super) fn build_service() -> RecommendationService<Catalogue> {
    RecommendationService::new(Arc::new(Catalogue::bundled()), ScoringPolicy::default())
}

pub(super) fn router_with_offers(offers: Vec<LenderOffer>) -> axum::Router {
    let service = RecommendationService::new(
        Arc::new(Catalogue::new(offers)),
        ScoringPolicy::default(),
    );
    matching_router(Arc::new(service))
}

/// Provider whose snapshot always fails, for upstream-error paths.
pub(super) struct BrokenCatalogue;

impl CatalogueProvider for BrokenCatalogue {
    fn snapshot(&self) -> Result<Vec<LenderOffer>, CatalogueError> {
        Err(CatalogueError::MalformedRow {
            row: "export-17".to_string(),
            reason: "upstream export truncated".to_string(),
        })
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
