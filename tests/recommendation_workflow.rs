//! End-to-end scenarios for the loan matching service: engine semantics
//! through the public facade and the HTTP router, without reaching into
//! private modules.

mod common {
    use std::collections::BTreeSet;
    use std::sync::Arc;

    use loanmatch::matching::{
        matching_router, BorrowerProfile, Catalogue, EligibilityCriteria, EmploymentType,
        LenderCategory, LenderOffer, OfferId, RecommendationService, ScoringPolicy,
    };

    pub(super) fn borrower() -> BorrowerProfile {
        BorrowerProfile {
            credit_score: 720,
            monthly_income: 30_000.0,
            age: 35,
            employment_type: EmploymentType::Salaried,
            requested_amount: 500_000.0,
            requested_term_months: 36,
            purpose: "education".to_string(),
        }
    }

    pub(super) fn offer(id: &str, rate: f64, rating: f32) -> LenderOffer {
        LenderOffer {
            id: OfferId(id.to_string()),
            name: format!("Lender {id}"),
            category: LenderCategory::Bank,
            interest_rate_annual_percent: rate,
            min_amount: 50_000.0,
            max_amount: 1_000_000.0,
            max_term_months: 60,
            processing_fee_percent: 1.0,
            eligibility: EligibilityCriteria {
                min_credit_score: 650,
                min_monthly_income: 25_000.0,
                max_age: 65,
                allowed_employment_types: BTreeSet::from([EmploymentType::Salaried]),
            },
            features: vec!["Online servicing".to_string()],
            rating,
            review_count: 500,
            processing_time_label: "2 days".to_string(),
        }
    }

    pub(super) fn build_service(offers: Vec<LenderOffer>) -> RecommendationService<Catalogue> {
        RecommendationService::new(Arc::new(Catalogue::new(offers)), ScoringPolicy::default())
    }

    pub(super) fn build_router(offers: Vec<LenderOffer>) -> axum::Router {
        matching_router(Arc::new(build_service(offers)))
    }
}

mod engine {
    use super::common::*;
    use loanmatch::matching::{EligibilityVerdict, EngineError, RecommendationEngine};

    #[test]
    fn eligible_borrower_gets_ordered_recommendations() {
        let engine = RecommendationEngine::default();
        let offers = vec![
            offer("pricey", 14.0, 3.0),
            offer("fair", 10.5, 4.2),
            offer("best", 9.0, 4.6),
        ];

        let results = engine.recommend(&borrower(), &offers).expect("batch scores");

        assert_eq!(results[0].offer.id.0, "best");
        assert!(results
            .iter()
            .all(|r| r.verdict == EligibilityVerdict::Eligible));
        for pair in results.windows(2) {
            assert!(pair[0].match_score >= pair[1].match_score);
        }
    }

    #[test]
    fn repayment_economics_are_consistent() {
        let engine = RecommendationEngine::default();
        let profile = borrower();
        let results = engine
            .recommend(&profile, &[offer("solo", 8.5, 4.5)])
            .expect("batch scores");

        let top = &results[0];
        let repaid = top.estimated_emi * profile.requested_term_months as f64;
        assert!(repaid > profile.requested_amount);
        assert!((repaid - profile.requested_amount - top.total_interest).abs() < 1e-6);
    }

    #[test]
    fn empty_catalogue_is_refused() {
        let engine = RecommendationEngine::default();
        assert!(matches!(
            engine.recommend(&borrower(), &[]),
            Err(EngineError::EmptyCatalogue)
        ));
    }
}

mod service {
    use super::common::*;
    use loanmatch::matching::OfferId;

    #[test]
    fn facade_ranks_and_looks_up_offers() {
        let service = build_service(vec![offer("one", 10.0, 4.0), offer("two", 12.0, 3.0)]);

        let results = service.recommend(&borrower()).expect("recommendations");
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].offer.id.0, "one");

        let detail = service
            .lender(&OfferId("two".to_string()))
            .expect("lookup");
        assert!(detail.is_some());
    }
}

mod routing {
    use super::common::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    #[tokio::test]
    async fn recommendation_endpoint_round_trip() {
        let router = build_router(vec![offer("one", 10.0, 4.0), offer("two", 12.0, 3.0)]);

        let body = json!({
            "credit_score": 720,
            "monthly_income": 30000.0,
            "age": 35,
            "employment_type": "salaried",
            "requested_amount": 500000.0,
            "requested_term_months": 36,
            "purpose": "education"
        });

        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/recommendations")
                    .header("content-type", "application/json")
                    .body(Body::from(serde_json::to_vec(&body).expect("serialize")))
                    .expect("request"),
            )
            .await
            .expect("dispatch");

        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        let payload: Value = serde_json::from_slice(&bytes).expect("json");

        let recommendations = payload
            .get("recommendations")
            .and_then(Value::as_array)
            .expect("recommendations array");
        assert_eq!(recommendations.len(), 2);
        assert_eq!(
            recommendations[0]
                .get("offer")
                .and_then(|o| o.get("id"))
                .and_then(Value::as_str),
            Some("one")
        );
        assert!(recommendations[0]
            .get("reasons")
            .and_then(Value::as_array)
            .map(|reasons| !reasons.is_empty())
            .unwrap_or(false));
    }

    #[tokio::test]
    async fn lender_listing_round_trip() {
        let router = build_router(vec![offer("one", 10.0, 4.0)]);

        let response = router
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/api/v1/lenders")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("dispatch");

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        let payload: Value = serde_json::from_slice(&bytes).expect("json");
        assert_eq!(payload.get("total").and_then(Value::as_u64), Some(1));
    }
}
