use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::catalogue::CatalogueProvider;
use super::domain::{BorrowerProfile, LenderCategory, OfferId, Recommendation};
use super::engine::EngineError;
use super::service::{LenderSummaryView, RecommendationService, RecommendationServiceError};

/// Router builder exposing the recommendation and catalogue endpoints.
pub fn matching_router<C>(service: Arc<RecommendationService<C>>) -> Router
where
    C: CatalogueProvider + 'static,
{
    Router::new()
        .route("/api/v1/recommendations", post(recommend_handler::<C>))
        .route("/api/v1/lenders", get(lenders_handler::<C>))
        .route("/api/v1/lenders/:lender_id", get(lender_handler::<C>))
        .route(
            "/api/v1/catalogue/statistics",
            get(statistics_handler::<C>),
        )
        .with_state(service)
}

#[derive(Debug, Serialize)]
struct RecommendationResponse {
    generated_at: DateTime<Utc>,
    total: usize,
    recommendations: Vec<Recommendation>,
}

pub(crate) async fn recommend_handler<C>(
    State(service): State<Arc<RecommendationService<C>>>,
    axum::Json(profile): axum::Json<BorrowerProfile>,
) -> Response
where
    C: CatalogueProvider + 'static,
{
    match service.recommend(&profile) {
        Ok(recommendations) => {
            let body = RecommendationResponse {
                generated_at: Utc::now(),
                total: recommendations.len(),
                recommendations,
            };
            (StatusCode::OK, axum::Json(body)).into_response()
        }
        Err(RecommendationServiceError::Engine(error @ EngineError::InvalidProfile(_))) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(RecommendationServiceError::Engine(EngineError::EmptyCatalogue)) => {
            let payload = json!({ "error": "no lender offers available" });
            (StatusCode::SERVICE_UNAVAILABLE, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct LenderListParams {
    category: Option<String>,
    q: Option<String>,
}

#[derive(Debug, Serialize)]
struct LenderListResponse {
    total: usize,
    lenders: Vec<LenderSummaryView>,
}

pub(crate) async fn lenders_handler<C>(
    State(service): State<Arc<RecommendationService<C>>>,
    Query(params): Query<LenderListParams>,
) -> Response
where
    C: CatalogueProvider + 'static,
{
    let category = match params.category.as_deref() {
        Some(raw) => match LenderCategory::parse(raw) {
            Some(category) => Some(category),
            None => {
                let payload = json!({ "error": format!("unknown lender category '{raw}'") });
                return (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response();
            }
        },
        None => None,
    };

    match service.lenders(category, params.q.as_deref()) {
        Ok(lenders) => {
            let body = LenderListResponse {
                total: lenders.len(),
                lenders,
            };
            (StatusCode::OK, axum::Json(body)).into_response()
        }
        Err(error) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn lender_handler<C>(
    State(service): State<Arc<RecommendationService<C>>>,
    Path(lender_id): Path<String>,
) -> Response
where
    C: CatalogueProvider + 'static,
{
    let id = OfferId(lender_id);
    match service.lender(&id) {
        Ok(Some(offer)) => (StatusCode::OK, axum::Json(offer)).into_response(),
        Ok(None) => {
            let payload = json!({ "error": format!("lender '{id}' not found") });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(error) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn statistics_handler<C>(
    State(service): State<Arc<RecommendationService<C>>>,
) -> Response
where
    C: CatalogueProvider + 'static,
{
    match service.statistics() {
        Ok(statistics) => (StatusCode::OK, axum::Json(statistics)).into_response(),
        Err(error) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
