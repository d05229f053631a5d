use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use super::catalogue::{Catalogue, CatalogueError, CatalogueProvider, CatalogueStatistics};
use super::domain::{BorrowerProfile, LenderCategory, LenderOffer, OfferId, Recommendation};
use super::engine::{EngineError, RecommendationEngine, ScoringPolicy};

/// Facade composing the catalogue provider with the scoring engine so HTTP
/// routes and the CLI share one entry point.
pub struct RecommendationService<C> {
    catalogue: Arc<C>,
    engine: RecommendationEngine,
}

impl<C> RecommendationService<C>
where
    C: CatalogueProvider + 'static,
{
    pub fn new(catalogue: Arc<C>, policy: ScoringPolicy) -> Self {
        Self {
            catalogue,
            engine: RecommendationEngine::new(policy),
        }
    }

    /// Rank the current catalogue snapshot for a borrower.
    pub fn recommend(
        &self,
        profile: &BorrowerProfile,
    ) -> Result<Vec<Recommendation>, RecommendationServiceError> {
        let offers = self.catalogue.snapshot()?;
        let recommendations = self.engine.recommend(profile, &offers)?;
        debug!(
            offers = offers.len(),
            top_score = recommendations.first().map(|r| r.match_score),
            "scored lender catalogue"
        );
        Ok(recommendations)
    }

    /// Summary listing with optional category and name filters, for the
    /// catalogue browsing endpoints.
    pub fn lenders(
        &self,
        category: Option<LenderCategory>,
        query: Option<&str>,
    ) -> Result<Vec<LenderSummaryView>, RecommendationServiceError> {
        let offers = self.catalogue.snapshot()?;
        let needle = query.map(|q| q.trim().to_ascii_lowercase());

        let summaries = offers
            .iter()
            .filter(|offer| category.map_or(true, |wanted| offer.category == wanted))
            .filter(|offer| match needle.as_deref() {
                Some(needle) if !needle.is_empty() => {
                    offer.name.to_ascii_lowercase().contains(needle)
                }
                Some(_) => false,
                None => true,
            })
            .map(LenderSummaryView::from_offer)
            .collect();

        Ok(summaries)
    }

    pub fn lender(&self, id: &OfferId) -> Result<Option<LenderOffer>, RecommendationServiceError> {
        let offers = self.catalogue.snapshot()?;
        Ok(offers.into_iter().find(|offer| &offer.id == id))
    }

    pub fn statistics(&self) -> Result<CatalogueStatistics, RecommendationServiceError> {
        let offers = self.catalogue.snapshot()?;
        Ok(Catalogue::new(offers).statistics())
    }
}

/// Sanitized listing row for catalogue browsing responses.
#[derive(Debug, Clone, Serialize)]
pub struct LenderSummaryView {
    pub id: OfferId,
    pub name: String,
    pub category: &'static str,
    pub interest_rate_annual_percent: f64,
    pub rating: f32,
    pub review_count: u32,
    pub processing_time_label: String,
}

impl LenderSummaryView {
    fn from_offer(offer: &LenderOffer) -> Self {
        Self {
            id: offer.id.clone(),
            name: offer.name.clone(),
            category: offer.category.label(),
            interest_rate_annual_percent: offer.interest_rate_annual_percent,
            rating: offer.rating,
            review_count: offer.review_count,
            processing_time_label: offer.processing_time_label.clone(),
        }
    }
}

/// Error raised by the recommendation service facade.
#[derive(Debug, thiserror::Error)]
pub enum RecommendationServiceError {
    #[error(transparent)]
    Catalogue(#[from] CatalogueError),
    #[error(transparent)]
    Engine(#[from] EngineError),
}
