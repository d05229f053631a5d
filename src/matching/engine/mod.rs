mod amortization;
mod config;
mod rules;

pub use config::ScoringPolicy;

use std::cmp::Ordering;

use super::domain::{
    BorrowerProfile, EligibilityVerdict, LenderOffer, OfferId, Recommendation,
};

/// Stateless engine applying the scoring policy to a borrower profile and a
/// read-only catalogue snapshot. Pure computation: no I/O, no shared state,
/// safe to call from any number of handlers at once.
pub struct RecommendationEngine {
    policy: ScoringPolicy,
}

impl Default for RecommendationEngine {
    fn default() -> Self {
        Self::new(ScoringPolicy::default())
    }
}

impl RecommendationEngine {
    pub fn new(policy: ScoringPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ScoringPolicy {
        &self.policy
    }

    /// Classify a single borrower/offer pair, returning the verdict and its
    /// deterministic reason trail.
    pub fn classify(
        &self,
        profile: &BorrowerProfile,
        offer: &LenderOffer,
    ) -> Result<(EligibilityVerdict, Vec<String>), EngineError> {
        validate_profile(profile)?;
        validate_offer(offer)?;

        let classification = rules::classify(profile, offer, &self.policy);
        Ok((classification.verdict, classification.reasons))
    }

    /// Score every offer in the batch and return recommendations ordered by
    /// descending match score.
    ///
    /// Rate competitiveness is batch-relative, so this runs in two passes:
    /// the first collects the rate spread across the candidate set, the
    /// second scores each offer against those statistics.
    pub fn recommend(
        &self,
        profile: &BorrowerProfile,
        offers: &[LenderOffer],
    ) -> Result<Vec<Recommendation>, EngineError> {
        validate_profile(profile)?;

        if offers.is_empty() {
            return Err(EngineError::EmptyCatalogue);
        }
        for offer in offers {
            validate_offer(offer)?;
        }

        let mut min_rate = f64::INFINITY;
        let mut max_rate = f64::NEG_INFINITY;
        for offer in offers {
            min_rate = min_rate.min(offer.interest_rate_annual_percent);
            max_rate = max_rate.max(offer.interest_rate_annual_percent);
        }
        let rate_spread = max_rate - min_rate;

        let mut recommendations: Vec<Recommendation> = offers
            .iter()
            .map(|offer| self.score_offer(profile, offer, min_rate, rate_spread))
            .collect();

        recommendations.sort_by(|a, b| {
            b.match_score
                .cmp(&a.match_score)
                .then_with(|| {
                    a.offer
                        .interest_rate_annual_percent
                        .partial_cmp(&b.offer.interest_rate_annual_percent)
                        .unwrap_or(Ordering::Equal)
                })
                .then_with(|| {
                    b.offer
                        .rating
                        .partial_cmp(&a.offer.rating)
                        .unwrap_or(Ordering::Equal)
                })
                .then_with(|| a.offer.id.cmp(&b.offer.id))
        });

        Ok(recommendations)
    }

    fn score_offer(
        &self,
        profile: &BorrowerProfile,
        offer: &LenderOffer,
        min_rate: f64,
        rate_spread: f64,
    ) -> Recommendation {
        let classification = rules::classify(profile, offer, &self.policy);

        let estimated_emi = amortization::monthly_installment(
            profile.requested_amount,
            offer.interest_rate_annual_percent,
            profile.requested_term_months,
        );
        let total_interest =
            amortization::total_interest(estimated_emi, profile.requested_amount, profile.requested_term_months);

        let base = match classification.verdict {
            EligibilityVerdict::Eligible => self.policy.eligible_base,
            EligibilityVerdict::PartiallyEligible => self.policy.partially_eligible_base,
            EligibilityVerdict::NotEligible => self.policy.not_eligible_base,
        };

        // Best rate in the batch earns full points; the worst earns none.
        // A flat batch leaves nothing to discriminate on, so every offer
        // keeps the full allotment.
        let rate_points = if rate_spread > 0.0 {
            self.policy.rate_weight
                * (1.0 - (offer.interest_rate_annual_percent - min_rate) / rate_spread)
        } else {
            self.policy.rate_weight
        };

        let reputation = (offer.rating as f64 / 5.0) * self.policy.reputation_weight;

        let fit = if classification.within_amount_range && classification.within_term_limit {
            self.policy.fit_weight
        } else {
            0.0
        };

        let match_score = (base + rate_points + reputation + fit).clamp(0.0, 100.0).round() as u8;

        Recommendation {
            offer: offer.clone(),
            match_score,
            verdict: classification.verdict,
            reasons: classification.reasons,
            estimated_emi,
            total_interest,
        }
    }
}

/// Input validation failures surfaced before any scoring begins. A single
/// malformed offer fails the whole batch so the catalogue provider has to
/// sanitize upstream rather than rely on silent skipping.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    #[error("invalid borrower profile: {0}")]
    InvalidProfile(String),
    #[error("invalid lender offer {id}: {reason}")]
    InvalidOffer { id: OfferId, reason: String },
    #[error("lender catalogue is empty")]
    EmptyCatalogue,
}

fn validate_profile(profile: &BorrowerProfile) -> Result<(), EngineError> {
    if !(300..=900).contains(&profile.credit_score) {
        return Err(EngineError::InvalidProfile(format!(
            "credit score {} outside the 300-900 band",
            profile.credit_score
        )));
    }
    if !profile.monthly_income.is_finite() || profile.monthly_income < 0.0 {
        return Err(EngineError::InvalidProfile(
            "monthly income must be a non-negative amount".to_string(),
        ));
    }
    if profile.age == 0 {
        return Err(EngineError::InvalidProfile("age must be positive".to_string()));
    }
    if !profile.requested_amount.is_finite() || profile.requested_amount <= 0.0 {
        return Err(EngineError::InvalidProfile(
            "requested amount must be positive".to_string(),
        ));
    }
    if profile.requested_term_months == 0 {
        return Err(EngineError::InvalidProfile(
            "requested term must be at least one month".to_string(),
        ));
    }
    Ok(())
}

fn validate_offer(offer: &LenderOffer) -> Result<(), EngineError> {
    let invalid = |reason: &str| EngineError::InvalidOffer {
        id: offer.id.clone(),
        reason: reason.to_string(),
    };

    if !offer.interest_rate_annual_percent.is_finite() || offer.interest_rate_annual_percent < 0.0 {
        return Err(invalid("interest rate must be non-negative"));
    }
    if !offer.min_amount.is_finite() || !offer.max_amount.is_finite() || offer.min_amount < 0.0 {
        return Err(invalid("amount range must be non-negative"));
    }
    if offer.min_amount > offer.max_amount {
        return Err(invalid("minimum amount exceeds maximum amount"));
    }
    if offer.max_term_months == 0 {
        return Err(invalid("maximum term must be at least one month"));
    }
    if !offer.processing_fee_percent.is_finite() || offer.processing_fee_percent < 0.0 {
        return Err(invalid("processing fee must be non-negative"));
    }
    if !(0.0f32..=5.0).contains(&offer.rating) {
        return Err(invalid("rating must fall within 0-5"));
    }
    if !offer.eligibility.min_monthly_income.is_finite()
        || offer.eligibility.min_monthly_income < 0.0
    {
        return Err(invalid("minimum income criterion must be non-negative"));
    }
    Ok(())
}
