use super::super::domain::{BorrowerProfile, EligibilityVerdict, LenderOffer};
use super::config::ScoringPolicy;

pub(crate) struct Classification {
    pub verdict: EligibilityVerdict,
    pub reasons: Vec<String>,
    pub within_amount_range: bool,
    pub within_term_limit: bool,
}

/// Evaluate the four borrower predicates plus amount/term range fit and
/// bucket them into a verdict. Reason strings are pure functions of the
/// inputs so identical calls produce identical trails.
pub(crate) fn classify(
    profile: &BorrowerProfile,
    offer: &LenderOffer,
    policy: &ScoringPolicy,
) -> Classification {
    let criteria = &offer.eligibility;
    let mut reasons = Vec::new();
    let mut failures: u8 = 0;

    if profile.credit_score >= criteria.min_credit_score {
        let margin = profile.credit_score - criteria.min_credit_score;
        if margin > 0 {
            reasons.push(format!("Credit score exceeds requirement by {margin} points"));
        } else {
            reasons.push("Credit score meets the minimum requirement".to_string());
        }
    } else {
        failures += 1;
        reasons.push(format!(
            "Minimum credit score not met ({} below {})",
            profile.credit_score, criteria.min_credit_score
        ));
    }

    if profile.monthly_income >= criteria.min_monthly_income {
        reasons.push(format!(
            "Monthly income {:.0} meets the {:.0} requirement",
            profile.monthly_income, criteria.min_monthly_income
        ));
    } else {
        failures += 1;
        reasons.push(format!(
            "Minimum monthly income not met ({:.0} below {:.0})",
            profile.monthly_income, criteria.min_monthly_income
        ));
    }

    if profile.age <= criteria.max_age {
        reasons.push(format!(
            "Age {} is within the lender's limit of {}",
            profile.age, criteria.max_age
        ));
    } else {
        failures += 1;
        reasons.push(format!(
            "Age {} exceeds the lender's limit of {}",
            profile.age, criteria.max_age
        ));
    }

    if criteria
        .allowed_employment_types
        .contains(&profile.employment_type)
    {
        reasons.push(format!(
            "{} applicants are accepted",
            profile.employment_type.label()
        ));
    } else {
        failures += 1;
        reasons.push(format!(
            "{} applicants are not accepted",
            profile.employment_type.label()
        ));
    }

    let within_amount_range =
        profile.requested_amount >= offer.min_amount && profile.requested_amount <= offer.max_amount;
    if !within_amount_range {
        reasons.push(format!(
            "Requested amount {:.0} is outside the supported {:.0}-{:.0} range",
            profile.requested_amount, offer.min_amount, offer.max_amount
        ));
    }

    let within_term_limit = profile.requested_term_months <= offer.max_term_months;
    if !within_term_limit {
        reasons.push(format!(
            "Requested term of {} months exceeds the {}-month maximum",
            profile.requested_term_months, offer.max_term_months
        ));
    }

    let verdict = if failures == 0 {
        if within_amount_range && within_term_limit {
            EligibilityVerdict::Eligible
        } else {
            // Borrower qualifies personally but must adjust amount or term.
            EligibilityVerdict::PartiallyEligible
        }
    } else if failures >= policy.not_eligible_failure_threshold {
        EligibilityVerdict::NotEligible
    } else {
        EligibilityVerdict::PartiallyEligible
    };

    Classification {
        verdict,
        reasons,
        within_amount_range,
        within_term_limit,
    }
}
