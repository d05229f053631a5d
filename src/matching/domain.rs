use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier wrapper for lender offers in the catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OfferId(pub String);

impl fmt::Display for OfferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Employment categories lenders screen against. Closed set so criteria
/// comparisons stay exact rather than string-matched.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentType {
    Salaried,
    SelfEmployed,
    Business,
    Student,
    Retired,
}

impl EmploymentType {
    pub const fn label(self) -> &'static str {
        match self {
            EmploymentType::Salaried => "salaried",
            EmploymentType::SelfEmployed => "self_employed",
            EmploymentType::Business => "business",
            EmploymentType::Student => "student",
            EmploymentType::Retired => "retired",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "salaried" => Some(EmploymentType::Salaried),
            "self_employed" | "self-employed" => Some(EmploymentType::SelfEmployed),
            "business" => Some(EmploymentType::Business),
            "student" => Some(EmploymentType::Student),
            "retired" => Some(EmploymentType::Retired),
            _ => None,
        }
    }
}

/// Institutional category of a lender, mirroring the RBI register split.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum LenderCategory {
    Bank,
    Nbfc,
    Cooperative,
    Microfinance,
}

impl LenderCategory {
    pub const fn label(self) -> &'static str {
        match self {
            LenderCategory::Bank => "bank",
            LenderCategory::Nbfc => "nbfc",
            LenderCategory::Cooperative => "cooperative",
            LenderCategory::Microfinance => "microfinance",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "bank" => Some(LenderCategory::Bank),
            "nbfc" => Some(LenderCategory::Nbfc),
            "cooperative" => Some(LenderCategory::Cooperative),
            "microfinance" => Some(LenderCategory::Microfinance),
            _ => None,
        }
    }
}

/// Borrower snapshot submitted with a loan request. Immutable for the
/// lifetime of one recommendation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BorrowerProfile {
    pub credit_score: u16,
    pub monthly_income: f64,
    pub age: u8,
    pub employment_type: EmploymentType,
    pub requested_amount: f64,
    pub requested_term_months: u32,
    #[serde(default)]
    pub purpose: String,
}

/// Thresholds a borrower must clear for a given lender.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EligibilityCriteria {
    pub min_credit_score: u16,
    pub min_monthly_income: f64,
    pub max_age: u8,
    pub allowed_employment_types: BTreeSet<EmploymentType>,
}

/// One lender product from the catalogue. Read-only input to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LenderOffer {
    pub id: OfferId,
    pub name: String,
    pub category: LenderCategory,
    pub interest_rate_annual_percent: f64,
    pub min_amount: f64,
    pub max_amount: f64,
    pub max_term_months: u32,
    pub processing_fee_percent: f64,
    pub eligibility: EligibilityCriteria,
    pub features: Vec<String>,
    pub rating: f32,
    pub review_count: u32,
    pub processing_time_label: String,
}

/// Tri-state eligibility outcome. Never free-form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EligibilityVerdict {
    Eligible,
    PartiallyEligible,
    NotEligible,
}

impl EligibilityVerdict {
    pub const fn label(self) -> &'static str {
        match self {
            EligibilityVerdict::Eligible => "eligible",
            EligibilityVerdict::PartiallyEligible => "partially_eligible",
            EligibilityVerdict::NotEligible => "not_eligible",
        }
    }
}

/// Engine output for a single offer: score, verdict trail, and repayment
/// economics. Computed on demand and never persisted here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub offer: LenderOffer,
    pub match_score: u8,
    pub verdict: EligibilityVerdict,
    pub reasons: Vec<String>,
    pub estimated_emi: f64,
    pub total_interest: f64,
}
