use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::domain::{EligibilityCriteria, EmploymentType, LenderCategory, LenderOffer, OfferId};

/// Read-only snapshot of lender offers for one or more recommendation
/// requests. The service never mutates it after construction.
#[derive(Debug, Clone)]
pub struct Catalogue {
    offers: Vec<LenderOffer>,
}

/// Seam so routes and tests can swap the offer source without touching the
/// engine.
pub trait CatalogueProvider: Send + Sync {
    fn snapshot(&self) -> Result<Vec<LenderOffer>, CatalogueError>;
}

impl CatalogueProvider for Catalogue {
    fn snapshot(&self) -> Result<Vec<LenderOffer>, CatalogueError> {
        Ok(self.offers.clone())
    }
}

impl Catalogue {
    pub fn new(offers: Vec<LenderOffer>) -> Self {
        Self { offers }
    }

    pub fn offers(&self) -> &[LenderOffer] {
        &self.offers
    }

    pub fn is_empty(&self) -> bool {
        self.offers.is_empty()
    }

    pub fn find(&self, id: &OfferId) -> Option<&LenderOffer> {
        self.offers.iter().find(|offer| &offer.id == id)
    }

    /// Case-insensitive substring search over lender names.
    pub fn search(&self, query: &str) -> Vec<&LenderOffer> {
        let needle = query.trim().to_ascii_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.offers
            .iter()
            .filter(|offer| offer.name.to_ascii_lowercase().contains(&needle))
            .collect()
    }

    pub fn by_category(&self, category: LenderCategory) -> Vec<&LenderOffer> {
        self.offers
            .iter()
            .filter(|offer| offer.category == category)
            .collect()
    }

    pub fn statistics(&self) -> CatalogueStatistics {
        let mut by_category: BTreeMap<String, usize> = BTreeMap::new();
        let mut lowest_rate: Option<f64> = None;
        let mut highest_rating: Option<f32> = None;

        for offer in &self.offers {
            *by_category.entry(offer.category.label().to_string()).or_default() += 1;
            lowest_rate = Some(match lowest_rate {
                Some(rate) => rate.min(offer.interest_rate_annual_percent),
                None => offer.interest_rate_annual_percent,
            });
            highest_rating = Some(match highest_rating {
                Some(rating) => rating.max(offer.rating),
                None => offer.rating,
            });
        }

        CatalogueStatistics {
            total_offers: self.offers.len(),
            by_category,
            lowest_rate,
            highest_rating,
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogueError> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogueError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut offers = Vec::new();
        for record in csv_reader.deserialize::<CatalogueRow>() {
            let row = record?;
            offers.push(row.into_offer()?);
        }

        Ok(Self::new(offers))
    }

    /// Bundled reference catalogue used when no CSV path is configured, so
    /// demos and the one-shot CLI work out of the box.
    pub fn bundled() -> Self {
        fn all_types() -> BTreeSet<EmploymentType> {
            BTreeSet::from([
                EmploymentType::Salaried,
                EmploymentType::SelfEmployed,
                EmploymentType::Business,
                EmploymentType::Student,
                EmploymentType::Retired,
            ])
        }

        Self::new(vec![
            LenderOffer {
                id: OfferId("hdb-personal".to_string()),
                name: "Horizon Bank Personal Loan".to_string(),
                category: LenderCategory::Bank,
                interest_rate_annual_percent: 10.5,
                min_amount: 50_000.0,
                max_amount: 2_000_000.0,
                max_term_months: 60,
                processing_fee_percent: 1.0,
                eligibility: EligibilityCriteria {
                    min_credit_score: 700,
                    min_monthly_income: 30_000.0,
                    max_age: 60,
                    allowed_employment_types: BTreeSet::from([
                        EmploymentType::Salaried,
                        EmploymentType::SelfEmployed,
                    ]),
                },
                features: vec![
                    "No prepayment penalty after 12 months".to_string(),
                    "Doorstep document pickup".to_string(),
                ],
                rating: 4.4,
                review_count: 18_230,
                processing_time_label: "2-3 business days".to_string(),
            },
            LenderOffer {
                id: OfferId("svn-flexi".to_string()),
                name: "Srivan Finance FlexiLoan".to_string(),
                category: LenderCategory::Nbfc,
                interest_rate_annual_percent: 13.25,
                min_amount: 25_000.0,
                max_amount: 1_000_000.0,
                max_term_months: 48,
                processing_fee_percent: 2.0,
                eligibility: EligibilityCriteria {
                    min_credit_score: 650,
                    min_monthly_income: 20_000.0,
                    max_age: 65,
                    allowed_employment_types: BTreeSet::from([
                        EmploymentType::Salaried,
                        EmploymentType::SelfEmployed,
                        EmploymentType::Business,
                    ]),
                },
                features: vec![
                    "Same-day digital approval".to_string(),
                    "Part-payment allowed anytime".to_string(),
                ],
                rating: 4.1,
                review_count: 9_412,
                processing_time_label: "24 hours".to_string(),
            },
            LenderOffer {
                id: OfferId("ucs-society".to_string()),
                name: "Udaya Cooperative Credit Society".to_string(),
                category: LenderCategory::Cooperative,
                interest_rate_annual_percent: 11.75,
                min_amount: 10_000.0,
                max_amount: 500_000.0,
                max_term_months: 36,
                processing_fee_percent: 0.5,
                eligibility: EligibilityCriteria {
                    min_credit_score: 600,
                    min_monthly_income: 15_000.0,
                    max_age: 70,
                    allowed_employment_types: all_types(),
                },
                features: vec!["Member dividend rebate on closure".to_string()],
                rating: 3.9,
                review_count: 1_872,
                processing_time_label: "5-7 business days".to_string(),
            },
            LenderOffer {
                id: OfferId("nav-micro".to_string()),
                name: "Navachar Microfinance".to_string(),
                category: LenderCategory::Microfinance,
                interest_rate_annual_percent: 17.5,
                min_amount: 5_000.0,
                max_amount: 150_000.0,
                max_term_months: 24,
                processing_fee_percent: 1.5,
                eligibility: EligibilityCriteria {
                    min_credit_score: 550,
                    min_monthly_income: 8_000.0,
                    max_age: 60,
                    allowed_employment_types: BTreeSet::from([
                        EmploymentType::SelfEmployed,
                        EmploymentType::Business,
                    ]),
                },
                features: vec![
                    "Weekly repayment option".to_string(),
                    "No collateral required".to_string(),
                ],
                rating: 4.0,
                review_count: 3_540,
                processing_time_label: "48 hours".to_string(),
            },
            LenderOffer {
                id: OfferId("mdb-prime".to_string()),
                name: "Meridian Bank Prime Advance".to_string(),
                category: LenderCategory::Bank,
                interest_rate_annual_percent: 9.75,
                min_amount: 100_000.0,
                max_amount: 3_000_000.0,
                max_term_months: 72,
                processing_fee_percent: 0.75,
                eligibility: EligibilityCriteria {
                    min_credit_score: 750,
                    min_monthly_income: 50_000.0,
                    max_age: 58,
                    allowed_employment_types: BTreeSet::from([EmploymentType::Salaried]),
                },
                features: vec![
                    "Preferential rate for existing customers".to_string(),
                    "Free foreclosure after 24 months".to_string(),
                ],
                rating: 4.6,
                review_count: 25_104,
                processing_time_label: "3-5 business days".to_string(),
            },
        ])
    }
}

/// Aggregate view over the catalogue, mirroring the statistics the upstream
/// register exposes per classification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogueStatistics {
    pub total_offers: usize,
    pub by_category: BTreeMap<String, usize>,
    pub lowest_rate: Option<f64>,
    pub highest_rating: Option<f32>,
}

/// Catalogue ingestion failures. A malformed row names the offending row so
/// the data owner can fix the export.
#[derive(Debug, thiserror::Error)]
pub enum CatalogueError {
    #[error("failed to read catalogue: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse catalogue csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("malformed catalogue row '{row}': {reason}")]
    MalformedRow { row: String, reason: String },
}

#[derive(Debug, Deserialize)]
struct CatalogueRow {
    #[serde(rename = "Lender ID")]
    id: String,
    #[serde(rename = "Lender Name")]
    name: String,
    #[serde(rename = "Category")]
    category: String,
    #[serde(rename = "Interest Rate")]
    interest_rate_annual_percent: f64,
    #[serde(rename = "Min Amount")]
    min_amount: f64,
    #[serde(rename = "Max Amount")]
    max_amount: f64,
    #[serde(rename = "Max Term Months")]
    max_term_months: u32,
    #[serde(rename = "Processing Fee")]
    processing_fee_percent: f64,
    #[serde(rename = "Min Credit Score")]
    min_credit_score: u16,
    #[serde(rename = "Min Monthly Income")]
    min_monthly_income: f64,
    #[serde(rename = "Max Age")]
    max_age: u8,
    #[serde(rename = "Allowed Employment Types")]
    allowed_employment_types: String,
    #[serde(rename = "Features", default)]
    features: String,
    #[serde(rename = "Rating")]
    rating: f32,
    #[serde(rename = "Review Count", default)]
    review_count: u32,
    #[serde(rename = "Processing Time", default)]
    processing_time_label: String,
}

impl CatalogueRow {
    fn into_offer(self) -> Result<LenderOffer, CatalogueError> {
        let malformed = |reason: String| CatalogueError::MalformedRow {
            row: self.id.clone(),
            reason,
        };

        if self.id.is_empty() {
            return Err(CatalogueError::MalformedRow {
                row: self.name.clone(),
                reason: "missing lender id".to_string(),
            });
        }

        let category = LenderCategory::parse(&self.category)
            .ok_or_else(|| malformed(format!("unknown category '{}'", self.category)))?;

        let mut allowed_employment_types = BTreeSet::new();
        for token in self
            .allowed_employment_types
            .split('|')
            .map(str::trim)
            .filter(|token| !token.is_empty())
        {
            let employment = EmploymentType::parse(token)
                .ok_or_else(|| malformed(format!("unknown employment type '{token}'")))?;
            allowed_employment_types.insert(employment);
        }
        if allowed_employment_types.is_empty() {
            return Err(malformed("no allowed employment types".to_string()));
        }

        let features = self
            .features
            .split('|')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(str::to_string)
            .collect();

        Ok(LenderOffer {
            id: OfferId(self.id),
            name: self.name,
            category,
            interest_rate_annual_percent: self.interest_rate_annual_percent,
            min_amount: self.min_amount,
            max_amount: self.max_amount,
            max_term_months: self.max_term_months,
            processing_fee_percent: self.processing_fee_percent,
            eligibility: EligibilityCriteria {
                min_credit_score: self.min_credit_score,
                min_monthly_income: self.min_monthly_income,
                max_age: self.max_age,
                allowed_employment_types,
            },
            features,
            rating: self.rating,
            review_count: self.review_count,
            processing_time_label: self.processing_time_label,
        })
    }
}
