use crate::models::{Plan, PlanType};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur when loading a plan catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid catalog format: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Duplicate plan id: {0}")]
    DuplicateId(String),

    #[error("Invalid price {price} for plan {id}")]
    InvalidPrice { id: String, price: f64 },
}

/// Filter applied when reading from the catalog
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogQuery {
    pub plan_type: Option<PlanType>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub provider: Option<String>,
}

impl CatalogQuery {
    pub fn for_type(plan_type: PlanType) -> Self {
        Self {
            plan_type: Some(plan_type),
            ..Self::default()
        }
    }

    fn matches(&self, plan: &Plan) -> bool {
        if let Some(plan_type) = &self.plan_type {
            if &plan.plan_type != plan_type {
                return false;
            }
        }

        if self.min_price.is_some_and(|min| plan.price < min) {
            return false;
        }

        if self.max_price.is_some_and(|max| plan.price > max) {
            return false;
        }

        if let Some(provider) = &self.provider {
            if !plan.provider_name.eq_ignore_ascii_case(provider.trim()) {
                return false;
            }
        }

        true
    }
}

/// Read-only plan catalog
///
/// Plans live behind an `Arc`, so clones are cheap and can be handed to every
/// worker without copying the catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    plans: Arc<[Plan]>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate ids and invalid prices
    pub fn new(plans: Vec<Plan>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(plans.len());
        for plan in &plans {
            if !plan.price.is_finite() || plan.price < 0.0 {
                return Err(CatalogError::InvalidPrice {
                    id: plan.id.clone(),
                    price: plan.price,
                });
            }
            if !seen.insert(plan.id.as_str()) {
                return Err(CatalogError::DuplicateId(plan.id.clone()));
            }
        }

        Ok(Self { plans: plans.into() })
    }

    /// Load a catalog from a JSON array of plans
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let plans: Vec<Plan> = serde_json::from_str(json)?;
        Self::new(plans)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let catalog = Self::from_json_str(&raw)?;
        tracing::info!("Loaded {} plans from {}", catalog.len(), path.as_ref().display());
        Ok(catalog)
    }

    /// Built-in catalog used when no catalog file is configured
    pub fn seed() -> Self {
        Self {
            plans: seed_plans().into(),
        }
    }

    pub fn plans(&self) -> &[Plan] {
        &self.plans
    }

    pub fn len(&self) -> usize {
        self.plans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }

    /// Plans matching the query, in catalog order
    pub fn query(&self, query: &CatalogQuery) -> Vec<Plan> {
        self.plans
            .iter()
            .filter(|plan| query.matches(plan))
            .cloned()
            .collect()
    }
}

fn plan(id: &str, plan_type: PlanType, name: &str, provider: &str, price: f64, features: &[&str]) -> Plan {
    Plan {
        id: id.to_string(),
        plan_type,
        name: name.to_string(),
        provider_name: provider.to_string(),
        price,
        features: features.iter().map(|f| f.to_string()).collect(),
    }
}

fn seed_plans() -> Vec<Plan> {
    vec![
        plan(
            "health-basic",
            PlanType::Health,
            "Essential Health",
            "Aetna",
            400.0,
            &[
                "Preventive care",
                "Generic prescriptions",
                "Telehealth visits",
                "Emergency room coverage",
                "Annual checkup",
            ],
        ),
        plan(
            "health-standard",
            PlanType::Health,
            "Standard Health Plus",
            "Blue Cross Blue Shield",
            800.0,
            &[
                "Preventive care",
                "Brand-name prescriptions",
                "Specialist visits",
                "Pre-existing condition coverage",
                "Mental health services",
                "Nationwide network",
            ],
        ),
        plan(
            "health-premium",
            PlanType::Health,
            "Premium Health Complete",
            "Kaiser Permanente",
            1200.0,
            &[
                "Preventive care",
                "All prescriptions",
                "Specialist visits without referral",
                "Chronic condition management",
                "Mental health services",
                "Dental and vision",
                "Maternity care",
                "International emergency coverage",
            ],
        ),
        plan(
            "life-term",
            PlanType::Life,
            "Term Life 20",
            "MetLife",
            45.0,
            &["20-year level term", "Convertible to whole life", "Accelerated death benefit"],
        ),
        plan(
            "life-whole",
            PlanType::Life,
            "Whole Life Legacy",
            "Northwestern Mutual",
            180.0,
            &[
                "Lifetime coverage",
                "Cash value growth",
                "Dividend eligible",
                "Senior care rider",
            ],
        ),
        plan(
            "life-senior",
            PlanType::Life,
            "Golden Years Guaranteed",
            "Evergreen Mutual",
            95.0,
            &["Guaranteed acceptance", "Elder care benefit", "Final expense coverage"],
        ),
        plan(
            "auto-liability",
            PlanType::Auto,
            "Liability Only",
            "Geico",
            90.0,
            &["State minimum liability", "Roadside assistance"],
        ),
        plan(
            "auto-full",
            PlanType::Auto,
            "Full Coverage Auto",
            "State Farm",
            160.0,
            &[
                "Collision",
                "Comprehensive",
                "Uninsured motorist",
                "Rental reimbursement",
                "Roadside assistance",
            ],
        ),
        plan(
            "auto-safe-driver",
            PlanType::Auto,
            "Safe Driver Saver",
            "RoadWise Insurance",
            120.0,
            &["Accident forgiveness", "Usage-based discount", "Collision"],
        ),
        plan(
            "home-basic",
            PlanType::Home,
            "Homeowner Basic",
            "Allstate",
            110.0,
            &["Dwelling coverage", "Personal property", "Liability protection"],
        ),
        plan(
            "home-plus",
            PlanType::Home,
            "Homeowner Plus",
            "Liberty Mutual",
            210.0,
            &[
                "Dwelling coverage",
                "Personal property replacement cost",
                "Liability protection",
                "Water backup",
                "Identity theft protection",
            ],
        ),
    ]
}
