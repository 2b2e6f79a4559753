use serde::{Deserialize, Serialize};
use std::fmt;

/// Line of insurance a plan belongs to
///
/// Known lines get their own variant so scoring rules can dispatch on them.
/// Anything else is carried through verbatim as `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PlanType {
    Health,
    Life,
    Auto,
    Home,
    Other(String),
}

impl PlanType {
    pub fn as_str(&self) -> &str {
        match self {
            PlanType::Health => "health",
            PlanType::Life => "life",
            PlanType::Auto => "auto",
            PlanType::Home => "home",
            PlanType::Other(other) => other.as_str(),
        }
    }

    /// True when no type was supplied at all
    pub fn is_blank(&self) -> bool {
        matches!(self, PlanType::Other(s) if s.is_empty())
    }
}

impl From<String> for PlanType {
    fn from(value: String) -> Self {
        PlanType::from(value.as_str())
    }
}

impl From<&str> for PlanType {
    fn from(value: &str) -> Self {
        let normalized = value.trim().to_lowercase();
        match normalized.as_str() {
            "health" => PlanType::Health,
            "life" => PlanType::Life,
            "auto" => PlanType::Auto,
            "home" => PlanType::Home,
            _ => PlanType::Other(normalized),
        }
    }
}

impl From<PlanType> for String {
    fn from(value: PlanType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for PlanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stated user priority
///
/// The set is open: unknown priorities are kept so they can be echoed back,
/// but they contribute nothing to scoring or weights.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Priority {
    Price,
    Coverage,
    Reputation,
    Network,
    Other(String),
}

impl Priority {
    pub fn as_str(&self) -> &str {
        match self {
            Priority::Price => "price",
            Priority::Coverage => "coverage",
            Priority::Reputation => "reputation",
            Priority::Network => "network",
            Priority::Other(other) => other.as_str(),
        }
    }
}

impl From<String> for Priority {
    fn from(value: String) -> Self {
        Priority::from(value.as_str())
    }
}

impl From<&str> for Priority {
    fn from(value: &str) -> Self {
        let normalized = value.trim().to_lowercase();
        match normalized.as_str() {
            "price" => Priority::Price,
            "coverage" => Priority::Coverage,
            "reputation" => Priority::Reputation,
            "network" => Priority::Network,
            _ => Priority::Other(normalized),
        }
    }
}

impl From<Priority> for String {
    fn from(value: Priority) -> Self {
        value.as_str().to_string()
    }
}

/// Catalog entry for a purchasable insurance plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub id: String,
    #[serde(rename = "type")]
    pub plan_type: PlanType,
    pub name: String,
    #[serde(rename = "providerName")]
    pub provider_name: String,
    pub price: f64,
    #[serde(default)]
    pub features: Vec<String>,
}

impl Plan {
    pub fn feature_count(&self) -> usize {
        self.features.len()
    }

    /// Case-insensitive search across the feature list
    pub fn has_feature_mentioning(&self, needles: &[&str]) -> bool {
        self.features.iter().any(|feature| {
            let lower = feature.to_lowercase();
            needles.iter().any(|needle| lower.contains(needle))
        })
    }
}

/// Preferences and demographics submitted by the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(rename = "type")]
    pub plan_type: PlanType,
    #[serde(rename = "coverageLevel", default = "default_coverage_level")]
    pub coverage_level: f64,
    #[serde(default)]
    pub budget: Option<f64>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(rename = "familySize", default)]
    pub family_size: Option<u32>,
    #[serde(rename = "preExistingConditions", default)]
    pub pre_existing_conditions: Vec<String>,
    #[serde(rename = "smokingStatus", default)]
    pub smoking_status: Option<String>,
    #[serde(rename = "drivingRecord", default)]
    pub driving_record: Option<String>,
    #[serde(rename = "propertyValue", default)]
    pub property_value: Option<f64>,
    #[serde(default)]
    pub priorities: Vec<Priority>,
}

impl UserProfile {
    /// Minimal profile for a plan type, everything else defaulted
    pub fn for_type(plan_type: PlanType) -> Self {
        Self {
            plan_type,
            coverage_level: default_coverage_level(),
            budget: None,
            age: None,
            family_size: None,
            pre_existing_conditions: Vec::new(),
            smoking_status: None,
            driving_record: None,
            property_value: None,
            priorities: Vec::new(),
        }
    }

    /// Conditions other than the "none" sentinel
    pub fn declared_conditions(&self) -> impl Iterator<Item = &str> {
        self.pre_existing_conditions
            .iter()
            .map(|c| c.trim())
            .filter(|c| !c.is_empty() && !c.eq_ignore_ascii_case("none"))
    }

    pub fn has_pre_existing_conditions(&self) -> bool {
        self.declared_conditions().next().is_some()
    }

    pub fn is_smoker(&self) -> bool {
        self.smoking_status
            .as_deref()
            .is_some_and(|s| s.eq_ignore_ascii_case("smoker"))
    }
}

fn default_coverage_level() -> f64 { 50.0 }

/// Relative importance of the five scoring axes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightVector {
    pub coverage: f64,
    pub price: f64,
    pub features: f64,
    pub demographics: f64,
    pub priorities: f64,
}

impl WeightVector {
    pub fn sum(&self) -> f64 {
        self.coverage + self.price + self.features + self.demographics + self.priorities
    }
}

impl Default for WeightVector {
    fn default() -> Self {
        Self {
            coverage: 0.25,
            price: 0.25,
            features: 0.20,
            demographics: 0.15,
            priorities: 0.15,
        }
    }
}

/// Per-axis breakdown behind a match score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchDetails {
    #[serde(rename = "coverageScore")]
    pub coverage_score: f64,
    #[serde(rename = "priceScore")]
    pub price_score: f64,
    #[serde(rename = "featureScore")]
    pub feature_score: f64,
    #[serde(rename = "demographicScore")]
    pub demographic_score: f64,
    #[serde(rename = "priorityScore")]
    pub priority_score: f64,
    pub weights: WeightVector,
}

/// Plan ranked against a profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredPlan {
    #[serde(flatten)]
    pub plan: Plan,
    #[serde(rename = "matchScore")]
    pub match_score: u8,
    #[serde(rename = "matchDetails")]
    pub match_details: MatchDetails,
    pub explanation: String,
}

/// Where the explanations attached to a result set came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExplanationSource {
    /// Every explanation came from the text-generation collaborator
    Generated,
    /// Every explanation came from the local template
    Template,
    /// The collaborator answered for some plans only
    Mixed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_type_parsing() {
        assert_eq!(PlanType::from("Health"), PlanType::Health);
        assert_eq!(PlanType::from(" auto "), PlanType::Auto);
        assert_eq!(PlanType::from("travel"), PlanType::Other("travel".to_string()));
        assert!(PlanType::from("   ").is_blank());
        assert!(!PlanType::from("pet").is_blank());
    }

    #[test]
    fn test_plan_deserialize_camel_case() {
        let json = r#"{
            "id": "h1",
            "type": "health",
            "name": "Basic",
            "providerName": "Aetna",
            "price": 400,
            "features": ["Preventive care"]
        }"#;
        let plan: Plan = serde_json::from_str(json).unwrap();
        assert_eq!(plan.plan_type, PlanType::Health);
        assert_eq!(plan.provider_name, "Aetna");
        assert_eq!(plan.feature_count(), 1);
    }

    #[test]
    fn test_profile_defaults() {
        let profile: UserProfile = serde_json::from_str(r#"{"type": "life"}"#).unwrap();
        assert_eq!(profile.plan_type, PlanType::Life);
        assert_eq!(profile.coverage_level, 50.0);
        assert!(profile.budget.is_none());
        assert!(profile.priorities.is_empty());
    }

    #[test]
    fn test_none_sentinel_is_not_a_condition() {
        let mut profile = UserProfile::for_type(PlanType::Health);
        profile.pre_existing_conditions = vec!["None".to_string()];
        assert!(!profile.has_pre_existing_conditions());

        profile.pre_existing_conditions.push("asthma".to_string());
        assert!(profile.has_pre_existing_conditions());
    }

    #[test]
    fn test_feature_search_is_case_insensitive() {
        let plan = Plan {
            id: "l1".to_string(),
            plan_type: PlanType::Life,
            name: "Golden".to_string(),
            provider_name: "MetLife".to_string(),
            price: 90.0,
            features: vec!["SENIOR discount".to_string()],
        };
        assert!(plan.has_feature_mentioning(&["senior", "elder"]));
        assert!(!plan.has_feature_mentioning(&["pre-existing"]));
    }

    #[test]
    fn test_default_weights_sum_to_one() {
        assert!((WeightVector::default().sum() - 1.0).abs() < 1e-12);
    }
}
