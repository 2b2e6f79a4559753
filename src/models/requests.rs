use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::models::domain::{PlanType, Priority, UserProfile};

/// Request to rank plans for a submitted profile
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecommendRequest {
    #[validate(
        required(message = "type required"),
        length(min = 1, message = "type required")
    )]
    #[serde(rename = "type", default)]
    pub plan_type: Option<String>,
    #[validate(range(min = 0.0, max = 100.0))]
    #[serde(alias = "coverage_level", rename = "coverageLevel", default)]
    pub coverage_level: Option<f64>,
    #[validate(range(min = 0.0))]
    #[serde(default)]
    pub budget: Option<f64>,
    #[validate(range(max = 130))]
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(alias = "family_size", rename = "familySize", default)]
    pub family_size: Option<u32>,
    #[serde(alias = "pre_existing_conditions", rename = "preExistingConditions", default)]
    pub pre_existing_conditions: Vec<String>,
    #[serde(alias = "smoking_status", rename = "smokingStatus", default)]
    pub smoking_status: Option<String>,
    #[serde(alias = "driving_record", rename = "drivingRecord", default)]
    pub driving_record: Option<String>,
    #[validate(range(min = 0.0))]
    #[serde(alias = "property_value", rename = "propertyValue", default)]
    pub property_value: Option<f64>,
    #[serde(default)]
    pub priorities: Vec<String>,
}

impl RecommendRequest {
    /// Convert a validated request into an engine profile
    pub fn into_profile(self) -> UserProfile {
        let mut profile = UserProfile::for_type(PlanType::from(self.plan_type.unwrap_or_default()));
        if let Some(level) = self.coverage_level {
            profile.coverage_level = level;
        }
        profile.budget = self.budget;
        profile.age = self.age;
        profile.family_size = self.family_size;
        profile.pre_existing_conditions = self.pre_existing_conditions;
        profile.smoking_status = self.smoking_status;
        profile.driving_record = self.driving_record;
        profile.property_value = self.property_value;
        profile.priorities = self.priorities.into_iter().map(Priority::from).collect();
        profile
    }
}

/// Query parameters for listing catalog plans
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ListPlansRequest {
    #[serde(rename = "type", default)]
    pub plan_type: Option<String>,
    #[validate(range(min = 0.0))]
    #[serde(alias = "min_price", rename = "minPrice", default)]
    pub min_price: Option<f64>,
    #[validate(range(min = 0.0))]
    #[serde(alias = "max_price", rename = "maxPrice", default)]
    pub max_price: Option<f64>,
    #[serde(default)]
    pub provider: Option<String>,
}
