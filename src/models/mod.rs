// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{ExplanationSource, MatchDetails, Plan, PlanType, Priority, ScoredPlan, UserProfile, WeightVector};
pub use requests::{ListPlansRequest, RecommendRequest};
pub use responses::{ErrorResponse, HealthResponse, PlansResponse, RecommendResponse};
