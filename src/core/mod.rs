// Core algorithm exports
pub mod explain;
pub mod matcher;
pub mod scoring;
pub mod weights;

pub use explain::explain_match;
pub use matcher::{Matcher, MatchResult, DEFAULT_MAX_RESULTS};
pub use scoring::{calculate_match_score, coverage_score, demographic_score, feature_score, price_score, priority_score};
pub use weights::{weights_for_profile, WeightBuilder};
