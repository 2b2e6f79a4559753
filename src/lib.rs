//! Plan Match - insurance plan recommendation service
//!
//! This library ranks a catalog of insurance plans against a user profile.
//! Each plan gets five sub-scores (coverage, price, features, demographics,
//! priorities) that are combined with profile-driven weights into a 0-100
//! match score, and the top results are explained in plain language.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{Matcher, MatchResult};
pub use models::{Plan, PlanType, Priority, ScoredPlan, UserProfile, WeightVector};
pub use services::{Catalog, Recommender};
