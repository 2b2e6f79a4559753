use crate::models::{MatchDetails, Plan, ScoredPlan, UserProfile, WeightVector};
use crate::core::{
    explain::explain_match,
    scoring::calculate_match_score,
    weights::weights_for_profile,
};

/// Number of plans returned per request
pub const DEFAULT_MAX_RESULTS: usize = 3;

/// Result of the matching process
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    pub matches: Vec<ScoredPlan>,
    pub total_candidates: usize,
}

/// Main matching orchestrator
///
/// # Pipeline Stages
/// 1. Profile-driven weight vector
/// 2. Per-plan sub-scores and combined score
/// 3. Stable ranking by score
/// 4. Truncation and explanation
///
/// The matcher holds no mutable state and can be shared freely between
/// concurrent callers. Plans are scored as given: callers are expected to
/// pass only plans whose type matches the profile.
#[derive(Debug, Clone)]
pub struct Matcher {
    weights: WeightVector,
    max_results: usize,
}

impl Matcher {
    pub fn new(weights: WeightVector) -> Self {
        Self {
            weights,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }

    pub fn with_default_weights() -> Self {
        Self::new(WeightVector::default())
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    /// Rank plans for a profile
    ///
    /// # Arguments
    /// * `plans` - Candidate plans, in catalog order
    /// * `profile` - The user's submitted profile
    ///
    /// # Returns
    /// MatchResult with at most `max_results` plans, highest score first.
    /// Equal scores keep catalog order.
    pub fn match_plans(&self, plans: &[Plan], profile: &UserProfile) -> MatchResult {
        let total_candidates = plans.len();
        let weights = weights_for_profile(self.weights, profile);

        tracing::debug!(
            "Scoring {} {} plans with weights {:?}",
            total_candidates,
            profile.plan_type,
            weights
        );

        let mut scored: Vec<(&Plan, u8, MatchDetails)> = plans
            .iter()
            .map(|plan| {
                let (score, details) = calculate_match_score(plan, profile, &weights);
                (plan, score, details)
            })
            .collect();

        // Stable sort keeps catalog order for ties
        scored.sort_by(|a, b| b.1.cmp(&a.1));
        scored.truncate(self.max_results);

        let matches = scored
            .into_iter()
            .map(|(plan, match_score, match_details)| ScoredPlan {
                plan: plan.clone(),
                match_score,
                match_details,
                explanation: explain_match(plan, match_score, profile),
            })
            .collect();

        MatchResult {
            matches,
            total_candidates,
        }
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_weights()
    }
}
