use crate::models::{MatchDetails, Plan, PlanType, Priority, UserProfile, WeightVector};

/// Starting point for every adjustable sub-score
pub const BASE_SCORE: f64 = 70.0;

/// Price score used when the profile carries no budget
pub const NEUTRAL_PRICE_SCORE: f64 = 70.0;

/// Providers that earn the reputation bonus
pub const REPUTABLE_PROVIDERS: &[&str] = &[
    "Aetna",
    "Allstate",
    "Blue Cross Blue Shield",
    "Cigna",
    "Geico",
    "Kaiser Permanente",
    "Liberty Mutual",
    "MetLife",
    "New York Life",
    "Northwestern Mutual",
    "Progressive",
    "Prudential",
    "State Farm",
    "UnitedHealthcare",
    "USAA",
];

/// Type-specific adjustment added onto a base score
pub type TypeRule = fn(&Plan, &UserProfile) -> f64;

/// Calculate a match score (0-100) for a plan against a profile
///
/// Scoring formula:
/// score = round(
///     coverage_score * w.coverage +        # implied coverage vs desired level
///     price_score * w.price +              # fit against budget
///     feature_score * w.features +         # type-specific feature fit
///     demographic_score * w.demographics + # type-specific risk profile
///     priority_score * w.priorities        # stated priorities
/// )
pub fn calculate_match_score(
    plan: &Plan,
    profile: &UserProfile,
    weights: &WeightVector,
) -> (u8, MatchDetails) {
    let details = MatchDetails {
        coverage_score: coverage_score(plan, profile),
        price_score: price_score(plan, profile),
        feature_score: feature_score(plan, profile),
        demographic_score: demographic_score(plan, profile),
        priority_score: priority_score(plan, profile),
        weights: *weights,
    };

    let total = details.coverage_score * weights.coverage
        + details.price_score * weights.price
        + details.feature_score * weights.features
        + details.demographic_score * weights.demographics
        + details.priority_score * weights.priorities;

    (to_match_score(total), details)
}

/// Round to the nearest integer and clamp to [0, 100]
#[inline]
fn to_match_score(total: f64) -> u8 {
    if total.is_nan() {
        return 0;
    }
    total.round().clamp(0.0, 100.0) as u8
}

#[inline]
fn clamp_score(score: f64) -> f64 {
    if score.is_nan() {
        return 0.0;
    }
    score.clamp(0.0, 100.0)
}

/// Implied coverage level of a plan (0-100)
///
/// Price and feature richness stand in for real coverage depth.
#[inline]
pub fn estimated_coverage_level(plan: &Plan) -> f64 {
    clamp_score(plan.price / 100.0 * 25.0 + plan.feature_count() as f64 * 10.0)
}

/// Coverage score (0-100)
/// Loses 2 points per unit of distance from the desired coverage level
pub fn coverage_score(plan: &Plan, profile: &UserProfile) -> f64 {
    let estimated = estimated_coverage_level(plan);
    clamp_score(100.0 - 2.0 * (estimated - profile.coverage_level).abs())
}

/// Price score (0-100)
/// At or under budget is perfect; decays 2 points per percent over budget
pub fn price_score(plan: &Plan, profile: &UserProfile) -> f64 {
    let Some(budget) = profile.budget else {
        return NEUTRAL_PRICE_SCORE;
    };

    let diff = plan.price - budget;
    if diff <= 0.0 {
        return 100.0;
    }

    clamp_score(100.0 - 2.0 * (diff / budget * 100.0))
}

/// Feature score (0-100)
pub fn feature_score(plan: &Plan, profile: &UserProfile) -> f64 {
    let adjustment = feature_rule(&profile.plan_type).map_or(0.0, |rule| rule(plan, profile));
    clamp_score(BASE_SCORE + adjustment)
}

/// Demographic score (0-100)
pub fn demographic_score(plan: &Plan, profile: &UserProfile) -> f64 {
    let adjustment = demographic_rule(&profile.plan_type).map_or(0.0, |rule| rule(plan, profile));
    clamp_score(BASE_SCORE + adjustment)
}

/// Feature rule for a plan type, if the type has one
pub fn feature_rule(plan_type: &PlanType) -> Option<TypeRule> {
    match plan_type {
        PlanType::Health => Some(health_features),
        PlanType::Life => Some(life_features),
        _ => None,
    }
}

/// Demographic rule for a plan type, if the type has one
pub fn demographic_rule(plan_type: &PlanType) -> Option<TypeRule> {
    match plan_type {
        PlanType::Health => Some(health_demographics),
        PlanType::Auto => Some(auto_demographics),
        PlanType::Life => Some(life_demographics),
        _ => None,
    }
}

fn health_features(plan: &Plan, profile: &UserProfile) -> f64 {
    if profile.has_pre_existing_conditions() && plan.has_feature_mentioning(&["pre-existing", "condition"]) {
        20.0
    } else {
        -10.0
    }
}

fn life_features(plan: &Plan, profile: &UserProfile) -> f64 {
    let senior = profile.age.is_some_and(|age| age > 50);
    if senior && plan.has_feature_mentioning(&["senior", "elder"]) {
        15.0
    } else {
        -5.0
    }
}

fn health_demographics(_plan: &Plan, profile: &UserProfile) -> f64 {
    if profile.is_smoker() { -10.0 } else { 0.0 }
}

fn auto_demographics(_plan: &Plan, profile: &UserProfile) -> f64 {
    match profile.driving_record.as_deref().map(str::to_lowercase).as_deref() {
        Some("excellent") => 15.0,
        Some("poor") => -15.0,
        _ => 0.0,
    }
}

fn life_demographics(_plan: &Plan, profile: &UserProfile) -> f64 {
    match profile.age {
        Some(age) if age > 60 => -20.0,
        Some(age) if age < 30 => 15.0,
        _ => 0.0,
    }
}

/// Priority score (0-100)
///
/// The base counts as one vote; each stated priority adds its contribution
/// and the total is averaged over `priorities + 1`.
pub fn priority_score(plan: &Plan, profile: &UserProfile) -> f64 {
    if profile.priorities.is_empty() {
        return BASE_SCORE;
    }

    let total: f64 = BASE_SCORE
        + profile
            .priorities
            .iter()
            .map(|priority| priority_contribution(priority, plan))
            .sum::<f64>();

    clamp_score(total / (profile.priorities.len() as f64 + 1.0))
}

/// Contribution of a single priority for a plan
pub fn priority_contribution(priority: &Priority, plan: &Plan) -> f64 {
    match priority {
        Priority::Price => 100.0 - (plan.price / 5.0).min(100.0),
        Priority::Coverage => (plan.feature_count() as f64 * 5.0).min(30.0),
        Priority::Reputation => {
            if is_reputable_provider(&plan.provider_name) { 20.0 } else { 0.0 }
        }
        _ => 0.0,
    }
}

pub fn is_reputable_provider(provider_name: &str) -> bool {
    let name = provider_name.trim();
    REPUTABLE_PROVIDERS
        .iter()
        .any(|known| known.eq_ignore_ascii_case(name))
}
