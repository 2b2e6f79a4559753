use crate::core::Matcher;
use crate::models::{ExplanationSource, ScoredPlan, UserProfile};
use crate::services::catalog::{Catalog, CatalogQuery};
use crate::services::explainer::{apply_explanations, Explainer, TemplateExplainer};
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur when producing recommendations
#[derive(Debug, Error)]
pub enum RecommendError {
    #[error("type required")]
    TypeRequired,
}

/// Ranked plans for a profile, with explanations attached
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub recommendations: Vec<ScoredPlan>,
    pub total_candidates: usize,
    pub explanation_source: ExplanationSource,
}

/// Caller-side orchestration around the matcher
///
/// Pre-filters the catalog to the profile's plan type, ranks the remaining
/// plans and lets the configured explainer rewrite the explanations.
#[derive(Clone)]
pub struct Recommender {
    catalog: Catalog,
    matcher: Matcher,
    explainer: Arc<dyn Explainer>,
}

impl Recommender {
    pub fn new(catalog: Catalog, matcher: Matcher, explainer: Arc<dyn Explainer>) -> Self {
        Self {
            catalog,
            matcher,
            explainer,
        }
    }

    /// Recommender that only uses local template explanations
    pub fn with_template_explanations(catalog: Catalog, matcher: Matcher) -> Self {
        Self::new(catalog, matcher, Arc::new(TemplateExplainer))
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub async fn recommend(&self, profile: &UserProfile) -> Result<Recommendation, RecommendError> {
        if profile.plan_type.is_blank() {
            return Err(RecommendError::TypeRequired);
        }

        let candidates = self
            .catalog
            .query(&CatalogQuery::for_type(profile.plan_type.clone()));

        tracing::debug!(
            "Found {} {} plans in catalog",
            candidates.len(),
            profile.plan_type
        );

        let result = self.matcher.match_plans(&candidates, profile);
        let mut recommendations = result.matches;
        let explanation_source = apply_explanations(self.explainer.as_ref(), profile, &mut recommendations).await;

        tracing::info!(
            "Returning {} {} recommendations (from {} candidates, explanations: {:?})",
            recommendations.len(),
            profile.plan_type,
            result.total_candidates,
            explanation_source
        );

        Ok(Recommendation {
            recommendations,
            total_candidates: result.total_candidates,
            explanation_source,
        })
    }
}
