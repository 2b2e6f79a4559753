// Service exports
pub mod catalog;
pub mod explainer;
pub mod recommender;

pub use catalog::{Catalog, CatalogError, CatalogQuery};
pub use explainer::{apply_explanations, ExplanationCandidate, Explainer, ExplainerError, TemplateExplainer, TextGenConfig, TextGenExplainer};
pub use recommender::{Recommendation, RecommendError, Recommender};
