use crate::core::explain_match;
use crate::models::{ExplanationSource, Plan, PlanType, ScoredPlan, UserProfile};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

const API_VERSION: &str = "2023-06-01";

const SYSTEM_PROMPT: &str = "You explain insurance plan recommendations to consumers. \
For every candidate plan write one or two plain sentences explaining why it fits the user's profile. \
Mention the plan name, the provider and the match score. Do not invent features. \
Respond with JSON only, shaped as {\"explanations\": {\"<plan id>\": \"<explanation>\"}}.";

/// Errors that can occur when generating explanations
#[derive(Debug, Error)]
pub enum ExplainerError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API returned error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Text generation returned empty content")]
    EmptyContent,
}

/// Plan summary handed to an explainer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplanationCandidate {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub plan_type: PlanType,
    pub provider: String,
    pub features: Vec<String>,
    pub price: f64,
    #[serde(rename = "matchScore")]
    pub match_score: u8,
}

impl ExplanationCandidate {
    fn to_plan(&self) -> Plan {
        Plan {
            id: self.id.clone(),
            plan_type: self.plan_type.clone(),
            name: self.name.clone(),
            provider_name: self.provider.clone(),
            price: self.price,
            features: self.features.clone(),
        }
    }
}

impl From<&ScoredPlan> for ExplanationCandidate {
    fn from(scored: &ScoredPlan) -> Self {
        Self {
            id: scored.plan.id.clone(),
            name: scored.plan.name.clone(),
            plan_type: scored.plan.plan_type.clone(),
            provider: scored.plan.provider_name.clone(),
            features: scored.plan.features.clone(),
            price: scored.plan.price,
            match_score: scored.match_score,
        }
    }
}

/// Produces one explanation per candidate plan id
#[async_trait]
pub trait Explainer: Send + Sync {
    /// Source reported for explanations this explainer produces
    fn source(&self) -> ExplanationSource;

    async fn explain(
        &self,
        profile: &UserProfile,
        candidates: &[ExplanationCandidate],
    ) -> Result<HashMap<String, String>, ExplainerError>;
}

/// Local, deterministic explainer. Never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateExplainer;

impl TemplateExplainer {
    pub fn explain_all(
        &self,
        profile: &UserProfile,
        candidates: &[ExplanationCandidate],
    ) -> HashMap<String, String> {
        candidates
            .iter()
            .map(|c| (c.id.clone(), explain_match(&c.to_plan(), c.match_score, profile)))
            .collect()
    }
}

#[async_trait]
impl Explainer for TemplateExplainer {
    fn source(&self) -> ExplanationSource {
        ExplanationSource::Template
    }

    async fn explain(
        &self,
        profile: &UserProfile,
        candidates: &[ExplanationCandidate],
    ) -> Result<HashMap<String, String>, ExplainerError> {
        Ok(self.explain_all(profile, candidates))
    }
}

/// Connection settings for the text-generation collaborator
#[derive(Debug, Clone)]
pub struct TextGenConfig {
    pub endpoint: String,
    pub api_key: String,
    pub model: String,
    pub max_tokens: u32,
    pub timeout: Duration,
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    text: Option<String>,
}

impl MessagesResponse {
    fn text(&self) -> Option<&str> {
        self.content
            .iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text.as_deref())
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ExplanationPayload {
    Wrapped { explanations: HashMap<String, String> },
    Bare(HashMap<String, String>),
}

#[derive(Debug, Serialize)]
struct PromptInput<'a> {
    profile: &'a UserProfile,
    candidates: &'a [ExplanationCandidate],
}

/// Explainer backed by an external text-generation service
///
/// Sends a single batched request per recommendation. There are no retries:
/// any failure is returned to the caller, which falls back to the template.
#[derive(Debug, Clone)]
pub struct TextGenExplainer {
    client: Client,
    config: TextGenConfig,
}

impl TextGenExplainer {
    pub fn new(config: TextGenConfig) -> Result<Self, ExplainerError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    fn build_prompt(
        profile: &UserProfile,
        candidates: &[ExplanationCandidate],
    ) -> Result<String, ExplainerError> {
        let input = serde_json::to_string_pretty(&PromptInput { profile, candidates })?;
        Ok(format!(
            "Explain why each candidate plan suits this user.\n\n{}\n\nReturn one explanation per candidate id.",
            input
        ))
    }
}

#[async_trait]
impl Explainer for TextGenExplainer {
    fn source(&self) -> ExplanationSource {
        ExplanationSource::Generated
    }

    async fn explain(
        &self,
        profile: &UserProfile,
        candidates: &[ExplanationCandidate],
    ) -> Result<HashMap<String, String>, ExplainerError> {
        if candidates.is_empty() {
            return Ok(HashMap::new());
        }

        let prompt = Self::build_prompt(profile, candidates)?;
        let body = MessagesRequest {
            model: &self.config.model,
            max_tokens: self.config.max_tokens,
            system: SYSTEM_PROMPT,
            messages: vec![Message {
                role: "user",
                content: &prompt,
            }],
        };

        tracing::debug!(
            "Requesting explanations for {} plans from {}",
            candidates.len(),
            self.config.endpoint
        );

        let response = self
            .client
            .post(&self.config.endpoint)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ExplainerError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: MessagesResponse = serde_json::from_str(&response.text().await?)?;
        let text = parsed.text().ok_or(ExplainerError::EmptyContent)?;

        let explanations = match serde_json::from_str::<ExplanationPayload>(strip_json_fences(text))? {
            ExplanationPayload::Wrapped { explanations } => explanations,
            ExplanationPayload::Bare(explanations) => explanations,
        };

        Ok(explanations
            .into_iter()
            .filter(|(id, text)| !text.trim().is_empty() && candidates.iter().any(|c| &c.id == id))
            .map(|(id, text)| (id, text.trim().to_string()))
            .collect())
    }
}

/// Replace template explanations with collaborator output where available
///
/// Any error from the explainer is logged and the existing explanations are
/// kept, so scores and ordering never depend on the collaborator.
pub async fn apply_explanations(
    explainer: &dyn Explainer,
    profile: &UserProfile,
    matches: &mut [ScoredPlan],
) -> ExplanationSource {
    if matches.is_empty() {
        return ExplanationSource::Template;
    }

    let candidates: Vec<ExplanationCandidate> = matches.iter().map(ExplanationCandidate::from).collect();

    let mut generated = match explainer.explain(profile, &candidates).await {
        Ok(explanations) => explanations,
        Err(e) => {
            tracing::warn!("Text generation failed, using template explanations: {}", e);
            return ExplanationSource::Template;
        }
    };

    let mut replaced = 0;
    for scored in matches.iter_mut() {
        if let Some(text) = generated.remove(&scored.plan.id) {
            scored.explanation = text;
            replaced += 1;
        }
    }

    if explainer.source() == ExplanationSource::Template {
        ExplanationSource::Template
    } else if replaced == matches.len() {
        ExplanationSource::Generated
    } else if replaced == 0 {
        tracing::warn!("Text generation returned no usable explanations, using templates");
        ExplanationSource::Template
    } else {
        tracing::debug!("Text generation covered {} of {} plans", replaced, matches.len());
        ExplanationSource::Mixed
    }
}

/// Strips ```json ... ``` or ``` ... ``` fences from generated output
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let inner = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"));

    match inner {
        Some(stripped) => {
            let stripped = stripped.trim_start();
            stripped.strip_suffix("```").map(str::trim).unwrap_or(stripped)
        }
        None => text,
    }
}
