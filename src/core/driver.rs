// src/core/driver.rs
//! Scoring and interview round-trips against the generative service

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::core::config_manager::GenerationConfig;
use crate::core::normalizer::normalize;
use crate::core::prompts::{
    next_turn_prompt, opening_question_prompt, scoring_prompt, INTERVIEWER_SYSTEM_PROMPT,
    SCORING_SYSTEM_PROMPT,
};
use crate::core::service_client::{CompletionRequest, GenerativeClient};
use crate::error::{AnalysisError, Result};
use crate::types::dialogue::recent_turns;
use crate::types::{DialogueTurn, ScoringRequest, ScoringResult};

pub const DEFAULT_OPENING_QUESTION: &str = "Tell me about yourself.";
pub const DEFAULT_NEXT_TURN: &str = "Thank you. Let's move on.";

const LOG_PREVIEW_CHARS: usize = 500;

pub struct ScoringDriver {
    client: Arc<dyn GenerativeClient>,
    config: GenerationConfig,
}

impl ScoringDriver {
    pub fn new(client: Arc<dyn GenerativeClient>, config: GenerationConfig) -> Self {
        Self { client, config }
    }

    /// One scoring round-trip. Service failures surface as
    /// `ScoringServiceUnavailable`, unparseable output as `MalformedModelOutput`.
    pub async fn score(&self, request: &ScoringRequest) -> Result<ScoringResult> {
        let today = chrono::Local::now().format("%B %d, %Y").to_string();
        let completion = CompletionRequest {
            model: self.config.model.clone(),
            system_prompt: SCORING_SYSTEM_PROMPT.to_string(),
            user_prompt: scoring_prompt(request, &today),
            temperature: self.config.scoring_temperature,
            max_tokens: self.config.scoring_max_tokens,
        };

        let raw = self.call(&completion).await?;
        debug!(
            "Raw scoring output: {}",
            crate::core::digest::truncate_chars(&raw, LOG_PREVIEW_CHARS)
        );

        let result = normalize(&raw).inspect_err(|e| warn!("Scoring output rejected: {}", e))?;
        info!(
            "Scored candidate for {}: overall {} (confidence {})",
            request.target_role, result.overall_score, result.confidence_score
        );
        Ok(result)
    }

    pub async fn opening_question(&self, role: &str, resume_digest: &str) -> Result<String> {
        let completion = self.interview_request(opening_question_prompt(role, resume_digest));
        let text = self.call(&completion).await?;
        Ok(non_empty_or(text, DEFAULT_OPENING_QUESTION))
    }

    /// Only the trailing `history_window` turns are sent as context.
    pub async fn next_turn(
        &self,
        role: &str,
        prior_turns: &[DialogueTurn],
        latest_answer: &str,
    ) -> Result<String> {
        let completion = self.interview_request(next_turn_prompt(
            role,
            recent_turns(prior_turns, self.config.history_window),
            latest_answer,
        ));
        let text = self.call(&completion).await?;
        Ok(non_empty_or(text, DEFAULT_NEXT_TURN))
    }

    fn interview_request(&self, user_prompt: String) -> CompletionRequest {
        CompletionRequest {
            model: self.config.model.clone(),
            system_prompt: INTERVIEWER_SYSTEM_PROMPT.to_string(),
            user_prompt,
            temperature: self.config.interview_temperature,
            max_tokens: self.config.interview_max_tokens,
        }
    }

    async fn call(&self, completion: &CompletionRequest) -> Result<String> {
        self.client.complete(completion).await.map_err(|e| {
            warn!("Generative service call failed: {:#}", e);
            AnalysisError::ScoringServiceUnavailable(format!("{:#}", e))
        })
    }
}

fn non_empty_or(text: String, fallback: &str) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        fallback.to_string()
    } else {
        trimmed.to_string()
    }
}
