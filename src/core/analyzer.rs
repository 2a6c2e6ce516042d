// src/core/analyzer.rs
//! Entry points exposed to the surrounding application

use tracing::{info, info_span, Instrument};

use crate::core::driver::ScoringDriver;
use crate::core::resolver::{ResolvedDigest, SourceResolver};
use crate::error::Result;
use crate::types::{
    DialogueTurn, InterviewOpening, InterviewReply, JobContext, ScoringRequest, ScoringResult,
};

/// Stateless between calls; concurrent analyses need no coordination.
pub struct ResumeAnalyzer {
    resolver: SourceResolver,
    driver: ScoringDriver,
}

impl ResumeAnalyzer {
    pub fn new(resolver: SourceResolver, driver: ScoringDriver) -> Self {
        Self { resolver, driver }
    }

    /// Score an applicant's resume with no job context
    pub async fn analyze_resume(&self, applicant_id: &str) -> Result<ScoringResult> {
        self.analyze_resume_for(applicant_id, &JobContext::default())
            .await
    }

    /// The generative service is only called once a usable digest exists.
    pub async fn analyze_resume_for(
        &self,
        applicant_id: &str,
        context: &JobContext,
    ) -> Result<ScoringResult> {
        async {
            let digest = self.resolver.resolve(applicant_id).await?;
            info!("Resume digest ready ({} chars) from {:?}", digest.text.len(), digest.source);

            let request = ScoringRequest::new(digest.text, context);
            self.driver.score(&request).await
        }
        .instrument(info_span!("analyze_resume", applicant_id = %applicant_id))
        .await
    }

    pub async fn digest_for(&self, applicant_id: &str) -> Result<ResolvedDigest> {
        self.resolver.resolve(applicant_id).await
    }

    pub async fn start_interview(&self, role: &str, applicant_id: &str) -> Result<InterviewOpening> {
        async {
            let digest = self.resolver.resolve(applicant_id).await?;
            let first_question = self.driver.opening_question(role, &digest.text).await?;
            Ok(InterviewOpening { first_question })
        }
        .instrument(info_span!("start_interview", applicant_id = %applicant_id, role = %role))
        .await
    }

    pub async fn continue_interview(
        &self,
        prior_turns: &[DialogueTurn],
        latest_answer: &str,
        role: &str,
    ) -> Result<InterviewReply> {
        let text = self
            .driver
            .next_turn(role, prior_turns, latest_answer)
            .await?;
        Ok(InterviewReply {
            feedback_and_next_question: text,
            is_finished: false,
        })
    }
}
