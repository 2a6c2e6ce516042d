// src/web/handlers/analysis_handlers.rs

use rocket::serde::json::Json;
use rocket::State;
use std::sync::Arc;
use tracing::{error, info};

use crate::core::ResumeAnalyzer;
use crate::types::{InterviewOpening, InterviewReply, ScoringResult};
use crate::web::types::*;

pub async fn analyze_resume_handler(
    request: Json<StandardRequest<AnalyzeRequest>>,
    analyzer: &State<Arc<ResumeAnalyzer>>,
) -> Result<Json<DataResponse<ScoringResult>>, ApiError> {
    let conversation_id = request.conversation_id.clone();
    let applicant_id = request.data.applicant_id.trim();
    if applicant_id.is_empty() {
        return Err(bad_input("applicant_id", conversation_id));
    }

    info!("Resume analysis requested for applicant {}", applicant_id);

    match analyzer
        .analyze_resume_for(applicant_id, &request.data.job_context())
        .await
    {
        Ok(result) => Ok(Json(DataResponse::success(
            format!("Resume scored {}/100", result.overall_score),
            result,
            conversation_id,
        ))),
        Err(e) => {
            error!("Resume analysis failed for {}: {}", applicant_id, e);
            Err(api_error(&e, conversation_id))
        }
    }
}

pub async fn start_interview_handler(
    request: Json<StandardRequest<StartInterviewRequest>>,
    analyzer: &State<Arc<ResumeAnalyzer>>,
) -> Result<Json<DataResponse<InterviewOpening>>, ApiError> {
    let conversation_id = request.conversation_id.clone();
    let data = &request.data;
    if data.applicant_id.trim().is_empty() {
        return Err(bad_input("applicant_id", conversation_id));
    }
    if data.role.trim().is_empty() {
        return Err(bad_input("role", conversation_id));
    }

    match analyzer
        .start_interview(data.role.trim(), data.applicant_id.trim())
        .await
    {
        Ok(opening) => Ok(Json(DataResponse::success(
            "Interview started".to_string(),
            opening,
            conversation_id,
        ))),
        Err(e) => {
            error!("Could not start interview for {}: {}", data.applicant_id, e);
            Err(api_error(&e, conversation_id))
        }
    }
}

pub async fn continue_interview_handler(
    request: Json<StandardRequest<ContinueInterviewRequest>>,
    analyzer: &State<Arc<ResumeAnalyzer>>,
) -> Result<Json<DataResponse<InterviewReply>>, ApiError> {
    let conversation_id = request.conversation_id.clone();
    let data = &request.data;
    if data.role.trim().is_empty() {
        return Err(bad_input("role", conversation_id));
    }

    match analyzer
        .continue_interview(data.prior_turns.turns(), &data.latest_answer, data.role.trim())
        .await
    {
        Ok(reply) => Ok(Json(DataResponse::success(
            "Next interview turn".to_string(),
            reply,
            conversation_id,
        ))),
        Err(e) => {
            error!("Interview turn failed: {}", e);
            Err(api_error(&e, conversation_id))
        }
    }
}
