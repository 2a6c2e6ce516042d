// src/web/types.rs
//! Request bodies and the standard response envelope

use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::serde::{Deserialize, Serialize};

use crate::error::AnalysisError;
use crate::types::{DialogueSession, JobContext};

#[derive(Serialize)]
#[serde(crate = "rocket::serde", rename_all = "lowercase")]
pub enum ResponseType {
    Text,
    Data,
    Error,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct TextResponse {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct DataResponse<T> {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub message: String,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct StandardErrorResponse {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub error: String,
    pub error_code: String,
    pub suggestions: Vec<String>,
    pub retryable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct StandardRequest<T> {
    #[serde(flatten)]
    pub data: T,
    pub conversation_id: Option<String>,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct AnalyzeRequest {
    pub applicant_id: String,
    pub target_role: Option<String>,
    pub target_company: Option<String>,
    pub context_description: Option<String>,
}

impl AnalyzeRequest {
    pub fn job_context(&self) -> JobContext {
        JobContext {
            target_role: self.target_role.clone(),
            target_company: self.target_company.clone(),
            context_description: self.context_description.clone(),
        }
    }
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct StartInterviewRequest {
    pub role: String,
    pub applicant_id: String,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct ContinueInterviewRequest {
    pub role: String,
    pub latest_answer: String,
    #[serde(default)]
    pub prior_turns: DialogueSession,
}

impl TextResponse {
    pub fn success(message: String, conversation_id: Option<String>) -> Self {
        Self {
            response_type: ResponseType::Text,
            success: true,
            message,
            conversation_id,
        }
    }
}

impl<T> DataResponse<T> {
    pub fn success(message: String, data: T, conversation_id: Option<String>) -> Self {
        Self {
            response_type: ResponseType::Data,
            success: true,
            message,
            data,
            conversation_id,
        }
    }
}

impl StandardErrorResponse {
    pub fn new(
        error: String,
        error_code: String,
        suggestions: Vec<String>,
        conversation_id: Option<String>,
    ) -> Self {
        Self {
            response_type: ResponseType::Error,
            success: false,
            error,
            error_code,
            suggestions,
            retryable: false,
            conversation_id,
        }
    }

    pub fn from_analysis_error(error: &AnalysisError, conversation_id: Option<String>) -> Self {
        Self {
            retryable: error.is_retryable(),
            ..Self::new(
                error.to_string(),
                error.code().to_string(),
                error.suggestions(),
                conversation_id,
            )
        }
    }
}

/// HTTP status for each failure class
pub fn status_for(error: &AnalysisError) -> Status {
    match error {
        AnalysisError::UnreadableDocument(_)
        | AnalysisError::InsufficientContent { .. }
        | AnalysisError::NoUsableResumeContent => Status::UnprocessableEntity,
        AnalysisError::ScoringServiceUnavailable(_) => Status::ServiceUnavailable,
        AnalysisError::MalformedModelOutput(_) => Status::BadGateway,
        AnalysisError::Storage(_) => Status::InternalServerError,
    }
}

/// Error side of every JSON route
pub type ApiError = (Status, Json<StandardErrorResponse>);

pub fn api_error(error: &AnalysisError, conversation_id: Option<String>) -> ApiError {
    (
        status_for(error),
        Json(StandardErrorResponse::from_analysis_error(
            error,
            conversation_id,
        )),
    )
}

pub fn bad_input(field: &str, conversation_id: Option<String>) -> ApiError {
    (
        Status::BadRequest,
        Json(StandardErrorResponse::new(
            format!("Field '{}' must not be empty", field),
            "INVALID_INPUT".to_string(),
            vec![format!("Provide a non-empty '{}'", field)],
            conversation_id,
        )),
    )
}
