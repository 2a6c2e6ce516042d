// src/error.rs
//! Error taxonomy for the resume analysis pipeline

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AnalysisError>;

#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Document format unrecognized or decoding failed
    #[error("Unreadable document: {0}")]
    UnreadableDocument(String),

    /// Digest below the minimum usable length
    #[error("Insufficient content: digest has {length} characters, need at least {required}")]
    InsufficientContent { length: usize, required: usize },

    /// Every resume source was tried and none produced a usable digest
    #[error("No usable resume content: neither an uploaded document nor a completed CV form provided enough content")]
    NoUsableResumeContent,

    #[error("Scoring service unavailable: {0}")]
    ScoringServiceUnavailable(String),

    /// The model answered but its output could not be parsed as a JSON object
    #[error("Malformed model output: {0}")]
    MalformedModelOutput(String),

    /// A collaborator store (profile database, document storage) failed
    #[error("Storage error: {0}")]
    Storage(String),
}

impl AnalysisError {
    /// Stable machine-readable code used in API error envelopes
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnreadableDocument(_) => "UNREADABLE_DOCUMENT",
            Self::InsufficientContent { .. } => "INSUFFICIENT_CONTENT",
            Self::NoUsableResumeContent => "NO_USABLE_RESUME_CONTENT",
            Self::ScoringServiceUnavailable(_) => "SCORING_SERVICE_UNAVAILABLE",
            Self::MalformedModelOutput(_) => "MALFORMED_MODEL_OUTPUT",
            Self::Storage(_) => "STORAGE_ERROR",
        }
    }

    /// Only service outages are worth retrying as-is; everything else needs
    /// different input or a fix on our side.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ScoringServiceUnavailable(_))
    }

    pub fn suggestions(&self) -> Vec<String> {
        let items: &[&str] = match self {
            Self::UnreadableDocument(_) => &[
                "Upload the resume as a PDF or Word document (.docx)",
                "Check the file is not corrupted or password protected",
            ],
            Self::InsufficientContent { .. } | Self::NoUsableResumeContent => &[
                "Upload a resume document (PDF or DOCX) with readable text",
                "Or complete the CV builder form with your skills and experience",
            ],
            Self::ScoringServiceUnavailable(_) => &[
                "Try again in a few moments",
                "Contact support if the problem persists",
            ],
            Self::MalformedModelOutput(_) => &[
                "Run the analysis again",
                "Contact support if the problem persists",
            ],
            Self::Storage(_) => &["Contact system administrator"],
        };
        items.iter().map(|s| s.to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_service_outage_is_retryable() {
        assert!(AnalysisError::ScoringServiceUnavailable("timeout".into()).is_retryable());
        assert!(!AnalysisError::MalformedModelOutput("x".into()).is_retryable());
        assert!(!AnalysisError::NoUsableResumeContent.is_retryable());
    }

    #[test]
    fn test_no_usable_content_message_is_actionable() {
        let err = AnalysisError::NoUsableResumeContent;
        assert_eq!(err.code(), "NO_USABLE_RESUME_CONTENT");
        let message = err.to_string();
        assert!(message.contains("uploaded document"));
        assert!(message.contains("CV form"));
        assert!(err.suggestions().iter().any(|s| s.contains("CV builder")));
    }

    #[test]
    fn test_insufficient_content_reports_lengths() {
        let err = AnalysisError::InsufficientContent {
            length: 12,
            required: 50,
        };
        assert_eq!(err.code(), "INSUFFICIENT_CONTENT");
        assert!(err.to_string().contains("12"));
    }

    #[test]
    fn test_storage_error_is_not_retryable() {
        let err = AnalysisError::Storage("corrupt record".into());
        assert_eq!(err.code(), "STORAGE_ERROR");
        assert!(!err.is_retryable());
        assert_eq!(err.suggestions(), vec!["Contact system administrator"]);
    }
}
