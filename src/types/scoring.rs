// src/types/scoring.rs
//! Scoring request and the fixed evaluation schema

use serde::{Deserialize, Serialize};

pub const NOT_SPECIFIED: &str = "Not specified";

/// Optional job context an analysis is scored against
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobContext {
    pub target_role: Option<String>,
    pub target_company: Option<String>,
    pub context_description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringRequest {
    pub candidate_text: String,
    pub target_role: String,
    pub target_company: String,
    pub context_description: String,
}

impl ScoringRequest {
    /// Build a request, substituting the placeholder for blank context fields
    pub fn new(candidate_text: impl Into<String>, context: &JobContext) -> Self {
        Self {
            candidate_text: candidate_text.into(),
            target_role: or_placeholder(context.target_role.as_deref()),
            target_company: or_placeholder(context.target_company.as_deref()),
            context_description: or_placeholder(context.context_description.as_deref()),
        }
    }
}

fn or_placeholder(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => NOT_SPECIFIED.to_string(),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchItem {
    pub title: String,
    pub description: String,
}

/// ATS readiness ratings, each in 0..=10
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AtsCriteriaRatings {
    pub keyword_match: u8,
    pub formatting: u8,
    pub section_structure: u8,
    pub quantified_achievements: u8,
    pub action_verbs: u8,
    pub contact_information: u8,
}

impl AtsCriteriaRatings {
    pub const KEYS: [&'static str; 6] = [
        "keyword_match",
        "formatting",
        "section_structure",
        "quantified_achievements",
        "action_verbs",
        "contact_information",
    ];
}

/// Every field is always present; absent upstream values become empty lists or zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoringResult {
    pub overall_score: u8,
    pub top_matches: Vec<MatchItem>,
    pub top_gaps: Vec<MatchItem>,
    pub feedback_summary: Vec<String>,
    pub pros: Vec<String>,
    pub cons: Vec<String>,
    pub improvement_suggestions: Vec<String>,
    pub ats_criteria_ratings: AtsCriteriaRatings,
    pub confidence_score: u8,
}
