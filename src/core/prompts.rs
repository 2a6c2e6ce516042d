// src/core/prompts.rs
//! Prompt templates for scoring and interview practice

use crate::types::{DialogueTurn, ScoringRequest};

pub const SCORING_SYSTEM_PROMPT: &str = "You are an experienced technical recruiter and ATS \
    (applicant tracking system) expert. You evaluate resumes objectively and always answer \
    with a single valid JSON object and nothing else.";

pub const INTERVIEWER_SYSTEM_PROMPT: &str = "You are a professional job interviewer running a \
    practice interview. Ask one question at a time, keep a friendly but rigorous tone and \
    never answer on behalf of the candidate.";

const SCHEMA_EXAMPLE: &str = r#"{
  "overall_score": 78,
  "top_matches": [
    {"title": "Backend development", "description": "Four years building Go services in production"},
    {"title": "...", "description": "..."},
    {"title": "...", "description": "..."}
  ],
  "top_gaps": [
    {"title": "Cloud certifications", "description": "No AWS or GCP certification listed"},
    {"title": "...", "description": "..."},
    {"title": "...", "description": "..."}
  ],
  "feedback_summary": ["...", "...", "...", "...", "..."],
  "pros": ["...", "...", "..."],
  "cons": ["...", "...", "..."],
  "improvement_suggestions": ["...", "...", "...", "...", "..."],
  "ats_criteria_ratings": {
    "keyword_match": 7,
    "formatting": 8,
    "section_structure": 9,
    "quantified_achievements": 5,
    "action_verbs": 6,
    "contact_information": 10
  },
  "confidence_score": 85
}"#;

/// `today` is rendered into the prompt so date ranges such as "2022 - Present"
/// are judged against the real date.
pub fn scoring_prompt(request: &ScoringRequest, today: &str) -> String {
    format!(
        r#"Today's date is {today}.

Evaluate the following candidate for the position described below.

TARGET ROLE: {role}
TARGET COMPANY: {company}
CONTEXT: {context}

CANDIDATE RESUME:
{resume}

Instructions:
- overall_score and confidence_score are integers from 0 to 100.
- Return exactly 3 top_matches and exactly 3 top_gaps, each with a title and a description.
- Return exactly 5 feedback_summary items, 3 pros, 3 cons and 5 improvement_suggestions.
- Every ats_criteria_ratings value is an integer from 0 to 10.
- Respond with JSON only, following this structure:

{schema}"#,
        today = today,
        role = request.target_role,
        company = request.target_company,
        context = request.context_description,
        resume = request.candidate_text,
        schema = SCHEMA_EXAMPLE,
    )
}

pub fn opening_question_prompt(role: &str, resume_digest: &str) -> String {
    format!(
        "The candidate is interviewing for the role of {role}.\n\n\
         CANDIDATE RESUME:\n{resume_digest}\n\n\
         Greet the candidate briefly and ask your first interview question. \
         Tailor it to the role and to their background. Reply with the question only."
    )
}

/// Renders only the turns it is given; callers pass the trailing window.
pub fn next_turn_prompt(role: &str, recent_turns: &[DialogueTurn], latest_answer: &str) -> String {
    let transcript = if recent_turns.is_empty() {
        "(no earlier turns)".to_string()
    } else {
        recent_turns
            .iter()
            .map(|turn| format!("{}: {}", turn.speaker.label(), turn.text.trim()))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        "The candidate is interviewing for the role of {role}.\n\n\
         RECENT CONVERSATION:\n{transcript}\n\n\
         CANDIDATE'S LATEST ANSWER:\n{latest_answer}\n\n\
         First give one or two sentences of constructive feedback on the latest answer, \
         then ask the next interview question."
    )
}
