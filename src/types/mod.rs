// src/types/mod.rs
//! Data model shared across the analysis pipeline

pub mod cv_builder;
pub mod dialogue;
pub mod scoring;
pub mod section;

pub use cv_builder::{ApplicantRecord, CvRecord, CvSection};
pub use dialogue::{DialogueSession, DialogueTurn, InterviewOpening, InterviewReply, Speaker};
pub use scoring::{AtsCriteriaRatings, JobContext, MatchItem, ScoringRequest, ScoringResult};
pub use section::{SectionKey, SectionMap};
