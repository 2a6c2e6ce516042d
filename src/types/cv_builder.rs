// src/types/cv_builder.rs
//! Records read from the surrounding application's profile storage

use serde::{Deserialize, Serialize};

/// Applicant row as stored by the host application
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicantRecord {
    pub id: String,
    /// Document location exactly as stored (URL path, absolute path or bare file name)
    pub resume_url: Option<String>,
}

/// Structured CV entered through the on-platform form builder
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CvRecord {
    #[serde(default)]
    pub sections: Vec<CvSection>,
}

/// One builder section. `content` shape depends on `section_type`
/// ("personal" is an object, "skills" a list of strings or objects,
/// "experience"/"education" lists of objects).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CvSection {
    #[serde(rename = "type")]
    pub section_type: String,
    #[serde(default)]
    pub content: serde_json::Value,
}

impl CvRecord {
    /// First section whose type matches, case-insensitively
    pub fn section(&self, section_type: &str) -> Option<&CvSection> {
        self.sections
            .iter()
            .find(|s| s.section_type.eq_ignore_ascii_case(section_type))
    }
}
