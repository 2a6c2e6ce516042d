// src/types/section.rs
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Semantic resume sections recognized by the segmenter.
///
/// Declaration order matters: when a header line satisfies several patterns
/// the earliest key in [`SectionKey::ALL`] wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKey {
    Contact,
    Summary,
    Experience,
    Education,
    Skills,
    Projects,
    Certifications,
}

impl SectionKey {
    pub const ALL: [SectionKey; 7] = [
        SectionKey::Contact,
        SectionKey::Summary,
        SectionKey::Experience,
        SectionKey::Education,
        SectionKey::Skills,
        SectionKey::Projects,
        SectionKey::Certifications,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKey::Contact => "contact",
            SectionKey::Summary => "summary",
            SectionKey::Experience => "experience",
            SectionKey::Education => "education",
            SectionKey::Skills => "skills",
            SectionKey::Projects => "projects",
            SectionKey::Certifications => "certifications",
        }
    }
}

impl fmt::Display for SectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Section key -> accumulated body text. Keys with no body are absent.
pub type SectionMap = HashMap<SectionKey, String>;
