// src/core/digest.rs
//! Renders segmented or structured resume data into the bounded analysis digest

use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

use crate::error::{AnalysisError, Result};
use crate::types::{CvRecord, SectionKey, SectionMap};

/// Digests shorter than this are not worth sending to the scoring service
pub const MIN_DIGEST_CHARS: usize = 50;
pub const RAW_FALLBACK_CAP: usize = 3000;
const MAX_LINKS: usize = 5;

/// Rendered sections in priority order with their character caps
pub const SECTION_CAPS: [(SectionKey, usize); 4] = [
    (SectionKey::Skills, 1000),
    (SectionKey::Experience, 2000),
    (SectionKey::Education, 500),
    (SectionKey::Summary, 500),
];

fn email_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}").expect("valid regex")
    })
}

fn link_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?i)(?:https?://[^\s<>"')]+|(?:www\.)?(?:linkedin\.com|github\.com)/[^\s<>"')]+)"#)
            .expect("valid regex")
    })
}

pub fn extract_email(raw: &str) -> Option<String> {
    email_re().find(raw).map(|m| m.as_str().to_string())
}

/// Distinct profile/web links, in order of appearance
pub fn extract_links(raw: &str) -> Vec<String> {
    let mut links: Vec<String> = Vec::new();
    for m in link_re().find_iter(raw) {
        let link = m.as_str().trim_end_matches(['.', ',', ';']).to_string();
        if !links.contains(&link) {
            links.push(link);
        }
        if links.len() == MAX_LINKS {
            break;
        }
    }
    links
}

pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Render a segmented resume. Falls back to a prefix of the raw text when no
/// prioritized section was found.
pub fn build_digest(sections: &SectionMap, raw_text: &str) -> String {
    let blocks: Vec<String> = SECTION_CAPS
        .iter()
        .filter_map(|(key, cap)| {
            sections
                .get(key)
                .map(|body| body.trim())
                .filter(|body| !body.is_empty())
                .map(|body| {
                    format!(
                        "{}:\n{}",
                        key.as_str().to_uppercase(),
                        truncate_chars(body, *cap)
                    )
                })
        })
        .collect();

    if blocks.is_empty() {
        return truncate_chars(raw_text.trim(), RAW_FALLBACK_CAP).to_string();
    }

    let mut parts = Vec::new();
    if let Some(email) = extract_email(raw_text) {
        parts.push(format!("EMAIL: {}", email));
    }
    let links = extract_links(raw_text);
    if !links.is_empty() {
        parts.push(format!("LINKS: {}", links.join(", ")));
    }
    parts.extend(blocks);
    parts.join("\n\n")
}

/// Render structured CV-builder data. No caps are applied on this path.
pub fn build_structured_digest(cv: &CvRecord) -> String {
    let mut parts = Vec::new();

    if let Some(personal) = cv.section("personal") {
        let lines: Vec<String> = [
            ("NAME", &["name", "fullName", "full_name"][..]),
            ("TITLE", &["title", "headline"][..]),
            ("EMAIL", &["email"][..]),
            ("LOCATION", &["location", "address"][..]),
            ("SUMMARY", &["summary", "bio", "about"][..]),
        ]
        .iter()
        .filter_map(|(label, keys)| field(&personal.content, keys).map(|v| format!("{}: {}", label, v)))
        .collect();
        if !lines.is_empty() {
            parts.push(lines.join("\n"));
        }
    }

    if let Some(skills) = cv.section("skills") {
        let names = skill_names(&skills.content);
        if !names.is_empty() {
            parts.push(format!("SKILLS: {}", names.join(", ")));
        }
    }

    if let Some(experience) = cv.section("experience") {
        let entries: Vec<String> = entries(&experience.content)
            .filter_map(render_experience)
            .collect();
        if !entries.is_empty() {
            parts.push(format!("EXPERIENCE:\n{}", entries.join("\n")));
        }
    }

    if let Some(education) = cv.section("education") {
        let entries: Vec<String> = entries(&education.content)
            .filter_map(render_education)
            .collect();
        if !entries.is_empty() {
            parts.push(format!("EDUCATION:\n{}", entries.join("\n")));
        }
    }

    parts.join("\n\n")
}

/// Gate a digest on the minimum usable length
pub fn ensure_sufficient(digest: String) -> Result<String> {
    let length = digest.trim().chars().count();
    if length < MIN_DIGEST_CHARS {
        return Err(AnalysisError::InsufficientContent {
            length,
            required: MIN_DIGEST_CHARS,
        });
    }
    Ok(digest)
}

/// First non-blank string (or number) under any of `keys`
fn field(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match value.get(key) {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

fn entries(content: &Value) -> impl Iterator<Item = &Value> {
    content.as_array().into_iter().flatten()
}

fn skill_names(content: &Value) -> Vec<String> {
    match content {
        Value::String(s) => s
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect(),
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
                Value::Object(_) => field(item, &["name", "skill", "label"]),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn render_experience(entry: &Value) -> Option<String> {
    let role = field(entry, &["role", "title", "position"]);
    let company = field(entry, &["company", "employer", "organization"]);
    if role.is_none() && company.is_none() {
        return None;
    }

    let mut line = format!(
        "- {} at {} ({} - {})",
        role.unwrap_or_else(|| "Role".to_string()),
        company.unwrap_or_else(|| "Company".to_string()),
        field(entry, &["startDate", "start_date", "start"]).unwrap_or_default(),
        field(entry, &["endDate", "end_date", "end"]).unwrap_or_else(|| "Present".to_string()),
    );
    if let Some(description) = field(entry, &["description", "summary"]) {
        line.push_str(": ");
        line.push_str(&description);
    }
    Some(line)
}

fn render_education(entry: &Value) -> Option<String> {
    let degree = field(entry, &["degree", "qualification", "field"]);
    let institution = field(entry, &["institution", "school", "university"]);
    if degree.is_none() && institution.is_none() {
        return None;
    }

    let mut line = format!(
        "- {} at {}",
        degree.unwrap_or_else(|| "Degree".to_string()),
        institution.unwrap_or_else(|| "Institution".to_string()),
    );
    let start = field(entry, &["startDate", "start_date", "start"]);
    let end = field(entry, &["endDate", "end_date", "end", "year"]);
    match (start, end) {
        (Some(s), Some(e)) => line.push_str(&format!(" ({} - {})", s, e)),
        (None, Some(e)) => line.push_str(&format!(" ({})", e)),
        (Some(s), None) => line.push_str(&format!(" ({} - Present)", s)),
        (None, None) => {}
    }
    Some(line)
}
