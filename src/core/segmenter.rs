// src/core/segmenter.rs
//! Heuristic line classification of extracted resume text into sections

use regex::Regex;
use std::sync::OnceLock;

use crate::types::{SectionKey, SectionMap};

/// Lines at or above this length are always treated as body prose
const MAX_HEADER_LEN: usize = 50;

fn header_patterns() -> &'static [(SectionKey, Regex)] {
    static PATTERNS: OnceLock<Vec<(SectionKey, Regex)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        SectionKey::ALL
            .iter()
            .map(|key| {
                let alternatives = match key {
                    SectionKey::Contact => {
                        r"contact(?:\s+(?:info|information|details))?|personal\s+(?:info|information|details|profile)"
                    }
                    SectionKey::Summary => {
                        r"(?:professional\s+|career\s+|personal\s+)?(?:summary|profile|statement|objective)|about(?:\s+me)?"
                    }
                    SectionKey::Experience => {
                        r"(?:work\s+|professional\s+|relevant\s+)?experience|employment(?:\s+history)?|work\s+history|career\s+history"
                    }
                    SectionKey::Education => {
                        r"education(?:al\s+background)?|academic\s+(?:background|history)|qualifications"
                    }
                    SectionKey::Skills => {
                        r"(?:technical\s+|core\s+|key\s+)?skills(?:\s+(?:&|and)\s+\w+)?|core\s+competencies|technologies|tech\s+stack"
                    }
                    SectionKey::Projects => r"(?:personal\s+|selected\s+|key\s+)?projects",
                    SectionKey::Certifications => {
                        r"certifications?|licen[cs]es?(?:\s+(?:&|and)\s+certifications?)?|courses"
                    }
                };
                // Optional leading bullet/numbering, optional inline body after a colon
                let pattern = format!(
                    r"(?i)^[#*\-\d.\s]*(?:{})\s*(?::\s*(?P<rest>.*))?$",
                    alternatives
                );
                (*key, Regex::new(&pattern).expect("valid section pattern"))
            })
            .collect()
    })
}

/// A recognized header line and any body text that followed it inline
#[derive(Debug, PartialEq)]
struct Header<'a> {
    key: SectionKey,
    inline: Option<&'a str>,
}

fn classify(line: &str) -> Option<Header<'_>> {
    if line.chars().count() >= MAX_HEADER_LEN {
        return None;
    }
    header_patterns().iter().find_map(|(key, re)| {
        re.captures(line).map(|caps| Header {
            key: *key,
            inline: caps
                .name("rest")
                .map(|m| m.as_str().trim())
                .filter(|rest| !rest.is_empty()),
        })
    })
}

/// Fold state: finished sections, the active key (None = leading unclassified
/// content, which is discarded) and the body lines seen since the last header.
#[derive(Default)]
struct Fold<'a> {
    sections: SectionMap,
    current: Option<SectionKey>,
    buffer: Vec<&'a str>,
}

impl<'a> Fold<'a> {
    fn step(mut self, line: &'a str) -> Self {
        match classify(line) {
            Some(header) => {
                self = self.flush();
                self.current = Some(header.key);
                self.buffer.extend(header.inline);
            }
            None => self.buffer.push(line),
        }
        self
    }

    fn flush(mut self) -> Self {
        let body = self.buffer.join("\n");
        self.buffer.clear();

        if let Some(key) = self.current {
            if !body.is_empty() {
                self.sections
                    .entry(key)
                    .and_modify(|existing| {
                        existing.push('\n');
                        existing.push_str(&body);
                    })
                    .or_insert(body);
            }
        }
        self
    }
}

/// Split raw text into sections keyed by the most recent header line.
///
/// Never fails. Text with no header-like line yields an empty map.
pub fn segment(text: &str) -> SectionMap {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .fold(Fold::default(), Fold::step)
        .flush()
        .sections
}
