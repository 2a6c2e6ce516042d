// src/types/dialogue.rs
//! Interview-practice dialogue

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    Interviewer,
    Candidate,
}

impl Speaker {
    pub fn label(&self) -> &'static str {
        match self {
            Speaker::Interviewer => "Interviewer",
            Speaker::Candidate => "Candidate",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DialogueTurn {
    pub speaker: Speaker,
    pub text: String,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

impl DialogueTurn {
    pub fn new(speaker: Speaker, text: impl Into<String>) -> Self {
        Self {
            speaker,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Trailing window of at most `n` turns
pub fn recent_turns(turns: &[DialogueTurn], n: usize) -> &[DialogueTurn] {
    &turns[turns.len().saturating_sub(n)..]
}

/// Append-only transcript. Alternation between speakers is not enforced.
/// Serialized as a bare array of turns.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DialogueSession {
    turns: Vec<DialogueTurn>,
}

impl DialogueSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_turns(turns: Vec<DialogueTurn>) -> Self {
        Self { turns }
    }

    pub fn push(&mut self, speaker: Speaker, text: impl Into<String>) -> &DialogueTurn {
        self.turns.push(DialogueTurn::new(speaker, text));
        &self.turns[self.turns.len() - 1]
    }

    pub fn turns(&self) -> &[DialogueTurn] {
        &self.turns
    }

    pub fn recent(&self, n: usize) -> &[DialogueTurn] {
        recent_turns(&self.turns, n)
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewOpening {
    pub first_question: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewReply {
    pub feedback_and_next_question: String,
    /// Termination is not modelled yet; always false.
    pub is_finished: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recent_returns_trailing_window() {
        let mut session = DialogueSession::new();
        session.push(Speaker::Interviewer, "q1");
        session.push(Speaker::Candidate, "a1");
        session.push(Speaker::Interviewer, "q2");

        let recent = session.recent(2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].text, "a1");
        assert_eq!(recent[1].text, "q2");
        assert_eq!(session.recent(10).len(), 3);
    }

    #[test]
    fn test_session_reads_bare_turn_array() {
        let session: DialogueSession = serde_json::from_str(
            r#"[{"speaker":"interviewer","text":"q1"},{"speaker":"candidate","text":"a1"}]"#,
        )
        .unwrap();
        assert_eq!(session.len(), 2);
        assert_eq!(recent_turns(session.turns(), 1)[0].text, "a1");
        assert!(recent_turns(&[], 4).is_empty());
    }

    #[test]
    fn test_turn_without_timestamp_deserializes() {
        let turn: DialogueTurn =
            serde_json::from_str(r#"{"speaker":"candidate","text":"Hello"}"#).unwrap();
        assert_eq!(turn.speaker, Speaker::Candidate);
        assert_eq!(turn.text, "Hello");
    }
}
