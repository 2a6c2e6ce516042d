// src/core/testing.rs
//! In-memory collaborators for unit tests

use anyhow::Result;
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::core::service_client::{CompletionRequest, GenerativeClient};
use crate::core::{DocumentStore, ProfileStore};
use crate::types::{ApplicantRecord, CvRecord, CvSection};

#[derive(Default)]
pub struct FakeDocumentStore {
    files: HashMap<PathBuf, Vec<u8>>,
}

impl FakeDocumentStore {
    pub fn with_file(mut self, path: &str, bytes: &[u8]) -> Self {
        self.files.insert(PathBuf::from(path), bytes.to_vec());
        self
    }
}

#[async_trait]
impl DocumentStore for FakeDocumentStore {
    async fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    async fn read_bytes(&self, path: &Path) -> Result<Vec<u8>> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("not found: {}", path.display()))
    }
}

#[derive(Default)]
pub struct FakeProfileStore {
    applicants: HashMap<String, ApplicantRecord>,
    cvs: HashMap<String, CvRecord>,
    failing: bool,
}

impl FakeProfileStore {
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn with_applicant(mut self, id: &str, resume_url: Option<&str>) -> Self {
        self.applicants.insert(
            id.to_string(),
            ApplicantRecord {
                id: id.to_string(),
                resume_url: resume_url.map(String::from),
            },
        );
        self
    }

    /// `sections` is the builder's JSON array of `{type, content}` entries
    pub fn with_cv(mut self, id: &str, sections: serde_json::Value) -> Self {
        let sections: Vec<CvSection> =
            serde_json::from_value(sections).expect("test CV sections are well-formed");
        self.cvs.insert(id.to_string(), CvRecord { sections });
        self
    }
}

#[async_trait]
impl ProfileStore for FakeProfileStore {
    async fn find_applicant(&self, applicant_id: &str) -> Result<Option<ApplicantRecord>> {
        if self.failing {
            anyhow::bail!("database is locked");
        }
        Ok(self.applicants.get(applicant_id).cloned())
    }

    async fn find_cv_by_applicant(&self, applicant_id: &str) -> Result<Option<CvRecord>> {
        if self.failing {
            anyhow::bail!("database is locked");
        }
        Ok(self.cvs.get(applicant_id).cloned())
    }
}

/// Replays canned responses in order and records every request
pub struct ScriptedClient {
    responses: Mutex<VecDeque<std::result::Result<String, String>>>,
    calls: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedClient {
    pub fn new(responses: Vec<std::result::Result<String, String>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<CompletionRequest> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerativeClient for ScriptedClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        self.calls.lock().unwrap().push(request.clone());
        match self.responses.lock().unwrap().pop_front() {
            Some(Ok(text)) => Ok(text),
            Some(Err(message)) => Err(anyhow::anyhow!(message)),
            None => anyhow::bail!("no scripted response left"),
        }
    }
}
