// src/core/resolver.rs
//! Chooses which resume representation to analyze for an applicant

use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::core::digest::{build_digest, build_structured_digest, ensure_sufficient};
use crate::core::extractor::{extract_text, is_supported_extension};
use crate::core::segmenter::segment;
use crate::core::{DocumentStore, ProfileStore};
use crate::error::{AnalysisError, Result};

/// Directories candidate document paths are resolved against
#[derive(Debug, Clone)]
pub struct ResolverRoots {
    pub uploads_root: PathBuf,
    pub service_root: PathBuf,
}

/// Maps a stored document URL to one candidate filesystem path
pub type PathStrategy = fn(&str, &ResolverRoots) -> Option<PathBuf>;

/// Probed in order; the first existing file wins
pub const PATH_STRATEGIES: [(&str, PathStrategy); 4] = [
    ("as_stored", as_stored),
    ("absolute", as_absolute),
    ("uploads_basename", uploads_basename),
    ("service_relative", service_relative),
];

/// Path component of a stored URL (`https://host/uploads/cv.pdf` -> `/uploads/cv.pdf`)
fn url_path(url: &str) -> &str {
    let url = url.trim();
    match url.split_once("://") {
        Some((_, rest)) => rest.find('/').map(|idx| &rest[idx..]).unwrap_or(""),
        None => url,
    }
}

fn as_stored(url: &str, _roots: &ResolverRoots) -> Option<PathBuf> {
    let url = url.trim();
    (!url.is_empty()).then(|| PathBuf::from(url))
}

fn as_absolute(url: &str, _roots: &ResolverRoots) -> Option<PathBuf> {
    let path = url_path(url).trim_start_matches('/');
    (!path.is_empty()).then(|| Path::new("/").join(path))
}

fn uploads_basename(url: &str, roots: &ResolverRoots) -> Option<PathBuf> {
    Path::new(url_path(url))
        .file_name()
        .map(|name| roots.uploads_root.join(name))
}

fn service_relative(url: &str, roots: &ResolverRoots) -> Option<PathBuf> {
    let path = url_path(url).trim_start_matches('/');
    (!path.is_empty()).then(|| roots.service_root.join(path))
}

/// Distinct candidate paths for a stored document URL, in probe order
pub fn candidate_paths(url: &str, roots: &ResolverRoots) -> Vec<PathBuf> {
    let mut candidates: Vec<PathBuf> = Vec::new();
    for (_, strategy) in PATH_STRATEGIES {
        if let Some(path) = strategy(url, roots) {
            if !candidates.contains(&path) {
                candidates.push(path);
            }
        }
    }
    candidates
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DigestSource {
    Document { path: PathBuf },
    CvBuilder,
}

#[derive(Debug, Clone)]
pub struct ResolvedDigest {
    pub source: DigestSource,
    pub text: String,
}

pub struct SourceResolver {
    documents: Arc<dyn DocumentStore>,
    profiles: Arc<dyn ProfileStore>,
    roots: ResolverRoots,
}

impl SourceResolver {
    pub fn new(
        documents: Arc<dyn DocumentStore>,
        profiles: Arc<dyn ProfileStore>,
        roots: ResolverRoots,
    ) -> Self {
        Self {
            documents,
            profiles,
            roots,
        }
    }

    /// Uploaded document first, CV-builder data second. Fails with
    /// `NoUsableResumeContent` only when both are missing or too short.
    pub async fn resolve(&self, applicant_id: &str) -> Result<ResolvedDigest> {
        let applicant = self
            .profiles
            .find_applicant(applicant_id)
            .await
            .map_err(|e| AnalysisError::Storage(format!("{:#}", e)))?;

        if let Some(url) = applicant.and_then(|a| a.resume_url) {
            match self.digest_from_url(&url).await {
                Ok(Some(resolved)) => return Ok(resolved),
                Ok(None) => info!("No readable resume document on file for {}", applicant_id),
                Err(e) if is_recoverable(&e) => {
                    warn!("Resume document for {} unusable, trying CV builder: {}", applicant_id, e)
                }
                Err(e) => return Err(e),
            }
        }

        let cv = self
            .profiles
            .find_cv_by_applicant(applicant_id)
            .await
            .map_err(|e| AnalysisError::Storage(format!("{:#}", e)))?;

        if let Some(cv) = cv {
            match ensure_sufficient(build_structured_digest(&cv)) {
                Ok(text) => {
                    info!("Using CV builder data for {}", applicant_id);
                    return Ok(ResolvedDigest {
                        source: DigestSource::CvBuilder,
                        text,
                    });
                }
                Err(e) => warn!("CV builder data for {} unusable: {}", applicant_id, e),
            }
        }

        warn!("No usable resume content for {}", applicant_id);
        Err(AnalysisError::NoUsableResumeContent)
    }

    /// Probes every candidate in order. `Ok(None)` when none exists with a
    /// supported extension; the last recoverable error when none was usable.
    async fn digest_from_url(&self, url: &str) -> Result<Option<ResolvedDigest>> {
        let mut last_error = None;
        for path in candidate_paths(url, &self.roots) {
            if !self.documents.exists(&path).await {
                debug!("Resume candidate not found: {}", path.display());
                continue;
            }
            if !is_supported_extension(&path) {
                warn!("Unsupported resume document type: {}", path.display());
                continue;
            }
            match self.digest_from_path(&path).await {
                Ok(text) => {
                    info!("Using resume document {}", path.display());
                    return Ok(Some(ResolvedDigest {
                        source: DigestSource::Document { path },
                        text,
                    }));
                }
                Err(e) if is_recoverable(&e) => {
                    warn!("Resume candidate {} unusable: {}", path.display(), e);
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }
        last_error.map_or(Ok(None), Err)
    }

    /// Extractor -> segmenter -> digest for one document, gated on length
    pub async fn digest_from_path(&self, path: &Path) -> Result<String> {
        let bytes = self
            .documents
            .read_bytes(path)
            .await
            .map_err(|e| AnalysisError::UnreadableDocument(format!("{:#}", e)))?;
        let raw = extract_text(bytes, Some(path)).await?;
        let sections = segment(&raw);
        debug!("Segmented {} sections from {}", sections.len(), path.display());
        ensure_sufficient(build_digest(&sections, &raw))
    }
}

fn is_recoverable(error: &AnalysisError) -> bool {
    matches!(
        error,
        AnalysisError::UnreadableDocument(_) | AnalysisError::InsufficientContent { .. }
    )
}
