// src/core/mod.rs
//! Resume analysis pipeline and its collaborators

pub mod analyzer;
pub mod config_manager;
pub mod database;
pub mod digest;
pub mod driver;
pub mod extractor;
pub mod fs_ops;
pub mod normalizer;
pub mod prompts;
pub mod resolver;
pub mod segmenter;
pub mod service_client;

#[cfg(test)]
pub(crate) mod testing;

pub use analyzer::ResumeAnalyzer;
pub use config_manager::{ConfigManager, GenerationConfig, StorageConfig};
pub use database::{ProfileStore, SqliteProfileStore};
pub use driver::ScoringDriver;
pub use fs_ops::{DocumentStore, FsOps, LocalDocumentStore};
pub use resolver::{DigestSource, ResolvedDigest, ResolverRoots, SourceResolver};
pub use service_client::{ChatCompletionClient, CompletionRequest, GenerativeClient};
