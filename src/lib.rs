//! Resume analysis: text extraction, section segmentation, digest building,
//! source resolution, and scoring / interview practice against a generative
//! language service.

pub mod cli;
pub mod core;
pub mod error;
pub mod types;
pub mod web;

pub use crate::core::{ConfigManager, ResumeAnalyzer};
pub use error::{AnalysisError, Result};
pub use web::start_web_server;
