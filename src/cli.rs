// src/cli.rs
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

use crate::core::resolver::ResolverRoots;
use crate::core::{
    ChatCompletionClient, ConfigManager, FsOps, LocalDocumentStore, ScoringDriver, SourceResolver,
    SqliteProfileStore,
};
use crate::types::{JobContext, ScoringRequest};
use crate::web::start_web_server;

#[derive(Parser)]
#[command(name = "cv-analyzer")]
#[command(about = "Score resumes and run practice interviews")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API (default)
    Serve,
    /// Print the digest built from a local document
    Digest { file: PathBuf },
    /// Score a local document and print the result as JSON
    Score {
        file: PathBuf,
        #[arg(long)]
        role: Option<String>,
        #[arg(long)]
        company: Option<String>,
        #[arg(long)]
        context: Option<String>,
    },
}

pub async fn handle_command(cli: Cli, config: ConfigManager) -> Result<()> {
    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => start_web_server(config).await,
        Command::Digest { file } => {
            let digest = local_digest(&file).await?;
            println!("{}", digest);
            Ok(())
        }
        Command::Score {
            file,
            role,
            company,
            context,
        } => {
            let digest = local_digest(&file).await?;
            let client = ChatCompletionClient::new(&config.generation)?;
            let driver = ScoringDriver::new(Arc::new(client), config.generation.clone());

            let job = JobContext {
                target_role: role,
                target_company: company,
                context_description: context,
            };
            let result = driver.score(&ScoringRequest::new(digest, &job)).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }
    }
}

/// Digest of one file on disk; no applicant records are involved.
async fn local_digest(file: &Path) -> Result<String> {
    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    let path = FsOps::normalize_path(&cwd, file);
    info!("Building digest for {}", path.display());

    let resolver = SourceResolver::new(
        Arc::new(LocalDocumentStore),
        Arc::new(SqliteProfileStore::in_memory().await?),
        ResolverRoots {
            uploads_root: cwd.clone(),
            service_root: cwd,
        },
    );
    Ok(resolver.digest_from_path(&path).await?)
}
