// src/core/database.rs
//! Applicant and CV-builder lookups against the host application's SQLite store

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Row, SqlitePool};
use std::path::Path;
use tracing::info;

use crate::core::FsOps;
use crate::types::{ApplicantRecord, CvRecord, CvSection};

/// Read access to applicant profiles
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn find_applicant(&self, applicant_id: &str) -> Result<Option<ApplicantRecord>>;

    async fn find_cv_by_applicant(&self, applicant_id: &str) -> Result<Option<CvRecord>>;
}

pub struct SqliteProfileStore {
    pool: SqlitePool,
}

impl SqliteProfileStore {
    /// Open (creating if needed) the database file and run migrations
    pub async fn open(database_path: &Path) -> Result<Self> {
        if let Some(parent) = database_path.parent() {
            FsOps::ensure_dir_exists(parent).await?;
        }

        let database_url = format!("sqlite:{}?mode=rwc", database_path.display());
        let pool = SqlitePool::connect(&database_url).await.with_context(|| {
            format!("Failed to connect to database: {}", database_path.display())
        })?;

        info!("Database connection established: {}", database_path.display());
        Self::from_pool(pool).await
    }

    /// Private in-memory database, used by tests and the one-shot CLI commands
    pub async fn in_memory() -> Result<Self> {
        // a single connection keeps every query on the same in-memory database
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .context("Failed to open in-memory database")?;
        Self::from_pool(pool).await
    }

    async fn from_pool(pool: SqlitePool) -> Result<Self> {
        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn migrate(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS applicants (
                id TEXT PRIMARY KEY,
                resume_url TEXT,
                updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .context("Failed to create applicants table")?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS cv_builder (
                applicant_id TEXT PRIMARY KEY,
                sections_json TEXT NOT NULL DEFAULT '[]',
                updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .context("Failed to create cv_builder table")?;

        Ok(())
    }

    pub async fn upsert_applicant(&self, applicant: &ApplicantRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO applicants (id, resume_url) VALUES (?, ?)
            ON CONFLICT(id) DO UPDATE SET resume_url = excluded.resume_url,
                                          updated_at = datetime('now')
            "#,
        )
        .bind(&applicant.id)
        .bind(&applicant.resume_url)
        .execute(&self.pool)
        .await
        .with_context(|| format!("Failed to save applicant {}", applicant.id))?;
        Ok(())
    }

    pub async fn upsert_cv(&self, applicant_id: &str, cv: &CvRecord) -> Result<()> {
        let sections_json =
            serde_json::to_string(&cv.sections).context("Failed to serialize CV sections")?;
        sqlx::query(
            r#"
            INSERT INTO cv_builder (applicant_id, sections_json) VALUES (?, ?)
            ON CONFLICT(applicant_id) DO UPDATE SET sections_json = excluded.sections_json,
                                                    updated_at = datetime('now')
            "#,
        )
        .bind(applicant_id)
        .bind(sections_json)
        .execute(&self.pool)
        .await
        .with_context(|| format!("Failed to save CV for applicant {}", applicant_id))?;
        Ok(())
    }
}

#[async_trait]
impl ProfileStore for SqliteProfileStore {
    async fn find_applicant(&self, applicant_id: &str) -> Result<Option<ApplicantRecord>> {
        let row = sqlx::query("SELECT id, resume_url FROM applicants WHERE id = ?")
            .bind(applicant_id)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("Failed to load applicant {}", applicant_id))?;

        Ok(row.map(|row| ApplicantRecord {
            id: row.get("id"),
            resume_url: row.get("resume_url"),
        }))
    }

    async fn find_cv_by_applicant(&self, applicant_id: &str) -> Result<Option<CvRecord>> {
        let row = sqlx::query("SELECT sections_json FROM cv_builder WHERE applicant_id = ?")
            .bind(applicant_id)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("Failed to load CV for applicant {}", applicant_id))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let sections_json: String = row.get("sections_json");
        let sections = serde_json::from_str::<Vec<CvSection>>(&sections_json)
            .with_context(|| format!("Corrupt CV builder record for applicant {}", applicant_id))?;
        Ok(Some(CvRecord { sections }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_applicant_round_trip_and_update() {
        let store = SqliteProfileStore::in_memory().await.unwrap();
        assert!(store.find_applicant("a-1").await.unwrap().is_none());

        store
            .upsert_applicant(&ApplicantRecord {
                id: "a-1".into(),
                resume_url: Some("/uploads/cv.pdf".into()),
            })
            .await
            .unwrap();
        store
            .upsert_applicant(&ApplicantRecord {
                id: "a-1".into(),
                resume_url: None,
            })
            .await
            .unwrap();

        let applicant = store.find_applicant("a-1").await.unwrap().unwrap();
        assert_eq!(applicant.id, "a-1");
        assert_eq!(applicant.resume_url, None);
    }

    #[tokio::test]
    async fn test_cv_sections_are_loaded() {
        let store = SqliteProfileStore::in_memory().await.unwrap();
        let cv = CvRecord {
            sections: vec![CvSection {
                section_type: "skills".into(),
                content: json!(["Python", "Go"]),
            }],
        };
        store.upsert_cv("a-2", &cv).await.unwrap();

        let loaded = store.find_cv_by_applicant("a-2").await.unwrap().unwrap();
        assert_eq!(loaded.sections.len(), 1);
        assert_eq!(loaded.section("SKILLS").unwrap().content, json!(["Python", "Go"]));
        assert!(store.find_cv_by_applicant("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_corrupt_cv_json_is_an_error() {
        let store = SqliteProfileStore::in_memory().await.unwrap();
        sqlx::query("INSERT INTO cv_builder (applicant_id, sections_json) VALUES ('a-3', '{oops')")
            .execute(store.pool())
            .await
            .unwrap();

        let err = store.find_cv_by_applicant("a-3").await.unwrap_err();
        assert!(format!("{:#}", err).contains("Corrupt CV builder record for applicant a-3"));
    }
}
