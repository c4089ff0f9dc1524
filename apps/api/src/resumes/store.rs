use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::types::Json;
use sqlx::PgPool;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::models::resume::{NewResume, Resume, ResumePatch, ResumeRow};

#[derive(Debug, Error)]
pub enum StoreError {
    /// No row matched both the id and the owner. Missing and foreign rows are
    /// deliberately reported the same way.
    #[error("Resume not found or unauthorized")]
    NotFoundOrUnauthorized,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Owner-scoped persistence for resumes.
///
/// `get` is the only unscoped read; callers are responsible for checking
/// ownership of what it returns. `update` and `delete` filter on the owner
/// inside the store operation itself.
#[async_trait]
pub trait ResumeStore: Send + Sync {
    async fn list(&self, user_id: &str) -> StoreResult<Vec<Resume>>;
    async fn get(&self, id: i32) -> StoreResult<Option<Resume>>;
    async fn create(&self, user_id: &str, input: NewResume) -> StoreResult<Resume>;
    async fn update(&self, id: i32, user_id: &str, patch: ResumePatch) -> StoreResult<Resume>;
    async fn delete(&self, id: i32, user_id: &str) -> StoreResult<()>;
}

#[derive(Clone)]
pub struct PgResumeStore {
    pool: PgPool,
}

impl PgResumeStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResumeStore for PgResumeStore {
    async fn list(&self, user_id: &str) -> StoreResult<Vec<Resume>> {
        let rows = sqlx::query_as::<_, ResumeRow>(
            "SELECT * FROM resumes WHERE user_id = $1 ORDER BY id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        debug!("Loaded {} resumes for user {user_id}", rows.len());
        Ok(rows.into_iter().map(Resume::from).collect())
    }

    async fn get(&self, id: i32) -> StoreResult<Option<Resume>> {
        let row = sqlx::query_as::<_, ResumeRow>("SELECT * FROM resumes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Resume::from))
    }

    async fn create(&self, user_id: &str, input: NewResume) -> StoreResult<Resume> {
        // One timestamp for both columns so a fresh row has created_at == updated_at.
        let now = Utc::now();
        let row = sqlx::query_as::<_, ResumeRow>(
            r#"
            INSERT INTO resumes
                (user_id, title, personal_info, experience, education, skills,
                 is_published, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(&input.title)
        .bind(Json(&input.personal_info))
        .bind(Json(&input.experience))
        .bind(Json(&input.education))
        .bind(Json(&input.skills))
        .bind(input.is_published)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        info!("Created resume {} for user {user_id}", row.id);
        Ok(row.into())
    }

    async fn update(&self, id: i32, user_id: &str, patch: ResumePatch) -> StoreResult<Resume> {
        let row = sqlx::query_as::<_, ResumeRow>(
            r#"
            UPDATE resumes SET
                title = COALESCE($3, title),
                personal_info = COALESCE($4, personal_info),
                experience = COALESCE($5, experience),
                education = COALESCE($6, education),
                skills = COALESCE($7, skills),
                is_published = COALESCE($8, is_published),
                updated_at = $9
            WHERE id = $1 AND user_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(patch.title)
        .bind(patch.personal_info.map(Json))
        .bind(patch.experience.map(Json))
        .bind(patch.education.map(Json))
        .bind(patch.skills.map(Json))
        .bind(patch.is_published)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFoundOrUnauthorized)?;

        info!("Updated resume {id} for user {user_id}");
        Ok(row.into())
    }

    async fn delete(&self, id: i32, user_id: &str) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM resumes WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        info!(
            "Delete of resume {id} for user {user_id} removed {} row(s)",
            result.rows_affected()
        );
        Ok(())
    }
}

/// Process-local store with the same semantics as the Postgres one.
/// Used by the test suites and by `STORAGE_BACKEND=memory`.
#[derive(Default)]
pub struct MemoryResumeStore {
    inner: RwLock<MemoryTable>,
}

#[derive(Default)]
struct MemoryTable {
    next_id: i32,
    rows: BTreeMap<i32, Resume>,
}

impl MemoryResumeStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ResumeStore for MemoryResumeStore {
    async fn list(&self, user_id: &str) -> StoreResult<Vec<Resume>> {
        let table = self.inner.read().await;
        Ok(table
            .rows
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn get(&self, id: i32) -> StoreResult<Option<Resume>> {
        Ok(self.inner.read().await.rows.get(&id).cloned())
    }

    async fn create(&self, user_id: &str, input: NewResume) -> StoreResult<Resume> {
        let mut table = self.inner.write().await;
        table.next_id += 1;
        let now = Utc::now();
        let resume = Resume {
            id: table.next_id,
            user_id: user_id.to_string(),
            title: input.title,
            personal_info: input.personal_info,
            experience: input.experience,
            education: input.education,
            skills: input.skills,
            is_published: input.is_published,
            created_at: now,
            updated_at: now,
        };
        table.rows.insert(resume.id, resume.clone());

        info!("Created resume {} for user {user_id}", resume.id);
        Ok(resume)
    }

    async fn update(&self, id: i32, user_id: &str, patch: ResumePatch) -> StoreResult<Resume> {
        let mut table = self.inner.write().await;
        let resume = table
            .rows
            .get_mut(&id)
            .filter(|r| r.user_id == user_id)
            .ok_or(StoreError::NotFoundOrUnauthorized)?;

        patch.apply_to(resume);
        resume.updated_at = Utc::now();

        info!("Updated resume {id} for user {user_id}");
        Ok(resume.clone())
    }

    async fn delete(&self, id: i32, user_id: &str) -> StoreResult<()> {
        let mut table = self.inner.write().await;
        if table.rows.get(&id).is_some_and(|r| r.user_id == user_id) {
            table.rows.remove(&id);
            info!("Deleted resume {id} for user {user_id}");
        }
        Ok(())
    }
}
