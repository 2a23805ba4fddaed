use crate::models::{Category, CategoryDraft};
use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use thiserror::Error;

/// RepositoryError
///
/// Failures surfaced by the persistence layer.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The targeted row was changed or removed since the caller read it.
    #[error("category was modified or removed concurrently")]
    Conflict,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// CategoryRepository
///
/// Abstract contract for every persistence operation on categories. Handlers
/// only see this trait, so tests can swap Postgres for an in-memory store.
///
/// **Send + Sync + async_trait** make `Arc<dyn CategoryRepository>` shareable
/// across Axum's task boundaries.
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// All categories ordered by id.
    async fn list(&self) -> RepositoryResult<Vec<Category>>;

    async fn find_by_id(&self, id: i32) -> RepositoryResult<Option<Category>>;

    /// Inserts a new row. The store assigns `id` and starts `version` at 1.
    async fn create(&self, draft: CategoryDraft) -> RepositoryResult<Category>;

    /// Full replace of the mutable fields. Returns `Conflict` when no row
    /// matched (missing id, or `expected_version` is stale).
    async fn update(&self, id: i32, draft: CategoryDraft) -> RepositoryResult<Category>;

    /// Returns `Conflict` when the row was already gone.
    async fn delete(&self, id: i32) -> RepositoryResult<()>;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer across the application state.
pub type RepositoryState = Arc<dyn CategoryRepository>;

/// PostgresRepository
///
/// `CategoryRepository` backed by the `categories` table.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const CATEGORY_COLUMNS: &str = "id, title, version, created_at, updated_at";

#[async_trait]
impl CategoryRepository for PostgresRepository {
    async fn list(&self) -> RepositoryResult<Vec<Category>> {
        let query = format!("SELECT {CATEGORY_COLUMNS} FROM categories ORDER BY id");
        let categories = sqlx::query_as::<_, Category>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("list categories error: {:?}", e);
                e
            })?;
        Ok(categories)
    }

    async fn find_by_id(&self, id: i32) -> RepositoryResult<Option<Category>> {
        let query = format!("SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = $1");
        let category = sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!(id, "find category error: {:?}", e);
                e
            })?;
        Ok(category)
    }

    async fn create(&self, draft: CategoryDraft) -> RepositoryResult<Category> {
        let query = format!("INSERT INTO categories (title) VALUES ($1) RETURNING {CATEGORY_COLUMNS}");
        let category = sqlx::query_as::<_, Category>(&query)
            .bind(draft.title)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("create category error: {:?}", e);
                e
            })?;
        Ok(category)
    }

    /// The version predicate is skipped when the draft carries no expected
    /// version; a missing row still yields `Conflict`.
    async fn update(&self, id: i32, draft: CategoryDraft) -> RepositoryResult<Category> {
        let query = format!(
            r#"
            UPDATE categories
            SET title = $2, version = version + 1, updated_at = now()
            WHERE id = $1 AND ($3::INT IS NULL OR version = $3)
            RETURNING {CATEGORY_COLUMNS}
            "#
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .bind(draft.title)
            .bind(draft.expected_version)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!(id, "update category error: {:?}", e);
                RepositoryError::Database(e)
            })?
            .ok_or(RepositoryError::Conflict)
    }

    async fn delete(&self, id: i32) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!(id, "delete category error: {:?}", e);
                e
            })?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::Conflict);
        }
        Ok(())
    }
}
