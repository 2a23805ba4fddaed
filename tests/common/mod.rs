#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response, header},
};
use chrono::Utc;
use jsonwebtoken::{EncodingKey, Header, encode};
use serde::de::DeserializeOwned;
use shop_categories::{
    AppConfig, AppState, create_router,
    auth::Claims,
    models::{Category, CategoryDraft},
    repository::{CategoryRepository, RepositoryError, RepositoryResult},
};
use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex},
    time::{SystemTime, UNIX_EPOCH},
};
use uuid::Uuid;

// --- IN-MEMORY REPOSITORY ---

#[derive(Default)]
struct Store {
    rows: BTreeMap<i32, Category>,
    next_id: i32,
}

/// Mirrors the Postgres semantics: sequence ids, version bump on update,
/// `Conflict` when an update or delete matches no row.
#[derive(Default)]
pub struct InMemoryRepository {
    store: Mutex<Store>,
    /// When true, every write fails with a database error.
    pub fail_writes: bool,
    /// When true, every read fails with a database error.
    pub fail_reads: bool,
    /// When true, `delete` removes the row but reports it as already gone,
    /// as if another writer got there between lookup and delete.
    pub lose_delete_race: bool,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_writes() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    pub fn failing_reads() -> Self {
        Self {
            fail_reads: true,
            ..Self::default()
        }
    }

    pub fn with_titles(titles: &[&str]) -> Self {
        let repo = Self::new();
        {
            let mut store = repo.store.lock().unwrap();
            for title in titles {
                store.next_id += 1;
                let id = store.next_id;
                let now = Utc::now();
                store.rows.insert(
                    id,
                    Category {
                        id,
                        title: title.to_string(),
                        version: 1,
                        created_at: now,
                        updated_at: now,
                    },
                );
            }
        }
        repo
    }

    pub fn snapshot(&self) -> Vec<Category> {
        self.store.lock().unwrap().rows.values().cloned().collect()
    }
}

fn simulated_failure() -> RepositoryError {
    RepositoryError::Database(sqlx::Error::PoolTimedOut)
}

#[async_trait]
impl CategoryRepository for InMemoryRepository {
    async fn list(&self) -> RepositoryResult<Vec<Category>> {
        if self.fail_reads {
            return Err(simulated_failure());
        }
        Ok(self.snapshot())
    }

    async fn find_by_id(&self, id: i32) -> RepositoryResult<Option<Category>> {
        if self.fail_reads {
            return Err(simulated_failure());
        }
        Ok(self.store.lock().unwrap().rows.get(&id).cloned())
    }

    async fn create(&self, draft: CategoryDraft) -> RepositoryResult<Category> {
        if self.fail_writes {
            return Err(simulated_failure());
        }
        let mut store = self.store.lock().unwrap();
        store.next_id += 1;
        let now = Utc::now();
        let category = Category {
            id: store.next_id,
            title: draft.title,
            version: 1,
            created_at: now,
            updated_at: now,
        };
        store.rows.insert(category.id, category.clone());
        Ok(category)
    }

    async fn update(&self, id: i32, draft: CategoryDraft) -> RepositoryResult<Category> {
        if self.fail_writes {
            return Err(simulated_failure());
        }
        let mut store = self.store.lock().unwrap();
        let row = store.rows.get_mut(&id).ok_or(RepositoryError::Conflict)?;
        if draft.expected_version.is_some_and(|v| v != row.version) {
            return Err(RepositoryError::Conflict);
        }
        row.title = draft.title;
        row.version += 1;
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn delete(&self, id: i32) -> RepositoryResult<()> {
        if self.fail_writes {
            return Err(simulated_failure());
        }
        let removed = self.store.lock().unwrap().rows.remove(&id);
        if self.lose_delete_race {
            return Err(RepositoryError::Conflict);
        }
        match removed {
            Some(_) => Ok(()),
            None => Err(RepositoryError::Conflict),
        }
    }
}

// --- TEST UTILITIES ---

pub fn test_state(repo: Arc<InMemoryRepository>) -> AppState {
    AppState {
        repo,
        config: AppConfig::default(),
    }
}

pub fn test_router(repo: Arc<InMemoryRepository>) -> Router {
    create_router(test_state(repo))
}

fn now_secs() -> usize {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as usize
}

/// Signs an HS256 token with the default test secret.
pub fn token_for(role: &str) -> String {
    token_with_expiry(role, now_secs() + 3600)
}

pub fn token_with_expiry(role: &str, exp: usize) -> String {
    let claims = Claims {
        sub: Uuid::new_v4(),
        role: role.to_string(),
        exp,
        iat: now_secs(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(AppConfig::default().jwt_secret.as_bytes()),
    )
    .unwrap()
}

pub fn bearer(role: &str) -> String {
    format!("Bearer {}", token_for(role))
}

pub fn json_request(method: &str, uri: &str, auth: Option<&str>, body: serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn empty_request(method: &str, uri: &str, auth: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn read_json<T: DeserializeOwned>(response: Response<Body>) -> T {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
