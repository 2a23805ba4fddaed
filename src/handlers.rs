use crate::{
    AppState,
    auth::AuthUser,
    error::{
        AppError, CATEGORY_DELETED, CATEGORY_NOT_FOUND, CREATE_FAILED, DELETE_FAILED, ErrorBody,
        Result, UPDATE_CONFLICT, UPDATE_FAILED,
    },
    extractor::AppJson,
    models::{Category, CategoryPayload, MessageResponse},
    repository::RepositoryError,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::{HeaderValue, header},
    response::IntoResponse,
};

/// Cache-Control value for the list endpoint. Zero opts out of caching.
pub fn list_cache_control(max_age: u32) -> HeaderValue {
    if max_age == 0 {
        return HeaderValue::from_static("no-store");
    }
    HeaderValue::from_str(&format!("public,max-age={}", max_age))
        .unwrap_or_else(|_| HeaderValue::from_static("no-store"))
}

// --- Public Handlers ---

/// list_categories
///
/// [Public Route] Every category, ordered by id. Shared caches may keep the
/// response for `LIST_CACHE_SECONDS`, varied by `User-Agent`.
#[utoipa::path(
    get,
    path = "/v1/categories",
    responses((status = 200, description = "All categories", body = [Category])),
    tag = "categories"
)]
pub async fn list_categories(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let categories = state.repo.list().await?;
    let headers = [
        (
            header::CACHE_CONTROL,
            list_cache_control(state.config.list_cache_seconds),
        ),
        (header::VARY, HeaderValue::from_static("user-agent")),
    ];
    Ok((headers, Json(categories)))
}

/// get_category
///
/// [Public Route] A single category by id.
#[utoipa::path(
    get,
    path = "/v1/categories/{id}",
    params(("id" = i32, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Found", body = Category),
        (status = 404, description = "Not Found", body = ErrorBody)
    ),
    tag = "categories"
)]
pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Category>> {
    state
        .repo
        .find_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(CATEGORY_NOT_FOUND.to_string()))
}

// --- Employee Handlers ---
// The `AuthUser` extension is inserted by the employee route layer.

/// create_category
///
/// [Employee Route] Validates the payload and inserts it. Any `id` in the body
/// is ignored; the store assigns one.
#[utoipa::path(
    post,
    path = "/v1/categories",
    request_body = CategoryPayload,
    responses(
        (status = 200, description = "Created", body = Category),
        (status = 400, description = "Invalid payload or store failure", body = ErrorBody),
        (status = 401, description = "Unauthenticated", body = ErrorBody),
        (status = 403, description = "Missing employee role", body = ErrorBody)
    ),
    tag = "categories"
)]
pub async fn create_category(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    AppJson(payload): AppJson<CategoryPayload>,
) -> Result<Json<Category>> {
    let draft = payload.into_draft()?;

    match state.repo.create(draft).await {
        Ok(category) => {
            tracing::info!(user_id = %user.id, category_id = category.id, "category created");
            Ok(Json(category))
        }
        Err(e) => {
            tracing::error!(user_id = %user.id, "create category failed: {}", e);
            Err(AppError::BadRequest(CREATE_FAILED.to_string()))
        }
    }
}

/// update_category
///
/// [Employee Route] Full replace. The body id must match the path id; that is
/// checked before validation and before touching the store.
#[utoipa::path(
    put,
    path = "/v1/categories/{id}",
    params(("id" = i32, Path, description = "Category ID")),
    request_body = CategoryPayload,
    responses(
        (status = 200, description = "Updated", body = Category),
        (status = 400, description = "Invalid payload, conflict or store failure", body = ErrorBody),
        (status = 404, description = "Id mismatch", body = ErrorBody)
    ),
    tag = "categories"
)]
pub async fn update_category(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<CategoryPayload>,
) -> Result<Json<Category>> {
    if payload.id != Some(id) {
        return Err(AppError::NotFound(CATEGORY_NOT_FOUND.to_string()));
    }

    let draft = payload.into_draft()?;

    match state.repo.update(id, draft).await {
        Ok(category) => {
            tracing::info!(user_id = %user.id, category_id = id, version = category.version, "category updated");
            Ok(Json(category))
        }
        Err(RepositoryError::Conflict) => {
            tracing::warn!(user_id = %user.id, category_id = id, "category update conflict");
            Err(AppError::BadRequest(UPDATE_CONFLICT.to_string()))
        }
        Err(e) => {
            tracing::error!(user_id = %user.id, category_id = id, "update category failed: {}", e);
            Err(AppError::BadRequest(UPDATE_FAILED.to_string()))
        }
    }
}

/// delete_category
///
/// [Employee Route] Removes a category after confirming it exists.
#[utoipa::path(
    delete,
    path = "/v1/categories/{id}",
    params(("id" = i32, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 400, description = "Store failure", body = ErrorBody),
        (status = 404, description = "Not Found", body = ErrorBody)
    ),
    tag = "categories"
)]
pub async fn delete_category(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i32>,
) -> Result<Json<MessageResponse>> {
    let existing = match state.repo.find_by_id(id).await {
        Ok(existing) => existing,
        Err(e) => {
            tracing::error!(user_id = %user.id, category_id = id, "delete lookup failed: {}", e);
            return Err(AppError::BadRequest(DELETE_FAILED.to_string()));
        }
    };

    if existing.is_none() {
        return Err(AppError::NotFound(CATEGORY_NOT_FOUND.to_string()));
    }

    match state.repo.delete(id).await {
        Ok(()) => {
            tracing::info!(user_id = %user.id, category_id = id, "category deleted");
            Ok(Json(MessageResponse::new(CATEGORY_DELETED)))
        }
        // Removed by someone else after the lookup.
        Err(RepositoryError::Conflict) => {
            tracing::warn!(user_id = %user.id, category_id = id, "category already deleted");
            Err(AppError::NotFound(CATEGORY_NOT_FOUND.to_string()))
        }
        Err(e) => {
            tracing::error!(user_id = %user.id, category_id = id, "delete category failed: {}", e);
            Err(AppError::BadRequest(DELETE_FAILED.to_string()))
        }
    }
}
