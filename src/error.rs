use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use utoipa::ToSchema;
use validator::ValidationErrors;

use crate::repository::RepositoryError;

// --- Client-facing messages ---

pub const CATEGORY_NOT_FOUND: &str = "Categoria não encontrada";
pub const CREATE_FAILED: &str = "Não foi possível adicionar a categoria.";
pub const UPDATE_CONFLICT: &str = "Esse registro já foi atualizado.";
pub const UPDATE_FAILED: &str = "Não foi possível atualizar o registro.";
pub const DELETE_FAILED: &str = "Não foi possível remover a categoria.";
pub const CATEGORY_DELETED: &str = "Categoria removida com sucesso.";
const INVALID_PAYLOAD: &str = "Dados inválidos.";
const STORE_UNAVAILABLE: &str = "Erro interno ao acessar os dados.";

/// AppError
///
/// Every failure a handler can return. Converted into a JSON `ErrorBody` at
/// the handler boundary.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Unhandled store failure on a read path.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// ErrorBody
///
/// `errors` maps field names to their messages and is only present for
/// validation failures.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<BTreeMap<String, Vec<String>>>,
}

impl ErrorBody {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            errors: None,
        }
    }
}

/// Flattens `validator` output into field -> messages, falling back to the
/// rule code when a constraint carries no message.
pub fn field_errors(errors: &ValidationErrors) -> BTreeMap<String, Vec<String>> {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, failures)| {
            let messages = failures
                .iter()
                .map(|failure| {
                    failure
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| failure.code.to_string())
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Validation(ref errors) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    message: INVALID_PAYLOAD.to_string(),
                    errors: Some(field_errors(errors)),
                },
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorBody::message(msg)),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ErrorBody::message(msg)),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, ErrorBody::message(msg)),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, ErrorBody::message(msg)),
            AppError::Repository(e) => {
                tracing::error!("Repository error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody::message(STORE_UNAVAILABLE),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
