use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::borrow::Cow;
use ts_rs::TS;
use utoipa::ToSchema;
use validator::{Validate, ValidationError, ValidationErrors};

const TITLE_REQUIRED: &str = "Este campo é obrigatório";

// --- Core Schema (Mapped to Database) ---

/// Category
///
/// A row of the `categories` table. `id` is assigned by the database sequence
/// and never changes; `version` is the optimistic-concurrency token bumped on
/// every update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow)]
#[ts(export)]
pub struct Category {
    pub id: i32,
    pub title: String,
    pub version: i32,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

// --- Request Payloads ---

/// CategoryPayload
///
/// Body accepted by create (POST) and full-replace update (PUT).
/// `title` is optional in the JSON shape so a missing title is reported as a
/// field error instead of a parse failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct CategoryPayload {
    /// Ignored on create. On update it must equal the id in the path.
    pub id: Option<i32>,

    #[validate(
        required(message = "Este campo é obrigatório"),
        custom(function = "not_blank"),
        length(min = 3, max = 60, message = "Este campo deve conter entre 3 e 60 caracteres")
    )]
    #[schema(example = "Drinks")]
    pub title: Option<String>,

    /// Version the client last read. When present, the update only applies if
    /// the stored row still carries it.
    pub version: Option<i32>,
}

/// CategoryDraft
///
/// Validated, store-ready form of a `CategoryPayload`.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryDraft {
    pub title: String,
    pub expected_version: Option<i32>,
}

// Empty or whitespace-only counts as missing.
fn not_blank(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::new("required").with_message(Cow::Borrowed(TITLE_REQUIRED)));
    }
    Ok(())
}

impl CategoryPayload {
    /// Runs the declared constraints and converts into a draft.
    pub fn into_draft(self) -> Result<CategoryDraft, ValidationErrors> {
        self.validate()?;
        Ok(CategoryDraft {
            title: self.title.unwrap_or_default(),
            expected_version: self.version,
        })
    }
}

// --- Response Payloads ---

/// MessageResponse
///
/// Plain confirmation body, e.g. after a delete.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
