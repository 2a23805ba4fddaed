use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use jsonwebtoken::{DecodingKey, Validation, decode, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;
use uuid::Uuid;

use crate::{
    config::{AppConfig, Env},
    error::AppError,
};

/// Claims
///
/// Payload expected inside the bearer JWT. The `role` claim is trusted
/// verbatim; no user store is consulted.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the principal's id.
    pub sub: Uuid,
    /// Role used for authorization, e.g. "employee".
    pub role: String,
    pub exp: usize,
    pub iat: usize,
}

/// AuthUser
///
/// Resolved identity of an authenticated request.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub role: String,
}

/// AuthUser Extractor Implementation
///
/// 1. Local bypass: in `Env::Local`, `x-user-id` + `x-user-role` headers are
///    accepted as the principal.
/// 2. Otherwise a `Bearer` token is required, decoded with the configured
///    secret, and its expiry validated.
///
/// Rejection: `AppError::Unauthorized` (401).
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AppConfig: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let config = AppConfig::from_ref(state);

        if config.env == Env::Local {
            if let Some(user) = local_bypass(parts) {
                tracing::debug!(user_id = %user.id, role = %user.role, "local auth bypass");
                return Ok(user);
            }
        }

        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or_else(|| AppError::Unauthorized("Missing bearer token".to_string()))?;

        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());
        let mut validation = Validation::default();
        validation.validate_exp = true;

        let token_data = decode::<Claims>(token, &decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => {
                    AppError::Unauthorized("Token expired".to_string())
                }
                _ => {
                    tracing::debug!("rejected token: {:?}", e);
                    AppError::Unauthorized("Invalid token".to_string())
                }
            }
        })?;

        Ok(AuthUser {
            id: token_data.claims.sub,
            role: token_data.claims.role,
        })
    }
}

// Both headers must be present and the id must parse; anything else falls
// through to token validation.
fn local_bypass(parts: &Parts) -> Option<AuthUser> {
    let id = parts
        .headers
        .get("x-user-id")
        .and_then(|value| value.to_str().ok())
        .and_then(|raw| Uuid::parse_str(raw).ok())?;
    let role = parts
        .headers
        .get("x-user-role")
        .and_then(|value| value.to_str().ok())?;

    Some(AuthUser {
        id,
        role: role.to_string(),
    })
}

/// Role
///
/// Marker for a role name checked by `RequireRole`.
pub trait Role {
    const NAME: &'static str;
}

/// Staff allowed to create, update and delete categories.
pub struct Employee;

impl Role for Employee {
    const NAME: &'static str = "employee";
}

/// RequireRole
///
/// Guard that authenticates the request and then checks the principal holds
/// `R::NAME`.
///
/// ```ignore
/// async fn handler(RequireRole(user, _): RequireRole<Employee>) { ... }
/// ```
pub struct RequireRole<R>(pub AuthUser, pub PhantomData<R>);

impl<S, R> FromRequestParts<S> for RequireRole<R>
where
    S: Send + Sync,
    R: Role + Send + Sync,
    AppConfig: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;

        if user.role != R::NAME {
            tracing::warn!(user_id = %user.id, role = %user.role, required = R::NAME, "role check failed");
            return Err(AppError::Forbidden(format!("Role '{}' required", R::NAME)));
        }

        Ok(RequireRole(user, PhantomData))
    }
}
