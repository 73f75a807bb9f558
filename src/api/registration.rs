//! The registration workflow: validate, check uniqueness, hash, persist.
//!
//! The check-then-create sequence is not atomic. A registration that loses a
//! race at the insert surfaces as [`RegisterError::Store`] (500) because the
//! store, not this pre-check, owns the uniqueness guarantee.

use crate::{
    credentials::{CredentialHasher, HashError},
    store::{NewUser, Role, SharedUserStore, StoreError, User},
};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;
use thiserror::Error;
use tracing::{debug, error, info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;

pub const MSG_REQUIRED: &str = "All fields are required";
pub const MSG_EXISTS: &str = "User already exist";
pub const MSG_REGISTERED: &str = "registered";
pub const MSG_FAILED: &str = "failed";

#[derive(Debug, Error)]
pub enum RegisterError {
    #[error("{}", MSG_REQUIRED)]
    MissingFields,

    #[error("{}", MSG_EXISTS)]
    UserExists,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Hash(#[from] HashError),

    #[error("{0}")]
    Internal(String),
}

impl RegisterError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::MissingFields | Self::UserExists => StatusCode::BAD_REQUEST,
            Self::Store(_) | Self::Hash(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for RegisterError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = if status == StatusCode::BAD_REQUEST {
            json!({ "message": self.to_string() })
        } else {
            error!("Registration failed: {}", self);
            json!({ "message": MSG_FAILED, "error": self.to_string() })
        };

        (status, Json(body)).into_response()
    }
}

/// Request body for `POST /auth/register`. Every field is optional at the wire
/// level so a missing field yields the uniform 400 instead of a parse error.
#[derive(ToSchema, Deserialize, Default)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

/// A request that passed presence validation.
struct Candidate {
    name: String,
    email: String,
    password: SecretString,
}

impl RegisterRequest {
    fn validate(self) -> Result<Candidate, RegisterError> {
        let name = present(self.name).ok_or(RegisterError::MissingFields)?;
        let email = present(self.email).ok_or(RegisterError::MissingFields)?;
        let password = present(self.password).ok_or(RegisterError::MissingFields)?;

        Ok(Candidate {
            name,
            email: normalize_email(&email),
            password: SecretString::from(password),
        })
    }
}

/// Treat `null`, empty and whitespace-only values as missing.
///
/// Stricter than a truthiness check: whitespace-only strings count as
/// missing, and non-string JSON values fail deserialization so the whole
/// body is treated as empty.
fn present(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

/// Normalize an email for lookup and uniqueness checks.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Public projection of a stored user; the verifier is never part of it.
#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UserView {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
        }
    }
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct RegisterResponse {
    pub message: String,
    pub user: UserView,
}

impl RegisterResponse {
    #[must_use]
    pub fn registered(user: User) -> Self {
        Self {
            message: MSG_REGISTERED.to_string(),
            user: user.into(),
        }
    }
}

/// Registration service with its store and hasher injected.
#[derive(Clone)]
pub struct Registration {
    store: SharedUserStore,
    hasher: CredentialHasher,
}

impl Registration {
    #[must_use]
    pub fn new(store: SharedUserStore, hasher: CredentialHasher) -> Self {
        Self { store, hasher }
    }

    #[must_use]
    pub fn store(&self) -> &SharedUserStore {
        &self.store
    }

    /// Run the workflow and return the stored user.
    ///
    /// # Errors
    /// See [`RegisterError`]; validation and conflict map to 400, everything
    /// else to 500.
    #[instrument(skip(self))]
    pub async fn register(&self, request: RegisterRequest) -> Result<User, RegisterError> {
        let candidate = request.validate()?;

        if self.store.find_by_email(&candidate.email).await?.is_some() {
            debug!("email already registered");
            return Err(RegisterError::UserExists);
        }

        // bcrypt is CPU bound; keep it off the async workers
        let hasher = self.hasher;
        let password = candidate.password;
        let verifier = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|err| RegisterError::Internal(err.to_string()))??;

        let user = self
            .store
            .create(NewUser {
                name: candidate.name,
                email: candidate.email,
                password: verifier,
                role: Role::Member,
            })
            .await?;

        info!(user_id = %user.id, "user registered");

        Ok(user)
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("hasher", &self.hasher)
            .finish_non_exhaustive()
    }
}
