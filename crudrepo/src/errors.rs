//! # Repository errors
//!
//! Every operation returns [`RepoResult`]. Storage errors are classified once,
//! in [`RepoError::from_db`]:
//! - `DbErr::RecordNotFound` / `DbErr::RecordNotUpdated` become [`RepoError::NotFound`]
//! - unique and foreign-key violations become [`RepoError::IntegrityConflict`]
//! - anything else is passed through as [`RepoError::Database`]
//!
//! Construction-time failures ([`RepoError::AttributeMismatch`],
//! [`RepoError::UnsupportedPrimaryKey`]) are raised by the repository builder,
//! never by an operation.
//!
//! With the `axum` feature, `RepoError` implements `IntoResponse`: user-facing
//! kinds map to 404 / 409 / 422 / 400 and everything else to a sanitized 500
//! whose details are logged through `tracing`.

use sea_orm::{DbErr, SqlErr};
use std::fmt;

use crate::core::bindings::BindingSlot;

pub type RepoResult<T> = Result<T, RepoError>;

#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    /// Zero rows matched where one was required.
    #[error("{resource} with {column} = {value} not found")]
    NotFound {
        resource: String,
        column: String,
        value: String,
    },

    /// The database rejected a write because of a constraint.
    #[error("{resource} conflicts with an existing record: {detail}")]
    IntegrityConflict { resource: String, detail: String },

    /// Entity columns and domain fields disagree.
    #[error(
        "attribute mismatch between {entity} and {domain}: only on entity [{}], only on {domain} [{}]",
        entity_only.join(", "),
        domain_only.join(", ")
    )]
    AttributeMismatch {
        entity: String,
        domain: String,
        entity_only: Vec<String>,
        domain_only: Vec<String>,
    },

    /// A sealed binding was assigned after the repository was built.
    #[error("{slot} binding is frozen (bound to {bound})")]
    FrozenBinding { slot: BindingSlot, bound: String },

    /// A lookup, filter or ordering column is not a column of the entity.
    #[error("{resource} has no column named '{column}'")]
    UnknownColumn { resource: String, column: String },

    /// Only single-column primary keys are supported.
    #[error("{resource} has {columns} primary key columns, expected exactly one")]
    UnsupportedPrimaryKey { resource: String, columns: usize },

    /// The input value failed field validation.
    #[error("validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("database error: {0}")]
    Database(#[source] DbErr),
}

impl RepoError {
    /// Classifies a storage error raised while working on `resource`.
    pub fn from_db(resource: &str, err: DbErr) -> Self {
        match err.sql_err() {
            Some(
                SqlErr::UniqueConstraintViolation(detail)
                | SqlErr::ForeignKeyConstraintViolation(detail),
            ) => {
                tracing::warn!(resource, detail = %detail, "write rejected by constraint");
                return Self::IntegrityConflict {
                    resource: resource.to_string(),
                    detail,
                };
            }
            _ => {}
        }
        match err {
            DbErr::RecordNotFound(detail) => Self::NotFound {
                resource: resource.to_string(),
                column: "record".to_string(),
                value: detail,
            },
            DbErr::RecordNotUpdated => Self::NotFound {
                resource: resource.to_string(),
                column: "record".to_string(),
                value: "<unchanged>".to_string(),
            },
            other => Self::Database(other),
        }
    }

    pub(crate) fn not_found(resource: &str, column: &str, value: impl fmt::Display) -> Self {
        Self::NotFound {
            resource: resource.to_string(),
            column: column.to_string(),
            value: value.to_string(),
        }
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::IntegrityConflict { .. })
    }
}

#[cfg(feature = "axum")]
mod response {
    use axum::{
        Json,
        http::StatusCode,
        response::{IntoResponse, Response},
    };
    use serde::Serialize;

    use super::RepoError;

    /// Error body sent to clients (sanitized)
    #[derive(Serialize)]
    struct ErrorResponse {
        error: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        details: Option<serde_json::Value>,
    }

    impl RepoError {
        /// HTTP status for this error kind.
        #[must_use]
        pub fn status_code(&self) -> StatusCode {
            match self {
                Self::NotFound { .. } => StatusCode::NOT_FOUND,
                Self::IntegrityConflict { .. } => StatusCode::CONFLICT,
                Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
                Self::UnknownColumn { .. } => StatusCode::BAD_REQUEST,
                Self::AttributeMismatch { .. }
                | Self::FrozenBinding { .. }
                | Self::UnsupportedPrimaryKey { .. }
                | Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            }
        }
    }

    impl IntoResponse for RepoError {
        fn into_response(self) -> Response {
            let status = self.status_code();
            let body = match &self {
                Self::NotFound { resource, .. } => ErrorResponse {
                    error: format!("{resource} not found"),
                    details: None,
                },
                Self::IntegrityConflict { resource, .. } => ErrorResponse {
                    error: format!("{resource} conflicts with an existing record"),
                    details: None,
                },
                Self::Validation(errors) => ErrorResponse {
                    error: "Validation failed".to_string(),
                    details: serde_json::to_value(errors).ok(),
                },
                Self::UnknownColumn { .. } => ErrorResponse {
                    error: self.to_string(),
                    details: None,
                },
                _ => {
                    tracing::error!(error = %self, "repository error");
                    ErrorResponse {
                        error: "Internal Server Error".to_string(),
                        details: None,
                    }
                }
            };
            (status, Json(body)).into_response()
        }
    }
}
