//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("validation: {0}")]
    Validation(String),
    #[error("league rule: {0}")]
    LeagueRule(String),
    #[error("version conflict: {0}")]
    StaleVersion(String),
    #[error("concurrent update: {0}")]
    ModifiedConcurrently(String),
    #[error("duplicate: {0}")]
    Duplicate(String),
    #[error("in use: {0}")]
    InUse(String),
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
    #[error("migration: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

impl ApiError {
    /// Classify a store error: unique and foreign-key constraint failures
    /// become `Duplicate` / `InUse` with the given messages, anything else
    /// passes through as `Db`.
    pub fn from_constraint(err: sqlx::Error, duplicate: &str, in_use: &str) -> Self {
        if let sqlx::Error::Database(ref db) = err {
            if db.is_unique_violation() {
                return ApiError::Duplicate(duplicate.to_string());
            }
            if db.is_foreign_key_violation() {
                return ApiError::InUse(in_use.to_string());
            }
        }
        ApiError::Db(err)
    }
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
            ApiError::LeagueRule(_) => (StatusCode::BAD_REQUEST, "league_rule_violation"),
            ApiError::StaleVersion(_) => (StatusCode::CONFLICT, "stale_version"),
            ApiError::ModifiedConcurrently(_) => (StatusCode::CONFLICT, "concurrent_update"),
            ApiError::Duplicate(_) => (StatusCode::CONFLICT, "duplicate"),
            ApiError::InUse(_) => (StatusCode::CONFLICT, "in_use"),
            ApiError::Db(e) => {
                if let sqlx::Error::RowNotFound = e {
                    (StatusCode::NOT_FOUND, "not_found")
                } else {
                    (StatusCode::INTERNAL_SERVER_ERROR, "database_error")
                }
            }
            ApiError::Migrate(_) => (StatusCode::INTERNAL_SERVER_ERROR, "database_error"),
        };
        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };
        (status, Json(body)).into_response()
    }
}
