//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Store Error Enum ==
/// Failures surfaced by a document store backend.
#[derive(Error, Debug)]
pub enum StoreError {
    /// MongoDB driver failure (connection, timeout, server error)
    #[error("MongoDB error: {0}")]
    Backend(#[from] mongodb::error::Error),

    /// Value could not be encoded to BSON
    #[error("Failed to encode value: {0}")]
    Encode(#[from] bson::ser::Error),

    /// Stored value could not be decoded into the requested type
    #[error("Failed to decode value: {0}")]
    Decode(#[from] bson::de::Error),

    /// Backend refused or could not serve the request
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

// == Cache Error Enum ==
/// Unified error type for the cache.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key absent, or present but expired
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Document store failure, propagated verbatim
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Rejected cache options
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl CacheError {
    /// Returns true for the `NotFound` variant.
    pub fn is_not_found(&self) -> bool {
        matches!(self, CacheError::NotFound(_))
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::InvalidRequest(_) | CacheError::InvalidConfig(_) => {
                StatusCode::BAD_REQUEST
            }
            CacheError::Store(StoreError::Encode(_)) => StatusCode::BAD_REQUEST,
            CacheError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
