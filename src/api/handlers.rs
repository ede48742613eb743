//! API Handlers
//!
//! HTTP request handlers for each cache endpoint.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;

use crate::cache::{policy, CacheStore};
use crate::error::{CacheError, Result};
use crate::models::{
    DeleteResponse, GetResponse, HealthResponse, SetRequest, SetResponse, StatsResponse,
    SweepResponse,
};

/// Application state shared across all handlers.
///
/// The cache serializes its own operations, so handlers share it through an
/// `Arc` without any extra lock.
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<CacheStore>,
}

impl AppState {
    /// Creates a new AppState with the given cache store.
    pub fn new(cache: CacheStore) -> Self {
        Self {
            cache: Arc::new(cache),
        }
    }
}

/// Handler for PUT /set
///
/// Stores a JSON value in the cache with optional TTL in seconds.
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    match req.ttl {
        Some(ttl) => {
            state
                .cache
                .set_with_ttl(&req.key, &req.value, Duration::from_secs(ttl))
                .await?
        }
        None => state.cache.set(&req.key, &req.value).await?,
    }

    Ok(Json(SetResponse::new(req.key)))
}

/// Handler for GET /get/:key
///
/// Retrieves a live value from the cache by key.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    let entry = state.cache.get_entry(&key).await?;
    let value: Value = entry.decode_value()?;
    let remaining = entry.ttl_remaining(policy::now());

    Ok(Json(GetResponse::new(
        key,
        value,
        entry.expire_at,
        remaining.as_millis() as u64,
    )))
}

/// Handler for DELETE /del/:key
///
/// Deletes a key from the cache. Missing keys are not an error.
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DeleteResponse>> {
    state.cache.delete(&key).await?;

    Ok(Json(DeleteResponse::new(key)))
}

/// Handler for GET /stats
///
/// Returns current cache statistics.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = state.cache.stats().await;

    Json(StatsResponse::new(stats, state.cache.is_sweeping()))
}

/// Handler for POST /sweep
///
/// Runs one bulk expiry delete immediately, independent of the background sweep.
pub async fn sweep_handler(State(state): State<AppState>) -> Result<Json<SweepResponse>> {
    let removed = state.cache.sweep_now().await?;

    Ok(Json(SweepResponse { removed }))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheOptions;
    use crate::storage::MemoryStore;
    use serde_json::json;

    fn test_state() -> AppState {
        let cache = CacheStore::new(Arc::new(MemoryStore::new()), CacheOptions::default()).unwrap();
        AppState::new(cache)
    }

    #[tokio::test]
    async fn test_set_and_get_handler() {
        let state = test_state();

        let req = SetRequest {
            key: "test_key".to_string(),
            value: json!({"name": "test_value"}),
            ttl: None,
        };
        let result = set_handler(State(state.clone()), Json(req)).await;
        assert!(result.is_ok());

        let response = get_handler(State(state.clone()), Path("test_key".to_string()))
            .await
            .unwrap();
        assert_eq!(response.value, json!({"name": "test_value"}));
        assert!(response.ttl_remaining_ms <= 60_000);
        assert!(response.ttl_remaining_ms > 50_000);
    }

    #[tokio::test]
    async fn test_set_handler_with_ttl() {
        let state = test_state();

        let req = SetRequest {
            key: "short".to_string(),
            value: json!(1),
            ttl: Some(5),
        };
        let response = set_handler(State(state.clone()), Json(req)).await.unwrap();
        assert_eq!(response.key, "short");

        let response = get_handler(State(state), Path("short".to_string()))
            .await
            .unwrap();
        assert_eq!(response.value, json!(1));
        assert!(response.ttl_remaining_ms <= 5_000);
    }

    #[tokio::test]
    async fn test_get_nonexistent_key() {
        let state = test_state();

        let result = get_handler(State(state), Path("nonexistent".to_string())).await;
        assert!(matches!(result, Err(CacheError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_handler() {
        let state = test_state();

        let req = SetRequest {
            key: "to_delete".to_string(),
            value: json!("value"),
            ttl: None,
        };
        let response = set_handler(State(state.clone()), Json(req)).await.unwrap();
        assert_eq!(response.key, "to_delete");

        let result = delete_handler(State(state.clone()), Path("to_delete".to_string())).await;
        assert!(result.is_ok());

        let result = get_handler(State(state.clone()), Path("to_delete".to_string())).await;
        assert!(result.is_err());

        let result = delete_handler(State(state), Path("to_delete".to_string())).await;
        assert!(result.is_ok(), "Deleting a missing key should succeed");
    }

    #[tokio::test]
    async fn test_stats_handler() {
        let state = test_state();

        let response = stats_handler(State(state)).await;
        assert_eq!(response.stats.hits, 0);
        assert_eq!(response.stats.misses, 0);
        assert!(!response.sweeping);
    }

    #[tokio::test]
    async fn test_sweep_handler() {
        let state = test_state();
        state
            .cache
            .set_with_ttl("gone", "value", Duration::ZERO)
            .await
            .unwrap();
        state.cache.set("kept", "value").await.unwrap();

        let response = sweep_handler(State(state.clone())).await.unwrap();
        assert_eq!(response.removed, 1);

        let stats = stats_handler(State(state)).await;
        assert_eq!(stats.stats.sweeps, 1);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }

    #[tokio::test]
    async fn test_set_invalid_request() {
        let state = test_state();

        let req = SetRequest {
            key: "".to_string(),
            value: json!("value"),
            ttl: None,
        };
        let result = set_handler(State(state), Json(req)).await;
        assert!(matches!(result, Err(CacheError::InvalidRequest(_))));
    }
}
