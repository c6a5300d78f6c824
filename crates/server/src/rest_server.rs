//! REST API server implementation using Axum

use crate::models::{BatchResponse, CatalogQuery, CatalogResponse, EntityCard};
use axum::{
    extract::{Path, Query, State},
    http::{HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use dexter_catalog::{clamp_page, CatalogSession, CatalogStatus};
use dexter_core::config::ServerConfig;
use dexter_core::{DetailRecord, Error};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<CatalogSession>,
}

impl AppState {
    pub fn new(session: Arc<CatalogSession>) -> Self {
        Self { session }
    }
}

/// Build the Axum router with all endpoints
pub fn build_router(state: AppState, server_config: &ServerConfig) -> Router {
    let router = Router::new()
        // Catalog
        .route("/api/v1/catalog", get(catalog_handler))
        .route("/api/v1/catalog/next-batch", post(next_batch_handler))
        .route("/api/v1/catalog/status", get(status_handler))
        // Detail
        .route("/api/v1/entities/{name}", get(entity_handler))
        // Taxonomies
        .route("/api/v1/types", get(types_handler))
        .route("/api/v1/generations", get(generations_handler))
        // Health check
        .route("/health", get(health_handler));

    // Configure CORS based on allowed_origins
    let cors_layer = if server_config.allowed_origins.is_empty() {
        CorsLayer::new()
    } else if server_config.allowed_origins.iter().any(|o| o == "*") {
        CorsLayer::permissive()
    } else {
        let mut cors = CorsLayer::new()
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([axum::http::header::CONTENT_TYPE]);

        for origin in &server_config.allowed_origins {
            match HeaderValue::from_str(origin) {
                Ok(header_value) => cors = cors.allow_origin(header_value),
                Err(_) => tracing::warn!("Ignoring invalid CORS origin '{origin}'"),
            }
        }
        cors
    };

    router
        .layer(cors_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /api/v1/catalog
///
/// Loads the first batch on demand, then filters and paginates whatever
/// has been loaded so far. Out-of-range pages are clamped.
async fn catalog_handler(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> Result<Json<CatalogResponse>, ApiError> {
    tracing::info!(
        "Catalog request: search={:?}, type={:?}, generation={:?}, page={:?}",
        query.search,
        query.entity_type,
        query.generation,
        query.page
    );

    state.session.load_initial_batch().await?;

    let criteria = query.criteria();
    let requested = query.page.unwrap_or(1);
    let mut result = state.session.query_catalog(&criteria, requested).await;
    let page = clamp_page(requested, result.total_pages);
    if page != requested {
        result = state.session.query_catalog(&criteria, page).await;
    }

    Ok(Json(CatalogResponse {
        items: result.items.into_iter().map(EntityCard::from).collect(),
        page,
        total_pages: result.total_pages,
        total_items: result.total_items,
        status: state.session.status(),
    }))
}

/// POST /api/v1/catalog/next-batch
async fn next_batch_handler(
    State(state): State<AppState>,
) -> Result<Json<BatchResponse>, ApiError> {
    let outcome = state.session.load_next_batch().await?;
    Ok(Json(BatchResponse::new(outcome, state.session.status())))
}

/// GET /api/v1/catalog/status
async fn status_handler(State(state): State<AppState>) -> Json<CatalogStatus> {
    Json(state.session.status())
}

/// GET /api/v1/entities/{name}
async fn entity_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<DetailRecord>, ApiError> {
    tracing::info!("Detail request for '{name}'");

    let record = state.session.get_entity_detail(&name).await?;
    Ok(Json(record))
}

/// GET /api/v1/types
async fn types_handler(State(state): State<AppState>) -> Result<Json<Vec<String>>, ApiError> {
    Ok(Json(state.session.list_types().await?))
}

/// GET /api/v1/generations
async fn generations_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<String>>, ApiError> {
    Ok(Json(state.session.list_generations().await?))
}

/// GET /health
async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    use serde_json::json;

    let status = state.session.status();
    let health_status = json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "catalog": {
            "loaded": status.loaded,
            "complete": status.complete,
            "loading": status.loading,
        }
    });

    (StatusCode::OK, Json(health_status))
}

/// Error handling for API endpoints
#[derive(Debug)]
pub enum ApiError {
    InvalidRequest(String),
    NotFound(String),
    BadGateway(String),
    Internal(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            ApiError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadGateway(msg) => {
                tracing::warn!("Upstream failure: {msg}");
                (StatusCode::BAD_GATEWAY, msg)
            }
            ApiError::Internal(err) => {
                // Log the full error details for debugging
                tracing::error!("Internal server error: {err:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred".to_string(),
                )
            }
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::NotFound(name) => ApiError::NotFound(format!("Entity not found: {name}")),
            Error::InvalidInput(msg) => ApiError::InvalidRequest(msg),
            err @ (Error::Upstream { .. }
            | Error::Parse { .. }
            | Error::Join { .. }
            | Error::MalformedChain(_)
            | Error::CatalogLoad { .. }) => ApiError::BadGateway(err.to_string()),
            other => ApiError::Internal(other.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_mapping() {
        assert!(matches!(
            ApiError::from(Error::not_found("mew")),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            ApiError::from(Error::invalid_input("bad")),
            ApiError::InvalidRequest(_)
        ));
        assert!(matches!(
            ApiError::from(Error::catalog_load(0, Error::upstream("u", Some(500), "boom"))),
            ApiError::BadGateway(_)
        ));
        assert!(matches!(
            ApiError::from(Error::config("x")),
            ApiError::Internal(_)
        ));
    }
}
