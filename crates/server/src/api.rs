//! HTTP surface over the recommender.
//!
//! - `GET /` health message
//! - `GET /search?query=` matching titles
//! - `GET /recommend?movie=&top_n=` resolves the query, then recommends
//!
//! Not found answers 404, an ambiguous query 300 with suggestions, and a
//! service without artifacts 503.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::RecommendError;
use crate::orchestrator::ServiceState;
use crate::recommender::{DEFAULT_TOP_N, Recommender};
use crate::resolve::{Resolution, resolve_title, suggestions};

pub type AppState = Arc<ServiceState>;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct RecommendParams {
    pub movie: String,
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

fn default_top_n() -> usize {
    DEFAULT_TOP_N
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub query: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecommendResponse {
    pub input_movie: String,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: String,
    pub matches: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

/// Outcomes that don't produce recommendations
#[derive(Debug)]
pub enum ApiError {
    NotReady(String),
    NotFound(String),
    Ambiguous(Vec<String>),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, suggestions) = match self {
            Self::NotReady(reason) => (
                StatusCode::SERVICE_UNAVAILABLE,
                format!("Model not loaded: {reason}"),
                Vec::new(),
            ),
            Self::NotFound(movie) => (
                StatusCode::NOT_FOUND,
                format!("Movie '{movie}' not found"),
                Vec::new(),
            ),
            Self::Ambiguous(candidates) => (
                StatusCode::MULTIPLE_CHOICES,
                "Multiple matches found".to_string(),
                candidates,
            ),
            Self::Internal(message) => (StatusCode::INTERNAL_SERVER_ERROR, message, Vec::new()),
        };
        (status, Json(ErrorResponse { error, suggestions })).into_response()
    }
}

impl From<RecommendError> for ApiError {
    fn from(err: RecommendError) -> Self {
        match err {
            RecommendError::TitleNotFound { title } => Self::NotFound(title),
            other => Self::Internal(other.to_string()),
        }
    }
}

fn ready(state: &ServiceState) -> Result<&Arc<Recommender>, ApiError> {
    match state {
        ServiceState::Ready(recommender) => Ok(recommender),
        ServiceState::NotReady(reason) => Err(ApiError::NotReady(reason.clone())),
    }
}

// Handlers

pub async fn home() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": "Movie Recommender API is running" }))
}

pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    let recommender = ready(&state)?;
    let matches = recommender.search_movies(&params.query);
    Ok(Json(SearchResponse {
        query: params.query,
        matches,
    }))
}

pub async fn recommend(
    State(state): State<AppState>,
    Query(params): Query<RecommendParams>,
) -> Result<Json<RecommendResponse>, ApiError> {
    let recommender = ready(&state)?;

    let target = match resolve_title(recommender, &params.movie) {
        Resolution::Resolved(title) => title,
        Resolution::Ambiguous(candidates) => {
            warn!("Ambiguous query '{}' ({} matches)", params.movie, candidates.len());
            return Err(ApiError::Ambiguous(suggestions(&candidates)));
        }
        Resolution::NotFound => return Err(ApiError::NotFound(params.movie)),
    };

    let recommendations = recommender.recommend(&target, params.top_n)?;
    info!("Recommended {} titles for '{}'", recommendations.len(), target);
    Ok(Json(RecommendResponse {
        input_movie: target,
        recommendations,
    }))
}

/// Creates the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/search", get(search))
        .route("/recommend", get(recommend))
        .with_state(state)
}
