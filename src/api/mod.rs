//! HTTP boundary. Thin axum layer over the sync engine; all user-visible
//! failures of the engine surface as 404 with a fixed message, everything
//! else as 500 with the cause kept in the logs.

use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::db::Repository;
use crate::error::AppError;
use crate::riot::ddragon::ChampionCatalog;
use crate::sync::SyncService;

pub mod routes;

#[derive(Clone)]
pub struct AppState {
    pub sync: Arc<SyncService<Repository>>,
    pub store: Repository,
    pub champions: Arc<ChampionCatalog>,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("Internal server error")]
    Internal,
}

impl From<AppError> for ApiError {
    fn from(e: AppError) -> Self {
        match e {
            AppError::NotFound(message) | AppError::Retrieval(message) => {
                ApiError::NotFound(message)
            }
            other => {
                error!(error = ?other, "unhandled error at the API boundary");
                ApiError::Internal
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/summoners", get(routes::summoners::list_summoners))
        .route("/summoners/:name", get(routes::summoners::get_summoner))
        .with_state(state)
}
