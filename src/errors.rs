use axum::http::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("failed to read analytics storage: {0}")]
    StorageRead(#[source] std::io::Error),
    #[error("stored analytics snapshot is corrupt: {0}")]
    Corrupt(#[source] serde_json::Error),
    #[error("failed to serialize analytics snapshot: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("failed to write analytics storage: {0}")]
    StorageWrite(#[source] std::io::Error),
    #[error("failed to read analytics seed {path:?}: {source}")]
    SeedRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("analytics seed {path:?} is not a valid snapshot: {source}")]
    SeedParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("no analytics snapshot exists yet, order was not recorded")]
    NotSeeded,
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn internal(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

impl From<AnalyticsError> for AppError {
    fn from(err: AnalyticsError) -> Self {
        match err {
            AnalyticsError::NotSeeded => Self {
                status: StatusCode::SERVICE_UNAVAILABLE,
                message: err.to_string(),
            },
            other => Self::internal(other),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
