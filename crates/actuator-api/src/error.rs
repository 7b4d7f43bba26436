use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Request rejections; rendered as plain-text bodies.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not sure what to do with Content-Type {0:?}")]
    UnsupportedContentType(String),

    #[error("Something unexpected happened reading the payload: {0}")]
    InvalidPayload(String),

    #[error("Unexpected payload version {0:?} from Alertmanager")]
    UnsupportedVersion(String),

    #[error("missing or invalid bearer token")]
    Unauthorized,

    #[error("no handler for {0}")]
    NotFound(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::UnsupportedContentType(_) | Self::InvalidPayload(_) | Self::UnsupportedVersion(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status(),
            [(header::CONTENT_TYPE, "text/plain")],
            self.to_string(),
        )
            .into_response()
    }
}
