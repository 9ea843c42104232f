use std::fmt::Display;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::models::{PROCESSING_MESSAGE, message_response};
use crate::upload::ClientInputError;

/// Failure of a filter request, mapped onto an HTTP response.
#[derive(Debug)]
pub enum ApiError {
    /// Rejected input; the message is safe to show.
    Client(ClientInputError),
    /// Anything that went wrong while processing the document. Details are
    /// logged, never returned.
    Processing,
}

impl ApiError {
    pub fn processing(context: &str, err: impl Display) -> Self {
        tracing::error!(error = %err, "{context}");
        ApiError::Processing
    }
}

impl From<ClientInputError> for ApiError {
    fn from(e: ClientInputError) -> Self {
        tracing::debug!(error = %e, "rejected filter request");
        ApiError::Client(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Client(e) => message_response(e.status(), e.user_message()),
            ApiError::Processing => {
                message_response(StatusCode::INTERNAL_SERVER_ERROR, PROCESSING_MESSAGE)
            }
        }
    }
}
