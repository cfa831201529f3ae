//! Error taxonomy for the service and its HTTP mapping.
//!
//! Every failure a request can hit is an [`ApiError`]. Input-driven kinds
//! surface their message verbatim with a 400; configuration and unexpected
//! failures are logged in full and answered with a generic 500.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::envelope::Envelope;
use crate::provider::ProviderError;

pub type ApiResult<T> = Result<T, ApiError>;

const INTERNAL_MESSAGE: &str = "Internal server error";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Request body must be a valid JSON object")]
    InvalidBody,

    #[error("Request must contain exactly one of: fibonacci, prime, lcm, hcf, AI")]
    NoRecognizedKey,

    #[error(
        "Request must contain exactly one functional key, found multiple: {}",
        .0.join(", ")
    )]
    MultipleRecognizedKeys(Vec<&'static str>),

    #[error("{key} value must be {expected}")]
    TypeMismatch {
        key: &'static str,
        expected: &'static str,
    },

    #[error("{label} input must be non-negative")]
    NegativeInput { label: &'static str },

    #[error("{label} input too large (max: {max})")]
    InputTooLarge { label: &'static str, max: i64 },

    #[error("{label} input array cannot be empty")]
    EmptyCollection { label: &'static str },

    #[error("{label} input array too large (max: {max})")]
    CollectionTooLarge { label: &'static str, max: usize },

    #[error("All elements in {label} array must be integers")]
    NonIntegerElement { label: &'static str },

    #[error("{label} numbers must be non-negative")]
    NegativeElement { label: &'static str },

    #[error("All elements in {label} array must be positive integers")]
    NonPositiveElement { label: &'static str },

    #[error("{label} array elements must not exceed {max}")]
    ElementTooLarge { label: &'static str, max: u64 },

    #[error("AI question cannot be empty")]
    EmptyQuestion,

    #[error("AI question too long (max: {max} characters)")]
    QuestionTooLong { max: usize },

    #[error("AI service request failed: {0}")]
    ProviderUnavailable(String),

    #[error("AI service timed out")]
    ProviderTimeout,

    #[error("Invalid response from AI service")]
    ProviderMalformedResponse,

    #[error("{0} is not configured")]
    ConfigurationMissing(&'static str),

    #[error("Endpoint not found")]
    RouteNotFound,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::RouteNotFound => StatusCode::NOT_FOUND,
            ApiError::ConfigurationMissing(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            _ => StatusCode::BAD_REQUEST,
        }
    }

    /// Message placed in the envelope. Server-side details never leave the process.
    pub fn public_message(&self) -> String {
        if self.status_code().is_server_error() {
            INTERNAL_MESSAGE.to_string()
        } else {
            self.to_string()
        }
    }
}

impl From<ProviderError> for ApiError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Unavailable(detail) => ApiError::ProviderUnavailable(detail),
            ProviderError::Timeout => ApiError::ProviderTimeout,
            ProviderError::Malformed(detail) => {
                tracing::warn!(%detail, "discarding malformed provider response");
                ApiError::ProviderMalformedResponse
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = ?self, "request failed");
        } else {
            tracing::warn!(%status, error = %self, "request rejected");
        }
        (status, Json(Envelope::failure(self.public_message()))).into_response()
    }
}
