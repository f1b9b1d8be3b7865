//! HTTP error mapping.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use analogic_core::resolver::ResolveError;

use crate::generator::GenerationError;
use crate::journal::JournalError;

/// Every failure a handler can report.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
	/// Missing or malformed input.
	#[error("{0}")]
	BadRequest(String),

	/// Nothing matched the request.
	#[error("{0}")]
	NotFound(String),

	/// Wrong or absent admin key.
	#[error("unauthorized")]
	Unauthorized,

	/// The language model failed or is not configured.
	#[error(transparent)]
	Generation(#[from] GenerationError),

	/// A journal could not be written or read.
	#[error(transparent)]
	Journal(#[from] JournalError),
}

impl ApiError {
	/// HTTP status for this error.
	#[must_use]
	pub const fn status(&self) -> StatusCode {
		match self {
			Self::BadRequest(_) => StatusCode::BAD_REQUEST,
			Self::NotFound(_) => StatusCode::NOT_FOUND,
			Self::Unauthorized => StatusCode::UNAUTHORIZED,
			Self::Generation(e) => match e {
				GenerationError::NotConfigured => StatusCode::INTERNAL_SERVER_ERROR,
				GenerationError::Timeout => StatusCode::GATEWAY_TIMEOUT,
				GenerationError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
				GenerationError::Authentication(_)
				| GenerationError::Network(_)
				| GenerationError::Provider(_) => StatusCode::BAD_GATEWAY,
			},
			Self::Journal(_) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}
}

impl From<ResolveError> for ApiError {
	fn from(err: ResolveError) -> Self {
		if err.is_malformed() {
			Self::BadRequest(err.to_string())
		} else {
			Self::NotFound(err.to_string())
		}
	}
}

impl From<JsonRejection> for ApiError {
	fn from(rejection: JsonRejection) -> Self {
		Self::BadRequest(rejection.body_text())
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let status = self.status();
		if status.is_server_error() {
			tracing::error!(error = %self, %status, "request failed");
		} else {
			tracing::debug!(error = %self, %status, "request rejected");
		}
		(status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
	}
}
