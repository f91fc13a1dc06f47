// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Server error types and HTTP response conversions.

use axum::{
	http::StatusCode,
	response::{IntoResponse, Response},
	Json,
};
use deptgate_server_db::DbError;
use deptgate_server_provisioning::ProvisioningError;
use deptgate_server_token::TokenError;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
	/// Invalid request parameters.
	#[error("Invalid request: {0}")]
	BadRequest(String),

	/// Database error from deptgate-server-db.
	#[error("Database error: {0}")]
	Db(#[from] DbError),

	/// Access token could not be signed.
	#[error("Token error: {0}")]
	Token(#[from] TokenError),

	/// Internal server error.
	#[error("Internal error: {0}")]
	Internal(String),
}

impl From<ProvisioningError> for ServerError {
	fn from(e: ProvisioningError) -> Self {
		match e {
			ProvisioningError::InvalidRequest(msg) => ServerError::BadRequest(msg),
			ProvisioningError::Database(e) => ServerError::Db(e),
		}
	}
}

/// Error response body.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
	pub error: String,
	pub message: String,
}

impl ErrorResponse {
	fn new(error: &str, message: impl Into<String>) -> Self {
		Self {
			error: error.to_string(),
			message: message.into(),
		}
	}
}

impl IntoResponse for ServerError {
	fn into_response(self) -> Response {
		let (status, error_response) = match &self {
			ServerError::BadRequest(msg) => (
				StatusCode::BAD_REQUEST,
				ErrorResponse::new("bad_request", msg.clone()),
			),
			ServerError::Db(e) => {
				tracing::error!(error = %e, "database error");
				(
					StatusCode::INTERNAL_SERVER_ERROR,
					ErrorResponse::new("database_error", "A database error occurred"),
				)
			}
			ServerError::Token(e) => {
				tracing::error!(error = %e, "token error");
				(
					StatusCode::INTERNAL_SERVER_ERROR,
					ErrorResponse::new("token_error", "Failed to issue access token"),
				)
			}
			ServerError::Internal(msg) => {
				tracing::error!(error = %msg, "internal error");
				(
					StatusCode::INTERNAL_SERVER_ERROR,
					ErrorResponse::new("internal_error", "An internal error occurred"),
				)
			}
		};

		(status, Json(error_response)).into_response()
	}
}
