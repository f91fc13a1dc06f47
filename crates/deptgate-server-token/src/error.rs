// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TokenError {
	#[error("failed to sign access token: {0}")]
	Encode(#[source] jsonwebtoken::errors::Error),

	#[error("invalid access token: {0}")]
	Decode(#[source] jsonwebtoken::errors::Error),

	#[error("invalid token subject: {0}")]
	InvalidSubject(#[from] serde_json::Error),

	#[error("system clock error: {0}")]
	Clock(String),

	#[error("token expiry of {0} seconds is out of range")]
	ExpiryOutOfRange(u64),
}

pub type Result<T> = std::result::Result<T, TokenError>;
