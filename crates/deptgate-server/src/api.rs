// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Application state and router construction.

use std::sync::Arc;
use std::time::Duration;

use axum::{routing::get, Router};
use deptgate_server_config::ServerConfig;
use deptgate_server_db::UserRepository;
use deptgate_server_provisioning::DeptProvisioningService;
use deptgate_server_token::TokenIssuer;
use sqlx::sqlite::SqlitePool;

use crate::{error::ServerError, routes};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
	pub pool: SqlitePool,
	pub provisioning: Arc<DeptProvisioningService>,
	pub token_issuer: Arc<TokenIssuer>,
	/// Operator portal base URL, without a trailing slash.
	pub operator_url: String,
}

/// Build the application state from a migrated pool and resolved config.
///
/// # Errors
/// Returns `ServerError::Internal` if no token signing secret is configured.
pub fn create_app_state(pool: SqlitePool, config: &ServerConfig) -> Result<AppState, ServerError> {
	let secret = config
		.token
		.secret
		.as_ref()
		.ok_or_else(|| ServerError::Internal("token signing secret is not configured".to_string()))?;

	let user_repo = Arc::new(UserRepository::new(pool.clone()));
	let provisioning = Arc::new(DeptProvisioningService::new(user_repo));
	let token_issuer = Arc::new(TokenIssuer::new(
		secret,
		Duration::from_secs(config.token.expiry_secs),
	));

	Ok(AppState {
		pool,
		provisioning,
		token_issuer,
		operator_url: config.operator.url.trim_end_matches('/').to_string(),
	})
}

pub fn create_router(state: AppState) -> Router {
	Router::new()
		.route("/rpc/auth", get(routes::rpc::dept_login))
		.route("/health", get(routes::health::health_check))
		.route("/api/openapi.json", get(routes::docs::openapi_json))
		.with_state(state)
}
