// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Integration tests for the health and OpenAPI endpoints.

use axum::{
	body::Body,
	http::{Request, StatusCode},
	Router,
};
use deptgate_common_config::SecretString;
use deptgate_server::{create_app_state, create_router, ServerConfig};
use deptgate_server_config::TokenConfig;
use sqlx::sqlite::SqlitePool;
use tempfile::tempdir;
use tower::ServiceExt;

async fn setup_test_app() -> (Router, SqlitePool, tempfile::TempDir) {
	let dir = tempdir().unwrap();
	let db_path = dir.path().join("test_health.db");
	let db_url = format!("sqlite:{}?mode=rwc", db_path.display());
	let pool = deptgate_server::create_pool(&db_url).await.unwrap();
	deptgate_server::run_migrations(&pool).await.unwrap();

	let config = ServerConfig {
		token: TokenConfig {
			secret: Some(SecretString::new("health-test-secret".to_string())),
			..Default::default()
		},
		..Default::default()
	};
	let state = create_app_state(pool.clone(), &config).unwrap();
	(create_router(state), pool, dir)
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
	let response = app
		.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
		.await
		.unwrap();
	let status = response.status();
	let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
		.await
		.unwrap();
	(status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_health_endpoint_reports_healthy_database() {
	let (app, _pool, _dir) = setup_test_app().await;

	let (status, body) = get_json(app, "/health").await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["status"], "healthy");
	assert_eq!(body["components"]["database"]["status"], "healthy");
	assert!(body["version"]["version"].is_string());
	assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_health_endpoint_unhealthy_when_pool_closed() {
	let (app, pool, _dir) = setup_test_app().await;
	pool.close().await;

	let (status, body) = get_json(app, "/health").await;

	assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
	assert_eq!(body["status"], "unhealthy");
}

#[tokio::test]
async fn test_openapi_document_lists_routes() {
	let (app, _pool, _dir) = setup_test_app().await;

	let (status, body) = get_json(app, "/api/openapi.json").await;

	assert_eq!(status, StatusCode::OK);
	assert!(body["paths"]["/rpc/auth"].is_object());
	assert!(body["paths"]["/health"].is_object());
}
