// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Health check types and component checking logic.

use std::time::Duration;

use serde::Serialize;
use sqlx::sqlite::SqlitePool;
use tokio::time::{timeout, Instant};
use utoipa::ToSchema;

use crate::version::VersionInfo;

/// Health status for components and overall system.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
	Healthy,
	Unhealthy,
}

/// Database component health.
#[derive(Debug, Serialize, ToSchema)]
pub struct DatabaseHealth {
	pub status: HealthStatus,
	pub latency_ms: u64,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthComponents {
	pub database: DatabaseHealth,
}

/// Complete health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
	pub status: HealthStatus,
	pub timestamp: String,
	pub duration_ms: u64,
	pub version: VersionInfo,
	pub components: HealthComponents,
}

const DB_CHECK_TIMEOUT: Duration = Duration::from_millis(500);

/// Check database health with a `SELECT 1`.
pub async fn check_database(pool: &SqlitePool) -> DatabaseHealth {
	let start = Instant::now();

	let result = timeout(
		DB_CHECK_TIMEOUT,
		sqlx::query_scalar::<_, i64>("SELECT 1").fetch_one(pool),
	)
	.await;
	let latency_ms = start.elapsed().as_millis() as u64;

	match result {
		Ok(Ok(_)) => DatabaseHealth {
			status: HealthStatus::Healthy,
			latency_ms,
			error: None,
		},
		Ok(Err(e)) => DatabaseHealth {
			status: HealthStatus::Unhealthy,
			latency_ms,
			error: Some(e.to_string()),
		},
		Err(_) => DatabaseHealth {
			status: HealthStatus::Unhealthy,
			latency_ms,
			error: Some("database health check timed out".to_string()),
		},
	}
}

/// Overall status is the worst component status.
pub fn aggregate_status(components: &HealthComponents) -> HealthStatus {
	components.database.status
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn test_open_pool_is_healthy() {
		let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
		let health = check_database(&pool).await;
		assert_eq!(health.status, HealthStatus::Healthy);
		assert!(health.error.is_none());
	}

	#[tokio::test]
	async fn test_closed_pool_is_unhealthy() {
		let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
		pool.close().await;
		let health = check_database(&pool).await;
		assert_eq!(health.status, HealthStatus::Unhealthy);
		assert!(health.error.is_some());
	}

	#[test]
	fn test_status_serializes_lowercase() {
		let json = serde_json::to_string(&HealthStatus::Unhealthy).unwrap();
		assert_eq!(json, "\"unhealthy\"");
	}
}
