// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use deptgate_server_db::DbError;

#[derive(Debug, thiserror::Error)]
pub enum ProvisioningError {
	#[error("Database error: {0}")]
	Database(#[from] DbError),

	#[error("Invalid request: {0}")]
	InvalidRequest(String),
}

