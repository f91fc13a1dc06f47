// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use deptgate_server_db::ADMIN_ROLE_ID;

use crate::error::ProvisioningError;

/// A department login as handed over by the operator portal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeptLoginRequest {
	/// External department identifier; the provisioning key.
	pub dept_id: String,

	/// Department display name. Used as the name of a newly created user and
	/// as `user_name` in the standard token payload.
	pub dept_name: Option<String>,

	/// `Some(1)` asks for the root administrator identity.
	pub role_id: Option<i64>,
}

impl DeptLoginRequest {
	/// Build a request, rejecting an empty department id.
	pub fn new(
		dept_id: impl Into<String>,
		dept_name: Option<String>,
		role_id: Option<i64>,
	) -> Result<Self, ProvisioningError> {
		let dept_id = dept_id.into();
		if dept_id.is_empty() {
			return Err(ProvisioningError::InvalidRequest(
				"deptId is required".to_string(),
			));
		}

		Ok(Self {
			dept_id,
			dept_name,
			role_id,
		})
	}

	pub fn wants_admin(&self) -> bool {
		self.role_id == Some(ADMIN_ROLE_ID)
	}
}
