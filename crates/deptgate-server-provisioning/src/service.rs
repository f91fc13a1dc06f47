// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::sync::Arc;

use deptgate_server_db::{
	DbError, UserRepository, ADMIN_ROLE_ID, ROOT_USER_NAME, STANDARD_ROLE_ID,
};
use deptgate_server_token::SubjectPayload;

use crate::error::ProvisioningError;
use crate::request::DeptLoginRequest;

/// Result type for provisioning operations.
pub type Result<T> = std::result::Result<T, ProvisioningError>;

/// Outcome of a department login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionedIdentity {
	/// Identity to put in the access token.
	pub payload: SubjectPayload,
	/// The department user, even when the payload names root.
	pub dept_user_id: i64,
	pub created_dept_user: bool,
	pub created_root_user: bool,
}

/// Service for turning a department login into a user identity.
///
/// Every login resolves (or creates) the department user. Logins with
/// `role_id == 1` additionally resolve (or create) the root administrator and
/// hand out its identity instead. All writes of one login share a single
/// transaction.
#[derive(Clone)]
pub struct DeptProvisioningService {
	user_repo: Arc<UserRepository>,
}

impl DeptProvisioningService {
	pub fn new(user_repo: Arc<UserRepository>) -> Self {
		Self { user_repo }
	}

	/// Provision the users behind a department login.
	///
	/// New users get the placeholder password and one role grant: role 2 for
	/// department users, role 1 for root. Nothing is committed unless every
	/// write succeeds.
	#[tracing::instrument(skip(self, request), fields(dept_id = %request.dept_id, role_id = ?request.role_id))]
	pub async fn provision(&self, request: DeptLoginRequest) -> Result<ProvisionedIdentity> {
		let mut tx = self.user_repo.begin().await?;

		let (dept_user, created_dept_user) = self
			.user_repo
			.find_or_create_dept_user_in_tx(&mut tx, &request.dept_id, request.dept_name.as_deref())
			.await?;
		if created_dept_user {
			self
				.user_repo
				.grant_role_in_tx(&mut tx, dept_user.user_id, STANDARD_ROLE_ID)
				.await?;
		}

		let mut payload = SubjectPayload::standard(request.dept_name.clone(), dept_user.user_id);
		let mut created_root_user = false;

		if request.wants_admin() {
			let (root, created) = self.user_repo.find_or_create_root_user_in_tx(&mut tx).await?;
			if created {
				self
					.user_repo
					.grant_role_in_tx(&mut tx, root.user_id, ADMIN_ROLE_ID)
					.await?;
			}
			created_root_user = created;
			payload = SubjectPayload::admin(ROOT_USER_NAME, root.user_id);
		}

		tx.commit().await.map_err(DbError::from)?;

		tracing::info!(
			user_id = payload.user_id,
			dept_user_id = dept_user.user_id,
			created_dept_user,
			created_root_user,
			admin = payload.role.is_admin(),
			"department login provisioned"
		);

		Ok(ProvisionedIdentity {
			payload,
			dept_user_id: dept_user.user_id,
			created_dept_user,
			created_root_user,
		})
	}
}
