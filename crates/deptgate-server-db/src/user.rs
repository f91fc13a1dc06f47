// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! User repository for database operations.
//!
//! Users are keyed by the department they were provisioned for (`dept_id`),
//! except for the single `root` administrator which has no department.
//! Role grants live in `user_role` and are only ever appended.
//!
//! Creation goes through the `find_or_create_*_in_tx` methods, which attempt
//! the insert first and fall back to reading the existing row. The insert takes
//! the SQLite write lock, so two requests for the same department cannot both
//! create a user.

use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqlitePool, Row, Sqlite, Transaction};

use crate::error::DbError;

/// Role id of the administrator role.
pub const ADMIN_ROLE_ID: i64 = 1;
/// Role id granted to every department user.
pub const STANDARD_ROLE_ID: i64 = 2;
/// User name of the administrator identity.
pub const ROOT_USER_NAME: &str = "root";
/// Password stored for provisioned users. They never log in with a password.
pub const PLACEHOLDER_PASSWORD: &str = "none";

#[derive(Debug, Clone, PartialEq)]
pub struct User {
	pub user_id: i64,
	pub user_name: Option<String>,
	pub password: String,
	pub dept_id: Option<String>,
	pub create_time: DateTime<Utc>,
	pub update_time: DateTime<Utc>,
}

impl User {
	pub fn is_root(&self) -> bool {
		self.user_name.as_deref() == Some(ROOT_USER_NAME)
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserRole {
	pub id: i64,
	pub user_id: i64,
	pub role_id: i64,
	pub create_time: DateTime<Utc>,
}

const USER_COLUMNS: &str = "user_id, user_name, password, dept_id, create_time, update_time";

/// Repository for user and role-grant database operations.
#[derive(Clone)]
pub struct UserRepository {
	pool: SqlitePool,
}

impl UserRepository {
	/// Create a new repository with the given connection pool.
	///
	/// # Arguments
	/// * `pool` - SQLite connection pool
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// Begin a new transaction.
	///
	/// The transaction rolls back when dropped without `commit()`.
	pub async fn begin(&self) -> Result<Transaction<'static, Sqlite>, DbError> {
		Ok(self.pool.begin().await?)
	}

	/// Get a user by primary key.
	#[tracing::instrument(skip(self))]
	pub async fn get_user_by_id(&self, user_id: i64) -> Result<Option<User>, DbError> {
		let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE user_id = ?"))
			.bind(user_id)
			.fetch_optional(&self.pool)
			.await?;

		row.as_ref().map(row_to_user).transpose()
	}

	/// Get the user provisioned for a department.
	#[tracing::instrument(skip(self))]
	pub async fn get_user_by_dept_id(&self, dept_id: &str) -> Result<Option<User>, DbError> {
		let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE dept_id = ?"))
			.bind(dept_id)
			.fetch_optional(&self.pool)
			.await?;

		row.as_ref().map(row_to_user).transpose()
	}

	/// Get the oldest user with the given name.
	///
	/// User names are not unique; the lowest `user_id` wins.
	#[tracing::instrument(skip(self))]
	pub async fn get_user_by_name(&self, user_name: &str) -> Result<Option<User>, DbError> {
		let row = sqlx::query(&format!(
			"SELECT {USER_COLUMNS} FROM users WHERE user_name = ? ORDER BY user_id LIMIT 1"
		))
		.bind(user_name)
		.fetch_optional(&self.pool)
		.await?;

		row.as_ref().map(row_to_user).transpose()
	}

	/// List role grants for a user, oldest first.
	#[tracing::instrument(skip(self))]
	pub async fn list_roles_for_user(&self, user_id: i64) -> Result<Vec<UserRole>, DbError> {
		let rows = sqlx::query(
			r#"
			SELECT id, user_id, role_id, create_time
			FROM user_role
			WHERE user_id = ?
			ORDER BY id
			"#,
		)
		.bind(user_id)
		.fetch_all(&self.pool)
		.await?;

		rows.iter().map(row_to_user_role).collect()
	}

	#[tracing::instrument(skip(self))]
	pub async fn count_users(&self) -> Result<i64, DbError> {
		let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
			.fetch_one(&self.pool)
			.await?;
		Ok(count.0)
	}

	/// Find the user for `dept_id`, creating it if absent (within a transaction).
	///
	/// A new user gets `user_name` and the placeholder password. An existing
	/// user is returned unchanged, even if `user_name` differs.
	///
	/// # Returns
	/// The user and whether this call created it. No role is granted here.
	#[tracing::instrument(skip(self, tx, user_name))]
	pub async fn find_or_create_dept_user_in_tx(
		&self,
		tx: &mut Transaction<'_, Sqlite>,
		dept_id: &str,
		user_name: Option<&str>,
	) -> Result<(User, bool), DbError> {
		let now = Utc::now().to_rfc3339();
		let result = sqlx::query(
			r#"
			INSERT INTO users (user_name, password, dept_id, create_time, update_time)
			VALUES (?, ?, ?, ?, ?)
			ON CONFLICT(dept_id) DO NOTHING
			"#,
		)
		.bind(user_name)
		.bind(PLACEHOLDER_PASSWORD)
		.bind(dept_id)
		.bind(&now)
		.bind(&now)
		.execute(&mut **tx)
		.await?;

		if result.rows_affected() == 1 {
			let user = get_user_by_id_in_tx(tx, result.last_insert_rowid()).await?;
			tracing::debug!(user_id = user.user_id, dept_id = %dept_id, "created department user");
			return Ok((user, true));
		}

		let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE dept_id = ?"))
			.bind(dept_id)
			.fetch_optional(&mut **tx)
			.await?;

		match row {
			Some(row) => {
				let user = row_to_user(&row)?;
				tracing::debug!(user_id = user.user_id, "found existing department user");
				Ok((user, false))
			}
			None => Err(DbError::Conflict(format!(
				"department user {dept_id} was neither inserted nor found"
			))),
		}
	}

	/// Find the root administrator, creating it if no user is named `root`
	/// (within a transaction).
	///
	/// # Returns
	/// The lowest-id user named `root` and whether this call created it.
	#[tracing::instrument(skip(self, tx))]
	pub async fn find_or_create_root_user_in_tx(
		&self,
		tx: &mut Transaction<'_, Sqlite>,
	) -> Result<(User, bool), DbError> {
		let now = Utc::now().to_rfc3339();
		let result = sqlx::query(
			r#"
			INSERT INTO users (user_name, password, dept_id, create_time, update_time)
			SELECT ?, ?, NULL, ?, ?
			WHERE NOT EXISTS (SELECT 1 FROM users WHERE user_name = ?)
			"#,
		)
		.bind(ROOT_USER_NAME)
		.bind(PLACEHOLDER_PASSWORD)
		.bind(&now)
		.bind(&now)
		.bind(ROOT_USER_NAME)
		.execute(&mut **tx)
		.await?;

		if result.rows_affected() == 1 {
			let user = get_user_by_id_in_tx(tx, result.last_insert_rowid()).await?;
			tracing::info!(user_id = user.user_id, "created root user");
			return Ok((user, true));
		}

		let row = sqlx::query(&format!(
			"SELECT {USER_COLUMNS} FROM users WHERE user_name = ? ORDER BY user_id LIMIT 1"
		))
		.bind(ROOT_USER_NAME)
		.fetch_optional(&mut **tx)
		.await?;

		match row {
			Some(row) => Ok((row_to_user(&row)?, false)),
			None => Err(DbError::Conflict(
				"root user was neither inserted nor found".to_string(),
			)),
		}
	}

	/// Grant a role to a user (within a transaction).
	///
	/// # Returns
	/// The id of the new `user_role` row.
	#[tracing::instrument(skip(self, tx))]
	pub async fn grant_role_in_tx(
		&self,
		tx: &mut Transaction<'_, Sqlite>,
		user_id: i64,
		role_id: i64,
	) -> Result<i64, DbError> {
		let result = sqlx::query(
			"INSERT INTO user_role (user_id, role_id, create_time) VALUES (?, ?, ?)",
		)
		.bind(user_id)
		.bind(role_id)
		.bind(Utc::now().to_rfc3339())
		.execute(&mut **tx)
		.await?;

		tracing::debug!(user_id, role_id, "role granted");
		Ok(result.last_insert_rowid())
	}
}

async fn get_user_by_id_in_tx(
	tx: &mut Transaction<'_, Sqlite>,
	user_id: i64,
) -> Result<User, DbError> {
	let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE user_id = ?"))
		.bind(user_id)
		.fetch_optional(&mut **tx)
		.await?
		.ok_or_else(|| DbError::NotFound(format!("user {user_id}")))?;

	row_to_user(&row)
}

fn parse_timestamp(value: &str, column: &str) -> Result<DateTime<Utc>, DbError> {
	DateTime::parse_from_rfc3339(value)
		.map(|dt| dt.with_timezone(&Utc))
		.map_err(|e| DbError::Internal(format!("Invalid {column}: {e}")))
}

fn row_to_user(row: &sqlx::sqlite::SqliteRow) -> Result<User, DbError> {
	let create_time: String = row.try_get("create_time")?;
	let update_time: String = row.try_get("update_time")?;

	Ok(User {
		user_id: row.try_get("user_id")?,
		user_name: row.try_get("user_name")?,
		password: row.try_get("password")?,
		dept_id: row.try_get("dept_id")?,
		create_time: parse_timestamp(&create_time, "create_time")?,
		update_time: parse_timestamp(&update_time, "update_time")?,
	})
}

fn row_to_user_role(row: &sqlx::sqlite::SqliteRow) -> Result<UserRole, DbError> {
	let create_time: String = row.try_get("create_time")?;

	Ok(UserRole {
		id: row.try_get("id")?,
		user_id: row.try_get("user_id")?,
		role_id: row.try_get("role_id")?,
		create_time: parse_timestamp(&create_time, "create_time")?,
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::create_test_pool;
	use proptest::prelude::*;

	#[tokio::test]
	async fn test_dept_user_created_once() {
		let pool = create_test_pool().await;
		let repo = UserRepository::new(pool);

		let mut tx = repo.begin().await.unwrap();
		let (first, created) = repo
			.find_or_create_dept_user_in_tx(&mut tx, "D100", Some("Finance"))
			.await
			.unwrap();
		assert!(created);
		assert_eq!(first.user_name.as_deref(), Some("Finance"));
		assert_eq!(first.password, PLACEHOLDER_PASSWORD);
		assert_eq!(first.dept_id.as_deref(), Some("D100"));

		let (second, created) = repo
			.find_or_create_dept_user_in_tx(&mut tx, "D100", Some("Renamed"))
			.await
			.unwrap();
		assert!(!created);
		assert_eq!(second.user_id, first.user_id);
		assert_eq!(second.user_name.as_deref(), Some("Finance"));
		tx.commit().await.unwrap();

		assert_eq!(repo.count_users().await.unwrap(), 1);
	}

	#[tokio::test]
	async fn test_dept_user_without_name() {
		let pool = create_test_pool().await;
		let repo = UserRepository::new(pool);

		let mut tx = repo.begin().await.unwrap();
		let (user, created) = repo
			.find_or_create_dept_user_in_tx(&mut tx, "D7", None)
			.await
			.unwrap();
		tx.commit().await.unwrap();

		assert!(created);
		assert!(user.user_name.is_none());
		let fetched = repo.get_user_by_dept_id("D7").await.unwrap().unwrap();
		assert_eq!(fetched, user);
	}

	#[tokio::test]
	async fn test_root_user_created_once() {
		let pool = create_test_pool().await;
		let repo = UserRepository::new(pool);

		let mut tx = repo.begin().await.unwrap();
		let (root, created) = repo.find_or_create_root_user_in_tx(&mut tx).await.unwrap();
		assert!(created);
		assert!(root.is_root());
		assert!(root.dept_id.is_none());

		let (again, created) = repo.find_or_create_root_user_in_tx(&mut tx).await.unwrap();
		assert!(!created);
		assert_eq!(again.user_id, root.user_id);
		tx.commit().await.unwrap();

		assert_eq!(repo.count_users().await.unwrap(), 1);
	}

	#[tokio::test]
	async fn test_root_lookup_prefers_lowest_id() {
		let pool = create_test_pool().await;
		let repo = UserRepository::new(pool);

		let mut tx = repo.begin().await.unwrap();
		let (dept_root, _) = repo
			.find_or_create_dept_user_in_tx(&mut tx, "D1", Some(ROOT_USER_NAME))
			.await
			.unwrap();
		let (root, created) = repo.find_or_create_root_user_in_tx(&mut tx).await.unwrap();
		tx.commit().await.unwrap();

		assert!(!created);
		assert_eq!(root.user_id, dept_root.user_id);
		assert_eq!(
			repo.get_user_by_name(ROOT_USER_NAME).await.unwrap().unwrap().user_id,
			dept_root.user_id
		);
	}

	#[tokio::test]
	async fn test_grant_and_list_roles() {
		let pool = create_test_pool().await;
		let repo = UserRepository::new(pool);

		let mut tx = repo.begin().await.unwrap();
		let (user, _) = repo
			.find_or_create_dept_user_in_tx(&mut tx, "D2", Some("Ops"))
			.await
			.unwrap();
		repo
			.grant_role_in_tx(&mut tx, user.user_id, STANDARD_ROLE_ID)
			.await
			.unwrap();
		tx.commit().await.unwrap();

		let roles = repo.list_roles_for_user(user.user_id).await.unwrap();
		assert_eq!(roles.len(), 1);
		assert_eq!(roles[0].role_id, STANDARD_ROLE_ID);
		assert_eq!(roles[0].user_id, user.user_id);
	}

	#[tokio::test]
	async fn test_dropped_transaction_rolls_back() {
		let pool = create_test_pool().await;
		let repo = UserRepository::new(pool.clone());

		{
			let mut tx = repo.begin().await.unwrap();
			let (user, _) = repo
				.find_or_create_dept_user_in_tx(&mut tx, "D3", None)
				.await
				.unwrap();
			repo
				.grant_role_in_tx(&mut tx, user.user_id, STANDARD_ROLE_ID)
				.await
				.unwrap();
		}

		assert_eq!(repo.count_users().await.unwrap(), 0);
		let roles: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM user_role")
			.fetch_one(&pool)
			.await
			.unwrap();
		assert_eq!(roles, 0);
	}

	#[tokio::test]
	async fn test_missing_lookups_return_none() {
		let pool = create_test_pool().await;
		let repo = UserRepository::new(pool);

		assert!(repo.get_user_by_id(42).await.unwrap().is_none());
		assert!(repo.get_user_by_dept_id("nope").await.unwrap().is_none());
		assert!(repo.get_user_by_name(ROOT_USER_NAME).await.unwrap().is_none());
		assert!(repo.list_roles_for_user(42).await.unwrap().is_empty());
	}

	proptest! {
		#![proptest_config(ProptestConfig::with_cases(16))]

		#[test]
		fn repeated_dept_logins_create_one_user(
			dept_id in "[A-Za-z0-9-]{1,24}",
			repeats in 1usize..5,
		) {
			let rt = tokio::runtime::Runtime::new().unwrap();
			rt.block_on(async {
				let pool = create_test_pool().await;
				let repo = UserRepository::new(pool);
				let mut tx = repo.begin().await.unwrap();
				let mut ids = Vec::new();
				for _ in 0..repeats {
					let (user, _) = repo
						.find_or_create_dept_user_in_tx(&mut tx, &dept_id, None)
						.await
						.unwrap();
					ids.push(user.user_id);
				}
				tx.commit().await.unwrap();

				ids.dedup();
				assert_eq!(ids.len(), 1);
				assert_eq!(repo.count_users().await.unwrap(), 1);
			});
		}
	}
}
