// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! # deptgate-server-db
//!
//! Persistence layer for the deptgate server using SQLite via sqlx.
//!
//! ## Repository Pattern
//!
//! `UserRepository` holds a `SqlitePool`. Reads go straight to the pool.
//!
//! Writes that must be atomic across tables take an explicit
//! `sqlx::Transaction` and are suffixed `_in_tx`. The caller owns the
//! transaction and decides when to commit; dropping it rolls back.
//!
//! ## Error Handling
//!
//! | Variant | When to use |
//! |---------|-------------|
//! | `NotFound` | A row that was just written cannot be read back |
//! | `Conflict` | A conflict-tolerant insert neither inserted nor found a row |
//! | `Sqlx` | Let sqlx errors propagate via `?` for unexpected database errors |
//! | `Internal` | Invalid stored data (e.g., unparseable timestamp) or bad URL |
//!
//! ## Testing
//!
//! Tests use an in-memory SQLite pool with the migrations applied
//! (`testing::create_test_pool`).

mod error;
pub mod migrations;
pub mod pool;
pub mod user;

#[cfg(test)]
pub mod testing;

pub use error::{DbError, Result};
pub use migrations::run_migrations;
pub use pool::create_pool;
pub use user::{
	User, UserRepository, UserRole, ADMIN_ROLE_ID, PLACEHOLDER_PASSWORD,
	ROOT_USER_NAME, STANDARD_ROLE_ID,
};
