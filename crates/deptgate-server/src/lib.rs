// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! deptgate HTTP server.
//!
//! Exposes `GET /rpc/auth`, which provisions department users and hands the
//! browser back to the operator portal with a signed access token, plus
//! `GET /health` and the OpenAPI document.

pub mod api;
pub mod api_docs;
pub mod error;
pub mod health;
pub mod routes;
pub mod version;

pub use api::{create_app_state, create_router, AppState};
pub use api_docs::ApiDoc;
pub use deptgate_server_config::ServerConfig;
pub use deptgate_server_db::{create_pool, run_migrations};
pub use error::ServerError;
