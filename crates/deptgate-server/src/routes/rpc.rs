// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Department single sign-on into the operator portal.
//!
//! The operator portal sends the browser to `GET /rpc/auth?deptId=...`. The
//! department's user is provisioned, an access token is issued for it (or for
//! `root` when `role_id=1`), and the browser is sent back to the portal with
//! the token in the query string.

use axum::{
	extract::{rejection::QueryRejection, Query, State},
	response::Redirect,
};
use deptgate_server_provisioning::DeptLoginRequest;
use serde::Deserialize;

use crate::{api::AppState, error::ServerError};

/// Query parameters for a department login.
#[derive(Debug, Default, Deserialize)]
pub struct DeptLoginQuery {
	#[serde(rename = "deptId")]
	pub dept_id: Option<String>,
	#[serde(rename = "deptName")]
	pub dept_name: Option<String>,
	#[serde(default)]
	pub menu: String,
	/// Accepted for compatibility with existing portal links. Not used.
	pub user_id: Option<i64>,
	pub role_id: Option<i64>,
}

#[utoipa::path(
    get,
    path = "/rpc/auth",
    params(
        ("deptId" = String, Query, description = "External department identifier"),
        ("deptName" = Option<String>, Query, description = "Department display name, used for new users"),
        ("menu" = Option<String>, Query, description = "Operator portal path to land on"),
        ("user_id" = Option<i64>, Query, description = "Ignored"),
        ("role_id" = Option<i64>, Query, description = "1 logs in as the root administrator")
    ),
    responses(
        (status = 307, description = "Redirect to the operator portal with an access token"),
        (status = 400, description = "deptId missing or query malformed", body = crate::error::ErrorResponse),
        (status = 500, description = "Provisioning or token signing failed", body = crate::error::ErrorResponse)
    ),
    tag = "auth"
)]
/// GET /rpc/auth - Provision a department user and redirect to the operator portal.
#[tracing::instrument(
	skip(state, query),
	fields(dept_id = tracing::field::Empty, role_id = tracing::field::Empty)
)]
pub async fn dept_login(
	State(state): State<AppState>,
	query: Result<Query<DeptLoginQuery>, QueryRejection>,
) -> Result<Redirect, ServerError> {
	let Query(query) = query.map_err(|e| ServerError::BadRequest(e.body_text()))?;

	let dept_id = query
		.dept_id
		.filter(|id| !id.is_empty())
		.ok_or_else(|| ServerError::BadRequest("deptId is required".to_string()))?;

	let span = tracing::Span::current();
	span.record("dept_id", dept_id.as_str());
	if let Some(role_id) = query.role_id {
		span.record("role_id", role_id);
	}

	let request = DeptLoginRequest::new(dept_id, query.dept_name, query.role_id)?;
	let identity = state.provisioning.provision(request).await?;
	let issued = state.token_issuer.issue(&identity.payload)?;

	tracing::info!(
		user_id = identity.payload.user_id,
		jti = %issued.jti,
		menu = %query.menu,
		"department login succeeded"
	);

	Ok(Redirect::temporary(&operator_redirect_url(
		&state.operator_url,
		&query.menu,
		&issued.token,
	)))
}

/// ASCII punctuation left as is in `menu`, on top of letters, digits and
/// `-_.~`. Existing `%XX` escapes and path separators pass through.
const MENU_SAFE_CHARS: &str = ":/%#?=@[]!$&'()*+,;";

/// `{operator_url}/{menu}?token={token}`.
///
/// `operator_url` carries no trailing slash. `menu` is percent-encoded as
/// UTF-8, so spaces, non-ASCII text and control characters cannot break the
/// `Location` header. JWTs only contain URL-safe characters and are appended
/// as is.
pub fn operator_redirect_url(operator_url: &str, menu: &str, token: &str) -> String {
	format!("{operator_url}/{}?token={token}", encode_menu(menu))
}

fn encode_menu(menu: &str) -> String {
	let mut encoded = String::with_capacity(menu.len());
	let mut buf = [0u8; 4];
	for c in menu.chars() {
		if c.is_ascii_alphanumeric() || "-_.~".contains(c) || MENU_SAFE_CHARS.contains(c) {
			encoded.push(c);
		} else {
			encoded.push_str(&urlencoding::encode(c.encode_utf8(&mut buf)));
		}
	}
	encoded
}
