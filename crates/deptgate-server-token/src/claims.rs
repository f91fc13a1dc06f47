// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Claims carried by access tokens.
//!
//! The `sub` claim is itself a JSON document ([`SubjectPayload`]) that the
//! operator portal parses to learn who is logged in. It has two shapes:
//!
//! ```text
//! {"user_name":"Finance","user_id":7,"role":[2]}
//! {"user_name":"root","user_id":1,"role":"admin"}
//! ```
//!
//! The subject is compact JSON: no whitespace after `,` or `:`, and non-ASCII
//! names are written as raw UTF-8 rather than `\uXXXX` escapes. Consumers
//! should parse it as JSON instead of comparing bytes.

use serde::{Deserialize, Serialize};

use crate::error::TokenError;

/// Value of the `type` claim on every token this crate issues.
pub const ACCESS_TOKEN_TYPE: &str = "access";

const STANDARD_ROLE_ID: i64 = 2;
const ADMIN_ROLE_NAME: &str = "admin";

/// The `role` member of a subject payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RoleClaim {
	/// Role ids granted to a department user.
	Ids(Vec<i64>),
	/// Named role, only ever `"admin"`.
	Named(String),
}

impl RoleClaim {
	pub fn standard() -> Self {
		RoleClaim::Ids(vec![STANDARD_ROLE_ID])
	}

	pub fn admin() -> Self {
		RoleClaim::Named(ADMIN_ROLE_NAME.to_string())
	}

	pub fn is_admin(&self) -> bool {
		matches!(self, RoleClaim::Named(name) if name == ADMIN_ROLE_NAME)
	}
}

/// Identity serialized into the `sub` claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectPayload {
	pub user_name: Option<String>,
	pub user_id: i64,
	pub role: RoleClaim,
}

impl SubjectPayload {
	/// Payload for a department user. `user_name` is the department name from
	/// the request, not necessarily the stored name.
	pub fn standard(user_name: Option<String>, user_id: i64) -> Self {
		Self {
			user_name,
			user_id,
			role: RoleClaim::standard(),
		}
	}

	/// Payload for the root administrator.
	pub fn admin(user_name: impl Into<String>, user_id: i64) -> Self {
		Self {
			user_name: Some(user_name.into()),
			user_id,
			role: RoleClaim::admin(),
		}
	}

	pub fn to_subject(&self) -> Result<String, TokenError> {
		Ok(serde_json::to_string(self)?)
	}
}

/// Registered and private claims of an access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
	pub sub: String,
	pub iat: i64,
	pub nbf: i64,
	pub exp: i64,
	pub jti: String,
	#[serde(rename = "type")]
	pub token_type: String,
	pub fresh: bool,
}

impl AccessClaims {
	/// Parse the `sub` claim back into the identity it carries.
	pub fn subject_payload(&self) -> Result<SubjectPayload, TokenError> {
		Ok(serde_json::from_str(&self.sub)?)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	#[test]
	fn standard_payload_json_shape() {
		let payload = SubjectPayload::standard(Some("Finance".to_string()), 7);
		assert_eq!(
			payload.to_subject().unwrap(),
			r#"{"user_name":"Finance","user_id":7,"role":[2]}"#
		);
	}

	#[test]
	fn standard_payload_without_name_serializes_null() {
		let payload = SubjectPayload::standard(None, 3);
		assert_eq!(
			payload.to_subject().unwrap(),
			r#"{"user_name":null,"user_id":3,"role":[2]}"#
		);
	}

	#[test]
	fn admin_payload_json_shape() {
		let payload = SubjectPayload::admin("root", 1);
		assert_eq!(
			payload.to_subject().unwrap(),
			r#"{"user_name":"root","user_id":1,"role":"admin"}"#
		);
		assert!(payload.role.is_admin());
	}

	#[test]
	fn non_ascii_names_are_written_as_utf8() {
		let payload = SubjectPayload::standard(Some("财务部".to_string()), 5);
		assert_eq!(
			payload.to_subject().unwrap(),
			r#"{"user_name":"财务部","user_id":5,"role":[2]}"#
		);
	}

	#[test]
	fn type_claim_is_renamed() {
		let claims = AccessClaims {
			sub: "{}".to_string(),
			iat: 1,
			nbf: 1,
			exp: 2,
			jti: "j".to_string(),
			token_type: ACCESS_TOKEN_TYPE.to_string(),
			fresh: false,
		};
		let value = serde_json::to_value(&claims).unwrap();
		assert_eq!(value["type"], "access");
		assert_eq!(value["fresh"], false);
	}

	#[test]
	fn subject_payload_rejects_garbage() {
		let claims = AccessClaims {
			sub: "not json".to_string(),
			iat: 0,
			nbf: 0,
			exp: 0,
			jti: String::new(),
			token_type: ACCESS_TOKEN_TYPE.to_string(),
			fresh: false,
		};
		assert!(matches!(
			claims.subject_payload(),
			Err(TokenError::InvalidSubject(_))
		));
	}

	proptest! {
		#[test]
		fn subject_is_parseable_json(name in proptest::option::of(".{0,40}"), user_id in 1i64..i64::MAX, admin in any::<bool>()) {
			let payload = if admin {
				SubjectPayload::admin("root", user_id)
			} else {
				SubjectPayload::standard(name, user_id)
			};
			let subject = payload.to_subject().unwrap();
			let value: serde_json::Value = serde_json::from_str(&subject).unwrap();

			prop_assert_eq!(value.as_object().unwrap().len(), 3);
			prop_assert_eq!(value["user_id"].as_i64(), Some(user_id));
			if admin {
				prop_assert_eq!(value["role"].as_str(), Some("admin"));
			} else {
				prop_assert_eq!(value["role"].as_array().unwrap().len(), 1);
				prop_assert_eq!(value["role"][0].as_i64(), Some(2));
			}
		}
	}
}
