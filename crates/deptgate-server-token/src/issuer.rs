// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! HS256 access token signing and verification.

use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use deptgate_common_config::SecretString;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::claims::{AccessClaims, SubjectPayload, ACCESS_TOKEN_TYPE};
use crate::error::{Result, TokenError};

/// A freshly signed access token.
#[derive(Clone)]
pub struct IssuedToken {
	pub token: String,
	pub jti: String,
	pub issued_at: i64,
	pub expires_at: i64,
}

impl fmt::Debug for IssuedToken {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("IssuedToken")
			.field("token", &"[REDACTED]")
			.field("jti", &self.jti)
			.field("issued_at", &self.issued_at)
			.field("expires_at", &self.expires_at)
			.finish()
	}
}

/// Signs and verifies access tokens with a shared secret.
pub struct TokenIssuer {
	encoding_key: EncodingKey,
	decoding_key: DecodingKey,
	expiry: Duration,
}

impl fmt::Debug for TokenIssuer {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("TokenIssuer")
			.field("algorithm", &Algorithm::HS256)
			.field("expiry", &self.expiry)
			.finish_non_exhaustive()
	}
}

impl TokenIssuer {
	pub fn new(secret: &SecretString, expiry: Duration) -> Self {
		let bytes = secret.expose().as_bytes();
		Self {
			encoding_key: EncodingKey::from_secret(bytes),
			decoding_key: DecodingKey::from_secret(bytes),
			expiry,
		}
	}

	/// Sign a token whose `sub` is the JSON form of `payload`.
	#[instrument(skip(self, payload), fields(user_id = payload.user_id))]
	pub fn issue(&self, payload: &SubjectPayload) -> Result<IssuedToken> {
		let now = SystemTime::now()
			.duration_since(UNIX_EPOCH)
			.map_err(|e| TokenError::Clock(e.to_string()))?;
		let issued_at = i64::try_from(now.as_secs())
			.map_err(|_| TokenError::Clock("system time out of range".to_string()))?;
		let expires_at = i64::try_from(self.expiry.as_secs())
			.ok()
			.and_then(|expiry| issued_at.checked_add(expiry))
			.ok_or(TokenError::ExpiryOutOfRange(self.expiry.as_secs()))?;
		let jti = Uuid::new_v4().to_string();

		let claims = AccessClaims {
			sub: payload.to_subject()?,
			iat: issued_at,
			nbf: issued_at,
			exp: expires_at,
			jti: jti.clone(),
			token_type: ACCESS_TOKEN_TYPE.to_string(),
			fresh: false,
		};

		let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
			.map_err(TokenError::Encode)?;

		debug!(jti = %jti, exp = expires_at, "issued access token");

		Ok(IssuedToken {
			token,
			jti,
			issued_at,
			expires_at,
		})
	}

	/// Verify signature, expiry and not-before, and return the claims.
	pub fn decode(&self, token: &str) -> Result<AccessClaims> {
		let mut validation = Validation::new(Algorithm::HS256);
		validation.validate_nbf = true;
		validation.set_required_spec_claims(&["exp", "nbf", "sub"]);

		let data = decode::<AccessClaims>(token, &self.decoding_key, &validation)
			.map_err(TokenError::Decode)?;
		Ok(data.claims)
	}
}
