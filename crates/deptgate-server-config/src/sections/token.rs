// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Access token signing configuration.
//!
//! The signing secret is only read from the environment
//! (`DEPTGATE_SERVER_TOKEN_SECRET` or `DEPTGATE_SERVER_TOKEN_SECRET_FILE`),
//! never from the TOML file.

use deptgate_common_config::SecretString;
use serde::Deserialize;

/// Ten days.
pub const DEFAULT_TOKEN_EXPIRY_SECS: u64 = 864_000;

/// Token configuration (runtime, fully resolved).
#[derive(Debug, Clone)]
pub struct TokenConfig {
	pub secret: Option<SecretString>,
	pub expiry_secs: u64,
}

impl Default for TokenConfig {
	fn default() -> Self {
		Self {
			secret: None,
			expiry_secs: DEFAULT_TOKEN_EXPIRY_SECS,
		}
	}
}

/// Token configuration layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenConfigLayer {
	#[serde(default)]
	pub expiry_secs: Option<u64>,
}

impl TokenConfigLayer {
	pub fn merge(&mut self, other: TokenConfigLayer) {
		if other.expiry_secs.is_some() {
			self.expiry_secs = other.expiry_secs;
		}
	}

	pub fn finalize(self, secret: Option<SecretString>) -> TokenConfig {
		TokenConfig {
			secret,
			expiry_secs: self.expiry_secs.unwrap_or(DEFAULT_TOKEN_EXPIRY_SECS),
		}
	}
}
