// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Downstream operator portal configuration.
//!
//! `url` is the base the dept-login endpoint redirects to; the requested menu
//! path and the issued token are appended to it.

use serde::Deserialize;

/// Operator configuration (runtime, fully resolved).
#[derive(Debug, Clone, Default)]
pub struct OperatorConfig {
	/// Base URL without a trailing slash.
	pub url: String,
}

/// Operator configuration layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OperatorConfigLayer {
	#[serde(default)]
	pub url: Option<String>,
}

impl OperatorConfigLayer {
	pub fn merge(&mut self, other: OperatorConfigLayer) {
		if other.url.is_some() {
			self.url = other.url;
		}
	}

	pub fn finalize(self) -> OperatorConfig {
		let url = self.url.unwrap_or_default();
		OperatorConfig {
			url: url.trim().trim_end_matches('/').to_string(),
		}
	}
}
