// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Build information for deptgate-server.

use serde::Serialize;
use utoipa::ToSchema;

/// Version block reported by `/health` and `deptgate-server version`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct VersionInfo {
	pub version: String,
	pub platform: String,
}

impl VersionInfo {
	pub fn current() -> Self {
		Self {
			version: env!("CARGO_PKG_VERSION").to_string(),
			platform: format!("{}-{}", std::env::consts::OS, std::env::consts::ARCH),
		}
	}
}

/// Format version info for display.
pub fn format_version_info() -> String {
	let info = VersionInfo::current();
	format!(
		"deptgate-server version: {}\n\
         Platform:                {}",
		info.version, info.platform,
	)
}
