// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Centralized configuration management for the deptgate server.
//!
//! This crate provides:
//! - Layered configuration from defaults, a TOML file and the environment
//! - Type-safe configuration with validation
//! - Consistent environment variable naming (`DEPTGATE_SERVER_*`)
//!
//! # Usage
//!
//! ```ignore
//! use deptgate_server_config::load_config;
//!
//! let config = load_config()?;
//! println!("Redirecting logins to {}", config.operator.url);
//! ```

pub mod error;
pub mod layer;
pub mod sections;
pub mod sources;

pub use error::ConfigError;
pub use layer::ServerConfigLayer;
pub use sections::*;
pub use sources::{ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource};

use tracing::{debug, info};

/// Environment variable holding the token signing secret.
pub const TOKEN_SECRET_ENV: &str = "DEPTGATE_SERVER_TOKEN_SECRET";

/// Fully resolved server configuration.
#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
	pub http: HttpConfig,
	pub database: DatabaseConfig,
	pub token: TokenConfig,
	pub operator: OperatorConfig,
	pub logging: LoggingConfig,
}

impl ServerConfig {
	/// Get the socket address string for binding.
	pub fn socket_addr(&self) -> String {
		format!("{}:{}", self.http.host, self.http.port)
	}
}

/// Load configuration from all sources with standard precedence.
///
/// Precedence (highest to lowest):
/// 1. Environment variables (`DEPTGATE_SERVER_*`)
/// 2. Config file (`/etc/deptgate/server.toml`)
/// 3. Built-in defaults
pub fn load_config() -> Result<ServerConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource),
	])
}

/// Load configuration from environment only (for testing or simple deployments).
pub fn load_config_from_env() -> Result<ServerConfig, ConfigError> {
	let mut merged = ServerConfigLayer::default();
	merged.merge(EnvSource.load()?);
	finalize(merged)
}

/// Load configuration with a custom config file path.
pub fn load_config_with_file(
	config_path: impl Into<std::path::PathBuf>,
) -> Result<ServerConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource),
	])
}

fn load_from_sources(mut sources: Vec<Box<dyn ConfigSource>>) -> Result<ServerConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = ServerConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		let layer = source.load()?;
		merged.merge(layer);
	}

	finalize(merged)
}

/// Finalize configuration layer into resolved config.
fn finalize(layer: ServerConfigLayer) -> Result<ServerConfig, ConfigError> {
	let http = layer.http.unwrap_or_default().finalize();
	let database = layer.database.unwrap_or_default().finalize();
	let operator = layer.operator.unwrap_or_default().finalize();
	let logging = layer.logging.unwrap_or_default().finalize();

	let token_secret = deptgate_common_config::load_secret_env(TOKEN_SECRET_ENV)
		.map_err(|e| ConfigError::Secret(e.to_string()))?;
	let token = layer.token.unwrap_or_default().finalize(token_secret);

	validate_config(&token, &operator)?;

	info!(
		host = %http.host,
		port = http.port,
		database = %database.url,
		operator_url = %operator.url,
		token_expiry_secs = token.expiry_secs,
		"Server configuration loaded"
	);

	Ok(ServerConfig {
		http,
		database,
		token,
		operator,
		logging,
	})
}

/// Validate cross-field configuration rules.
fn validate_config(token: &TokenConfig, operator: &OperatorConfig) -> Result<(), ConfigError> {
	if operator.url.is_empty() {
		return Err(ConfigError::Validation(
			"DEPTGATE_SERVER_OPERATOR_URL (or [operator] url) must be set".to_string(),
		));
	}
	if !(operator.url.starts_with("http://") || operator.url.starts_with("https://")) {
		return Err(ConfigError::InvalidValue {
			key: "operator.url".to_string(),
			message: format!("'{}' must start with http:// or https://", operator.url),
		});
	}
	if token.secret.is_none() {
		return Err(ConfigError::Validation(format!(
			"{TOKEN_SECRET_ENV} or {TOKEN_SECRET_ENV}_FILE must be set"
		)));
	}
	if token.expiry_secs == 0 {
		return Err(ConfigError::InvalidValue {
			key: "token.expiry_secs".to_string(),
			message: "must be greater than zero".to_string(),
		});
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use deptgate_common_config::SecretString;

	fn valid_token() -> TokenConfig {
		TokenConfig {
			secret: Some(SecretString::new("test-signing-key".to_string())),
			..Default::default()
		}
	}

	fn operator(url: &str) -> OperatorConfig {
		OperatorConfig {
			url: url.to_string(),
		}
	}

	#[test]
	fn test_valid_config_passes() {
		assert!(validate_config(&valid_token(), &operator("https://ops.example.com")).is_ok());
	}

	#[test]
	fn test_missing_operator_url_rejected() {
		let result = validate_config(&valid_token(), &operator(""));
		assert!(result.unwrap_err().to_string().contains("OPERATOR_URL"));
	}

	#[test]
	fn test_non_http_operator_url_rejected() {
		let result = validate_config(&valid_token(), &operator("ftp://ops.example.com"));
		assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
	}

	#[test]
	fn test_missing_secret_rejected() {
		let result = validate_config(&TokenConfig::default(), &operator("http://ops"));
		assert!(result.unwrap_err().to_string().contains(TOKEN_SECRET_ENV));
	}

	#[test]
	fn test_zero_expiry_rejected() {
		let token = TokenConfig {
			expiry_secs: 0,
			..valid_token()
		};
		let result = validate_config(&token, &operator("http://ops"));
		assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
	}

	#[test]
	fn test_socket_addr() {
		let config = ServerConfig {
			http: HttpConfig {
				host: "127.0.0.1".to_string(),
				port: 9000,
			},
			..Default::default()
		};
		assert_eq!(config.socket_addr(), "127.0.0.1:9000");
	}
}
