// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sections.

mod database;
mod http;
mod logging;
mod operator;
mod token;

pub use database::{DatabaseConfig, DatabaseConfigLayer};
pub use http::{HttpConfig, HttpConfigLayer};
pub use logging::{LoggingConfig, LoggingConfigLayer};
pub use operator::{OperatorConfig, OperatorConfigLayer};
pub use token::{TokenConfig, TokenConfigLayer, DEFAULT_TOKEN_EXPIRY_SECS};
