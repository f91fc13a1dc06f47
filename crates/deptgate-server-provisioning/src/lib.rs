// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Department login provisioning for deptgate.
//!
//! A login names a department. The department's user is created on first
//! sight with the standard role. Logins asking for the administrator role are
//! mapped onto the single `root` user, which is also created on demand.

mod error;
mod request;
mod service;

pub use error::ProvisioningError;
pub use request::DeptLoginRequest;
pub use service::{DeptProvisioningService, ProvisionedIdentity};
