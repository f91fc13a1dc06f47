// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Access tokens handed to the operator portal after a department login.
//!
//! Tokens are HS256 JWTs. The `sub` claim carries a JSON [`SubjectPayload`]
//! describing the logged-in user and their role.

pub mod claims;
pub mod error;
pub mod issuer;

pub use claims::{AccessClaims, RoleClaim, SubjectPayload, ACCESS_TOKEN_TYPE};
pub use error::{Result, TokenError};
pub use issuer::{IssuedToken, TokenIssuer};
