// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! OpenAPI documentation for deptgate-server, served at `/api/openapi.json`.

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "deptgate Server API",
        version = "1.0.0",
        description = "Department single sign-on into the operator portal.",
        license(name = "Proprietary"),
        contact(
            name = "Geoffrey Huntley",
            email = "ghuntley@ghuntley.com",
            url = "https://ghuntley.com"
        )
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    tags(
        (name = "auth", description = "Department login and token hand-off"),
        (name = "health", description = "Health checks")
    ),
    paths(
        crate::routes::rpc::dept_login,
        crate::routes::health::health_check,
    ),
    components(schemas(
        crate::error::ErrorResponse,
        crate::health::HealthResponse,
        crate::health::HealthComponents,
        crate::health::DatabaseHealth,
        crate::health::HealthStatus,
        crate::version::VersionInfo,
    ))
)]
pub struct ApiDoc;
