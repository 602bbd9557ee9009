//! API constants

/// Versioned prefix for every image route
pub const API_PREFIX: &str = "/api/v0";

/// Path the OpenAPI document is served from
pub const OPENAPI_PATH: &str = "/api-docs/openapi.json";

/// Allowance for multipart boundaries and part headers on top of the image size limit
pub const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;
