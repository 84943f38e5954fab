//! Route and limit constants

/// Prefix for all record and upload endpoints.
pub const API_PREFIX: &str = "/api";

/// Request bodies are small JSON documents; video bytes go straight to storage.
pub const MAX_REQUEST_BODY_BYTES: usize = 64 * 1024;

/// Default server-level concurrency limit (override with `HTTP_CONCURRENCY_LIMIT`).
pub const DEFAULT_HTTP_CONCURRENCY_LIMIT: usize = 10_000;

pub const LIVENESS_MESSAGE: &str = "Video App Backend is running!";
