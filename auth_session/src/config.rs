//! Central configuration for the auth_session crate

use std::sync::LazyLock;

/// Base URL of the backend API, read from the `AUTH_BACKEND_URL` environment
/// variable. A trailing slash is trimmed before endpoint paths are appended.
///
/// Only [`HttpBackend::from_env`](crate::HttpBackend::from_env) dereferences
/// this; constructing a backend explicitly does not require the variable.
pub static AUTH_BACKEND_URL: LazyLock<String> = LazyLock::new(|| {
    std::env::var("AUTH_BACKEND_URL")
        .map(|url| url.trim_end_matches('/').to_string())
        .expect("AUTH_BACKEND_URL must be set")
});
