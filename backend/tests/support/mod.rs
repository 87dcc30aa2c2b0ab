//! Shared helper utilities for backend integration tests.
//!
//! Integration tests compile as separate crates under `backend/tests/`, so
//! small helpers live here rather than being copied between suites.

/// Environment variable naming the PostgreSQL database used by the Diesel
/// suite.
pub const TEST_DATABASE_URL_VAR: &str = "POSTS_TEST_DATABASE_URL";

/// Returns the test database URL, or prints a skip marker and returns `None`
/// when the variable is unset or empty.
pub fn test_database_url() -> Option<String> {
    match std::env::var(TEST_DATABASE_URL_VAR) {
        Ok(url) if !url.trim().is_empty() => Some(url),
        _ => {
            eprintln!("SKIP-TEST-DATABASE: {TEST_DATABASE_URL_VAR} is not set");
            None
        }
    }
}
