//! Shared constants for integration tests.
//!
//! Integration tests are compiled as separate crates (one per top-level file in
//! `tests/`). Placing shared constants under `tests/common/` avoids creating an
//! additional integration test binary while still allowing reuse via:
//!
//! ```rust
//! #[path = "common/test_constants.rs"]
//! mod test_constants;
//! ```

/// Plan requested when no override is provided.
pub const DEFAULT_PLAN: &str = "vc2-1c-1gb";

/// Operating system requested when no override is provided.
pub const DEFAULT_OS: &str = "Debian 11 x64 (bullseye)";

/// Body returned by the API for a rejected API key.
pub const UNAUTHORISED_BODY: &str = r#"{"error":"Invalid API token.","status":401}"#;
