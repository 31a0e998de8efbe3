//! Error codes shared by every fallible boundary in the crate.

/// Grepable error code and retryable flag for surfaced errors.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}
