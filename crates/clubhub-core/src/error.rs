//! Error presentation metadata
//!
//! Errors raised while submitting admin forms describe themselves through
//! `ErrorMetadata`: the code shown in logs, the message shown to the admin user,
//! whether the user can simply retry, and how loudly the failure is logged.

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata describing how an error should be presented to the admin user.
pub trait ErrorMetadata {
    /// Machine-readable error code (e.g., "UPLOAD_FAILED")
    fn error_code(&self) -> &'static str;

    /// Whether resubmitting the same form can succeed
    fn is_recoverable(&self) -> bool;

    /// Message for the toast or inline error shown to the user
    fn user_message(&self) -> String;

    /// Whether the user sees this error at all
    fn is_user_visible(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}
