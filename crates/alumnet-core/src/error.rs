//! Error presentation metadata
//!
//! Pipeline errors are plain `thiserror` enums living next to the code that
//! raises them. The calling UI needs more than a message though: whether a
//! retry prompt makes sense, what to tell the user, how loudly to log. Errors
//! describe that through [`ErrorMetadata`].

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues like resource limits
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata describing how an error should be presented to the caller
pub trait ErrorMetadata {
    /// Machine-readable error code (e.g., "ASSET_TOO_LARGE")
    fn error_code(&self) -> &'static str;

    /// Whether trying the same operation again later can succeed
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the user
    fn suggested_action(&self) -> Option<&'static str>;

    /// User-facing message (may differ from the internal error message)
    fn client_message(&self) -> String;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}
