//! Generic error handling utilities
//!
//! Provides unified fatal-error reporting that works across the crate's error
//! types while keeping system detail out of the user's way.

/// Trait for errors that can distinguish between user-actionable and system errors
///
/// When `is_user_actionable()` returns `true`, `user_message()` should return
/// `Some(message)`; otherwise it should return `None`.
pub trait ContextualError: std::error::Error {
    /// Returns true if this error carries a message the user can act on
    /// directly (bad arguments, a scan that ran out of time, ...)
    fn is_user_actionable(&self) -> bool;

    /// Returns the specific user message if this is a user-actionable error
    fn user_message(&self) -> Option<&str>;
}

/// Build the primary fatal line for an error
///
/// User-actionable errors show their own message, everything else shows the
/// operation context with the error appended.
pub fn fatal_message<E: ContextualError + std::fmt::Display>(
    error: &E,
    operation_context: &str,
) -> String {
    match error.user_message() {
        Some(user_msg) if error.is_user_actionable() => format!("FATAL: {}", user_msg),
        _ => format!("FATAL: {}: {}", operation_context, error),
    }
}

/// Log errors with appropriate detail level based on error specificity
///
/// # Examples
/// ```rust,no_run
/// # use zapscan::core::error_handling::log_error_with_context;
/// # use zapscan::core::validation::ValidationError;
/// let err = ValidationError::new("--target is required");
/// log_error_with_context(&err, "Loading configuration");
/// // Logs: "FATAL: --target is required"
/// ```
pub fn log_error_with_context<E: ContextualError + std::fmt::Display + std::fmt::Debug>(
    error: &E,
    operation_context: &str,
) {
    log::error!("{}", fatal_message(error, operation_context));
    log::debug!("DEBUG_DETAILS: {:?}", error);
}
