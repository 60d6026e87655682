use thiserror::Error;

/// Error for notification gateway operations.
#[derive(Debug, Clone, Error)]
pub enum NotificationError {
    #[error("Failed to build message: {0}")]
    InvalidMessage(String),

    #[error("Failed to send mail: {0}")]
    SendFailed(String),
}

/// Top-level error for verification-event operations.
///
/// Absent and expired events share one variant so callers cannot tell
/// whether an access key ever existed.
#[derive(Debug, Clone, Error)]
pub enum VerificationError {
    #[error("Verification request not found or expired")]
    EventNotFoundOrExpired,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Notification error: {0}")]
    Notification(#[from] NotificationError),
}
