//! Error types for the window manager
//!
//! Errors surface only at the seams (storage, content provider, direction
//! parsing). The [`WindowManager`](crate::WindowManager) converts them into
//! log records and leaves previous state untouched.

use crate::types::WindowId;

/// Errors that can occur in window manager operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DesktopError {
    /// Window with the given ID is not open
    WindowNotFound(WindowId),

    /// Persisted value could not be decoded
    CorruptStorage {
        /// Storage key holding the bad value
        key: String,
        /// Decoder message
        reason: String,
    },

    /// Persisted value could not be written (quota, privacy mode, ...)
    StorageWrite {
        /// Storage key being written
        key: String,
        /// Host message
        reason: String,
    },

    /// Window content could not be fetched
    FetchFailed {
        /// Requested window
        id: WindowId,
        /// Network or status message
        reason: String,
    },

    /// Fetched content root is not a window
    InvalidContent {
        /// Requested window
        id: WindowId,
    },

    /// Resize direction token is not a compass subset
    InvalidDirection(String),

    /// No modal element with the given ID
    ModalNotFound(String),

    /// Configuration could not be parsed
    Config(String),
}

impl std::fmt::Display for DesktopError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WindowNotFound(id) => write!(f, "window not found: {}", id),
            Self::CorruptStorage { key, reason } => {
                write!(f, "corrupt storage value for '{}': {}", key, reason)
            }
            Self::StorageWrite { key, reason } => {
                write!(f, "failed to write storage key '{}': {}", key, reason)
            }
            Self::FetchFailed { id, reason } => {
                write!(f, "failed to load window {}: {}", id, reason)
            }
            Self::InvalidContent { id } => write!(f, "invalid window content for {}", id),
            Self::InvalidDirection(token) => write!(f, "invalid resize direction: '{}'", token),
            Self::ModalNotFound(id) => write!(f, "modal not found: {}", id),
            Self::Config(msg) => write!(f, "configuration error: {}", msg),
        }
    }
}

impl std::error::Error for DesktopError {}

/// Result type alias for window manager operations
pub type DesktopResult<T> = Result<T, DesktopError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DesktopError::WindowNotFound("window-log".to_string());
        assert_eq!(err.to_string(), "window not found: window-log");

        let err = DesktopError::CorruptStorage {
            key: "windowState".to_string(),
            reason: "expected value at line 1 column 1".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "corrupt storage value for 'windowState': expected value at line 1 column 1"
        );

        let err = DesktopError::FetchFailed {
            id: "window-jobs".to_string(),
            reason: "HTTP 404".to_string(),
        };
        assert_eq!(err.to_string(), "failed to load window window-jobs: HTTP 404");

        let err = DesktopError::InvalidDirection("nx".to_string());
        assert_eq!(err.to_string(), "invalid resize direction: 'nx'");
    }

    #[test]
    fn test_error_equality() {
        let err1 = DesktopError::ModalNotFound("modal-lostconn".to_string());
        let err2 = DesktopError::ModalNotFound("modal-lostconn".to_string());
        let err3 = DesktopError::ModalNotFound("modal-about".to_string());

        assert_eq!(err1, err2);
        assert_ne!(err1, err3);
    }
}
