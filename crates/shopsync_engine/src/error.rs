//! Error types for the sync engine.

use crate::store::StoreError;
use thiserror::Error;

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur during sync operations.
///
/// None of these aborts the process. A `CredentialMissing` or `Exhausted`
/// outcome skips one tenant's unit of work; `MalformedRecord` skips one
/// record; `Store` aborts the remaining work of the current job for this
/// cycle only. Other tenants and other jobs are never affected.
#[derive(Error, Debug)]
pub enum SyncError {
    /// The tenant has no usable credential in the store.
    ///
    /// This is a configuration fact, not a transient fault: it is never
    /// retried, the tenant's batch is skipped for the cycle.
    #[error("no credential for tenant {0}")]
    CredentialMissing(String),

    /// Network or remote-service error.
    #[error("transport error: {message}")]
    Transport {
        /// Error message.
        message: String,
        /// Whether the operation can be retried.
        retryable: bool,
    },

    /// Terminal outcome of the retry executor after all attempts failed.
    #[error("retries exhausted after {attempts} attempts: {last_error}")]
    Exhausted {
        /// Number of attempts made.
        attempts: u32,
        /// The error from the final attempt.
        last_error: String,
    },

    /// A store row does not map to the expected shape.
    #[error("malformed record {id}: {reason}")]
    MalformedRecord {
        /// Identifier of the offending record.
        id: String,
        /// What was wrong with it.
        reason: String,
    },

    /// The persistent store cannot be reached.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// The remote response could not be decoded.
    #[error("protocol error: {0}")]
    Protocol(String),
}

impl SyncError {
    /// Creates a retryable transport error.
    pub fn transport_retryable(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            retryable: true,
        }
    }

    /// Creates a non-retryable transport error.
    pub fn transport_fatal(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            retryable: false,
        }
    }

    /// Returns true if this error can be retried.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SyncError::Transport { retryable: true, .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_errors() {
        assert!(SyncError::transport_retryable("connection reset").is_retryable());
        assert!(!SyncError::transport_fatal("invalid certificate").is_retryable());
        assert!(!SyncError::CredentialMissing("T1".into()).is_retryable());
        assert!(!SyncError::Protocol("bad json".into()).is_retryable());
    }

    #[test]
    fn error_display() {
        let err = SyncError::CredentialMissing("T1".into());
        assert_eq!(err.to_string(), "no credential for tenant T1");

        let err = SyncError::Exhausted {
            attempts: 5,
            last_error: "timeout".into(),
        };
        assert!(err.to_string().contains("5"));
        assert!(err.to_string().contains("timeout"));
    }
}
