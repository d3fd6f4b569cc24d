//! Error types for netlink operations.

use std::io;

/// Result type for netlink operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during netlink operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error from socket operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Kernel returned an error code.
    #[error("kernel error: {message} (errno {errno})")]
    Kernel {
        /// The errno value from the kernel (positive).
        errno: i32,
        /// Human-readable error message.
        message: String,
    },

    /// Fewer (or more) bytes than a fixed wire structure requires.
    #[error("buffer size mismatch: expected {expected} bytes, got {actual}")]
    Truncated {
        /// Size the structure requires.
        expected: usize,
        /// Bytes actually available.
        actual: usize,
    },

    /// Attribute kind at or beyond the family's declared maximum.
    #[error("unknown {family} attribute kind {kind} (max {max})")]
    UnknownAttribute {
        /// Attribute family, e.g. `"IFLA"`.
        family: &'static str,
        /// Kind as found on the wire, with flag bits masked.
        kind: u16,
        /// Exclusive upper bound of known kinds.
        max: u16,
    },

    /// Header type outside the supported message set.
    #[error("unknown message type {0}")]
    UnknownMessageType(u16),

    /// Invalid message format.
    #[error("invalid message: {0}")]
    InvalidMessage(String),

    /// Invalid attribute format.
    #[error("invalid attribute: {0}")]
    InvalidAttribute(String),

    /// The kernel granted a smaller socket buffer than requested.
    #[error("{option} truncated to {actual} bytes; run: sysctl -w {sysctl}={requested}")]
    BufferClamped {
        /// Socket option name.
        option: &'static str,
        /// Sysctl limiting the option.
        sysctl: &'static str,
        /// Requested size in bytes.
        requested: usize,
        /// Size reported back by the kernel.
        actual: usize,
    },

    /// No reply arrived before the caller's deadline.
    #[error("timed out waiting for reply")]
    Timeout,

    /// The connection closed before a reply arrived.
    #[error("request cancelled: connection closed")]
    Cancelled,

    /// The connection is closed.
    #[error("connection closed")]
    Closed,

    /// `listen` was already started on this connection.
    #[error("connection is already listening")]
    AlreadyListening,
}

impl Error {
    /// Create a kernel error from a (negative) errno value.
    pub fn from_errno(errno: i32) -> Self {
        let errno = errno.saturating_abs();
        let message = io::Error::from_raw_os_error(errno).to_string();
        Self::Kernel { errno, message }
    }

    /// Get the errno if this is a kernel error.
    pub fn errno(&self) -> Option<i32> {
        match self {
            Self::Kernel { errno, .. } => Some(*errno),
            Self::Io(e) => e.raw_os_error(),
            _ => None,
        }
    }

    /// Check if a pending request was cancelled by close.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled | Self::Closed)
    }

    /// Check if this is a timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }

    /// Check if this is a "not found" error (ENOENT, ENODEV).
    pub fn is_not_found(&self) -> bool {
        matches!(self.errno(), Some(libc::ENOENT | libc::ENODEV))
    }

    /// Check if this is a permission error (EPERM, EACCES).
    pub fn is_permission_denied(&self) -> bool {
        matches!(self.errno(), Some(libc::EPERM | libc::EACCES))
    }

    /// Check if this error only affects a single received record.
    pub fn is_decode(&self) -> bool {
        matches!(
            self,
            Self::Truncated { .. }
                | Self::UnknownAttribute { .. }
                | Self::UnknownMessageType(_)
                | Self::InvalidMessage(_)
                | Self::InvalidAttribute(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_errno() {
        let err = Error::from_errno(-libc::ENODEV);
        assert_eq!(err.errno(), Some(libc::ENODEV));
        assert!(err.is_not_found());
        assert!(!err.is_permission_denied());
    }

    #[test]
    fn test_from_positive_errno() {
        let err = Error::from_errno(libc::EPERM);
        assert_eq!(err.errno(), Some(libc::EPERM));
        assert!(err.is_permission_denied());
    }

    #[test]
    fn test_decode_classification() {
        assert!(Error::Truncated { expected: 16, actual: 3 }.is_decode());
        assert!(Error::UnknownMessageType(200).is_decode());
        assert!(!Error::Closed.is_decode());
        assert!(!Error::Io(io::Error::other("boom")).is_decode());
    }

    #[test]
    fn test_display() {
        let err = Error::UnknownAttribute {
            family: "IFLA",
            kind: 99,
            max: 70,
        };
        assert_eq!(err.to_string(), "unknown IFLA attribute kind 99 (max 70)");
        assert!(Error::Cancelled.is_cancelled());
        assert!(Error::Timeout.is_timeout());
    }
}
