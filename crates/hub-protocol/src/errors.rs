//! Error Handling Guidelines
//!
//! All error messages should follow this format:
//!
//! 1. **What failed**: Describe the operation that failed
//! 2. **Why it failed**: Provide the root cause if known
//! 3. **What to do**: Suggest user action when possible

use thiserror::Error;

/// Unified error type for router operations
#[derive(Error, Debug, Clone)]
pub enum HubError {
    /// Protocol line could not be parsed
    #[error("Malformed line in {block} block: {line}")]
    MalformedLine { block: String, line: String },

    /// Port index outside the device's announced range
    #[error("Index {index} out of range for {space} (count {count})")]
    OutOfRangeIndex {
        space: String,
        index: usize,
        count: usize,
    },

    /// Lock code other than U/O/L on the wire
    #[error("Invalid lock value: {0}")]
    InvalidLockValue(String),

    /// Operation requires a live device connection
    #[error("Not connected to router - call Connect before issuing commands")]
    NotConnected,

    /// Route file contents rejected
    #[error("Route file invalid: {0}")]
    RouteFile(String),

    /// Communication channel closed
    #[error("Channel closed: {0}")]
    ChannelClosed(String),

    /// Transport layer error
    #[error("Transport error: {0}")]
    Transport(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<String> for HubError {
    fn from(s: String) -> Self {
        HubError::Other(s)
    }
}

impl From<&str> for HubError {
    fn from(s: &str) -> Self {
        HubError::Other(s.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = HubError::OutOfRangeIndex {
            space: "video outputs".into(),
            index: 12,
            count: 8,
        };
        assert_eq!(
            err.to_string(),
            "Index 12 out of range for video outputs (count 8)"
        );
    }

    #[test]
    fn test_error_from_string() {
        let err: HubError = "Test error".into();
        match err {
            HubError::Other(msg) => assert_eq!(msg, "Test error"),
            _ => panic!("Wrong variant"),
        }
    }

    #[test]
    fn test_not_connected_mentions_action() {
        assert!(HubError::NotConnected.to_string().contains("Connect"));
    }
}
