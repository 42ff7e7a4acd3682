//! Unified error type for all diagnostic operations.

use serde::Serialize;
use thiserror::Error;

/// Diagnostics engine error type.
///
/// Validation variants (`InvalidInput`, `PrivateTarget`, `TooManyPorts`) are
/// raised before any network I/O begins. `Network` and `Timeout` only escape
/// from operations whose failure is fatal to the caller; per-resolver and
/// per-port failures are folded into their result types instead.
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum EngineError {
    /// Malformed IP address, domain name, or port expression.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The scan target is a private or loopback address.
    #[error("Private or loopback targets cannot be scanned: {0}")]
    PrivateTarget(String),

    /// The port expression yields more ports than a single scan allows.
    #[error("Too many ports: {0}")]
    TooManyPorts(String),

    /// Network-level failure.
    #[error("Network error: {0}")]
    Network(String),

    /// The operation exceeded its deadline.
    #[error("Timed out: {0}")]
    Timeout(String),
}

/// Engine Result type alias.
pub type EngineResult<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serializes_as_code_details() {
        let err = EngineError::PrivateTarget("192.168.1.1".to_string());
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "PrivateTarget");
        assert_eq!(json["details"], "192.168.1.1");
    }

    #[test]
    fn test_error_display_messages() {
        let err = EngineError::InvalidInput("bad port".to_string());
        assert_eq!(err.to_string(), "Invalid input: bad port");
        let err = EngineError::TooManyPorts("6 requested".to_string());
        assert!(err.to_string().starts_with("Too many ports"));
    }
}
