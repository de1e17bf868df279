//! Signing error types.

/// Errors raised while constructing a signer or signing a request.
#[derive(Debug, thiserror::Error)]
pub enum SigningError {
    /// The configured endpoint could not be parsed into scheme + host.
    #[error("invalid endpoint '{endpoint}': {reason}")]
    InvalidEndpoint {
        /// The endpoint string that failed to parse.
        endpoint: String,
        /// The reason for the error.
        reason: String,
    },
}
