//! Client error types.
//!
//! The taxonomy separates failures by where they happen:
//!
//! - [`S3ClientError::Configuration`] - invalid constructor/setter arguments,
//!   raised before any client exists.
//! - [`S3ClientError::Validation`] - invalid per-call arguments, raised
//!   before signing or any network activity.
//! - [`S3ClientError::Protocol`] - the store answered with a non-tolerated
//!   HTTP status; carries the status, the provider's error code/message
//!   headers, and the full response body for diagnostics.
//! - [`S3ClientError::Transport`] - network-level failure (timeout, abort,
//!   connection reset), propagated unmodified from the HTTP client.
//! - [`S3ClientError::Xml`] / [`S3ClientError::Signing`] - malformed
//!   response bodies and endpoint problems.
//!
//! "Not found" and "precondition failed" are deliberately NOT errors: read
//! and existence paths return `None`/`false` sentinels for 404/412/304 so
//! callers can branch without `match`ing error variants.

/// Errors returned by [`S3Client`](crate::S3Client) operations.
#[derive(Debug, thiserror::Error)]
pub enum S3ClientError {
    /// Invalid configuration (empty credentials, endpoint, or bucket;
    /// request-size floor violations). Raised eagerly, never mid-request.
    #[error("invalid configuration: {message}")]
    Configuration {
        /// Description of the invalid field.
        message: String,
    },

    /// Invalid per-call argument (empty key, non-positive part number,
    /// empty parts list, ...). Raised before signing.
    #[error("invalid argument: {message}")]
    Validation {
        /// Description of the invalid argument.
        message: String,
    },

    /// The store answered with a non-tolerated HTTP status.
    #[error(
        "request failed with status {status}: {error_code}: {error_message}",
        error_code = .code.as_deref().unwrap_or("UnknownError"),
        error_message = .message.as_deref().unwrap_or("(no message)")
    )]
    Protocol {
        /// The HTTP status code.
        status: u16,
        /// Provider error code, from the `x-amz-error-code` header or the
        /// XML `Error` document.
        code: Option<String>,
        /// Provider error message, from `x-amz-error-message` or the XML
        /// `Error` document.
        message: Option<String>,
        /// The raw response body, for diagnostics.
        body: String,
    },

    /// Network-level failure from the underlying HTTP client.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body was not the XML document it should have been.
    #[error(transparent)]
    Xml(#[from] shoal_xml::XmlError),

    /// The configured endpoint could not be turned into a signable URL.
    #[error(transparent)]
    Signing(#[from] shoal_sigv4::SigningError),
}

impl S3ClientError {
    /// Shorthand for a [`S3ClientError::Configuration`] error.
    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Shorthand for a [`S3ClientError::Validation`] error.
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

/// Convenience result type for client operations.
pub type S3Result<T> = Result<T, S3ClientError>;
