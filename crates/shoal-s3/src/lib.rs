//! Shoal: a lean client for S3-compatible object stores.
//!
//! Shoal speaks the S3 REST protocol directly - AWS Signature Version 4
//! signing, single-shot and multipart object transfer, byte-range and
//! conditional (ETag-based) reads, and minimal XML response decoding -
//! without pulling in a full SDK.
//!
//! # Overview
//!
//! Every public call follows the same path: validate arguments, sign the
//! request ([`shoal_sigv4`]), execute and classify the response, interpret
//! the body and headers ([`shoal_xml`] / [`sanitize_etag`]), and return a
//! typed result. The client holds only
//! immutable state (configuration, signer, HTTP connection pool), so any
//! number of calls may be in flight concurrently against one instance.
//!
//! Not-found and failed-precondition outcomes (404/412/304) on read and
//! existence paths are sentinel `None`/`false` returns, never errors; see
//! [`error`] for the full taxonomy.
//!
//! # Usage
//!
//! ```no_run
//! use shoal_s3::{S3Client, S3Config};
//!
//! # async fn demo() -> Result<(), shoal_s3::S3ClientError> {
//! let config = S3Config::new(
//!     "minioadmin",
//!     "minioadmin",
//!     "http://127.0.0.1:9000",
//!     "demo-bucket",
//! )?
//! .with_region("us-east-1");
//!
//! let client = S3Client::new(config)?;
//! client.put("greeting.txt", "Hello").await?;
//! let body = client.get("greeting.txt", None).await?;
//! assert_eq!(body.as_deref(), Some("Hello"));
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`config`] - Eagerly-validated client configuration
//! - [`client`] - Object operations (get/put/delete/head/list, ranged and
//!   conditional reads) and the multipart upload lifecycle
//! - [`error`] - Error taxonomy
//! - [`etag`] - ETag normalization
//! - [`types`] - Typed results and request options

pub mod client;
pub mod config;
pub mod error;
pub mod etag;
mod multipart;
mod transport;
pub mod types;

pub use client::S3Client;
pub use config::{MIN_MAX_REQUEST_SIZE, S3Config};
pub use error::{S3ClientError, S3Result};
pub use etag::sanitize_etag;
pub use types::{
    CompletedUpload, GetConditions, MultipartUploadEntry, ObjectEntry, ObjectMetadata,
    ObjectWithETag, Part, UploadSession,
};

// Re-export the signing capability so callers can inject their own hasher.
pub use shoal_sigv4::{HashProvider, RustCryptoProvider};
