//! Client configuration.
//!
//! [`S3Config`] is validated eagerly: every constructor and setter checks
//! its arguments, so an invalid configuration can never reach the signing
//! or transport layers.
//!
//! | field | default | invariant |
//! |-------|---------|-----------|
//! | `access_key_id` | - | non-empty |
//! | `secret_access_key` | - | non-empty |
//! | `endpoint` | - | non-empty |
//! | `bucket_name` | - | non-empty |
//! | `region` | `"auto"` | - |
//! | `max_request_size` | 5 MiB | >= 5 MiB |
//! | `request_timeout` | none | - |
//!
//! The 5 MiB floor is S3's minimum multipart part size (final part
//! excepted); configurations below it would produce uploads the store
//! rejects at completion time.

use std::fmt;
use std::time::Duration;

use crate::error::{S3ClientError, S3Result};

/// S3's minimum multipart part size, and the floor for `max_request_size`.
pub const MIN_MAX_REQUEST_SIZE: u64 = 5 * 1024 * 1024;

/// Configuration for an [`S3Client`](crate::S3Client).
#[derive(Clone)]
pub struct S3Config {
    access_key_id: String,
    secret_access_key: String,
    endpoint: String,
    bucket_name: String,
    region: String,
    max_request_size: u64,
    request_timeout: Option<Duration>,
}

impl fmt::Debug for S3Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Credentials must never surface in logs.
        f.debug_struct("S3Config")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .field("bucket_name", &self.bucket_name)
            .field("region", &self.region)
            .field("max_request_size", &self.max_request_size)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

fn require_non_empty(field: &str, value: &str) -> S3Result<()> {
    if value.trim().is_empty() {
        return Err(S3ClientError::configuration(format!(
            "{field} must be a non-empty string"
        )));
    }
    Ok(())
}

impl S3Config {
    /// Create a configuration from the four required fields.
    ///
    /// Region defaults to `"auto"`, `max_request_size` to 5 MiB, and no
    /// request timeout is set.
    ///
    /// # Errors
    ///
    /// Returns [`S3ClientError::Configuration`] if any field is empty.
    pub fn new(
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        endpoint: impl Into<String>,
        bucket_name: impl Into<String>,
    ) -> S3Result<Self> {
        let config = Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            endpoint: endpoint.into(),
            bucket_name: bucket_name.into(),
            region: "auto".to_owned(),
            max_request_size: MIN_MAX_REQUEST_SIZE,
            request_timeout: None,
        };
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables.
    ///
    /// Reads `S3_ACCESS_KEY_ID`, `S3_SECRET_ACCESS_KEY`, `S3_ENDPOINT`,
    /// `S3_BUCKET` (all required), plus optional `S3_REGION`,
    /// `S3_MAX_REQUEST_SIZE`, and `S3_REQUEST_TIMEOUT_MS`.
    ///
    /// # Errors
    ///
    /// Returns [`S3ClientError::Configuration`] if a required variable is
    /// missing or an optional one fails to parse.
    pub fn from_env() -> S3Result<Self> {
        let var = |name: &str| {
            std::env::var(name)
                .map_err(|_| S3ClientError::configuration(format!("{name} is not set")))
        };

        let mut config = Self::new(
            var("S3_ACCESS_KEY_ID")?,
            var("S3_SECRET_ACCESS_KEY")?,
            var("S3_ENDPOINT")?,
            var("S3_BUCKET")?,
        )?;

        if let Ok(v) = std::env::var("S3_REGION") {
            config.set_region(v);
        }
        if let Ok(v) = std::env::var("S3_MAX_REQUEST_SIZE") {
            let size = v.parse::<u64>().map_err(|e| {
                S3ClientError::configuration(format!("S3_MAX_REQUEST_SIZE: {e}"))
            })?;
            config.set_max_request_size(size)?;
        }
        if let Ok(v) = std::env::var("S3_REQUEST_TIMEOUT_MS") {
            let ms = v.parse::<u64>().map_err(|e| {
                S3ClientError::configuration(format!("S3_REQUEST_TIMEOUT_MS: {e}"))
            })?;
            config.set_request_timeout(Some(Duration::from_millis(ms)));
        }

        Ok(config)
    }

    /// Set the region (builder-style).
    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.set_region(region);
        self
    }

    /// Set the maximum request size (builder-style).
    ///
    /// # Errors
    ///
    /// Returns [`S3ClientError::Configuration`] if `bytes` is below the
    /// 5 MiB floor.
    pub fn with_max_request_size(mut self, bytes: u64) -> S3Result<Self> {
        self.set_max_request_size(bytes)?;
        Ok(self)
    }

    /// Set the per-request abort timeout (builder-style).
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.set_request_timeout(Some(timeout));
        self
    }

    /// Replace the credentials, re-validating them.
    pub fn set_credentials(
        &mut self,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
    ) -> S3Result<()> {
        let access_key_id = access_key_id.into();
        let secret_access_key = secret_access_key.into();
        require_non_empty("access_key_id", &access_key_id)?;
        require_non_empty("secret_access_key", &secret_access_key)?;
        self.access_key_id = access_key_id;
        self.secret_access_key = secret_access_key;
        Ok(())
    }

    /// Replace the endpoint, re-validating it.
    pub fn set_endpoint(&mut self, endpoint: impl Into<String>) -> S3Result<()> {
        let endpoint = endpoint.into();
        require_non_empty("endpoint", &endpoint)?;
        self.endpoint = endpoint;
        Ok(())
    }

    /// Replace the bucket name, re-validating it.
    pub fn set_bucket_name(&mut self, bucket_name: impl Into<String>) -> S3Result<()> {
        let bucket_name = bucket_name.into();
        require_non_empty("bucket_name", &bucket_name)?;
        self.bucket_name = bucket_name;
        Ok(())
    }

    /// Replace the region.
    pub fn set_region(&mut self, region: impl Into<String>) {
        self.region = region.into();
    }

    /// Replace the maximum request size, enforcing the 5 MiB floor.
    pub fn set_max_request_size(&mut self, bytes: u64) -> S3Result<()> {
        if bytes < MIN_MAX_REQUEST_SIZE {
            return Err(S3ClientError::configuration(format!(
                "max_request_size must be at least {MIN_MAX_REQUEST_SIZE} bytes (got {bytes})"
            )));
        }
        self.max_request_size = bytes;
        Ok(())
    }

    /// Replace the per-request timeout (`None` disables it).
    pub fn set_request_timeout(&mut self, timeout: Option<Duration>) {
        self.request_timeout = timeout;
    }

    /// The access key ID.
    #[must_use]
    pub fn access_key_id(&self) -> &str {
        &self.access_key_id
    }

    /// The secret access key.
    #[must_use]
    pub fn secret_access_key(&self) -> &str {
        &self.secret_access_key
    }

    /// The endpoint URL.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// The bucket name.
    #[must_use]
    pub fn bucket_name(&self) -> &str {
        &self.bucket_name
    }

    /// The signing region.
    #[must_use]
    pub fn region(&self) -> &str {
        &self.region
    }

    /// The maximum request size in bytes.
    #[must_use]
    pub fn max_request_size(&self) -> u64 {
        self.max_request_size
    }

    /// The per-request abort timeout, if any.
    #[must_use]
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout
    }

    fn validate(&self) -> S3Result<()> {
        require_non_empty("access_key_id", &self.access_key_id)?;
        require_non_empty("secret_access_key", &self.secret_access_key)?;
        require_non_empty("endpoint", &self.endpoint)?;
        require_non_empty("bucket_name", &self.bucket_name)?;
        if self.max_request_size < MIN_MAX_REQUEST_SIZE {
            return Err(S3ClientError::configuration(
                "max_request_size below the 5 MiB floor",
            ));
        }
        Ok(())
    }
}
