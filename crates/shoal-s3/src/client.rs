//! The S3 client and its object operations.
//!
//! [`S3Client`] is constructed from a validated [`S3Config`] and, by
//! default, the [`RustCryptoProvider`] hashing backend. All state is
//! immutable after construction, so one client serves concurrent calls
//! without locks; every operation computes call-scoped values only
//! (timestamp, canonical request, signature).
//!
//! Read and existence operations treat 404/412/304 as sentinel outcomes
//! (`None`/`false`), so callers distinguish "missing or precondition
//! failed" from hard failures without catching errors.

use std::collections::BTreeMap;
use std::sync::Arc;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use reqwest::{Method, Response, StatusCode};
use shoal_sigv4::{HashProvider, RequestSigner, RustCryptoProvider};
use shoal_xml::{Value, decode};
use tracing::debug;

use crate::config::S3Config;
use crate::error::{S3ClientError, S3Result};
use crate::etag::sanitize_etag;
use crate::transport::Transport;
use crate::types::{
    GetConditions, MultipartUploadEntry, ObjectEntry, ObjectMetadata, ObjectWithETag,
};

/// Response tags that always decode as lists, so a single-entry listing is
/// still a sequence.
pub(crate) const ALWAYS_LIST: &[&str] = &["contents", "commonprefixes", "upload", "part"];

/// Statuses returned as sentinels (never thrown) on read/existence paths.
pub(crate) const NOT_FOUND_OR_PRECONDITION: [StatusCode; 3] = [
    StatusCode::NOT_FOUND,
    StatusCode::PRECONDITION_FAILED,
    StatusCode::NOT_MODIFIED,
];

/// Client for one bucket of an S3-compatible object store.
#[derive(Debug)]
pub struct S3Client {
    pub(crate) config: S3Config,
    pub(crate) signer: RequestSigner,
    pub(crate) transport: Transport,
}

impl S3Client {
    /// Create a client with the default hashing backend.
    ///
    /// # Errors
    ///
    /// Returns [`S3ClientError::Signing`] if the configured endpoint is not
    /// an absolute http(s) URL.
    pub fn new(config: S3Config) -> S3Result<Self> {
        Self::with_hash_provider(config, Arc::new(RustCryptoProvider))
    }

    /// Create a client with an injected [`HashProvider`].
    ///
    /// # Errors
    ///
    /// Returns [`S3ClientError::Signing`] if the configured endpoint is not
    /// an absolute http(s) URL.
    pub fn with_hash_provider(
        config: S3Config,
        hasher: Arc<dyn HashProvider>,
    ) -> S3Result<Self> {
        let signer = RequestSigner::new(
            config.access_key_id(),
            config.secret_access_key(),
            config.region(),
            config.endpoint(),
            config.bucket_name(),
            hasher,
        )?;
        let transport = Transport::new(config.request_timeout());
        Ok(Self {
            config,
            signer,
            transport,
        })
    }

    /// The configuration this client was built from.
    #[must_use]
    pub fn config(&self) -> &S3Config {
        &self.config
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// Fetch an object as text.
    ///
    /// Returns `None` when the object does not exist or a condition in
    /// `conditions` did not hold (404/412/304).
    pub async fn get(
        &self,
        key: &str,
        conditions: Option<&GetConditions>,
    ) -> S3Result<Option<String>> {
        let response = self.get_response(key, true, 0, 0, conditions).await?;
        if is_sentinel(response.status()) {
            return Ok(None);
        }
        Ok(Some(response.text().await?))
    }

    /// Fetch an object as text together with its sanitized ETag.
    ///
    /// Returns `None` under the same conditions as [`get`](Self::get).
    pub async fn get_with_etag(
        &self,
        key: &str,
        conditions: Option<&GetConditions>,
    ) -> S3Result<Option<ObjectWithETag>> {
        let response = self.get_response(key, true, 0, 0, conditions).await?;
        if is_sentinel(response.status()) {
            return Ok(None);
        }
        let etag = header_value(&response, "etag").map(|v| sanitize_etag(&v));
        Ok(Some(ObjectWithETag {
            etag,
            body: response.text().await?,
        }))
    }

    /// Fetch an object's sanitized ETag via a HEAD request.
    ///
    /// Returns `None` when the object does not exist or a condition did not
    /// hold.
    pub async fn get_etag(
        &self,
        key: &str,
        conditions: Option<&GetConditions>,
    ) -> S3Result<Option<String>> {
        let response = self.head(key, conditions).await?;
        if is_sentinel(response.status()) {
            return Ok(None);
        }
        match header_value(&response, "etag") {
            Some(etag) => Ok(Some(sanitize_etag(&etag))),
            None => Err(S3ClientError::Protocol {
                status: response.status().as_u16(),
                code: None,
                message: Some("response did not include an ETag header".to_owned()),
                body: String::new(),
            }),
        }
    }

    /// Issue a GET and return the raw streamable response.
    ///
    /// When `whole_file` is false the request carries
    /// `Range: bytes={range_from}-{range_to - 1}`: **`range_to` is
    /// exclusive**, so `(0, 7)` reads exactly the first 7 bytes. The
    /// sentinel statuses (404/412/304) are returned raw rather than thrown;
    /// inspect `response.status()` before consuming the stream.
    pub async fn get_response(
        &self,
        key: &str,
        whole_file: bool,
        range_from: u64,
        range_to: u64,
        conditions: Option<&GetConditions>,
    ) -> S3Result<Response> {
        require_key(key)?;
        let mut headers = conditions_headers(conditions);
        if !whole_file {
            if range_to <= range_from {
                return Err(S3ClientError::validation(format!(
                    "range_to ({range_to}) must be greater than range_from ({range_from}); range_to is exclusive"
                )));
            }
            headers.insert("range".to_owned(), range_header(range_from, range_to));
        }
        let signed = self.signer.sign(Method::GET.as_str(), key, &[], &headers, b"");
        self.transport
            .send(Method::GET, &signed, None, &NOT_FOUND_OR_PRECONDITION)
            .await
    }

    // -----------------------------------------------------------------------
    // Existence and metadata
    // -----------------------------------------------------------------------

    /// Three-valued existence check via HEAD.
    ///
    /// `Some(true)` - the object exists (200). `Some(false)` - it does not
    /// (404). `None` - it exists but a condition did not hold (412/304),
    /// e.g. a stale `if-match` ETag.
    pub async fn file_exists(
        &self,
        key: &str,
        conditions: Option<&GetConditions>,
    ) -> S3Result<Option<bool>> {
        let response = self.head(key, conditions).await?;
        match response.status() {
            status if status.is_success() => Ok(Some(true)),
            StatusCode::NOT_FOUND => Ok(Some(false)),
            _ => Ok(None),
        }
    }

    /// Fetch an object's metadata via HEAD.
    ///
    /// Returns `None` when the object does not exist or a condition did not
    /// hold.
    pub async fn head_object(
        &self,
        key: &str,
        conditions: Option<&GetConditions>,
    ) -> S3Result<Option<ObjectMetadata>> {
        let response = self.head(key, conditions).await?;
        if is_sentinel(response.status()) {
            return Ok(None);
        }
        let size = header_value(&response, "content-length")
            .and_then(|v| v.parse().ok())
            .unwrap_or(0);
        let last_modified =
            header_value(&response, "last-modified").and_then(|v| parse_http_date(&v));
        let etag = header_value(&response, "etag").map(|v| sanitize_etag(&v));
        Ok(Some(ObjectMetadata {
            size,
            last_modified,
            etag,
        }))
    }

    /// Fetch an object's size in bytes; `None` when it does not exist.
    pub async fn get_content_length(&self, key: &str) -> S3Result<Option<u64>> {
        Ok(self.head_object(key, None).await?.map(|meta| meta.size))
    }

    /// Whether the configured bucket exists (HEAD against the bucket root).
    pub async fn bucket_exists(&self) -> S3Result<bool> {
        let signed = self
            .signer
            .sign(Method::HEAD.as_str(), "", &[], &BTreeMap::new(), b"");
        let response = self
            .transport
            .send(Method::HEAD, &signed, None, &[StatusCode::NOT_FOUND])
            .await?;
        Ok(response.status().is_success())
    }

    /// Create the configured bucket.
    pub async fn create_bucket(&self) -> S3Result<()> {
        let signed = self
            .signer
            .sign(Method::PUT.as_str(), "", &[], &BTreeMap::new(), b"");
        self.transport.send(Method::PUT, &signed, None, &[]).await?;
        debug!(bucket = self.config.bucket_name(), "bucket created");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Writes
    // -----------------------------------------------------------------------

    /// Store an object; returns the sanitized ETag when the store reports
    /// one.
    ///
    /// `data` must be non-empty except for trailing-slash keys, which are
    /// zero-byte folder markers.
    pub async fn put(&self, key: &str, data: impl Into<Bytes>) -> S3Result<Option<String>> {
        require_key(key)?;
        let data = data.into();
        if data.is_empty() && !key.ends_with('/') {
            return Err(S3ClientError::validation(
                "data must not be empty (only trailing-slash folder markers are zero-byte)",
            ));
        }

        let mut headers = BTreeMap::new();
        headers.insert("content-length".to_owned(), data.len().to_string());
        let signed = self
            .signer
            .sign(Method::PUT.as_str(), key, &[], &headers, &data);
        let response = self
            .transport
            .send(Method::PUT, &signed, Some(data), &[])
            .await?;
        debug!(key, "object stored");
        Ok(header_value(&response, "etag").map(|v| sanitize_etag(&v)))
    }

    /// Delete an object.
    ///
    /// Returns `true` on success, including for keys that did not exist:
    /// deletion is idempotent, and the store answers 404/204 alike for
    /// absent keys. Callers that care about prior existence should check
    /// [`file_exists`](Self::file_exists) first.
    pub async fn delete(&self, key: &str) -> S3Result<bool> {
        require_key(key)?;
        let signed = self
            .signer
            .sign(Method::DELETE.as_str(), key, &[], &BTreeMap::new(), b"");
        let response = self
            .transport
            .send(Method::DELETE, &signed, None, &[StatusCode::NOT_FOUND])
            .await?;
        debug!(key, "object deleted");
        Ok(response.status().is_success() || response.status() == StatusCode::NOT_FOUND)
    }

    // -----------------------------------------------------------------------
    // Listings
    // -----------------------------------------------------------------------

    /// List objects (ListObjectsV2, one page).
    ///
    /// The result is always a sequence, even for a single match. `max_keys`
    /// must be positive; `delimiter`/`prefix` are included in the query
    /// when non-empty.
    pub async fn list(
        &self,
        delimiter: Option<&str>,
        prefix: Option<&str>,
        max_keys: u32,
    ) -> S3Result<Vec<ObjectEntry>> {
        if max_keys == 0 {
            return Err(S3ClientError::validation("max_keys must be positive"));
        }

        let mut query = vec![
            ("list-type".to_owned(), "2".to_owned()),
            ("max-keys".to_owned(), max_keys.to_string()),
        ];
        if let Some(delimiter) = delimiter {
            if !delimiter.is_empty() {
                query.push(("delimiter".to_owned(), delimiter.to_owned()));
            }
        }
        if let Some(prefix) = prefix {
            if !prefix.is_empty() {
                query.push(("prefix".to_owned(), prefix.to_owned()));
            }
        }

        let doc = self.get_decoded(&query).await?;
        let entries = doc
            .get("listbucketresult")
            .and_then(|result| result.get("contents"))
            .and_then(Value::as_list)
            .unwrap_or_default()
            .iter()
            .filter_map(parse_object_entry)
            .collect();
        Ok(entries)
    }

    /// List in-flight multipart upload sessions (one page).
    pub async fn list_multipart_uploads(
        &self,
        delimiter: Option<&str>,
        prefix: Option<&str>,
    ) -> S3Result<Vec<MultipartUploadEntry>> {
        let mut query = vec![("uploads".to_owned(), String::new())];
        if let Some(delimiter) = delimiter {
            if !delimiter.is_empty() {
                query.push(("delimiter".to_owned(), delimiter.to_owned()));
            }
        }
        if let Some(prefix) = prefix {
            if !prefix.is_empty() {
                query.push(("prefix".to_owned(), prefix.to_owned()));
            }
        }

        let doc = self.get_decoded(&query).await?;
        let entries = doc
            .get("listmultipartuploadsresult")
            .and_then(|result| result.get("upload"))
            .and_then(Value::as_list)
            .unwrap_or_default()
            .iter()
            .filter_map(parse_upload_entry)
            .collect();
        Ok(entries)
    }

    // -----------------------------------------------------------------------
    // Shared plumbing
    // -----------------------------------------------------------------------

    /// HEAD a key with the sentinel statuses tolerated.
    async fn head(
        &self,
        key: &str,
        conditions: Option<&GetConditions>,
    ) -> S3Result<Response> {
        require_key(key)?;
        let headers = conditions_headers(conditions);
        let signed = self
            .signer
            .sign(Method::HEAD.as_str(), key, &[], &headers, b"");
        self.transport
            .send(Method::HEAD, &signed, None, &NOT_FOUND_OR_PRECONDITION)
            .await
    }

    /// GET the bucket root with a query and decode the XML body.
    async fn get_decoded(&self, query: &[(String, String)]) -> S3Result<Value> {
        let signed = self
            .signer
            .sign(Method::GET.as_str(), "", query, &BTreeMap::new(), b"");
        let response = self.transport.send(Method::GET, &signed, None, &[]).await?;
        let body = response.text().await?;
        Ok(decode(body.as_bytes(), ALWAYS_LIST)?)
    }
}

/// Raise a [`S3ClientError::Protocol`] if the decoded document is an S3
/// `Error` response.
pub(crate) fn fail_on_error_document(
    doc: &Value,
    status: StatusCode,
    body: &str,
) -> S3Result<()> {
    if let Some(error) = doc.get("error") {
        return Err(S3ClientError::Protocol {
            status: status.as_u16(),
            code: error.text_of("code").map(ToOwned::to_owned),
            message: error.text_of("message").map(ToOwned::to_owned),
            body: body.to_owned(),
        });
    }
    Ok(())
}

pub(crate) fn require_key(key: &str) -> S3Result<()> {
    if key.is_empty() {
        return Err(S3ClientError::validation("key must not be empty"));
    }
    Ok(())
}

pub(crate) fn header_value(response: &Response, name: &str) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToOwned::to_owned)
}

fn conditions_headers(conditions: Option<&GetConditions>) -> BTreeMap<String, String> {
    let mut headers = BTreeMap::new();
    if let Some(conditions) = conditions {
        conditions.apply(&mut headers);
    }
    headers
}

fn is_sentinel(status: StatusCode) -> bool {
    NOT_FOUND_OR_PRECONDITION.contains(&status)
}

/// `Range` header for a half-open `[from, to)` byte range.
fn range_header(from: u64, to: u64) -> String {
    format!("bytes={from}-{}", to - 1)
}

fn parse_object_entry(value: &Value) -> Option<ObjectEntry> {
    let key = value.text_of("key")?.to_owned();
    Some(ObjectEntry {
        key,
        size: value
            .text_of("size")
            .and_then(|s| s.parse().ok())
            .unwrap_or(0),
        last_modified: value.text_of("lastmodified").and_then(parse_timestamp),
        etag: value.text_of("etag").map(sanitize_etag),
        storage_class: value.text_of("storageclass").map(ToOwned::to_owned),
    })
}

fn parse_upload_entry(value: &Value) -> Option<MultipartUploadEntry> {
    Some(MultipartUploadEntry {
        key: value.text_of("key")?.to_owned(),
        upload_id: value.text_of("uploadid")?.to_owned(),
        initiated: value.text_of("initiated").and_then(parse_timestamp),
    })
}

/// Parse an ISO 8601 / S3-style timestamp.
fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.fZ")
                .map(|ndt| ndt.and_utc())
                .ok()
        })
}

/// Parse an HTTP date header (IMF-fixdate or RFC 2822).
fn parse_http_date(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(s, "%a, %d %b %Y %H:%M:%S GMT")
        .map(|ndt| ndt.and_utc())
        .ok()
}
