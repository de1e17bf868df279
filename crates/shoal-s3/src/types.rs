//! Typed results and request options.
//!
//! All of these are transient request/response values: the client keeps no
//! registry of uploads or listings across calls. An upload's `upload_id` is
//! the sole capability token for the session, owned by the caller.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

/// Metadata for a stored object, from a HEAD response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectMetadata {
    /// Object size in bytes.
    pub size: u64,
    /// Last modification time, when the store reports one.
    pub last_modified: Option<DateTime<Utc>>,
    /// Sanitized ETag, when the store reports one.
    pub etag: Option<String>,
}

/// One entry of an object listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectEntry {
    /// The object key.
    pub key: String,
    /// Object size in bytes.
    pub size: u64,
    /// Last modification time.
    pub last_modified: Option<DateTime<Utc>>,
    /// Sanitized ETag.
    pub etag: Option<String>,
    /// Storage class, when reported.
    pub storage_class: Option<String>,
}

/// An object body together with its sanitized ETag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectWithETag {
    /// Sanitized ETag, when the store reports one.
    pub etag: Option<String>,
    /// The object body as text.
    pub body: String,
}

/// A multipart upload session created by
/// [`create_multipart_upload`](crate::S3Client::create_multipart_upload).
///
/// The `upload_id` is opaque to this client and owned by the store; keep it
/// to upload parts and to complete or abort the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSession {
    /// The object key the session uploads to.
    pub key: String,
    /// The store-issued upload ID.
    pub upload_id: String,
}

/// One uploaded part, as required by
/// [`complete_multipart_upload`](crate::S3Client::complete_multipart_upload).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    /// Part number, 1-based.
    pub part_number: i32,
    /// Sanitized ETag returned by the part upload.
    pub etag: String,
}

/// One entry of an in-flight multipart upload listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartUploadEntry {
    /// The object key being uploaded.
    pub key: String,
    /// The store-issued upload ID.
    pub upload_id: String,
    /// When the upload was initiated.
    pub initiated: Option<DateTime<Utc>>,
}

/// The result of a completed multipart upload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletedUpload {
    /// Location URL reported by the store.
    pub location: Option<String>,
    /// Bucket name echoed by the store.
    pub bucket: Option<String>,
    /// The object key.
    pub key: Option<String>,
    /// Sanitized ETag of the assembled object.
    pub etag: Option<String>,
}

/// Conditional headers for read and existence operations.
///
/// Each populated field becomes the corresponding HTTP header
/// (`if-match`, `if-none-match`, `if-modified-since`,
/// `if-unmodified-since`) before the request is signed, so the condition is
/// always part of the signature.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetConditions {
    /// Succeed only if the stored ETag matches.
    pub if_match: Option<String>,
    /// Succeed only if the stored ETag does not match.
    pub if_none_match: Option<String>,
    /// Succeed only if the object changed after this instant.
    pub if_modified_since: Option<DateTime<Utc>>,
    /// Succeed only if the object is unchanged since this instant.
    pub if_unmodified_since: Option<DateTime<Utc>>,
}

impl GetConditions {
    /// Conditions requiring the stored ETag to match `etag`.
    #[must_use]
    pub fn if_match(etag: impl Into<String>) -> Self {
        Self {
            if_match: Some(etag.into()),
            ..Self::default()
        }
    }

    /// Conditions requiring the stored ETag to differ from `etag`.
    #[must_use]
    pub fn if_none_match(etag: impl Into<String>) -> Self {
        Self {
            if_none_match: Some(etag.into()),
            ..Self::default()
        }
    }

    /// Render the populated conditions into request headers.
    pub(crate) fn apply(&self, headers: &mut BTreeMap<String, String>) {
        if let Some(etag) = &self.if_match {
            headers.insert("if-match".to_owned(), quote_etag(etag));
        }
        if let Some(etag) = &self.if_none_match {
            headers.insert("if-none-match".to_owned(), quote_etag(etag));
        }
        if let Some(ts) = self.if_modified_since {
            headers.insert("if-modified-since".to_owned(), http_date(ts));
        }
        if let Some(ts) = self.if_unmodified_since {
            headers.insert("if-unmodified-since".to_owned(), http_date(ts));
        }
    }
}

/// Wrap a sanitized ETag back in the quotes conditional headers require.
///
/// Already-quoted and wildcard values pass through unchanged.
fn quote_etag(etag: &str) -> String {
    if etag == "*" || (etag.starts_with('"') && etag.ends_with('"') && etag.len() >= 2) {
        etag.to_owned()
    } else {
        format!("\"{etag}\"")
    }
}

/// Format a timestamp as an IMF-fixdate HTTP date.
fn http_date(ts: DateTime<Utc>) -> String {
    ts.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_should_render_etag_conditions_as_quoted_headers() {
        let mut headers = BTreeMap::new();
        GetConditions::if_match("abc").apply(&mut headers);
        assert_eq!(headers["if-match"], "\"abc\"");

        headers.clear();
        GetConditions::if_none_match("\"abc\"").apply(&mut headers);
        assert_eq!(headers["if-none-match"], "\"abc\"");
    }

    #[test]
    fn test_should_pass_wildcard_etag_through() {
        let mut headers = BTreeMap::new();
        GetConditions::if_none_match("*").apply(&mut headers);
        assert_eq!(headers["if-none-match"], "*");
    }

    #[test]
    fn test_should_render_date_conditions_as_http_dates() {
        let ts = Utc.with_ymd_and_hms(2026, 2, 3, 16, 45, 9).unwrap();
        let conditions = GetConditions {
            if_modified_since: Some(ts),
            ..GetConditions::default()
        };
        let mut headers = BTreeMap::new();
        conditions.apply(&mut headers);
        assert_eq!(headers["if-modified-since"], "Tue, 03 Feb 2026 16:45:09 GMT");
    }

    #[test]
    fn test_should_render_nothing_for_default_conditions() {
        let mut headers = BTreeMap::new();
        GetConditions::default().apply(&mut headers);
        assert!(headers.is_empty());
    }
}
