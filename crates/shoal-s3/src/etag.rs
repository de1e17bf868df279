//! ETag normalization.
//!
//! Stores return ETags wrapped in double quotes (`"abc"`), and values that
//! have passed through an XML or HTML layer may carry the entity-encoded
//! form instead (`&quot;abc&quot;`, `&#34;abc&#34;`). Comparison and
//! conditional headers want the bare token.

/// Quote encodings stripped from the ends of an ETag value.
const QUOTE_ENCODINGS: [&str; 3] = ["\"", "&quot;", "&#34;"];

/// Strip a single pair of surrounding quotes (or their HTML-entity
/// encodings) from an ETag value.
///
/// Idempotent: sanitizing an already-sanitized value is a no-op.
///
/// # Examples
///
/// ```
/// use shoal_s3::sanitize_etag;
///
/// assert_eq!(sanitize_etag("\"abc\""), "abc");
/// assert_eq!(sanitize_etag("&quot;abc&quot;"), "abc");
/// assert_eq!(sanitize_etag("abc"), "abc");
/// ```
#[must_use]
pub fn sanitize_etag(etag: &str) -> String {
    for quote in QUOTE_ENCODINGS {
        if etag.len() >= 2 * quote.len() && etag.starts_with(quote) && etag.ends_with(quote) {
            return etag[quote.len()..etag.len() - quote.len()].to_owned();
        }
    }
    etag.to_owned()
}
