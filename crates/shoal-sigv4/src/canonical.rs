//! Canonical request construction for AWS Signature Version 4.
//!
//! This module implements the canonical request format as specified by AWS:
//!
//! ```text
//! HTTPRequestMethod\n
//! CanonicalURI\n
//! CanonicalQueryString\n
//! CanonicalHeaders\n\n
//! SignedHeaders\n
//! HashedPayload
//! ```
//!
//! Each component is normalized so that signing is deterministic. Unlike a
//! server, which must re-sign whatever encoding the client used, a client is
//! the authority over encoding: query parameters are strictly RFC 3986
//! percent-encoded here (also encoding `!`, `'`, `(`, `)`, and `*`, which
//! looser encoders leave raw) and sorted by key before signing.

use std::collections::BTreeMap;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// The set of characters percent-encoded in URI path segments.
///
/// Per the SigV4 spec, everything except the RFC 3986 unreserved characters
/// (A-Z, a-z, 0-9, `-`, `_`, `.`, `~`) is encoded. Forward slashes in the
/// path are preserved by encoding segment-wise.
const URI_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Build the full canonical request string from its components.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
/// use shoal_sigv4::canonical::build_canonical_request;
///
/// let mut headers = BTreeMap::new();
/// headers.insert("host".to_owned(), "examplebucket.s3.amazonaws.com".to_owned());
/// let canonical = build_canonical_request(
///     "GET",
///     "/test.txt",
///     "",
///     &headers,
///     "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855",
/// );
/// assert!(canonical.starts_with("GET\n/test.txt\n"));
/// ```
#[must_use]
pub fn build_canonical_request(
    method: &str,
    canonical_uri: &str,
    canonical_query: &str,
    headers: &BTreeMap<String, String>,
    payload_hash: &str,
) -> String {
    let canonical_headers = build_canonical_headers(headers);
    let signed_headers = build_signed_headers_string(headers);

    format!(
        "{method}\n{canonical_uri}\n{canonical_query}\n{canonical_headers}\n\n{signed_headers}\n{payload_hash}"
    )
}

/// Build the canonical URI by percent-encoding each path segment.
///
/// Forward slashes (`/`) are preserved; empty paths normalize to `/`. The
/// same string is used both as the signed canonical URI and as the path of
/// the request URL, so the two can never disagree.
///
/// # Examples
///
/// ```
/// use shoal_sigv4::canonical::build_canonical_uri;
///
/// assert_eq!(build_canonical_uri("/test.txt"), "/test.txt");
/// assert_eq!(build_canonical_uri("/hello world"), "/hello%20world");
/// assert_eq!(build_canonical_uri(""), "/");
/// ```
#[must_use]
pub fn build_canonical_uri(path: &str) -> String {
    if path.is_empty() || path == "/" {
        return "/".to_owned();
    }

    path.split('/')
        .map(uri_encode)
        .collect::<Vec<_>>()
        .join("/")
}

/// Build the canonical query string from raw key/value pairs.
///
/// Both keys and values are strictly percent-encoded, pairs are sorted by
/// encoded key (then value, for duplicate keys), and joined with `&`. An
/// empty parameter list yields an empty string, not `"?"`.
///
/// # Examples
///
/// ```
/// use shoal_sigv4::canonical::build_canonical_query_string;
///
/// let params = [
///     ("prefix".to_owned(), "a b".to_owned()),
///     ("list-type".to_owned(), "2".to_owned()),
/// ];
/// assert_eq!(
///     build_canonical_query_string(&params),
///     "list-type=2&prefix=a%20b"
/// );
/// assert_eq!(build_canonical_query_string(&[]), "");
/// ```
#[must_use]
pub fn build_canonical_query_string(params: &[(String, String)]) -> String {
    if params.is_empty() {
        return String::new();
    }

    let mut encoded: Vec<(String, String)> = params
        .iter()
        .map(|(k, v)| (uri_encode(k), uri_encode(v)))
        .collect();

    encoded.sort_unstable();

    encoded
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

/// Build the canonical headers string.
///
/// Header names must already be lowercase (the signer guarantees this);
/// values are trimmed and internal whitespace runs collapse to a single
/// space. The `BTreeMap` keeps the lines sorted by name. The result has no
/// trailing newline; the canonical request format adds the separating blank
/// line.
#[must_use]
pub fn build_canonical_headers(headers: &BTreeMap<String, String>) -> String {
    headers
        .iter()
        .map(|(name, value)| format!("{name}:{}", collapse_whitespace(value.trim())))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Build the signed headers list: lowercase names, sorted, `;`-joined.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
/// use shoal_sigv4::canonical::build_signed_headers_string;
///
/// let mut headers = BTreeMap::new();
/// headers.insert("x-amz-date".to_owned(), "20130524T000000Z".to_owned());
/// headers.insert("host".to_owned(), "example.com".to_owned());
/// assert_eq!(build_signed_headers_string(&headers), "host;x-amz-date");
/// ```
#[must_use]
pub fn build_signed_headers_string(headers: &BTreeMap<String, String>) -> String {
    headers.keys().cloned().collect::<Vec<_>>().join(";")
}

/// Percent-encode a single path segment or query component with the strict
/// SigV4 character set.
#[must_use]
pub fn uri_encode(input: &str) -> String {
    utf8_percent_encode(input, URI_ENCODE_SET).to_string()
}

/// Collapse consecutive whitespace characters in a string to a single space.
fn collapse_whitespace(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut prev_was_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_was_space {
                result.push(' ');
                prev_was_space = true;
            }
        } else {
            result.push(ch);
            prev_was_space = false;
        }
    }
    result
}
