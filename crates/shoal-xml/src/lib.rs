//! Minimal S3 XML decoding for Shoal.
//!
//! S3-compatible stores answer with small XML documents
//! (`ListBucketResult`, `InitiateMultipartUploadResult`, `Error`, ...).
//! Providers differ in namespaces, element order, and optional fields, so
//! rather than one typed deserializer per document this crate decodes any
//! well-formed response into a dynamic [`Value`] tree that callers walk by
//! (lower-cased) tag name.
//!
//! # Decoding rules
//!
//! - Element children are keyed by lower-cased tag name.
//! - Leaf text is XML-entity unescaped (`&quot; &apos; &lt; &gt; &amp;`).
//! - A self-closing or empty element decodes to boolean `true`.
//! - Repeated sibling tags are promoted to a list; tags named in the
//!   caller's always-list decode as a list even for a single occurrence, so
//!   single-result listings never need special-casing.
//! - A document with no markup at all decodes to its unescaped text.
//!
//! # Usage
//!
//! ```
//! use shoal_xml::{Value, decode};
//!
//! let xml = b"<ListBucketResult><Contents><Key>a.txt</Key></Contents></ListBucketResult>";
//! let doc = decode(xml, &["contents"]).unwrap();
//! let contents = doc
//!     .get("listbucketresult")
//!     .and_then(|r| r.get("contents"))
//!     .and_then(Value::as_list)
//!     .unwrap();
//! assert_eq!(contents.len(), 1);
//! ```

pub mod decode;
pub mod error;

pub use decode::{Value, decode};
pub use error::XmlError;
