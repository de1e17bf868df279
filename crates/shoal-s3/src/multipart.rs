//! Multipart upload lifecycle.
//!
//! `Initiated -> Uploading -> Completed` (or `Aborted`). The client keeps
//! no session registry: the store-issued `upload_id` is the only state, and
//! it lives with the caller. Parts may be uploaded in any order and
//! concurrently - each call is self-contained - and the completion body
//! always serializes parts in ascending part-number order, since the
//! protocol rejects out-of-order completion.
//!
//! No step retries on failure; retry policy belongs to the caller.

use std::collections::BTreeMap;
use std::io;

use bytes::Bytes;
use quick_xml::Writer;
use quick_xml::events::BytesText;
use reqwest::Method;
use shoal_xml::{XmlError, decode};
use tracing::debug;

use crate::client::{ALWAYS_LIST, S3Client, fail_on_error_document, header_value, require_key};
use crate::error::{S3ClientError, S3Result};
use crate::etag::sanitize_etag;
use crate::types::{CompletedUpload, Part, UploadSession};

impl S3Client {
    /// Start a multipart upload for `key`.
    ///
    /// # Errors
    ///
    /// Fails with [`S3ClientError::Protocol`] if the store answers with an
    /// XML `Error` document, or [`S3ClientError::Xml`] if the response
    /// carries no upload ID.
    pub async fn create_multipart_upload(
        &self,
        key: &str,
        content_type: Option<&str>,
    ) -> S3Result<UploadSession> {
        require_key(key)?;

        let mut headers = BTreeMap::new();
        if let Some(content_type) = content_type {
            headers.insert("content-type".to_owned(), content_type.to_owned());
        }
        let query = [("uploads".to_owned(), String::new())];

        let signed = self
            .signer
            .sign(Method::POST.as_str(), key, &query, &headers, b"");
        let response = self.transport.send(Method::POST, &signed, None, &[]).await?;
        let status = response.status();
        let body = response.text().await?;

        let doc = decode(body.as_bytes(), ALWAYS_LIST)?;
        fail_on_error_document(&doc, status, &body)?;

        let upload_id = doc
            .get("initiatemultipartuploadresult")
            .and_then(|result| result.text_of("uploadid"))
            .ok_or_else(|| {
                XmlError::MissingElement("InitiateMultipartUploadResult.UploadId".to_owned())
            })?;

        debug!(key, upload_id, "multipart upload initiated");
        Ok(UploadSession {
            key: key.to_owned(),
            upload_id: upload_id.to_owned(),
        })
    }

    /// Upload one part of a multipart upload.
    ///
    /// `part_number` is 1-based (the protocol allows 1..=10000). Distinct
    /// part numbers may be uploaded concurrently. Returns the part's
    /// sanitized ETag, as needed by
    /// [`complete_multipart_upload`](Self::complete_multipart_upload).
    pub async fn upload_part(
        &self,
        key: &str,
        data: impl Into<Bytes>,
        upload_id: &str,
        part_number: i32,
    ) -> S3Result<Part> {
        require_key(key)?;
        require_upload_id(upload_id)?;
        if part_number < 1 {
            return Err(S3ClientError::validation(format!(
                "part_number must be a positive integer (got {part_number})"
            )));
        }
        let data = data.into();
        if data.is_empty() {
            return Err(S3ClientError::validation("part data must not be empty"));
        }

        let query = [
            ("partNumber".to_owned(), part_number.to_string()),
            ("uploadId".to_owned(), upload_id.to_owned()),
        ];
        let mut headers = BTreeMap::new();
        headers.insert("content-length".to_owned(), data.len().to_string());

        let signed = self
            .signer
            .sign(Method::PUT.as_str(), key, &query, &headers, &data);
        let response = self
            .transport
            .send(Method::PUT, &signed, Some(data), &[])
            .await?;

        let etag = header_value(&response, "etag").ok_or_else(|| S3ClientError::Protocol {
            status: response.status().as_u16(),
            code: None,
            message: Some("part upload response did not include an ETag header".to_owned()),
            body: String::new(),
        })?;

        debug!(key, upload_id, part_number, "part uploaded");
        Ok(Part {
            part_number,
            etag: sanitize_etag(&etag),
        })
    }

    /// Complete a multipart upload from its uploaded parts.
    ///
    /// `parts` may arrive in any order; the completion body serializes them
    /// ascending by part number. Every entry needs a positive part number
    /// and a non-empty ETag.
    pub async fn complete_multipart_upload(
        &self,
        key: &str,
        upload_id: &str,
        parts: &[Part],
    ) -> S3Result<CompletedUpload> {
        require_key(key)?;
        require_upload_id(upload_id)?;
        if parts.is_empty() {
            return Err(S3ClientError::validation("parts must not be empty"));
        }
        for part in parts {
            if part.part_number < 1 {
                return Err(S3ClientError::validation(format!(
                    "part_number must be a positive integer (got {})",
                    part.part_number
                )));
            }
            if part.etag.is_empty() {
                return Err(S3ClientError::validation(format!(
                    "part {} has an empty ETag",
                    part.part_number
                )));
            }
        }

        let payload = completion_body(parts);
        let query = [("uploadId".to_owned(), upload_id.to_owned())];
        let mut headers = BTreeMap::new();
        headers.insert("content-type".to_owned(), "application/xml".to_owned());
        headers.insert("content-length".to_owned(), payload.len().to_string());

        let signed = self
            .signer
            .sign(Method::POST.as_str(), key, &query, &headers, &payload);
        let response = self
            .transport
            .send(Method::POST, &signed, Some(Bytes::from(payload)), &[])
            .await?;
        let status = response.status();
        let body = response.text().await?;

        let doc = decode(body.as_bytes(), ALWAYS_LIST)?;
        fail_on_error_document(&doc, status, &body)?;

        let result = doc.get("completemultipartuploadresult").ok_or_else(|| {
            XmlError::MissingElement("CompleteMultipartUploadResult".to_owned())
        })?;

        debug!(key, upload_id, parts = parts.len(), "multipart upload completed");
        Ok(CompletedUpload {
            location: result.text_of("location").map(ToOwned::to_owned),
            bucket: result.text_of("bucket").map(ToOwned::to_owned),
            key: result.text_of("key").map(ToOwned::to_owned),
            etag: result.text_of("etag").map(sanitize_etag),
        })
    }

    /// Abort a multipart upload, discarding its uploaded parts.
    ///
    /// Best-effort cleanup: aborting an already-aborted or unknown session
    /// either succeeds or raises a [`S3ClientError::Protocol`] the caller
    /// may ignore.
    pub async fn abort_multipart_upload(&self, key: &str, upload_id: &str) -> S3Result<()> {
        require_key(key)?;
        require_upload_id(upload_id)?;

        let query = [("uploadId".to_owned(), upload_id.to_owned())];
        let signed = self
            .signer
            .sign(Method::DELETE.as_str(), key, &query, &BTreeMap::new(), b"");
        self.transport
            .send(Method::DELETE, &signed, None, &[])
            .await?;

        debug!(key, upload_id, "multipart upload aborted");
        Ok(())
    }
}

fn require_upload_id(upload_id: &str) -> S3Result<()> {
    if upload_id.is_empty() {
        return Err(S3ClientError::validation("upload_id must not be empty"));
    }
    Ok(())
}

/// Serialize the `CompleteMultipartUpload` body, parts in ascending
/// part-number order.
fn completion_body(parts: &[Part]) -> Vec<u8> {
    let mut ordered: Vec<&Part> = parts.iter().collect();
    ordered.sort_by_key(|part| part.part_number);

    let mut buf = Vec::with_capacity(64 + 96 * ordered.len());
    // Writing to a Vec cannot fail; a logic error here would surface as an
    // empty body the store rejects.
    if let Err(e) = write_completion_xml(&mut buf, &ordered) {
        tracing::error!(error = %e, "failed to serialize completion body");
        buf.clear();
    }
    buf
}

fn write_completion_xml(buf: &mut Vec<u8>, parts: &[&Part]) -> io::Result<()> {
    let mut writer = Writer::new(buf);

    writer
        .create_element("CompleteMultipartUpload")
        .write_inner_content(|w| {
            for part in parts {
                w.create_element("Part").write_inner_content(|w| {
                    w.create_element("PartNumber")
                        .write_text_content(BytesText::new(&part.part_number.to_string()))?;
                    w.create_element("ETag")
                        .write_text_content(BytesText::new(&part.etag))?;
                    Ok(())
                })?;
            }
            Ok(())
        })?;

    Ok(())
}

/// Decode an initiate-response body; exposed for tests.
#[cfg(test)]
fn decode_upload_id(body: &str) -> Option<String> {
    let doc = decode(body.as_bytes(), ALWAYS_LIST).ok()?;
    doc.get("initiatemultipartuploadresult")
        .and_then(|result| result.text_of("uploadid"))
        .map(ToOwned::to_owned)
}
