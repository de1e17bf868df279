//! HTTP transport: executes signed requests and classifies responses.
//!
//! Every network call in the crate goes through [`Transport::send`]. The
//! caller names the statuses it treats as valid outcomes (e.g. 404 on an
//! existence check); anything else outside 2xx is turned into
//! [`S3ClientError::Protocol`] carrying the status, the provider's
//! `x-amz-error-code` / `x-amz-error-message` headers, and the full body.

use std::time::Duration;

use bytes::Bytes;
use reqwest::{Method, Response, StatusCode};
use shoal_sigv4::SignedRequest;
use tracing::{debug, warn};

use crate::error::{S3ClientError, S3Result};

#[derive(Debug, Clone)]
pub(crate) struct Transport {
    http: reqwest::Client,
    timeout: Option<Duration>,
}

impl Transport {
    pub(crate) fn new(timeout: Option<Duration>) -> Self {
        Self {
            http: reqwest::Client::new(),
            timeout,
        }
    }

    /// Execute a signed request.
    ///
    /// GET and HEAD requests never carry a body. A non-2xx status that is
    /// not in `tolerated` reads the response body for diagnostics and
    /// raises [`S3ClientError::Protocol`]; network failures surface as
    /// [`S3ClientError::Transport`]. The optional abort timeout cancels
    /// only this call.
    pub(crate) async fn send(
        &self,
        method: Method,
        signed: &SignedRequest,
        body: Option<Bytes>,
        tolerated: &[StatusCode],
    ) -> S3Result<Response> {
        let mut request = self.http.request(method.clone(), &signed.url);
        for (name, value) in &signed.headers {
            request = request.header(name.as_str(), value.as_str());
        }
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }
        if method != Method::GET && method != Method::HEAD {
            if let Some(body) = body {
                request = request.body(body);
            }
        }

        debug!(%method, url = %signed.url, "sending request");
        let response = request.send().await?;
        let status = response.status();

        if status.is_success() || tolerated.contains(&status) {
            debug!(%method, url = %signed.url, status = status.as_u16(), "request complete");
            return Ok(response);
        }

        let code = header_value(&response, "x-amz-error-code");
        let message = header_value(&response, "x-amz-error-message");
        let body = response.text().await.unwrap_or_default();

        warn!(
            %method,
            url = %signed.url,
            status = status.as_u16(),
            code = code.as_deref().unwrap_or("-"),
            "request failed"
        );

        Err(S3ClientError::Protocol {
            status: status.as_u16(),
            code,
            message,
            body,
        })
    }
}

fn header_value(response: &Response, name: &str) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToOwned::to_owned)
}
