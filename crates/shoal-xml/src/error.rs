//! XML decoding error types.

/// Errors that can occur while decoding an S3 XML response.
#[derive(Debug, thiserror::Error)]
pub enum XmlError {
    /// An error from the underlying quick-xml reader.
    #[error("XML processing error: {0}")]
    QuickXml(#[from] quick_xml::Error),

    /// The document ended inside an open element.
    #[error("unexpected EOF inside element <{0}>")]
    UnexpectedEof(String),

    /// A required element was missing from the document.
    #[error("missing required XML element: {0}")]
    MissingElement(String),

    /// An error decoding or unescaping element text.
    #[error("failed to decode XML text: {0}")]
    Text(String),
}
