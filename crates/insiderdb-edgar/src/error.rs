use thiserror::Error;

/// Errors returned by the EDGAR client and parsers.
#[derive(Debug, Error)]
pub enum EdgarError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// HTTP 429; EDGAR has asked us to back off.
    #[error("rate limited by EDGAR (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    /// HTTP 404; retrying would return the same result.
    #[error("endpoint not found: {url}")]
    NotFound { url: String },

    /// Any other non-2xx status.
    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// Malformed XML in the Atom feed or a Form 4 body.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Fatal client misconfiguration — a run must not start with this.
    #[error("configuration error: {0}")]
    Config(String),
}
