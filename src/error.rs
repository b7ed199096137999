// Pipeline error kinds. None of these abort a run; the worker logs them and moves on.

use thiserror::Error;

/// Failure of a single outbound HTTP call (APM API or HEC).
#[derive(Debug, Error)]
pub enum HttpError {
    /// Server answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("request timed out")]
    Timeout,

    /// Connect, TLS, or body read failure.
    #[error("transport error: {0}")]
    Transport(String),
}

impl HttpError {
    /// HTTP status code, when the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            HttpError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for HttpError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            HttpError::Timeout
        } else {
            HttpError::Transport(err.to_string())
        }
    }
}

#[derive(Debug, Error)]
pub enum PipelineError {
    /// Discovery call failed or returned an unparsable document.
    #[error("monitor discovery unavailable: {0}")]
    DiscoveryUnavailable(String),

    #[error("fetch failed for resource {resource_id}: {source}")]
    MonitorFetchFailed {
        resource_id: String,
        #[source]
        source: HttpError,
    },

    /// Document is not well-formed XML.
    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    #[error("event delivery failed: {0}")]
    DeliveryFailed(#[from] HttpError),
}

impl From<roxmltree::Error> for PipelineError {
    fn from(err: roxmltree::Error) -> Self {
        PipelineError::MalformedPayload(err.to_string())
    }
}
