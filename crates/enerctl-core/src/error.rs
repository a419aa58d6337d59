// ── Core error types ──
//
// User-facing errors from enerctl-core. Consumers never match on HTTP
// plumbing directly: the `From<enerctl_api::Error>` impl folds transport
// failures into domain variants and keeps the backend's message, when it
// sent one, for the status line.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to backend at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Backend request timed out")]
    Timeout,

    // ── Data errors ──────────────────────────────────────────────────
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: String,
        identifier: String,
    },

    #[error("Unexpected response from backend: {message}")]
    InvalidResponse { message: String },

    // ── Operation errors ─────────────────────────────────────────────
    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    #[error("Unknown field for {entity_type}: {field}")]
    UnknownField { entity_type: String, field: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error (HTTP {status}): {}", message.as_deref().unwrap_or("no message"))]
    Api {
        status: u16,
        /// Human-readable message from the backend's error body.
        message: Option<String>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Coarse classification, kept on status messages so callers can pick
/// an exit path without holding the error itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Connection,
    Timeout,
    NotFound,
    /// The backend answered with a non-2xx status.
    Rejected,
    InvalidResponse,
    Validation,
    Config,
    Internal,
}

impl CoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ConnectionFailed { .. } => ErrorKind::Connection,
            Self::Timeout => ErrorKind::Timeout,
            Self::NotFound { .. } | Self::Api { status: 404, .. } => ErrorKind::NotFound,
            Self::Api { .. } => ErrorKind::Rejected,
            Self::InvalidResponse { .. } => ErrorKind::InvalidResponse,
            Self::ValidationFailed { .. } | Self::UnknownField { .. } => ErrorKind::Validation,
            Self::Config { .. } => ErrorKind::Config,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// The message the backend attached to a rejection, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Api { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// Text for the operator-facing status line: the backend's own
    /// message when present, otherwise `fallback`.
    pub fn status_text(&self, fallback: &str) -> String {
        self.server_message()
            .map_or_else(|| fallback.to_owned(), ToOwned::to_owned)
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<enerctl_api::Error> for CoreError {
    fn from(err: enerctl_api::Error) -> Self {
        match err {
            enerctl_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map(ToString::to_string)
                            .unwrap_or_else(|| "<unknown>".into()),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        status: e.status().map_or(0, |s| s.as_u16()),
                        message: None,
                    }
                }
            }
            enerctl_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("invalid backend URL: {e}"),
            },
            enerctl_api::Error::InvalidId(id) => CoreError::ValidationFailed {
                message: format!("'{id}' is not a usable id"),
            },
            enerctl_api::Error::Tls(message) => CoreError::Config {
                message: format!("TLS setup failed: {message}"),
            },
            enerctl_api::Error::Api { status, message } => CoreError::Api { status, message },
            enerctl_api::Error::Deserialization { message, .. } => {
                CoreError::InvalidResponse { message }
            }
        }
    }
}
