use thiserror::Error;

/// Top-level error type for the `enerctl-api` crate.
///
/// Covers transport failures, non-2xx responses from the backend, and
/// bodies that do not decode. `enerctl-core` maps these into the status
/// channel shown to the operator.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Item id that cannot be addressed as a single path segment.
    #[error("Invalid item id: {0:?}")]
    InvalidId(String),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Backend ─────────────────────────────────────────────────────
    /// Non-2xx response. `message` is the human-readable text from the
    /// error body, when the backend supplied one.
    #[error("API error (HTTP {status}): {}", message.as_deref().unwrap_or("no message"))]
    Api {
        status: u16,
        message: Option<String>,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// The backend-supplied error message, if the response carried one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Api { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// HTTP status of a backend rejection.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Returns `true` if the request never got a usable answer
    /// (connect failure or timeout).
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }

    /// Returns `true` if the request ran out of time.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_timeout())
    }
}

#[cfg(test)]
mod tests {
    use super::Error;

    #[test]
    fn server_message_only_for_api_errors() {
        let err = Error::Api {
            status: 400,
            message: Some("email already registered".into()),
        };
        assert_eq!(err.server_message(), Some("email already registered"));
        assert_eq!(err.status(), Some(400));

        let err = Error::Tls("bad cert".into());
        assert_eq!(err.server_message(), None);
        assert_eq!(err.status(), None);
    }

    #[test]
    fn api_error_display_without_message() {
        let err = Error::Api {
            status: 500,
            message: None,
        };
        assert_eq!(err.to_string(), "API error (HTTP 500): no message");
    }

    #[test]
    fn not_found_detection() {
        let err = Error::Api {
            status: 404,
            message: None,
        };
        assert!(err.is_not_found());
        assert!(!err.is_transient());
    }
}
