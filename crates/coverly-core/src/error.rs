// ── Core error types ──
//
// Errors surfaced by coverly-core. Consumers see connection, validation,
// and controller failures rather than raw HTTP or JSON errors; the
// `From<coverly_api::Error>` impl does the translation.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to controller at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Controller request timed out")]
    Timeout,

    // ── Operation errors ─────────────────────────────────────────────
    #[error("Please provide a {field}.")]
    MissingField { field: &'static str },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("{message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    #[error("Unexpected reply from controller: {message}")]
    BadReply { message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// Whether retrying the same request could succeed: the controller was
    /// unreachable, slow, or answered with a 5xx.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::ConnectionFailed { .. } | Self::Timeout => true,
            Self::Api { status, .. } => status.is_some_and(|s| s >= 500),
            _ => false,
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<coverly_api::Error> for CoreError {
    fn from(err: coverly_api::Error) -> Self {
        match err {
            coverly_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            coverly_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            coverly_api::Error::UnsupportedScheme(url) => CoreError::Config {
                message: format!("Cannot derive a WebSocket URL from {url}"),
            },
            coverly_api::Error::Status { status, .. } => CoreError::Api {
                message: format!("HTTP error! status: {status}"),
                status: Some(status),
            },
            coverly_api::Error::WebSocketConnect(reason) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("WebSocket connection failed: {reason}"),
            },
            coverly_api::Error::WebSocketClosed { code, reason } => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("WebSocket closed (code {code}): {reason}"),
            },
            coverly_api::Error::Deserialization { message, body: _ } => {
                CoreError::BadReply { message }
            }
        }
    }
}
