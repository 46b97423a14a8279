use thiserror::Error;

/// Top-level error type for the `coverly-api` crate.
///
/// Covers every failure mode of the controller's HTTP API and its push
/// channel. `coverly-core` folds these into operator-facing outcomes.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The base URL cannot carry a WebSocket scheme (e.g. `data:` URLs).
    #[error("Cannot derive a WebSocket URL from {0}")]
    UnsupportedScheme(String),

    // ── API ─────────────────────────────────────────────────────────
    /// Non-success HTTP status from the controller.
    #[error("HTTP error! status: {status}")]
    Status { status: u16, body: String },

    // ── WebSocket ───────────────────────────────────────────────────
    /// WebSocket connection failed.
    #[error("WebSocket connection failed: {0}")]
    WebSocketConnect(String),

    /// WebSocket closed by the controller.
    #[error("WebSocket closed (code {code}): {reason}")]
    WebSocketClosed { code: u16, reason: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}
