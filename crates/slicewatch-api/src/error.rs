use thiserror::Error;

/// Top-level error type for the `slicewatch-api` crate.
///
/// Covers transport failures, structured API errors, and payload
/// decoding problems. `slicewatch-core` maps these into its own
/// error taxonomy (transient vs. mutation failure).
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout).
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The base URL cannot host path segments.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── API ─────────────────────────────────────────────────────────
    /// The requested resource does not exist on the remote.
    #[error("Not found: {resource}")]
    NotFound { resource: String },

    /// Structured error from the slice manager (non-2xx status).
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Whether this error is plausibly transient (worth waiting for the
    /// next poll tick rather than treating the session as broken).
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }
}
