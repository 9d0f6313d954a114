use thiserror::Error;

/// Error type for the synchronization engine.
///
/// Transient fetch failures never surface here — the poll loops absorb
/// them and wait for the next tick. What does surface is everything a
/// caller must react to: rejected mutations, client-side validation,
/// and a torn-down engine.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A gateway call failed (transport, API, or decode error).
    #[error(transparent)]
    Gateway(#[from] slicewatch_api::Error),

    /// Client-side validation rejected the request before it reached
    /// the network.
    #[error("Validation failed: {message}")]
    Validation { message: String },

    /// The dashboard session has been shut down; no commands can run.
    #[error("Dashboard engine is stopped")]
    EngineStopped,
}

impl CoreError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}
