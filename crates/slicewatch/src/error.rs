//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` variants into user-facing errors with actionable
//! help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use slicewatch_core::CoreError;

/// Exit codes emitted by the binary.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    #[error("Could not reach the slice manager at {url}")]
    #[diagnostic(
        code(slicewatch::connection_failed),
        help(
            "Check that the slice manager is running and accessible.\n\
             URL: {url}\n\
             Try: slicewatch ping --insecure"
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: slicewatch_core::CoreError,
    },

    #[error("{resource} not found")]
    #[diagnostic(
        code(slicewatch::not_found),
        help("Run: slicewatch slices list to see what exists")
    )]
    NotFound { resource: String },

    #[error("Invalid {field}: {reason}")]
    #[diagnostic(code(slicewatch::validation))]
    Validation { field: String, reason: String },

    #[error("No slice manager configured")]
    #[diagnostic(
        code(slicewatch::no_server),
        help(
            "Pass --server <url>, set SLICEWATCH_SERVER, or add `server = \"...\"`\n\
             to {config_path}"
        )
    )]
    NoServer { config_path: String },

    #[error(transparent)]
    #[diagnostic(code(slicewatch::engine))]
    Core(CoreError),
}

impl CliError {
    /// Map a `CoreError` into the most specific CLI error for `url`.
    pub fn from_core(err: CoreError, url: &url::Url) -> Self {
        match err {
            CoreError::Gateway(slicewatch_api_error) => match slicewatch_api_error {
                slicewatch_core::GatewayError::NotFound { resource } => {
                    Self::NotFound { resource }
                }
                slicewatch_core::GatewayError::Transport(_)
                | slicewatch_core::GatewayError::Tls(_) => Self::ConnectionFailed {
                    url: url.to_string(),
                    source: CoreError::Gateway(slicewatch_api_error),
                },
                other => Self::Core(CoreError::Gateway(other)),
            },
            CoreError::Validation { message } => Self::Validation {
                field: "request".into(),
                reason: message,
            },
            other => Self::Core(other),
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } | Self::NoServer { .. } => exit_code::USAGE,
            Self::Core(_) => exit_code::GENERAL,
        }
    }
}
