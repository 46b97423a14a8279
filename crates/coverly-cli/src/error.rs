//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use coverly_config::ConfigError;
use coverly_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const UNAVAILABLE: i32 = 5;
    pub const REJECTED: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to controller at {url}")]
    #[diagnostic(
        code(coverly::connection_failed),
        help(
            "Check that the controller is powered and reachable.\n\
             Reason: {reason}"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out")]
    #[diagnostic(
        code(coverly::timeout),
        help("Increase timeout with --timeout or check controller responsiveness.")
    )]
    Timeout,

    // ── Controller ───────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(code(coverly::rejected))]
    Rejected { message: String },

    #[error("{message}")]
    #[diagnostic(
        code(coverly::unavailable),
        help("The controller failed to handle the request. Retrying shortly may succeed.")
    )]
    Unavailable { message: String },

    #[error("{message}")]
    #[diagnostic(code(coverly::api_error))]
    ApiError {
        message: String,
        status: Option<u16>,
    },

    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(coverly::not_found),
        help("Run: coverly {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(coverly::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(coverly::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: coverly config init --controller <URL> --name {name}"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No controller configured")]
    #[diagnostic(
        code(coverly::no_config),
        help(
            "Pass --url, or create a profile with: coverly config init --controller <URL>\n\
             Expected at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(coverly::config))]
    Config(Box<ConfigError>),

    // ── IO / Serialization ────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(coverly::json), help("Check the JSON file contents and try again."))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::NotFound { .. } | Self::ApiError { status: Some(404), .. } => {
                exit_code::NOT_FOUND
            }
            Self::Rejected { .. } => exit_code::REJECTED,
            Self::Unavailable { .. } => exit_code::UNAVAILABLE,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => {
                CliError::ConnectionFailed { url, reason }
            }

            CoreError::Timeout => CliError::Timeout,

            err @ CoreError::MissingField { .. } => CliError::Validation {
                field: "input".into(),
                reason: err.to_string(),
            },

            err @ CoreError::Api { .. } if err.is_transient() => CliError::Unavailable {
                message: err.to_string(),
            },

            CoreError::Api { message, status } => CliError::ApiError { message, status },

            CoreError::BadReply { message } => CliError::ApiError {
                message: format!("Unexpected reply from controller: {message}"),
                status: None,
            },

            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },
        }
    }
}

impl From<coverly_api::Error> for CliError {
    fn from(err: coverly_api::Error) -> Self {
        CoreError::from(err).into()
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            other => CliError::Config(Box::new(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_status_keeps_panel_wording() {
        let err = CliError::from(coverly_api::Error::Status {
            status: 404,
            body: String::new(),
        });
        assert_eq!(err.to_string(), "HTTP error! status: 404");
        assert_eq!(err.exit_code(), exit_code::NOT_FOUND);
    }

    #[test]
    fn server_errors_suggest_retrying() {
        let err = CliError::from(coverly_api::Error::Status {
            status: 502,
            body: "Bad Gateway".into(),
        });
        assert!(matches!(err, CliError::Unavailable { .. }));
        assert_eq!(err.to_string(), "HTTP error! status: 502");
        assert_eq!(err.exit_code(), exit_code::UNAVAILABLE);
    }

    #[test]
    fn exit_codes_by_category() {
        assert_eq!(CliError::Timeout.exit_code(), exit_code::TIMEOUT);
        assert_eq!(
            CliError::Rejected {
                message: "Device is paired".into()
            }
            .exit_code(),
            exit_code::REJECTED
        );
        let missing = CliError::from(CoreError::MissingField { field: "device ID" });
        assert_eq!(missing.exit_code(), exit_code::USAGE);
        assert_eq!(
            CliError::from(ConfigError::NoProfile).exit_code(),
            exit_code::GENERAL
        );
    }
}
