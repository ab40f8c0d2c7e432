use miette::Diagnostic;
use reqwest::StatusCode;
use thiserror::Error;

/// Exit code for a successful run
pub const EXIT_OK: u8 = 0;
/// Exit code when the webhook rejects the digest or cannot be reached
pub const EXIT_DELIVERY: u8 = 1;
/// Exit code for missing or invalid configuration
pub const EXIT_CONFIG: u8 = 2;
/// Exit code when the calendar producer fails or emits unusable output
pub const EXIT_SOURCE: u8 = 3;

/// Main error type for the application
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Environment error: {0}")]
    #[diagnostic(
        code(calendar_digest::environment),
        help("set the variable in the environment or in the .env file")
    )]
    Environment(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(calendar_digest::config))]
    Config(String),

    #[error("Calendar source error: {0}")]
    #[diagnostic(code(calendar_digest::source))]
    Source(String),

    #[error("Webhook failed: HTTP {}", .status.as_u16())]
    #[diagnostic(code(calendar_digest::webhook))]
    WebhookStatus { status: StatusCode, body: String },

    #[error("Webhook request failed: {0}")]
    #[diagnostic(code(calendar_digest::webhook_request))]
    WebhookRequest(#[from] reqwest::Error),

    #[error("Other error: {0}")]
    #[diagnostic(code(calendar_digest::other))]
    Other(String),
}

impl Error {
    /// Process exit code for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::Environment(_) | Error::Config(_) => EXIT_CONFIG,
            Error::Source(_) => EXIT_SOURCE,
            Error::WebhookStatus { .. } | Error::WebhookRequest(_) => EXIT_DELIVERY,
            Error::Other(_) => EXIT_DELIVERY,
        }
    }
}

/// Type alias for Result with our Error type
pub type DigestResult<T> = Result<T, Error>;

/// Helper to create environment errors
pub fn env_error(var: &str) -> Error {
    Error::Environment(format!("Missing environment variable: {}", var))
}

/// Helper to create configuration errors
pub fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}

/// Helper to create calendar source errors
pub fn source_error(message: &str) -> Error {
    Error::Source(message.to_string())
}

/// Helper to create other errors
pub fn other_error(message: &str) -> Error {
    Error::Other(message.to_string())
}
