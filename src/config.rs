use crate::error::{config_error, env_error, DigestResult};
use crate::utils::time::ReferenceZone;
use chrono_tz::Tz;
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Variable holding the webhook URL
pub const WEBHOOK_URL_VAR: &str = "DISCORD_WEBHOOK_URL";
/// Variable holding an optional webhook display name
pub const WEBHOOK_USERNAME_VAR: &str = "DISCORD_WEBHOOK_USERNAME";
/// Variable naming the calendar producer executable
pub const CALENDAR_COMMAND_VAR: &str = "CALENDAR_COMMAND";
/// Variable bounding the calendar producer's run time, in seconds
pub const CALENDAR_TIMEOUT_VAR: &str = "CALENDAR_TIMEOUT_SECS";
/// Variable naming the reference timezone
pub const TIMEZONE_VAR: &str = "DIGEST_TIMEZONE";
/// Variable naming the label printed after the time range
pub const TIMEZONE_LABEL_VAR: &str = "DIGEST_TIMEZONE_LABEL";
/// Variable pointing at an explicit env file
pub const ENV_FILE_VAR: &str = "DIGEST_ENV_FILE";

/// Default calendar producer, relative to the working directory
pub const DEFAULT_CALENDAR_COMMAND: &str = "./build/calendar";
/// Default bound on the calendar producer's run time
pub const DEFAULT_CALENDAR_TIMEOUT_SECS: u64 = 60;

/// Where and how the digest is posted
#[derive(Clone)]
pub struct WebhookConfig {
    /// Webhook endpoint, including its secret token
    pub url: Url,
    /// Display name override for the posted message
    pub username: Option<String>,
}

impl fmt::Debug for WebhookConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The path carries the webhook token
        let redacted = format!("{}/[redacted]", self.url.origin().ascii_serialization());
        f.debug_struct("WebhookConfig")
            .field("url", &redacted)
            .field("username", &self.username)
            .finish()
    }
}

/// Configuration for a single digest run
#[derive(Debug, Clone)]
pub struct Config {
    /// Webhook target
    pub webhook: WebhookConfig,
    /// Executable that prints the day's events as JSON
    pub calendar_command: PathBuf,
    /// Upper bound on how long the calendar producer may run
    pub calendar_timeout: Duration,
    /// Zone used to render event times
    pub zone: ReferenceZone,
}

impl Config {
    /// Load configuration from the env file and the process environment
    pub fn load() -> DigestResult<Self> {
        load_env_file()?;
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> DigestResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        // Required
        let raw_url = value(WEBHOOK_URL_VAR).ok_or_else(|| env_error(WEBHOOK_URL_VAR))?;
        let url = parse_webhook_url(&raw_url)?;

        let username = value(WEBHOOK_USERNAME_VAR);

        let calendar_command = value(CALENDAR_COMMAND_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CALENDAR_COMMAND));

        let calendar_timeout = match value(CALENDAR_TIMEOUT_VAR) {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(config_error(&format!(
                        "Invalid {} value '{}': expected a positive number of seconds",
                        CALENDAR_TIMEOUT_VAR, raw
                    )))
                }
            },
            None => Duration::from_secs(DEFAULT_CALENDAR_TIMEOUT_SECS),
        };

        let mut zone = ReferenceZone::default();
        if let Some(name) = value(TIMEZONE_VAR) {
            zone.tz = name.parse::<Tz>().map_err(|_| {
                config_error(&format!("Invalid {} value '{}'", TIMEZONE_VAR, name))
            })?;
        }
        if let Some(label) = value(TIMEZONE_LABEL_VAR) {
            zone.label = label;
        }

        Ok(Config {
            webhook: WebhookConfig { url, username },
            calendar_command,
            calendar_timeout,
            zone,
        })
    }
}

/// Parse and sanity-check the webhook URL
fn parse_webhook_url(raw: &str) -> DigestResult<Url> {
    let url = Url::parse(raw)
        .map_err(|e| config_error(&format!("Invalid {}: {}", WEBHOOK_URL_VAR, e)))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(config_error(&format!(
            "Invalid {}: unsupported scheme '{}'",
            WEBHOOK_URL_VAR, scheme
        ))),
    }
}

/// Load key/value pairs into the environment, overriding existing values
fn load_env_file() -> DigestResult<()> {
    match env::var(ENV_FILE_VAR) {
        Ok(path) if !path.trim().is_empty() => {
            let path = path.trim();
            dotenvy::from_path_override(path).map_err(|e| {
                config_error(&format!("Failed to load env file {}: {}", path, e))
            })?;
            debug!("Loaded env file {}", path);
        }
        _ => match dotenvy::dotenv_override() {
            Ok(path) => debug!("Loaded env file {}", path.display()),
            Err(e) if e.not_found() => debug!("No .env file found"),
            Err(e) => return Err(config_error(&format!("Failed to load .env file: {}", e))),
        },
    }

    Ok(())
}
