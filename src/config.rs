use serde::Deserialize;
use std::time::Duration;

use crate::error::{AppError, Result};

#[derive(Deserialize, Clone)]
pub struct AppConfig {
    pub owner: String,
    pub repository: String,
    pub branch: String,
    /// Numeric workflow id, or the workflow's file name (e.g. `build.yml`).
    pub workflow: String,
    pub access_token: String,
    /// Minutes to wait for the dispatched run to complete.
    #[serde(default = "default_timeout")]
    pub timeout: f64,
    /// Seconds between successive polls.
    #[serde(default = "default_poll_interval")]
    pub poll_interval: f64,
    #[serde(default)]
    pub enable_logging: bool,
    /// Minutes to wait for the dispatched run to show up in the run listing.
    #[serde(default = "default_correlation_timeout")]
    pub correlation_timeout: f64,
    #[serde(default)]
    pub retry_transport_errors: bool,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default)]
    pub log_format: LogFormat,
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

// Manual Debug impl to avoid leaking the access token
impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("owner", &self.owner)
            .field("repository", &self.repository)
            .field("branch", &self.branch)
            .field("workflow", &self.workflow)
            .field("access_token", &"[REDACTED]")
            .field("timeout", &self.timeout)
            .field("poll_interval", &self.poll_interval)
            .field("enable_logging", &self.enable_logging)
            .field("correlation_timeout", &self.correlation_timeout)
            .field("retry_transport_errors", &self.retry_transport_errors)
            .field("api_url", &self.api_url)
            .field("log_format", &self.log_format)
            .finish()
    }
}

fn default_timeout() -> f64 {
    30.0
}

fn default_poll_interval() -> f64 {
    10.0
}

fn default_correlation_timeout() -> f64 {
    10.0
}

/// Longest wait accepted for either phase: GitHub cancels any workflow run
/// that is still going after 35 days.
const MAX_TIMEOUT_MINUTES: f64 = 35.0 * 24.0 * 60.0;

/// Convert a positive, bounded number of seconds from the input named `name`.
fn checked_secs(name: &str, secs: f64, max_secs: f64) -> Result<Duration> {
    if !secs.is_finite() || secs <= 0.0 {
        return Err(AppError::Config(format!(
            "'{name}' must be a positive number, got {secs}"
        )));
    }
    if secs > max_secs {
        return Err(AppError::Config(format!(
            "'{name}' must not exceed {max_secs} seconds, got {secs}"
        )));
    }
    Duration::try_from_secs_f64(secs)
        .map_err(|e| AppError::Config(format!("'{name}' is out of range: {e}")))
}

fn default_api_url() -> String {
    "https://api.github.com".to_string()
}

impl AppConfig {
    /// Build the configuration from an optional file, `RUN_AND_YIELD_*`
    /// environment variables and finally the explicit `overrides` (action
    /// inputs / CLI flags). Empty override values are ignored.
    pub fn load(config_path: Option<&str>, overrides: &[(&str, Option<String>)]) -> Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = config_path {
            builder = builder.add_source(config::File::with_name(path));
        } else {
            builder = builder.add_source(config::File::with_name("run-and-yield").required(false));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("RUN_AND_YIELD")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        for (key, value) in overrides {
            let value = value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string);
            builder = builder
                .set_override_option(*key, value)
                .map_err(|e| AppError::Config(e.to_string()))?;
        }

        let config: AppConfig = builder
            .build()
            .map_err(|e| AppError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| AppError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let required = [
            ("owner", &self.owner),
            ("repository", &self.repository),
            ("branch", &self.branch),
            ("workflow", &self.workflow),
            ("access_token", &self.access_token),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(AppError::Config(format!("'{name}' must not be empty")));
            }
        }
        self.poll_interval()?;
        self.completion_timeout()?;
        self.correlation_timeout()?;
        Ok(())
    }

    pub fn poll_interval(&self) -> Result<Duration> {
        checked_secs("poll_interval", self.poll_interval, MAX_TIMEOUT_MINUTES * 60.0)
    }

    pub fn completion_timeout(&self) -> Result<Duration> {
        checked_secs("timeout", self.timeout * 60.0, MAX_TIMEOUT_MINUTES * 60.0)
    }

    pub fn correlation_timeout(&self) -> Result<Duration> {
        checked_secs(
            "correlation_timeout",
            self.correlation_timeout * 60.0,
            MAX_TIMEOUT_MINUTES * 60.0,
        )
    }
}
