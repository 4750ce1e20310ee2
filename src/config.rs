//! Configuration loading via `ortho-config`.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

use crate::provision::{
    DEFAULT_CITY, DEFAULT_OS, DEFAULT_PLAN, InstanceRequestBuilder, PollPolicy,
};
use crate::transport::{Credential, DEFAULT_BASE_URL};

/// Vultr client configuration derived from environment variables,
/// configuration files, and CLI flags.
#[derive(Clone, Debug, Deserialize, OrthoConfig, PartialEq, Eq)]
#[ortho_config(prefix = "VULTR")]
pub struct VultrConfig {
    /// API key sent as a bearer token. Requests are sent unauthenticated when
    /// it is absent, and the API rejects them.
    pub api_key: Option<String>,
    /// Base endpoint of the API.
    #[ortho_config(default = DEFAULT_BASE_URL.to_owned())]
    pub base_url: String,
    /// City of the region used when the CLI does not override it.
    #[ortho_config(default = DEFAULT_CITY.to_owned())]
    pub default_city: String,
    /// Plan used when the CLI does not override it.
    #[ortho_config(default = DEFAULT_PLAN.to_owned())]
    pub default_plan: String,
    /// Operating system name used when the CLI does not override it.
    #[ortho_config(default = DEFAULT_OS.to_owned())]
    pub default_os: String,
    /// Seconds between instance status polls.
    #[ortho_config(default = 1)]
    pub poll_interval_secs: u64,
    /// Seconds to wait for an instance to become ready before failing.
    #[ortho_config(default = 600)]
    pub wait_timeout_secs: u64,
    /// Maximum number of status polls before failing.
    #[ortho_config(default = 600)]
    pub max_poll_attempts: u32,
    /// Per-request HTTP timeout in seconds.
    #[ortho_config(default = 30)]
    pub http_timeout_secs: u64,
}

/// Metadata for a configuration field, used to generate actionable error messages.
struct FieldMetadata {
    description: &'static str,
    env_var: &'static str,
    toml_key: &'static str,
}

impl FieldMetadata {
    const fn new(description: &'static str, env_var: &'static str, toml_key: &'static str) -> Self {
        Self {
            description,
            env_var,
            toml_key,
        }
    }

    fn missing(&self) -> ConfigError {
        ConfigError::MissingField(format!(
            "missing {}: set {} or add {} to the configuration file",
            self.description, self.env_var, self.toml_key
        ))
    }
}

impl VultrConfig {
    fn require_field(value: &str, metadata: &FieldMetadata) -> Result<(), ConfigError> {
        if value.trim().is_empty() {
            return Err(metadata.missing());
        }
        Ok(())
    }

    fn require_positive(value: u64, metadata: &FieldMetadata) -> Result<(), ConfigError> {
        if value == 0 {
            return Err(ConfigError::Invalid(format!(
                "{} must be greater than zero: check {} or {}",
                metadata.description, metadata.env_var, metadata.toml_key
            )));
        }
        Ok(())
    }

    /// Loads configuration without attempting to parse CLI arguments. Values
    /// still merge defaults, configuration files, and environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the merge fails.
    pub fn load_without_cli_args() -> Result<Self, ConfigError> {
        Self::load_from_iter([std::ffi::OsString::from("vultr-provision")])
            .map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Returns the bearer credential, if an API key is configured.
    #[must_use]
    pub fn credential(&self) -> Option<Credential> {
        self.api_key.clone().and_then(Credential::new)
    }

    /// Returns the poll bounds for the readiness wait.
    #[must_use]
    pub const fn poll_policy(&self) -> PollPolicy {
        PollPolicy::new(
            Duration::from_secs(self.poll_interval_secs),
            Duration::from_secs(self.wait_timeout_secs),
            self.max_poll_attempts,
        )
    }

    /// Returns the per-request HTTP timeout.
    #[must_use]
    pub const fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    /// Starts an instance request pre-populated with the configured
    /// defaults.
    #[must_use]
    pub fn request_builder(&self) -> InstanceRequestBuilder {
        InstanceRequestBuilder::new()
            .city(&self.default_city)
            .plan_id(&self.default_plan)
            .os_name(&self.default_os)
    }

    /// Performs semantic validation on required fields. Error messages include
    /// guidance on how to provide missing values via environment variables or
    /// configuration files.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] when a required field is empty and
    /// [`ConfigError::Invalid`] when a duration or bound is zero or the base
    /// URL is not HTTP(S).
    pub fn validate(&self) -> Result<(), ConfigError> {
        let base_url = FieldMetadata::new("API base URL", "VULTR_BASE_URL", "base_url");
        Self::require_field(&self.base_url, &base_url)?;
        if !(self.base_url.starts_with("https://") || self.base_url.starts_with("http://")) {
            return Err(ConfigError::Invalid(format!(
                "API base URL must start with http:// or https://, got '{}'",
                self.base_url
            )));
        }
        Self::require_field(
            &self.default_city,
            &FieldMetadata::new("default city", "VULTR_DEFAULT_CITY", "default_city"),
        )?;
        Self::require_field(
            &self.default_plan,
            &FieldMetadata::new("default plan", "VULTR_DEFAULT_PLAN", "default_plan"),
        )?;
        Self::require_field(
            &self.default_os,
            &FieldMetadata::new("default operating system", "VULTR_DEFAULT_OS", "default_os"),
        )?;
        Self::require_positive(
            self.poll_interval_secs,
            &FieldMetadata::new(
                "poll interval",
                "VULTR_POLL_INTERVAL_SECS",
                "poll_interval_secs",
            ),
        )?;
        Self::require_positive(
            self.wait_timeout_secs,
            &FieldMetadata::new("wait timeout", "VULTR_WAIT_TIMEOUT_SECS", "wait_timeout_secs"),
        )?;
        Self::require_positive(
            u64::from(self.max_poll_attempts),
            &FieldMetadata::new(
                "maximum poll attempts",
                "VULTR_MAX_POLL_ATTEMPTS",
                "max_poll_attempts",
            ),
        )?;
        Self::require_positive(
            self.http_timeout_secs,
            &FieldMetadata::new("HTTP timeout", "VULTR_HTTP_TIMEOUT_SECS", "http_timeout_secs"),
        )?;
        Ok(())
    }
}

/// Errors raised during configuration loading and validation.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum ConfigError {
    /// Indicates a required configuration field is empty or missing.
    #[error("missing configuration field: {0}")]
    MissingField(String),
    /// Indicates a configuration value is present but unusable.
    #[error("invalid configuration value: {0}")]
    Invalid(String),
    /// Surfaces errors from the `ortho-config` loader.
    #[error("configuration parsing failed: {0}")]
    Parse(String),
}

impl From<ortho_config::OrthoError> for ConfigError {
    fn from(value: ortho_config::OrthoError) -> Self {
        Self::Parse(value.to_string())
    }
}
