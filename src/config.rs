//! Configuration System
//!
//! Layered configuration for the fingerprinting binary: algorithm selection,
//! service identity stamped on request spans, span export and logging.
//! Sources merge through the `config` crate; see [`ConfigLoader`].

use crate::digest::Algorithm;
use crate::error::ApiError;
use crate::logging::LoggingConfig;
use crate::trace::export::SpanExportConfig;
use serde::{Deserialize, Serialize};

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TracehashConfig {
    /// Combining primitive
    #[serde(default)]
    pub algorithm: Algorithm,

    /// Service identity tagged on request spans
    #[serde(default)]
    pub service: ServiceConfig,

    /// Span export destinations
    #[serde(default)]
    pub spans: SpanExportConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Service identity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default = "default_service_name")]
    pub name: String,

    /// Deployment environment tag (`env`)
    #[serde(default = "default_environment")]
    pub environment: String,
}

fn default_service_name() -> String {
    "tracehash".to_string()
}

fn default_environment() -> String {
    "production".to_string()
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_service_name(),
            environment: default_environment(),
        }
    }
}

impl TracehashConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut errors = Vec::new();

        if self.service.name.trim().is_empty() {
            errors.push("service.name cannot be empty".to_string());
        }
        if self.service.environment.trim().is_empty() {
            errors.push("service.environment cannot be empty".to_string());
        }
        if let Err(e) = self.logging.validate() {
            errors.push(e);
        }
        if let Some(output) = &self.spans.output {
            if output.as_os_str().is_empty() {
                errors.push("spans.output cannot be empty".to_string());
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::ConfigError(format!(
                "Configuration validation failed:\n{}",
                errors.join("\n")
            )))
        }
    }

    /// Render the effective configuration as TOML
    pub fn to_toml(&self) -> Result<String, ApiError> {
        toml::to_string_pretty(self).map_err(|e| ApiError::ConfigError(e.to_string()))
    }
}
