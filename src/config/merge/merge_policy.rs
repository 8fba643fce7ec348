//! Merge rules: defaults, override order, conflict handling.

use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("algorithm", "sha256")?
        .set_default("service.name", "tracehash")?
        .set_default("service.environment", "production")?
        .set_default("spans.log", false)
}
