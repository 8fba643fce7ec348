//! MergeService: orchestrates sources, applies merge policy, deserializes to TracehashConfig.

use crate::config::sources::{environment, global_file, workspace_file};
use crate::config::TracehashConfig;
use config::{ConfigError, File, FileFormat};
use std::path::Path;

use super::merge_policy;

/// Merge service for config composition.
pub struct MergeService;

impl MergeService {
    /// Load config from standard sources.
    /// Precedence: global file (lowest) -> workspace file -> explicit file -> environment (highest).
    pub fn load(
        workspace_root: &Path,
        explicit: Option<&Path>,
    ) -> Result<TracehashConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = workspace_file::add_to_builder(builder, workspace_root)?;
        let builder = match explicit {
            Some(path) => builder.add_source(File::from(path).format(FileFormat::Toml)),
            None => builder,
        };
        let builder = environment::add_to_builder(builder)?;

        let config = builder.build()?;
        config.try_deserialize()
    }
}
