//! ConfigLoader facade delegating to merge service.

use super::merge::service::MergeService;
use super::TracehashConfig;
use config::ConfigError;
use std::path::{Path, PathBuf};

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Path of the user-level config file, if a home directory is known
    pub fn global_config_path() -> Option<PathBuf> {
        super::sources::global_file::global_config_path()
    }

    /// Load configuration from standard sources for `workspace_root`,
    /// optionally layering an explicit file on top.
    pub fn load(
        workspace_root: &Path,
        explicit: Option<&Path>,
    ) -> Result<TracehashConfig, ConfigError> {
        MergeService::load(workspace_root, explicit)
    }
}
