//! ConfigLoader facade delegating to merge service.

use super::merge::service::MergeService;
use super::EdgeConfig;
use crate::error::EdgeError;
use std::path::Path;

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load from the global file, `file` if given, and environment; then validate.
    pub fn load(file: Option<&Path>) -> Result<EdgeConfig, EdgeError> {
        let config = MergeService::load(file)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a specific file plus environment, skipping the global file.
    pub fn load_from_file(path: &Path) -> Result<EdgeConfig, EdgeError> {
        let config = MergeService::load_from_file(path)?;
        config.validate()?;
        Ok(config)
    }
}
