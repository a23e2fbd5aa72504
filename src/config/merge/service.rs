//! MergeService: orchestrates sources and deserializes to EdgeConfig.

use crate::config::sources::{environment, file};
use crate::config::EdgeConfig;
use crate::error::EdgeError;
use config::Config;
use std::path::Path;

/// Merge service for config composition.
pub struct MergeService;

impl MergeService {
    /// Precedence: serde defaults (lowest) -> global file -> explicit file ->
    /// `EDGE__*` environment -> `ORIGIN_URL` (highest).
    pub fn load(explicit: Option<&Path>) -> Result<EdgeConfig, EdgeError> {
        let builder = Config::builder();
        let builder = file::add_global(builder);
        let builder = match explicit {
            Some(path) => file::add_required(builder, path),
            None => builder,
        };
        let builder = environment::add_to_builder(builder)?;

        Ok(builder.build()?.try_deserialize()?)
    }

    /// Load a specific file with environment overlay.
    pub fn load_from_file(path: &Path) -> Result<EdgeConfig, EdgeError> {
        let builder = file::add_required(Config::builder(), path);
        let builder = environment::add_to_builder(builder)?;

        Ok(builder.build()?.try_deserialize()?)
    }
}
