//! File sources: optional global config and an explicitly named file.

use config::builder::DefaultState;
use config::{ConfigBuilder, File};
use std::path::{Path, PathBuf};

/// `~/.config/edge/config.toml` (platform equivalent).
pub fn global_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "edge")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

pub fn add_global(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    match global_config_path() {
        Some(path) => builder.add_source(File::from(path).required(false)),
        None => builder,
    }
}

pub fn add_required(
    builder: ConfigBuilder<DefaultState>,
    path: &Path,
) -> ConfigBuilder<DefaultState> {
    builder.add_source(File::from(path).required(true))
}
