//! Environment variable source: EDGE_* prefix with __ separator

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::Environment;

/// Plain origin override honored for parity with the worker deployment.
pub const ORIGIN_URL_VAR: &str = "ORIGIN_URL";

/// Add environment variable overlay to builder.
/// Uses EDGE_ prefix and __ as separator for nested keys.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let builder = builder.add_source(
        Environment::with_prefix("EDGE")
            .separator("__")
            .try_parsing(true),
    );
    match std::env::var(ORIGIN_URL_VAR) {
        Ok(url) if !url.is_empty() => builder.set_override("origin.base_url", url),
        _ => Ok(builder),
    }
}
