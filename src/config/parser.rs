use crate::config::types::{Config, LoadedConfig};
use crate::error::{HopError, Result};
use std::path::Path;

/// Parse a config file from the given path.
pub fn parse_config_file(path: &Path) -> Result<Config> {
	let content = std::fs::read_to_string(path).map_err(|source| HopError::ConfigReadError {
		path: path.to_path_buf(),
		source,
	})?;

	parse_config_str(&content, path)
}

/// Parse a config from a string (useful for testing).
pub fn parse_config_str(content: &str, path: &Path) -> Result<Config> {
	let config: Config = toml::from_str(content).map_err(|source| HopError::ConfigParseError {
		path: path.to_path_buf(),
		source,
	})?;

	config.validate()?;

	Ok(config)
}

/// Load the config at `path`, falling back to defaults if it does not exist.
pub fn load_config(path: &Path) -> Result<LoadedConfig> {
	if !path.exists() {
		tracing::debug!(path = %path.display(), "no config file, using defaults");
		return Ok(LoadedConfig {
			config: Config::default(),
			path: path.to_path_buf(),
			found: false,
		});
	}

	let config = parse_config_file(path)?;
	Ok(LoadedConfig {
		config,
		path: path.to_path_buf(),
		found: true,
	})
}
