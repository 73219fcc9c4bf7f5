use crate::config::types::{Config, Settings};
use crate::error::{HopError, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Environment variable naming an alternate config file.
pub const CONFIG_ENV_VAR: &str = "HOP_CONFIG";

/// Environment variable naming an alternate table file.
pub const TABLE_ENV_VAR: &str = "HOP_TABLE";

/// Locate the config file.
///
/// `$HOP_CONFIG` wins when set and non-empty; otherwise the platform
/// config directory is used (`~/.config/hop/config.toml` on Linux).
pub fn config_path(env_override: Option<OsString>) -> Result<PathBuf> {
	if let Some(path) = non_empty(env_override) {
		return Ok(PathBuf::from(path));
	}

	let config_dir = dirs::config_dir().ok_or(HopError::DirectoryNotFound { kind: "config" })?;
	Ok(config_dir.join("hop").join("config.toml"))
}

/// Default table location under the platform data directory.
pub fn default_table_path() -> Result<PathBuf> {
	let data_dir = dirs::data_local_dir().ok_or(HopError::DirectoryNotFound { kind: "data" })?;
	Ok(data_dir.join("hop").join("table"))
}

/// Resolve effective settings.
///
/// The table location is taken from, in order: the command line, the
/// `$HOP_TABLE` value passed in, the config file, and finally
/// [`default_table_path`].
pub fn resolve_settings(
	config: &Config,
	table_override: Option<&Path>,
	env_table: Option<OsString>,
) -> Result<Settings> {
	let table = if let Some(path) = table_override {
		path.to_path_buf()
	} else if let Some(path) = non_empty(env_table) {
		PathBuf::from(path)
	} else if let Some(ref path) = config.table {
		path.clone()
	} else {
		default_table_path()?
	};

	Ok(Settings {
		table,
		shell: config.shell.clone(),
		max_table_bytes: config.max_table_bytes(),
	})
}

fn non_empty(value: Option<OsString>) -> Option<OsString> {
	value.filter(|v| !v.is_empty())
}
