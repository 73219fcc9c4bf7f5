use crate::error::HopError;
use crate::table::DEFAULT_MAX_TABLE_BYTES;
use serde::Deserialize;
use std::path::PathBuf;

/// Contents of the user's `config.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
	/// Table file location. Overridden by `$HOP_TABLE` and `--table`.
	#[serde(default)]
	pub table: Option<PathBuf>,

	/// Shell to start in the target directory. Takes precedence over `$SHELL`.
	#[serde(default)]
	pub shell: Option<PathBuf>,

	/// Size cap for the table file, in bytes.
	#[serde(default)]
	pub max_table_bytes: Option<u64>,
}

/// A configuration together with where it was looked for.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
	/// The parsed configuration, or defaults if no file was found.
	pub config: Config,

	/// The path the config was loaded from (or would have been).
	pub path: PathBuf,

	/// Whether a file existed at `path`.
	pub found: bool,
}

/// Effective settings after applying overrides and defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
	pub table: PathBuf,
	pub shell: Option<PathBuf>,
	pub max_table_bytes: u64,
}

impl Config {
	/// Reject values that can never work.
	pub fn validate(&self) -> Result<(), HopError> {
		if self.max_table_bytes == Some(0) {
			return Err(HopError::InvalidConfig {
				field: "max-table-bytes".to_string(),
				reason: "must be greater than zero".to_string(),
			});
		}

		if let Some(ref shell) = self.shell
			&& shell.as_os_str().is_empty()
		{
			return Err(HopError::InvalidConfig {
				field: "shell".to_string(),
				reason: "must not be empty".to_string(),
			});
		}

		if let Some(ref table) = self.table
			&& table.as_os_str().is_empty()
		{
			return Err(HopError::InvalidConfig {
				field: "table".to_string(),
				reason: "must not be empty".to_string(),
			});
		}

		Ok(())
	}

	pub fn max_table_bytes(&self) -> u64 {
		self.max_table_bytes.unwrap_or(DEFAULT_MAX_TABLE_BYTES)
	}
}
