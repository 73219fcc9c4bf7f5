//! Configuration loading for hop.
//!
//! This module handles:
//! - TOML config file parsing
//! - Config and table location discovery
//! - Override precedence for the effective settings

pub mod cascade;
pub mod parser;
pub mod types;

pub use cascade::{
	CONFIG_ENV_VAR, TABLE_ENV_VAR, config_path, default_table_path, resolve_settings,
};
pub use parser::{load_config, parse_config_file, parse_config_str};
pub use types::{Config, LoadedConfig, Settings};
