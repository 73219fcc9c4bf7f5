use std::collections::TryReserveError;
use std::path::PathBuf;

/// Library-level structured errors for hop.
///
/// Use `thiserror` for structured errors that library consumers can match on.
/// The CLI binary wraps these with `anyhow` for rich context chains.
#[derive(Debug, thiserror::Error)]
pub enum HopError {
	#[error("Out of memory computing distance ({requested} cells requested)")]
	ResourceExhausted {
		requested: usize,
		#[source]
		source: TryReserveError,
	},

	#[error("Table contains no usable entries")]
	EmptyMatchSet,

	#[error("Pattern must not be empty")]
	EmptyPattern,

	#[error("Failed to read table: {path}")]
	TableRead {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to write table: {path}")]
	TableWrite {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to lock table: {path}")]
	TableLock {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Table exceeds {limit} bytes: {path}")]
	TableTooLarge { path: PathBuf, limit: u64 },

	#[error("Failed to resolve path: {path}")]
	PathResolution {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to read config file: {path}")]
	ConfigReadError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse config file: {path}")]
	ConfigParseError {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	#[error("Invalid config value for {field}: {reason}")]
	InvalidConfig { field: String, reason: String },

	#[error("Failed to resolve the user's {kind} directory")]
	DirectoryNotFound { kind: &'static str },

	#[error("Failed to change directory to {path}")]
	ChangeDirectory {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to start shell: {shell}")]
	ShellExec {
		shell: PathBuf,
		#[source]
		source: std::io::Error,
	},
}

impl HopError {
	/// Process exit code for this error.
	///
	/// An empty table and memory exhaustion get their own codes so shell
	/// wrappers can tell them apart from ordinary failures. 2 is left to
	/// clap, which exits with it on usage errors.
	pub fn exit_code(&self) -> u8 {
		match self {
			HopError::EmptyMatchSet => 4,
			HopError::ResourceExhausted { .. } => 3,
			_ => 1,
		}
	}
}

/// Result type alias using HopError.
pub type Result<T> = std::result::Result<T, HopError>;
