//! Handing control to the user's shell.
//!
//! This module handles:
//! - Capturing the host environment (shell, jump depth) as an explicit value
//! - Changing into the matched directory
//! - Replacing the current process with the shell

use crate::error::{HopError, Result};
use std::convert::Infallible;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Environment variable counting how many hop shells are nested.
pub const DEPTH_ENV_VAR: &str = "HOP_DEPTH";

const FALLBACK_SHELL: &str = "/bin/sh";

/// The parts of the process environment a jump depends on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostEnv {
	/// Shell to start in the target directory.
	pub shell: PathBuf,

	/// Nesting depth of the current shell; 0 outside any hop shell.
	pub depth: u32,
}

impl HostEnv {
	/// Build a host environment from raw values.
	///
	/// The configured shell wins over `$SHELL`; with neither, `/bin/sh` is
	/// used. A missing or unparsable depth counts as 0.
	pub fn new(
		config_shell: Option<&Path>,
		shell_var: Option<OsString>,
		depth_var: Option<OsString>,
	) -> Self {
		let shell = config_shell
			.map(Path::to_path_buf)
			.or_else(|| shell_var.filter(|s| !s.is_empty()).map(PathBuf::from))
			.unwrap_or_else(|| PathBuf::from(FALLBACK_SHELL));

		let depth = depth_var
			.and_then(|d| d.to_str().and_then(|s| s.trim().parse().ok()))
			.unwrap_or(0);

		HostEnv { shell, depth }
	}

	/// Read `$SHELL` and `$HOP_DEPTH` from the running process.
	pub fn from_process_env(config_shell: Option<&Path>) -> Self {
		Self::new(
			config_shell,
			std::env::var_os("SHELL"),
			std::env::var_os(DEPTH_ENV_VAR),
		)
	}

	/// Depth the spawned shell will see.
	pub fn next_depth(&self) -> u32 {
		self.depth.saturating_add(1)
	}
}

/// Build the command that starts the shell with the incremented depth.
pub fn shell_command(host: &HostEnv) -> Command {
	let mut cmd = Command::new(&host.shell);
	cmd.env(DEPTH_ENV_VAR, host.next_depth().to_string());
	cmd
}

/// Resolve a command name to its full path.
///
/// If the command is already an absolute path, returns it if it exists.
/// Otherwise, searches PATH for the command.
pub fn resolve_command(command: &Path) -> Option<PathBuf> {
	if command.is_absolute() {
		return command.exists().then(|| command.to_path_buf());
	}

	let path_var = std::env::var_os("PATH")?;
	std::env::split_paths(&path_var)
		.map(|dir| dir.join(command))
		.find(|full_path| full_path.exists())
}

/// Change into `target` and replace this process with the shell.
///
/// Only returns on failure.
pub fn jump(target: &Path, host: &HostEnv) -> Result<Infallible> {
	std::env::set_current_dir(target).map_err(|source| HopError::ChangeDirectory {
		path: target.to_path_buf(),
		source,
	})?;

	tracing::debug!(
		target = %target.display(),
		shell = %host.shell.display(),
		depth = host.next_depth(),
		"starting shell"
	);

	replace_process(shell_command(host), &host.shell)
}

#[cfg(unix)]
fn replace_process(mut cmd: Command, shell: &Path) -> Result<Infallible> {
	use std::os::unix::process::CommandExt;

	let source = cmd.exec();
	Err(HopError::ShellExec {
		shell: shell.to_path_buf(),
		source,
	})
}

#[cfg(not(unix))]
fn replace_process(mut cmd: Command, shell: &Path) -> Result<Infallible> {
	let status = cmd.status().map_err(|source| HopError::ShellExec {
		shell: shell.to_path_buf(),
		source,
	})?;
	std::process::exit(status.code().unwrap_or(1))
}
