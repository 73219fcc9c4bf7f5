use anyhow::{Context, Result};
use clap::Parser;
use std::ffi::{OsStr, OsString};
use std::io::{IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use hop_cli::HopError;
use hop_cli::config::{
	CONFIG_ENV_VAR, LoadedConfig, Settings, TABLE_ENV_VAR, config_path, load_config,
	resolve_settings,
};
use hop_cli::exec::{DEPTH_ENV_VAR, HostEnv, jump, resolve_command};
use hop_cli::table::{
	Access, Diagnostic, Diagnostics, MatchOptions, TableFile, add_path, find_best_match,
	os_to_bytes, read_existing, remove_path, valid_entries,
};

const LOG_ENV_VAR: &str = "HOP_LOG";

#[derive(Parser)]
#[command(name = "hop")]
#[command(
	author,
	version,
	about = "Jump to directories by fuzzy-matching their names against a table of paths"
)]
#[command(arg_required_else_help = true)]
struct Cli {
	/// Add a directory to the table
	#[arg(short, long, value_name = "PATH", conflicts_with_all = ["remove", "list", "pattern"])]
	add: Option<PathBuf>,

	/// Remove a directory from the table
	#[arg(short, long, value_name = "PATH", conflicts_with_all = ["list", "pattern"])]
	remove: Option<PathBuf>,

	/// List the entries in the table
	#[arg(short, long, conflicts_with = "pattern")]
	list: bool,

	/// Print the best match instead of starting a shell there
	#[arg(short, long, requires = "pattern")]
	print: bool,

	/// Score every entry and print each distance to stderr
	#[arg(short, long, requires = "pattern")]
	show_calculations: bool,

	/// Table file to use instead of the configured one
	#[arg(short, long, value_name = "FILE")]
	table: Option<PathBuf>,

	/// Show the effective configuration
	#[arg(long, conflicts_with_all = ["add", "remove", "list", "pattern"])]
	show_config: bool,

	/// Name to match against the last component of each table entry
	pattern: Option<OsString>,
}

/// Routes malformed-line warnings to the log and distance dumps to stderr.
struct CliDiagnostics<'a> {
	table: &'a Path,
}

impl Diagnostics for CliDiagnostics<'_> {
	fn report(&mut self, diagnostic: Diagnostic<'_>) {
		match diagnostic {
			Diagnostic::MalformedLine { .. } => {
				tracing::warn!(table = %self.table.display(), "{diagnostic}");
			}
			Diagnostic::Calculation { .. } => eprintln!("{diagnostic}"),
		}
	}
}

fn main() -> ExitCode {
	tracing_subscriber::fmt()
		.with_env_filter(
			tracing_subscriber::EnvFilter::try_from_env(LOG_ENV_VAR)
				.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
		)
		.with_writer(std::io::stderr)
		.with_ansi(std::io::stderr().is_terminal())
		.with_target(false)
		.without_time()
		.init();

	match run() {
		Ok(code) => code,
		Err(e) => {
			eprintln!("error: {e:?}");
			ExitCode::from(e.downcast_ref::<HopError>().map_or(1, HopError::exit_code))
		}
	}
}

fn run() -> Result<ExitCode> {
	let cli = Cli::parse();

	let path = config_path(std::env::var_os(CONFIG_ENV_VAR))
		.context("Failed to locate config file")?;
	let loaded = load_config(&path).context("Failed to load configuration")?;
	let settings = resolve_settings(
		&loaded.config,
		cli.table.as_deref(),
		std::env::var_os(TABLE_ENV_VAR),
	)
	.context("Failed to resolve table location")?;

	if cli.show_config {
		return handle_show_config(&loaded, &settings);
	}

	if let Some(ref path) = cli.add {
		return handle_add(path, &settings);
	}

	if let Some(ref path) = cli.remove {
		return handle_remove(path, &settings);
	}

	if cli.list {
		return handle_list(&settings);
	}

	if let Some(ref pattern) = cli.pattern {
		let options = MatchOptions {
			show_calculations: cli.show_calculations,
		};
		return handle_jump(pattern, options, cli.print, &settings);
	}

	// No action specified - this shouldn't happen due to arg_required_else_help
	Ok(ExitCode::SUCCESS)
}

fn handle_show_config(loaded: &LoadedConfig, settings: &Settings) -> Result<ExitCode> {
	println!("Config file: {}", loaded.path.display());
	if loaded.found {
		println!("  (exists)");
	} else {
		println!("  (not found, using defaults)");
	}

	println!("Table: {}", settings.table.display());
	println!("Max table bytes: {}", settings.max_table_bytes);

	let host = HostEnv::from_process_env(settings.shell.as_deref());
	match resolve_command(&host.shell) {
		Some(resolved) => println!("Shell: {}", resolved.display()),
		None => println!("Shell: {} (not found)", host.shell.display()),
	}
	println!("{}: {}", DEPTH_ENV_VAR, host.depth);

	Ok(ExitCode::SUCCESS)
}

fn handle_add(path: &Path, settings: &Settings) -> Result<ExitCode> {
	let mut table = TableFile::open(&settings.table, Access::Write, settings.max_table_bytes)
		.context("Failed to open table")?;
	let stored = add_path(&mut table, path).with_context(|| {
		format!(
			"Failed to add {} to {}",
			path.display(),
			table.path().display()
		)
	})?;

	println!("Added {}", stored.display());
	Ok(ExitCode::SUCCESS)
}

fn handle_remove(path: &Path, settings: &Settings) -> Result<ExitCode> {
	let mut table = TableFile::open(&settings.table, Access::Write, settings.max_table_bytes)
		.context("Failed to open table")?;
	let mut diagnostics = CliDiagnostics {
		table: &settings.table,
	};
	let outcome = remove_path(&mut table, path, &mut diagnostics)
		.with_context(|| format!("Failed to remove {}", path.display()))?;

	if outcome.removed == 0 {
		eprintln!(
			"Warning: {} is not in the table at {}",
			outcome.target.display(),
			table.path().display()
		);
	} else {
		println!("Removed {}", outcome.target.display());
	}
	Ok(ExitCode::SUCCESS)
}

fn handle_list(settings: &Settings) -> Result<ExitCode> {
	let contents =
		read_existing(&settings.table, settings.max_table_bytes).context("Failed to read table")?;
	let mut diagnostics = CliDiagnostics {
		table: &settings.table,
	};

	let mut stdout = std::io::stdout().lock();
	for entry in valid_entries(&contents, &mut diagnostics) {
		stdout.write_all(entry)?;
		stdout.write_all(b"\n")?;
	}
	stdout.flush()?;

	Ok(ExitCode::SUCCESS)
}

fn handle_jump(
	pattern: &OsStr,
	options: MatchOptions,
	print: bool,
	settings: &Settings,
) -> Result<ExitCode> {
	let contents =
		read_existing(&settings.table, settings.max_table_bytes).context("Failed to read table")?;
	let mut diagnostics = CliDiagnostics {
		table: &settings.table,
	};

	let found = find_best_match(&contents, &os_to_bytes(pattern), options, &mut diagnostics)
		.with_context(|| format!("Nothing to jump to in {}", settings.table.display()))?;

	if print {
		let mut stdout = std::io::stdout().lock();
		stdout.write_all(found.path)?;
		stdout.write_all(b"\n")?;
		stdout.flush()?;
		return Ok(ExitCode::SUCCESS);
	}

	let target = found.to_path_buf();
	let host = HostEnv::from_process_env(settings.shell.as_deref());
	let never = jump(&target, &host)
		.with_context(|| format!("Failed to jump to {}", target.display()))?;
	match never {}
}
