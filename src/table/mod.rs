//! The jump table: a newline-separated list of absolute paths.
//!
//! This module handles:
//! - Splitting raw table bytes into entries
//! - Fuzzy matching a pattern against entry basenames
//! - Adding and removing entries
//! - Locked file access to the backing table

pub mod file;
pub mod matcher;
pub mod mutator;

pub use file::{Access, DEFAULT_MAX_TABLE_BYTES, TableFile, read_existing};
pub use matcher::{Match, MatchOptions, find_best_match};
pub use mutator::{RemoveOutcome, Removal, add_path, plan_removal, remove_path};

use crate::error::{HopError, Result};
use std::borrow::Cow;
use std::ffi::OsStr;
use std::fmt;
use std::path::{Path, PathBuf};

/// Something the table code noticed while scanning, reported for display only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Diagnostic<'a> {
	/// A non-empty line that is not an absolute path.
	MalformedLine { line_number: usize, line: &'a [u8] },

	/// The distance computed for one candidate.
	Calculation {
		line_number: usize,
		basename: &'a [u8],
		pattern: &'a [u8],
		distance: f64,
	},
}

impl fmt::Display for Diagnostic<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Diagnostic::MalformedLine { line_number, line } => write!(
				f,
				"line {}: not an absolute path: {}",
				line_number,
				String::from_utf8_lossy(line)
			),
			Diagnostic::Calculation {
				line_number,
				basename,
				pattern,
				distance,
			} => write!(
				f,
				"line {}: distance({:?}, {:?}) = {}",
				line_number,
				String::from_utf8_lossy(basename),
				String::from_utf8_lossy(pattern),
				distance
			),
		}
	}
}

/// Sink for [`Diagnostic`]s. Never influences matching or rewriting.
pub trait Diagnostics {
	fn report(&mut self, diagnostic: Diagnostic<'_>);
}

/// Collects rendered diagnostics, one string per report.
impl Diagnostics for Vec<String> {
	fn report(&mut self, diagnostic: Diagnostic<'_>) {
		self.push(diagnostic.to_string());
	}
}

/// Non-empty lines of `contents` with their 1-based line numbers.
pub fn lines(contents: &[u8]) -> impl Iterator<Item = (usize, &[u8])> {
	contents
		.split(|&b| b == b'\n')
		.enumerate()
		.filter(|(_, line)| !line.is_empty())
		.map(|(i, line)| (i + 1, line))
}

/// Absolute-path entries of `contents` in table order.
///
/// Malformed lines are reported and skipped.
pub fn valid_entries<'a>(
	contents: &'a [u8],
	diagnostics: &mut impl Diagnostics,
) -> Vec<&'a [u8]> {
	let mut entries = Vec::new();
	for (line_number, line) in lines(contents) {
		if is_absolute(line) {
			entries.push(line);
		} else {
			diagnostics.report(Diagnostic::MalformedLine { line_number, line });
		}
	}
	entries
}

/// Final path component: everything after the last `/`.
pub fn basename(path: &[u8]) -> &[u8] {
	match path.iter().rposition(|&b| b == b'/') {
		Some(i) => &path[i + 1..],
		None => path,
	}
}

/// Whether a table line holds an absolute path.
pub fn is_absolute(line: &[u8]) -> bool {
	bytes_to_path(line).is_absolute()
}

/// Resolve `path` to the absolute, symlink-free form stored in the table.
pub fn canonicalize(path: &Path) -> Result<PathBuf> {
	std::fs::canonicalize(path).map_err(|source| HopError::PathResolution {
		path: path.to_path_buf(),
		source,
	})
}

#[cfg(unix)]
pub fn bytes_to_path(bytes: &[u8]) -> Cow<'_, Path> {
	use std::os::unix::ffi::OsStrExt;
	Cow::Borrowed(Path::new(OsStr::from_bytes(bytes)))
}

#[cfg(not(unix))]
pub fn bytes_to_path(bytes: &[u8]) -> Cow<'_, Path> {
	Cow::Owned(PathBuf::from(String::from_utf8_lossy(bytes).into_owned()))
}

/// Raw bytes of an OS string, as stored in the table.
#[cfg(unix)]
pub fn os_to_bytes(s: &OsStr) -> Cow<'_, [u8]> {
	use std::os::unix::ffi::OsStrExt;
	Cow::Borrowed(s.as_bytes())
}

#[cfg(not(unix))]
pub fn os_to_bytes(s: &OsStr) -> Cow<'_, [u8]> {
	Cow::Owned(s.to_string_lossy().into_owned().into_bytes())
}

pub fn path_to_bytes(path: &Path) -> Cow<'_, [u8]> {
	os_to_bytes(path.as_os_str())
}
