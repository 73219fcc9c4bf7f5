use crate::error::{HopError, Result};
use crate::table::file::TableFile;
use crate::table::{Diagnostic, Diagnostics, canonicalize, is_absolute, lines, path_to_bytes};
use std::path::{Path, PathBuf};

/// Lines surviving a removal, in their original order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Removal<'a> {
	pub kept: Vec<&'a [u8]>,
	pub removed: usize,
}

/// Result of removing a path from the table file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveOutcome {
	/// The resolved path that was filtered out.
	pub target: PathBuf,

	/// Number of lines dropped; zero if the path was not in the table.
	pub removed: usize,
}

/// Split `contents` into the lines to keep and a count of lines equal to
/// `target`.
///
/// Malformed lines are reported but kept: removal only filters on exact
/// byte equality. Empty lines are dropped.
pub fn plan_removal<'a>(
	contents: &'a [u8],
	target: &[u8],
	diagnostics: &mut impl Diagnostics,
) -> Removal<'a> {
	let mut kept = Vec::new();
	let mut removed = 0;

	for (line_number, line) in lines(contents) {
		if !is_absolute(line) {
			diagnostics.report(Diagnostic::MalformedLine { line_number, line });
		}
		if line == target {
			removed += 1;
		} else {
			kept.push(line);
		}
	}

	Removal { kept, removed }
}

/// Canonicalize `path` and append it to the table.
///
/// No duplicate check is made: adding a path twice stores it twice.
/// Returns the path as stored.
pub fn add_path(table: &mut TableFile, path: &Path) -> Result<PathBuf> {
	let resolved = canonicalize(path)?;
	let contents = table.read_all()?;
	let separate = contents.last().is_some_and(|&b| b != b'\n');

	table.write_line(&path_to_bytes(&resolved), separate)?;
	tracing::debug!(path = %resolved.display(), "added table entry");
	Ok(resolved)
}

/// Remove every line equal to the resolved form of `path`.
///
/// A path that no longer exists on disk cannot be canonicalized. It is made
/// absolute against the working directory without touching the filesystem,
/// stripped of trailing `/` and `.` components, and matched literally so
/// stale entries can still be dropped.
pub fn remove_path(
	table: &mut TableFile,
	path: &Path,
	diagnostics: &mut impl Diagnostics,
) -> Result<RemoveOutcome> {
	let target = resolve_for_removal(path)?;
	let contents = table.read_all()?;
	let plan = plan_removal(&contents, &path_to_bytes(&target), diagnostics);

	table.truncate_and_rewrite(&plan.kept)?;
	tracing::debug!(
		path = %target.display(),
		removed = plan.removed,
		"removed table entries"
	);

	Ok(RemoveOutcome {
		target,
		removed: plan.removed,
	})
}

fn resolve_for_removal(path: &Path) -> Result<PathBuf> {
	match canonicalize(path) {
		Ok(resolved) => Ok(resolved),
		Err(HopError::PathResolution { source, .. })
			if source.kind() == std::io::ErrorKind::NotFound =>
		{
			let literal = lexical_absolute(path)?;
			tracing::debug!(path = %literal.display(), "path is gone, matching literally");
			Ok(literal)
		}
		Err(e) => Err(e),
	}
}

/// `..` is kept as written: without the directories there is nothing to
/// resolve it against.
fn lexical_absolute(path: &Path) -> Result<PathBuf> {
	let absolute = std::path::absolute(path).map_err(|source| HopError::PathResolution {
		path: path.to_path_buf(),
		source,
	})?;
	Ok(absolute.components().collect())
}
