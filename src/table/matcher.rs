use crate::distance::distance;
use crate::error::{HopError, Result};
use crate::table::{Diagnostic, Diagnostics, basename, bytes_to_path, is_absolute, lines};
use std::path::PathBuf;

/// Options controlling a match scan.
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchOptions {
	/// Score every candidate and report each distance, disabling the
	/// exact-match early exit.
	pub show_calculations: bool,
}

/// The table entry closest to a pattern.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Match<'a> {
	/// The matched line, an absolute path.
	pub path: &'a [u8],

	/// Distance between the entry's basename and the pattern.
	pub distance: f64,

	/// 1-based line number of the entry in the table.
	pub line_number: usize,
}

impl Match<'_> {
	pub fn to_path_buf(&self) -> PathBuf {
		bytes_to_path(self.path).into_owned()
	}
}

/// Find the entry whose basename is closest to `pattern`.
///
/// Candidates are scanned in table order and the first entry with the
/// smallest distance wins. A distance of exactly zero ends the scan early
/// unless [`MatchOptions::show_calculations`] is set.
///
/// Non-absolute lines are reported to `diagnostics` and never selected.
pub fn find_best_match<'a>(
	contents: &'a [u8],
	pattern: &[u8],
	options: MatchOptions,
	diagnostics: &mut impl Diagnostics,
) -> Result<Match<'a>> {
	if pattern.is_empty() {
		return Err(HopError::EmptyPattern);
	}

	let mut best: Option<Match<'a>> = None;

	for (line_number, line) in lines(contents) {
		if !is_absolute(line) {
			diagnostics.report(Diagnostic::MalformedLine { line_number, line });
			continue;
		}

		let name = basename(line);
		let dist = distance(name, pattern)?;

		if options.show_calculations {
			diagnostics.report(Diagnostic::Calculation {
				line_number,
				basename: name,
				pattern,
				distance: dist,
			});
		}

		if best.is_none_or(|b| dist < b.distance) {
			best = Some(Match {
				path: line,
				distance: dist,
				line_number,
			});
		}

		if dist == 0.0 && !options.show_calculations {
			break;
		}
	}

	best.ok_or(HopError::EmptyMatchSet)
}
