//! Property tests for the distance metric and match selection.

use hop_cli::distance::distance;
use hop_cli::table::{MatchOptions, basename, find_best_match};
use proptest::prelude::*;

// ============================================================================
// Reference implementation
// ============================================================================

/// Full-matrix rendition of the recurrence, used to cross-check the
/// rolling-row implementation.
fn full_matrix(a: &[u8], b: &[u8]) -> f64 {
	let mut cell = vec![vec![0.0f64; b.len() + 1]; a.len() + 1];

	for i in 1..=a.len() {
		cell[i][0] = cell[i - 1][0] + 1.0 / i as f64;
	}
	for j in 1..=b.len() {
		cell[0][j] = cell[0][j - 1] + 1.0 / j as f64;
	}

	for i in 1..=a.len() {
		for j in 1..=b.len() {
			cell[i][j] = if a[i - 1] == b[j - 1] {
				cell[i - 1][j - 1]
			} else {
				(cell[i - 1][j] + 1.0 / i as f64).min(cell[i][j - 1] + 1.0 / j as f64)
			};
		}
	}

	cell[a.len()][b.len()]
}

// ============================================================================
// Strategies
// ============================================================================

/// Short byte strings over a small alphabet, so equal bytes are common.
fn name_strategy() -> impl Strategy<Value = Vec<u8>> {
	proptest::collection::vec(letter_strategy(), 0..12)
}

fn letter_strategy() -> impl Strategy<Value = u8> {
	prop_oneof![Just(b'a'), Just(b'b'), Just(b'c'), Just(b'd')]
}

fn pattern_strategy() -> impl Strategy<Value = Vec<u8>> {
	proptest::collection::vec(letter_strategy(), 1..6)
}

/// Arbitrary bytes, including non-UTF-8.
fn bytes_strategy() -> impl Strategy<Value = Vec<u8>> {
	proptest::collection::vec(any::<u8>(), 0..24)
}

/// A name whose first byte appears nowhere else in it.
fn unique_head_strategy() -> impl Strategy<Value = Vec<u8>> {
	(b'A'..=b'Z', proptest::collection::vec(b'a'..=b'z', 0..16)).prop_map(|(head, tail)| {
		let mut name = vec![head];
		name.extend(tail);
		name
	})
}

/// Table entries as `/root/<name>` lines.
fn table_strategy() -> impl Strategy<Value = Vec<Vec<u8>>> {
	proptest::collection::vec(name_strategy(), 1..8)
}

fn render_table(names: &[Vec<u8>]) -> Vec<u8> {
	let mut contents = Vec::new();
	for name in names {
		contents.extend_from_slice(b"/root/");
		contents.extend_from_slice(name);
		contents.push(b'\n');
	}
	contents
}

// ============================================================================
// Metric properties
// ============================================================================

proptest! {
	#![proptest_config(ProptestConfig::with_cases(500))]

	#[test]
	fn prop_identical_is_zero(s in bytes_strategy()) {
		prop_assert_eq!(distance(&s, &s).unwrap(), 0.0);
	}

	#[test]
	fn prop_zero_only_for_identical(a in name_strategy(), b in name_strategy()) {
		let d = distance(&a, &b).unwrap();
		prop_assert!(d.is_finite());
		prop_assert!(d >= 0.0);
		prop_assert_eq!(d == 0.0, a == b);
	}

	#[test]
	fn prop_symmetric(a in bytes_strategy(), b in bytes_strategy()) {
		let ab = distance(&a, &b).unwrap();
		let ba = distance(&b, &a).unwrap();
		prop_assert_eq!(ab.to_bits(), ba.to_bits());
	}

	#[test]
	fn prop_symmetric_small_alphabet(a in name_strategy(), b in name_strategy()) {
		let ab = distance(&a, &b).unwrap();
		let ba = distance(&b, &a).unwrap();
		prop_assert_eq!(ab.to_bits(), ba.to_bits());
	}

	#[test]
	fn prop_dropping_last_byte(s in proptest::collection::vec(any::<u8>(), 1..24)) {
		let d = distance(&s, &s[..s.len() - 1]).unwrap();
		prop_assert_eq!(d, 1.0 / s.len() as f64);
	}

	#[test]
	fn prop_dropping_unique_first_byte(s in unique_head_strategy()) {
		prop_assert_eq!(distance(&s, &s[1..]).unwrap(), 1.0);
	}

	#[test]
	fn prop_suffix_never_dearer_than_prefix(s in proptest::collection::vec(any::<u8>(), 1..24)) {
		let without_last = distance(&s, &s[..s.len() - 1]).unwrap();
		let without_first = distance(&s, &s[1..]).unwrap();
		prop_assert!(without_last <= without_first);
	}

	#[test]
	fn prop_matches_full_matrix(a in name_strategy(), b in name_strategy()) {
		let rolling = distance(&a, &b).unwrap();
		let reference = full_matrix(&a, &b);
		prop_assert_eq!(rolling.to_bits(), reference.to_bits());
	}

	#[test]
	fn prop_matches_full_matrix_arbitrary_bytes(a in bytes_strategy(), b in bytes_strategy()) {
		let rolling = distance(&a, &b).unwrap();
		let reference = full_matrix(&a, &b);
		prop_assert_eq!(rolling.to_bits(), reference.to_bits());
	}
}

// ============================================================================
// Selection properties
// ============================================================================

proptest! {
	#![proptest_config(ProptestConfig::with_cases(300))]

	#[test]
	fn prop_selects_first_minimum(names in table_strategy(), pattern in pattern_strategy()) {
		let contents = render_table(&names);
		let mut reported: Vec<String> = Vec::new();
		let found =
			find_best_match(&contents, &pattern, MatchOptions::default(), &mut reported).unwrap();

		let scores: Vec<f64> = names.iter().map(|n| full_matrix(n, &pattern)).collect();
		let best = scores.iter().copied().fold(f64::INFINITY, f64::min);
		let first = scores.iter().position(|&s| s == best).unwrap();

		prop_assert_eq!(found.distance, best);
		prop_assert_eq!(found.line_number, first + 1);
		prop_assert_eq!(basename(found.path), &names[first][..]);
		prop_assert!(reported.is_empty());
	}

	#[test]
	fn prop_show_calculations_keeps_winner(names in table_strategy(), pattern in pattern_strategy()) {
		let contents = render_table(&names);
		let mut quiet: Vec<String> = Vec::new();
		let mut verbose: Vec<String> = Vec::new();

		let fast =
			find_best_match(&contents, &pattern, MatchOptions::default(), &mut quiet).unwrap();
		let full = find_best_match(
			&contents,
			&pattern,
			MatchOptions { show_calculations: true },
			&mut verbose,
		)
		.unwrap();

		prop_assert_eq!(fast, full);
		prop_assert_eq!(verbose.len(), names.len());
	}
}
