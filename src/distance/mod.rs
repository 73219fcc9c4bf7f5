//! Position-weighted edit distance.
//!
//! Strings are reconciled with single-byte insertions and deletions only.
//! Touching the byte at 1-based position `k` of its own string costs `1/k`,
//! so edits near the start of a name weigh far more than edits near the end.
//! A pattern that is a prefix of a name therefore scores close to zero,
//! while one that misses the first letter costs at least `1.0`.
//!
//! There is no substitution primitive: two differing bytes can only be
//! lined up by deleting one and inserting the other.

use crate::error::{HopError, Result};

/// Compute the weighted insertion/deletion distance between `a` and `b`.
///
/// The result is `0.0` exactly when the inputs are byte-identical and is
/// symmetric in its arguments. Runs in `O(|a|·|b|)` time and
/// `O(min(|a|, |b|))` space.
///
/// # Errors
///
/// Returns [`HopError::ResourceExhausted`] if the working rows cannot be
/// allocated.
pub fn distance(a: &[u8], b: &[u8]) -> Result<f64> {
	// The recurrence is symmetric, so the shorter input sizes the rows.
	let (outer, inner) = if a.len() >= b.len() { (a, b) } else { (b, a) };

	let mut prev = alloc_row(inner.len() + 1)?;
	let mut curr = alloc_row(inner.len() + 1)?;

	for j in 1..=inner.len() {
		prev[j] = prev[j - 1] + weight(j);
	}

	for i in 1..=outer.len() {
		let wi = weight(i);
		curr[0] = prev[0] + wi;
		for j in 1..=inner.len() {
			curr[j] = if outer[i - 1] == inner[j - 1] {
				prev[j - 1]
			} else {
				(prev[j] + wi).min(curr[j - 1] + weight(j))
			};
		}
		std::mem::swap(&mut prev, &mut curr);
	}

	Ok(prev[inner.len()])
}

/// Cost of inserting or deleting the byte at 1-based position `k`.
fn weight(k: usize) -> f64 {
	1.0 / k as f64
}

fn alloc_row(len: usize) -> Result<Vec<f64>> {
	let mut row = Vec::new();
	row.try_reserve_exact(len)
		.map_err(|source| HopError::ResourceExhausted {
			requested: len,
			source,
		})?;
	row.resize(len, 0.0);
	Ok(row)
}
