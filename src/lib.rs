//! Hop - jump to directories by fuzzy-matching their names.
//!
//! This library provides the core functionality for hop, including:
//! - A position-weighted edit distance favouring prefix matches
//! - Scanning the path table for the entry closest to a pattern
//! - Adding and removing table entries under a file lock
//! - Config and table location discovery
//! - Starting the user's shell in the matched directory
//!
//! # Example
//!
//! ```no_run
//! use hop_cli::table::{MatchOptions, find_best_match, read_existing};
//! use std::path::Path;
//!
//! let contents = read_existing(Path::new("/home/me/.local/share/hop/table"), 1 << 20).unwrap();
//! let mut diagnostics: Vec<String> = Vec::new();
//! let found = find_best_match(&contents, b"proj", MatchOptions::default(), &mut diagnostics).unwrap();
//!
//! println!("{} (distance {})", found.to_path_buf().display(), found.distance);
//! ```

pub mod config;
pub mod distance;
pub mod error;
pub mod exec;
pub mod table;

pub use error::{HopError, Result};
