use crate::error::{HopError, Result};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// Largest table accepted unless configured otherwise (1 MiB).
pub const DEFAULT_MAX_TABLE_BYTES: u64 = 1024 * 1024;

/// How a table file is opened and locked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
	/// Read-only, shared lock.
	Read,
	/// Read-write, created if missing, exclusive lock.
	Write,
}

/// An open, locked table file.
///
/// The advisory lock is held until the value is dropped, covering the whole
/// read-modify-write window of an add or remove.
#[derive(Debug)]
pub struct TableFile {
	file: File,
	path: PathBuf,
	max_bytes: u64,
}

impl TableFile {
	/// Open and lock the table at `path`.
	///
	/// With [`Access::Write`] the parent directory and the file are created
	/// if they do not exist.
	pub fn open(path: &Path, access: Access, max_bytes: u64) -> Result<Self> {
		let read_err = |source| HopError::TableRead {
			path: path.to_path_buf(),
			source,
		};

		let file = match access {
			Access::Read => File::open(path).map_err(read_err)?,
			Access::Write => {
				if let Some(parent) = path.parent()
					&& !parent.as_os_str().is_empty()
				{
					std::fs::create_dir_all(parent).map_err(|source| HopError::TableWrite {
						path: path.to_path_buf(),
						source,
					})?;
				}
				OpenOptions::new()
					.read(true)
					.write(true)
					.create(true)
					.truncate(false)
					.open(path)
					.map_err(|source| HopError::TableWrite {
						path: path.to_path_buf(),
						source,
					})?
			}
		};

		let locked = match access {
			Access::Read => file.lock_shared(),
			Access::Write => file.lock(),
		};
		locked.map_err(|source| HopError::TableLock {
			path: path.to_path_buf(),
			source,
		})?;

		tracing::debug!(path = %path.display(), ?access, "opened table");

		Ok(TableFile {
			file,
			path: path.to_path_buf(),
			max_bytes,
		})
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	/// Read the whole table from the start.
	///
	/// Fails with [`HopError::TableTooLarge`] rather than truncating when
	/// the file exceeds the size cap.
	pub fn read_all(&mut self) -> Result<Vec<u8>> {
		self.file
			.seek(SeekFrom::Start(0))
			.map_err(|source| self.read_error(source))?;

		let mut contents = Vec::new();
		(&self.file)
			.take(self.max_bytes.saturating_add(1))
			.read_to_end(&mut contents)
			.map_err(|source| self.read_error(source))?;

		if contents.len() as u64 > self.max_bytes {
			return Err(HopError::TableTooLarge {
				path: self.path.clone(),
				limit: self.max_bytes,
			});
		}

		tracing::debug!(path = %self.path.display(), bytes = contents.len(), "read table");
		Ok(contents)
	}

	/// Append `line` followed by a newline at the end of the file.
	///
	/// With `separate` set, a newline is written first so the entry does not
	/// run into an unterminated last line.
	pub fn write_line(&mut self, line: &[u8], separate: bool) -> Result<()> {
		let mut buf = Vec::with_capacity(line.len() + 2);
		if separate {
			buf.push(b'\n');
		}
		buf.extend_from_slice(line);
		buf.push(b'\n');

		self.file
			.seek(SeekFrom::End(0))
			.and_then(|_| self.file.write_all(&buf))
			.and_then(|_| self.file.flush())
			.map_err(|source| self.write_error(source))?;

		tracing::debug!(path = %self.path.display(), "appended table entry");
		Ok(())
	}

	/// Replace the file's contents with `lines`, each newline-terminated.
	///
	/// The file is truncated before the lines are streamed back, so an
	/// interrupted rewrite leaves only the lines written so far.
	pub fn truncate_and_rewrite(&mut self, lines: &[&[u8]]) -> Result<()> {
		self.file
			.seek(SeekFrom::Start(0))
			.and_then(|_| self.file.set_len(0))
			.map_err(|source| self.write_error(source))?;

		let mut writer = BufWriter::new(&self.file);
		for line in lines {
			writer
				.write_all(line)
				.and_then(|_| writer.write_all(b"\n"))
				.map_err(|source| self.write_error(source))?;
		}
		writer.flush().map_err(|source| self.write_error(source))?;

		tracing::debug!(path = %self.path.display(), lines = lines.len(), "rewrote table");
		Ok(())
	}

	fn read_error(&self, source: std::io::Error) -> HopError {
		HopError::TableRead {
			path: self.path.clone(),
			source,
		}
	}

	fn write_error(&self, source: std::io::Error) -> HopError {
		HopError::TableWrite {
			path: self.path.clone(),
			source,
		}
	}
}

/// Read the table at `path` under a shared lock.
///
/// A table that does not exist yet reads as empty.
pub fn read_existing(path: &Path, max_bytes: u64) -> Result<Vec<u8>> {
	match TableFile::open(path, Access::Read, max_bytes) {
		Ok(mut table) => table.read_all(),
		Err(HopError::TableRead { source, .. }) if source.kind() == ErrorKind::NotFound => {
			tracing::debug!(path = %path.display(), "table does not exist yet");
			Ok(Vec::new())
		}
		Err(e) => Err(e),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_read_existing_missing_file_is_empty() {
		let temp_dir = tempfile::tempdir().unwrap();
		let path = temp_dir.path().join("table");

		let contents = read_existing(&path, DEFAULT_MAX_TABLE_BYTES).unwrap();
		assert!(contents.is_empty());
		assert!(!path.exists());
	}

	#[test]
	fn test_write_access_creates_parent_dirs() {
		let temp_dir = tempfile::tempdir().unwrap();
		let path = temp_dir.path().join("nested/dir/table");

		let mut table = TableFile::open(&path, Access::Write, DEFAULT_MAX_TABLE_BYTES).unwrap();
		assert!(table.read_all().unwrap().is_empty());
		assert!(path.exists());
		assert_eq!(table.path(), path);
	}

	#[test]
	fn test_write_line_appends() {
		let temp_dir = tempfile::tempdir().unwrap();
		let path = temp_dir.path().join("table");
		std::fs::write(&path, "/a\n").unwrap();

		let mut table = TableFile::open(&path, Access::Write, DEFAULT_MAX_TABLE_BYTES).unwrap();
		table.read_all().unwrap();
		table.write_line(b"/b", false).unwrap();
		drop(table);

		assert_eq!(std::fs::read(&path).unwrap(), b"/a\n/b\n");
	}

	#[test]
	fn test_write_line_with_separator() {
		let temp_dir = tempfile::tempdir().unwrap();
		let path = temp_dir.path().join("table");
		std::fs::write(&path, "/a").unwrap();

		let mut table = TableFile::open(&path, Access::Write, DEFAULT_MAX_TABLE_BYTES).unwrap();
		table.write_line(b"/b", true).unwrap();
		drop(table);

		assert_eq!(std::fs::read(&path).unwrap(), b"/a\n/b\n");
	}

	#[test]
	fn test_truncate_and_rewrite_shrinks_file() {
		let temp_dir = tempfile::tempdir().unwrap();
		let path = temp_dir.path().join("table");
		std::fs::write(&path, "/a/long/path\n/b\n/c\n").unwrap();

		let mut table = TableFile::open(&path, Access::Write, DEFAULT_MAX_TABLE_BYTES).unwrap();
		table.read_all().unwrap();
		table.truncate_and_rewrite(&[&b"/b"[..], &b"/c"[..]]).unwrap();
		drop(table);

		assert_eq!(std::fs::read(&path).unwrap(), b"/b\n/c\n");
	}

	#[test]
	fn test_oversize_table_fails_closed() {
		let temp_dir = tempfile::tempdir().unwrap();
		let path = temp_dir.path().join("table");
		std::fs::write(&path, "/0123456789\n").unwrap();

		let result = read_existing(&path, 8);
		match result.unwrap_err() {
			HopError::TableTooLarge { limit, .. } => assert_eq!(limit, 8),
			other => panic!("Expected TableTooLarge error, got {other:?}"),
		}
	}

	#[test]
	fn test_table_exactly_at_limit_is_accepted() {
		let temp_dir = tempfile::tempdir().unwrap();
		let path = temp_dir.path().join("table");
		std::fs::write(&path, "/abcdef\n").unwrap();

		assert_eq!(read_existing(&path, 8).unwrap(), b"/abcdef\n");
	}
}
