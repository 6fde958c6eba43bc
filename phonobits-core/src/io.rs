use std::fs;
use std::path::{Path, PathBuf};

use crate::error::CorpusError;

/// Reads a text file and returns all its lines as a `Vec<String>`.
///
/// - Reads the entire file into memory
/// - Accepts both `\n` and `\r\n` line endings
/// - A final newline does not produce an extra empty line
pub(crate) fn read_lines<P: AsRef<Path>>(filename: P) -> Result<Vec<String>, CorpusError> {
	let path = filename.as_ref();
	let contents = fs::read_to_string(path).map_err(|e| CorpusError::io(path, e))?;
	Ok(contents.lines().map(str::to_owned).collect())
}

/// Returns the file name (with extension) of a path as a `String`.
///
/// Examples:
/// - `"./translations/verses-spa-Reina.txt"` → `"verses-spa-Reina.txt"`
pub(crate) fn get_filename<P: AsRef<Path>>(input_path: P) -> Result<String, CorpusError> {
	let path = input_path.as_ref();
	let name = path
		.file_name()
		.ok_or_else(|| CorpusError::FileName(path.display().to_string()))?;

	Ok(name.to_string_lossy().to_string())
}

/// Lists all files with a given extension in a directory.
///
/// Returns full paths, sorted so that loading order is stable across platforms.
pub(crate) fn list_files<P: AsRef<Path>>(dir: P, extension: &str) -> Result<Vec<PathBuf>, CorpusError> {
	let dir = dir.as_ref();
	let mut files = Vec::new();

	for entry in fs::read_dir(dir).map_err(|e| CorpusError::io(dir, e))? {
		let entry = entry.map_err(|e| CorpusError::io(dir, e))?;
		let path = entry.path();

		if path.is_file() && path.extension() == Some(std::ffi::OsStr::new(extension)) {
			files.push(path);
		}
	}

	files.sort();
	Ok(files)
}
