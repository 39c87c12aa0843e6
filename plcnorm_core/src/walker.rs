use std::collections::HashSet;
use std::path::Path;
use std::path::PathBuf;

use crate::PlcnormError;
use crate::PlcnormResult;

/// Marker file extensions that turn a directory into a namespace.
pub const NAMESPACE_MARKERS: [&str; 2] = ["lby", "prg"];

/// Library marker that only describes a precompiled library.
pub const BINARY_LIBRARY: &str = "binary.lby";

/// Recursively collect every file under `root`, sorted by path.
///
/// Hidden entries are skipped. A symlink leading back to a directory on the
/// current path is reported as [`PlcnormError::SymlinkCycle`]; a directory
/// reached through two sibling links is walked twice.
pub fn collect_files(root: &Path) -> PlcnormResult<Vec<PathBuf>> {
	let mut files = Vec::new();
	let mut ancestors = HashSet::new();
	walk_dir(root, &mut files, &mut ancestors)?;
	files.sort();

	Ok(files)
}

fn walk_dir(
	dir: &Path,
	files: &mut Vec<PathBuf>,
	ancestors: &mut HashSet<PathBuf>,
) -> PlcnormResult<()> {
	if !dir.is_dir() {
		return Ok(());
	}

	// Canonical paths of the directories being walked, root to `dir`.
	let canonical = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
	if !ancestors.insert(canonical.clone()) {
		return Err(PlcnormError::SymlinkCycle {
			path: dir.display().to_string(),
		});
	}

	let mut entries = std::fs::read_dir(dir)?
		.map(|entry| entry.map(|entry| entry.path()))
		.collect::<Result<Vec<_>, _>>()?;
	entries.sort();

	for path in entries {
		let hidden = path
			.file_name()
			.and_then(|name| name.to_str())
			.is_some_and(|name| name.starts_with('.'));
		if hidden {
			continue;
		}

		if path.is_dir() {
			walk_dir(&path, files, ancestors)?;
		} else {
			files.push(path);
		}
	}

	ancestors.remove(&canonical);
	Ok(())
}

/// Lower-cased extension of a path, empty when there is none.
pub fn extension(path: &Path) -> String {
	path.extension()
		.and_then(|ext| ext.to_str())
		.unwrap_or_default()
		.to_ascii_lowercase()
}

/// `true` for `.lby` and `.prg` files other than `binary.lby`.
pub fn is_namespace_marker(path: &Path) -> bool {
	let is_binary = path
		.file_name()
		.and_then(|name| name.to_str())
		.is_some_and(|name| name.eq_ignore_ascii_case(BINARY_LIBRARY));

	!is_binary && NAMESPACE_MARKERS.contains(&extension(path).as_str())
}

/// `true` when `dir` directly contains a `.lby` or `.prg` file.
pub fn has_namespace_marker(dir: &Path) -> bool {
	std::fs::read_dir(dir).is_ok_and(|entries| {
		entries.flatten().any(|entry| {
			let path = entry.path();
			path.is_file() && NAMESPACE_MARKERS.contains(&extension(&path).as_str())
		})
	})
}

/// Files of one namespace directory partitioned by role.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceFiles {
	/// `.var` variable declarations.
	pub var: Vec<PathBuf>,
	/// `.typ` type declarations.
	pub typ: Vec<PathBuf>,
	/// `.st` and `.ab` Structured Text sources.
	pub st: Vec<PathBuf>,
	/// `.c` sources.
	pub c: Vec<PathBuf>,
	/// `.fun` unit declarations.
	pub fun: Vec<PathBuf>,
}

impl SourceFiles {
	/// Partition files by extension, keeping their order. Other files are
	/// dropped.
	pub fn partition(files: impl IntoIterator<Item = PathBuf>) -> Self {
		let mut sources = Self::default();

		for path in files {
			match extension(&path).as_str() {
				"var" => sources.var.push(path),
				"typ" => sources.typ.push(path),
				"st" | "ab" => sources.st.push(path),
				"c" => sources.c.push(path),
				"fun" => sources.fun.push(path),
				_ => {}
			}
		}

		sources
	}

	/// All code files, Structured Text first.
	pub fn code_files(&self) -> impl Iterator<Item = &PathBuf> {
		self.st.iter().chain(&self.c)
	}
}

/// Read a text file, replacing invalid utf-8 and normalizing line endings.
pub fn read_text(path: &Path, max_file_size: u64) -> PlcnormResult<String> {
	let size = std::fs::metadata(path)?.len();
	if size > max_file_size {
		return Err(PlcnormError::FileTooLarge {
			path: path.display().to_string(),
			size,
			limit: max_file_size,
		});
	}

	let bytes = std::fs::read(path)?;
	Ok(normalize_line_endings(&String::from_utf8_lossy(&bytes)))
}

/// Normalize CRLF line endings to LF.
pub fn normalize_line_endings(content: &str) -> String {
	if content.contains('\r') {
		content.replace("\r\n", "\n").replace('\r', "\n")
	} else {
		content.to_string()
	}
}
