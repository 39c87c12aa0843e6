use std::path::Path;
use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;

use crate::Action;
use crate::PlcnormResult;
use crate::members::compile;
use crate::walker::extension;
use crate::walker::read_text;

static ST_CYCLIC: LazyLock<Regex> =
	LazyLock::new(|| compile(r"(?s)PROGRAM\s+_CYCLIC\b(?P<code>.*?)END_PROGRAM"));
static ST_INIT: LazyLock<Regex> =
	LazyLock::new(|| compile(r"(?s)PROGRAM\s+_INIT\b(?P<code>.*?)END_PROGRAM"));
static ST_EXIT: LazyLock<Regex> =
	LazyLock::new(|| compile(r"(?s)PROGRAM\s+_EXIT\b(?P<code>.*?)END_PROGRAM"));
static ST_UNIT: LazyLock<Regex> = LazyLock::new(|| {
	compile(
		r"(?s)\b(FUNCTION_BLOCK|FUNCTION)\s+(?P<name>\w+)\s(?P<code>.*?)(END_FUNCTION_BLOCK|END_FUNCTION)",
	)
});
static ST_ACTION: LazyLock<Regex> =
	LazyLock::new(|| compile(r"(?s)\bACTION\s+(?P<name>[^:]*?)\s*:(?P<code>.*?)END_ACTION"));

static C_CYCLIC: LazyLock<Regex> = LazyLock::new(|| compile(r"void\s+_CYCLIC\s+\w+\s*\([^)]*\)\s*\{"));
static C_INIT: LazyLock<Regex> = LazyLock::new(|| compile(r"void\s+_INIT\s+\w+\s*\([^)]*\)\s*\{"));
static C_EXIT: LazyLock<Regex> = LazyLock::new(|| compile(r"void\s+_EXIT\s+\w+\s*\([^)]*\)\s*\{"));
static C_FUNCTION: LazyLock<Regex> =
	LazyLock::new(|| compile(r"void\s+(?P<name>\w+)\s*\([^)]*\)\s*\{"));

/// Name of the lifecycle action holding a program's initialization code.
pub const INIT_ACTION: &str = "Init";
/// Name of the lifecycle action holding a program's shutdown code.
pub const EXIT_ACTION: &str = "Exit";

/// Source language of a code file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flavour {
	/// `.st` and `.ab` files.
	StructuredText,
	/// `.c` files.
	C,
}

impl Flavour {
	pub fn from_path(path: &Path) -> Option<Self> {
		match extension(path).as_str() {
			"st" | "ab" => Some(Self::StructuredText),
			"c" => Some(Self::C),
			_ => None,
		}
	}
}

/// A loaded code file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeFile {
	pub path: PathBuf,
	pub flavour: Flavour,
	pub content: String,
}

impl CodeFile {
	pub fn new(path: impl Into<PathBuf>, flavour: Flavour, content: impl Into<String>) -> Self {
		Self {
			path: path.into(),
			flavour,
			content: content.into(),
		}
	}

	/// Load every path with a known flavour, keeping their order.
	pub fn load_all<'a>(
		paths: impl IntoIterator<Item = &'a PathBuf>,
		max_file_size: u64,
	) -> PlcnormResult<Vec<Self>> {
		let mut files = Vec::new();
		for path in paths {
			let Some(flavour) = Flavour::from_path(path) else {
				continue;
			};
			files.push(Self::new(path.clone(), flavour, read_text(path, max_file_size)?));
		}

		Ok(files)
	}

	/// Body of the cyclic, init, or exit routine of a program.
	fn routine(&self, routine: Routine) -> Option<&str> {
		match self.flavour {
			Flavour::StructuredText => {
				let regex = match routine {
					Routine::Cyclic => &*ST_CYCLIC,
					Routine::Init => &*ST_INIT,
					Routine::Exit => &*ST_EXIT,
				};
				regex
					.captures(&self.content)
					.and_then(|captures| captures.name("code"))
					.map(|code| code.as_str())
			}
			Flavour::C => {
				let regex = match routine {
					Routine::Cyclic => &*C_CYCLIC,
					Routine::Init => &*C_INIT,
					Routine::Exit => &*C_EXIT,
				};
				regex
					.find(&self.content)
					.and_then(|opener| balanced_body(&self.content, opener.end()))
			}
		}
	}

	/// Body of the function block or function called `name`.
	fn unit_body(&self, name: &str) -> Option<&str> {
		match self.flavour {
			Flavour::StructuredText => {
				ST_UNIT
					.captures_iter(&self.content)
					.find(|captures| captures.name("name").is_some_and(|m| m.as_str() == name))
					.and_then(|captures| captures.name("code"))
					.map(|code| code.as_str())
			}
			Flavour::C => {
				C_FUNCTION
					.captures_iter(&self.content)
					.find(|captures| captures.name("name").is_some_and(|m| m.as_str() == name))
					.and_then(|captures| captures.get(0))
					.and_then(|opener| balanced_body(&self.content, opener.end()))
			}
		}
	}
}

#[derive(Debug, Clone, Copy)]
enum Routine {
	Cyclic,
	Init,
	Exit,
}

/// The entry routines of a program found across its code files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgramBodies {
	pub cyclic: Option<String>,
	pub init: Option<String>,
	pub exit: Option<String>,
}

impl ProgramBodies {
	/// Search the files in order; the first file providing a routine wins.
	pub fn find(files: &[CodeFile]) -> Self {
		let first = |routine: Routine| {
			files
				.iter()
				.find_map(|file| file.routine(routine))
				.map(ToString::to_string)
		};

		Self {
			cyclic: first(Routine::Cyclic),
			init: first(Routine::Init),
			exit: first(Routine::Exit),
		}
	}

	/// `Init` and `Exit` actions for the routines that exist.
	pub fn lifecycle_actions(&self) -> Vec<Action> {
		[(INIT_ACTION, &self.init), (EXIT_ACTION, &self.exit)]
			.into_iter()
			.filter_map(|(name, code)| code.as_ref().map(|code| Action::new(name, code.clone())))
			.collect()
	}
}

/// Find the implementation of a function block or function. The first file
/// and the first block with a matching name win.
pub fn find_unit_body(name: &str, files: &[CodeFile]) -> Option<String> {
	files
		.iter()
		.find_map(|file| file.unit_body(name))
		.map(ToString::to_string)
}

/// Collect every `ACTION name: … END_ACTION` of the Structured Text files.
pub fn collect_actions(files: &[CodeFile]) -> Vec<Action> {
	files
		.iter()
		.filter(|file| file.flavour == Flavour::StructuredText)
		.flat_map(|file| ST_ACTION.captures_iter(&file.content))
		.filter_map(|captures| {
			let name = captures.name("name")?.as_str().trim();
			let code = captures.name("code")?.as_str();
			Some(Action::new(name, code))
		})
		.collect()
}

/// Text between the `{` ending at `start` and its matching `}`.
///
/// Braces inside comments, string literals, and character literals are not
/// counted.
pub(crate) fn balanced_body(content: &str, start: usize) -> Option<&str> {
	let bytes = content.as_bytes();
	let mut depth = 1usize;
	let mut index = start;

	while index < bytes.len() {
		match bytes[index] {
			b'/' if bytes.get(index + 1) == Some(&b'/') => {
				index = content[index..]
					.find('\n')
					.map_or(bytes.len(), |offset| index + offset);
				continue;
			}
			b'/' if bytes.get(index + 1) == Some(&b'*') => {
				index = content[index + 2..]
					.find("*/")
					.map_or(bytes.len(), |offset| index + 2 + offset + 2);
				continue;
			}
			quote @ (b'"' | b'\'') => {
				index += 1;
				while index < bytes.len() && bytes[index] != quote {
					if bytes[index] == b'\\' {
						index += 1;
					}
					index += 1;
				}
			}
			b'{' => depth += 1,
			b'}' => {
				depth -= 1;
				if depth == 0 {
					return Some(&content[start..index]);
				}
			}
			_ => {}
		}
		index += 1;
	}

	None
}
