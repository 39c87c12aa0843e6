use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::members::compile;

static STRUCT_OPENER: LazyLock<Regex> =
	LazyLock::new(|| compile(r"^.*:\s*(\{.*\})?\s*STRUCT\b"));
static STRUCT_CLOSER: LazyLock<Regex> = LazyLock::new(|| compile(r"^\s*END_STRUCT;"));
static ENUM_OPENER: LazyLock<Regex> = LazyLock::new(|| compile(r"^.*:\s*$"));
static ENUM_CLOSER: LazyLock<Regex> = LazyLock::new(|| compile(r"\)\s*(:=)?.*;\s*$"));

/// Which buffer a line of a type declaration region belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineTag {
	Struct,
	Enum,
}

impl fmt::Display for LineTag {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Struct => f.write_str("structure"),
			Self::Enum => f.write_str("enumeration"),
		}
	}
}

/// State of the line scanner that separates structure declarations from
/// enumeration declarations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SplitState {
	#[default]
	Outside,
	Enum,
	/// Inside a structure. `resume_enum` records whether an enumeration was
	/// still open when the structure started; it becomes active again after
	/// `END_STRUCT;`.
	Struct { resume_enum: bool },
}

impl SplitState {
	/// Advance over one line, returning the next state and the tag of the
	/// line. A line never receives more than one tag.
	pub fn step(self, line: &str) -> (Self, Option<LineTag>) {
		if STRUCT_OPENER.is_match(line) {
			let resume_enum = match self {
				Self::Outside => false,
				Self::Enum => true,
				Self::Struct { resume_enum } => resume_enum,
			};
			return (Self::Struct { resume_enum }, Some(LineTag::Struct));
		}

		if STRUCT_CLOSER.is_match(line) {
			let next = match self {
				Self::Struct { resume_enum: true } | Self::Enum => Self::Enum,
				Self::Struct { resume_enum: false } | Self::Outside => Self::Outside,
			};
			return (next, Some(LineTag::Struct));
		}

		if let Self::Struct { .. } = self {
			return (self, Some(LineTag::Struct));
		}

		if ENUM_OPENER.is_match(line) {
			return (Self::Enum, Some(LineTag::Enum));
		}

		if self == Self::Enum && ENUM_CLOSER.is_match(line) {
			return (Self::Outside, Some(LineTag::Enum));
		}

		match self {
			Self::Enum => (self, Some(LineTag::Enum)),
			_ => (self, None),
		}
	}

	/// The kind of region still open in this state.
	pub fn open_region(self) -> Option<LineTag> {
		match self {
			Self::Outside => None,
			Self::Enum => Some(LineTag::Enum),
			Self::Struct { .. } => Some(LineTag::Struct),
		}
	}
}

/// A type declaration region partitioned into its two kinds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeSplit {
	/// Newline-joined structure lines.
	pub structs: String,
	/// Newline-joined enumeration lines.
	pub enums: String,
	/// Region still open at the end of the input, with the line that opened
	/// it.
	pub unterminated: Option<(LineTag, String)>,
}

/// Partition a `TYPE … END_TYPE` region line by line.
pub fn split_type_region(region: &str) -> TypeSplit {
	let mut state = SplitState::default();
	let mut struct_lines = Vec::new();
	let mut enum_lines = Vec::new();
	let mut opener: Option<&str> = None;
	let mut struct_opener: Option<&str> = None;

	for line in region.lines() {
		let (next, tag) = state.step(line);

		match (state, next) {
			(SplitState::Struct { .. }, SplitState::Struct { .. }) => {}
			(_, SplitState::Struct { .. }) => struct_opener = Some(line),
			(SplitState::Enum, SplitState::Enum) => {}
			(_, SplitState::Enum) if tag == Some(LineTag::Enum) => opener = Some(line),
			_ => {}
		}

		match tag {
			Some(LineTag::Struct) => struct_lines.push(line),
			Some(LineTag::Enum) => enum_lines.push(line),
			None => {}
		}

		state = next;
	}

	let unterminated = match state.open_region() {
		Some(LineTag::Struct) => Some((LineTag::Struct, struct_opener.unwrap_or_default())),
		Some(LineTag::Enum) => Some((LineTag::Enum, opener.unwrap_or_default())),
		None => None,
	}
	.map(|(kind, line)| (kind, line.trim().to_string()));

	TypeSplit {
		structs: struct_lines.join("\n"),
		enums: enum_lines.join("\n"),
		unterminated,
	}
}
