use std::sync::LazyLock;

use regex::Regex;

use crate::BaseType;
use crate::DataType;
use crate::InterfaceBlock;
use crate::PlcnormError;
use crate::PlcnormResult;
use crate::PouKind;
use crate::Variable;
use crate::members::comment_notes;
use crate::members::compile;
use crate::members::group;
use crate::members::parse_interface;
use crate::members::scan_struct_members;
use crate::type_split::split_type_region;

const TRAILING_DOCS: &str =
	r"((\(\*(?P<desc1>.*?)\*\)\s*)?(\(\*(?P<desc2>.*?)\*\)\s*)?(\(\*(?P<desc3>.*?)\*\)\s*)?)";

static FUNCTION_BLOCK_DECL: LazyLock<Regex> = LazyLock::new(|| {
	compile(
		r"(?s)(\{REDUND_(OK|ERROR)\})?\s*\bFUNCTION_BLOCK\s+(?P<name>\w+)[ \t]*(\(\*(?P<desc>.*?)\*\))?(?P<interface>.*?)\bEND_FUNCTION_BLOCK",
	)
});
static FUNCTION_DECL: LazyLock<Regex> = LazyLock::new(|| {
	compile(
		r"(?s)(\{REDUND_(OK|ERROR)\})?\s*\bFUNCTION\s+(?P<name>\w+)\s*:\s*(?P<ret>[^\s(]+)[ \t]*(\(\*(?P<desc>.*?)\*\))?(?P<interface>.*?)\bEND_FUNCTION\b",
	)
});
static TYPE_REGION: LazyLock<Regex> = LazyLock::new(|| compile(r"(?s)\bTYPE\s(?P<body>.*?)\bEND_TYPE"));
static STRUCT_DECL: LazyLock<Regex> = LazyLock::new(|| {
	compile(&format!(
		r"(?s)(\s*(?P<name>.*?)\s*):(\s*(?P<redund>\{{.*?\}})\s*)?(\s*STRUCT\s*){TRAILING_DOCS}(?P<data>.*?)(END_STRUCT;)"
	))
});
static ENUM_DECL: LazyLock<Regex> = LazyLock::new(|| {
	compile(&format!(
		r"(?s)(\s*(?P<name>.*?)\s*):(\s*\()\s*{TRAILING_DOCS}(?P<data>.*?)(\);|\)\s*?:=(\s*(?P<initial>.*?)\s*);)"
	))
});
static ENUM_TOKEN: LazyLock<Regex> =
	LazyLock::new(|| compile(r"(?s)\(\*(?P<comment>.*?)\*\)|(?P<comma>,)|(?P<newline>\n)|(?P<text>[^,\n(]+|\()"));

/// A function block or function declared in a `.fun` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitDeclaration {
	pub name: String,
	pub kind: PouKind,
	pub return_type: Option<String>,
	pub description: String,
	pub interface: Vec<InterfaceBlock>,
}

/// Parse the unit declarations of a `.fun` file: function blocks first, then
/// functions, each in source order.
pub fn parse_unit_declarations(text: &str) -> Vec<UnitDeclaration> {
	let function_blocks = FUNCTION_BLOCK_DECL.captures_iter(text).map(|captures| {
		UnitDeclaration {
			name: group(&captures, "name"),
			kind: PouKind::FunctionBlock,
			return_type: None,
			description: group(&captures, "desc"),
			interface: parse_interface(captures.name("interface").map_or("", |m| m.as_str())),
		}
	});
	let functions = FUNCTION_DECL.captures_iter(text).map(|captures| {
		UnitDeclaration {
			name: group(&captures, "name"),
			kind: PouKind::Function,
			return_type: Some(group(&captures, "ret")),
			description: group(&captures, "desc"),
			interface: parse_interface(captures.name("interface").map_or("", |m| m.as_str())),
		}
	});

	function_blocks.chain(functions).collect()
}

/// Parse every `TYPE … END_TYPE` region of a `.typ` file. Within a region
/// structures come before enumerations.
pub fn parse_type_declarations(path: &str, text: &str) -> PlcnormResult<Vec<DataType>> {
	let mut data_types = Vec::new();

	for region in TYPE_REGION.captures_iter(text) {
		let body = region.name("body").map_or("", |m| m.as_str());
		let split = split_type_region(body);

		if let Some((kind, line)) = split.unterminated {
			return Err(PlcnormError::UnterminatedTypeRegion {
				kind: kind.to_string(),
				path: path.to_string(),
				line,
			});
		}

		data_types.extend(STRUCT_DECL.captures_iter(&split.structs).map(|captures| {
			DataType {
				name: group(&captures, "name"),
				base_type: BaseType::Struct,
				description: group(&captures, "desc1"),
				attribute: group(&captures, "redund"),
				initial_value: String::new(),
				components: scan_struct_members(captures.name("data").map_or("", |m| m.as_str())),
				notes: comment_notes(&captures),
			}
		}));
		data_types.extend(ENUM_DECL.captures_iter(&split.enums).map(|captures| {
			DataType {
				name: group(&captures, "name"),
				base_type: BaseType::Enumeration,
				description: group(&captures, "desc1"),
				attribute: String::new(),
				initial_value: group(&captures, "initial"),
				components: scan_enum_members(captures.name("data").map_or("", |m| m.as_str())),
				notes: comment_notes(&captures),
			}
		}));
	}

	Ok(data_types)
}

/// Scan the members of an enumeration body: `name [:= value]` separated by
/// commas or line breaks.
///
/// A comment on the same line as a member documents it: the first becomes
/// the description, later ones become notes.
pub fn scan_enum_members(data: &str) -> Vec<Variable> {
	let mut members: Vec<Variable> = Vec::new();
	let mut pending = String::new();
	let mut documented: Option<usize> = None;

	let finish = |pending: &mut String, members: &mut Vec<Variable>| -> Option<usize> {
		let text = std::mem::take(pending);
		let (name, initial) = text.split_once(":=").unwrap_or((text.as_str(), ""));
		let name = name.trim();
		if name.is_empty() {
			return None;
		}

		members.push(Variable {
			name: name.to_string(),
			initial_value: initial.trim().to_string(),
			..Variable::default()
		});
		Some(members.len() - 1)
	};

	for captures in ENUM_TOKEN.captures_iter(data) {
		if let Some(comment) = captures.name("comment") {
			if let Some(index) = finish(&mut pending, &mut members) {
				documented = Some(index);
			}
			if let Some(member) = documented.and_then(|index| members.get_mut(index)) {
				let comment = comment.as_str().trim().to_string();
				if member.description.is_empty() {
					member.description = comment;
				} else if member.notes.len() < 2 {
					member.notes.push(comment);
				}
			}
		} else if captures.name("comma").is_some() {
			documented = finish(&mut pending, &mut members).or(documented);
		} else if captures.name("newline").is_some() {
			finish(&mut pending, &mut members);
			documented = None;
		} else if let Some(text) = captures.name("text") {
			pending.push_str(text.as_str());
		}
	}
	finish(&mut pending, &mut members);

	members
}
