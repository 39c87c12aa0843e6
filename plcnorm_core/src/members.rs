use std::sync::LazyLock;

use regex::Captures;
use regex::Regex;

use crate::BlockAttribute;
use crate::BlockKind;
use crate::InterfaceBlock;
use crate::Variable;

/// `name : [ {redundancy} ] type ( ';' | ':=' initializer ';' )` followed by
/// up to three `(* comment *)` groups.
const MEMBER_PATTERN: &str = r"(\s*(?P<name>.*?)\s*):(\s*(?P<redund>\{.*?\})?\s*)((?P<type>.*?)\s*)(;\s*|\s*:=\s*(?P<initial>.*?)\s*;\s*)\s*((\(\*(?P<desc1>.*?)\*\)\s*)?(\(\*(?P<desc2>.*?)\*\)\s*)?(\(\*(?P<desc3>.*?)\*\)\s*)?)";

/// Members of a variable block: one declaration per line.
static INTERFACE_MEMBER: LazyLock<Regex> = LazyLock::new(|| compile(MEMBER_PATTERN));

/// Members of a structure body, where comments may span lines.
static STRUCT_MEMBER: LazyLock<Regex> = LazyLock::new(|| compile(&format!("(?s){MEMBER_PATTERN}")));

/// One grammar rule per variable block kind found in vendor declaration files.
struct BlockRule {
	kind: BlockKind,
	regex: Regex,
}

impl BlockRule {
	fn new(kind: BlockKind, opener: &str, attributes: &str) -> Self {
		let pattern = format!(
			r"(?s){opener}\s?(?P<attribute>(?:{attributes})\b)?(?P<members>.*?)END_VAR"
		);

		Self {
			kind,
			regex: compile(&pattern),
		}
	}
}

/// Rules in output order: inputs, outputs, in-outs, locals.
static BLOCK_RULES: LazyLock<[BlockRule; 4]> = LazyLock::new(|| {
	[
		BlockRule::new(BlockKind::Input, "VAR_INPUT", "RETAIN"),
		BlockRule::new(BlockKind::Output, "VAR_OUTPUT", "RETAIN"),
		BlockRule::new(BlockKind::InOut, "VAR_IN_OUT", "RETAIN"),
		BlockRule::new(BlockKind::Local, r"\bVAR\s", "RETAIN|CONSTANT"),
	]
});

pub(crate) fn compile(pattern: &str) -> Regex {
	Regex::new(pattern).unwrap_or_else(|e| panic!("invalid built-in pattern `{pattern}`: {e}"))
}

/// Scan a region of member declarations, applying `attribute` to every
/// variable found.
///
/// Members are returned in source order. A region without any declaration
/// yields an empty sequence.
pub fn scan_members(region: &str, attribute: &str) -> Vec<Variable> {
	INTERFACE_MEMBER
		.captures_iter(region)
		.map(|captures| {
			let mut variable = member_from_captures(&captures);
			variable.attribute = attribute.to_string();
			variable
		})
		.collect()
}

/// Scan the body of a structure declaration. Each component carries its own
/// redundancy marker as attribute.
pub fn scan_struct_members(region: &str) -> Vec<Variable> {
	STRUCT_MEMBER
		.captures_iter(region)
		.map(|captures| {
			let mut variable = member_from_captures(&captures);
			variable.attribute = group(&captures, "redund");
			variable
		})
		.collect()
}

/// Parse every `VAR … END_VAR` block of a declaration text.
///
/// Each block kind is matched independently over the whole text, so blocks
/// are grouped by kind first and by position second.
pub fn parse_interface(text: &str) -> Vec<InterfaceBlock> {
	let mut blocks = Vec::new();

	for rule in BLOCK_RULES.iter() {
		for captures in rule.regex.captures_iter(text) {
			let keyword = group(&captures, "attribute");
			let attribute = keyword.parse().unwrap_or(BlockAttribute::None);
			let members = captures.name("members").map_or("", |m| m.as_str());
			let vars = scan_members(members, attribute.as_str());
			blocks.push(InterfaceBlock::new(rule.kind, attribute, vars));
		}
	}

	blocks
}

fn member_from_captures(captures: &Captures<'_>) -> Variable {
	Variable {
		name: group(captures, "name"),
		type_name: group(captures, "type"),
		attribute: String::new(),
		initial_value: group(captures, "initial"),
		description: group(captures, "desc1"),
		notes: comment_notes(captures),
	}
}

/// The second and third trailing comments, skipping absent ones.
pub(crate) fn comment_notes(captures: &Captures<'_>) -> Vec<String> {
	["desc2", "desc3"]
		.into_iter()
		.map(|name| group(captures, name))
		.filter(|note| !note.is_empty())
		.collect()
}

/// Trimmed text of a named group, empty when the group did not take part.
pub(crate) fn group(captures: &Captures<'_>, name: &str) -> String {
	captures
		.name(name)
		.map(|m| m.as_str().trim().to_string())
		.unwrap_or_default()
}
