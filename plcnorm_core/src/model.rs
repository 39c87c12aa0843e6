use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

/// Name of the namespace that holds everything not attached to a library or
/// program. Every [`Project`] contains exactly one.
pub const GLOBAL_NAMESPACE: &str = "Global";

/// Version reported when an input does not declare one.
pub const DEFAULT_VERSION: &str = "1.0-0";

/// A normalized PLC project.
///
/// The first namespace is always [`GLOBAL_NAMESPACE`], followed by the
/// library, program, or device namespaces of the input in discovery order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
	pub info: ProjectInfo,
	pub namespaces: Vec<Namespace>,
}

impl Project {
	/// The global namespace.
	pub fn global(&self) -> Option<&Namespace> {
		self.namespace(GLOBAL_NAMESPACE)
	}

	/// Look up a namespace by name.
	pub fn namespace(&self, name: &str) -> Option<&Namespace> {
		self.namespaces.iter().find(|ns| ns.name == name)
	}

	/// Names of all namespaces in output order.
	pub fn namespace_names(&self) -> Vec<&str> {
		self.namespaces.iter().map(|ns| ns.name.as_str()).collect()
	}
}

/// Header information describing where a project came from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInfo {
	pub company_name: String,
	#[serde(rename = "companyURL")]
	pub company_url: String,
	pub project_name: String,
	pub project_version: String,
	#[serde(rename = "projectURL")]
	pub project_url: String,
	pub contact_person: String,
	pub content_description: String,
	/// Generation or modification timestamp. This is the only field that may
	/// differ between two extractions of unchanged input.
	pub content_generated: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub enum NamespaceKind {
	Library,
	ProgramNamespace,
}

impl fmt::Display for NamespaceKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Library => f.write_str("library"),
			Self::ProgramNamespace => f.write_str("program namespace"),
		}
	}
}

/// A named grouping of units and data types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Namespace {
	pub name: String,
	#[serde(rename = "type")]
	pub kind: NamespaceKind,
	pub version: String,
	#[serde(default)]
	pub description: String,
	#[serde(default)]
	pub language: String,
	pub dependencies: Vec<String>,
	#[serde(rename = "prgs")]
	pub programs: Vec<Pou>,
	#[serde(rename = "fbs")]
	pub function_blocks: Vec<Pou>,
	#[serde(rename = "fcs")]
	pub functions: Vec<Pou>,
	#[serde(rename = "class")]
	pub classes: Vec<Pou>,
	#[serde(rename = "dts")]
	pub data_types: Vec<DataType>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub vars: Vec<VariableList>,
}

impl Namespace {
	/// An empty namespace with the default version.
	pub fn new(name: impl Into<String>, kind: NamespaceKind) -> Self {
		Self {
			name: name.into(),
			kind,
			version: DEFAULT_VERSION.to_string(),
			description: String::new(),
			language: String::new(),
			dependencies: Vec::new(),
			programs: Vec::new(),
			function_blocks: Vec::new(),
			functions: Vec::new(),
			classes: Vec::new(),
			data_types: Vec::new(),
			vars: Vec::new(),
		}
	}

	/// Sort a unit into the sequence matching its kind.
	pub fn push_pou(&mut self, pou: Pou) {
		match pou.kind {
			PouKind::Program => self.programs.push(pou),
			PouKind::FunctionBlock => self.function_blocks.push(pou),
			PouKind::Function => self.functions.push(pou),
			PouKind::Class => self.classes.push(pou),
		}
	}

	/// `true` when the namespace owns no unit, data type, or variable list.
	pub fn is_empty(&self) -> bool {
		self.programs.is_empty()
			&& self.function_blocks.is_empty()
			&& self.functions.is_empty()
			&& self.classes.is_empty()
			&& self.data_types.is_empty()
			&& self.vars.is_empty()
	}

	/// All units in the order programs, function blocks, functions, classes.
	pub fn pous(&self) -> impl Iterator<Item = &Pou> {
		self.programs
			.iter()
			.chain(&self.function_blocks)
			.chain(&self.functions)
			.chain(&self.classes)
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PouKind {
	Program,
	FunctionBlock,
	Function,
	Class,
}

impl fmt::Display for PouKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Program => f.write_str("program"),
			Self::FunctionBlock => f.write_str("function block"),
			Self::Function => f.write_str("function"),
			Self::Class => f.write_str("class"),
		}
	}
}

/// A program organization unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pou {
	pub name: String,
	#[serde(rename = "type")]
	pub kind: PouKind,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub return_type: Option<String>,
	pub description: String,
	pub interface: Vec<InterfaceBlock>,
	pub main_code: String,
	pub actions: Vec<Action>,
	pub methods: Vec<Method>,
}

impl Pou {
	pub fn new(name: impl Into<String>, kind: PouKind) -> Self {
		Self {
			name: name.into(),
			kind,
			return_type: None,
			description: String::new(),
			interface: Vec::new(),
			main_code: String::new(),
			actions: Vec::new(),
			methods: Vec::new(),
		}
	}

	/// Find the first interface block of the given kind.
	pub fn block(&self, kind: BlockKind) -> Option<&InterfaceBlock> {
		self.interface.iter().find(|block| block.kind == kind)
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockKind {
	#[serde(rename = "VAR_INPUT")]
	Input,
	#[serde(rename = "VAR_OUTPUT")]
	Output,
	#[serde(rename = "VAR_IN_OUT")]
	InOut,
	#[serde(rename = "VAR")]
	Local,
	#[serde(rename = "VAR_TEMP")]
	Temp,
	#[serde(rename = "VAR_EXTERNAL")]
	External,
	#[serde(rename = "VAR_GLOBAL")]
	Global,
	#[serde(rename = "VAR_ACCESS")]
	Access,
}

impl BlockKind {
	/// The IEC 61131-3 keyword opening this block.
	pub fn keyword(self) -> &'static str {
		match self {
			Self::Input => "VAR_INPUT",
			Self::Output => "VAR_OUTPUT",
			Self::InOut => "VAR_IN_OUT",
			Self::Local => "VAR",
			Self::Temp => "VAR_TEMP",
			Self::External => "VAR_EXTERNAL",
			Self::Global => "VAR_GLOBAL",
			Self::Access => "VAR_ACCESS",
		}
	}
}

impl fmt::Display for BlockKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.keyword())
	}
}

/// Qualifier attached to a whole variable block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockAttribute {
	#[default]
	#[serde(rename = "")]
	None,
	#[serde(rename = "retain")]
	Retain,
	#[serde(rename = "constant")]
	Constant,
	#[serde(rename = "nonretain")]
	NonRetain,
	#[serde(rename = "persistent")]
	Persistent,
	#[serde(rename = "nonpersistent")]
	NonPersistent,
}

impl BlockAttribute {
	/// Attributes in the order they are probed on xml variable lists.
	pub const QUALIFIERS: [Self; 5] = [
		Self::Constant,
		Self::Retain,
		Self::NonRetain,
		Self::Persistent,
		Self::NonPersistent,
	];

	pub fn as_str(self) -> &'static str {
		match self {
			Self::None => "",
			Self::Retain => "retain",
			Self::Constant => "constant",
			Self::NonRetain => "nonretain",
			Self::Persistent => "persistent",
			Self::NonPersistent => "nonpersistent",
		}
	}

	pub fn is_none(self) -> bool {
		self == Self::None
	}
}

impl fmt::Display for BlockAttribute {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for BlockAttribute {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let trimmed = s.trim();
		if trimmed.is_empty() {
			return Ok(Self::None);
		}

		match trimmed.to_ascii_lowercase().as_str() {
			"retain" => Ok(Self::Retain),
			"constant" => Ok(Self::Constant),
			"nonretain" | "non_retain" => Ok(Self::NonRetain),
			"persistent" => Ok(Self::Persistent),
			"nonpersistent" | "non_persistent" => Ok(Self::NonPersistent),
			other => Err(format!("unknown block attribute `{other}`")),
		}
	}
}

/// One typed group of variable declarations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceBlock {
	pub kind: BlockKind,
	pub attribute: BlockAttribute,
	pub vars: Vec<Variable>,
}

impl InterfaceBlock {
	pub fn new(kind: BlockKind, attribute: BlockAttribute, vars: Vec<Variable>) -> Self {
		Self {
			kind,
			attribute,
			vars,
		}
	}
}

/// A declared variable, struct field, or enumeration member.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variable {
	pub name: String,
	/// Free-form type expression, e.g. `ARRAY[0..9] OF INT`. Empty for
	/// enumeration members.
	#[serde(rename = "type")]
	pub type_name: String,
	pub attribute: String,
	/// Empty means "not specified".
	pub initial_value: String,
	pub description: String,
	/// Documentation comments following the description.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub notes: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BaseType {
	Struct,
	Enumeration,
}

impl fmt::Display for BaseType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Struct => f.write_str("struct"),
			Self::Enumeration => f.write_str("enumeration"),
		}
	}
}

/// A user-defined structure or enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataType {
	pub name: String,
	pub base_type: BaseType,
	pub description: String,
	/// Redundancy marker of a structure, e.g. `{REDUND_UNREPLICABLE}`.
	#[serde(default)]
	pub attribute: String,
	/// Default member of an enumeration.
	#[serde(default)]
	pub initial_value: String,
	pub components: Vec<Variable>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub notes: Vec<String>,
}

impl DataType {
	pub fn new(name: impl Into<String>, base_type: BaseType) -> Self {
		Self {
			name: name.into(),
			base_type,
			description: String::new(),
			attribute: String::new(),
			initial_value: String::new(),
			components: Vec::new(),
			notes: Vec::new(),
		}
	}
}

/// A named sub-routine local to a unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
	pub name: String,
	pub code: String,
}

impl Action {
	pub fn new(name: impl Into<String>, code: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			code: code.into(),
		}
	}
}

/// An object-oriented method of a function block or class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Method {
	pub name: String,
	pub return_type: String,
	pub description: String,
	pub code: String,
	pub interface: Vec<InterfaceBlock>,
}

/// Global variables declared in one file outside of any unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableList {
	pub name: String,
	pub blocks: Vec<InterfaceBlock>,
}
