use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum PlcnormError {
	#[error(transparent)]
	#[diagnostic(code(plcnorm::io_error))]
	Io(#[from] std::io::Error),

	#[error("failed to read xml in `{path}`: {reason}")]
	#[diagnostic(code(plcnorm::xml))]
	Xml { path: String, reason: String },

	#[error("missing required element `{element}` in {context}")]
	#[diagnostic(
		code(plcnorm::missing_element),
		help("the input does not contain the region this dialect requires")
	)]
	MissingElement { element: String, context: String },

	#[error("unrecognized input: `{path}`")]
	#[diagnostic(
		code(plcnorm::unrecognized_input),
		help(
			"supported inputs: B&R `.apj` projects, PLCopen TC6 v2.00/v2.01 xml, IEC 61131-10 \
			 xml, and pre-normalized `.json` documents"
		)
	)]
	UnrecognizedInput { path: String },

	#[error("no main body found for {kind} `{name}`")]
	#[diagnostic(
		code(plcnorm::missing_main_body),
		help("every program, function block, and function needs an implementation in a source file")
	)]
	MissingMainBody { kind: String, name: String },

	#[error("cyclic action call: {}", chain.join(" -> "))]
	#[diagnostic(
		code(plcnorm::cyclic_action_call),
		help("actions must not call themselves directly or through other actions")
	)]
	CyclicActionCall { chain: Vec<String> },

	#[error("unterminated {kind} declaration in `{path}` starting at: `{line}`")]
	#[diagnostic(
		code(plcnorm::unterminated_type_region),
		help("close the declaration with `END_STRUCT;` or `);` before `END_TYPE`")
	)]
	UnterminatedTypeRegion {
		kind: String,
		path: String,
		line: String,
	},

	#[error("unsupported initializer for `{variable}` in `{owner}`: {shape}")]
	#[diagnostic(
		code(plcnorm::unsupported_initializer),
		help("only simple values and arrays of simple values are extracted")
	)]
	UnsupportedInitializer {
		owner: String,
		variable: String,
		shape: String,
	},

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(plcnorm::config_parse),
		help("check that plcnorm.toml is valid TOML with [namespaces] and/or [initializers] sections")
	)]
	ConfigParse(String),

	#[error("invalid namespace pattern `{pattern}`: {reason}")]
	#[diagnostic(code(plcnorm::invalid_pattern))]
	InvalidPattern { pattern: String, reason: String },

	#[error("failed to load normalized document `{path}`: {reason}")]
	#[diagnostic(code(plcnorm::document))]
	Document { path: String, reason: String },

	#[error("failed to serialize project: {0}")]
	#[diagnostic(code(plcnorm::serialize))]
	Serialize(String),

	#[error("file too large: `{path}` is {size} bytes (limit: {limit} bytes)")]
	#[diagnostic(
		code(plcnorm::file_too_large),
		help("increase the file size limit in plcnorm.toml")
	)]
	FileTooLarge { path: String, size: u64, limit: u64 },

	#[error("symlink cycle detected at: `{path}`")]
	#[diagnostic(
		code(plcnorm::symlink_cycle),
		help("remove the circular symlink from the project tree")
	)]
	SymlinkCycle { path: String },
}

pub type PlcnormResult<T> = Result<T, PlcnormError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
