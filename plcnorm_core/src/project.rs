use std::path::Path;

use serde::Deserialize;
use serde::Serialize;

use crate::InputKind;
use crate::PlcnormError;
use crate::PlcnormResult;
use crate::Project;
use crate::XmlDialect;
use crate::assemble::NamespaceFilter;
use crate::classify::classify;
use crate::classify::load_prenormalized;
use crate::config::DEFAULT_MAX_FILE_SIZE;
use crate::config::PlcnormConfig;
use crate::config::default_ignored_namespaces;
use crate::dom::parse_document;
use crate::walker::read_text;

/// Options for controlling how a project is extracted.
///
/// Use [`ExtractOptions::default()`] for sensible defaults or
/// [`ExtractOptions::from_config`] to construct from a [`PlcnormConfig`].
#[derive(Debug, Clone)]
pub struct ExtractOptions {
	/// Glob patterns of namespace names to leave out. `Global` is never left
	/// out.
	pub ignore: Vec<String>,
	/// Fail on initializers that cannot be rendered instead of reporting a
	/// diagnostic.
	pub strict_initializers: bool,
	/// Fixed `contentGenerated` value for vendor projects.
	pub content_generated: Option<String>,
	/// Maximum size of a single input file in bytes.
	pub max_file_size: u64,
}

impl Default for ExtractOptions {
	fn default() -> Self {
		Self {
			ignore: default_ignored_namespaces(),
			strict_initializers: false,
			content_generated: None,
			max_file_size: DEFAULT_MAX_FILE_SIZE,
		}
	}
}

impl ExtractOptions {
	/// Construct [`ExtractOptions`] from a [`PlcnormConfig`].
	pub fn from_config(config: Option<&PlcnormConfig>) -> Self {
		let Some(config) = config else {
			return Self::default();
		};

		Self {
			ignore: config.namespaces.ignore.clone(),
			strict_initializers: config.initializers.strict,
			content_generated: config.content_generated.clone(),
			max_file_size: config.max_file_size,
		}
	}

	/// Add namespace patterns to leave out.
	#[must_use]
	pub fn with_ignored<I, S>(mut self, patterns: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		for pattern in patterns {
			let pattern = pattern.into();
			if !self.ignore.contains(&pattern) {
				self.ignore.push(pattern);
			}
		}
		self
	}

	#[must_use]
	pub fn with_strict_initializers(mut self, strict: bool) -> Self {
		self.strict_initializers = strict;
		self
	}

	#[must_use]
	pub fn with_content_generated(mut self, value: impl Into<String>) -> Self {
		self.content_generated = Some(value.into());
		self
	}
}

/// The kind of non-fatal finding produced while extracting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum DiagnosticKind {
	/// An initial value that cannot be rendered was dropped.
	UnsupportedInitializer { variable: String, shape: String },
	/// A data type that is neither a structure nor an enumeration was skipped.
	UnsupportedDataType { name: String, base_type: String },
	/// A unit with a type the model does not know was skipped.
	UnsupportedPou { name: String, pou_type: String },
}

/// A diagnostic produced during extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractDiagnostic {
	pub kind: DiagnosticKind,
	/// Where the finding was made, e.g. `PLC1/MyFb`.
	pub location: String,
}

impl ExtractDiagnostic {
	/// Human-readable message for this diagnostic.
	pub fn message(&self) -> String {
		match &self.kind {
			DiagnosticKind::UnsupportedInitializer { variable, shape } => {
				format!("dropped unsupported initializer ({shape}) of `{variable}`")
			}
			DiagnosticKind::UnsupportedDataType { name, base_type } => {
				format!("skipped data type `{name}` with unsupported base type `{base_type}`")
			}
			DiagnosticKind::UnsupportedPou { name, pou_type } => {
				format!("skipped unit `{name}` with unsupported type `{pou_type}`")
			}
		}
	}
}

/// Collects non-fatal findings of one extraction pass.
#[derive(Debug, Default)]
pub(crate) struct Findings {
	strict_initializers: bool,
	diagnostics: Vec<ExtractDiagnostic>,
}

impl Findings {
	pub(crate) fn new(options: &ExtractOptions) -> Self {
		Self {
			strict_initializers: options.strict_initializers,
			diagnostics: Vec::new(),
		}
	}

	/// Record a dropped initializer, or fail in strict mode.
	pub(crate) fn unsupported_initializer(
		&mut self,
		owner: &str,
		variable: &str,
		shape: &str,
	) -> PlcnormResult<()> {
		if self.strict_initializers {
			return Err(PlcnormError::UnsupportedInitializer {
				owner: owner.to_string(),
				variable: variable.to_string(),
				shape: shape.to_string(),
			});
		}

		tracing::warn!(owner, variable, shape, "dropping unsupported initializer");
		self.push(
			owner,
			DiagnosticKind::UnsupportedInitializer {
				variable: variable.to_string(),
				shape: shape.to_string(),
			},
		);
		Ok(())
	}

	pub(crate) fn unsupported_data_type(&mut self, owner: &str, name: &str, base_type: &str) {
		tracing::warn!(name, base_type, "skipping unsupported data type");
		self.push(
			owner,
			DiagnosticKind::UnsupportedDataType {
				name: name.to_string(),
				base_type: base_type.to_string(),
			},
		);
	}

	pub(crate) fn unsupported_pou(&mut self, owner: &str, name: &str, pou_type: &str) {
		tracing::warn!(name, pou_type, "skipping unit with unsupported type");
		self.push(
			owner,
			DiagnosticKind::UnsupportedPou {
				name: name.to_string(),
				pou_type: pou_type.to_string(),
			},
		);
	}

	fn push(&mut self, location: &str, kind: DiagnosticKind) {
		self.diagnostics.push(ExtractDiagnostic {
			kind,
			location: location.to_string(),
		});
	}

	pub(crate) fn into_diagnostics(self) -> Vec<ExtractDiagnostic> {
		self.diagnostics
	}
}

/// An extracted project together with the findings of the extraction.
#[derive(Debug, Clone)]
pub struct Extraction {
	/// The dialect the input was read as.
	pub kind: InputKind,
	pub project: Project,
	pub diagnostics: Vec<ExtractDiagnostic>,
}

/// Extract a project with default options.
pub fn extract(path: &Path) -> PlcnormResult<Extraction> {
	extract_project(path, &ExtractOptions::default())
}

/// Extract with options from the `plcnorm.toml` next to the input, if any.
pub fn extract_project_with_config(path: &Path) -> PlcnormResult<Extraction> {
	let config = PlcnormConfig::load_for_input(path)?;
	let options = ExtractOptions::from_config(config.as_ref());
	extract_project(path, &options)
}

/// Classify the input and run the matching extractor.
pub fn extract_project(path: &Path, options: &ExtractOptions) -> PlcnormResult<Extraction> {
	let kind = classify(path)?;
	let filter = NamespaceFilter::new(&options.ignore)?;
	tracing::debug!(path = %path.display(), %kind, "extracting");

	let (project, diagnostics) = match kind {
		InputKind::VendorProject => crate::vendor::read_vendor_project(path, options, &filter)?,
		InputKind::Prenormalized => (filter.apply(load_prenormalized(path)?), Vec::new()),
		_ => {
			let Some(dialect) = kind.xml_dialect() else {
				return Err(PlcnormError::UnrecognizedInput {
					path: path.display().to_string(),
				});
			};
			read_xml(path, dialect, options, &filter)?
		}
	};

	for diagnostic in &diagnostics {
		tracing::debug!(location = %diagnostic.location, "{}", diagnostic.message());
	}

	Ok(Extraction {
		kind,
		project,
		diagnostics,
	})
}

fn read_xml(
	path: &Path,
	dialect: XmlDialect,
	options: &ExtractOptions,
	filter: &NamespaceFilter,
) -> PlcnormResult<(Project, Vec<ExtractDiagnostic>)> {
	let display = path.display().to_string();
	let content = read_text(path, options.max_file_size)?;
	let root = parse_document(&display, &content)?;

	if !root.in_namespace(dialect.namespace()) {
		return Err(PlcnormError::Xml {
			path: display,
			reason: format!("root element is not in namespace `{dialect}`"),
		});
	}

	if dialect.is_tc6() {
		crate::tc6::read_tc6(&display, &root, dialect, options, filter)
	} else {
		crate::iec10::read_iec10(&display, &root, options, filter)
	}
}
