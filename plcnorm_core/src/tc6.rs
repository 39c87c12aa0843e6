//! Reader for PLCopen TC6 documents (v2.00 and v2.01).
//!
//! The `types` region becomes the global namespace. CODESYS style exports
//! additionally place units and data types under
//! `instances/configurations/configuration/resource`; each configuration
//! becomes a program namespace of its own.

use crate::Action;
use crate::BaseType;
use crate::BlockAttribute;
use crate::BlockKind;
use crate::DataType;
use crate::GLOBAL_NAMESPACE;
use crate::InterfaceBlock;
use crate::Method;
use crate::Namespace;
use crate::NamespaceKind;
use crate::PlcnormError;
use crate::PlcnormResult;
use crate::Pou;
use crate::PouKind;
use crate::Project;
use crate::ProjectInfo;
use crate::Variable;
use crate::XmlDialect;
use crate::assemble::NamespaceFilter;
use crate::assemble::ProjectBuilder;
use crate::dom::Element;
use crate::dom::XHTML_NAMESPACE;
use crate::project::ExtractDiagnostic;
use crate::project::ExtractOptions;
use crate::project::Findings;
use crate::type_expr::ArrayItem;
use crate::type_expr::Dimension;
use crate::type_expr::Initializer;
use crate::type_expr::TypeExpr;

/// Interface child tags by suffix, in the order they are tested.
const BLOCK_TAGS: [(&str, BlockKind); 8] = [
	("outputVars", BlockKind::Output),
	("inputVars", BlockKind::Input),
	("inOutVars", BlockKind::InOut),
	("externalVars", BlockKind::External),
	("tempVars", BlockKind::Temp),
	("accessVars", BlockKind::Access),
	("globalVars", BlockKind::Global),
	("localVars", BlockKind::Local),
];

/// xhtml elements carrying documentation text.
const DOC_TAGS: [&str; 2] = ["p", "xhtml"];
/// xhtml elements carrying source text.
const CODE_TAGS: [&str; 3] = ["p", "xhtml", "div"];
/// Body languages with a textual representation.
const TEXT_LANGUAGES: [&str; 2] = ["ST", "IL"];

/// CODESYS attribute on a member that makes its whole block constant.
const INPUT_CONSTANT: &str = "input_constant";

pub(crate) fn read_tc6(
	path: &str,
	root: &Element,
	dialect: XmlDialect,
	options: &ExtractOptions,
	filter: &NamespaceFilter,
) -> PlcnormResult<(Project, Vec<ExtractDiagnostic>)> {
	tracing::debug!(path, %dialect, "reading tc6 document");

	let types = root
		.children_named("types")
		.find(|types| types.in_namespace(dialect.namespace()))
		.ok_or_else(|| {
			PlcnormError::MissingElement {
				element: "types".to_string(),
				context: path.to_string(),
			}
		})?;

	let mut reader = Tc6Reader {
		findings: Findings::new(options),
	};

	let mut global = Namespace::new(GLOBAL_NAMESPACE, NamespaceKind::Library);
	for pou in types.find_all(&["pous", "pou"]) {
		reader.read_pou_into(&mut global, pou)?;
	}
	for data_type in types.find_all(&["dataTypes", "dataType"]) {
		reader.read_data_type_into(&mut global, data_type)?;
	}

	let mut builder = ProjectBuilder::new(read_info(root), global, filter);

	for configuration in root.find_all(&["instances", "configurations", "configuration"]) {
		let name = configuration.attr_or_empty("name");
		if filter.is_ignored(&name) {
			tracing::debug!(namespace = %name, "ignoring configuration");
			continue;
		}

		let mut namespace = Namespace::new(name, NamespaceKind::ProgramNamespace);
		for resource in configuration.children_named("resource") {
			reader.read_resource_into(&mut namespace, resource)?;
		}

		tracing::debug!(namespace = %namespace.name, "read configuration");
		builder.push_if_populated(namespace);
	}

	Ok((builder.build(), reader.findings.into_diagnostics()))
}

fn read_info(root: &Element) -> ProjectInfo {
	let file_header = root.child("fileHeader");
	let content_header = root.child("contentHeader");

	let description = header_attr(file_header, "contentDescription")
		.or_else(|| {
			content_header
				.and_then(|header| header.child("Comment"))
				.map(Element::text)
		})
		.unwrap_or_default();

	ProjectInfo {
		company_name: header_attr(content_header, "organization")
			.or_else(|| header_attr(file_header, "companyName"))
			.unwrap_or_default(),
		company_url: header_attr(file_header, "companyURL").unwrap_or_default(),
		project_name: header_attr(content_header, "name").unwrap_or_default(),
		project_version: header_attr(content_header, "version").unwrap_or_default(),
		project_url: String::new(),
		contact_person: header_attr(content_header, "author").unwrap_or_default(),
		content_description: flatten_description(&description),
		content_generated: header_attr(content_header, "modificationDateTime")
			.or_else(|| header_attr(file_header, "creationDateTime"))
			.unwrap_or_default(),
	}
}

fn header_attr(header: Option<&Element>, name: &str) -> Option<String> {
	header
		.and_then(|header| header.attr(name))
		.map(ToString::to_string)
}

/// Put a multi-line description on one line.
pub(crate) fn flatten_description(text: &str) -> String {
	text.replace('\n', " ").replace("  ", " ").trim().to_string()
}

struct Tc6Reader {
	findings: Findings,
}

impl Tc6Reader {
	fn read_resource_into(&mut self, namespace: &mut Namespace, resource: &Element) -> PlcnormResult<()> {
		for data in resource.find_all(&["addData", "data"]) {
			let key = data
				.attr("name")
				.and_then(|name| name.rsplit('/').next())
				.unwrap_or_default();

			match key {
				"pou" => {
					if let Some(pou) = data.child("pou") {
						self.read_pou_into(namespace, pou)?;
					}
				}
				"datatype" => {
					if let Some(data_type) = data.child("dataType") {
						self.read_data_type_into(namespace, data_type)?;
					}
				}
				_ => {}
			}
		}

		for pou in resource.children_named("pou") {
			self.read_pou_into(namespace, pou)?;
		}

		Ok(())
	}

	fn read_pou_into(&mut self, namespace: &mut Namespace, element: &Element) -> PlcnormResult<()> {
		if let Some(pou) = self.pou(&namespace.name, element)? {
			namespace.push_pou(pou);
		}
		Ok(())
	}

	fn read_data_type_into(&mut self, namespace: &mut Namespace, element: &Element) -> PlcnormResult<()> {
		if let Some(data_type) = self.data_type(&namespace.name, element)? {
			namespace.data_types.push(data_type);
		}
		Ok(())
	}

	fn pou(&mut self, owner: &str, element: &Element) -> PlcnormResult<Option<Pou>> {
		let name = element.attr_or_empty("name");
		let pou_type = element.attr_or_empty("pouType");
		let Some(kind) = pou_kind(&pou_type) else {
			self.findings.unsupported_pou(owner, &name, &pou_type);
			return Ok(None);
		};

		let location = format!("{owner}/{name}");
		tracing::debug!(unit = %location, %kind, "reading unit");

		let mut pou = Pou::new(name, kind);
		pou.description = docs(element.find(&["interface", "documentation"]));
		if kind == PouKind::Function {
			pou.return_type = element
				.find(&["interface", "returnType"])
				.map(|node| type_expr(node).to_string());
		}
		pou.interface = self.interface(&location, element)?;
		pou.main_code = code(element);

		if kind != PouKind::Function {
			pou.actions = element
				.find_all(&["actions", "action"])
				.into_iter()
				.map(|action| Action::new(action.attr_or_empty("name"), code(action)))
				.collect();

			for method in element.find_all(&["addData", "data", "Method"]) {
				let method = self.method(&location, method)?;
				pou.methods.push(method);
			}
		}

		Ok(Some(pou))
	}

	fn method(&mut self, owner: &str, element: &Element) -> PlcnormResult<Method> {
		let name = element.attr_or_empty("name");
		let location = format!("{owner}.{name}");

		Ok(Method {
			return_type: element
				.find(&["interface", "returnType"])
				.map(|node| type_expr(node).to_string())
				.unwrap_or_default(),
			description: docs(element.find(&["interface", "documentation"])),
			code: code(element),
			interface: self.interface(&location, element)?,
			name,
		})
	}

	fn interface(&mut self, location: &str, element: &Element) -> PlcnormResult<Vec<InterfaceBlock>> {
		let Some(interface) = element.child("interface") else {
			return Ok(Vec::new());
		};

		let mut blocks = Vec::new();
		for block in interface.elements() {
			let Some(kind) = block_kind(&block.name) else {
				continue;
			};

			let attribute = block_attribute(block);
			let mut vars = Vec::new();
			for variable in block.children_named("variable") {
				vars.push(self.variable(location, variable, attribute)?);
			}

			blocks.push(InterfaceBlock::new(kind, attribute, vars));
		}

		Ok(blocks)
	}

	fn variable(
		&mut self,
		location: &str,
		element: &Element,
		attribute: BlockAttribute,
	) -> PlcnormResult<Variable> {
		let name = element.attr_or_empty("name");
		let initial_value = self.initial_value(location, &name, element.child("initialValue"))?;

		Ok(Variable {
			type_name: element
				.child("type")
				.map(|node| type_expr(node).to_string())
				.unwrap_or_default(),
			attribute: attribute.as_str().to_string(),
			initial_value,
			description: docs(element.child("documentation")),
			notes: Vec::new(),
			name,
		})
	}

	fn initial_value(
		&mut self,
		location: &str,
		variable: &str,
		node: Option<&Element>,
	) -> PlcnormResult<String> {
		let Some(initializer) = node.and_then(initializer) else {
			return Ok(String::new());
		};

		match initializer.render() {
			Ok(value) => Ok(value),
			Err(shape) => {
				self.findings.unsupported_initializer(location, variable, shape)?;
				Ok(String::new())
			}
		}
	}

	fn data_type(&mut self, owner: &str, element: &Element) -> PlcnormResult<Option<DataType>> {
		let name = element.attr_or_empty("name");
		let location = format!("{owner}/{name}");
		let Some(base) = element.child("baseType").and_then(|node| node.elements().next()) else {
			self.findings.unsupported_data_type(owner, &name, "");
			return Ok(None);
		};

		let mut data_type = match base.name.as_str() {
			"enum" => {
				let mut data_type = DataType::new(name.clone(), BaseType::Enumeration);
				data_type.components = base
					.find_all(&["values", "value"])
					.into_iter()
					.map(|value| {
						Variable {
							name: value.attr_or_empty("name"),
							initial_value: value.attr_or_empty("value"),
							description: docs(value.child("documentation")),
							..Variable::default()
						}
					})
					.collect();
				data_type
			}
			"struct" => {
				let mut data_type = DataType::new(name.clone(), BaseType::Struct);
				for member in base.children_named("variable") {
					let member = self.variable(&location, member, BlockAttribute::None)?;
					data_type.components.push(member);
				}
				data_type
			}
			other => {
				self.findings.unsupported_data_type(owner, &name, other);
				return Ok(None);
			}
		};

		data_type.description = docs(element.child("documentation"));
		data_type.initial_value = self.initial_value(owner, &name, element.child("initialValue"))?;
		tracing::debug!(data_type = %location, base_type = %data_type.base_type, "read data type");

		Ok(Some(data_type))
	}
}

fn pou_kind(pou_type: &str) -> Option<PouKind> {
	match pou_type {
		"program" => Some(PouKind::Program),
		"functionBlock" => Some(PouKind::FunctionBlock),
		"function" => Some(PouKind::Function),
		"class" => Some(PouKind::Class),
		_ => None,
	}
}

fn block_kind(tag: &str) -> Option<BlockKind> {
	BLOCK_TAGS
		.iter()
		.find(|(suffix, _)| tag.ends_with(suffix))
		.map(|(_, kind)| *kind)
}

/// The qualifier of a variable list: the first of the qualifier flags set to
/// `true`, or constant when a member carries the CODESYS `input_constant`
/// attribute.
fn block_attribute(block: &Element) -> BlockAttribute {
	let input_constant = block.children_named("variable").any(|variable| {
		variable
			.find_all(&["addData", "data", "Attributes", "Attribute"])
			.into_iter()
			.any(|attribute| attribute.attr("Name") == Some(INPUT_CONSTANT))
	});
	if input_constant {
		return BlockAttribute::Constant;
	}

	qualifier(block)
}

/// First qualifier flag set on a variable list element.
pub(crate) fn qualifier(block: &Element) -> BlockAttribute {
	BlockAttribute::QUALIFIERS
		.into_iter()
		.find(|attribute| matches!(block.attr(attribute.as_str()), Some("true" | "1")))
		.unwrap_or_default()
}

/// Resolve the type below a `type`, `baseType`, or `returnType` element.
fn type_expr(node: &Element) -> TypeExpr {
	let Some(inner) = node.elements().next() else {
		return TypeExpr::named(node.text().trim());
	};

	match inner.name.as_str() {
		"derived" => TypeExpr::named(inner.attr_or_empty("name")),
		"pointer" => TypeExpr::Pointer(Box::new(base_type(inner))),
		"array" => {
			TypeExpr::Array {
				dimensions: inner
					.children_named("dimension")
					.map(|dimension| {
						Dimension::new(dimension.attr_or_empty("lower"), dimension.attr_or_empty("upper"))
					})
					.collect(),
				element: Box::new(base_type(inner)),
			}
		}
		"string" | "wstring" => {
			TypeExpr::String {
				wide: inner.name == "wstring",
				length: inner.attr("length").map(ToString::to_string),
			}
		}
		elementary => TypeExpr::named(elementary),
	}
}

fn base_type(node: &Element) -> TypeExpr {
	node.child("baseType")
		.map_or_else(|| TypeExpr::named(""), type_expr)
}

/// Read the value below an `initialValue` or array `value` element.
fn initializer(node: &Element) -> Option<Initializer> {
	let value = node.elements().next()?;

	let initializer = match value.name.as_str() {
		"simpleValue" => Initializer::Simple(value.attr_or_empty("value")),
		"arrayValue" => {
			Initializer::Array(
				value
					.children_named("value")
					.map(|item| {
						ArrayItem {
							repetition: item.attr("repetitionValue").map(ToString::to_string),
							value: initializer(item).unwrap_or_else(|| Initializer::Simple(String::new())),
						}
					})
					.collect(),
			)
		}
		_ => Initializer::Struct,
	};

	Some(initializer)
}

/// Documentation text: the first xhtml paragraph, else the plain text.
fn docs(node: Option<&Element>) -> String {
	let Some(node) = node else {
		return String::new();
	};

	xhtml_text(node, &DOC_TAGS)
		.unwrap_or_else(|| node.text())
		.trim()
		.to_string()
}

/// Source text of the first textual body.
fn code(node: &Element) -> String {
	TEXT_LANGUAGES
		.iter()
		.find_map(|language| node.find(&["body", *language]))
		.map(|body| xhtml_text(body, &CODE_TAGS).unwrap_or_else(|| body.text().trim().to_string()))
		.unwrap_or_default()
}

fn xhtml_text(node: &Element, tags: &[&str]) -> Option<String> {
	node.descendants()
		.into_iter()
		.filter(|element| {
			element.in_namespace(XHTML_NAMESPACE) && tags.contains(&element.name.as_str())
		})
		.map(Element::text)
		.find(|text| !text.trim().is_empty())
}
