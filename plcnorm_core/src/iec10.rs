//! Reader for IEC 61131-10 documents.
//!
//! `Types/GlobalNamespace` becomes the global namespace and every nested
//! `NamespaceDecl` a library. Nested declarations are flattened to dotted
//! names, e.g. `Motion.Axis`.

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
use crate::assemble::NamespaceFilter;
use crate::assemble::ProjectBuilder;
use crate::dom::Element;
use crate::project::ExtractDiagnostic;
use crate::project::ExtractOptions;
use crate::project::Findings;
use crate::tc6::flatten_description;
use crate::tc6::qualifier;
use crate::type_expr::ArrayItem;
use crate::type_expr::Initializer;

const PARAMETER_BLOCKS: [(&str, BlockKind); 3] = [
	("InputVars", BlockKind::Input),
	("OutputVars", BlockKind::Output),
	("InoutVars", BlockKind::InOut),
];

const VARIABLE_BLOCKS: [(&str, BlockKind); 5] = [
	("Vars", BlockKind::Local),
	("TempVars", BlockKind::Temp),
	("ExternalVars", BlockKind::External),
	("GlobalVars", BlockKind::Global),
	("AccessVars", BlockKind::Access),
];

const TEXT_LANGUAGES: [&str; 2] = ["ST", "IL"];

/// Tags of structure members.
const MEMBER_TAGS: [&str; 3] = ["Member", "Variable", "variable"];
/// Tags of enumeration values.
const ENUMERATOR_TAGS: [&str; 3] = ["Enumerator", "Value", "value"];

pub(crate) fn read_iec10(
	path: &str,
	root: &Element,
	options: &ExtractOptions,
	filter: &NamespaceFilter,
) -> PlcnormResult<(Project, Vec<ExtractDiagnostic>)> {
	tracing::debug!(path, "reading iec 61131-10 document");

	let global_element = root.find(&["Types", "GlobalNamespace"]).ok_or_else(|| {
		PlcnormError::MissingElement {
			element: "Types/GlobalNamespace".to_string(),
			context: path.to_string(),
		}
	})?;

	let mut reader = Iec10Reader {
		findings: Findings::new(options),
	};

	let mut global = Namespace::new(GLOBAL_NAMESPACE, NamespaceKind::Library);
	reader.read_declarations_into(&mut global, global_element)?;

	let mut builder = ProjectBuilder::new(read_info(root), global, filter);

	let mut declarations = Vec::new();
	collect_namespaces(global_element, None, &mut declarations);
	for (name, element) in declarations {
		if filter.is_ignored(&name) {
			tracing::debug!(namespace = %name, "ignoring namespace");
			continue;
		}

		let mut namespace = Namespace::new(name, NamespaceKind::Library);
		reader.read_declarations_into(&mut namespace, element)?;
		tracing::debug!(namespace = %namespace.name, "read namespace");
		builder.push_if_populated(namespace);
	}

	Ok((builder.build(), reader.findings.into_diagnostics()))
}

fn read_info(root: &Element) -> ProjectInfo {
	let file_header = root.child("FileHeader");
	let content_header = root.child("ContentHeader");
	let attr = |header: Option<&Element>, name: &str| {
		header
			.and_then(|header| header.attr(name))
			.unwrap_or_default()
			.to_string()
	};

	ProjectInfo {
		company_name: attr(file_header, "companyName"),
		company_url: attr(file_header, "companyURL"),
		project_name: attr(content_header, "name"),
		project_version: attr(content_header, "version"),
		project_url: String::new(),
		contact_person: attr(content_header, "author"),
		content_description: flatten_description(&attr(file_header, "contentDescription")),
		content_generated: attr(content_header, "modificationDateTime"),
	}
}

/// Collect `NamespaceDecl` elements depth first with their dotted names.
fn collect_namespaces<'a>(
	parent: &'a Element,
	prefix: Option<&str>,
	found: &mut Vec<(String, &'a Element)>,
) {
	for declaration in parent.children_named("NamespaceDecl") {
		let name = match prefix {
			Some(prefix) => format!("{prefix}.{}", declaration.attr_or_empty("name")),
			None => declaration.attr_or_empty("name"),
		};
		found.push((name.clone(), declaration));
		collect_namespaces(declaration, Some(name.as_str()), found);
	}
}

struct Iec10Reader {
	findings: Findings,
}

impl Iec10Reader {
	fn read_declarations_into(&mut self, namespace: &mut Namespace, element: &Element) -> PlcnormResult<()> {
		let owner = namespace.name.clone();

		for child in element.elements() {
			let kind = match child.name.as_str() {
				"Program" => PouKind::Program,
				"FunctionBlock" => PouKind::FunctionBlock,
				"Function" => PouKind::Function,
				"Class" => PouKind::Class,
				"DataTypeDecl" => {
					if let Some(data_type) = self.data_type(&owner, child)? {
						namespace.data_types.push(data_type);
					}
					continue;
				}
				_ => continue,
			};

			let pou = self.pou(&owner, child, kind)?;
			namespace.push_pou(pou);
		}

		Ok(())
	}

	fn pou(&mut self, owner: &str, element: &Element, kind: PouKind) -> PlcnormResult<Pou> {
		let name = element.attr_or_empty("name");
		let location = format!("{owner}/{name}");
		tracing::debug!(unit = %location, %kind, "reading unit");

		let mut pou = Pou::new(name, kind);
		pou.description = documentation(element);
		if kind == PouKind::Function {
			pou.return_type = Some(type_name(element.child("ResultType")));
		}
		pou.interface = self.interface(&location, element)?;
		pou.main_code = body(element.child("MainBody"));
		pou.actions = element
			.children_named("Action")
			.map(|action| Action::new(action.attr_or_empty("name"), body(action.child("Body"))))
			.collect();

		if matches!(kind, PouKind::FunctionBlock | PouKind::Class) {
			for method in element.children_named("Method") {
				let method = self.method(&location, method)?;
				pou.methods.push(method);
			}
		}

		Ok(pou)
	}

	fn method(&mut self, owner: &str, element: &Element) -> PlcnormResult<Method> {
		let name = element.attr_or_empty("name");
		let location = format!("{owner}.{name}");

		Ok(Method {
			return_type: element
				.child("ResultType")
				.map(|node| type_name(Some(node)))
				.unwrap_or_default(),
			description: documentation(element),
			code: body(element.child("Body")),
			interface: self.interface(&location, element)?,
			name,
		})
	}

	fn interface(&mut self, location: &str, element: &Element) -> PlcnormResult<Vec<InterfaceBlock>> {
		let parameters = element.child("Parameters");
		let candidates = PARAMETER_BLOCKS
			.iter()
			.filter_map(|(tag, kind)| parameters.and_then(|node| node.child(tag)).map(|node| (*kind, node)))
			.chain(
				VARIABLE_BLOCKS
					.iter()
					.filter_map(|(tag, kind)| element.child(tag).map(|node| (*kind, node))),
			);

		let mut blocks = Vec::new();
		for (kind, block) in candidates {
			let attribute = qualifier(block);
			let mut vars = Vec::new();
			for variable in block.children_named("Variable") {
				vars.push(self.variable(location, variable, attribute)?);
			}

			if vars.is_empty() {
				continue;
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
		let initial_value = self.initial_value(location, &name, element.child("InitialValue"))?;

		Ok(Variable {
			type_name: type_name(element.child("Type")),
			attribute: attribute.as_str().to_string(),
			initial_value,
			description: documentation(element),
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

		let type_spec = element
			.elements()
			.find(|child| child.name != "Documentation")
			.map(|child| {
				if child.name == "baseType" {
					child.elements().next()
				} else {
					Some(child)
				}
			});
		let Some(Some(type_spec)) = type_spec else {
			self.findings.unsupported_data_type(owner, &name, "");
			return Ok(None);
		};

		let shape = type_spec.xsi_type().unwrap_or(&type_spec.name);
		let lowered = format!("{} {shape}", type_spec.name).to_ascii_lowercase();

		let mut data_type = if lowered.contains("struct") {
			let mut data_type = DataType::new(name.clone(), BaseType::Struct);
			for member in type_spec
				.elements()
				.filter(|child| MEMBER_TAGS.contains(&child.name.as_str()))
			{
				let member = self.variable(&location, member, BlockAttribute::None)?;
				data_type.components.push(member);
			}
			data_type
		} else if lowered.contains("enum") {
			let mut data_type = DataType::new(name.clone(), BaseType::Enumeration);
			let values = type_spec.child("values").unwrap_or(type_spec);
			data_type.components = values
				.elements()
				.filter(|child| ENUMERATOR_TAGS.contains(&child.name.as_str()))
				.map(|value| {
					Variable {
						name: value.attr_or_empty("name"),
						initial_value: value.attr_or_empty("value"),
						description: documentation(value),
						..Variable::default()
					}
				})
				.collect();
			data_type
		} else {
			self.findings.unsupported_data_type(owner, &name, shape);
			return Ok(None);
		};

		data_type.description = documentation(element);
		data_type.initial_value = self.initial_value(owner, &name, type_spec.child("InitialValue"))?;
		tracing::debug!(data_type = %location, base_type = %data_type.base_type, "read data type");

		Ok(Some(data_type))
	}
}

/// Text of the type name below a `Type` or `ResultType` element.
fn type_name(node: Option<&Element>) -> String {
	let Some(node) = node else {
		return String::new();
	};

	node.child("TypeName")
		.or_else(|| {
			node.descendants()
				.into_iter()
				.find(|element| element.name == "TypeName")
		})
		.map(|element| element.text().trim().to_string())
		.unwrap_or_default()
}

fn initializer(node: &Element) -> Option<Initializer> {
	let value = node.elements().next()?;

	let initializer = match value.name.as_str() {
		"SimpleValue" => Initializer::Simple(value.attr_or_empty("value")),
		"ArrayValue" => {
			Initializer::Array(
				value
					.children_named("Value")
					.map(|item| {
						ArrayItem {
							repetition: item.attr("repetitionFactor").map(ToString::to_string),
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

fn documentation(node: &Element) -> String {
	node.child_text("Documentation")
}

/// Source text of a `MainBody` or `Body` whose content is textual.
fn body(node: Option<&Element>) -> String {
	let Some(content) = node.and_then(|node| node.child("BodyContent")) else {
		return String::new();
	};

	match content.xsi_type() {
		Some(language) if TEXT_LANGUAGES.contains(&language) => {
			content
				.elements()
				.next()
				.map(Element::text)
				.unwrap_or_default()
		}
		_ => String::new(),
	}
}
