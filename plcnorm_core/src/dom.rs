use quick_xml::events::BytesStart;
use quick_xml::events::Event;
use quick_xml::name::ResolveResult;
use quick_xml::reader::NsReader;

use crate::PlcnormError;
use crate::PlcnormResult;

/// `xsi` namespace used for `xsi:type` discriminators.
pub const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";
/// Namespace of the xhtml fragments carrying documentation and source text.
pub const XHTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// An element of a parsed xml document with namespace-resolved names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
	/// Namespace uri the element is bound to, if any.
	pub namespace: Option<String>,
	/// Local name without prefix.
	pub name: String,
	pub attributes: Vec<Attribute>,
	pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
	pub namespace: Option<String>,
	pub name: String,
	pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
	Element(Element),
	Text(String),
}

impl Element {
	/// Child elements in document order.
	pub fn elements(&self) -> impl Iterator<Item = &Element> {
		self.children.iter().filter_map(|node| {
			match node {
				Node::Element(element) => Some(element),
				Node::Text(_) => None,
			}
		})
	}

	/// First child element with the given local name.
	pub fn child(&self, name: &str) -> Option<&Element> {
		self.elements().find(|element| element.name == name)
	}

	/// All child elements with the given local name.
	pub fn children_named<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a Element> {
		self.elements().filter(move |element| element.name == name)
	}

	/// Follow a path of local names, taking the first match at each step.
	pub fn find(&self, path: &[&str]) -> Option<&Element> {
		path.iter()
			.try_fold(self, |element, name| element.child(name))
	}

	/// All elements reached by following a path of local names.
	pub fn find_all<'a>(&'a self, path: &[&str]) -> Vec<&'a Element> {
		let Some((last, parents)) = path.split_last() else {
			return vec![self];
		};

		let mut current = vec![self];
		for name in parents {
			current = current
				.into_iter()
				.flat_map(|element| element.children_named(name))
				.collect();
		}

		current
			.into_iter()
			.flat_map(|element| element.children_named(last))
			.collect()
	}

	/// All descendant elements in document order, excluding `self`.
	pub fn descendants(&self) -> Vec<&Element> {
		let mut found = Vec::new();
		for element in self.elements() {
			found.push(element);
			found.extend(element.descendants());
		}
		found
	}

	/// Value of an unqualified attribute.
	pub fn attr(&self, name: &str) -> Option<&str> {
		self.attributes
			.iter()
			.find(|attribute| attribute.namespace.is_none() && attribute.name == name)
			.or_else(|| self.attributes.iter().find(|attribute| attribute.name == name))
			.map(|attribute| attribute.value.as_str())
	}

	/// Value of an attribute bound to `namespace`.
	pub fn attr_ns(&self, namespace: &str, name: &str) -> Option<&str> {
		self.attributes
			.iter()
			.find(|attribute| {
				attribute.name == name && attribute.namespace.as_deref() == Some(namespace)
			})
			.map(|attribute| attribute.value.as_str())
	}

	/// Attribute value or the empty string.
	pub fn attr_or_empty(&self, name: &str) -> String {
		self.attr(name).unwrap_or_default().to_string()
	}

	/// `xsi:type` with any prefix removed.
	pub fn xsi_type(&self) -> Option<&str> {
		self.attr_ns(XSI_NAMESPACE, "type")
			.map(|value| value.rsplit(':').next().unwrap_or(value))
	}

	/// Concatenated text of this element and all descendants.
	pub fn text(&self) -> String {
		let mut text = String::new();
		self.collect_text(&mut text);
		text
	}

	fn collect_text(&self, text: &mut String) {
		for node in &self.children {
			match node {
				Node::Text(content) => text.push_str(content),
				Node::Element(element) => element.collect_text(text),
			}
		}
	}

	/// Trimmed text of the first child with the given local name.
	pub fn child_text(&self, name: &str) -> String {
		self.child(name)
			.map(|element| element.text().trim().to_string())
			.unwrap_or_default()
	}

	/// `true` when the element is bound to the given namespace.
	pub fn in_namespace(&self, namespace: &str) -> bool {
		self.namespace.as_deref() == Some(namespace)
	}
}

/// Parse a whole document into its root element.
pub fn parse_document(path: &str, content: &str) -> PlcnormResult<Element> {
	let content = content.strip_prefix('\u{feff}').unwrap_or(content);
	let mut reader = NsReader::from_str(content);
	let mut stack: Vec<Element> = Vec::new();
	let mut root: Option<Element> = None;

	loop {
		let (namespace, event) = reader
			.read_resolved_event()
			.map(|(resolved, event)| (namespace_uri(&resolved), event))
			.map_err(|e| xml_error(path, &reader, &e))?;

		match event {
			Event::Start(start) => {
				let element = start_element(path, &reader, namespace, &start)?;
				stack.push(element);
			}
			Event::Empty(start) => {
				let element = start_element(path, &reader, namespace, &start)?;
				attach(&mut stack, &mut root, element);
			}
			Event::End(_) => {
				if let Some(element) = stack.pop() {
					attach(&mut stack, &mut root, element);
				}
			}
			Event::Text(text) => {
				if let Some(parent) = stack.last_mut() {
					let content = text.unescape().map_or_else(
						|_| String::from_utf8_lossy(&text).into_owned(),
						|unescaped| unescaped.into_owned(),
					);
					parent.children.push(Node::Text(content));
				}
			}
			Event::CData(data) => {
				if let Some(parent) = stack.last_mut() {
					let content = String::from_utf8_lossy(&data.into_inner()).into_owned();
					parent.children.push(Node::Text(content));
				}
			}
			Event::Eof => break,
			Event::Decl(_) | Event::PI(_) | Event::Comment(_) | Event::DocType(_) => {}
		}
	}

	if !stack.is_empty() {
		return Err(PlcnormError::Xml {
			path: path.to_string(),
			reason: "unexpected end of document".to_string(),
		});
	}

	root.ok_or_else(|| {
		PlcnormError::Xml {
			path: path.to_string(),
			reason: "document has no root element".to_string(),
		}
	})
}

/// Namespace and local name of the root element, reading no further than
/// its start tag.
pub fn sniff_root(content: &str) -> Option<(Option<String>, String)> {
	let content = content.strip_prefix('\u{feff}').unwrap_or(content);
	let mut reader = NsReader::from_str(content);

	loop {
		let (resolved, event) = reader.read_resolved_event().ok()?;
		match event {
			Event::Start(start) | Event::Empty(start) => {
				let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
				return Some((namespace_uri(&resolved), name));
			}
			Event::Eof => return None,
			_ => {}
		}
	}
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) {
	match stack.last_mut() {
		Some(parent) => parent.children.push(Node::Element(element)),
		None => {
			if root.is_none() {
				*root = Some(element);
			}
		}
	}
}

fn start_element(
	path: &str,
	reader: &NsReader<&[u8]>,
	namespace: Option<String>,
	start: &BytesStart<'_>,
) -> PlcnormResult<Element> {
	let mut attributes = Vec::new();

	for attribute in start.attributes() {
		let attribute = attribute.map_err(|e| xml_error(path, reader, &e))?;
		if attribute.key.as_namespace_binding().is_some() {
			continue;
		}

		let (resolved, local_name) = reader.resolve_attribute(attribute.key);
		let value = attribute
			.unescape_value()
			.map_err(|e| xml_error(path, reader, &e))?;
		attributes.push(Attribute {
			namespace: namespace_uri(&resolved),
			name: String::from_utf8_lossy(local_name.as_ref()).into_owned(),
			value: value.into_owned(),
		});
	}

	Ok(Element {
		namespace,
		name: String::from_utf8_lossy(start.local_name().as_ref()).into_owned(),
		attributes,
		children: Vec::new(),
	})
}

fn namespace_uri(resolved: &ResolveResult<'_>) -> Option<String> {
	match resolved {
		ResolveResult::Bound(namespace) => Some(String::from_utf8_lossy(namespace.as_ref()).into_owned()),
		ResolveResult::Unbound | ResolveResult::Unknown(_) => None,
	}
}

fn xml_error(path: &str, reader: &NsReader<&[u8]>, error: &impl std::fmt::Display) -> PlcnormError {
	PlcnormError::Xml {
		path: path.to_string(),
		reason: format!("{error} (at byte {})", reader.buffer_position()),
	}
}
