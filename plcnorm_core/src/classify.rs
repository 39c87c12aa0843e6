use std::fmt;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use serde::Serialize;

use crate::PlcnormError;
use crate::PlcnormResult;
use crate::Project;
use crate::dom::sniff_root;
use crate::walker::extension;

/// Namespace of PLCopen TC6 v2.00 documents.
pub const TC6_V200_NAMESPACE: &str = "http://www.plcopen.org/xml/tc6_0200";
/// Namespace of PLCopen TC6 v2.01 documents.
pub const TC6_V201_NAMESPACE: &str = "http://www.plcopen.org/xml/tc6_0201";
/// Namespace of IEC 61131-10 documents.
pub const IEC10_NAMESPACE: &str = "www.iec.ch/public/TC65SC65BWG7TF10";

/// Bytes read when sniffing the root element of an xml document.
const SNIFF_LIMIT: u64 = 64 * 1024;

/// The kinds of input the extractor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum InputKind {
	/// A B&R Automation Studio `.apj` project.
	VendorProject,
	Tc6V201,
	Tc6V200,
	#[allow(non_camel_case_types)]
	Iec61131_10,
	/// A document previously written by this crate.
	Prenormalized,
	Unrecognized,
}

impl InputKind {
	/// The xml dialect for xml inputs.
	pub fn xml_dialect(self) -> Option<XmlDialect> {
		match self {
			Self::Tc6V201 => Some(XmlDialect::Tc6V201),
			Self::Tc6V200 => Some(XmlDialect::Tc6V200),
			Self::Iec61131_10 => Some(XmlDialect::Iec61131_10),
			Self::VendorProject | Self::Prenormalized | Self::Unrecognized => None,
		}
	}
}

impl fmt::Display for InputKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::VendorProject => f.write_str("B&R Automation Studio project"),
			Self::Tc6V201 => f.write_str("PLCopen TC6 v2.01"),
			Self::Tc6V200 => f.write_str("PLCopen TC6 v2.00"),
			Self::Iec61131_10 => f.write_str("IEC 61131-10"),
			Self::Prenormalized => f.write_str("pre-normalized document"),
			Self::Unrecognized => f.write_str("unrecognized"),
		}
	}
}

/// An xml interchange dialect and the namespace its elements live in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum XmlDialect {
	Tc6V200,
	Tc6V201,
	#[allow(non_camel_case_types)]
	Iec61131_10,
}

impl XmlDialect {
	pub fn namespace(self) -> &'static str {
		match self {
			Self::Tc6V200 => TC6_V200_NAMESPACE,
			Self::Tc6V201 => TC6_V201_NAMESPACE,
			Self::Iec61131_10 => IEC10_NAMESPACE,
		}
	}

	pub fn is_tc6(self) -> bool {
		matches!(self, Self::Tc6V200 | Self::Tc6V201)
	}

	/// The dialect whose root element lives in `namespace`.
	pub fn from_namespace(namespace: &str) -> Option<Self> {
		[Self::Tc6V201, Self::Tc6V200, Self::Iec61131_10]
			.into_iter()
			.find(|dialect| dialect.namespace() == namespace)
	}
}

impl fmt::Display for XmlDialect {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.namespace())
	}
}

/// Detect the kind of an input file.
///
/// `.apj` files are vendor projects and `.json` files pre-normalized
/// documents. `.xml` files are recognized by the namespace of their root
/// element. Everything else is [`InputKind::Unrecognized`].
pub fn classify(path: &Path) -> PlcnormResult<InputKind> {
	if !path.is_file() {
		return Ok(InputKind::Unrecognized);
	}

	let kind = match extension(path).as_str() {
		"apj" => InputKind::VendorProject,
		"json" => InputKind::Prenormalized,
		"xml" => {
			let content = read_prefix(path)?;
			sniff_root(&content)
				.and_then(|(namespace, _)| namespace)
				.and_then(|namespace| XmlDialect::from_namespace(&namespace))
				.map_or(InputKind::Unrecognized, |dialect| {
					match dialect {
						XmlDialect::Tc6V200 => InputKind::Tc6V200,
						XmlDialect::Tc6V201 => InputKind::Tc6V201,
						XmlDialect::Iec61131_10 => InputKind::Iec61131_10,
					}
				})
		}
		_ => InputKind::Unrecognized,
	};

	tracing::debug!(path = %path.display(), %kind, "classified input");
	Ok(kind)
}

fn read_prefix(path: &Path) -> PlcnormResult<String> {
	let mut bytes = Vec::new();
	std::fs::File::open(path)?
		.take(SNIFF_LIMIT)
		.read_to_end(&mut bytes)?;
	Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Load a project previously serialized as json.
pub fn load_prenormalized(path: &Path) -> PlcnormResult<Project> {
	let content = std::fs::read_to_string(path)?;
	serde_json::from_str(&content).map_err(|e| {
		PlcnormError::Document {
			path: path.display().to_string(),
			reason: e.to_string(),
		}
	})
}
