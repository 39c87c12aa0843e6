//! Readers for the xml manifests of a vendor project tree: the `.apj` project
//! file, `Package.pkg` package listings, and `.lby` library descriptions.

use std::path::Path;

use crate::DEFAULT_VERSION;
use crate::PlcnormResult;
use crate::dom::Element;
use crate::dom::parse_document;
use crate::walker::read_text;

/// Namespace of `Package.pkg` documents.
pub const PACKAGE_NAMESPACE: &str = "http://br-automation.co.at/AS/Package";
/// Namespace of `.lby` documents.
pub const LIBRARY_NAMESPACE: &str = "http://br-automation.co.at/AS/Library";

/// Name of the package listing found next to every namespace directory.
pub const PACKAGE_FILE: &str = "Package.pkg";

/// Attributes of the `.apj` root element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectManifest {
	pub version: String,
	pub description: String,
}

impl ProjectManifest {
	pub fn read(path: &Path, max_file_size: u64) -> PlcnormResult<Self> {
		let root = load(path, max_file_size)?;

		Ok(Self {
			version: root.attr("Version").unwrap_or(DEFAULT_VERSION).to_string(),
			description: root.attr_or_empty("Description"),
		})
	}
}

/// The `Objects/Object` entry describing one namespace directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageEntry {
	pub language: String,
	pub description: String,
}

impl PackageEntry {
	/// Find the entry named `name` in the package listing at `path`.
	///
	/// A missing package file or entry yields `None`.
	pub fn read(path: &Path, name: &str, max_file_size: u64) -> PlcnormResult<Option<Self>> {
		if !path.is_file() {
			tracing::debug!(path = %path.display(), "no package listing");
			return Ok(None);
		}

		let root = load(path, max_file_size)?;
		let entry = root
			.find_all(&["Objects", "Object"])
			.into_iter()
			.filter(|object| object.in_namespace(PACKAGE_NAMESPACE))
			.find(|object| object.text().trim() == name)
			.map(|object| {
				Self {
					language: object.attr_or_empty("Language"),
					description: object.attr_or_empty("Description"),
				}
			});

		Ok(entry)
	}
}

/// Version and dependencies of a `.lby` library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryManifest {
	pub version: String,
	pub dependencies: Vec<String>,
}

impl LibraryManifest {
	pub fn read(path: &Path, max_file_size: u64) -> PlcnormResult<Self> {
		let root = load(path, max_file_size)?;
		let dependencies = root
			.find_all(&["Dependencies", "Dependency"])
			.into_iter()
			.filter(|dependency| dependency.in_namespace(LIBRARY_NAMESPACE))
			.filter_map(|dependency| dependency.attr("ObjectName"))
			.map(ToString::to_string)
			.collect();

		Ok(Self {
			version: root.attr("Version").unwrap_or(DEFAULT_VERSION).to_string(),
			dependencies,
		})
	}
}

fn load(path: &Path, max_file_size: u64) -> PlcnormResult<Element> {
	let content = read_text(path, max_file_size)?;
	parse_document(&path.display().to_string(), &content)
}
