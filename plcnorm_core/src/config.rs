use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::PlcnormError;
use crate::PlcnormResult;

/// Default maximum file size in bytes (10 MB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] =
	["plcnorm.toml", ".plcnorm.toml", ".config/plcnorm.toml"];

/// Namespaces skipped when no configuration says otherwise.
///
/// `IecCheck` is the B&R runtime check library. The list applies to every
/// input kind, so a TC6 configuration or IEC 61131-10 namespace of that name
/// is skipped too; set `[namespaces] ignore = []` to keep it.
pub const DEFAULT_IGNORED_NAMESPACES: [&str; 1] = ["IecCheck"];

/// Configuration loaded from a `plcnorm.toml` file.
///
/// ```toml
/// content_generated = "2024-01-01T00:00:00"
/// max_file_size = 1048576
///
/// [namespaces]
/// ignore = ["IecCheck", "Vendor*"]
///
/// [initializers]
/// strict = true
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct PlcnormConfig {
	/// Namespace filtering.
	#[serde(default)]
	pub namespaces: NamespacesConfig,
	/// How initializers that cannot be rendered are handled.
	#[serde(default)]
	pub initializers: InitializersConfig,
	/// Fixed value for `contentGenerated` of vendor projects. When absent the
	/// current local time is used.
	#[serde(default)]
	pub content_generated: Option<String>,
	/// Maximum size of a single input file in bytes. Defaults to 10 MB.
	#[serde(default = "default_max_file_size")]
	pub max_file_size: u64,
}

fn default_max_file_size() -> u64 {
	DEFAULT_MAX_FILE_SIZE
}

#[derive(Debug, Clone, Deserialize)]
pub struct NamespacesConfig {
	/// Glob patterns of namespace names to leave out of the output.
	#[serde(default = "default_ignored_namespaces")]
	pub ignore: Vec<String>,
}

impl Default for NamespacesConfig {
	fn default() -> Self {
		Self {
			ignore: default_ignored_namespaces(),
		}
	}
}

/// The namespace patterns ignored when no configuration is present.
pub fn default_ignored_namespaces() -> Vec<String> {
	DEFAULT_IGNORED_NAMESPACES
		.iter()
		.map(ToString::to_string)
		.collect()
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InitializersConfig {
	/// Turn unsupported initializers into an error instead of a diagnostic.
	#[serde(default)]
	pub strict: bool,
}

impl PlcnormConfig {
	/// Resolve the config file path for the given directory by checking
	/// supported candidates in precedence order.
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if the file does not exist.
	pub fn load(root: &Path) -> PlcnormResult<Option<PlcnormConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		let content = std::fs::read_to_string(&config_path)?;
		let config: PlcnormConfig =
			toml::from_str(&content).map_err(|e| PlcnormError::ConfigParse(e.to_string()))?;
		tracing::debug!(path = %config_path.display(), "loaded config");

		Ok(Some(config))
	}

	/// Load the config that applies to an input path: the directory itself
	/// for directories, the containing directory for files.
	pub fn load_for_input(input: &Path) -> PlcnormResult<Option<PlcnormConfig>> {
		if input.is_dir() {
			return Self::load(input);
		}

		match input.parent() {
			Some(parent) if parent.as_os_str().is_empty() => Self::load(Path::new(".")),
			Some(parent) => Self::load(parent),
			None => Ok(None),
		}
	}
}
