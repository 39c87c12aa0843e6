use std::fmt;

use crate::PlcnormError;
use crate::PlcnormResult;
use crate::Project;

/// Document formats a [`Project`] can be written in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DocumentFormat {
	#[default]
	Json,
	Yaml,
}

impl fmt::Display for DocumentFormat {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Json => f.write_str("json"),
			Self::Yaml => f.write_str("yaml"),
		}
	}
}

/// Serialize a project. Json output is pretty-printed; both formats end with
/// a newline.
pub fn render_project(project: &Project, format: DocumentFormat) -> PlcnormResult<String> {
	let mut rendered = match format {
		DocumentFormat::Json => {
			serde_json::to_string_pretty(project)
				.map_err(|e| PlcnormError::Serialize(e.to_string()))?
		}
		DocumentFormat::Yaml => {
			serde_yaml_ng::to_string(project).map_err(|e| PlcnormError::Serialize(e.to_string()))?
		}
	};

	if !rendered.ends_with('\n') {
		rendered.push('\n');
	}

	Ok(rendered)
}
