use globset::Glob;
use globset::GlobSet;
use globset::GlobSetBuilder;

use crate::GLOBAL_NAMESPACE;
use crate::Namespace;
use crate::PlcnormError;
use crate::PlcnormResult;
use crate::Project;
use crate::ProjectInfo;

/// Decides which namespaces are left out of a project.
#[derive(Debug, Clone)]
pub struct NamespaceFilter {
	set: GlobSet,
}

impl NamespaceFilter {
	/// Build a filter from glob patterns. Invalid patterns are errors.
	pub fn new(patterns: &[String]) -> PlcnormResult<Self> {
		let mut builder = GlobSetBuilder::new();
		for pattern in patterns {
			let glob = Glob::new(pattern).map_err(|e| {
				PlcnormError::InvalidPattern {
					pattern: pattern.clone(),
					reason: e.to_string(),
				}
			})?;
			builder.add(glob);
		}

		let set = builder.build().map_err(|e| {
			PlcnormError::InvalidPattern {
				pattern: patterns.join(", "),
				reason: e.to_string(),
			}
		})?;

		if set.is_match(GLOBAL_NAMESPACE) {
			tracing::warn!("the `{GLOBAL_NAMESPACE}` namespace cannot be ignored");
		}

		Ok(Self { set })
	}

	/// A filter that keeps everything.
	pub fn keep_all() -> Self {
		Self {
			set: GlobSet::empty(),
		}
	}

	/// `true` when the namespace must be left out.
	pub fn is_ignored(&self, name: &str) -> bool {
		name != GLOBAL_NAMESPACE && self.set.is_match(name)
	}

	/// Drop the ignored namespaces of an already assembled project.
	pub fn apply(&self, mut project: Project) -> Project {
		project
			.namespaces
			.retain(|namespace| !self.is_ignored(&namespace.name));
		project
	}
}

/// Accumulates namespaces into a [`Project`] whose first namespace is always
/// the global one.
#[derive(Debug)]
pub struct ProjectBuilder<'a> {
	info: ProjectInfo,
	namespaces: Vec<Namespace>,
	filter: &'a NamespaceFilter,
}

impl<'a> ProjectBuilder<'a> {
	pub fn new(info: ProjectInfo, global: Namespace, filter: &'a NamespaceFilter) -> Self {
		debug_assert_eq!(global.name, GLOBAL_NAMESPACE);

		Self {
			info,
			namespaces: vec![global],
			filter,
		}
	}

	/// Add a namespace unless it is ignored. A namespace whose name is already
	/// present is merged into the existing one.
	pub fn push(&mut self, namespace: Namespace) {
		if self.filter.is_ignored(&namespace.name) {
			tracing::debug!(namespace = %namespace.name, "ignoring namespace");
			return;
		}

		if let Some(existing) = self
			.namespaces
			.iter_mut()
			.find(|existing| existing.name == namespace.name)
		{
			tracing::debug!(namespace = %namespace.name, "merging duplicate namespace");
			merge(existing, namespace);
			return;
		}

		self.namespaces.push(namespace);
	}

	/// Add a namespace only when it owns a unit, data type, or variable list.
	pub fn push_if_populated(&mut self, namespace: Namespace) {
		if namespace.is_empty() {
			tracing::debug!(namespace = %namespace.name, "skipping empty namespace");
			return;
		}

		self.push(namespace);
	}

	pub fn build(self) -> Project {
		Project {
			info: self.info,
			namespaces: self.namespaces,
		}
	}
}

fn merge(target: &mut Namespace, source: Namespace) {
	target.programs.extend(source.programs);
	target.function_blocks.extend(source.function_blocks);
	target.functions.extend(source.functions);
	target.classes.extend(source.classes);
	target.data_types.extend(source.data_types);
	target.vars.extend(source.vars);
	for dependency in source.dependencies {
		if !target.dependencies.contains(&dependency) {
			target.dependencies.push(dependency);
		}
	}
}
