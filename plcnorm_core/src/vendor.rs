//! Reader for B&R Automation Studio project trees.
//!
//! The `.apj` file names the project; its `Logical` sibling directory holds
//! the sources. Every directory with a `.lby` or `.prg` marker is a namespace
//! and owns the files below it, up to the next nested marker. Files owned by
//! no namespace form the global namespace.

use std::path::Path;
use std::path::PathBuf;

use crate::Action;
use crate::DataType;
use crate::GLOBAL_NAMESPACE;
use crate::Namespace;
use crate::NamespaceKind;
use crate::PlcnormError;
use crate::PlcnormResult;
use crate::Pou;
use crate::PouKind;
use crate::Project;
use crate::ProjectInfo;
use crate::VariableList;
use crate::actions::resolve_actions;
use crate::assemble::NamespaceFilter;
use crate::assemble::ProjectBuilder;
use crate::declarations::UnitDeclaration;
use crate::declarations::parse_type_declarations;
use crate::declarations::parse_unit_declarations;
use crate::manifest::LibraryManifest;
use crate::manifest::PACKAGE_FILE;
use crate::manifest::PackageEntry;
use crate::manifest::ProjectManifest;
use crate::members::parse_interface;
use crate::project::ExtractDiagnostic;
use crate::project::ExtractOptions;
use crate::sources::CodeFile;
use crate::sources::ProgramBodies;
use crate::sources::collect_actions;
use crate::sources::find_unit_body;
use crate::walker::SourceFiles;
use crate::walker::collect_files;
use crate::walker::extension;
use crate::walker::has_namespace_marker;
use crate::walker::is_namespace_marker;
use crate::walker::read_text;

/// Directory next to the `.apj` file holding the sources.
pub const LOGICAL_DIR: &str = "Logical";

/// Description of the global namespace of a vendor project.
pub const GLOBAL_DESCRIPTION: &str = "Global namespace";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

pub(crate) fn read_vendor_project(
	apj: &Path,
	options: &ExtractOptions,
	filter: &NamespaceFilter,
) -> PlcnormResult<(Project, Vec<ExtractDiagnostic>)> {
	let manifest = ProjectManifest::read(apj, options.max_file_size)?;
	let info = ProjectInfo {
		project_name: project_name(apj),
		project_version: manifest.version,
		content_description: manifest.description,
		content_generated: options
			.content_generated
			.clone()
			.unwrap_or_else(|| chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()),
		..ProjectInfo::default()
	};

	let logical = apj
		.parent()
		.unwrap_or_else(|| Path::new("."))
		.join(LOGICAL_DIR);
	if !logical.is_dir() {
		return Err(PlcnormError::MissingElement {
			element: LOGICAL_DIR.to_string(),
			context: apj.display().to_string(),
		});
	}

	let files = collect_files(&logical)?;
	tracing::debug!(logical = %logical.display(), files = files.len(), "collected project files");

	let global = read_global(&logical, &files, options)?;
	let mut builder = ProjectBuilder::new(info, global, filter);

	for marker in files.iter().filter(|path| is_namespace_marker(path)) {
		let Some(dir) = marker.parent() else {
			continue;
		};

		let name = directory_name(dir);
		if filter.is_ignored(&name) {
			tracing::debug!(namespace = %name, "ignoring namespace");
			continue;
		}

		let namespace = NamespaceReader {
			marker,
			dir,
			name,
			options,
		}
		.read(owned_files(&files, &logical, Some(dir)))?;
		builder.push(namespace);
	}

	Ok((builder.build(), Vec::new()))
}

/// File name of the `.apj` up to its first `.`.
fn project_name(apj: &Path) -> String {
	apj.file_name()
		.map(|name| name.to_string_lossy())
		.and_then(|name| name.split('.').next().map(ToString::to_string))
		.unwrap_or_default()
}

fn directory_name(dir: &Path) -> String {
	dir.file_name()
		.map(|name| name.to_string_lossy().into_owned())
		.unwrap_or_default()
}

/// The nearest directory at or below `logical` that holds a namespace marker
/// and contains `file`.
fn owning_dir<'a>(file: &'a Path, logical: &Path) -> Option<&'a Path> {
	file.ancestors()
		.skip(1)
		.take_while(|dir| dir.starts_with(logical))
		.find(|dir| has_namespace_marker(dir))
}

/// Files whose owning namespace directory is `owner`; `None` selects the
/// global files.
fn owned_files(files: &[PathBuf], logical: &Path, owner: Option<&Path>) -> SourceFiles {
	SourceFiles::partition(
		files
			.iter()
			.filter(|file| owning_dir(file, logical) == owner)
			.cloned(),
	)
}

fn read_global(logical: &Path, files: &[PathBuf], options: &ExtractOptions) -> PlcnormResult<Namespace> {
	let sources = owned_files(files, logical, None);
	let mut global = Namespace::new(GLOBAL_NAMESPACE, NamespaceKind::Library);
	global.description = GLOBAL_DESCRIPTION.to_string();
	global.data_types = read_data_types(&sources.typ, options)?;
	global.vars = read_variable_lists(&sources.var, options)?;

	tracing::debug!(
		data_types = global.data_types.len(),
		variable_lists = global.vars.len(),
		"read global namespace"
	);

	Ok(global)
}

fn read_data_types(paths: &[PathBuf], options: &ExtractOptions) -> PlcnormResult<Vec<DataType>> {
	let mut data_types = Vec::new();
	for path in paths {
		let text = read_text(path, options.max_file_size)?;
		data_types.extend(parse_type_declarations(&path.display().to_string(), &text)?);
	}

	Ok(data_types)
}

fn read_variable_lists(paths: &[PathBuf], options: &ExtractOptions) -> PlcnormResult<Vec<VariableList>> {
	let mut lists = Vec::new();
	for path in paths {
		let blocks = parse_interface(&read_text(path, options.max_file_size)?);
		if blocks.is_empty() {
			tracing::debug!(path = %path.display(), "no variable blocks");
			continue;
		}

		lists.push(VariableList {
			name: path
				.file_stem()
				.map(|stem| stem.to_string_lossy().into_owned())
				.unwrap_or_default(),
			blocks,
		});
	}

	Ok(lists)
}

struct NamespaceReader<'a> {
	marker: &'a Path,
	dir: &'a Path,
	name: String,
	options: &'a ExtractOptions,
}

impl NamespaceReader<'_> {
	fn read(self, sources: SourceFiles) -> PlcnormResult<Namespace> {
		let max_file_size = self.options.max_file_size;
		let kind = if extension(self.marker) == "prg" {
			NamespaceKind::ProgramNamespace
		} else {
			NamespaceKind::Library
		};
		tracing::debug!(namespace = %self.name, %kind, "reading namespace");

		let mut namespace = Namespace::new(self.name.clone(), kind);

		if let Some(package) = self.dir.parent().map(|parent| parent.join(PACKAGE_FILE)) {
			if let Some(entry) = PackageEntry::read(&package, &self.name, max_file_size)? {
				namespace.language = entry.language;
				namespace.description = entry.description;
			}
		}

		if kind == NamespaceKind::Library {
			let library = LibraryManifest::read(self.marker, max_file_size)?;
			namespace.version = library.version;
			namespace.dependencies = library.dependencies;
		}

		let code = CodeFile::load_all(sources.code_files(), max_file_size)?;
		let known = collect_actions(&code);

		for path in &sources.fun {
			for declaration in parse_unit_declarations(&read_text(path, max_file_size)?) {
				let pou = unit(declaration, &code, &known)?;
				namespace.push_pou(pou);
			}
		}

		if kind == NamespaceKind::ProgramNamespace {
			let program = self.program(&sources.var, &code, &known)?;
			namespace.programs.push(program);
		} else {
			namespace.vars = read_variable_lists(&sources.var, self.options)?;
		}

		namespace.data_types = read_data_types(&sources.typ, self.options)?;

		Ok(namespace)
	}

	/// The single program of a program namespace, named after its directory.
	fn program(&self, var_files: &[PathBuf], code: &[CodeFile], known: &[Action]) -> PlcnormResult<Pou> {
		let mut program = Pou::new(self.name.clone(), PouKind::Program);
		for path in var_files {
			let text = read_text(path, self.options.max_file_size)?;
			program.interface.extend(parse_interface(&text));
		}

		let bodies = ProgramBodies::find(code);
		let Some(main_code) = bodies.cyclic.clone() else {
			return Err(PlcnormError::MissingMainBody {
				kind: PouKind::Program.to_string(),
				name: self.name.clone(),
			});
		};

		program.actions = resolve_actions(&main_code, &bodies.lifecycle_actions(), known)?;
		program.main_code = main_code;
		tracing::debug!(
			unit = %program.name,
			actions = program.actions.len(),
			"read program"
		);

		Ok(program)
	}
}

/// Build a function block or function from its declaration and the first
/// matching implementation.
fn unit(declaration: UnitDeclaration, code: &[CodeFile], known: &[Action]) -> PlcnormResult<Pou> {
	let Some(main_code) = find_unit_body(&declaration.name, code) else {
		return Err(PlcnormError::MissingMainBody {
			kind: declaration.kind.to_string(),
			name: declaration.name,
		});
	};

	let actions = resolve_actions(&main_code, &[], known)?;
	tracing::debug!(unit = %declaration.name, kind = %declaration.kind, actions = actions.len(), "read unit");

	Ok(Pou {
		name: declaration.name,
		kind: declaration.kind,
		return_type: declaration.return_type,
		description: declaration.description,
		interface: declaration.interface,
		main_code,
		actions,
		methods: Vec::new(),
	})
}
