//! `plcnorm_core` reads PLC project exports from several toolchains and
//! normalizes them into one vendor-neutral [`Project`] model of namespaces,
//! program organization units, their interfaces, bodies, actions, and data
//! types.
//!
//! ## Inputs
//!
//! - B&R Automation Studio projects (`.apj` plus the `Logical` source tree).
//! - PLCopen TC6 xml, versions 2.00 and 2.01, including CODESYS extension
//!   blocks.
//! - IEC 61131-10 xml.
//! - Documents previously written by this crate (`.json`).
//!
//! ## Processing Pipeline
//!
//! ```text
//! input path
//!   -> classify (extension and xml root namespace)
//!   -> one extractor (vendor tree, TC6, or IEC 61131-10)
//!        vendor: walker -> declarations / member blocks / type splitter
//!                -> source bodies -> action resolver
//!        xml:    dom -> dialect reader -> type expressions / initializers
//!   -> project builder (global namespace first, ignored namespaces dropped)
//!   -> Project + diagnostics
//! ```
//!
//! ## Modules
//!
//! - [`config`] loads `plcnorm.toml`.
//! - [`model`] defines the normalized [`Project`].
//! - [`project`] holds the entry points and [`ExtractOptions`].
//! - [`render_project`] writes a project as json or yaml.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use plcnorm_core::extract_project_with_config;
//! use std::path::Path;
//!
//! let extraction = extract_project_with_config(Path::new("Project.apj")).unwrap();
//! for namespace in &extraction.project.namespaces {
//!     println!("{} ({})", namespace.name, namespace.kind);
//! }
//! for diagnostic in &extraction.diagnostics {
//!     eprintln!("{}: {}", diagnostic.location, diagnostic.message());
//! }
//! ```

pub use actions::*;
pub use assemble::*;
pub use classify::*;
pub use config::*;
pub use error::*;
pub use members::*;
pub use model::*;
pub use output::*;
pub use project::*;
pub use type_expr::*;
pub use type_split::*;

mod actions;
mod assemble;
mod classify;
pub mod config;
pub(crate) mod declarations;
pub mod dom;
#[allow(unused_assignments)]
mod error;
mod iec10;
pub(crate) mod lexer;
pub(crate) mod manifest;
mod members;
pub mod model;
mod output;
pub mod project;
pub(crate) mod sources;
mod tc6;
mod type_expr;
mod type_split;
mod vendor;
pub mod walker;

#[cfg(test)]
mod __fixtures;
