use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use plcnorm_core::DocumentFormat;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Normalize PLC project exports into one vendor-neutral document.",
	long_about = "plcnorm reads PLC projects exported by different toolchains and writes them \
	              as one normalized document of namespaces, program organization units, data \
	              types, and global variables.\n\nSupported inputs:\n  .apj          B&R \
	              Automation Studio project (with its Logical directory)\n  .xml          \
	              PLCopen TC6 2.00 / 2.01 or IEC 61131-10\n  .json         a document \
	              previously written by plcnorm\n\nQuick start:\n  plcnorm classify \
	              Project.apj\n  plcnorm list Project.apj\n  plcnorm extract Project.apj \
	              --output project.json"
)]
pub struct PlcnormCli {
	#[command(subcommand)]
	pub command: Commands,

	/// Enable verbose output. Logs each namespace and unit as it is read.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Extract a project and print the normalized document.
	///
	/// Settings from a `plcnorm.toml` next to the input are applied first;
	/// flags given here extend or override them. Non-fatal findings such as
	/// unsupported initial values are printed to stderr.
	Extract {
		/// Path to an `.apj`, `.xml`, or `.json` input.
		input: PathBuf,

		/// Namespace to leave out of the document. Accepts glob patterns and
		/// may be repeated. The global namespace is never left out.
		#[arg(long, short)]
		ignore: Vec<String>,

		/// Output format of the document.
		#[arg(long, short, value_enum, default_value_t = OutputFormat::Json)]
		format: OutputFormat,

		/// Write the document to this file instead of stdout.
		#[arg(long, short)]
		output: Option<PathBuf>,

		/// Fail on initial values that cannot be represented instead of
		/// reporting them.
		#[arg(long, default_value_t = false)]
		strict: bool,
	},
	/// Print the detected kind of an input without extracting it.
	Classify {
		/// Path to the input to classify.
		input: PathBuf,
	},
	/// List the namespaces and units of a project as a tree.
	List {
		/// Path to an `.apj`, `.xml`, or `.json` input.
		input: PathBuf,

		/// Namespace to leave out of the listing. Accepts glob patterns and
		/// may be repeated.
		#[arg(long, short)]
		ignore: Vec<String>,
	},
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
	/// Pretty-printed JSON. Can be read back as an input.
	Json,
	/// YAML with the same keys as the JSON document.
	Yaml,
}

impl From<OutputFormat> for DocumentFormat {
	fn from(format: OutputFormat) -> Self {
		match format {
			OutputFormat::Json => Self::Json,
			OutputFormat::Yaml => Self::Yaml,
		}
	}
}
