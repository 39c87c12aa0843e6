use std::path::Path;
use std::process;

use clap::Parser;
use owo_colors::OwoColorize;
use plcnorm_cli::Commands;
use plcnorm_cli::OutputFormat;
use plcnorm_cli::PlcnormCli;
use plcnorm_core::ExtractOptions;
use plcnorm_core::Extraction;
use plcnorm_core::Namespace;
use plcnorm_core::PlcnormConfig;
use plcnorm_core::Pou;
use plcnorm_core::classify;
use plcnorm_core::extract_project;
use plcnorm_core::render_project;
use tracing_subscriber::EnvFilter;

/// Environment variable holding a log filter, e.g. `plcnorm_core=trace`.
const LOG_ENV: &str = "PLCNORM_LOG";

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,yellow) => {
		if color_enabled() {
			format!("{}", $text.yellow())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,bold) => {
		if color_enabled() {
			format!("{}", $text.bold())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,dimmed) => {
		if color_enabled() {
			format!("{}", $text.dimmed())
		} else {
			format!("{}", $text)
		}
	};
}

fn main() {
	let args = PlcnormCli::parse();

	// Respect NO_COLOR env var and --no-color flag.
	let use_color = !args.no_color && std::env::var_os("NO_COLOR").is_none();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	init_logging(args.verbose, use_color);

	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	let result = match &args.command {
		Commands::Extract {
			input,
			ignore,
			format,
			output,
			strict,
		} => run_extract(input, ignore, *format, output.as_deref(), *strict),
		Commands::Classify { input } => run_classify(input),
		Commands::List { input, ignore } => run_list(input, ignore),
	};

	if let Err(e) = result {
		match e.downcast::<plcnorm_core::PlcnormError>() {
			Ok(plcnorm_err) => {
				let report: miette::Report = (*plcnorm_err).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("{} {e}", colored!("error:", red));
			}
		}
		process::exit(2);
	}
}

/// Log to stderr. `PLCNORM_LOG` wins over `--verbose`.
fn init_logging(verbose: bool, use_color: bool) {
	let default_level = if verbose { "debug" } else { "warn" };
	let filter =
		EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_ansi(use_color)
		.with_target(verbose)
		.without_time()
		.try_init()
		.ok();
}

/// Options from the nearest `plcnorm.toml`, extended by command line flags.
fn extract_options(
	input: &Path,
	ignore: &[String],
	strict: bool,
) -> Result<ExtractOptions, Box<dyn std::error::Error>> {
	let config = PlcnormConfig::load_for_input(input)?;
	if config.is_some() {
		tracing::debug!(input = %input.display(), "loaded plcnorm.toml");
	}

	let mut options =
		ExtractOptions::from_config(config.as_ref()).with_ignored(ignore.iter().cloned());
	if strict {
		options = options.with_strict_initializers(true);
	}

	Ok(options)
}

fn run_extract(
	input: &Path,
	ignore: &[String],
	format: OutputFormat,
	output: Option<&Path>,
	strict: bool,
) -> Result<(), Box<dyn std::error::Error>> {
	let options = extract_options(input, ignore, strict)?;
	let extraction = extract_project(input, &options)?;
	print_diagnostics(&extraction);

	let document = render_project(&extraction.project, format.into())?;
	match output {
		Some(path) => {
			std::fs::write(path, document)?;
			eprintln!(
				"Wrote {} namespace(s) from {} to {}",
				extraction.project.namespaces.len(),
				extraction.kind,
				path.display()
			);
		}
		None => print!("{document}"),
	}

	Ok(())
}

fn print_diagnostics(extraction: &Extraction) {
	for diagnostic in &extraction.diagnostics {
		eprintln!(
			"{} {}: {}",
			colored!("warning:", yellow),
			diagnostic.location,
			diagnostic.message()
		);
	}
}

fn run_classify(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
	let kind = classify(input)?;
	println!("{kind}");

	Ok(())
}

fn run_list(input: &Path, ignore: &[String]) -> Result<(), Box<dyn std::error::Error>> {
	let options = extract_options(input, ignore, false)?;
	let extraction = extract_project(input, &options)?;
	print_diagnostics(&extraction);

	let info = &extraction.project.info;
	println!(
		"{} {}",
		colored!(info.project_name.as_str(), bold),
		colored!(format!("({})", extraction.kind), dimmed)
	);

	let mut unit_count = 0;
	for namespace in &extraction.project.namespaces {
		print_namespace(namespace);
		unit_count += namespace.pous().count();
	}

	println!(
		"\n{} namespace(s), {unit_count} unit(s)",
		extraction.project.namespaces.len()
	);

	Ok(())
}

fn print_namespace(namespace: &Namespace) {
	println!(
		"  {} {}",
		colored!(namespace.name.as_str(), bold),
		colored!(format!("[{}]", namespace.kind), dimmed)
	);

	for pou in namespace.pous() {
		print_pou(pou);
	}

	for data_type in &namespace.data_types {
		println!("    {} ({})", data_type.name, data_type.base_type);
	}

	for list in &namespace.vars {
		let count: usize = list.blocks.iter().map(|block| block.vars.len()).sum();
		println!("    {} (variables: {count})", list.name);
	}
}

fn print_pou(pou: &Pou) {
	println!("    {} ({})", pou.name, pou.kind);
	for action in &pou.actions {
		println!("      .{}", action.name);
	}
	for method in &pou.methods {
		println!("      {}()", method.name);
	}
}
