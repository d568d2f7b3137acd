use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use mdfmt_cli::EXIT_CHANGED;
use mdfmt_cli::EXIT_FAILURE;
use mdfmt_cli::EXIT_NO_INPUT;
use mdfmt_cli::EXIT_OK;
use mdfmt_cli::EXIT_UNSUPPORTED;
use mdfmt_cli::MdfmtCli;
use mdfmt_cli::ReportFormat;
use mdfmt_core::FormattedFile;
use mdfmt_core::Formatter;
use mdfmt_core::MdfmtConfig;
use mdfmt_core::MdfmtError;
use mdfmt_core::OutputMode;
use mdfmt_core::collect_inputs;
use mdfmt_core::format_file;
use mdfmt_core::write_output;
use owo_colors::OwoColorize;
use similar::ChangeTag;
use similar::TextDiff;
use tracing_subscriber::EnvFilter;

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
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
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
}

fn main() {
	let args = MdfmtCli::parse();

	// Respect NO_COLOR env var and --no-color flag.
	let use_color = !args.no_color && std::env::var_os("NO_COLOR").is_none();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	init_logging(args.verbose, use_color);

	let code = match run(&args) {
		Ok(code) => code,
		Err(e) => {
			let code = exit_code_for(e.as_ref());
			match e.downcast::<MdfmtError>() {
				Ok(mdfmt_err) => report(*mdfmt_err),
				Err(e) => eprintln!("{} {e}", colored!("error:", red)),
			}
			code
		}
	};

	process::exit(code);
}

/// Logs go to stderr so stdout only ever carries formatted documents.
fn init_logging(verbose: bool, use_color: bool) {
	let default_level = if verbose { "debug" } else { "warn" };
	let filter =
		EnvFilter::try_from_env("MDFMT_LOG").unwrap_or_else(|_| EnvFilter::new(default_level));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_ansi(use_color)
		.with_target(false)
		.without_time()
		.init();
}

fn exit_code_for(error: &(dyn std::error::Error + 'static)) -> i32 {
	match error.downcast_ref::<MdfmtError>() {
		Some(MdfmtError::EnvironmentUnsupported { .. }) => EXIT_UNSUPPORTED,
		Some(MdfmtError::NoInputFiles) => EXIT_NO_INPUT,
		_ => EXIT_FAILURE,
	}
}

/// Render an error or warning through miette for help text and codes.
fn report(error: MdfmtError) {
	let report: miette::Report = error.into();
	eprintln!("{report:?}");
}

fn run(args: &MdfmtCli) -> Result<i32, Box<dyn std::error::Error>> {
	let root = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
	let mut config = load_config(args, &root)?;
	config.ensure_supported(env!("CARGO_PKG_VERSION"))?;
	args.apply_overrides(&mut config);

	let formatter = Formatter::from_config(&config)?;
	let inputs = collect_inputs(&args.paths, &config)?;

	let mut failures = inputs
		.skipped
		.iter()
		.filter(|skipped| matches!(skipped, MdfmtError::InputNotFound { .. }))
		.count();
	for skipped in inputs.skipped {
		report(skipped);
	}

	if inputs.files.is_empty() {
		return Err(MdfmtError::NoInputFiles.into());
	}

	let mode = args.output_mode();
	let stdout = std::io::stdout();
	let mut stdout = stdout.lock();
	let mut changed: Vec<FormattedFile> = Vec::new();

	for path in &inputs.files {
		let file = match format_file(path, &formatter) {
			Ok(file) => file,
			Err(e) => {
				report(e);
				failures += 1;
				continue;
			}
		};

		for warning in file.warnings() {
			report(warning);
		}

		match write_output(&file, &mode, &mut stdout) {
			Ok(Some(destination)) => {
				tracing::info!(path = %destination.display(), "formatted");
			}
			Ok(None) => {}
			Err(e) => {
				report(e);
				failures += 1;
				continue;
			}
		}

		if file.changed() {
			changed.push(file);
		}
	}
	stdout.flush()?;

	if mode == OutputMode::Check {
		print_check_report(&changed, inputs.files.len(), args, &root)?;
	}

	if failures > 0 {
		eprintln!(
			"{} {failures} file(s) could not be formatted",
			colored!("error:", red)
		);
		return Ok(EXIT_FAILURE);
	}

	if mode == OutputMode::Check && !changed.is_empty() {
		return Ok(EXIT_CHANGED);
	}

	Ok(EXIT_OK)
}

fn load_config(args: &MdfmtCli, root: &Path) -> Result<MdfmtConfig, MdfmtError> {
	match &args.config {
		Some(path) => MdfmtConfig::load_from(path),
		None => Ok(MdfmtConfig::load(root)?.unwrap_or_default()),
	}
}

fn print_check_report(
	changed: &[FormattedFile],
	checked: usize,
	args: &MdfmtCli,
	root: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
	match args.format {
		ReportFormat::Json => {
			let entries: Vec<serde_json::Value> = changed
				.iter()
				.map(|file| {
					let rel = make_relative(&file.path, root);
					let regions: Vec<serde_json::Value> = file
						.diagnostics
						.iter()
						.map(|diagnostic| {
							serde_json::json!({
								"region": diagnostic.region.to_string(),
								"line": diagnostic.line,
								"column": diagnostic.column,
							})
						})
						.collect();
					let mut entry = serde_json::json!({
						"file": rel,
						"unterminated": regions,
					});
					if args.diff {
						entry["diff"] = serde_json::Value::String(unified_diff(file, &rel));
					}
					entry
				})
				.collect();
			let output = serde_json::json!({
				"ok": changed.is_empty(),
				"checked": checked,
				"changed": entries,
			});
			println!("{}", serde_json::to_string(&output)?);
		}
		ReportFormat::Text => {
			if changed.is_empty() {
				println!(
					"{} {checked} file(s) already formatted.",
					colored!("Check passed:", green)
				);
				return Ok(());
			}

			eprintln!("{}", colored!("Check failed.", bold));
			for file in changed {
				eprintln!("  would reformat {}", make_relative(&file.path, root));
				if args.diff {
					print_diff(&file.original, &file.formatted);
				}
			}
			eprintln!();
			eprintln!(
				"{} of {checked} file(s) would be reformatted. Run `mdfmt --in-place` to fix.",
				changed.len()
			);
		}
	}

	Ok(())
}

fn print_diff(current: &str, expected: &str) {
	let diff = TextDiff::from_lines(current, expected);
	for change in diff.iter_all_changes() {
		match change.tag() {
			ChangeTag::Delete => {
				eprint!("  {}", colored!(format!("-{change}"), red));
			}
			ChangeTag::Insert => {
				eprint!("  {}", colored!(format!("+{change}"), green));
			}
			ChangeTag::Equal => {
				eprint!("   {change}");
			}
		}
	}
}

fn unified_diff(file: &FormattedFile, rel: &str) -> String {
	TextDiff::from_lines(&file.original, &file.formatted)
		.unified_diff()
		.header(rel, rel)
		.to_string()
}

/// Make a path relative to root for display purposes.
fn make_relative(path: &Path, root: &Path) -> String {
	path.strip_prefix(root)
		.unwrap_or(path)
		.display()
		.to_string()
}
