use std::path::PathBuf;

use clap::Parser;
use clap::ValueEnum;
use mdfmt_core::MdfmtConfig;
use mdfmt_core::OutputMode;

/// Every file was formatted (or, with `--check`, already formatted).
pub const EXIT_OK: i32 = 0;
/// `--check` found files that would be reformatted.
pub const EXIT_CHANGED: i32 = 1;
/// At least one file failed, or a fatal error stopped the run.
pub const EXIT_FAILURE: i32 = 2;
/// None of the given paths is a markdown file.
pub const EXIT_NO_INPUT: i32 = 3;
/// The project requires a newer mdfmt.
pub const EXIT_UNSUPPORTED: i32 = 4;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Auto-format tutorial markdown files.",
	long_about = "mdfmt formats tutorial markdown: it wraps file paths, identifiers, numbers and \
	              class names in inline code, italicizes proper nouns, tags keyboard shortcuts, \
	              and tidies fenced code blocks.\n\nFormatted documents go to standard output \
	              unless `--in-place` or `--output` is given.\n\nExamples:\n  mdfmt lesson.md       \
	              Print the formatted lesson\n  mdfmt -i docs/        Format every markdown file \
	              under docs/\n  mdfmt --check --diff . Show what would change"
)]
#[allow(clippy::struct_excessive_bools)]
pub struct MdfmtCli {
	/// Markdown files or directories to format. Directories are searched
	/// recursively for `.md` files.
	#[arg(required = true)]
	pub paths: Vec<PathBuf>,

	/// Overwrite each source file with its formatted content.
	#[arg(long, short, default_value_t = false, conflicts_with_all = ["output", "check"])]
	pub in_place: bool,

	/// Write formatted files into this directory, which is created when
	/// missing.
	#[arg(long, short, conflicts_with = "check")]
	pub output: Option<PathBuf>,

	/// Write nothing and exit with status 1 when any file would change.
	#[arg(long, default_value_t = false)]
	pub check: bool,

	/// With `--check`, show a unified diff for every file that would
	/// change.
	#[arg(long, default_value_t = false, requires = "check")]
	pub diff: bool,

	/// Output format for `--check` results.
	#[arg(long, value_enum, default_value_t = ReportFormat::Text)]
	pub format: ReportFormat,

	/// Path to a config file. Defaults to the first of `mdfmt.toml`,
	/// `.mdfmt.toml` or `.config/mdfmt.toml` in the working directory.
	#[arg(long, short)]
	pub config: Option<PathBuf>,

	/// Column at which full-line code comments are wrapped.
	#[arg(long, value_parser = clap::value_parser!(u16).range(1..))]
	pub line_length: Option<u16>,

	/// Number of leading spaces converted to one tab in code blocks.
	#[arg(long, value_parser = clap::value_parser!(u16).range(1..))]
	pub tab_width: Option<u16>,

	/// Language tag added to code fences that have none.
	#[arg(long)]
	pub default_language: Option<String>,

	/// Enable debug logging on stderr.
	#[arg(long, short, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, default_value_t = false)]
	pub no_color: bool,
}

impl MdfmtCli {
	/// Where formatted documents should go.
	pub fn output_mode(&self) -> OutputMode {
		if self.check {
			OutputMode::Check
		} else if self.in_place {
			OutputMode::InPlace
		} else if let Some(dir) = &self.output {
			OutputMode::Directory(dir.clone())
		} else {
			OutputMode::Stdout
		}
	}

	/// Command line values win over the config file.
	pub fn apply_overrides(&self, config: &mut MdfmtConfig) {
		if let Some(line_length) = self.line_length {
			config.line_length = usize::from(line_length);
		}
		if let Some(tab_width) = self.tab_width {
			config.tab_width = usize::from(tab_width);
		}
		if let Some(language) = &self.default_language {
			config.default_language.clone_from(language);
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
	/// Human-readable text output with colors and formatting.
	Text,
	/// JSON output for programmatic consumption. Each entry includes the
	/// file path, its unterminated regions and, with `--diff`, the diff.
	Json,
}
