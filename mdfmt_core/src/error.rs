use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum MdfmtError {
	#[error(transparent)]
	#[diagnostic(code(mdfmt::io_error))]
	Io(#[from] std::io::Error),

	#[error("input not found: `{path}`")]
	#[diagnostic(
		code(mdfmt::input_not_found),
		help("check the path exists and points to a markdown file or a directory")
	)]
	InputNotFound { path: String },

	#[error("not a markdown file: `{path}`")]
	#[diagnostic(
		code(mdfmt::not_markdown),
		help("only files with a `.md` extension are formatted")
	)]
	NotMarkdown { path: String },

	#[error("failed to decode `{path}` as UTF-8")]
	#[diagnostic(code(mdfmt::decode), help("mdfmt only reads UTF-8 encoded markdown"))]
	Decode { path: String },

	#[error("unterminated {region} in {path} at line {line}, column {column}")]
	#[diagnostic(
		code(mdfmt::malformed_region),
		severity(Warning),
		help("the rest of the region was formatted as regular prose; close the {region} to protect it")
	)]
	MalformedRegion {
		region: String,
		path: String,
		line: usize,
		column: usize,
	},

	#[error("mdfmt {current} is older than the required minimum version {required}")]
	#[diagnostic(
		code(mdfmt::environment_unsupported),
		help("upgrade mdfmt or lower `minimum_version` in mdfmt.toml")
	)]
	EnvironmentUnsupported { required: String, current: String },

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(mdfmt::config_parse),
		help("check that mdfmt.toml is valid TOML and that version strings look like `1.2.3`")
	)]
	ConfigParse(String),

	#[error("failed to load class list `{path}`: {reason}")]
	#[diagnostic(code(mdfmt::class_list))]
	ClassList { path: String, reason: String },

	#[error("invalid pattern: {0}")]
	#[diagnostic(code(mdfmt::invalid_pattern))]
	InvalidPattern(String),

	#[error("no markdown files to format")]
	#[diagnostic(
		code(mdfmt::no_input_files),
		help("pass one or more `.md` files or directories containing them")
	)]
	NoInputFiles,
}

pub type MdfmtResult<T> = Result<T, MdfmtError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
