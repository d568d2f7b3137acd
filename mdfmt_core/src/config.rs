use std::collections::HashMap;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::MdfmtError;
use crate::MdfmtResult;
use crate::Rule;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] =
	["mdfmt.toml", ".mdfmt.toml", ".config/mdfmt.toml"];

/// Number of spaces converted to one tab inside code blocks.
pub const DEFAULT_TAB_WIDTH: usize = 4;

/// Column at which full-line code comments are wrapped.
pub const DEFAULT_LINE_LENGTH: usize = 80;

/// Language tag inserted on code fences that declare none.
pub const DEFAULT_LANGUAGE: &str = "gdscript";

/// File extensions recognized by the `paths` rule when none are configured.
pub const DEFAULT_FILE_EXTENSIONS: &[&str] = &[
	"gd", "gdshader", "shader", "tscn", "tres", "scn", "res", "import", "godot", "cfg", "md",
	"txt", "json", "csv", "toml", "yml", "yaml", "xml", "html", "css", "js", "ts", "py", "rs",
	"cs", "cpp", "h", "c", "sh", "png", "jpg", "jpeg", "svg", "webp", "gif", "ogg", "wav", "mp3",
	"glb", "gltf", "obj", "fbx", "blend", "ttf", "otf", "zip", "exe", "apk", "pck",
];

/// Configuration loaded from an `mdfmt.toml` file.
///
/// ```toml
/// minimum_version = "0.1.0"
/// tab_width = 4
/// line_length = 80
/// default_language = "gdscript"
/// space_indented_languages = ["yaml", "yml", "markdown", "md"]
///
/// [words]
/// plain = ["godot", "gdquest"]
///
/// [classes]
/// files = ["classes.txt"]
/// names = ["PlayerController"]
///
/// [comments]
/// gdshader = "//"
///
/// [rules]
/// disabled = ["capitalized_words"]
///
/// [exclude]
/// patterns = ["drafts/"]
/// disable_gitignore = false
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct MdfmtConfig {
	/// Oldest mdfmt version allowed to format this project.
	#[serde(default)]
	pub minimum_version: Option<String>,
	#[serde(default = "default_tab_width")]
	pub tab_width: usize,
	#[serde(default = "default_line_length")]
	pub line_length: usize,
	#[serde(default = "default_language")]
	pub default_language: String,
	/// Code block languages whose indentation must stay as spaces.
	#[serde(default = "default_space_indented_languages")]
	pub space_indented_languages: Vec<String>,
	/// Replaces [`DEFAULT_FILE_EXTENSIONS`] when set.
	#[serde(default)]
	pub file_extensions: Option<Vec<String>>,
	#[serde(default)]
	pub words: WordsConfig,
	#[serde(default)]
	pub classes: ClassesConfig,
	/// Comment marker per code block language, merged over the built-in
	/// markers.
	#[serde(default)]
	pub comments: HashMap<String, String>,
	#[serde(default)]
	pub rules: RulesConfig,
	#[serde(default)]
	pub exclude: ExcludeConfig,
	/// Directory that relative paths in the config resolve against. Set to
	/// the directory holding the config file when loaded from disk.
	#[serde(skip)]
	pub base_dir: PathBuf,
}

/// Words that the italicizing rules must leave plain.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WordsConfig {
	/// Case-insensitive words added to the built-in allow-list.
	#[serde(default)]
	pub plain: Vec<String>,
}

/// Extra names for the built-in class registry.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClassesConfig {
	/// Flat text files with one class name per line. Lines starting with `#`
	/// are comments.
	#[serde(default)]
	pub files: Vec<PathBuf>,
	#[serde(default)]
	pub names: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RulesConfig {
	/// Prose rules to skip.
	#[serde(default)]
	pub disabled: Vec<Rule>,
}

/// Files and directories skipped while collecting inputs from directories.
/// Patterns follow gitignore syntax and are relative to `base_dir`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExcludeConfig {
	#[serde(default)]
	pub patterns: Vec<String>,
	/// Stop honoring the project's `.gitignore` while walking directories.
	#[serde(default)]
	pub disable_gitignore: bool,
}

fn default_tab_width() -> usize {
	DEFAULT_TAB_WIDTH
}

fn default_line_length() -> usize {
	DEFAULT_LINE_LENGTH
}

fn default_language() -> String {
	DEFAULT_LANGUAGE.to_string()
}

fn default_space_indented_languages() -> Vec<String> {
	["yaml", "yml", "markdown", "md"]
		.into_iter()
		.map(String::from)
		.collect()
}

impl Default for MdfmtConfig {
	fn default() -> Self {
		Self {
			minimum_version: None,
			tab_width: DEFAULT_TAB_WIDTH,
			line_length: DEFAULT_LINE_LENGTH,
			default_language: default_language(),
			space_indented_languages: default_space_indented_languages(),
			file_extensions: None,
			words: WordsConfig::default(),
			classes: ClassesConfig::default(),
			comments: HashMap::new(),
			rules: RulesConfig::default(),
			exclude: ExcludeConfig::default(),
			base_dir: PathBuf::from("."),
		}
	}
}

impl MdfmtConfig {
	/// Resolve the config path from known discovery candidates.
	#[must_use]
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if no config file exists.
	pub fn load(root: &Path) -> MdfmtResult<Option<MdfmtConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		Self::load_from(&config_path).map(Some)
	}

	/// Load the config from an explicit file path.
	pub fn load_from(path: &Path) -> MdfmtResult<MdfmtConfig> {
		let content = std::fs::read_to_string(path)?;
		let mut config = Self::from_toml(&content)?;
		config.base_dir = path
			.parent()
			.filter(|parent| !parent.as_os_str().is_empty())
			.map_or_else(|| PathBuf::from("."), Path::to_path_buf);

		// `.config/mdfmt.toml` belongs to the directory above `.config`.
		if config.base_dir.file_name().is_some_and(|name| name == ".config") {
			if let Some(project_dir) = config.base_dir.parent() {
				config.base_dir = project_dir.to_path_buf();
			}
		}

		tracing::debug!(path = %path.display(), "loaded config");
		Ok(config)
	}

	/// Parse a config from TOML source.
	pub fn from_toml(content: &str) -> MdfmtResult<MdfmtConfig> {
		let config: MdfmtConfig =
			toml::from_str(content).map_err(|e| MdfmtError::ConfigParse(e.to_string()))?;

		if config.tab_width == 0 {
			return Err(MdfmtError::ConfigParse(
				"`tab_width` must be at least 1".to_string(),
			));
		}

		Ok(config)
	}

	/// Fail when `minimum_version` is newer than `current`.
	pub fn ensure_supported(&self, current: &str) -> MdfmtResult<()> {
		let Some(required) = self.minimum_version.as_deref() else {
			return Ok(());
		};

		let parse = |value: &str| {
			parse_version(value).ok_or_else(|| {
				MdfmtError::ConfigParse(format!("invalid version string `{value}`"))
			})
		};

		if parse(current)? < parse(required)? {
			return Err(MdfmtError::EnvironmentUnsupported {
				required: required.to_string(),
				current: current.to_string(),
			});
		}

		Ok(())
	}

	/// The comment marker for a code block language, if comments in that
	/// language should be re-wrapped.
	pub fn comment_marker(&self, language: &str) -> Option<&str> {
		let language = language.to_ascii_lowercase();
		if let Some(marker) = self.comments.get(&language) {
			return (!marker.is_empty()).then_some(marker.as_str());
		}
		builtin_comment_marker(&language)
	}

	/// Whether code blocks in `language` keep their space indentation.
	pub fn keeps_spaces(&self, language: &str) -> bool {
		self.space_indented_languages
			.iter()
			.any(|candidate| candidate.eq_ignore_ascii_case(language))
	}

	/// Extensions recognized as file names by the `paths` rule.
	pub fn file_extensions(&self) -> Vec<String> {
		match &self.file_extensions {
			Some(extensions) => extensions.clone(),
			None => DEFAULT_FILE_EXTENSIONS
				.iter()
				.map(|ext| (*ext).to_string())
				.collect(),
		}
	}

	/// Resolve a config-relative path.
	pub fn resolve(&self, path: &Path) -> PathBuf {
		if path.is_absolute() {
			path.to_path_buf()
		} else {
			self.base_dir.join(path)
		}
	}
}

fn builtin_comment_marker(language: &str) -> Option<&'static str> {
	match language {
		"gdscript" | "gd" | "python" | "py" | "sh" | "bash" | "shell" | "zsh" | "toml"
		| "yaml" | "yml" | "ini" | "cfg" => Some("#"),
		"gdshader" | "glsl" | "shader" | "c" | "cpp" | "c++" | "h" | "csharp" | "cs" | "rust"
		| "rs" | "js" | "javascript" | "ts" | "typescript" | "java" | "go" | "kotlin"
		| "swift" => Some("//"),
		"lua" | "sql" => Some("--"),
		_ => None,
	}
}

/// Parse `1.2.3`, `v1.2`, or `1.2.3-beta.1` into numeric components. Build
/// and pre-release suffixes are ignored.
pub(crate) fn parse_version(value: &str) -> Option<Vec<u64>> {
	let value = value.trim();
	let value = value.strip_prefix('v').unwrap_or(value);
	let core = value.split(['-', '+']).next().unwrap_or(value);
	if core.is_empty() {
		return None;
	}

	let mut parts: Vec<u64> = core
		.split('.')
		.map(|part| part.parse().ok())
		.collect::<Option<_>>()?;
	while parts.len() < 3 {
		parts.push(0);
	}
	Some(parts)
}
