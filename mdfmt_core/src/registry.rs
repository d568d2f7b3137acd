use std::collections::BTreeSet;
use std::collections::HashSet;
use std::path::Path;

use regex::Regex;
use regex::RegexBuilder;

use crate::BUILT_IN_CLASSES;
use crate::MdfmtConfig;
use crate::MdfmtError;
use crate::MdfmtResult;

/// Lowercase words the italicizing rules leave plain when no configuration
/// adds to them: brand names, platforms, and common proper nouns.
pub const DEFAULT_PLAIN_WORDS: &[&str] = &[
	"android", "apple", "blender", "discord", "gdquest", "gdscript", "github", "gitlab", "godot",
	"google", "html", "i", "inkscape", "ios", "itch", "javascript", "krita", "linux", "mac",
	"macos", "microsoft", "ok", "python", "rust", "steam", "ubuntu", "windows", "youtube",
];

/// The set of type names wrapped in inline code by the `built_in_classes`
/// rule.
///
/// Registries are plain values built once per run and handed to the
/// [`crate::ProseRewriter`]; there is no process-wide class list.
#[derive(Debug, Clone)]
pub struct ClassRegistry {
	names: BTreeSet<String>,
	pattern: Option<Regex>,
}

impl ClassRegistry {
	/// A registry holding exactly `names`.
	pub fn new<I, S>(names: I) -> MdfmtResult<Self>
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let names: BTreeSet<String> = names
			.into_iter()
			.map(Into::into)
			.map(|name| name.trim().to_string())
			.filter(|name| !name.is_empty())
			.collect();
		let pattern = build_alternation(&names)?;

		Ok(Self { names, pattern })
	}

	/// An empty registry. The `built_in_classes` rule becomes a no-op.
	pub fn empty() -> Self {
		Self {
			names: BTreeSet::new(),
			pattern: None,
		}
	}

	/// The built-in engine classes.
	pub fn builtin() -> MdfmtResult<Self> {
		Self::new(BUILT_IN_CLASSES.iter().copied())
	}

	/// The built-in classes extended with the names and class-list files
	/// configured under `[classes]`.
	pub fn from_config(config: &MdfmtConfig) -> MdfmtResult<Self> {
		let mut names: Vec<String> = BUILT_IN_CLASSES.iter().map(|s| (*s).to_string()).collect();
		names.extend(config.classes.names.iter().cloned());

		for file in &config.classes.files {
			let path = config.resolve(file);
			names.extend(read_class_list(&path)?);
		}

		Self::new(names)
	}

	pub fn contains(&self, name: &str) -> bool {
		self.names.contains(name)
	}

	pub fn len(&self) -> usize {
		self.names.len()
	}

	pub fn is_empty(&self) -> bool {
		self.names.is_empty()
	}

	/// Whole-word matcher for every registered name, longest first.
	pub(crate) fn pattern(&self) -> Option<&Regex> {
		self.pattern.as_ref()
	}
}

/// Read a flat class-name list: one name per line, `#` starts a comment.
pub fn read_class_list(path: &Path) -> MdfmtResult<Vec<String>> {
	let content = std::fs::read_to_string(path).map_err(|e| MdfmtError::ClassList {
		path: path.display().to_string(),
		reason: e.to_string(),
	})?;

	let names: Vec<String> = content
		.lines()
		.map(str::trim)
		.filter(|line| !line.is_empty() && !line.starts_with('#'))
		.map(String::from)
		.collect();

	tracing::debug!(path = %path.display(), count = names.len(), "loaded class list");
	Ok(names)
}

fn build_alternation(names: &BTreeSet<String>) -> MdfmtResult<Option<Regex>> {
	if names.is_empty() {
		return Ok(None);
	}

	let mut sorted: Vec<&String> = names.iter().collect();
	sorted.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
	let alternation = sorted
		.iter()
		.map(|name| regex::escape(name))
		.collect::<Vec<_>>()
		.join("|");

	RegexBuilder::new(&format!(r"\b(?:{alternation})\b"))
		.size_limit(64 * (1 << 20))
		.build()
		.map(Some)
		.map_err(|e| MdfmtError::InvalidPattern(e.to_string()))
}

/// Case-insensitive set of words kept plain by the italicizing rules.
#[derive(Debug, Clone, Default)]
pub struct WordAllowList {
	words: HashSet<String>,
}

impl WordAllowList {
	pub fn new<I, S>(words: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		Self {
			words: words
				.into_iter()
				.map(|word| word.as_ref().trim().to_lowercase())
				.filter(|word| !word.is_empty())
				.collect(),
		}
	}

	/// The default words plus `[words] plain` from the config.
	pub fn from_config(config: &MdfmtConfig) -> Self {
		Self::new(
			DEFAULT_PLAIN_WORDS
				.iter()
				.copied()
				.chain(config.words.plain.iter().map(String::as_str)),
		)
	}

	pub fn contains(&self, word: &str) -> bool {
		self.words.contains(&word.to_lowercase())
	}
}

impl Default for ClassRegistry {
	fn default() -> Self {
		Self::empty()
	}
}
