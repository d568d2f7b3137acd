use std::collections::HashSet;
use std::fmt;
use std::ops::Range;

use regex::Regex;
use serde::Deserialize;

use crate::ClassRegistry;
use crate::MdfmtConfig;
use crate::MdfmtError;
use crate::MdfmtResult;
use crate::WordAllowList;
use crate::marks::MarkKind;
use crate::marks::Span;
use crate::marks::split_marks;
use crate::patterns::BLOCK_MARKER;
use crate::patterns::CAPITALIZED_SEQUENCE;
use crate::patterns::CAPITALIZED_WORD;
use crate::patterns::DIRECTORY_PATH;
use crate::patterns::HEADING;
use crate::patterns::HEX_COLOR;
use crate::patterns::IDENTIFIER;
use crate::patterns::KEYBOARD_CHORD;
use crate::patterns::MARKUP_ONLY_LINE;
use crate::patterns::NUMBER;
use crate::patterns::NUMERIC_RANGE;

/// A named rewrite pass over the unmarked text of a prose line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
	/// Wrap file and directory paths in inline code.
	Paths,
	/// Wrap `snake_case`, dotted member access and calls in inline code.
	Identifiers,
	/// Italicize runs of two or more capitalized words.
	ProperNounSequences,
	/// Wrap registered class names in inline code.
	BuiltInClasses,
	/// Wrap `#rrggbb`-style colors in inline code.
	HexColors,
	/// Italicize single capitalized words inside a sentence.
	CapitalizedWords,
	/// Wrap numbers, dimension pairs and numeric ranges in inline code.
	Numbers,
	/// Wrap each key of a `Ctrl + S` chord in `<kbd>`.
	KeyboardShortcuts,
	/// Merge doubled backticks left inside a code span by adjacent wraps.
	CollapseCode,
}

/// Every rule in the order the rewriter applies them.
pub const RULE_ORDER: [Rule; 9] = [
	Rule::Paths,
	Rule::Identifiers,
	Rule::ProperNounSequences,
	Rule::BuiltInClasses,
	Rule::HexColors,
	Rule::CapitalizedWords,
	Rule::Numbers,
	Rule::KeyboardShortcuts,
	Rule::CollapseCode,
];

impl Rule {
	/// The name used for this rule in `mdfmt.toml`.
	pub fn name(self) -> &'static str {
		match self {
			Self::Paths => "paths",
			Self::Identifiers => "identifiers",
			Self::ProperNounSequences => "proper_noun_sequences",
			Self::BuiltInClasses => "built_in_classes",
			Self::HexColors => "hex_colors",
			Self::CapitalizedWords => "capitalized_words",
			Self::Numbers => "numbers",
			Self::KeyboardShortcuts => "keyboard_shortcuts",
			Self::CollapseCode => "collapse_code",
		}
	}
}

impl fmt::Display for Rule {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

/// A replacement of `range` in the line being rewritten.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Edit {
	range: Range<usize>,
	replacement: String,
}

impl Edit {
	fn code(line: &str, range: Range<usize>) -> Self {
		let replacement = format!("`{}`", &line[range.clone()]);
		Self { range, replacement }
	}

	fn italic(line: &str, range: Range<usize>) -> Self {
		let replacement = format!("*{}*", &line[range.clone()]);
		Self { range, replacement }
	}
}

/// Applies the ordered [`Rule`]s to prose.
///
/// The rewriter is pure: the class registry, allow-list and file extensions
/// are owned values handed in at construction, so one rewriter can format
/// any number of documents.
#[derive(Debug, Clone)]
pub struct ProseRewriter {
	classes: ClassRegistry,
	plain_words: WordAllowList,
	file_path: Option<Regex>,
	disabled: HashSet<Rule>,
}

impl ProseRewriter {
	/// Build a rewriter that recognizes files with the given `extensions`.
	pub fn new<S: AsRef<str>>(
		classes: ClassRegistry,
		plain_words: WordAllowList,
		extensions: &[S],
	) -> MdfmtResult<Self> {
		Ok(Self {
			classes,
			plain_words,
			file_path: file_path_pattern(extensions)?,
			disabled: HashSet::new(),
		})
	}

	/// Build a rewriter from the registries, extensions and disabled rules
	/// of `config`.
	pub fn from_config(config: &MdfmtConfig) -> MdfmtResult<Self> {
		let rewriter = Self::new(
			ClassRegistry::from_config(config)?,
			WordAllowList::from_config(config),
			&config.file_extensions(),
		)?;

		Ok(rewriter.with_disabled(config.rules.disabled.iter().copied()))
	}

	/// Skip `rules` when rewriting.
	#[must_use]
	pub fn with_disabled(mut self, rules: impl IntoIterator<Item = Rule>) -> Self {
		self.disabled.extend(rules);
		self
	}

	pub fn is_enabled(&self, rule: Rule) -> bool {
		!self.disabled.contains(&rule)
	}

	/// Rewrite a block of prose line by line. `preceding` is the source text
	/// just before `text`: the previous line and anything earlier on the
	/// same line. It decides whether the first words of `text` start a
	/// sentence.
	pub fn rewrite(&self, text: &str, preceding: &str) -> String {
		let mut output = String::with_capacity(text.len() + text.len() / 8);
		let mut context = preceding;

		for line in text.split_inclusive('\n') {
			let (content, ending) = split_line_ending(line);
			output.push_str(&self.rewrite_line_in_context(content, context));
			output.push_str(ending);
			context = line;
		}

		output
	}

	/// Rewrite one line that starts a paragraph.
	pub fn rewrite_line(&self, line: &str) -> String {
		self.rewrite_line_in_context(line, "")
	}

	/// Rewrite one line, given the source text before it.
	pub fn rewrite_line_in_context(&self, line: &str, preceding: &str) -> String {
		if line.trim().is_empty() {
			return line.to_string();
		}

		let mut current = line.to_string();
		for rule in RULE_ORDER {
			if self.is_enabled(rule) {
				current = self.apply_rule(rule, &current, preceding);
			}
		}
		current
	}

	/// Run a single rule over the unmarked spans of `line`.
	pub fn apply_rule(&self, rule: Rule, line: &str, preceding: &str) -> String {
		let spans = split_marks(line);
		let plain: Vec<Range<usize>> = spans
			.iter()
			.filter(|span| span.is_plain())
			.map(Span::range)
			.collect();

		let edits = match rule {
			Rule::Paths => self.path_edits(line, &plain),
			Rule::Identifiers => identifier_edits(line, &plain),
			Rule::ProperNounSequences => {
				let context = LineContext::new(line, &plain, preceding);
				self.proper_noun_edits(line, &plain, &context)
			}
			Rule::BuiltInClasses => self.class_edits(line, &plain),
			Rule::HexColors => hex_color_edits(line, &plain),
			Rule::CapitalizedWords => {
				let context = LineContext::new(line, &plain, preceding);
				self.capitalized_word_edits(line, &plain, &context)
			}
			Rule::Numbers => {
				let context = LineContext::new(line, &plain, preceding);
				number_edits(line, &plain, &context)
			}
			Rule::KeyboardShortcuts => keyboard_edits(line, &plain),
			Rule::CollapseCode => collapse_code_edits(line, &spans),
		};

		if !edits.is_empty() {
			tracing::trace!(rule = %rule, edits = edits.len(), "rewrote prose line");
		}

		splice(line, edits)
	}

	fn path_edits(&self, line: &str, plain: &[Range<usize>]) -> Vec<Edit> {
		let blocked_before =
			|c: char| is_word_char(c) || matches!(c, '.' | '/' | ':' | '-' | '@' | '\\');
		let mut edits: Vec<Edit> = Vec::new();

		for range in plain {
			if let Some(file_path) = &self.file_path {
				for found in matches_in(file_path, line, range.clone()) {
					if prev_char(line, found.start).is_some_and(blocked_before) {
						continue;
					}
					edits.push(Edit::code(line, found));
				}
			}

			for found in matches_in(&DIRECTORY_PATH, line, range.clone()) {
				if edits.iter().any(|edit| overlaps(&edit.range, &found)) {
					continue;
				}
				if prev_char(line, found.start).is_some_and(blocked_before) {
					continue;
				}
				let ends_path = next_char(line, found.end).is_none_or(|c| {
					c.is_whitespace() || matches!(c, '.' | ',' | ';' | ':' | '!' | '?' | ')')
				});
				if ends_path {
					edits.push(Edit::code(line, found));
				}
			}
		}

		edits
	}

	fn proper_noun_edits(
		&self,
		line: &str,
		plain: &[Range<usize>],
		context: &LineContext<'_>,
	) -> Vec<Edit> {
		if context.heading {
			return Vec::new();
		}

		let mut edits = Vec::new();
		for range in plain {
			for found in matches_in(&CAPITALIZED_SEQUENCE, line, range.clone()) {
				let words = word_ranges(line, found);
				let last = words.len() - 1;
				let eligible: Vec<bool> = words
					.iter()
					.enumerate()
					.map(|(index, word)| {
						if index == 0 && blocks_word_start(line, word.start) {
							return false;
						}
						if index == last && blocks_word_end(line, word.end) {
							return false;
						}
						let text = &line[word.clone()];
						self.is_italic_candidate(text)
							&& !self.classes.contains(text)
							&& !context.in_chord(word)
					})
					.collect();

				let mut index = 0;
				while index < words.len() {
					if !eligible[index] {
						index += 1;
						continue;
					}
					let mut end = index;
					while end + 1 < words.len() && eligible[end + 1] {
						end += 1;
					}
					if end > index {
						edits.push(Edit::italic(line, words[index].start..words[end].end));
					}
					index = end + 1;
				}
			}
		}

		edits
	}

	fn class_edits(&self, line: &str, plain: &[Range<usize>]) -> Vec<Edit> {
		let Some(pattern) = self.classes.pattern() else {
			return Vec::new();
		};

		plain
			.iter()
			.flat_map(|range| matches_in(pattern, line, range.clone()))
			.filter(|found| {
				!prev_char(line, found.start)
					.is_some_and(|c| is_word_char(c) || matches!(c, '.' | '$' | '/' | '-' | '@' | '#'))
					&& !next_char(line, found.end).is_some_and(|c| is_word_char(c) || c == '-')
			})
			.map(|found| Edit::code(line, found))
			.collect()
	}

	fn capitalized_word_edits(
		&self,
		line: &str,
		plain: &[Range<usize>],
		context: &LineContext<'_>,
	) -> Vec<Edit> {
		if context.heading {
			return Vec::new();
		}

		plain
			.iter()
			.flat_map(|range| matches_in(&CAPITALIZED_WORD, line, range.clone()))
			.filter(|found| {
				!blocks_word_start(line, found.start)
					&& !blocks_word_end(line, found.end)
					&& self.is_italic_candidate(&line[found.clone()])
					&& !context.in_chord(found)
					&& !context.is_sentence_start(line, found.start)
			})
			.map(|found| Edit::italic(line, found))
			.collect()
	}

	/// Mixed-case words that are not on the allow-list.
	fn is_italic_candidate(&self, word: &str) -> bool {
		word.chars().any(char::is_lowercase) && !self.plain_words.contains(word)
	}
}

/// What the sentence-aware rules need to know about the line being
/// rewritten.
struct LineContext<'a> {
	preceding: &'a str,
	heading: bool,
	chords: Vec<Range<usize>>,
}

impl<'a> LineContext<'a> {
	fn new(line: &str, plain: &[Range<usize>], preceding: &'a str) -> Self {
		let same_line = preceding.rsplit_once('\n').map_or(preceding, |(_, rest)| rest);
		let heading = if same_line.is_empty() {
			HEADING.is_match(line)
		} else {
			HEADING.is_match(&format!("{same_line}{line}"))
		};
		let chords = plain
			.iter()
			.flat_map(|range| matches_in(&KEYBOARD_CHORD, line, range.clone()))
			.collect();

		Self {
			preceding,
			heading,
			chords,
		}
	}

	fn in_chord(&self, range: &Range<usize>) -> bool {
		self.chords.iter().any(|chord| overlaps(chord, range))
	}

	/// Whether the word at `start` opens a sentence: it follows terminal
	/// punctuation, a list/heading/table marker, a heading or markup-only
	/// line, or nothing at all.
	fn is_sentence_start(&self, line: &str, start: usize) -> bool {
		let (earlier, same_line) = self.preceding.rsplit_once('\n').unwrap_or(("", self.preceding));
		let head = format!("{same_line}{}", &line[..start]);
		let head = head.trim_end();

		if BLOCK_MARKER.is_match(head) {
			return true;
		}

		let bare = trim_openers(head);
		if BLOCK_MARKER.is_match(bare) {
			return true;
		}
		if !bare.is_empty() {
			return ends_sentence(bare);
		}

		let earlier = earlier.rsplit('\n').next().unwrap_or(earlier);
		if HEADING.is_match(earlier) || MARKUP_ONLY_LINE.is_match(earlier) {
			return true;
		}

		let earlier = trim_openers(earlier);
		earlier.is_empty() || ends_sentence(earlier)
	}
}

fn trim_openers(text: &str) -> &str {
	text.trim_end_matches(|c: char| {
		c.is_whitespace() || matches!(c, '`' | '*' | '_' | '"' | '\'' | '(' | '[' | '\u{201c}' | '\u{2018}')
	})
}

fn ends_sentence(text: &str) -> bool {
	text.ends_with(['.', '!', '?', ':', '|', '\u{2026}'])
}

fn identifier_edits(line: &str, plain: &[Range<usize>]) -> Vec<Edit> {
	plain
		.iter()
		.flat_map(|range| {
			matches_in(&IDENTIFIER, line, range.clone())
				.into_iter()
				.filter(move |found| {
					// A call whose arguments were split off, as in `f("text")`.
					let open_call = next_char(line, found.end) == Some('(')
						&& !line[found.end..range.end].contains(')');
					!open_call
				})
		})
		.filter(|found| {
			!prev_char(line, found.start)
				.is_some_and(|c| is_word_char(c) || matches!(c, '.' | '$' | '-' | '/'))
				&& !next_char(line, found.end).is_some_and(|c| is_word_char(c) || c == '-')
		})
		.map(|found| Edit::code(line, found))
		.collect()
}

fn hex_color_edits(line: &str, plain: &[Range<usize>]) -> Vec<Edit> {
	plain
		.iter()
		.flat_map(|range| matches_in(&HEX_COLOR, line, range.clone()))
		.filter(|found| {
			!prev_char(line, found.start).is_some_and(|c| is_word_char(c) || matches!(c, '&' | '#'))
		})
		.map(|found| Edit::code(line, found))
		.collect()
}

fn number_edits(line: &str, plain: &[Range<usize>], context: &LineContext<'_>) -> Vec<Edit> {
	let mut edits: Vec<Edit> = Vec::new();

	for range in plain {
		for found in matches_in(&NUMERIC_RANGE, line, range.clone()) {
			if prev_char(line, found.start).is_some_and(is_word_char) {
				continue;
			}
			edits.push(Edit::code(line, found));
		}

		for found in matches_in(&NUMBER, line, range.clone()) {
			if edits.iter().any(|edit| overlaps(&edit.range, &found)) {
				continue;
			}

			let mut start = found.start;
			match prev_char(line, start) {
				Some(c) if is_word_char(c) || matches!(c, '.' | '#' | '$' | '@' | '&') => continue,
				Some('-') => {
					let before = prev_char(line, start - 1);
					if start - 1 >= range.start
						&& before.is_none_or(|c| c.is_whitespace() || matches!(c, '(' | '['))
					{
						start -= 1;
					}
				}
				_ => {}
			}

			let next = next_char(line, found.end);
			if next.is_some_and(is_word_char) {
				continue;
			}
			let list_marker =
				line[..found.start].trim().is_empty() && matches!(next, Some('.' | ')'));
			if list_marker || context.in_chord(&found) {
				continue;
			}

			edits.push(Edit::code(line, start..found.end));
		}
	}

	edits
}

/// `Ctrl + Shift + S` becomes `<kbd>Ctrl</kbd> + <kbd>Shift</kbd> + <kbd>S</kbd>`.
fn keyboard_edits(line: &str, plain: &[Range<usize>]) -> Vec<Edit> {
	plain
		.iter()
		.flat_map(|range| matches_in(&KEYBOARD_CHORD, line, range.clone()))
		.map(|found| {
			let replacement = line[found.clone()]
				.split('+')
				.map(|part| {
					let key = part.trim();
					let leading = &part[..part.len() - part.trim_start().len()];
					let trailing = &part[part.trim_end().len()..];
					format!("{leading}<kbd>{key}</kbd>{trailing}")
				})
				.collect::<Vec<_>>()
				.join("+");

			Edit {
				range: found,
				replacement,
			}
		})
		.collect()
}

/// Remove doubled backticks from single-backtick code spans, so that
/// `` `foo``_bar` `` becomes `` `foo_bar` ``.
fn collapse_code_edits(line: &str, spans: &[Span]) -> Vec<Edit> {
	spans
		.iter()
		.filter_map(|span| {
			match span {
				Span::Marked {
					kind: MarkKind::Code,
					range,
				} => Some(range.clone()),
				_ => None,
			}
		})
		.filter(|range| !line[range.start + 1..].starts_with('`'))
		.filter_map(|range| {
			let inner = &line[range.start + 1..range.end - 1];
			let collapsed = remove_double_backticks(inner);
			(collapsed != inner).then(|| {
				Edit {
					range,
					replacement: format!("`{collapsed}`"),
				}
			})
		})
		.collect()
}

fn remove_double_backticks(text: &str) -> String {
	let mut result = String::with_capacity(text.len());
	let mut rest = text;

	while let Some(start) = rest.find('`') {
		result.push_str(&rest[..start]);
		let run = rest[start..].bytes().take_while(|byte| *byte == b'`').count();
		if run != 2 {
			result.push_str(&rest[start..start + run]);
		}
		rest = &rest[start + run..];
	}

	result.push_str(rest);
	result
}

/// Apply non-overlapping edits. When two edits overlap the earlier one wins.
fn splice(line: &str, mut edits: Vec<Edit>) -> String {
	if edits.is_empty() {
		return line.to_string();
	}

	edits.sort_by_key(|edit| edit.range.start);
	let mut output = String::with_capacity(line.len() + edits.len() * 2);
	let mut cursor = 0;

	for edit in edits {
		if edit.range.start < cursor {
			continue;
		}
		output.push_str(&line[cursor..edit.range.start]);
		output.push_str(&edit.replacement);
		cursor = edit.range.end;
	}

	output.push_str(&line[cursor..]);
	output
}

fn file_path_pattern<S: AsRef<str>>(extensions: &[S]) -> MdfmtResult<Option<Regex>> {
	let mut extensions: Vec<&str> = extensions
		.iter()
		.map(|ext| ext.as_ref().trim().trim_start_matches('.'))
		.filter(|ext| !ext.is_empty())
		.collect();
	if extensions.is_empty() {
		return Ok(None);
	}

	extensions.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
	extensions.dedup();
	let alternation = extensions
		.iter()
		.map(|ext| regex::escape(ext))
		.collect::<Vec<_>>()
		.join("|");

	Regex::new(&format!(
		r"(?:(?:res|user)://|/)?(?:[\w.-]+/)*[\w-]+(?:\.[\w-]+)*\.(?i:{alternation})\b"
	))
	.map(Some)
	.map_err(|e| MdfmtError::InvalidPattern(e.to_string()))
}

/// All matches of `pattern` lying inside `range` of `line`. Matching starts
/// at `range.start` but sees the text before it, so `\b` behaves.
fn matches_in(pattern: &Regex, line: &str, range: Range<usize>) -> Vec<Range<usize>> {
	let haystack = &line[..range.end];
	let mut found = Vec::new();
	let mut cursor = range.start;

	while let Some(m) = pattern.find_at(haystack, cursor) {
		if m.is_empty() {
			break;
		}
		found.push(m.range());
		cursor = m.end();
	}

	found
}

/// Byte ranges of the space-separated words in `range`.
fn word_ranges(line: &str, range: Range<usize>) -> Vec<Range<usize>> {
	let mut words = Vec::new();
	let mut start = range.start;

	for word in line[range.clone()].split(' ') {
		if !word.is_empty() {
			words.push(start..start + word.len());
		}
		start += word.len() + 1;
	}

	words
}

fn blocks_word_start(line: &str, start: usize) -> bool {
	prev_char(line, start)
		.is_some_and(|c| is_word_char(c) || matches!(c, '.' | '$' | '\'' | '-' | '/' | '#' | '@'))
}

fn blocks_word_end(line: &str, end: usize) -> bool {
	next_char(line, end).is_some_and(|c| is_word_char(c) || matches!(c, '(' | '-' | '/' | '@'))
}

fn split_line_ending(line: &str) -> (&str, &str) {
	let content = line.trim_end_matches(['\n', '\r']);
	(content, &line[content.len()..])
}

fn prev_char(line: &str, index: usize) -> Option<char> {
	line[..index].chars().next_back()
}

fn next_char(line: &str, index: usize) -> Option<char> {
	line[index..].chars().next()
}

fn is_word_char(c: char) -> bool {
	c.is_alphanumeric() || c == '_'
}

fn overlaps(a: &Range<usize>, b: &Range<usize>) -> bool {
	a.start < b.end && b.start < a.end
}
