use crate::MdfmtConfig;

/// Reformats fenced code blocks: fills in a missing language, converts
/// space indentation to tabs and re-wraps over-long full-line comments.
#[derive(Debug, Clone, Default)]
pub struct CodeBlockRewriter {
	config: MdfmtConfig,
}

impl CodeBlockRewriter {
	pub fn new(config: &MdfmtConfig) -> Self {
		Self {
			config: config.clone(),
		}
	}

	/// Rewrite one complete code block, fences included. Text that is not a
	/// closed fenced block is returned unchanged.
	pub fn rewrite(&self, block: &str) -> String {
		let Some((opening, rest)) = block.split_once('\n') else {
			return block.to_string();
		};
		let Some(fence) = Fence::open(opening) else {
			return block.to_string();
		};
		let (body, closing) = match rest.rfind('\n') {
			Some(index) => rest.split_at(index + 1),
			None => ("", rest),
		};
		if !fence.is_closed_by(closing) {
			return block.to_string();
		}

		let indent = &opening[..fence.indent];
		let (marker, info) = opening[fence.indent..].split_at(fence.length);

		let language = info.split_whitespace().next().unwrap_or_default();
		let (info, language) = if language.is_empty() {
			let default = self.config.default_language.as_str();
			(default, default)
		} else {
			(info, language)
		};

		let mut output = String::with_capacity(block.len() + info.len());
		output.push_str(indent);
		output.push_str(marker);
		output.push_str(info);
		output.push('\n');
		output.push_str(&self.rewrite_body(body, indent, language));
		output.push_str(closing);
		output
	}

	fn rewrite_body(&self, body: &str, indent: &str, language: &str) -> String {
		let keeps_spaces = self.config.keeps_spaces(language);
		let marker = self.config.comment_marker(language);
		let mut output = String::with_capacity(body.len());

		for line in body.split_inclusive('\n') {
			let content = line.trim_end_matches(['\n', '\r']);
			let ending = &line[content.len()..];
			let (prefix, code) = match content.strip_prefix(indent) {
				Some(code) => (indent, code),
				None => ("", content),
			};

			let code = if keeps_spaces {
				code.to_string()
			} else {
				spaces_to_tabs(code, self.config.tab_width)
			};

			let wrapped = marker
				.filter(|_| self.display_width(&code) > self.config.line_length)
				.and_then(|marker| self.wrap_comment(&code, marker));

			match wrapped {
				Some(lines) => {
					let last = lines.len() - 1;
					for (index, wrapped_line) in lines.iter().enumerate() {
						output.push_str(prefix);
						output.push_str(wrapped_line);
						output.push_str(if index == last { ending } else { "\n" });
					}
				}
				None => {
					output.push_str(prefix);
					output.push_str(&code);
					output.push_str(ending);
				}
			}
		}

		output
	}

	/// Greedily wrap a full-line comment. Every produced line repeats the
	/// indentation and the marker run, so `## text` stays a `##` comment.
	fn wrap_comment(&self, line: &str, marker: &str) -> Option<Vec<String>> {
		let trimmed = line.trim_start();
		let indentation = &line[..line.len() - trimmed.len()];
		let run = marker_run(trimmed, marker)?;
		let text = trimmed[run.len()..].strip_prefix(' ')?;
		if text.trim().is_empty() {
			return None;
		}

		let head = format!("{indentation}{run} ");
		let available = self
			.config
			.line_length
			.saturating_sub(self.display_width(&head))
			.max(1);

		let mut lines = Vec::new();
		let mut current = String::new();
		for word in text.split_whitespace() {
			if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > available {
				lines.push(format!("{head}{current}"));
				current.clear();
			}
			if !current.is_empty() {
				current.push(' ');
			}
			current.push_str(word);
		}
		lines.push(format!("{head}{current}"));

		Some(lines)
	}

	/// Width of `text` in columns with tabs expanded to `tab_width`.
	fn display_width(&self, text: &str) -> usize {
		text.chars()
			.map(|c| if c == '\t' { self.config.tab_width } else { 1 })
			.sum()
	}
}

/// An opening code fence: three or more backticks or tildes after optional
/// indentation. A backtick fence's info string cannot contain a backtick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Fence {
	/// Byte length of the indentation before the fence.
	pub indent: usize,
	pub marker: char,
	pub length: usize,
}

impl Fence {
	pub(crate) fn open(line: &str) -> Option<Self> {
		let trimmed = line.trim_start_matches([' ', '\t']);
		let marker = trimmed.chars().next().filter(|c| matches!(c, '`' | '~'))?;
		let length = trimmed.len() - trimmed.trim_start_matches(marker).len();
		if length < 3 || (marker == '`' && trimmed[length..].contains('`')) {
			return None;
		}

		Some(Self {
			indent: line.len() - trimmed.len(),
			marker,
			length,
		})
	}

	/// A closing fence uses the same character, at least as many times, and
	/// nothing else.
	pub(crate) fn is_closed_by(self, line: &str) -> bool {
		let trimmed = line.trim_start_matches([' ', '\t']);
		let rest = trimmed.trim_start_matches(self.marker);
		trimmed.len() - rest.len() >= self.length && rest.trim_end_matches([' ', '\t', '\r']).is_empty()
	}
}

/// The leading run of comment markers, `#`, `##` or `///`, when `line`
/// starts with `marker`.
fn marker_run<'a>(line: &'a str, marker: &str) -> Option<&'a str> {
	if !line.starts_with(marker) {
		return None;
	}

	let marker_chars: Vec<char> = marker.chars().collect();
	let length: usize = line
		.chars()
		.take_while(|c| marker_chars.contains(c))
		.map(char::len_utf8)
		.sum();
	Some(&line[..length])
}

/// Replace each full group of `tab_width` leading spaces with a tab.
/// Leftover spaces and existing tabs are kept.
pub fn spaces_to_tabs(line: &str, tab_width: usize) -> String {
	let code = line.trim_start_matches([' ', '\t']);
	let leading = &line[..line.len() - code.len()];
	let mut output = String::with_capacity(line.len());
	let mut spaces = 0;

	for c in leading.chars() {
		if c == ' ' {
			spaces += 1;
			if spaces == tab_width {
				output.push('\t');
				spaces = 0;
			}
		} else {
			output.push_str(&" ".repeat(spaces));
			spaces = 0;
			output.push(c);
		}
	}

	output.push_str(&" ".repeat(spaces));
	output.push_str(code);
	output
}
