use std::ops::Range;

/// Inline markup that the prose rules treat as opaque.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkKind {
	/// A backtick-delimited code span of any delimiter length.
	Code,
	/// `*text*`, `**text**`, `_text_` and friends.
	Emphasis,
	/// A whole `<kbd>…</kbd>` element.
	Keyboard,
	/// Any other single inline HTML tag such as `<br>` or `<img src="…">`.
	HtmlTag,
	/// The `](destination)` part of a link or image, or the tail of a
	/// reference definition.
	LinkTarget,
	/// A bare `http://` or `https://` URL.
	Url,
}

/// A run of a prose line, either plain text the rules may rewrite or
/// marked text they must leave alone. Ranges are byte offsets into the line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Span {
	Plain(Range<usize>),
	Marked { kind: MarkKind, range: Range<usize> },
}

impl Span {
	pub fn range(&self) -> Range<usize> {
		match self {
			Self::Plain(range) | Self::Marked { range, .. } => range.clone(),
		}
	}

	pub fn is_plain(&self) -> bool {
		matches!(self, Self::Plain(_))
	}
}

/// Split one line into plain and marked spans. Concatenating the spans
/// reproduces the line. Delimiters that never close stay plain text.
pub fn split_marks(line: &str) -> Vec<Span> {
	let bytes = line.as_bytes();
	let mut spans = Vec::new();
	let mut plain_start = 0;
	let mut index = 0;

	while index < bytes.len() {
		let found = match bytes[index] {
			b'`' => scan_code(line, index).map(|end| (MarkKind::Code, end)),
			b'*' | b'_' => scan_emphasis(line, index).map(|end| (MarkKind::Emphasis, end)),
			b'<' => scan_angle(line, index),
			b']' => scan_link_target(line, index).map(|end| (MarkKind::LinkTarget, end)),
			b'h' => scan_url(line, index).map(|end| (MarkKind::Url, end)),
			_ => None,
		};

		match found {
			Some((kind, end)) => {
				if plain_start < index {
					spans.push(Span::Plain(plain_start..index));
				}
				spans.push(Span::Marked {
					kind,
					range: index..end,
				});
				index = end;
				plain_start = end;
			}
			None => index += skip_len(bytes, index),
		}
	}

	if plain_start < bytes.len() {
		spans.push(Span::Plain(plain_start..bytes.len()));
	}

	spans
}

/// Byte ranges of marks that hide quote characters from the segmenter:
/// code spans, inline HTML, link targets and URLs. Emphasis is prose and
/// does not count.
pub(crate) fn literal_ranges(line: &str) -> Vec<Range<usize>> {
	split_marks(line)
		.into_iter()
		.filter_map(|span| {
			match span {
				Span::Marked {
					kind: MarkKind::Emphasis,
					..
				}
				| Span::Plain(_) => None,
				Span::Marked { range, .. } => Some(range),
			}
		})
		.collect()
}

fn run_length(bytes: &[u8], start: usize) -> usize {
	let byte = bytes[start];
	bytes[start..].iter().take_while(|b| **b == byte).count()
}

fn skip_len(bytes: &[u8], index: usize) -> usize {
	match bytes[index] {
		b'`' | b'*' | b'_' => run_length(bytes, index),
		_ => 1,
	}
}

/// A code span closes on the next backtick run of exactly the opening
/// length.
fn scan_code(line: &str, start: usize) -> Option<usize> {
	let bytes = line.as_bytes();
	let length = run_length(bytes, start);
	let mut cursor = start + length;

	while cursor < bytes.len() {
		if bytes[cursor] == b'`' {
			let run = run_length(bytes, cursor);
			if run == length {
				return Some(cursor + run);
			}
			cursor += run;
		} else {
			cursor += 1;
		}
	}

	None
}

fn scan_emphasis(line: &str, start: usize) -> Option<usize> {
	let bytes = line.as_bytes();
	let delimiter = bytes[start];
	let length = run_length(bytes, start);
	if length > 3 {
		return None;
	}

	let after_open = line[start + length..].chars().next()?;
	if after_open.is_whitespace() {
		return None;
	}
	if delimiter == b'_' && line[..start].chars().next_back().is_some_and(char::is_alphanumeric) {
		return None;
	}

	let mut cursor = start + length;
	while cursor < bytes.len() {
		if bytes[cursor] != delimiter {
			cursor += 1;
			continue;
		}

		let run = run_length(bytes, cursor);
		let before_close = line[..cursor].chars().next_back();
		let after_close = line[cursor + run..].chars().next();
		let closes = run == length
			&& before_close.is_some_and(|c| !c.is_whitespace())
			&& (delimiter == b'*' || !after_close.is_some_and(|c| c.is_alphanumeric() || c == '_'));

		if closes {
			return Some(cursor + run);
		}
		cursor += run;
	}

	None
}

fn scan_angle(line: &str, start: usize) -> Option<(MarkKind, usize)> {
	let rest = &line[start..];

	if rest.starts_with("<kbd>") {
		let close = rest.find("</kbd>")?;
		return Some((MarkKind::Keyboard, start + close + "</kbd>".len()));
	}

	let next = rest[1..].chars().next()?;
	if !(next.is_ascii_alphabetic() || next == '/' || next == '!') {
		return None;
	}

	let close = rest.find('>')?;
	if rest[1..close].contains('<') {
		return None;
	}

	Some((MarkKind::HtmlTag, start + close + 1))
}

fn scan_link_target(line: &str, start: usize) -> Option<usize> {
	let rest = &line[start..];

	if rest.starts_with("]:") && line[..start].trim_start().starts_with('[') {
		return Some(line.len());
	}

	if !rest.starts_with("](") {
		return None;
	}

	let mut depth = 0usize;
	for (offset, c) in rest.char_indices().skip(1) {
		match c {
			'(' => depth += 1,
			')' => {
				depth -= 1;
				if depth == 0 {
					return Some(start + offset + 1);
				}
			}
			_ => {}
		}
	}

	None
}

fn scan_url(line: &str, start: usize) -> Option<usize> {
	let rest = &line[start..];
	if !(rest.starts_with("http://") || rest.starts_with("https://")) {
		return None;
	}
	if line[..start].chars().next_back().is_some_and(char::is_alphanumeric) {
		return None;
	}

	let length = rest
		.find(|c: char| c.is_whitespace() || matches!(c, '<' | '>' | '"' | '`' | ')' | ']'))
		.unwrap_or(rest.len());
	let url = rest[..length].trim_end_matches(['.', ',', ';', ':', '!', '?', '\'', '*']);

	(url.len() > "https://".len()).then_some(start + url.len())
}
