use std::fmt;
use std::ops::Range;

use regex::Regex;

use crate::code_block::Fence;
use crate::marks::literal_ranges;
use crate::patterns::BLOCKQUOTE_LINE;
use crate::patterns::FRONT_MATTER;
use crate::patterns::HTML_BLOCK_OPENER;
use crate::patterns::HTML_COMMENT;
use crate::patterns::TEMPLATE_OPENER;
use crate::patterns::TEMPLATE_TAG;

/// Tags that live inside a paragraph and therefore never open an HTML
/// block.
const INLINE_TAGS: &[&str] = &[
	"a", "abbr", "b", "br", "code", "del", "em", "i", "img", "ins", "kbd", "mark", "q", "s",
	"small", "span", "strong", "sub", "sup", "u",
];

/// Block-level tags without a closing tag.
const VOID_TAGS: &[&str] = &[
	"area", "base", "col", "embed", "hr", "input", "link", "meta", "param", "source", "track", "wbr",
];

/// The classification of a [`Segment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentKind {
	FrontMatter,
	CodeBlock,
	HtmlBlock,
	TemplateTag,
	QuotedString,
	Blockquote,
	Prose,
}

impl SegmentKind {
	pub fn is_prose(self) -> bool {
		self == Self::Prose
	}
}

/// A classified, contiguous span of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment<'a> {
	pub kind: SegmentKind,
	/// Byte range in the source document.
	pub range: Range<usize>,
	pub text: &'a str,
}

/// Regions whose opener can appear without a terminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionKind {
	CodeFence,
	HtmlBlock,
	TemplateTag,
}

impl fmt::Display for RegionKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			Self::CodeFence => "code fence",
			Self::HtmlBlock => "HTML block",
			Self::TemplateTag => "template tag",
		};
		f.write_str(name)
	}
}

/// A region that starts but never terminates. The region's text stays
/// prose; the diagnostic only tells the author why it was formatted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionDiagnostic {
	pub region: RegionKind,
	/// 1-indexed line of the opener.
	pub line: usize,
	/// 1-indexed column of the opener.
	pub column: usize,
}

/// The result of [`segment`]: the segments in document order and any
/// unterminated regions that were left as prose.
#[derive(Debug, Clone)]
pub struct Segmentation<'a> {
	pub segments: Vec<Segment<'a>>,
	pub diagnostics: Vec<RegionDiagnostic>,
}

/// Split `source` into typed segments.
///
/// Passes run in priority order: front matter, code fences, HTML blocks,
/// template tags, quoted strings, blockquotes. Each pass only splits the
/// segments still classified as prose. Concatenating the returned segments
/// reproduces `source` exactly.
pub fn segment(source: &str) -> Segmentation<'_> {
	let mut segments = vec![Segment {
		kind: SegmentKind::Prose,
		range: 0..source.len(),
		text: source,
	}];
	let mut diagnostics = Vec::new();

	segments = split_prose(source, segments, SegmentKind::FrontMatter, |range| {
		if range.start != 0 {
			return Vec::new();
		}
		FRONT_MATTER
			.find(&source[range.clone()])
			.map(|m| vec![m.range()])
			.unwrap_or_default()
	});

	let mut unclosed_fences = Vec::new();
	segments = split_prose(source, segments, SegmentKind::CodeBlock, |range| {
		code_fence_ranges(source, range, &mut unclosed_fences)
	});
	diagnostics.extend(diagnostics_at(source, &unclosed_fences, RegionKind::CodeFence));

	let mut unclosed_html = Vec::new();
	segments = split_prose(source, segments, SegmentKind::HtmlBlock, |range| {
		html_block_ranges(source, range, &mut unclosed_html)
	});
	diagnostics.extend(diagnostics_at(source, &unclosed_html, RegionKind::HtmlBlock));

	segments = split_prose(source, segments, SegmentKind::TemplateTag, |range| {
		regex_ranges(&TEMPLATE_TAG, source, range)
	});
	diagnostics.extend(unterminated(source, &segments, &TEMPLATE_OPENER, RegionKind::TemplateTag));

	segments = split_prose(source, segments, SegmentKind::QuotedString, |range| {
		quoted_ranges(source, range)
	});

	segments = split_prose(source, segments, SegmentKind::Blockquote, |range| {
		blockquote_ranges(source, range)
	});

	diagnostics.sort_by_key(|d| (d.line, d.column));
	for diagnostic in &diagnostics {
		tracing::debug!(
			region = %diagnostic.region,
			line = diagnostic.line,
			column = diagnostic.column,
			"unterminated region left as prose"
		);
	}

	Segmentation {
		segments,
		diagnostics,
	}
}

/// Re-split every prose segment with `find`, which returns absolute,
/// ordered, non-overlapping ranges inside the segment it is given.
fn split_prose<'a>(
	source: &'a str,
	segments: Vec<Segment<'a>>,
	kind: SegmentKind,
	mut find: impl FnMut(Range<usize>) -> Vec<Range<usize>>,
) -> Vec<Segment<'a>> {
	let mut result = Vec::with_capacity(segments.len());

	for segment in segments {
		if !segment.kind.is_prose() {
			result.push(segment);
			continue;
		}

		let mut cursor = segment.range.start;
		for found in find(segment.range.clone()) {
			if found.start < cursor || found.end > segment.range.end || found.is_empty() {
				continue;
			}
			push_segment(&mut result, source, SegmentKind::Prose, cursor..found.start);
			push_segment(&mut result, source, kind, found.clone());
			cursor = found.end;
		}
		push_segment(&mut result, source, SegmentKind::Prose, cursor..segment.range.end);
	}

	result
}

fn push_segment<'a>(
	segments: &mut Vec<Segment<'a>>,
	source: &'a str,
	kind: SegmentKind,
	range: Range<usize>,
) {
	if range.is_empty() {
		return;
	}
	segments.push(Segment {
		kind,
		text: &source[range.clone()],
		range,
	});
}

fn regex_ranges(pattern: &Regex, source: &str, range: Range<usize>) -> Vec<Range<usize>> {
	let offset = range.start;
	pattern
		.find_iter(&source[range])
		.map(|m| m.start() + offset..m.end() + offset)
		.collect()
}

fn is_line_start(source: &str, offset: usize) -> bool {
	offset == 0 || source.as_bytes()[offset - 1] == b'\n'
}

fn line_column(source: &str, offset: usize) -> (usize, usize) {
	let before = &source[..offset];
	let line = before.matches('\n').count() + 1;
	let line_start = before.rfind('\n').map_or(0, |index| index + 1);
	let column = source[line_start..offset].chars().count() + 1;
	(line, column)
}

/// Report openers of `pattern` still sitting in prose after their region's
/// pass ran.
fn unterminated(
	source: &str,
	segments: &[Segment<'_>],
	opener: &Regex,
	region: RegionKind,
) -> Vec<RegionDiagnostic> {
	let offsets: Vec<usize> = segments
		.iter()
		.filter(|segment| segment.kind.is_prose())
		.flat_map(|segment| {
			opener
				.find_iter(segment.text)
				.map(move |m| segment.range.start + m.start())
		})
		.collect();

	diagnostics_at(source, &offsets, region)
}

fn diagnostics_at(source: &str, offsets: &[usize], region: RegionKind) -> Vec<RegionDiagnostic> {
	offsets
		.iter()
		.map(|offset| {
			let (line, column) = line_column(source, *offset);
			RegionDiagnostic {
				region,
				line,
				column,
			}
		})
		.collect()
}

/// Fenced code blocks that open at a line start, from the opening fence
/// line to the end of the closing fence line. Fences of backticks or
/// tildes close with a fence of the same character that is at least as
/// long. Openers that never close are collected in `unclosed`.
fn code_fence_ranges(
	source: &str,
	range: Range<usize>,
	unclosed: &mut Vec<usize>,
) -> Vec<Range<usize>> {
	let mut lines = Vec::new();
	let mut start = range.start;
	for line in source[range].split_inclusive('\n') {
		lines.push(start..start + line.trim_end_matches('\n').len());
		start += line.len();
	}

	let mut found = Vec::new();
	let mut index = 0;
	while index < lines.len() {
		let opening = lines[index].clone();
		let fence = Fence::open(&source[opening.clone()])
			.filter(|_| is_line_start(source, opening.start));
		let Some(fence) = fence else {
			index += 1;
			continue;
		};

		let closing = lines[index + 1..]
			.iter()
			.position(|line| fence.is_closed_by(&source[line.clone()]));
		match closing {
			Some(position) => {
				let close = index + 1 + position;
				found.push(opening.start..lines[close].end);
				index = close + 1;
			}
			None => {
				unclosed.push(opening.start + fence.indent);
				index += 1;
			}
		}
	}

	found
}

/// HTML comments anywhere, plus block-level tags that open at a line start
/// and close with the matching end tag. Openers without a closing tag are
/// collected in `unclosed`.
fn html_block_ranges(
	source: &str,
	range: Range<usize>,
	unclosed: &mut Vec<usize>,
) -> Vec<Range<usize>> {
	let text = &source[range.clone()];
	let offset = range.start;
	let mut found = Vec::new();
	let mut cursor = 0;

	while cursor < text.len() {
		let comment = HTML_COMMENT.find_at(text, cursor);
		let block = next_block_opener(source, text, offset, cursor);

		let next = match (comment, block) {
			(Some(comment), Some((start, _, _))) if comment.start() <= start => {
				Some(comment.range())
			}
			(_, Some((start, name, open_end))) => {
				match balanced_close(text, &name, open_end) {
					Some(end) => Some(start..end),
					None => {
						unclosed.push(offset + start);
						cursor = open_end;
						continue;
					}
				}
			}
			(Some(comment), None) => Some(comment.range()),
			(None, None) => None,
		};

		let Some(next) = next else {
			break;
		};
		cursor = next.end;
		found.push(offset + next.start..offset + next.end);
	}

	found
}

/// End of the closing tag that balances an open `name` element. Tag names
/// match in any case, and nested elements of the same name must close
/// first.
fn balanced_close(text: &str, name: &str, from: usize) -> Option<usize> {
	let tags = Regex::new(&format!(r"(?i)<(/)?{}(?:\s[^>]*)?>", regex::escape(name))).ok()?;
	let mut depth = 1_usize;

	for captures in tags.captures_iter(&text[from..]) {
		let whole = captures.get(0)?;
		if captures.get(1).is_some() {
			depth -= 1;
			if depth == 0 {
				return Some(from + whole.end());
			}
		} else if !whole.as_str().ends_with("/>") {
			depth += 1;
		}
	}

	None
}

/// The next block-level opening tag at or after `cursor`: its start, its
/// lowercase name and the end of the opening tag.
fn next_block_opener(
	source: &str,
	text: &str,
	offset: usize,
	mut cursor: usize,
) -> Option<(usize, String, usize)> {
	while let Some(captures) = HTML_BLOCK_OPENER.captures_at(text, cursor) {
		let whole = captures.get(0)?;
		let name = captures.get(1)?.as_str().to_ascii_lowercase();
		cursor = whole.end();

		if !is_line_start(source, offset + whole.start()) {
			continue;
		}
		if INLINE_TAGS.contains(&name.as_str())
			|| VOID_TAGS.contains(&name.as_str())
			|| whole.as_str().ends_with("/>")
		{
			continue;
		}

		return Some((whole.start(), name, whole.end()));
	}

	None
}

/// Quoted spans on a single line. Quote characters inside code spans,
/// inline HTML, link targets and URLs are ignored.
fn quoted_ranges(source: &str, range: Range<usize>) -> Vec<Range<usize>> {
	let mut found = Vec::new();
	let mut line_start = range.start;

	for line in source[range.clone()].split_inclusive('\n') {
		let content = line.trim_end_matches('\n');
		let literals = literal_ranges(content);
		for quoted in quoted_in_line(content, &literals) {
			found.push(line_start + quoted.start..line_start + quoted.end);
		}
		line_start += line.len();
	}

	found
}

fn quoted_in_line(line: &str, literals: &[Range<usize>]) -> Vec<Range<usize>> {
	let hidden = |index: usize| literals.iter().any(|r| r.contains(&index));
	let chars: Vec<(usize, char)> = line.char_indices().collect();
	let mut found = Vec::new();
	let mut index = 0;

	while index < chars.len() {
		let (start, c) = chars[index];
		if hidden(start) {
			index += 1;
			continue;
		}

		let closing = match c {
			'"' => Some('"'),
			'\u{201c}' => Some('\u{201d}'),
			'\'' if opens_single_quote(&chars, index) => Some('\''),
			_ => None,
		};

		let Some(closing) = closing else {
			index += 1;
			continue;
		};

		let close = chars
			.iter()
			.enumerate()
			.skip(index + 1)
			.find(|(position, (offset, candidate))| {
				*candidate == closing
					&& !hidden(*offset)
					&& (closing != '\'' || closes_single_quote(&chars, *position))
			})
			.map(|(position, _)| position);

		match close {
			Some(close) if close > index + 1 => {
				let (end, last) = chars[close];
				found.push(start..end + last.len_utf8());
				index = close + 1;
			}
			_ => index += 1,
		}
	}

	found
}

/// An apostrophe inside a word (`don't`) never opens a quote.
fn opens_single_quote(chars: &[(usize, char)], index: usize) -> bool {
	let before = index.checked_sub(1).map(|i| chars[i].1);
	let after = chars.get(index + 1).map(|(_, c)| *c);
	before.is_none_or(|c| c.is_whitespace() || matches!(c, '(' | '[' | '{'))
		&& after.is_some_and(|c| !c.is_whitespace())
}

fn closes_single_quote(chars: &[(usize, char)], index: usize) -> bool {
	let before = chars[index - 1].1;
	let after = chars.get(index + 1).map(|(_, c)| *c);
	!before.is_whitespace()
		&& after.is_none_or(|c| c.is_whitespace() || matches!(c, '.' | ',' | ';' | ':' | '!' | '?' | ')' | ']'))
}

/// Every blockquote line that overlaps `range`, clipped to it. Prose
/// fragments left on a blockquote line by earlier passes are claimed too.
fn blockquote_ranges(source: &str, range: Range<usize>) -> Vec<Range<usize>> {
	let line_start = source[..range.start].rfind('\n').map_or(0, |index| index + 1);
	let line_end = source[range.end..]
		.find('\n')
		.map_or(source.len(), |index| range.end + index);

	BLOCKQUOTE_LINE
		.find_iter(&source[line_start..line_end])
		.map(|m| (line_start + m.start()).max(range.start)..(line_start + m.end()).min(range.end))
		.filter(|found| !found.is_empty())
		.collect()
}
