use crate::CodeBlockRewriter;
use crate::MdfmtConfig;
use crate::MdfmtResult;
use crate::ProseRewriter;
use crate::RegionDiagnostic;
use crate::SegmentKind;
use crate::segment;

/// The formatted text of a document and the unterminated regions found
/// while segmenting it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedDocument {
	pub content: String,
	pub diagnostics: Vec<RegionDiagnostic>,
}

/// Segments a document and dispatches each segment to the matching
/// rewriter: prose to [`ProseRewriter`], code blocks to
/// [`CodeBlockRewriter`], everything else through untouched.
#[derive(Debug, Clone)]
pub struct Formatter {
	prose: ProseRewriter,
	code: CodeBlockRewriter,
}

impl Formatter {
	pub fn new(prose: ProseRewriter, code: CodeBlockRewriter) -> Self {
		Self { prose, code }
	}

	pub fn from_config(config: &MdfmtConfig) -> MdfmtResult<Self> {
		Ok(Self::new(
			ProseRewriter::from_config(config)?,
			CodeBlockRewriter::new(config),
		))
	}

	pub fn prose(&self) -> &ProseRewriter {
		&self.prose
	}

	pub fn code(&self) -> &CodeBlockRewriter {
		&self.code
	}

	/// Format a whole document. Never fails: regions that cannot be
	/// recognized are formatted as prose and reported in
	/// [`FormattedDocument::diagnostics`].
	pub fn format(&self, source: &str) -> FormattedDocument {
		let segmentation = segment(source);
		let mut content = String::with_capacity(source.len() + source.len() / 8);

		for segment in &segmentation.segments {
			match segment.kind {
				SegmentKind::Prose => {
					let preceding = preceding_context(source, segment.range.start);
					content.push_str(&self.prose.rewrite(segment.text, preceding));
				}
				SegmentKind::CodeBlock => content.push_str(&self.code.rewrite(segment.text)),
				SegmentKind::FrontMatter
				| SegmentKind::HtmlBlock
				| SegmentKind::TemplateTag
				| SegmentKind::QuotedString
				| SegmentKind::Blockquote => content.push_str(segment.text),
			}
		}

		FormattedDocument {
			content,
			diagnostics: segmentation.diagnostics,
		}
	}
}

/// The source from the start of the previous line up to `offset`.
fn preceding_context(source: &str, offset: usize) -> &str {
	let before = &source[..offset];
	let start = before
		.rfind('\n')
		.and_then(|line_start| before[..line_start].rfind('\n').map(|index| index + 1))
		.unwrap_or(0);
	&before[start..]
}
