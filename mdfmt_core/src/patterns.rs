//! Regular expressions shared by the segmenter and the prose rules.
//!
//! The `regex` crate has no look-around, so boundary conditions the patterns
//! cannot express are checked by the callers against the surrounding
//! characters.

use std::sync::LazyLock;

use regex::Regex;

fn compile(pattern: &str) -> Regex {
	Regex::new(pattern).unwrap_or_else(|e| panic!("invalid built-in pattern `{pattern}`: {e}"))
}

/// `---` fenced metadata at the very start of a document.
pub(crate) static FRONT_MATTER: LazyLock<Regex> =
	LazyLock::new(|| compile(r"\A---[ \t]*\n(?:(?s:.*?)\n)??---[ \t]*(?m:$)"));

/// An opening HTML tag at the start of a line. Group 1 is the tag name.
pub(crate) static HTML_BLOCK_OPENER: LazyLock<Regex> =
	LazyLock::new(|| compile(r"(?m)^[ \t]*<([A-Za-z][A-Za-z0-9-]*)(?:\s[^>]*)?>"));

pub(crate) static HTML_COMMENT: LazyLock<Regex> = LazyLock::new(|| compile(r"(?s)<!--.*?-->"));

/// `{% … %}` statements and `{{ … }}` expressions.
pub(crate) static TEMPLATE_TAG: LazyLock<Regex> =
	LazyLock::new(|| compile(r"(?s)\{%.*?%\}|\{\{.*?\}\}"));

pub(crate) static TEMPLATE_OPENER: LazyLock<Regex> = LazyLock::new(|| compile(r"\{%|\{\{"));

/// A blockquote line: up to three spaces of indentation, then `>`.
pub(crate) static BLOCKQUOTE_LINE: LazyLock<Regex> =
	LazyLock::new(|| compile(r"(?m)^ {0,3}>.*$"));

/// Leading marker of a list item, heading, or table row; text after it
/// starts a sentence.
pub(crate) static BLOCK_MARKER: LazyLock<Regex> =
	LazyLock::new(|| compile(r"\A\s*(?:[-+*]|\d+[.)]|#{1,6}|\|)\z"));

pub(crate) static HEADING: LazyLock<Regex> = LazyLock::new(|| compile(r"\A {0,3}#{1,6}(?:\s|\z)"));

/// A line holding nothing but images, links or HTML tags. The text after
/// it starts a new sentence.
pub(crate) static MARKUP_ONLY_LINE: LazyLock<Regex> = LazyLock::new(|| {
	compile(r"\A[ \t]*(?:(?:!?\[[^\]\n]*\]\([^)\n]*\)|<[^<>\n]+>)[ \t]*)+\z")
});

/// Directory paths ending with a slash.
pub(crate) static DIRECTORY_PATH: LazyLock<Regex> = LazyLock::new(|| {
	compile(r"(?:res|user)://(?:[\w.-]+/)*|/?(?:[\w.-]+/)+")
});

/// Dotted member access, `snake_case`, `_private` names and calls, with an
/// optional `$` node-path prefix and call parentheses.
pub(crate) static IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
	compile(
		r"(?x)
		\$?
		(?:
			[A-Za-z_][A-Za-z0-9_]+(?:\.[A-Za-z_][A-Za-z0-9_]*)+
			| _?[A-Za-z][A-Za-z0-9]*(?:_[A-Za-z0-9]+)+
			| _[A-Za-z][A-Za-z0-9]*
		)
		(?:\([^()\n]{0,40}\))?
		| \$?[A-Za-z_][A-Za-z0-9_]*\([^()\n]{0,40}\)",
	)
});

/// A run of capitalized words separated by spaces.
pub(crate) static CAPITALIZED_SEQUENCE: LazyLock<Regex> =
	LazyLock::new(|| compile(r"[A-Z][A-Za-z0-9]*(?: +[A-Z][A-Za-z0-9]*)+"));

pub(crate) static CAPITALIZED_WORD: LazyLock<Regex> =
	LazyLock::new(|| compile(r"[A-Z][A-Za-z0-9]*"));

pub(crate) static HEX_COLOR: LazyLock<Regex> = LazyLock::new(|| {
	compile(r"#(?:[0-9A-Fa-f]{8}|[0-9A-Fa-f]{6}|[0-9A-Fa-f]{3,4})\b")
});

/// Bracketed numeric ranges like `[0, 1]` or `[1..10]`.
pub(crate) static NUMERIC_RANGE: LazyLock<Regex> = LazyLock::new(|| {
	compile(r"\[\s*-?\d+(?:\.\d+)?(?:\s*(?:,|\.\.)\s*-?\d+(?:\.\d+)?)+\s*\]")
});

/// Numbers, dotted versions, `a..b` ranges and `WxH` dimension pairs.
pub(crate) static NUMBER: LazyLock<Regex> = LazyLock::new(|| {
	compile(r"\d+(?:\.\d+)*(?:\.\.-?\d+(?:\.\d+)*|[x×]\d+(?:\.\d+)?)?")
});

const MODIFIERS: &str = "ctrl|control|shift|altgr|alt|option|opt|cmd|command|meta|super|windows|win|fn";
const KEYS: &str = "f2[0-4]|f1[0-9]|f[1-9]|enter|return|tab|spacebar|space|escape|esc|backspace|\
                    delete|del|insert|ins|home|end|pageup|pagedown|pgup|pgdn|up|down|left|right|\
                    plus|minus|click|lmb|rmb|mmb|[a-z0-9]";

/// A keyboard chord: a modifier followed by one or more `+`-joined keys.
pub(crate) static KEYBOARD_CHORD: LazyLock<Regex> = LazyLock::new(|| {
	compile(&format!(
		r"(?i)\b(?:{MODIFIERS})(?:[ \t]*\+[ \t]*(?:{MODIFIERS}|{KEYS}))+\b"
	))
});
