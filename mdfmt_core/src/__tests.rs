use std::path::PathBuf;

use rstest::rstest;
use similar_asserts::assert_eq;
use tracing_test::traced_test;

use super::*;
use crate::config::parse_version;
use crate::marks::MarkKind;
use crate::marks::Span;
use crate::marks::split_marks;

fn rewriter() -> MdfmtResult<ProseRewriter> {
	ProseRewriter::from_config(&MdfmtConfig::default())
}

fn formatter() -> MdfmtResult<Formatter> {
	Formatter::from_config(&MdfmtConfig::default())
}

fn kinds(source: &str) -> Vec<SegmentKind> {
	segment(source)
		.segments
		.iter()
		.map(|segment| segment.kind)
		.collect()
}

const TUTORIAL: &str = r#"---
title: Intro
---

# Moving the Player

The player has 10 health points.

```
# A comment
var speed = 10
```

Press Ctrl + S to save.
"#;

#[rstest]
#[case::number("The player has 10 health points.", "The player has `10` health points.")]
#[case::file_path("Open MainScene.tscn to continue.", "Open `MainScene.tscn` to continue.")]
#[case::existing_code(
	"`AlreadyCode` stays AlreadyCode",
	"`AlreadyCode` stays *AlreadyCode*"
)]
#[case::keyboard_chord(
	"Press Ctrl + F1 to open help.",
	"Press <kbd>Ctrl</kbd> + <kbd>F1</kbd> to open help."
)]
#[case::hex_color("Set the color to #ff8800 now.", "Set the color to `#ff8800` now.")]
#[case::identifiers("Call get_node() in _ready.", "Call `get_node()` in `_ready`.")]
#[case::directory("Save it in res://levels/ first.", "Save it in `res://levels/` first.")]
#[case::dimensions(
	"Set the window to 1920x1080 pixels.",
	"Set the window to `1920x1080` pixels."
)]
#[case::numeric_range("Use a range of [0, 1] here.", "Use a range of `[0, 1]` here.")]
#[case::negative_number("Move by -5 units.", "Move by `-5` units.")]
#[case::ordered_list("1. First step", "1. First step")]
#[case::proper_nouns("Open the Project Settings window.", "Open the *Project Settings* window.")]
#[case::allow_listed("Download Godot from the website.", "Download Godot from the website.")]
#[case::all_caps("Read the API docs.", "Read the API docs.")]
#[case::heading("## Getting Started", "## Getting Started")]
#[case::class_name("Add a Sprite2D node.", "Add a `Sprite2D` node.")]
#[case::link_target(
	"Read [this page](res://docs/page_one.md) first.",
	"Read [this page](res://docs/page_one.md) first."
)]
#[case::blank("   ", "   ")]
#[case::proper_nouns_at_sentence_start(
	"Project Settings is a window.",
	"*Project Settings* is a window."
)]
#[case::proper_nouns_in_table_cell("| Player Speed |", "| *Player Speed* |")]
#[case::float_range(
	"Pick a value in 1.0..2.0 here.",
	"Pick a value in `1.0..2.0` here."
)]
#[case::call_with_split_argument("Call get_node(", "Call get_node(")]
fn rewrite_prose_line(#[case] input: &str, #[case] expected: &str) -> MdfmtResult<()> {
	let rewriter = rewriter()?;
	assert_eq!(rewriter.rewrite_line(input), expected);

	Ok(())
}

#[rstest]
#[case::number("The player has 10 health points.")]
#[case::mixed("Use get_node() and Node2D with 5 items in scenes/main.tscn.")]
#[case::sequence("Then the Main Menu Screen opens at 60 frames per second.")]
#[case::chord("Hold Ctrl + Shift + S or Alt + F4 to quit.")]
#[case::nested_marks("See *Important Notes* and `code` with <kbd>A</kbd> in it.")]
#[case::colors("Tint it #fff, then #00ff00aa, in the Inspector Dock.")]
#[case::dotted("Read velocity.x and Vector2.ZERO before moving 3.5 units.")]
#[case::ranges("Lerp between 0.5..1.5 and -1..1 in the Animation Player.")]
fn prose_rewrite_is_idempotent(#[case] input: &str) -> MdfmtResult<()> {
	let rewriter = rewriter()?;
	let once = rewriter.rewrite_line(input);
	let twice = rewriter.rewrite_line(&once);
	assert_eq!(twice, once);
	assert!(!once.contains("``"), "doubled backticks in `{once}`");

	Ok(())
}

#[test]
fn collapse_code_merges_adjacent_code_spans() -> MdfmtResult<()> {
	let rewriter = rewriter()?;
	let result = rewriter.apply_rule(Rule::CollapseCode, "Use `foo``_bar` here.", "");
	assert_eq!(result, "Use `foo_bar` here.");

	let untouched = rewriter.apply_rule(Rule::CollapseCode, "Use ``a ` b`` here.", "");
	assert_eq!(untouched, "Use ``a ` b`` here.");

	Ok(())
}

#[test]
fn disabled_rules_are_skipped() -> MdfmtResult<()> {
	let rewriter = rewriter()?.with_disabled([Rule::Numbers]);
	assert!(!rewriter.is_enabled(Rule::Numbers));
	assert_eq!(
		rewriter.rewrite_line("The player has 10 health points."),
		"The player has 10 health points."
	);

	Ok(())
}

#[test]
fn sentence_start_follows_previous_line() -> MdfmtResult<()> {
	let rewriter = rewriter()?;
	let text = "This is the end.\nStarting over Here\nand Again\n";
	assert_eq!(
		rewriter.rewrite(text, ""),
		"This is the end.\nStarting over *Here*\nand *Again*\n"
	);

	Ok(())
}

#[rstest]
#[case::heading("# Title\nThe player jumps.\n")]
#[case::image("![Player sprite](player.png)\nThe player jumps.\n")]
#[case::tag_only("<br>\nThe player jumps.\n")]
fn line_after_heading_or_markup_starts_sentence(#[case] text: &str) -> MdfmtResult<()> {
	let rewriter = rewriter()?;
	assert_eq!(rewriter.rewrite(text, ""), text);

	Ok(())
}

#[test]
fn custom_class_registry_is_used() -> MdfmtResult<()> {
	let classes = ClassRegistry::new(["PlayerController"])?;
	let rewriter = ProseRewriter::new(classes, WordAllowList::default(), &["gd"])?;
	assert_eq!(
		rewriter.rewrite_line("The PlayerController moves."),
		"The `PlayerController` moves."
	);

	Ok(())
}

#[test]
fn rule_names_parse_from_config() -> MdfmtResult<()> {
	let config = MdfmtConfig::from_toml(
		r#"
[rules]
disabled = ["built_in_classes", "proper_noun_sequences"]
"#,
	)?;
	assert_eq!(config.rules.disabled, vec![
		Rule::BuiltInClasses,
		Rule::ProperNounSequences
	]);
	let names: Vec<&str> = RULE_ORDER.iter().map(|rule| rule.name()).collect();
	assert_eq!(names, vec![
		"paths",
		"identifiers",
		"proper_noun_sequences",
		"built_in_classes",
		"hex_colors",
		"capitalized_words",
		"numbers",
		"keyboard_shortcuts",
		"collapse_code",
	]);

	Ok(())
}

#[test]
fn split_marks_finds_inline_markup() {
	let line = "a `b` *c* <br> [d](e) https://f.io. <kbd>X</kbd>";
	let marked: Vec<(MarkKind, &str)> = split_marks(line)
		.into_iter()
		.filter_map(|span| {
			match span {
				Span::Marked { kind, range } => Some((kind, &line[range])),
				Span::Plain(_) => None,
			}
		})
		.collect();

	assert_eq!(marked, vec![
		(MarkKind::Code, "`b`"),
		(MarkKind::Emphasis, "*c*"),
		(MarkKind::HtmlTag, "<br>"),
		(MarkKind::LinkTarget, "](e)"),
		(MarkKind::Url, "https://f.io"),
		(MarkKind::Keyboard, "<kbd>X</kbd>"),
	]);
}

#[rstest]
#[case::snake_case("a snake_case_name here")]
#[case::multiplication("2 * 3 * 4")]
#[case::unclosed_code("an `unclosed span")]
#[case::less_than("if a < b then")]
fn split_marks_leaves_plain_text(#[case] line: &str) {
	let spans = split_marks(line);
	assert!(spans.iter().all(Span::is_plain), "{spans:?}");
	let rebuilt: String = spans.iter().map(|span| &line[span.range()]).collect();
	assert_eq!(rebuilt, line);
}

#[test]
fn segments_every_region_kind() {
	let source = "---\ntitle: x\n---\nIntro text.\n\n```gdscript\nvar x = 1\n```\n\n<div>\nHTML \
	              here\n</div>\n\n{% include \"a.md\" %}\n\nHe said \"hello there\" loudly.\n\n> \
	              Quote line\n";
	let segmentation = segment(source);

	assert_eq!(kinds(source), vec![
		SegmentKind::FrontMatter,
		SegmentKind::Prose,
		SegmentKind::CodeBlock,
		SegmentKind::Prose,
		SegmentKind::HtmlBlock,
		SegmentKind::Prose,
		SegmentKind::TemplateTag,
		SegmentKind::Prose,
		SegmentKind::QuotedString,
		SegmentKind::Prose,
		SegmentKind::Blockquote,
		SegmentKind::Prose,
	]);
	assert!(segmentation.diagnostics.is_empty());
}

#[rstest]
#[case::tutorial(TUTORIAL)]
#[case::empty("")]
#[case::unterminated_fence("```\nsome code that never closes\n")]
#[case::unicode("He said “bonjour” and left — ok?\n> quoted\n")]
#[case::crlf("Line one.\r\n```\r\ncode\r\n```\r\n")]
#[case::nested_html("<div>\n<p>para</p>\n</div>\n<!-- note -->\ntext {{ value }}")]
fn segmentation_is_lossless(#[case] source: &str) {
	let rebuilt: String = segment(source)
		.segments
		.iter()
		.map(|segment| segment.text)
		.collect();
	assert_eq!(rebuilt, source);
}

#[rstest]
#[case::tildes("~~~\nvar my_var = 10\n~~~")]
#[case::long_backticks("````markdown\n```gdscript\nvar my_var = 10\n```\n````")]
#[case::long_closer("```\nvar my_var = 10\n`````")]
fn fence_variants_are_code_blocks(#[case] source: &str) {
	let segmentation = segment(source);
	assert_eq!(kinds(source), vec![SegmentKind::CodeBlock]);
	assert!(segmentation.diagnostics.is_empty());
}

#[test]
fn shorter_closer_does_not_end_a_long_fence() {
	let source = "````
```
inner
```
````
after";
	let texts: Vec<(SegmentKind, &str)> = segment(source)
		.segments
		.iter()
		.map(|segment| (segment.kind, segment.text))
		.collect();

	assert_eq!(texts, vec![
		(SegmentKind::CodeBlock, "````\n```\ninner\n```\n````"),
		(SegmentKind::Prose, "\nafter"),
	]);
}

#[test]
fn nested_html_blocks_close_at_the_balancing_tag() {
	let source = "<div>\n<div>a</div>\nThe player has 10 health points.\n</div >\nAfter.";
	let texts: Vec<(SegmentKind, &str)> = segment(source)
		.segments
		.iter()
		.map(|segment| (segment.kind, segment.text))
		.collect();

	assert_eq!(texts, vec![
		(
			SegmentKind::HtmlBlock,
			"<div>\n<div>a</div>\nThe player has 10 health points.\n</div >"
		),
		(SegmentKind::Prose, "\nAfter."),
	]);
}

#[test]
fn apostrophes_do_not_open_quotes() {
	let source = "Don't touch 'this quote' please";
	let texts: Vec<(SegmentKind, &str)> = segment(source)
		.segments
		.iter()
		.map(|segment| (segment.kind, segment.text))
		.collect();

	assert_eq!(texts, vec![
		(SegmentKind::Prose, "Don't touch "),
		(SegmentKind::QuotedString, "'this quote'"),
		(SegmentKind::Prose, " please"),
	]);
}

#[rstest]
#[case::inline_code("Use `print(\"hi\")` here")]
#[case::inline_tag("<kbd>Ctrl</kbd> is a key\n")]
fn literal_markup_stays_prose(#[case] source: &str) {
	let segmentation = segment(source);
	assert_eq!(kinds(source), vec![SegmentKind::Prose]);
	assert!(segmentation.diagnostics.is_empty());
}

#[rstest]
#[case::code_fence("```\nsome code\n", RegionKind::CodeFence, 1, 1)]
#[case::html_block("text\n<div>\nno end\n", RegionKind::HtmlBlock, 2, 1)]
#[case::template_tag("Hello {{ oops\n", RegionKind::TemplateTag, 1, 7)]
#[case::tilde_fence("~~~\nsome code\n", RegionKind::CodeFence, 1, 1)]
#[case::indented_fence("Intro.\n  ```\nsome code\n", RegionKind::CodeFence, 2, 3)]
#[case::uppercase_html("<DIV>\nno end\n</DIVX>\n", RegionKind::HtmlBlock, 1, 1)]
fn unterminated_regions_are_reported(
	#[case] source: &str,
	#[case] region: RegionKind,
	#[case] line: usize,
	#[case] column: usize,
) {
	let segmentation = segment(source);
	assert_eq!(kinds(source), vec![SegmentKind::Prose]);
	assert_eq!(segmentation.diagnostics, vec![RegionDiagnostic {
		region,
		line,
		column
	}]);
}

#[test]
fn code_block_gets_default_language_and_wrapped_comment() {
	let rewriter = CodeBlockRewriter::new(&MdfmtConfig::default());
	let comment = "# The character accelerates toward the target velocity each frame until it \
	               finally hits a top speed.";
	assert_eq!(comment.len(), 100);

	let block = format!("```\n{comment}\nvelocity = velocity.move_toward(target, 10)\n```");
	let expected = "```gdscript\n# The character accelerates toward the target velocity each \
	                frame until it\n# finally hits a top speed.\nvelocity = \
	                velocity.move_toward(target, 10)\n```";
	assert_eq!(rewriter.rewrite(&block), expected);
	assert_eq!(rewriter.rewrite(expected), expected);
}

#[rstest]
#[case::spaces_to_tabs(
	"```gdscript\nfunc _ready():\n    print(1)\n        pass\n```",
	"```gdscript\nfunc _ready():\n\tprint(1)\n\t\tpass\n```"
)]
#[case::leftover_spaces(
	"```gdscript\nfunc f():\n      pass\n```",
	"```gdscript\nfunc f():\n\t  pass\n```"
)]
#[case::yaml_keeps_spaces(
	"```yaml\nkey:\n    nested: 1\n```",
	"```yaml\nkey:\n    nested: 1\n```"
)]
#[case::indented_fence(
	"  ```gdscript\n  func f():\n      pass\n  ```",
	"  ```gdscript\n  func f():\n  \tpass\n  ```"
)]
#[case::short_comment(
	"```python\n# short comment\nx = 1\n```",
	"```python\n# short comment\nx = 1\n```"
)]
#[case::empty_block("```\n```", "```gdscript\n```")]
#[case::tilde_fence(
	"~~~\nfunc f():\n    pass\n~~~",
	"~~~gdscript\nfunc f():\n\tpass\n~~~"
)]
#[case::long_fence(
	"````gdscript\n```\n    pass\n```\n````",
	"````gdscript\n```\n\tpass\n```\n````"
)]
#[case::unclosed("```\nfunc f():\n    pass", "```\nfunc f():\n    pass")]
#[case::doubled_marker(
	"```gdscript\n\t## Returns the direction the player is facing, normalized, so that callers never need to check it again.\n```",
	"```gdscript\n\t## Returns the direction the player is facing, normalized, so that callers\n\t## never need to check it again.\n```"
)]
#[case::unknown_language(
	"```brainfuck\n# this is a very long line that goes on and on and on and on and on and on and on forever\n```",
	"```brainfuck\n# this is a very long line that goes on and on and on and on and on and on and on forever\n```"
)]
fn rewrite_code_block(#[case] block: &str, #[case] expected: &str) {
	let rewriter = CodeBlockRewriter::new(&MdfmtConfig::default());
	assert_eq!(rewriter.rewrite(block), expected);
}

#[test]
fn code_block_respects_configured_widths() -> MdfmtResult<()> {
	let config = MdfmtConfig::from_toml(
		r#"
tab_width = 2
line_length = 20
default_language = "python"
"#,
	)?;
	let rewriter = CodeBlockRewriter::new(&config);
	let block = "```\nif x:\n  # one two three four five six\n  pass\n```";
	let expected = "```python\nif x:\n\t# one two three\n\t# four five six\n\tpass\n```";
	assert_eq!(rewriter.rewrite(block), expected);

	Ok(())
}

#[test]
fn spaces_to_tabs_keeps_remainder() {
	assert_eq!(spaces_to_tabs("         x", 4), "\t\t x");
	assert_eq!(spaces_to_tabs("\t    x", 4), "\t\tx");
	assert_eq!(spaces_to_tabs("x    y", 4), "x    y");
}

#[test]
fn format_tutorial_document() -> MdfmtResult<()> {
	let formatter = formatter()?;
	let document = formatter.format(TUTORIAL);
	let expected = r#"---
title: Intro
---

# Moving the Player

The player has `10` health points.

```gdscript
# A comment
var speed = 10
```

Press <kbd>Ctrl</kbd> + <kbd>S</kbd> to save.
"#;

	assert_eq!(document.content, expected);
	assert!(document.diagnostics.is_empty());
	assert_eq!(formatter.format(&document.content).content, expected);

	Ok(())
}

#[test]
fn format_chords_and_proper_nouns_snapshot() -> MdfmtResult<()> {
	let document = formatter()?.format("## Saving\n\nPress Ctrl + F1 to open help.\nOpen the Project Settings window.\n");
	insta::assert_snapshot!(document.content, @r"
	## Saving

	Press <kbd>Ctrl</kbd> + <kbd>F1</kbd> to open help.
	Open the *Project Settings* window.
	");

	Ok(())
}

#[test]
fn unterminated_fence_is_formatted_as_prose() -> MdfmtResult<()> {
	let formatter = formatter()?;
	let source = "```\nsome code that never closes\n";
	let document = formatter.format(source);

	assert_eq!(document.content, source);
	assert_eq!(document.diagnostics.len(), 1);
	assert_eq!(document.diagnostics[0].region, RegionKind::CodeFence);

	Ok(())
}

#[test]
fn code_and_templates_are_not_touched_by_prose_rules() -> MdfmtResult<()> {
	let formatter = formatter()?;
	let source = "Intro.\n\n```gdscript\nvar snake_case = Node2D.new()\n```\n\n{{ player_name \
	              }} has {% if hp > 10 %}many{% endif %} lives.\n";
	let document = formatter.format(source);

	assert!(
		document
			.content
			.contains("```gdscript\nvar snake_case = Node2D.new()\n```")
	);
	assert!(document.content.contains("{{ player_name }}"));
	assert!(document.content.contains("{% if hp > 10 %}"));
	assert!(document.content.contains("{% endif %}"));

	Ok(())
}

#[rstest]
#[case::nested_same_name(
	"<div>\n<div>a</div>\nThe player has 10 health points.\n</div>\n",
	"<div>\n<div>a</div>\nThe player has 10 health points.\n</div>\n"
)]
#[case::uppercase_tags(
	"<DIV>\nThe player has 10 health points.\n</DIV>\n",
	"<DIV>\nThe player has 10 health points.\n</DIV>\n"
)]
#[case::tilde_fence(
	"~~~\nvar my_var = 10\n~~~\n",
	"~~~gdscript\nvar my_var = 10\n~~~\n"
)]
#[case::call_with_string_argument(
	"Call get_node(\"Player\") to fetch it.\n",
	"Call get_node(\"Player\") to fetch it.\n"
)]
fn regions_are_not_touched_by_prose_rules(
	#[case] source: &str,
	#[case] expected: &str,
) -> MdfmtResult<()> {
	let formatter = formatter()?;
	let document = formatter.format(source);

	assert_eq!(document.content, expected);
	assert!(document.diagnostics.is_empty());
	assert_eq!(formatter.format(&document.content).content, expected);

	Ok(())
}

#[test]
fn quoted_strings_are_not_rewritten() -> MdfmtResult<()> {
	let formatter = formatter()?;
	let source = "Type \"Hello World 42\" in the box.\n";
	assert_eq!(formatter.format(source).content, source);

	Ok(())
}

#[test]
fn load_config_from_dot_config_dir() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::create_dir_all(tmp.path().join(".config"))?;
	std::fs::write(
		tmp.path().join(".config/mdfmt.toml"),
		r###"
line_length = 100
space_indented_languages = ["yaml"]

[words]
plain = ["Inspector"]

[classes]
names = ["PlayerController"]

[comments]
gdscript = "##"
"###,
	)?;

	let config = MdfmtConfig::load(tmp.path())?.ok_or("expected a config")?;
	assert_eq!(config.line_length, 100);
	assert_eq!(config.tab_width, DEFAULT_TAB_WIDTH);
	assert_eq!(config.base_dir, tmp.path().to_path_buf());
	assert_eq!(config.comment_marker("gdscript"), Some("##"));
	assert_eq!(config.comment_marker("GDShader"), Some("//"));
	assert_eq!(config.comment_marker("brainfuck"), None);
	assert!(config.keeps_spaces("YAML"));
	assert!(!config.keeps_spaces("markdown"));

	let words = WordAllowList::from_config(&config);
	assert!(words.contains("inspector"));
	assert!(words.contains("Godot"));

	let classes = ClassRegistry::from_config(&config)?;
	assert!(classes.contains("PlayerController"));
	assert!(classes.contains("Node2D"));

	Ok(())
}

#[test]
fn missing_config_is_none() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	assert!(MdfmtConfig::load(tmp.path())?.is_none());

	Ok(())
}

#[rstest]
#[case::zero_tab_width("tab_width = 0")]
#[case::unknown_rule("[rules]\ndisabled = [\"shout\"]")]
#[case::wrong_type("line_length = \"wide\"")]
fn invalid_config_is_rejected(#[case] content: &str) {
	let result = MdfmtConfig::from_toml(content);
	assert!(matches!(result, Err(MdfmtError::ConfigParse(_))), "{result:?}");
}

#[rstest]
#[case::newer_required(Some("0.2.0"), "0.1.0", false)]
#[case::same_version(Some("0.1.0"), "0.1.0", true)]
#[case::older_required(Some("v0.0.9"), "0.1.0", true)]
#[case::no_requirement(None, "0.1.0", true)]
fn minimum_version_is_enforced(
	#[case] required: Option<&str>,
	#[case] current: &str,
	#[case] supported: bool,
) {
	let config = MdfmtConfig {
		minimum_version: required.map(String::from),
		..MdfmtConfig::default()
	};
	let result = config.ensure_supported(current);

	if supported {
		assert!(result.is_ok(), "{result:?}");
	} else {
		assert!(matches!(
			result,
			Err(MdfmtError::EnvironmentUnsupported { .. })
		));
	}
}

#[rstest]
#[case::plain("1.2.3", Some(vec![1, 2, 3]))]
#[case::prefixed("v1.2", Some(vec![1, 2, 0]))]
#[case::prerelease("1.2.3-beta.1", Some(vec![1, 2, 3]))]
#[case::build("2.0.0+abc", Some(vec![2, 0, 0]))]
#[case::invalid("one.two", None)]
#[case::empty("", None)]
fn parse_versions(#[case] input: &str, #[case] expected: Option<Vec<u64>>) {
	assert_eq!(parse_version(input), expected);
}

#[test]
fn class_list_skips_comments_and_blanks() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let path = tmp.path().join("classes.txt");
	std::fs::write(&path, "# engine classes\nNode\n\n  Sprite2D  \n# done\n")?;

	assert_eq!(read_class_list(&path)?, vec![
		"Node".to_string(),
		"Sprite2D".to_string()
	]);

	let missing = read_class_list(&tmp.path().join("missing.txt"));
	assert!(matches!(missing, Err(MdfmtError::ClassList { .. })));

	Ok(())
}

#[test]
fn registries_are_plain_values() -> MdfmtResult<()> {
	let builtin = ClassRegistry::builtin()?;
	assert!(builtin.contains("CharacterBody2D"));
	assert_eq!(builtin.len(), BUILT_IN_CLASSES.len());
	assert!(ClassRegistry::empty().is_empty());

	let words = WordAllowList::new(["GitHub", " itch "]);
	assert!(words.contains("github"));
	assert!(words.contains("ITCH"));
	assert!(!words.contains("steam"));

	Ok(())
}

fn write_tree(root: &std::path::Path, files: &[(&str, &str)]) -> AnyEmptyResult {
	for (path, content) in files {
		let path = root.join(path);
		if let Some(parent) = path.parent() {
			std::fs::create_dir_all(parent)?;
		}
		std::fs::write(path, content)?;
	}

	Ok(())
}

#[test]
fn collect_inputs_walks_directories_and_reports_skips() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let root = tmp.path();
	write_tree(root, &[
		("a.md", "a"),
		("b.txt", "b"),
		("sub/c.MD", "c"),
		(".hidden/d.md", "d"),
		("node_modules/e.md", "e"),
		("drafts/f.md", "f"),
	])?;

	let config = MdfmtConfig {
		base_dir: root.to_path_buf(),
		exclude: ExcludeConfig {
			patterns: vec!["drafts/".to_string()],
			disable_gitignore: false,
		},
		..MdfmtConfig::default()
	};
	let inputs = collect_inputs(
		&[
			root.to_path_buf(),
			root.join("missing.md"),
			root.join("b.txt"),
			root.join("a.md"),
		],
		&config,
	)?;

	assert_eq!(inputs.files, vec![root.join("a.md"), root.join("sub/c.MD")]);
	assert_eq!(inputs.skipped.len(), 2);
	assert!(matches!(
		inputs.skipped[0],
		MdfmtError::InputNotFound { .. }
	));
	assert!(matches!(inputs.skipped[1], MdfmtError::NotMarkdown { .. }));

	Ok(())
}

#[test]
fn collect_inputs_honors_gitignore() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let root = tmp.path();
	write_tree(root, &[
		(".gitignore", "build/\n"),
		("build/out.md", "x"),
		("keep.md", "y"),
	])?;

	let mut config = MdfmtConfig {
		base_dir: root.to_path_buf(),
		..MdfmtConfig::default()
	};
	let inputs = collect_inputs(&[root.to_path_buf()], &config)?;
	assert_eq!(inputs.files, vec![root.join("keep.md")]);

	config.exclude.disable_gitignore = true;
	let inputs = collect_inputs(&[root.to_path_buf()], &config)?;
	assert_eq!(inputs.files, vec![root.join("build/out.md"), root.join("keep.md")]);

	Ok(())
}

#[test]
fn write_in_place_replaces_file_atomically() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let path = tmp.path().join("lesson.md");
	std::fs::write(&path, "The player has 10 health points.\n")?;

	let file = format_file(&path, &formatter()?)?;
	assert!(file.changed());
	let mut stdout = Vec::new();
	let written = write_output(&file, &OutputMode::InPlace, &mut stdout)?;

	assert_eq!(written, Some(path.clone()));
	assert!(stdout.is_empty());
	assert_eq!(
		std::fs::read_to_string(&path)?,
		"The player has `10` health points.\n"
	);
	assert_eq!(std::fs::read_dir(tmp.path())?.count(), 1);

	Ok(())
}

#[test]
fn write_to_output_directory_and_stdout() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let path = tmp.path().join("lesson.md");
	std::fs::write(&path, "Open MainScene.tscn to continue.\n")?;
	let file = format_file(&path, &formatter()?)?;

	let out_dir = tmp.path().join("out/nested");
	let mut stdout = Vec::new();
	let written = write_output(&file, &OutputMode::Directory(out_dir.clone()), &mut stdout)?;
	assert_eq!(written, Some(out_dir.join("lesson.md")));
	assert_eq!(
		std::fs::read_to_string(out_dir.join("lesson.md"))?,
		"Open `MainScene.tscn` to continue.\n"
	);
	assert_eq!(
		std::fs::read_to_string(&path)?,
		"Open MainScene.tscn to continue.\n"
	);

	write_output(&file, &OutputMode::Stdout, &mut stdout)?;
	assert_eq!(
		String::from_utf8(stdout)?,
		"Open `MainScene.tscn` to continue.\n"
	);

	let written = write_output(&file, &OutputMode::Check, &mut Vec::new())?;
	assert_eq!(written, None);

	Ok(())
}

#[test]
fn format_file_normalizes_line_endings() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let path = tmp.path().join("crlf.md");
	std::fs::write(&path, "Line one.\r\nLine two.\r\n")?;

	let file = format_file(&path, &formatter()?)?;
	assert_eq!(file.formatted, "Line one.\nLine two.\n");
	assert!(file.changed());

	Ok(())
}

#[test]
fn format_file_reports_decode_and_missing_errors() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let path = tmp.path().join("binary.md");
	std::fs::write(&path, [0xff, 0xfe, 0x00])?;
	let formatter = formatter()?;

	assert!(matches!(
		format_file(&path, &formatter),
		Err(MdfmtError::Decode { .. })
	));
	assert!(matches!(
		format_file(&tmp.path().join("gone.md"), &formatter),
		Err(MdfmtError::InputNotFound { .. })
	));

	Ok(())
}

#[test]
fn region_diagnostics_become_warnings() {
	let file = FormattedFile {
		path: PathBuf::from("lesson.md"),
		original: String::new(),
		formatted: String::new(),
		diagnostics: vec![RegionDiagnostic {
			region: RegionKind::CodeFence,
			line: 3,
			column: 1,
		}],
	};
	let warnings = file.warnings();

	assert_eq!(warnings.len(), 1);
	assert_eq!(
		warnings[0].to_string(),
		"unterminated code fence in lesson.md at line 3, column 1"
	);
}

#[test]
#[traced_test]
fn format_file_logs_progress() {
	let tmp = tempfile::tempdir().unwrap();
	let path = tmp.path().join("lesson.md");
	std::fs::write(&path, "Hello.\n").unwrap();

	let formatter = formatter().unwrap();
	format_file(&path, &formatter).unwrap();

	assert!(logs_contain("formatted document"));
}
