mod common;

use common::FORMATTED_LESSON;
use common::LESSON;
use mdfmt_cli::EXIT_CHANGED;
use mdfmt_core::AnyEmptyResult;
use predicates::prelude::PredicateBooleanExt;
use serde_json::Value;
use similar_asserts::assert_eq;

#[test]
fn check_passes_when_already_formatted() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("lesson.md"), FORMATTED_LESSON)?;

	common::mdfmt_cmd(tmp.path())
		.args(["--check", "lesson.md"])
		.assert()
		.success()
		.stdout(predicates::str::contains("1 file(s) already formatted"));

	Ok(())
}

#[test]
fn check_fails_when_files_would_change() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("lesson.md"), LESSON)?;
	std::fs::write(tmp.path().join("done.md"), FORMATTED_LESSON)?;

	common::mdfmt_cmd(tmp.path())
		.args(["--check", "lesson.md", "done.md"])
		.assert()
		.code(EXIT_CHANGED)
		.stdout(predicates::str::is_empty())
		.stderr(
			predicates::str::contains("would reformat lesson.md")
				.and(predicates::str::contains("would reformat done.md").not())
				.and(predicates::str::contains("1 of 2 file(s) would be reformatted")),
		);

	// Check mode never writes.
	assert_eq!(std::fs::read_to_string(tmp.path().join("lesson.md"))?, LESSON);

	Ok(())
}

#[test]
fn check_diff_shows_changed_lines() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("lesson.md"), LESSON)?;

	common::mdfmt_cmd(tmp.path())
		.args(["--check", "--diff", "lesson.md"])
		.assert()
		.code(EXIT_CHANGED)
		.stderr(
			predicates::str::contains("-The player has 10 health points.")
				.and(predicates::str::contains("+The player has `10` health points."))
				.and(predicates::str::contains("-# Health").not()),
		);

	Ok(())
}

#[test]
fn diff_requires_check() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("lesson.md"), LESSON)?;

	common::mdfmt_cmd(tmp.path())
		.args(["--diff", "lesson.md"])
		.assert()
		.failure()
		.stderr(predicates::str::contains("--check"));

	Ok(())
}

#[test]
fn check_json_reports_changed_files() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("lesson.md"), LESSON)?;
	std::fs::write(tmp.path().join("done.md"), FORMATTED_LESSON)?;

	let output = common::mdfmt_cmd(tmp.path())
		.args(["--check", "--format", "json", "lesson.md", "done.md"])
		.assert()
		.code(EXIT_CHANGED)
		.get_output()
		.clone();

	let report: Value = serde_json::from_slice(&output.stdout)?;
	assert_eq!(report["ok"], Value::Bool(false));
	assert_eq!(report["checked"], Value::from(2));

	let changed = report["changed"].as_array().ok_or("changed is not an array")?;
	assert_eq!(changed.len(), 1);
	assert_eq!(changed[0]["file"], Value::from("lesson.md"));
	assert_eq!(changed[0]["unterminated"], Value::Array(Vec::new()));
	assert!(changed[0].get("diff").is_none());

	Ok(())
}

#[test]
fn check_json_includes_diff_and_regions() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(
		tmp.path().join("broken.md"),
		"The player has 10 health points.\n\n```\nnever closed\n",
	)?;

	let output = common::mdfmt_cmd(tmp.path())
		.args(["--check", "--diff", "--format", "json", "broken.md"])
		.assert()
		.code(EXIT_CHANGED)
		.get_output()
		.clone();

	let report: Value = serde_json::from_slice(&output.stdout)?;
	let entry = &report["changed"][0];
	assert_eq!(entry["file"], Value::from("broken.md"));
	assert_eq!(entry["unterminated"][0]["region"], Value::from("code fence"));
	assert_eq!(entry["unterminated"][0]["line"], Value::from(3));
	assert_eq!(entry["unterminated"][0]["column"], Value::from(1));

	let diff = entry["diff"].as_str().ok_or("diff is not a string")?;
	assert!(diff.contains("+The player has `10` health points."));

	Ok(())
}

#[test]
fn check_json_passes_when_formatted() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("done.md"), FORMATTED_LESSON)?;

	let output = common::mdfmt_cmd(tmp.path())
		.args(["--check", "--format", "json", "done.md"])
		.assert()
		.success()
		.get_output()
		.clone();

	let report: Value = serde_json::from_slice(&output.stdout)?;
	assert_eq!(report["ok"], Value::Bool(true));
	assert_eq!(report["changed"], Value::Array(Vec::new()));

	Ok(())
}
