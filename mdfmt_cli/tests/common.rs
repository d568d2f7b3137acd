use std::path::Path;

use assert_cmd::Command;
use insta_cmd::get_cargo_bin;

pub const LESSON: &str = "# Health\n\nThe player has 10 health points.\n";
pub const FORMATTED_LESSON: &str = "# Health\n\nThe player has `10` health points.\n";

/// An `mdfmt` command running inside `dir` with colors disabled.
pub fn mdfmt_cmd(dir: &Path) -> Command {
	let mut cmd = Command::new(get_cargo_bin("mdfmt"));
	cmd.current_dir(dir).env("NO_COLOR", "1").env_remove("MDFMT_LOG");
	cmd
}
