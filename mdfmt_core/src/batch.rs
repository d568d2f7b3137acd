use std::collections::HashSet;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use ignore::gitignore::Gitignore;
use ignore::gitignore::GitignoreBuilder;

use crate::Formatter;
use crate::MdfmtConfig;
use crate::MdfmtError;
use crate::MdfmtResult;
use crate::RegionDiagnostic;

/// Where formatted documents go.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OutputMode {
	/// Print every document to standard output in input order.
	#[default]
	Stdout,
	/// Overwrite each source file.
	InPlace,
	/// Write each document into this directory under its file name.
	Directory(PathBuf),
	/// Write nothing; only report which documents would change.
	Check,
}

/// Markdown files gathered from the command line, plus the inputs that
/// were rejected.
#[derive(Debug, Default)]
pub struct CollectedInputs {
	pub files: Vec<PathBuf>,
	/// `InputNotFound` and `NotMarkdown` errors for rejected paths.
	pub skipped: Vec<MdfmtError>,
}

/// A document after formatting, before it is written anywhere.
#[derive(Debug, Clone)]
pub struct FormattedFile {
	pub path: PathBuf,
	/// The decoded file content exactly as read.
	pub original: String,
	pub formatted: String,
	pub diagnostics: Vec<RegionDiagnostic>,
}

impl FormattedFile {
	pub fn changed(&self) -> bool {
		self.original != self.formatted
	}

	/// The region diagnostics as warnings attributed to this file.
	pub fn warnings(&self) -> Vec<MdfmtError> {
		self.diagnostics
			.iter()
			.map(|diagnostic| {
				MdfmtError::MalformedRegion {
					region: diagnostic.region.to_string(),
					path: self.path.display().to_string(),
					line: diagnostic.line,
					column: diagnostic.column,
				}
			})
			.collect()
	}
}

/// Whether `path` has a `.md` extension, in any case.
pub fn is_markdown(path: &Path) -> bool {
	path.extension()
		.and_then(|ext| ext.to_str())
		.is_some_and(|ext| ext.eq_ignore_ascii_case("md"))
}

/// Expand `paths` into the markdown files to format.
///
/// Files are kept in the order given. Directories are walked recursively,
/// skipping hidden directories, `node_modules`, `target`, anything matched
/// by the project's `.gitignore` and the `[exclude]` patterns; the files
/// found in one directory are sorted. Missing and non-markdown paths are
/// reported in [`CollectedInputs::skipped`] instead of failing.
pub fn collect_inputs(paths: &[PathBuf], config: &MdfmtConfig) -> MdfmtResult<CollectedInputs> {
	let gitignore = if config.exclude.disable_gitignore {
		Gitignore::empty()
	} else {
		build_gitignore(&config.base_dir)
	};
	let exclude = build_exclude_matcher(&config.base_dir, &config.exclude.patterns)?;

	let mut inputs = CollectedInputs::default();
	let mut seen = HashSet::new();

	for path in paths {
		if path.is_dir() {
			let mut found = Vec::new();
			let mut visited_dirs = HashSet::new();
			walk_dir(path, &mut found, &gitignore, &exclude, &mut visited_dirs)?;
			found.sort();
			tracing::debug!(dir = %path.display(), files = found.len(), "collected markdown files");
			inputs
				.files
				.extend(found.into_iter().filter(|file| seen.insert(file.clone())));
		} else if path.is_file() {
			if is_markdown(path) {
				if seen.insert(path.clone()) {
					inputs.files.push(path.clone());
				}
			} else {
				tracing::warn!(path = %path.display(), "skipping non-markdown input");
				inputs.skipped.push(MdfmtError::NotMarkdown {
					path: path.display().to_string(),
				});
			}
		} else {
			tracing::warn!(path = %path.display(), "input not found");
			inputs.skipped.push(MdfmtError::InputNotFound {
				path: path.display().to_string(),
			});
		}
	}

	Ok(inputs)
}

/// Read, decode and format one markdown file.
pub fn format_file(path: &Path, formatter: &Formatter) -> MdfmtResult<FormattedFile> {
	let bytes = std::fs::read(path).map_err(|e| {
		if e.kind() == std::io::ErrorKind::NotFound {
			MdfmtError::InputNotFound {
				path: path.display().to_string(),
			}
		} else {
			MdfmtError::Io(e)
		}
	})?;
	let original = String::from_utf8(bytes).map_err(|_| {
		MdfmtError::Decode {
			path: path.display().to_string(),
		}
	})?;

	let document = formatter.format(&normalize_line_endings(&original));
	tracing::debug!(
		path = %path.display(),
		diagnostics = document.diagnostics.len(),
		"formatted document"
	);

	Ok(FormattedFile {
		path: path.to_path_buf(),
		original,
		formatted: document.content,
		diagnostics: document.diagnostics,
	})
}

/// Send a formatted file to its destination. Returns the path written, if
/// any. File destinations are replaced atomically so a failed write never
/// leaves a half-written document behind.
pub fn write_output(
	file: &FormattedFile,
	mode: &OutputMode,
	stdout: &mut impl Write,
) -> MdfmtResult<Option<PathBuf>> {
	match mode {
		OutputMode::Stdout => {
			stdout.write_all(file.formatted.as_bytes())?;
			Ok(None)
		}
		OutputMode::Check => Ok(None),
		OutputMode::InPlace => {
			if !file.changed() {
				return Ok(None);
			}
			write_atomic(&file.path, &file.formatted)?;
			Ok(Some(file.path.clone()))
		}
		OutputMode::Directory(dir) => {
			let name = file.path.file_name().ok_or_else(|| {
				MdfmtError::InputNotFound {
					path: file.path.display().to_string(),
				}
			})?;
			std::fs::create_dir_all(dir)?;
			let destination = dir.join(name);
			write_atomic(&destination, &file.formatted)?;
			Ok(Some(destination))
		}
	}
}

/// Write `content` to a temporary file next to `path`, then rename it over
/// `path`.
pub fn write_atomic(path: &Path, content: &str) -> MdfmtResult<()> {
	let dir = path
		.parent()
		.filter(|parent| !parent.as_os_str().is_empty())
		.unwrap_or_else(|| Path::new("."));
	let name = path
		.file_name()
		.map(|name| name.to_string_lossy().into_owned())
		.unwrap_or_default();
	let temp = dir.join(format!(".{name}.mdfmt-tmp-{}", std::process::id()));

	if let Err(error) = std::fs::write(&temp, content) {
		let _ = std::fs::remove_file(&temp);
		return Err(error.into());
	}
	if let Err(error) = std::fs::rename(&temp, path) {
		let _ = std::fs::remove_file(&temp);
		return Err(error.into());
	}

	tracing::debug!(path = %path.display(), "wrote formatted document");
	Ok(())
}

/// Normalize CRLF and lone CR line endings to LF.
pub fn normalize_line_endings(content: &str) -> String {
	if content.contains('\r') {
		content.replace("\r\n", "\n").replace('\r', "\n")
	} else {
		content.to_string()
	}
}

/// Build a `Gitignore` matcher from `[exclude] patterns`.
fn build_exclude_matcher(root: &Path, patterns: &[String]) -> MdfmtResult<Gitignore> {
	let mut builder = GitignoreBuilder::new(root);
	for pattern in patterns {
		builder.add_line(None, pattern).map_err(|e| {
			MdfmtError::InvalidPattern(format!("invalid exclude pattern `{pattern}`: {e}"))
		})?;
	}
	builder
		.build()
		.map_err(|e| MdfmtError::InvalidPattern(format!("failed to build exclude rules: {e}")))
}

/// The project's root `.gitignore`, or an empty matcher.
fn build_gitignore(root: &Path) -> Gitignore {
	let mut builder = GitignoreBuilder::new(root);
	let gitignore_path = root.join(".gitignore");
	if gitignore_path.is_file() {
		if let Some(error) = builder.add(&gitignore_path) {
			tracing::warn!(path = %gitignore_path.display(), %error, "ignoring unreadable .gitignore");
		}
	}
	builder.build().unwrap_or_else(|_| Gitignore::empty())
}

fn is_ignored_directory_name(name: &str) -> bool {
	name.starts_with('.') || name == "node_modules" || name == "target"
}

fn walk_dir(
	dir: &Path,
	files: &mut Vec<PathBuf>,
	gitignore: &Gitignore,
	exclude: &Gitignore,
	visited_dirs: &mut HashSet<PathBuf>,
) -> MdfmtResult<()> {
	// Symlinked directories can loop back on themselves.
	let canonical = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
	if !visited_dirs.insert(canonical) {
		tracing::debug!(dir = %dir.display(), "skipping already visited directory");
		return Ok(());
	}

	for entry in std::fs::read_dir(dir)? {
		let path = entry?.path();
		let is_dir = path.is_dir();

		if is_dir {
			if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
				if is_ignored_directory_name(name) {
					continue;
				}
			}
		}

		if gitignore.matched(&path, is_dir).is_ignore() || exclude.matched(&path, is_dir).is_ignore() {
			tracing::debug!(path = %path.display(), "excluded");
			continue;
		}

		if is_dir {
			walk_dir(&path, files, gitignore, exclude, visited_dirs)?;
		} else if is_markdown(&path) {
			files.push(path);
		}
	}

	Ok(())
}
