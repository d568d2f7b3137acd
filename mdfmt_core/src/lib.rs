//! `mdfmt_core` is the library behind the `mdfmt` tutorial formatter. It
//! splits a markdown document into typed segments, rewrites the prose with
//! an ordered list of idempotent rules that add inline code, italics and
//! keyboard tags, and reformats fenced code blocks.
//!
//! ## Processing Pipeline
//!
//! ```text
//! Markdown file
//!   → Segmenter (front matter, code fences, HTML blocks, template tags, quotes, blockquotes, prose)
//!   → Prose rewriter (per line: split into marked/unmarked spans, apply each rule to unmarked spans)
//!   → Code-block rewriter (default language, spaces to tabs, comment wrapping)
//!   → Concatenation and output routing (stdout, in place, output directory, check)
//! ```
//!
//! ## Modules
//!
//! - [`config`]: `mdfmt.toml` discovery and parsing.
//! - [`marks`]: Inline markup scanner that separates marked text from text the rules may touch.
//!
//! ## Key Types
//!
//! - [`Segment`]: A classified span of a document.
//! - [`Rule`]: One prose rewrite pass. [`RULE_ORDER`] lists them in the order they run.
//! - [`ProseRewriter`]: Applies the rules to prose lines.
//! - [`CodeBlockRewriter`]: Reformats fenced code blocks.
//! - [`Formatter`]: Formats whole documents.
//! - [`ClassRegistry`]: Class names wrapped in inline code, passed in explicitly.
//!
//! ## Quick Start
//!
//! ```rust
//! use mdfmt_core::Formatter;
//! use mdfmt_core::MdfmtConfig;
//!
//! let formatter = Formatter::from_config(&MdfmtConfig::default()).unwrap();
//! let document = formatter.format("Open MainScene.tscn to continue.\n");
//!
//! assert_eq!(document.content, "Open `MainScene.tscn` to continue.\n");
//! ```

pub use batch::*;
pub use builtin_classes::*;
pub use code_block::*;
pub use config::*;
pub use document::*;
pub use error::*;
pub use prose::*;
pub use registry::*;
pub use segment::*;

mod batch;
mod builtin_classes;
mod code_block;
pub mod config;
mod document;
#[allow(unused_assignments)]
mod error;
pub mod marks;
pub(crate) mod patterns;
mod prose;
mod registry;
mod segment;

#[cfg(test)]
mod __tests;
