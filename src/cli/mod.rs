//! CLI utilities for ferro-gl
//!
//! This module provides testable functions used by the CLI binary.
//! Input handling, argument validation and output formatting live here so
//! they can be unit tested without running the binary.

pub mod format;

pub use format::{
    output_error, output_error_with_context, output_parsed, output_result, OutputFormat,
};

use crate::error::GlError;

/// UTF-8 BOM (Byte Order Mark) constant
const UTF8_BOM: &str = "\u{feff}";

/// Strip UTF-8 BOM from the beginning of a string if present.
///
/// # Examples
///
/// ```
/// use ferro_gl::cli::strip_bom;
///
/// assert_eq!(strip_bom("\u{feff}HLA-A*01:01"), "HLA-A*01:01");
/// assert_eq!(strip_bom("HLA-A*01:01"), "HLA-A*01:01");
/// ```
pub fn strip_bom(s: &str) -> &str {
    s.strip_prefix(UTF8_BOM).unwrap_or(s)
}

/// Strip inline comments from an input line.
///
/// Comments start with `#` and extend to the end of the line. GL Strings
/// never contain `#`, so the first one always starts a comment.
///
/// # Examples
///
/// ```
/// use ferro_gl::cli::strip_inline_comment;
///
/// assert_eq!(strip_inline_comment("HLA-A*01:01+HLA-A*02:01  # donor 7"), "HLA-A*01:01+HLA-A*02:01");
/// assert_eq!(strip_inline_comment("# full line comment"), "");
/// ```
pub fn strip_inline_comment(s: &str) -> &str {
    match s.find('#') {
        Some(pos) => s[..pos].trim(),
        None => s.trim(),
    }
}

/// Process an input line: trim whitespace, strip BOM (for first line), and strip inline comments.
///
/// Returns None if the line is empty or a comment-only line.
///
/// # Examples
///
/// ```
/// use ferro_gl::cli::process_input_line;
///
/// assert_eq!(process_input_line("HLA-A*01:01", false), Some("HLA-A*01:01"));
/// assert_eq!(process_input_line("\u{feff}HLA-A*01:01", true), Some("HLA-A*01:01"));
/// assert_eq!(process_input_line("# comment", false), None);
/// assert_eq!(process_input_line("", false), None);
/// ```
pub fn process_input_line(line: &str, is_first_line: bool) -> Option<&str> {
    let line = line.trim();
    let line = if is_first_line { strip_bom(line) } else { line };
    let line = strip_inline_comment(line);

    if line.is_empty() {
        None
    } else {
        Some(line)
    }
}

/// Where the `liftover` subcommand reads its GL String(s) from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LiftoverInput {
    /// `-g`: one GL String; source and target versions are required
    GlString {
        text: String,
        source: String,
        target: String,
    },
    /// `-u`: a GL Service URI; the source version comes from the URI
    Uri { uri: String, target: String },
    /// `-f`: a JSON request file carrying both URI and target namespace
    JsonFile { path: String },
    /// `-i`: a file (or `-` for stdin) with one GL String per line
    Lines {
        path: String,
        source: String,
        target: String,
    },
}

/// Raw `liftover` arguments before validation
#[derive(Debug, Clone, Default)]
pub struct LiftoverArgs {
    pub glstring: Option<String>,
    pub uri: Option<String>,
    pub jsonfile: Option<String>,
    pub input: Option<String>,
    pub source: Option<String>,
    pub target: Option<String>,
}

impl LiftoverArgs {
    /// Check the argument combination.
    ///
    /// Returns the input plus any warnings to show the user. Exactly one input
    /// is required; a GL String needs both versions, a URI needs a target, and a
    /// source version given with a URI or JSON file is ignored.
    pub fn validate(self) -> Result<(LiftoverInput, Vec<String>), GlError> {
        let usage = |msg: &str| GlError::Config {
            msg: msg.to_string(),
        };
        let given = [&self.glstring, &self.uri, &self.jsonfile, &self.input]
            .iter()
            .filter(|arg| arg.is_some())
            .count();
        if given == 0 {
            return Err(usage(
                "one of --glstring, --uri, --jsonfile or --input is required",
            ));
        }
        if given > 1 {
            return Err(usage(
                "only one of --glstring, --uri, --jsonfile or --input may be given",
            ));
        }

        let mut warnings = Vec::new();
        let input = if let Some(text) = self.glstring {
            let (Some(source), Some(target)) = (self.source, self.target) else {
                return Err(usage("--glstring requires both --source and --target"));
            };
            LiftoverInput::GlString {
                text,
                source,
                target,
            }
        } else if let Some(path) = self.input {
            let (Some(source), Some(target)) = (self.source, self.target) else {
                return Err(usage("--input requires both --source and --target"));
            };
            LiftoverInput::Lines {
                path,
                source,
                target,
            }
        } else if let Some(uri) = self.uri {
            let Some(target) = self.target else {
                return Err(usage("--uri requires --target"));
            };
            if self.source.is_some() {
                warnings.push("--source is ignored with --uri; the URI carries the version".to_string());
            }
            LiftoverInput::Uri { uri, target }
        } else if let Some(path) = self.jsonfile {
            if self.source.is_some() || self.target.is_some() {
                warnings.push(
                    "--source and --target are ignored with --jsonfile".to_string(),
                );
            }
            LiftoverInput::JsonFile { path }
        } else {
            return Err(usage("no input given"));
        };
        Ok((input, warnings))
    }
}
