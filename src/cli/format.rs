//! Output formatting utilities for CLI operations

use serde_json::json;
use std::io::{self, Write};
use std::str::FromStr;

use crate::error::GlError;
use crate::gl::GlNode;
use crate::liftover::LiftoverResult;

/// Output format for CLI results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Plain text format (default)
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

impl FromStr for OutputFormat {
    type Err = std::convert::Infallible;

    /// Parse an output format from a string; anything but `json` is text
    ///
    /// # Examples
    ///
    /// ```
    /// use ferro_gl::cli::OutputFormat;
    /// use std::str::FromStr;
    ///
    /// assert!(matches!(OutputFormat::from_str("json").unwrap(), OutputFormat::Json));
    /// assert!(matches!(OutputFormat::from_str("text").unwrap(), OutputFormat::Text));
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "json" => OutputFormat::Json,
            _ => OutputFormat::Text,
        })
    }
}

/// Write a liftover result
///
/// Text output is `source -> target`, just `source` when nothing changed, and
/// `source -> (empty)` when every allele was dropped.
///
/// # Examples
///
/// ```
/// use ferro_gl::cli::{output_result, OutputFormat};
/// use ferro_gl::{history, liftover};
/// use std::io::Cursor;
///
/// let index = history::parse("HLA_ID\t3250\t3200\nHLA00053\tA*24:03:01:01\tA*24:03:01\n".as_bytes()).unwrap();
/// let result = liftover::liftover("HLA-A*24:03:01", "3.20.0", "3.25.0", &index).unwrap();
///
/// let mut buffer = Cursor::new(Vec::new());
/// output_result(&mut buffer, &result, OutputFormat::Text).unwrap();
/// let text = String::from_utf8(buffer.into_inner()).unwrap();
/// assert_eq!(text, "HLA-A*24:03:01 -> HLA-A*24:03:01:01\n");
/// ```
pub fn output_result<W: Write>(
    writer: &mut W,
    result: &LiftoverResult,
    format: OutputFormat,
) -> io::Result<()> {
    let target = result.target_text();
    match format {
        OutputFormat::Json => {
            let value = json!({
                "source": result.source,
                "target": target,
                "status": result.status(),
                "dropped": result.dropped(),
            });
            writeln!(writer, "{}", value)
        }
        OutputFormat::Text => match target {
            None => writeln!(writer, "{} -> (empty)", result.source),
            Some(target) if target == result.source => writeln!(writer, "{}", target),
            Some(target) => writeln!(writer, "{} -> {}", result.source, target),
        },
    }
}

/// Write a parsed GL String: its resource type and canonical text, or the
/// syntax tree as JSON.
pub fn output_parsed<W: Write>(
    writer: &mut W,
    input: &str,
    node: &GlNode,
    format: OutputFormat,
) -> io::Result<()> {
    match format {
        OutputFormat::Json => {
            let value = json!({
                "input": input,
                "resource": node.resource(),
                "canonical": node.to_string(),
                "tree": node,
            });
            writeln!(writer, "{}", value)
        }
        OutputFormat::Text => writeln!(writer, "{}\t{}", node.resource(), node),
    }
}

/// Write an error to the output
///
/// # Examples
///
/// ```
/// use ferro_gl::cli::{output_error, OutputFormat};
/// use ferro_gl::GlError;
/// use std::io::Cursor;
///
/// let mut buffer = Cursor::new(Vec::new());
/// let error = GlError::parse(0, "test error");
/// output_error(&mut buffer, "input", &error, OutputFormat::Text).unwrap();
/// let result = String::from_utf8(buffer.into_inner()).unwrap();
/// assert!(result.starts_with("ERROR: input: "));
/// ```
pub fn output_error<W: Write>(
    writer: &mut W,
    input: &str,
    error: &GlError,
    format: OutputFormat,
) -> io::Result<()> {
    output_error_with_context(writer, input, error, format, None)
}

/// Write an error to the output with optional line number context
///
/// # Examples
///
/// ```
/// use ferro_gl::cli::{output_error_with_context, OutputFormat};
/// use ferro_gl::GlError;
/// use std::io::Cursor;
///
/// let mut buffer = Cursor::new(Vec::new());
/// let error = GlError::parse(0, "test error");
/// output_error_with_context(&mut buffer, "input", &error, OutputFormat::Text, Some(42)).unwrap();
/// let result = String::from_utf8(buffer.into_inner()).unwrap();
/// assert!(result.contains("line 42"));
/// ```
pub fn output_error_with_context<W: Write>(
    writer: &mut W,
    input: &str,
    error: &GlError,
    format: OutputFormat,
    line_number: Option<usize>,
) -> io::Result<()> {
    match format {
        OutputFormat::Json => {
            let mut value = json!({
                "input": input,
                "error": error.to_string(),
                "code": error.code().map(|c| c.as_str()),
            });
            if let Some(line) = line_number {
                value["line"] = json!(line);
            }
            writeln!(writer, "{}", value)
        }
        OutputFormat::Text => match line_number {
            Some(line) => writeln!(writer, "ERROR (line {}): {}: {}", line, input, error),
            None => writeln!(writer, "ERROR: {}: {}", input, error),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gl::parse_gl;
    use crate::history::{AlleleId, DbVersion};
    use crate::liftover::LiftoverEvent;
    use std::io::Cursor;

    fn result(source: &str, target: Option<&str>, dropped: &[&str]) -> LiftoverResult {
        LiftoverResult {
            source: source.to_string(),
            source_version: DbVersion::new(3, 20, 0),
            target_version: DbVersion::new(3, 25, 0),
            target: target.map(|t| parse_gl(t).unwrap()),
            events: dropped
                .iter()
                .map(|locus| LiftoverEvent::DroppedAtTarget {
                    locus: locus.to_string(),
                    id: AlleleId::new("HLA00001"),
                })
                .collect(),
        }
    }

    fn render<F: FnOnce(&mut Cursor<Vec<u8>>) -> io::Result<()>>(f: F) -> String {
        let mut buffer = Cursor::new(Vec::new());
        f(&mut buffer).unwrap();
        String::from_utf8(buffer.into_inner()).unwrap()
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!(OutputFormat::from_str("JSON").unwrap(), OutputFormat::Json);
        assert_eq!(OutputFormat::from_str("other").unwrap(), OutputFormat::Text);
    }

    #[test]
    fn test_text_unchanged() {
        let r = result("HLA-A*01:02", Some("HLA-A*01:02"), &[]);
        assert_eq!(render(|w| output_result(w, &r, OutputFormat::Text)), "HLA-A*01:02\n");
    }

    #[test]
    fn test_text_empty() {
        let r = result("HLA-A*02:01:01", None, &["HLA-A*02:01:01"]);
        assert_eq!(
            render(|w| output_result(w, &r, OutputFormat::Text)),
            "HLA-A*02:01:01 -> (empty)\n"
        );
    }

    #[test]
    fn test_json_result() {
        let r = result(
            "HLA-A*01:02/HLA-A*02:01:01",
            Some("HLA-A*01:02"),
            &["HLA-A*02:01:01"],
        );
        let out = render(|w| output_result(w, &r, OutputFormat::Json));
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["source"], "HLA-A*01:02/HLA-A*02:01:01");
        assert_eq!(value["target"], "HLA-A*01:02");
        assert_eq!(value["status"], "partially_converted");
        assert_eq!(value["dropped"][0], "HLA-A*02:01:01");
    }

    #[test]
    fn test_json_empty_target_is_null() {
        let r = result("HLA-A*02:01:01", None, &["HLA-A*02:01:01"]);
        let out = render(|w| output_result(w, &r, OutputFormat::Json));
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert!(value["target"].is_null());
        assert_eq!(value["status"], "empty");
    }

    #[test]
    fn test_parsed_output() {
        let node = parse_gl("A*01:01+A*02:01").unwrap();
        assert_eq!(
            render(|w| output_parsed(w, "A*01:01+A*02:01", &node, OutputFormat::Text)),
            "genotype\tA*01:01+A*02:01\n"
        );

        let out = render(|w| output_parsed(w, "A*01:01+A*02:01", &node, OutputFormat::Json));
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["resource"], "genotype");
        assert_eq!(value["tree"]["genotype"][0]["locus"], "A*01:01");
    }

    #[test]
    fn test_json_error_with_code_and_line() {
        let err = GlError::UnknownVersion {
            version: "3.99.0".to_string(),
        };
        let out = render(|w| output_error_with_context(w, "x", &err, OutputFormat::Json, Some(3)));
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["code"], "E2002");
        assert_eq!(value["line"], 3);
        assert_eq!(value["input"], "x");
    }

    #[test]
    fn test_text_error() {
        let err = GlError::parse(3, "bad");
        assert_eq!(
            render(|w| output_error(w, "A*0", &err, OutputFormat::Text)),
            "ERROR: A*0: Parse error at position 3: bad\n"
        );
    }
}
