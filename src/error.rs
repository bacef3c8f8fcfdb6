//! Error types for ferro-gl
//!
//! This module provides error handling with:
//! - Error codes for categorization
//! - Source span tracking for parse error location
//! - Helpful diagnostic messages
//! - "Did you mean?" suggestions where applicable
//!
//! Note that a locus that cannot be found in a database release is *not* an
//! error: it is the signal that drives the drop rules in [`crate::liftover`].

use std::fmt;
use thiserror::Error;

/// Error codes for categorizing errors
///
/// These codes can be used for programmatic error handling
/// and for documentation lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ErrorCode {
    // Parse errors (E1xxx)
    /// Malformed allele or G-group token
    InvalidToken = 1001,
    /// Empty segment between two operators
    EmptySegment = 1002,
    /// Genotype without exactly two members
    GenotypeArity = 1003,
    /// Character that is not part of the grammar
    UnexpectedChar = 1004,
    /// Empty input
    UnexpectedEnd = 1005,

    // Database errors (E2xxx)
    /// Version label could not be parsed
    InvalidVersion = 2001,
    /// Version has no column in the history data
    UnknownVersion = 2002,
    /// Locus does not exist at the source version
    UnknownAllele = 2003,
    /// History data is malformed
    InvalidHistory = 2004,

    // Structure errors (E3xxx)
    /// Node cannot be built with the given members
    InvalidStructure = 3001,

    // Service errors (E5xxx)
    /// GL service request failed
    ServiceFailed = 5001,

    // IO errors (E9xxx)
    /// File IO error
    IoError = 9001,
    /// JSON parsing error
    JsonError = 9002,
    /// Configuration file error
    ConfigError = 9003,
}

impl ErrorCode {
    /// Get the error code as a string (e.g., "E1001")
    pub fn as_str(&self) -> String {
        format!("E{:04}", *self as u16)
    }

    /// Get a brief description of this error code
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::InvalidToken => "invalid allele token",
            ErrorCode::EmptySegment => "empty segment between operators",
            ErrorCode::GenotypeArity => "genotype must have exactly two members",
            ErrorCode::UnexpectedChar => "unexpected character",
            ErrorCode::UnexpectedEnd => "unexpected end of input",
            ErrorCode::InvalidVersion => "invalid database version",
            ErrorCode::UnknownVersion => "database version not in history",
            ErrorCode::UnknownAllele => "allele not found at source version",
            ErrorCode::InvalidHistory => "malformed allele history data",
            ErrorCode::InvalidStructure => "invalid GL String structure",
            ErrorCode::ServiceFailed => "GL service request failed",
            ErrorCode::IoError => "file I/O error",
            ErrorCode::JsonError => "JSON parsing error",
            ErrorCode::ConfigError => "configuration error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A span in the source input indicating error location
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SourceSpan {
    /// Starting byte offset (0-indexed)
    pub start: usize,
    /// Ending byte offset (exclusive)
    pub end: usize,
}

impl SourceSpan {
    /// Create a new source span
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Create a span for a single position
    pub fn point(pos: usize) -> Self {
        Self {
            start: pos,
            end: pos + 1,
        }
    }

    /// Format the source with the error highlighted
    ///
    /// Returns a string like:
    /// ```text
    /// HLA-A*01:01++HLA-A*02:01
    ///             ^
    /// ```
    pub fn highlight(&self, source: &str) -> String {
        if source.is_empty() {
            return String::new();
        }

        let safe_start = self.start.min(source.len());
        let safe_end = self.end.min(source.len()).max(safe_start);

        let mut pointer = String::with_capacity(source.len() + 4);
        for _ in 0..safe_start {
            pointer.push(' ');
        }
        pointer.push('^');
        for _ in (safe_start + 1)..safe_end {
            pointer.push('~');
        }

        format!("{}\n{}", source, pointer)
    }
}

/// Diagnostic information for an error
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Diagnostic {
    /// Error code
    pub code: Option<ErrorCode>,
    /// Source span for highlighting
    pub span: Option<SourceSpan>,
    /// The original input (for error display)
    pub source: Option<String>,
    /// Helpful hint or suggestion
    pub hint: Option<String>,
    /// "Did you mean?" suggestion
    pub suggestion: Option<String>,
}

impl Diagnostic {
    /// Create a new empty diagnostic
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an error code
    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    /// Add a source span
    pub fn with_span(mut self, span: SourceSpan) -> Self {
        self.span = Some(span);
        self
    }

    /// Add the original source
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Add a hint
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Add a suggestion
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Format the diagnostic as a detailed error message
    pub fn format(&self, primary_message: &str) -> String {
        let mut result = String::new();

        if let Some(code) = &self.code {
            result.push_str(&format!("[{}] ", code));
        }

        result.push_str(primary_message);

        if let (Some(span), Some(source)) = (&self.span, &self.source) {
            result.push_str("\n\n");
            result.push_str(&span.highlight(source));
        }

        if let Some(hint) = &self.hint {
            result.push_str("\n\nHint: ");
            result.push_str(hint);
        }

        if let Some(suggestion) = &self.suggestion {
            result.push_str("\n\nDid you mean: ");
            result.push_str(suggestion);
        }

        result
    }
}

/// Main error type for ferro-gl operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GlError {
    /// Parse error with position and message
    #[error("Parse error at position {pos}: {msg}")]
    Parse {
        pos: usize,
        msg: String,
        /// Optional diagnostic with additional context
        diagnostic: Option<Box<Diagnostic>>,
    },

    /// Version label is not of the form `3.25.0` or `3250`
    #[error("Invalid database version: '{version}'")]
    InvalidVersion { version: String },

    /// Version is well formed but absent from the history data
    #[error("Database version {version} not present in allele history")]
    UnknownVersion { version: String },

    /// Locus does not exist at the source version (strict mode only)
    #[error("{allele} does not exist in database version {version}")]
    UnknownAllele { allele: String, version: String },

    /// Allele history data could not be loaded
    #[error("Allele history error: {msg}")]
    History { msg: String },

    /// A node could not be constructed from the given members
    #[error("Invalid GL String structure: {msg}")]
    InvalidStructure { msg: String },

    /// GL service request failed
    #[error("GL service error: {msg}")]
    Service { msg: String },

    /// Configuration file could not be read or parsed
    #[error("Config error: {msg}")]
    Config { msg: String },

    /// IO error (for file operations)
    #[error("IO error: {msg}")]
    Io { msg: String },

    /// JSON parsing error
    #[error("JSON error: {msg}")]
    Json { msg: String },
}

impl GlError {
    /// Create a parse error with diagnostic information
    pub fn parse_with_diagnostic(
        pos: usize,
        msg: impl Into<String>,
        diagnostic: Diagnostic,
    ) -> Self {
        GlError::Parse {
            pos,
            msg: msg.into(),
            diagnostic: Some(Box::new(diagnostic)),
        }
    }

    /// Create a simple parse error without diagnostic
    pub fn parse(pos: usize, msg: impl Into<String>) -> Self {
        GlError::Parse {
            pos,
            msg: msg.into(),
            diagnostic: None,
        }
    }

    /// Get the error code if available
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            GlError::Parse {
                diagnostic: Some(d),
                ..
            } => d.code,
            GlError::Parse { .. } => None,
            GlError::InvalidVersion { .. } => Some(ErrorCode::InvalidVersion),
            GlError::UnknownVersion { .. } => Some(ErrorCode::UnknownVersion),
            GlError::UnknownAllele { .. } => Some(ErrorCode::UnknownAllele),
            GlError::History { .. } => Some(ErrorCode::InvalidHistory),
            GlError::InvalidStructure { .. } => Some(ErrorCode::InvalidStructure),
            GlError::Service { .. } => Some(ErrorCode::ServiceFailed),
            GlError::Config { .. } => Some(ErrorCode::ConfigError),
            GlError::Io { .. } => Some(ErrorCode::IoError),
            GlError::Json { .. } => Some(ErrorCode::JsonError),
        }
    }

    /// Returns true if this is a parse error
    pub fn is_parse(&self) -> bool {
        matches!(self, GlError::Parse { .. })
    }

    /// Get a formatted error with full diagnostic output
    pub fn detailed_message(&self) -> String {
        match self {
            GlError::Parse {
                pos,
                msg,
                diagnostic: Some(d),
            } => d.format(&format!("Parse error at position {}: {}", pos, msg)),
            _ => self.to_string(),
        }
    }
}

/// Suggest the GL operator a stray separator was probably meant to be
///
/// Common mistakes are list separators borrowed from other formats.
pub fn suggest_operator(found: char) -> Option<char> {
    match found {
        ',' | ';' | '\\' => Some('/'),
        '_' => Some('~'),
        '&' => Some('+'),
        _ => None,
    }
}

/// Suggest a corrected namespace for a token with a miscased prefix
///
/// # Examples
///
/// ```
/// use ferro_gl::error::suggest_namespace;
///
/// assert_eq!(suggest_namespace("hla-A*01:01"), Some("HLA-A*01:01".to_string()));
/// assert_eq!(suggest_namespace("HLA-A*01:01"), None);
/// ```
pub fn suggest_namespace(token: &str) -> Option<String> {
    let (prefix, rest) = token.split_once('-')?;
    if prefix.eq_ignore_ascii_case("HLA") && prefix != "HLA" {
        Some(format!("HLA-{}", rest))
    } else {
        None
    }
}

impl From<std::io::Error> for GlError {
    fn from(err: std::io::Error) -> Self {
        GlError::Io {
            msg: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for GlError {
    fn from(err: serde_json::Error) -> Self {
        GlError::Json {
            msg: err.to_string(),
        }
    }
}
