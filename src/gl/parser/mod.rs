//! GL String parser
//!
//! Recursive descent over operator precedence: at each level the loosest
//! operator present is split first and every piece is parsed with the next
//! tighter operator, down to single [`Locus`] tokens parsed with nom.
//!
//! | Step | Operator | Node |
//! |------|----------|------|
//! | 1 | `\|` | [`GlNode::GenotypeList`] |
//! | 2 | `^` | [`GlNode::MultilocusUnphasedGenotype`] |
//! | 3 | `+` | [`GlNode::Genotype`] (exactly two pieces) |
//! | 4 | `~` | [`GlNode::Haplotype`] |
//! | 5 | `/` | [`GlNode::AmbiguousAllele`] |
//! | 6 | none | [`GlNode::Locus`] |
//!
//! A string with no operators parses to a bare locus; containers with one
//! member are never produced.

pub mod token;

use memchr::{memchr, memchr_iter};

use crate::error::{suggest_operator, Diagnostic, ErrorCode, GlError, SourceSpan};
use crate::gl::locus::Locus;
use crate::gl::node::{GlNode, Members};
use crate::gl::operator::GlOperator;
use token::parse_locus_token;

/// Parse a GL String into its syntax tree
///
/// # Example
///
/// ```
/// use ferro_gl::parse_gl;
///
/// let node = parse_gl("HLA-A*01:01:01:01/HLA-A*01:02+HLA-A*24:03:01").unwrap();
/// assert_eq!(node.to_string(), "HLA-A*01:01:01:01/HLA-A*01:02+HLA-A*24:03:01");
/// ```
pub fn parse_gl(input: &str) -> Result<GlNode, GlError> {
    if input.is_empty() {
        return Err(GlError::parse_with_diagnostic(
            0,
            "Empty GL String",
            Diagnostic::new().with_code(ErrorCode::UnexpectedEnd),
        ));
    }
    check_characters(input)?;

    let parser = Splitter { source: input };
    parser.parse_level(input, 0, &GlOperator::LOOSEST_FIRST)
}

fn is_gl_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '*' | ':' | '-') || GlOperator::from_symbol(c).is_some()
}

/// Reject whitespace and foreign characters before splitting, so the error
/// points at the character rather than at the token containing it.
fn check_characters(input: &str) -> Result<(), GlError> {
    let Some((pos, c)) = input.char_indices().find(|(_, c)| !is_gl_char(*c)) else {
        return Ok(());
    };

    let mut diagnostic = Diagnostic::new()
        .with_code(ErrorCode::UnexpectedChar)
        .with_span(SourceSpan::new(pos, pos + c.len_utf8()))
        .with_source(input);

    if c.is_whitespace() {
        let stripped: String = input.chars().filter(|c| !c.is_whitespace()).collect();
        diagnostic = diagnostic
            .with_hint("GL Strings cannot contain whitespace")
            .with_suggestion(stripped);
    } else if let Some(op) = suggest_operator(c) {
        diagnostic = diagnostic
            .with_hint(format!("'{}' is not a GL String operator", c))
            .with_suggestion(input.replace(c, &op.to_string()));
    }

    Err(GlError::parse_with_diagnostic(
        pos,
        format!("Unexpected character '{}'", c.escape_default()),
        diagnostic,
    ))
}

struct Splitter<'a> {
    source: &'a str,
}

impl<'a> Splitter<'a> {
    /// Parse `segment`, which starts at byte `offset` of the source and may
    /// only contain the operators in `ops` (loosest first).
    fn parse_level(
        &self,
        segment: &'a str,
        offset: usize,
        ops: &[GlOperator],
    ) -> Result<GlNode, GlError> {
        let Some(level) = ops
            .iter()
            .position(|op| memchr(op.byte(), segment.as_bytes()).is_some())
        else {
            return self.parse_locus(segment, offset).map(GlNode::Locus);
        };

        let op = ops[level];
        let tighter = &ops[level + 1..];
        let pieces = self.split(segment, offset, op)?;

        match op {
            GlOperator::AlleleList => {
                let loci = pieces
                    .into_iter()
                    .map(|(piece, at)| self.parse_locus(piece, at))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(GlNode::AmbiguousAllele(members(loci)?))
            }
            GlOperator::Genotype => {
                if pieces.len() != 2 {
                    return Err(self.arity_error(segment, offset, pieces.len()));
                }
                let (first, first_at) = pieces[0];
                let (second, second_at) = pieces[1];
                Ok(GlNode::Genotype(
                    Box::new(self.parse_level(first, first_at, tighter)?),
                    Box::new(self.parse_level(second, second_at, tighter)?),
                ))
            }
            _ => {
                let children = pieces
                    .into_iter()
                    .map(|(piece, at)| self.parse_level(piece, at, tighter))
                    .collect::<Result<Vec<_>, _>>()?;
                let children = members(children)?;
                Ok(match op {
                    GlOperator::Haplotype => GlNode::Haplotype(children),
                    GlOperator::MultilocusUnphasedGenotype => {
                        GlNode::MultilocusUnphasedGenotype(children)
                    }
                    _ => GlNode::GenotypeList(children),
                })
            }
        }
    }

    fn parse_locus(&self, segment: &str, offset: usize) -> Result<Locus, GlError> {
        parse_locus_token(segment, offset, self.source)
    }

    /// Split on `op`, returning each piece with its source offset.
    /// Every piece must be non-empty.
    fn split(
        &self,
        segment: &'a str,
        offset: usize,
        op: GlOperator,
    ) -> Result<Vec<(&'a str, usize)>, GlError> {
        let mut pieces = Vec::new();
        let mut start = 0;
        let cuts = memchr_iter(op.byte(), segment.as_bytes()).chain(std::iter::once(segment.len()));

        for cut in cuts {
            if cut == start {
                return Err(self.empty_segment_error(offset + start, op));
            }
            pieces.push((&segment[start..cut], offset + start));
            start = cut + 1;
        }

        Ok(pieces)
    }

    fn empty_segment_error(&self, pos: usize, op: GlOperator) -> GlError {
        let msg = if pos == 0 {
            format!("GL String cannot start with '{}'", op)
        } else if pos >= self.source.len() {
            format!("GL String cannot end with '{}'", op)
        } else {
            format!("Empty segment at '{}'", op)
        };
        let span = SourceSpan::point(pos.min(self.source.len().saturating_sub(1)));
        GlError::parse_with_diagnostic(
            pos,
            msg,
            Diagnostic::new()
                .with_code(ErrorCode::EmptySegment)
                .with_span(span)
                .with_source(self.source)
                .with_hint("Every operator must have an allele or group on both sides"),
        )
    }

    fn arity_error(&self, segment: &str, offset: usize, found: usize) -> GlError {
        // point at the first surplus '+'
        let pos = memchr_iter(b'+', segment.as_bytes())
            .nth(1)
            .map_or(offset, |i| offset + i);
        GlError::parse_with_diagnostic(
            pos,
            format!("Genotype must have exactly 2 members, found {}", found),
            Diagnostic::new()
                .with_code(ErrorCode::GenotypeArity)
                .with_span(SourceSpan::point(pos))
                .with_source(self.source)
                .with_hint("Use '^' to combine genotypes at different loci or '|' for alternatives"),
        )
    }
}

fn members<T>(items: Vec<T>) -> Result<Members<T>, GlError> {
    // split() never yields zero pieces
    Members::new(items).ok_or_else(|| GlError::parse(0, "Empty member list"))
}
