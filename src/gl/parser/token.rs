//! Locus token parsing
//!
//! Parses allele and G-group names like `HLA-A*24:03:01`, `DRB1*11:11:02`,
//! `A*01:01:01G` or `HLA-C*04:09N`.
//!
//! Grammar:
//!
//! ```text
//! token     := [namespace "-"] gene "*" field (":" field)* [suffix]
//! namespace := [A-Z0-9]+
//! gene      := [A-Z0-9]+
//! field     := [0-9]+
//! suffix    := "N" | "L" | "S" | "C" | "A" | "Q" | "G" | "P"
//! ```

use nom::{
    bytes::complete::take_while1,
    character::complete::{char, digit1, satisfy},
    combinator::{opt, recognize},
    multi::many0,
    sequence::{preceded, terminated},
    IResult, Parser,
};

use crate::error::{suggest_namespace, Diagnostic, ErrorCode, GlError, SourceSpan};
use crate::gl::locus::Locus;

fn is_name_char(c: char) -> bool {
    c.is_ascii_uppercase() || c.is_ascii_digit()
}

/// Namespace prefix including the `-`, e.g. `HLA-`
fn parse_namespace(input: &str) -> IResult<&str, &str> {
    terminated(take_while1(is_name_char), char('-')).parse(input)
}

fn parse_gene(input: &str) -> IResult<&str, &str> {
    take_while1(is_name_char).parse(input)
}

/// Colon-separated numeric fields, e.g. `24:03:01`
fn parse_fields(input: &str) -> IResult<&str, &str> {
    recognize((digit1, many0(preceded(char(':'), digit1)))).parse(input)
}

fn parse_suffix(input: &str) -> IResult<&str, char> {
    satisfy(|c| matches!(c, 'N' | 'L' | 'S' | 'C' | 'A' | 'Q' | 'G' | 'P')).parse(input)
}

/// Parse a token into its namespace (if any) and the whole recognized name
fn parse_token(input: &str) -> IResult<&str, (Option<&str>, &str)> {
    let (rest, namespace) = opt(parse_namespace).parse(input)?;
    let (rest, _) = recognize((parse_gene, char('*'), parse_fields, opt(parse_suffix)))
        .parse(rest)?;
    let consumed = &input[..input.len() - rest.len()];
    Ok((rest, (namespace, consumed)))
}

/// Parse a complete locus token.
///
/// `offset` is the byte position of `token` inside `source`, so errors point
/// at the right column of the whole GL String.
pub(crate) fn parse_locus_token(token: &str, offset: usize, source: &str) -> Result<Locus, GlError> {
    let failed_at = match parse_token(token) {
        Ok(("", (namespace, name))) => {
            let allele_start = namespace.map_or(0, |ns| ns.len() + 1);
            return Ok(Locus::from_validated(name, allele_start));
        }
        Ok((rest, _)) => token.len() - rest.len(),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => token.len() - e.input.len(),
        Err(nom::Err::Incomplete(_)) => token.len(),
    };

    let pos = offset + failed_at;
    let mut diagnostic = Diagnostic::new()
        .with_code(ErrorCode::InvalidToken)
        .with_span(SourceSpan::new(offset, offset + token.len()))
        .with_source(source)
        .with_hint("Alleles look like HLA-A*24:03:01 or DRB1*04:03:01G");
    if let Some(suggestion) = suggest_namespace(token) {
        diagnostic = diagnostic.with_suggestion(suggestion);
    }

    Err(GlError::parse_with_diagnostic(
        pos,
        format!("Invalid allele token '{}'", token),
        diagnostic,
    ))
}
