//! GL String types and parser
//!
//! This module contains the syntax tree for GL Strings and a precedence-based
//! parser. GL Strings combine allele and G-group names with five operators,
//! tightest first: `/` (ambiguous alleles), `~` (haplotype), `+` (genotype),
//! `^` (multilocus unphased genotype) and `|` (genotype list).

pub mod locus;
pub mod node;
pub mod operator;
pub mod parser;

pub use locus::Locus;
pub use node::{GlNode, Members};
pub use operator::{GlOperator, GlResource};
pub use parser::parse_gl;

/// Render a syntax tree back to GL String text.
///
/// Equivalent to `node.to_string()`; `serialize(&parse_gl(s)?) == s` for
/// every accepted `s`.
pub fn serialize(node: &GlNode) -> String {
    node.to_string()
}
