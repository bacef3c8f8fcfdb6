//! GL String abstract syntax tree
//!
//! [`GlNode`] is a closed sum type over the grammar. Arity is enforced by the
//! types: a genotype always holds two members and every list-bearing variant
//! holds a [`Members`] list, which cannot be empty.
//!
//! The `Display` impl is the serializer: children are joined with their
//! operator in order, with no whitespace or brackets. Because operator
//! precedence is fixed, the output re-parses to the same tree.

use serde::Serialize;
use std::fmt;

use crate::error::GlError;
use crate::gl::locus::Locus;
use crate::gl::operator::{GlOperator, GlResource};

/// A non-empty, ordered list of child nodes
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Members<T>(Vec<T>);

impl<T> Members<T> {
    /// Returns `None` when `items` is empty
    pub fn new(items: Vec<T>) -> Option<Self> {
        if items.is_empty() {
            None
        } else {
            Some(Self(items))
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; present for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn first(&self) -> &T {
        &self.0[0]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<T> {
        self.0
    }
}

impl<'a, T> IntoIterator for &'a Members<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// A parsed GL String
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GlNode {
    /// A single allele or G-group
    Locus(Locus),
    /// `a/b/c`
    AmbiguousAllele(Members<Locus>),
    /// `a~b~c`
    Haplotype(Members<GlNode>),
    /// `a+b`
    Genotype(Box<GlNode>, Box<GlNode>),
    /// `a^b^c`
    MultilocusUnphasedGenotype(Members<GlNode>),
    /// `a|b|c`
    GenotypeList(Members<GlNode>),
}

impl GlNode {
    /// Ambiguous allele list from one or more loci
    pub fn ambiguous_allele(loci: Vec<Locus>) -> Result<Self, GlError> {
        Members::new(loci)
            .map(GlNode::AmbiguousAllele)
            .ok_or_else(|| empty_members(GlOperator::AlleleList))
    }

    pub fn haplotype(children: Vec<GlNode>) -> Result<Self, GlError> {
        checked_members(GlOperator::Haplotype, children).map(GlNode::Haplotype)
    }

    /// Genotype from its two chromosomal copies
    pub fn genotype(first: GlNode, second: GlNode) -> Result<Self, GlError> {
        for child in [&first, &second] {
            check_binds_tighter(GlOperator::Genotype, child)?;
        }
        Ok(GlNode::Genotype(Box::new(first), Box::new(second)))
    }

    pub fn multilocus_unphased_genotype(children: Vec<GlNode>) -> Result<Self, GlError> {
        checked_members(GlOperator::MultilocusUnphasedGenotype, children)
            .map(GlNode::MultilocusUnphasedGenotype)
    }

    pub fn genotype_list(children: Vec<GlNode>) -> Result<Self, GlError> {
        checked_members(GlOperator::GenotypeList, children).map(GlNode::GenotypeList)
    }

    /// The operator joining this node's children, `None` for a leaf
    pub fn operator(&self) -> Option<GlOperator> {
        match self {
            GlNode::Locus(_) => None,
            GlNode::AmbiguousAllele(_) => Some(GlOperator::AlleleList),
            GlNode::Haplotype(_) => Some(GlOperator::Haplotype),
            GlNode::Genotype(..) => Some(GlOperator::Genotype),
            GlNode::MultilocusUnphasedGenotype(_) => Some(GlOperator::MultilocusUnphasedGenotype),
            GlNode::GenotypeList(_) => Some(GlOperator::GenotypeList),
        }
    }

    /// 0 for a leaf, otherwise the operator's precedence
    pub fn precedence(&self) -> u8 {
        self.operator().map_or(0, |op| op.precedence())
    }

    /// GL Service resource type of this node
    pub fn resource(&self) -> GlResource {
        self.operator()
            .map_or(GlResource::Allele, |op| op.resource())
    }

    /// All leaves, left to right
    pub fn loci(&self) -> Vec<&Locus> {
        let mut out = Vec::new();
        self.collect_loci(&mut out);
        out
    }

    fn collect_loci<'a>(&'a self, out: &mut Vec<&'a Locus>) {
        match self {
            GlNode::Locus(locus) => out.push(locus),
            GlNode::AmbiguousAllele(loci) => out.extend(loci.iter()),
            GlNode::Genotype(a, b) => {
                a.collect_loci(out);
                b.collect_loci(out);
            }
            GlNode::Haplotype(children)
            | GlNode::MultilocusUnphasedGenotype(children)
            | GlNode::GenotypeList(children) => {
                for child in children {
                    child.collect_loci(out);
                }
            }
        }
    }

    /// Returns true if this is a single locus
    pub fn is_locus(&self) -> bool {
        matches!(self, GlNode::Locus(_))
    }
}

impl From<Locus> for GlNode {
    fn from(locus: Locus) -> Self {
        GlNode::Locus(locus)
    }
}

fn empty_members(op: GlOperator) -> GlError {
    GlError::InvalidStructure {
        msg: format!("'{}' requires at least one member", op),
    }
}

fn check_binds_tighter(op: GlOperator, child: &GlNode) -> Result<(), GlError> {
    if child.precedence() < op.precedence() {
        Ok(())
    } else {
        Err(GlError::InvalidStructure {
            msg: format!(
                "'{}' cannot contain a {} without brackets",
                op,
                child.resource()
            ),
        })
    }
}

fn checked_members(op: GlOperator, children: Vec<GlNode>) -> Result<Members<GlNode>, GlError> {
    for child in &children {
        check_binds_tighter(op, child)?;
    }
    Members::new(children).ok_or_else(|| empty_members(op))
}

fn write_joined<T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    items: &Members<T>,
    op: GlOperator,
) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, "{}", op.symbol())?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

impl fmt::Display for GlNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GlNode::Locus(locus) => write!(f, "{}", locus),
            GlNode::AmbiguousAllele(loci) => write_joined(f, loci, GlOperator::AlleleList),
            GlNode::Haplotype(children) => write_joined(f, children, GlOperator::Haplotype),
            GlNode::Genotype(a, b) => write!(f, "{}+{}", a, b),
            GlNode::MultilocusUnphasedGenotype(children) => {
                write_joined(f, children, GlOperator::MultilocusUnphasedGenotype)
            }
            GlNode::GenotypeList(children) => write_joined(f, children, GlOperator::GenotypeList),
        }
    }
}
