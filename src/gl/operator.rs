//! GL String operators and GL Service resource types

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::error::GlError;

/// One of the five GL String operators.
///
/// Variants are declared from tightest to loosest binding, so the derived
/// `Ord` follows precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GlOperator {
    /// `/` - ambiguous alleles
    AlleleList,
    /// `~` - phased alleles on one chromosome
    Haplotype,
    /// `+` - the two chromosomal copies of a locus
    Genotype,
    /// `^` - genotypes at different loci
    MultilocusUnphasedGenotype,
    /// `|` - alternative genotypes
    GenotypeList,
}

impl GlOperator {
    /// All operators, loosest first (the order the parser splits in)
    pub const LOOSEST_FIRST: [GlOperator; 5] = [
        GlOperator::GenotypeList,
        GlOperator::MultilocusUnphasedGenotype,
        GlOperator::Genotype,
        GlOperator::Haplotype,
        GlOperator::AlleleList,
    ];

    /// The operator character
    pub fn symbol(&self) -> char {
        match self {
            GlOperator::AlleleList => '/',
            GlOperator::Haplotype => '~',
            GlOperator::Genotype => '+',
            GlOperator::MultilocusUnphasedGenotype => '^',
            GlOperator::GenotypeList => '|',
        }
    }

    /// The operator as a single ASCII byte
    pub fn byte(&self) -> u8 {
        self.symbol() as u8
    }

    /// Look up an operator by its character
    pub fn from_symbol(c: char) -> Option<Self> {
        match c {
            '/' => Some(GlOperator::AlleleList),
            '~' => Some(GlOperator::Haplotype),
            '+' => Some(GlOperator::Genotype),
            '^' => Some(GlOperator::MultilocusUnphasedGenotype),
            '|' => Some(GlOperator::GenotypeList),
            _ => None,
        }
    }

    /// Binding strength: 1 for `/` up to 5 for `|`. Leaves are 0.
    pub fn precedence(&self) -> u8 {
        *self as u8 + 1
    }

    /// The GL Service resource produced by this operator
    pub fn resource(&self) -> GlResource {
        match self {
            GlOperator::AlleleList => GlResource::AlleleList,
            GlOperator::Haplotype => GlResource::Haplotype,
            GlOperator::Genotype => GlResource::Genotype,
            GlOperator::MultilocusUnphasedGenotype => GlResource::MultilocusUnphasedGenotype,
            GlOperator::GenotypeList => GlResource::GenotypeList,
        }
    }
}

impl fmt::Display for GlOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// GL Service resource type, used in service URIs
/// (e.g. `.../imgt-hla/3.25.0/genotype`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum GlResource {
    Allele,
    AlleleList,
    Haplotype,
    Genotype,
    MultilocusUnphasedGenotype,
    GenotypeList,
}

impl GlResource {
    pub fn as_str(&self) -> &'static str {
        match self {
            GlResource::Allele => "allele",
            GlResource::AlleleList => "allele-list",
            GlResource::Haplotype => "haplotype",
            GlResource::Genotype => "genotype",
            GlResource::MultilocusUnphasedGenotype => "multilocus-unphased-genotype",
            GlResource::GenotypeList => "genotype-list",
        }
    }
}

impl fmt::Display for GlResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GlResource {
    type Err = GlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "allele" => Ok(GlResource::Allele),
            "allele-list" => Ok(GlResource::AlleleList),
            "haplotype" => Ok(GlResource::Haplotype),
            "genotype" => Ok(GlResource::Genotype),
            "multilocus-unphased-genotype" => Ok(GlResource::MultilocusUnphasedGenotype),
            "genotype-list" => Ok(GlResource::GenotypeList),
            other => Err(GlError::InvalidStructure {
                msg: format!("unknown GL resource '{}'", other),
            }),
        }
    }
}
