//! Liftover policies

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::GlError;

/// What to do with textually identical alleles inside one ambiguous list
/// after mapping, e.g. the same allele written twice in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicatePolicy {
    /// Keep every survivor
    #[default]
    Preserve,
    /// Keep the first occurrence only
    Collapse,
}

/// How a genotype with one missing member is handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GenotypePolicy {
    /// The whole genotype is dropped
    #[default]
    AllOrNothing,
    /// The genotype degenerates to its surviving member
    Degenerate,
}

/// What to do with a locus that does not exist at the source version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnknownSourcePolicy {
    /// Drop it like any other unmapped locus
    #[default]
    Drop,
    /// Fail the conversion with [`GlError::UnknownAllele`]
    Reject,
}

/// Settings for one liftover run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct LiftoverConfig {
    pub duplicates: DuplicatePolicy,
    pub genotype: GenotypePolicy,
    pub unknown_source: UnknownSourcePolicy,
}

impl LiftoverConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_duplicates(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicates = policy;
        self
    }

    pub fn with_genotype(mut self, policy: GenotypePolicy) -> Self {
        self.genotype = policy;
        self
    }

    pub fn with_unknown_source(mut self, policy: UnknownSourcePolicy) -> Self {
        self.unknown_source = policy;
        self
    }
}

macro_rules! kebab_str {
    ($ty:ident { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl $ty {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($ty::$variant => $name,)+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = GlError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($name => Ok($ty::$variant),)+
                    other => Err(GlError::Config {
                        msg: format!(
                            "unknown {} '{}', expected one of: {}",
                            stringify!($ty),
                            other,
                            [$($name),+].join(", ")
                        ),
                    }),
                }
            }
        }
    };
}

kebab_str!(DuplicatePolicy {
    Preserve => "preserve",
    Collapse => "collapse",
});

kebab_str!(GenotypePolicy {
    AllOrNothing => "all-or-nothing",
    Degenerate => "degenerate",
});

kebab_str!(UnknownSourcePolicy {
    Drop => "drop",
    Reject => "reject",
});
