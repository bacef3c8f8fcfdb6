//! Allele and G-group tokens, the leaves of a GL String

use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::GlError;
use crate::gl::parser::token::parse_locus_token;

/// A single allele or G-group name such as `HLA-A*24:03:01` or
/// `DRB1*04:03:01G`.
///
/// The optional namespace prefix (`HLA-`) is kept as part of the name so a
/// parsed token serializes back byte for byte. History tables store names
/// without the prefix; see [`Locus::allele`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Locus {
    name: String,
    /// Byte offset where the name without namespace starts
    allele_start: usize,
}

impl Locus {
    /// Parse and validate a single token.
    ///
    /// ```
    /// use ferro_gl::gl::Locus;
    ///
    /// let locus = Locus::parse("HLA-A*24:03:01").unwrap();
    /// assert_eq!(locus.namespace(), Some("HLA"));
    /// assert_eq!(locus.allele(), "A*24:03:01");
    /// assert_eq!(locus.gene(), "A");
    /// ```
    pub fn parse(token: &str) -> Result<Self, GlError> {
        parse_locus_token(token, 0, token)
    }

    /// Build a locus from trusted parts, e.g. a name read from the history table.
    pub fn with_namespace(namespace: Option<&str>, allele: &str) -> Self {
        match namespace {
            Some(ns) => Self {
                name: format!("{}-{}", ns, allele),
                allele_start: ns.len() + 1,
            },
            None => Self {
                name: allele.to_string(),
                allele_start: 0,
            },
        }
    }

    pub(crate) fn from_validated(name: &str, allele_start: usize) -> Self {
        Self {
            name: name.to_string(),
            allele_start,
        }
    }

    /// The full token as written
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Namespace prefix without the trailing `-`, if any
    pub fn namespace(&self) -> Option<&str> {
        if self.allele_start == 0 {
            None
        } else {
            Some(&self.name[..self.allele_start - 1])
        }
    }

    /// Name without the namespace prefix (the form used by history tables)
    pub fn allele(&self) -> &str {
        &self.name[self.allele_start..]
    }

    /// Gene portion, e.g. `DRB1` for `HLA-DRB1*04:03:01`
    pub fn gene(&self) -> &str {
        let allele = self.allele();
        allele.split_once('*').map_or(allele, |(gene, _)| gene)
    }

    /// True for G-group designations (trailing `G`)
    pub fn is_g_group(&self) -> bool {
        self.name.ends_with('G')
    }

    /// Same namespace as `self`, different allele name
    pub fn renamed(&self, allele: &str) -> Self {
        Self::with_namespace(self.namespace(), allele)
    }
}

impl fmt::Display for Locus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl FromStr for Locus {
    type Err = GlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Locus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_allele() {
        let locus = Locus::parse("DRB1*11:11:02").unwrap();
        assert_eq!(locus.namespace(), None);
        assert_eq!(locus.allele(), "DRB1*11:11:02");
        assert_eq!(locus.gene(), "DRB1");
        assert!(!locus.is_g_group());
    }

    #[test]
    fn test_g_group() {
        let locus = Locus::parse("HLA-A*01:01:01G").unwrap();
        assert!(locus.is_g_group());
        assert_eq!(locus.allele(), "A*01:01:01G");
    }

    #[test]
    fn test_renamed_keeps_namespace() {
        let locus = Locus::parse("HLA-A*24:03:01").unwrap();
        let renamed = locus.renamed("A*24:03:01:01");
        assert_eq!(renamed.name(), "HLA-A*24:03:01:01");
        assert_eq!(renamed.namespace(), Some("HLA"));

        let bare = Locus::parse("A*24:03:01").unwrap().renamed("A*24:03:01:01");
        assert_eq!(bare.name(), "A*24:03:01:01");
    }

    #[test]
    fn test_with_namespace_matches_parse() {
        assert_eq!(
            Locus::with_namespace(Some("HLA"), "B*07:02"),
            Locus::parse("HLA-B*07:02").unwrap()
        );
    }

    #[test]
    fn test_serialize_as_string() {
        let locus = Locus::parse("HLA-C*04:01").unwrap();
        assert_eq!(serde_json::to_string(&locus).unwrap(), "\"HLA-C*04:01\"");
    }
}
