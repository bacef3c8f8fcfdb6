//! GL String liftover between IMGT/HLA database releases.
//!
//! Each allele is mapped to its accession ID at the source release and back
//! to a name at the target release. Alleles with no name at the target are
//! dropped and the surrounding structure collapses around them (see
//! [`lift`] for the rules).
//!
//! # Example
//!
//! ```
//! use ferro_gl::history;
//! use ferro_gl::liftover::{liftover, LiftoverStatus};
//!
//! let data = "HLA_ID\t3250\t3200\n\
//!             HLA00001\tA*01:01:01:01\tA*01:01:01:01\n\
//!             HLA00053\tA*24:03:01:01\tA*24:03:01\n";
//! let index = history::parse(data.as_bytes()).unwrap();
//!
//! let result = liftover("HLA-A*01:01:01:01+HLA-A*24:03:01", "3.20.0", "3.25.0", &index).unwrap();
//! assert_eq!(
//!     result.target_text().as_deref(),
//!     Some("HLA-A*01:01:01:01+HLA-A*24:03:01:01")
//! );
//! assert_eq!(result.status(), LiftoverStatus::Converted);
//! ```

pub mod lift;
pub mod policy;
pub mod report;

pub use lift::{lift_node, Lifter};
pub use policy::{DuplicatePolicy, GenotypePolicy, LiftoverConfig, UnknownSourcePolicy};
pub use report::{LiftoverEvent, LiftoverResult, LiftoverStatus};

use crate::error::GlError;
use crate::gl::{parse_gl, GlNode};
use crate::history::{AlleleHistoryIndex, DbVersion};

/// Lift a GL String with the default policies.
pub fn liftover(
    text: &str,
    source: &str,
    target: &str,
    index: &AlleleHistoryIndex,
) -> Result<LiftoverResult, GlError> {
    liftover_with_config(text, source, target, index, LiftoverConfig::default())
}

/// Lift a GL String.
///
/// Fails if either version is missing from `index`, if `text` does not
/// parse, or (with [`UnknownSourcePolicy::Reject`]) if a locus does not
/// exist at the source version.
pub fn liftover_with_config(
    text: &str,
    source: &str,
    target: &str,
    index: &AlleleHistoryIndex,
    config: LiftoverConfig,
) -> Result<LiftoverResult, GlError> {
    let source = resolve_version(source, index)?;
    let target = resolve_version(target, index)?;
    let node = parse_gl(text)?;
    liftover_node(text, &node, source, target, index, config)
}

/// Lift an already parsed tree. `text` is carried into the result as the source.
pub fn liftover_node(
    text: &str,
    node: &GlNode,
    source: DbVersion,
    target: DbVersion,
    index: &AlleleHistoryIndex,
    config: LiftoverConfig,
) -> Result<LiftoverResult, GlError> {
    if config.unknown_source == UnknownSourcePolicy::Reject {
        check_source(node, source, index)?;
    }

    let mut lifter = Lifter::new(index, source, target).with_config(config);
    let lifted = lifter.lift(node);
    Ok(LiftoverResult {
        source: text.to_string(),
        source_version: source,
        target_version: target,
        target: lifted,
        events: lifter.into_events(),
    })
}

/// Lift many GL Strings between the same two versions.
///
/// Results are returned in input order. With the `parallel` feature the
/// work is spread across the rayon thread pool.
pub fn liftover_batch<S: AsRef<str> + Sync>(
    texts: &[S],
    source: &str,
    target: &str,
    index: &AlleleHistoryIndex,
    config: LiftoverConfig,
) -> Result<Vec<Result<LiftoverResult, GlError>>, GlError> {
    let source = resolve_version(source, index)?;
    let target = resolve_version(target, index)?;

    let lift_one = |text: &str| {
        let node = parse_gl(text)?;
        liftover_node(text, &node, source, target, index, config)
    };

    #[cfg(feature = "parallel")]
    {
        Ok(crate::parallel::map_ordered(texts, |s| lift_one(s.as_ref())))
    }
    #[cfg(not(feature = "parallel"))]
    {
        Ok(texts.iter().map(|s| lift_one(s.as_ref())).collect())
    }
}

/// Parse a version label and check the history has a column for it
pub fn resolve_version(label: &str, index: &AlleleHistoryIndex) -> Result<DbVersion, GlError> {
    let version: DbVersion = label.parse()?;
    if !index.contains_version(version) {
        return Err(GlError::UnknownVersion {
            version: version.to_string(),
        });
    }
    Ok(version)
}

fn check_source(node: &GlNode, source: DbVersion, index: &AlleleHistoryIndex) -> Result<(), GlError> {
    match node
        .loci()
        .into_iter()
        .find(|locus| index.lookup_id(source, locus.allele()).is_none())
    {
        Some(missing) => Err(GlError::UnknownAllele {
            allele: missing.name().to_string(),
            version: source.to_string(),
        }),
        None => Ok(()),
    }
}
