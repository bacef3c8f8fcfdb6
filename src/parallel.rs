//! Parallel processing support for ferro-gl
//!
//! Parallel variants of parsing and liftover using rayon. Enable with the
//! `parallel` feature.
//!
//! # Example
//!
//! ```no_run
//! # #[cfg(feature = "parallel")]
//! # fn main() {
//! use ferro_gl::history;
//! use ferro_gl::liftover::LiftoverConfig;
//! use ferro_gl::parallel::{liftover_parallel, parse_gl_parallel};
//!
//! let gl_strings = vec![
//!     "HLA-A*01:01:01:01/HLA-A*01:02+HLA-A*24:03:01",
//!     "HLA-DRB1*11:11:02+HLA-DRB1*08:01:03",
//! ];
//!
//! let parsed: Vec<_> = parse_gl_parallel(&gl_strings)
//!     .into_iter()
//!     .filter_map(|r| r.ok())
//!     .collect();
//!
//! let index = history::from_file("AllelelistGgroups_history.txt").unwrap();
//! let _lifted = liftover_parallel(&gl_strings, "3.20.0", "3.25.0", &index, LiftoverConfig::default());
//! # }
//! # #[cfg(not(feature = "parallel"))]
//! # fn main() {}
//! ```

use rayon::prelude::*;

use crate::error::GlError;
use crate::gl::{parse_gl, GlNode};
use crate::history::AlleleHistoryIndex;
use crate::liftover::{liftover_batch, LiftoverConfig, LiftoverResult};

/// Apply `f` to every item on the rayon pool, keeping input order
pub(crate) fn map_ordered<T, R, F>(items: &[T], f: F) -> Vec<R>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> R + Sync + Send,
{
    items.par_iter().map(f).collect()
}

/// Parse multiple GL Strings in parallel
///
/// Returns a vector of results, one for each input string.
/// Order is preserved.
pub fn parse_gl_parallel<S: AsRef<str> + Sync>(gl_strings: &[S]) -> Vec<Result<GlNode, GlError>> {
    map_ordered(gl_strings, |s| parse_gl(s.as_ref()))
}

/// Lift multiple GL Strings in parallel
///
/// Fails up front if either version is unknown; otherwise returns one
/// result per input, in order.
pub fn liftover_parallel<S: AsRef<str> + Sync>(
    gl_strings: &[S],
    source: &str,
    target: &str,
    index: &AlleleHistoryIndex,
    config: LiftoverConfig,
) -> Result<Vec<Result<LiftoverResult, GlError>>, GlError> {
    liftover_batch(gl_strings, source, target, index, config)
}
