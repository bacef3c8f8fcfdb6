//! IMGT/HLA allele history.
//!
//! Allele names are not stable across database releases: an allele may be
//! renamed (`A*24:03:01` became `A*24:03:01:01`) or withdrawn. Accession IDs
//! are stable, so converting a name between releases is a two-step lookup:
//! name at the source release to ID, then ID to name at the target release.
//!
//! # Example
//!
//! ```
//! use ferro_gl::history::{self, DbVersion};
//!
//! let data = "HLA_ID\t3250\t3200\nHLA00053\tA*24:03:01:01\tA*24:03:01\n";
//! let index = history::parse(data.as_bytes()).unwrap();
//!
//! let source: DbVersion = "3.20.0".parse().unwrap();
//! let target: DbVersion = "3.25.0".parse().unwrap();
//! assert_eq!(index.translate("A*24:03:01", source, target), Some("A*24:03:01:01"));
//! ```

pub mod index;
pub mod loader;
pub mod version;

pub use index::{AlleleHistoryBuilder, AlleleHistoryIndex, AlleleId};
pub use loader::{from_file, parse};
pub use version::DbVersion;

use std::path::PathBuf;

/// Environment variable pointing at a local IMGT/HLA checkout
pub const IMGTHLA_ENV: &str = "IMGTHLA";

/// History file name looked up inside `$IMGTHLA`
pub const DEFAULT_HISTORY_FILE: &str = "AllelelistGgroups_history.txt";

/// Default history path derived from `$IMGTHLA`, if set
pub fn default_history_path() -> Option<PathBuf> {
    std::env::var_os(IMGTHLA_ENV).map(|dir| PathBuf::from(dir).join(DEFAULT_HISTORY_FILE))
}
