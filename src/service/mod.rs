//! GL Service integration
//!
//! A GL Service stores GL Strings under stable URIs. This module resolves a
//! source URI to text, runs the liftover, and registers the source and target
//! GL Strings to produce a [`LiftoverRecord`].
//!
//! Network access happens only before parsing and after serialization; the
//! liftover itself never does I/O.
//!
//! # Example
//!
//! ```
//! use ferro_gl::gl::GlResource;
//! use ferro_gl::history;
//! use ferro_gl::liftover::LiftoverConfig;
//! use ferro_gl::service::{convert_and_register, GlService, GlSource, MockGlService};
//!
//! let data = "HLA_ID\t3250\t3200\nHLA00053\tA*24:03:01:01\tA*24:03:01\n";
//! let index = history::parse(data.as_bytes()).unwrap();
//!
//! let service = MockGlService::new();
//! let source_uri = service.insert("3.20.0", GlResource::Allele, "HLA-A*24:03:01").unwrap();
//!
//! let conversion = convert_and_register(
//!     &service,
//!     GlSource::Uri(source_uri),
//!     "3.25.0",
//!     &index,
//!     LiftoverConfig::default(),
//! )
//! .unwrap();
//! let record = conversion.record.unwrap();
//! assert_eq!(record.target_gl, "HLA-A*24:03:01:01");
//! ```

#[cfg(feature = "gl-service")]
pub mod http;
pub mod mock;
pub mod types;
pub mod uri;

#[cfg(feature = "gl-service")]
pub use http::HttpGlService;
pub use mock::MockGlService;
pub use types::{LiftoverRecord, LiftoverRequest};
pub use uri::GlUri;

use log::{info, warn};

use crate::error::GlError;
use crate::gl::{parse_gl, GlResource};
use crate::history::AlleleHistoryIndex;
use crate::liftover::{liftover_node, resolve_version, LiftoverConfig, LiftoverResult};

/// A store of GL Strings addressed by URI
pub trait GlService {
    /// Resolve a URI to its GL String
    fn fetch(&self, uri: &GlUri) -> Result<String, GlError>;

    /// Register a GL String and return its URI
    fn register(&self, text: &str, version: &str, resource: GlResource) -> Result<GlUri, GlError>;
}

/// Where the source GL String comes from
#[derive(Debug, Clone)]
pub enum GlSource {
    /// Already registered; version and resource come from the URI
    Uri(GlUri),
    /// Literal text at a given version
    Text { text: String, version: String },
}

/// Outcome of [`convert_and_register`]
#[derive(Debug, Clone)]
pub struct Conversion {
    pub result: LiftoverResult,
    /// `None` when the liftover was empty and nothing was registered
    pub record: Option<LiftoverRecord>,
}

/// Resolve, lift and register.
///
/// A source given as text is registered at its own version so the record
/// has a source URI; a source URI is reused as is. An empty liftover is
/// returned without registering anything.
pub fn convert_and_register<S: GlService + ?Sized>(
    service: &S,
    source: GlSource,
    target: &str,
    index: &AlleleHistoryIndex,
    config: LiftoverConfig,
) -> Result<Conversion, GlError> {
    let (text, source_version, source_uri) = match source {
        GlSource::Uri(uri) => {
            let text = service.fetch(&uri)?;
            (text, uri.version().to_string(), Some(uri))
        }
        GlSource::Text { text, version } => (text, version, None),
    };

    let source_db = resolve_version(&source_version, index)?;
    let target_db = resolve_version(target, index)?;
    let node = parse_gl(&text)?;
    let result = liftover_node(&text, &node, source_db, target_db, index, config)?;

    let Some(target_node) = result.target.as_ref() else {
        warn!("{}: all alleles dropped at {}, nothing registered", text, target);
        return Ok(Conversion {
            result,
            record: None,
        });
    };

    let source_uri = match source_uri {
        Some(uri) => uri,
        None => service.register(&text, &source_version, node.resource())?,
    };
    let target_gl = target_node.to_string();
    let target_uri = service.register(&target_gl, target, target_node.resource())?;
    info!("Registered {} as {}", target_gl, target_uri);

    let record = LiftoverRecord {
        source_gl: text,
        source_uri: source_uri.to_string(),
        target_gl,
        target_uri: target_uri.to_string(),
    };
    Ok(Conversion {
        result,
        record: Some(record),
    })
}
