//! JSON documents exchanged with GL Service clients

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::GlError;

/// A liftover job read from a JSON file:
///
/// ```json
/// {
///   "sourceUri": "https://gl.nmdp.org/imgt-hla/3.20.0/genotype/1x",
///   "targetNamespace": "https://gl.nmdp.org/imgt-hla/3.25.0/"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiftoverRequest {
    pub source_uri: String,
    pub target_namespace: String,
}

impl LiftoverRequest {
    pub fn from_file(path: &Path) -> Result<Self, GlError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Target version: the last non-empty path segment of `targetNamespace`
    pub fn target_version(&self) -> Result<&str, GlError> {
        self.target_namespace
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .filter(|segment| !segment.is_empty() && !segment.contains(':'))
            .ok_or_else(|| GlError::Service {
                msg: format!(
                    "cannot find a version in targetNamespace '{}'",
                    self.target_namespace
                ),
            })
    }
}

/// Source and target of a registered liftover.
///
/// Keys are camelCase and declared in sorted order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiftoverRecord {
    pub source_gl: String,
    pub source_uri: String,
    pub target_gl: String,
    pub target_uri: String,
}

impl LiftoverRecord {
    /// Pretty-printed JSON with four-space indentation
    pub fn to_json_pretty(&self) -> Result<String, GlError> {
        let mut out = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
        self.serialize(&mut serializer)?;
        String::from_utf8(out).map_err(|e| GlError::Json { msg: e.to_string() })
    }
}
