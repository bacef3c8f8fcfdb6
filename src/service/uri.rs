//! GL Service URIs
//!
//! A registered GL String lives at
//! `<base>/<namespace>/<version>/<resource>/<id>`, e.g.
//! `https://gl.nmdp.org/imgt-hla/3.25.0/genotype/1x`.

use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use url::Url;

use crate::error::GlError;
use crate::gl::GlResource;

/// A parsed GL Service URI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlUri {
    url: Url,
    namespace: String,
    version: String,
    resource: GlResource,
    id: String,
}

impl GlUri {
    pub fn parse(uri: &str) -> Result<Self, GlError> {
        let invalid = |why: &str| GlError::Service {
            msg: format!("invalid GL Service URI '{}': {}", uri, why),
        };

        let url = Url::parse(uri.trim()).map_err(|e| invalid(&e.to_string()))?;
        let segments: Vec<&str> = url
            .path_segments()
            .map(|s| s.filter(|seg| !seg.is_empty()).collect())
            .unwrap_or_default();

        let [.., namespace, version, resource, id] = segments.as_slice() else {
            return Err(invalid("expected <namespace>/<version>/<resource>/<id>"));
        };
        let resource = resource
            .parse::<GlResource>()
            .map_err(|_| invalid(&format!("unknown resource '{}'", resource)))?;

        Ok(Self {
            namespace: namespace.to_string(),
            version: version.to_string(),
            resource,
            id: id.to_string(),
            url,
        })
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Database version label, e.g. `3.25.0`
    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn resource(&self) -> GlResource {
        self.resource
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl FromStr for GlUri {
    type Err = GlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for GlUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}

impl Serialize for GlUri {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Collection URL a new GL String is posted to: `<base>/<namespace>/<version>/<resource>`
pub fn collection_url(
    base: &Url,
    namespace: &str,
    version: &str,
    resource: GlResource,
) -> Result<Url, GlError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| GlError::Service {
            msg: format!("'{}' cannot be used as a base URL", base),
        })?
        .pop_if_empty()
        .extend([namespace, version, resource.as_str()]);
    Ok(url)
}
