//! In-memory GL Service for testing

use std::collections::HashMap;
use std::sync::Mutex;

use super::uri::GlUri;
use super::GlService;
use crate::error::GlError;
use crate::gl::GlResource;

/// GL Service double that stores registrations in memory.
///
/// Registering the same text twice at the same version and resource returns
/// the same URI, as the real service does.
#[derive(Debug)]
pub struct MockGlService {
    base: String,
    namespace: String,
    store: Mutex<Store>,
}

#[derive(Debug, Default)]
struct Store {
    by_uri: HashMap<String, String>,
    registered: Vec<String>,
}

impl MockGlService {
    pub fn new() -> Self {
        Self::with_base("https://gl.example.org", "imgt-hla")
    }

    pub fn with_base(base: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            base: base.into().trim_end_matches('/').to_string(),
            namespace: namespace.into(),
            store: Mutex::new(Store::default()),
        }
    }

    /// Pre-load a GL String so [`GlService::fetch`] can resolve it
    pub fn insert(&self, version: &str, resource: GlResource, text: &str) -> Result<GlUri, GlError> {
        self.register(text, version, resource)
    }

    /// URIs handed out by `register`, in order
    pub fn registered(&self) -> Vec<String> {
        self.lock().map(|store| store.registered.clone()).unwrap_or_default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Store>, GlError> {
        self.store.lock().map_err(|_| GlError::Service {
            msg: "mock service state poisoned".to_string(),
        })
    }
}

impl Default for MockGlService {
    fn default() -> Self {
        Self::new()
    }
}

impl GlService for MockGlService {
    fn fetch(&self, uri: &GlUri) -> Result<String, GlError> {
        self.lock()?
            .by_uri
            .get(uri.as_str())
            .cloned()
            .ok_or_else(|| GlError::Service {
                msg: format!("status 404 for {}", uri),
            })
    }

    fn register(&self, text: &str, version: &str, resource: GlResource) -> Result<GlUri, GlError> {
        let mut store = self.lock()?;
        let prefix = format!("{}/{}/{}/{}/", self.base, self.namespace, version, resource);
        let existing = store
            .by_uri
            .iter()
            .find(|(uri, stored)| uri.starts_with(&prefix) && stored.as_str() == text)
            .map(|(uri, _)| uri.clone());

        let uri = match existing {
            Some(uri) => uri,
            None => {
                let uri = format!("{}{}", prefix, store.by_uri.len() + 1);
                store.by_uri.insert(uri.clone(), text.to_string());
                uri
            }
        };
        store.registered.push(uri.clone());
        GlUri::parse(&uri)
    }
}
