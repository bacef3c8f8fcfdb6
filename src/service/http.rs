//! Blocking HTTP client for a GL Service.

use log::debug;
use reqwest::blocking::Client;
use reqwest::header::{CONTENT_TYPE, LOCATION};
use reqwest::StatusCode;
use std::time::Duration;
use url::Url;

use super::uri::{collection_url, GlUri};
use super::GlService;
use crate::error::GlError;
use crate::gl::GlResource;

/// GL Service reached over HTTP
#[derive(Debug, Clone)]
pub struct HttpGlService {
    client: Client,
    base: Url,
    namespace: String,
}

impl HttpGlService {
    pub fn new(base: &str, namespace: &str, timeout: Duration) -> Result<Self, GlError> {
        let base = Url::parse(base).map_err(|e| GlError::Service {
            msg: format!("invalid service URL '{}': {}", base, e),
        })?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GlError::Service {
                msg: format!("Failed to create HTTP client: {}", e),
            })?;
        Ok(Self {
            client,
            base,
            namespace: namespace.to_string(),
        })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }
}

impl GlService for HttpGlService {
    fn fetch(&self, uri: &GlUri) -> Result<String, GlError> {
        debug!("GET {}", uri);
        let response = self
            .client
            .get(uri.url().clone())
            .send()
            .map_err(|e| GlError::Service {
                msg: format!("Failed to fetch {}: {}", uri, e),
            })?;

        let status = response.status();
        let body = response.text().map_err(|e| GlError::Service {
            msg: format!("Failed to read response from {}: {}", uri, e),
        })?;
        if status != StatusCode::OK {
            return Err(GlError::Service {
                msg: format!("HTTP {} for {}: {}", status, uri, body.trim()),
            });
        }
        Ok(body.trim().to_string())
    }

    fn register(&self, text: &str, version: &str, resource: GlResource) -> Result<GlUri, GlError> {
        let url = collection_url(&self.base, &self.namespace, version, resource)?;
        debug!("POST {} <- {}", url, text);

        let response = self
            .client
            .post(url.clone())
            .header(CONTENT_TYPE, "text/plain")
            .body(text.to_string())
            .send()
            .map_err(|e| GlError::Service {
                msg: format!("Failed to register with {}: {}", url, e),
            })?;

        let status = response.status();
        if status != StatusCode::CREATED {
            let body = response.text().unwrap_or_default();
            return Err(GlError::Service {
                msg: format!("HTTP {} for {}: {}", status, url, body.trim()),
            });
        }

        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| GlError::Service {
                msg: format!("{} returned 201 without a Location header", url),
            })?;
        // Location may be relative to the collection
        let location = url.join(location).map_err(|e| GlError::Service {
            msg: format!("invalid Location '{}': {}", location, e),
        })?;
        GlUri::parse(location.as_str())
    }
}
