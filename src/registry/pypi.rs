//! PyPI simple API adapter
//!
//! Fetches the published version list of a package from a PEP 691 index.
//! API endpoint: {index}/simple/{normalized-name}/ (JSON variant)

use crate::domain::normalize_name;
use crate::error::RegistryError;
use crate::registry::{HttpClient, PackageIndex};
use async_trait::async_trait;
use serde::Deserialize;

/// Default index base URL
pub const PYPI_URL: &str = "https://pypi.org";

/// Media type of the JSON simple API (PEP 691, versions list from PEP 700)
const SIMPLE_JSON_ACCEPT: &str = "application/vnd.pypi.simple.v1+json";

/// Adapter for the simple repository API
pub struct SimpleIndex {
    client: HttpClient,
    base_url: String,
}

/// Simple API project response
#[derive(Debug, Deserialize)]
struct SimpleProjectResponse {
    /// All published version strings
    #[serde(default)]
    versions: Vec<String>,
}

impl SimpleIndex {
    /// Create an adapter for pypi.org
    pub fn new(client: HttpClient) -> Self {
        Self::with_base_url(client, PYPI_URL)
    }

    /// Create an adapter for another index host
    pub fn with_base_url(client: HttpClient, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Build the simple API URL for a package
    fn build_url(&self, package: &str) -> String {
        format!("{}/simple/{}/", self.base_url, normalize_name(package))
    }
}

#[async_trait]
impl PackageIndex for SimpleIndex {
    fn registry_name(&self) -> &str {
        if self.base_url == PYPI_URL {
            "PyPI"
        } else {
            &self.base_url
        }
    }

    fn project_url(&self, package: &str) -> String {
        format!("{}/project/{}/", self.base_url, package)
    }

    async fn fetch_versions(&self, package: &str) -> Result<Vec<String>, RegistryError> {
        let url = self.build_url(package);
        let response: SimpleProjectResponse = self
            .client
            .get_json(&url, SIMPLE_JSON_ACCEPT, package, self.registry_name())
            .await?;

        Ok(response.versions)
    }
}
