//! Packagist registry client

#[cfg(test)]
use mockall::automock;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::packagist::error::RegistryError;

pub const DEFAULT_PACKAGIST_URL: &str = "https://packagist.org";

/// Trait for fetching raw package metadata from a registry
///
/// Returns the registry's JSON document verbatim; extraction into typed
/// fields happens later so the cache can store the full response.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// Fetches the metadata document for a package
    ///
    /// # Arguments
    /// * `package_name` - The `owner/name` package identifier
    ///
    /// # Returns
    /// * `Ok(Value)` - The raw JSON body from the registry
    /// * `Err(RegistryError)` - If the fetch fails or the body is not JSON
    async fn fetch(&self, package_name: &str) -> Result<serde_json::Value, RegistryError>;
}

/// Packagist HTTP client
pub struct PackagistClient {
    client: Client,
    base_url: String,
}

impl Default for PackagistClient {
    fn default() -> Self {
        Self::new(DEFAULT_PACKAGIST_URL.to_string())
    }
}

impl PackagistClient {
    pub fn new(base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
        }
    }
}

#[async_trait]
impl MetadataSource for PackagistClient {
    async fn fetch(&self, package_name: &str) -> Result<serde_json::Value, RegistryError> {
        let url = format!("{}/packages/{}.json", self.base_url, package_name);
        debug!("Fetching package metadata: {}", url);

        let response = self.client.get(&url).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(RegistryError::NotFound(package_name.to_string()));
        }

        if !response.status().is_success() {
            return Err(RegistryError::Status {
                name: package_name.to_string(),
                status: response.status().as_u16(),
            });
        }

        let data: serde_json::Value = response
            .json()
            .await
            .map_err(|e| RegistryError::InvalidResponse(e.to_string()))?;

        debug!("Fetched metadata for package {}", package_name);

        Ok(data)
    }
}
