//! Lookup orchestration: cache hit, or fetch-and-store on miss

use std::sync::Arc;

use tracing::debug;

use crate::packagist::cache::MetadataCache;
use crate::packagist::client::MetadataSource;
use crate::packagist::error::LookupError;

/// Ties the registry client and the cache together. No retry, no
/// backoff: one lookup means at most one network request.
pub struct PackageStore {
    cache: MetadataCache,
    source: Arc<dyn MetadataSource>,
}

impl PackageStore {
    pub fn new(cache: MetadataCache, source: Arc<dyn MetadataSource>) -> Self {
        Self { cache, source }
    }

    pub fn cache(&self) -> &MetadataCache {
        &self.cache
    }

    /// Return the raw metadata blob for a package, consulting the cache
    /// first and fetching from the registry on a miss.
    pub async fn get_data(&self, name: &str) -> Result<serde_json::Value, LookupError> {
        if let Some(raw) = self.cache.get(name)? {
            debug!("Cache hit for package {}", name);
            return Ok(serde_json::from_str(&raw)?);
        }

        debug!("Cache miss for package {}, fetching", name);
        let data = self.source.fetch(name).await?;
        self.cache.put(name, &data.to_string())?;

        Ok(data)
    }
}
