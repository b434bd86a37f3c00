use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cache lock poisoned")]
    LockPoisoned,
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Package not found: {0}")]
    NotFound(String),

    #[error("Fetch failed for {name}: HTTP {status}")]
    Status { name: String, status: u16 },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Errors surfaced by a full lookup (cache + fetch)
#[derive(Debug, Error)]
pub enum LookupError {
    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("Cached data is not valid JSON: {0}")]
    CorruptEntry(#[from] serde_json::Error),
}
