use serde::{Deserialize, Deserializer};
use std::path::PathBuf;

/// Default maximum number of cached package entries
pub const DEFAULT_CACHE_MAX_ENTRIES: i64 = 1000;

/// Maximum description length shown in the hover popup
pub const DESCRIPTION_MAX_CHARS: usize = 100;

/// LSP configuration structure, read from `initializationOptions`
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ComposerInfoConfig {
    pub cache: CacheConfig,
}

/// Cache-related configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct CacheConfig {
    /// Maximum number of entries retained in the cache.
    /// Zero or a negative value disables eviction.
    #[serde(deserialize_with = "lenient_max_entries")]
    pub max_entries: i64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_CACHE_MAX_ENTRIES,
        }
    }
}

/// Accept the cache cap as a number or a numeric string; anything
/// malformed falls back to the default cap instead of failing.
fn lenient_max_entries<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let max_entries = match &value {
        serde_json::Value::Number(n) => n.as_i64(),
        serde_json::Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    Ok(max_entries.unwrap_or(DEFAULT_CACHE_MAX_ENTRIES))
}

/// Returns the path to the data directory for composer-info-lsp.
/// Uses $XDG_DATA_HOME/composer-info-lsp if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/composer-info-lsp,
/// or ./composer-info-lsp if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the cache database file.
pub fn db_path() -> PathBuf {
    data_dir().join("cache.db")
}

/// Returns the path to the log file.
pub fn log_file_name() -> &'static str {
    "composer-info-lsp.log"
}

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join("composer-info-lsp")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[test]
    fn config_from_empty_object_uses_defaults() {
        let result = serde_json::from_value::<ComposerInfoConfig>(json!({})).unwrap();

        assert_eq!(result.cache.max_entries, DEFAULT_CACHE_MAX_ENTRIES);
    }

    #[test]
    fn config_from_full_object_parses_all_fields() {
        let result = serde_json::from_value::<ComposerInfoConfig>(json!({
            "cache": {
                "maxEntries": 50
            }
        }))
        .unwrap();

        assert_eq!(
            result,
            ComposerInfoConfig {
                cache: CacheConfig { max_entries: 50 },
            }
        );
    }

    #[rstest]
    #[case(json!(200), 200)]
    #[case(json!(0), 0)]
    #[case(json!(-1), -1)]
    #[case(json!("500"), 500)]
    #[case(json!("  42  "), 42)]
    #[case(json!("lots"), DEFAULT_CACHE_MAX_ENTRIES)]
    #[case(json!(1.5), DEFAULT_CACHE_MAX_ENTRIES)]
    #[case(json!(null), DEFAULT_CACHE_MAX_ENTRIES)]
    #[case(json!({"nested": true}), DEFAULT_CACHE_MAX_ENTRIES)]
    fn cache_max_entries_falls_back_on_malformed_values(
        #[case] raw: serde_json::Value,
        #[case] expected: i64,
    ) {
        let result =
            serde_json::from_value::<CacheConfig>(json!({ "maxEntries": raw })).unwrap();
        assert_eq!(result.max_entries, expected);
    }

    #[test]
    fn data_dir_with_env_uses_xdg_data_home_when_set() {
        let path = data_dir_with_env(
            Some("/tmp/test-data".to_string()),
            Some(PathBuf::from("/home/user")),
        );

        assert_eq!(path, PathBuf::from("/tmp/test-data/composer-info-lsp"));
    }

    #[test]
    fn data_dir_with_env_falls_back_to_home_local_share() {
        let path = data_dir_with_env(None, Some(PathBuf::from("/home/user")));

        assert_eq!(
            path,
            PathBuf::from("/home/user/.local/share/composer-info-lsp")
        );
    }

    #[test]
    fn data_dir_with_env_falls_back_to_current_dir_when_no_dirs_available() {
        let path = data_dir_with_env(None, None);
        assert_eq!(path, PathBuf::from("./composer-info-lsp"));
    }
}
