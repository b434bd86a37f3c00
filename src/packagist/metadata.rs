//! Typed extraction from the raw registry response

use serde_json::Value;
use thiserror::Error;

use crate::config::DESCRIPTION_MAX_CHARS;
use crate::packagist::client::DEFAULT_PACKAGIST_URL;

/// Error type for metadata extraction
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Missing field `{0}` in registry response")]
    MissingField(&'static str),
}

/// The fields shown in the hover popup, pulled out of the raw blob
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageMetadata {
    pub name: String,
    pub description: String,
    pub downloads_total: u64,
    pub favers: u64,
    pub repository: String,
}

impl PackageMetadata {
    /// Extract the popup fields from a raw registry response.
    /// Any expected field missing is a hard extraction failure.
    pub fn from_raw(raw: &Value) -> Result<Self, ExtractError> {
        let package = raw
            .get("package")
            .ok_or(ExtractError::MissingField("package"))?;

        let name = package
            .get("name")
            .and_then(Value::as_str)
            .ok_or(ExtractError::MissingField("package.name"))?;

        let description = package
            .get("description")
            .and_then(Value::as_str)
            .ok_or(ExtractError::MissingField("package.description"))?;

        let downloads_total = package
            .get("downloads")
            .and_then(|d| d.get("total"))
            .and_then(Value::as_u64)
            .ok_or(ExtractError::MissingField("package.downloads.total"))?;

        let favers = package
            .get("favers")
            .and_then(Value::as_u64)
            .ok_or(ExtractError::MissingField("package.favers"))?;

        let repository = package
            .get("repository")
            .and_then(Value::as_str)
            .ok_or(ExtractError::MissingField("package.repository"))?;

        Ok(Self {
            name: name.to_string(),
            description: truncate(description, DESCRIPTION_MAX_CHARS),
            downloads_total,
            favers,
            repository: repository.to_string(),
        })
    }

    /// URL of the package page on Packagist
    pub fn packagist_url(&self) -> String {
        format!("{}/packages/{}", DEFAULT_PACKAGIST_URL, self.name)
    }

    /// Shell command to add the package to a project
    pub fn require_command(&self) -> String {
        format!("composer require {}", self.name)
    }

    /// Shell command to remove the package from a project
    pub fn remove_command(&self) -> String {
        format!("composer remove {}", self.name)
    }
}

/// Truncate to at most `max_chars` characters, appending `...` when cut
fn truncate(s: &str, max_chars: usize) -> String {
    let mut truncated: String = s.chars().take(max_chars).collect();
    if s.chars().count() > max_chars {
        truncated.push_str("...");
    }
    truncated
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn raw_response() -> Value {
        json!({
            "package": {
                "name": "monolog/monolog",
                "description": "Sends your logs to files and sockets",
                "downloads": {"total": 900000000, "monthly": 20000000},
                "favers": 21000,
                "repository": "https://github.com/Seldaek/monolog",
                "maintainers": []
            }
        })
    }

    #[test]
    fn from_raw_extracts_all_fields() {
        let metadata = PackageMetadata::from_raw(&raw_response()).unwrap();

        assert_eq!(
            metadata,
            PackageMetadata {
                name: "monolog/monolog".to_string(),
                description: "Sends your logs to files and sockets".to_string(),
                downloads_total: 900000000,
                favers: 21000,
                repository: "https://github.com/Seldaek/monolog".to_string(),
            }
        );
    }

    #[rstest]
    #[case("package")]
    #[case("name")]
    #[case("description")]
    #[case("downloads")]
    #[case("favers")]
    #[case("repository")]
    fn from_raw_fails_when_field_is_missing(#[case] field: &str) {
        let mut raw = raw_response();
        if field == "package" {
            raw.as_object_mut().unwrap().remove("package");
        } else {
            raw["package"].as_object_mut().unwrap().remove(field);
        }

        let result = PackageMetadata::from_raw(&raw);
        assert!(matches!(result, Err(ExtractError::MissingField(_))));
    }

    #[test]
    fn from_raw_fails_when_downloads_total_is_missing() {
        let mut raw = raw_response();
        raw["package"]["downloads"] = json!({"monthly": 20000000});

        let result = PackageMetadata::from_raw(&raw);
        assert!(matches!(
            result,
            Err(ExtractError::MissingField("package.downloads.total"))
        ));
    }

    #[test]
    fn from_raw_truncates_long_descriptions() {
        let mut raw = raw_response();
        raw["package"]["description"] = json!("x".repeat(150));

        let metadata = PackageMetadata::from_raw(&raw).unwrap();
        assert_eq!(metadata.description.chars().count(), 103);
        assert!(metadata.description.ends_with("..."));
    }

    #[test]
    fn from_raw_keeps_short_descriptions_untouched() {
        let metadata = PackageMetadata::from_raw(&raw_response()).unwrap();
        assert!(!metadata.description.ends_with("..."));
    }

    #[test]
    fn truncate_is_multibyte_safe() {
        let s = "é".repeat(120);
        let truncated = truncate(&s, 100);
        assert_eq!(truncated.chars().count(), 103);
        assert!(truncated.ends_with("..."));
    }

    #[test]
    fn truncate_keeps_exact_length_strings() {
        let s = "a".repeat(100);
        assert_eq!(truncate(&s, 100), s);
    }

    #[test]
    fn derived_urls_and_commands() {
        let metadata = PackageMetadata::from_raw(&raw_response()).unwrap();

        assert_eq!(
            metadata.packagist_url(),
            "https://packagist.org/packages/monolog/monolog"
        );
        assert_eq!(
            metadata.require_command(),
            "composer require monolog/monolog"
        );
        assert_eq!(metadata.remove_command(), "composer remove monolog/monolog");
    }
}
