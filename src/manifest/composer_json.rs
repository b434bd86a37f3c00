//! composer.json parser

use crate::manifest::types::{DependencySection, PackageEntry};
use tracing::warn;

/// Parser for composer.json files
pub struct ComposerJsonParser;

impl ComposerJsonParser {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ComposerJsonParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Error type for parsing operations
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Failed to parse the file structure
    #[error("Failed to parse file: {0}")]
    ParseFailed(String),

    /// Tree-sitter related error
    #[error("Tree-sitter error: {0}")]
    TreeSitter(String),
}

impl ComposerJsonParser {
    /// Dependency field names to extract
    const DEPENDENCY_FIELDS: [(&'static str, DependencySection); 2] = [
        ("require", DependencySection::Require),
        ("require-dev", DependencySection::RequireDev),
    ];

    /// Parse the content and extract package declarations
    pub fn parse(&self, content: &str) -> Result<Vec<PackageEntry>, ParseError> {
        let mut parser = tree_sitter::Parser::new();
        let language = tree_sitter_json::LANGUAGE;
        parser.set_language(&language.into()).map_err(|e| {
            warn!("Failed to set JSON language for tree-sitter: {}", e);
            ParseError::TreeSitter(e.to_string())
        })?;

        let tree = parser.parse(content, None).ok_or_else(|| {
            warn!("Failed to parse JSON content");
            ParseError::ParseFailed("Failed to parse JSON".to_string())
        })?;

        let root = tree.root_node();
        let mut results = Vec::new();

        // Find the root object
        if let Some(document) = root.child(0)
            && document.kind() == "object"
        {
            self.extract_sections(document, content, &mut results);
        }

        Ok(results)
    }

    /// Find the package declaration covering a cursor position, if any
    pub fn package_at(&self, content: &str, line: usize, column: usize) -> Option<PackageEntry> {
        let entries = self.parse(content).ok()?;
        entries.into_iter().find(|e| e.contains(line, column))
    }

    /// Extract `require`/`require-dev` sections from the root object
    fn extract_sections(
        &self,
        object_node: tree_sitter::Node,
        content: &str,
        results: &mut Vec<PackageEntry>,
    ) {
        let mut cursor = object_node.walk();

        for child in object_node.children(&mut cursor) {
            if child.kind() != "pair" {
                continue;
            }

            let Some(key_node) = child.child_by_field_name("key") else {
                continue;
            };

            let key_text = self.string_value(key_node, content);

            let Some((_, section)) = Self::DEPENDENCY_FIELDS
                .iter()
                .find(|(field, _)| *field == key_text)
            else {
                continue;
            };

            let Some(value_node) = child.child_by_field_name("value") else {
                continue;
            };

            if value_node.kind() == "object" {
                self.extract_packages(value_node, content, *section, results);
            }
        }
    }

    /// Extract packages from a dependency object (e.g., "require": { ... })
    fn extract_packages(
        &self,
        object_node: tree_sitter::Node,
        content: &str,
        section: DependencySection,
        results: &mut Vec<PackageEntry>,
    ) {
        let mut cursor = object_node.walk();

        for child in object_node.children(&mut cursor) {
            if child.kind() != "pair" {
                continue;
            }

            let Some(key_node) = child.child_by_field_name("key") else {
                continue;
            };

            if key_node.kind() != "string" {
                continue;
            }

            let name = self.string_value(key_node, content);
            let start = key_node.start_position();
            let end = key_node.end_position();

            results.push(PackageEntry {
                name,
                section,
                start_offset: key_node.start_byte(),
                end_offset: key_node.end_byte(),
                line: start.row,
                start_column: start.column,
                end_column: end.column,
            });
        }
    }

    /// Get the text of a string node without the surrounding quotes
    fn string_value(&self, node: tree_sitter::Node, content: &str) -> String {
        let text = &content[node.byte_range()];
        text.trim_matches('"').to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"{
    "name": "acme/app",
    "description": "An example application",
    "require": {
        "php": ">=8.1",
        "monolog/monolog": "^3.0",
        "guzzlehttp/guzzle": "^7.8"
    },
    "require-dev": {
        "phpunit/phpunit": "^11.0"
    },
    "scripts": {
        "test": "phpunit"
    }
}"#;

    #[test]
    fn parse_extracts_require_and_require_dev_packages() {
        let parser = ComposerJsonParser::new();
        let entries = parser.parse(MANIFEST).unwrap();

        let names: Vec<(&str, DependencySection)> = entries
            .iter()
            .map(|e| (e.name.as_str(), e.section))
            .collect();

        assert_eq!(
            names,
            vec![
                ("php", DependencySection::Require),
                ("monolog/monolog", DependencySection::Require),
                ("guzzlehttp/guzzle", DependencySection::Require),
                ("phpunit/phpunit", DependencySection::RequireDev),
            ]
        );
    }

    #[test]
    fn parse_ignores_non_dependency_fields() {
        let parser = ComposerJsonParser::new();
        let entries = parser.parse(MANIFEST).unwrap();

        assert!(entries.iter().all(|e| e.name != "acme/app"));
        assert!(entries.iter().all(|e| e.name != "test"));
    }

    #[test]
    fn parse_records_source_positions() {
        let parser = ComposerJsonParser::new();
        let entries = parser.parse(MANIFEST).unwrap();

        let monolog = entries
            .iter()
            .find(|e| e.name == "monolog/monolog")
            .unwrap();

        // "monolog/monolog" sits on line 5 (0-indexed), starting at column 8
        assert_eq!(monolog.line, 5);
        assert_eq!(monolog.start_column, 8);
        assert_eq!(monolog.end_column, 8 + "\"monolog/monolog\"".len());
        assert_eq!(
            &MANIFEST[monolog.start_offset..monolog.end_offset],
            "\"monolog/monolog\""
        );
    }

    #[test]
    fn package_at_returns_entry_under_cursor() {
        let parser = ComposerJsonParser::new();

        let entry = parser.package_at(MANIFEST, 5, 12).unwrap();
        assert_eq!(entry.name, "monolog/monolog");
    }

    #[test]
    fn package_at_returns_none_for_version_value() {
        let parser = ComposerJsonParser::new();

        // Column 30 is inside "^3.0", not the key
        assert!(parser.package_at(MANIFEST, 5, 30).is_none());
    }

    #[test]
    fn package_at_returns_none_outside_dependency_sections() {
        let parser = ComposerJsonParser::new();

        // "name": "acme/app" on line 1
        assert!(parser.package_at(MANIFEST, 1, 6).is_none());
    }

    #[test]
    fn parse_returns_empty_for_non_object_document() {
        let parser = ComposerJsonParser::new();
        let entries = parser.parse("[1, 2, 3]").unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn parse_returns_empty_when_require_is_not_an_object() {
        let parser = ComposerJsonParser::new();
        let entries = parser.parse(r#"{"require": "not-an-object"}"#).unwrap();
        assert!(entries.is_empty());
    }
}
