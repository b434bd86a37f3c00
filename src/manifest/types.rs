//! Common types for manifest parsing

use std::sync::LazyLock;

use regex::Regex;

/// Valid Packagist package names look like `owner/name`: word characters
/// and hyphens on each side of a single slash.
static PACKAGE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w-]+/[\w-]+$").expect("package name pattern is valid"));

/// Check whether a string is a well-formed `owner/name` package name.
/// Platform requirements like `php` or `ext-mbstring` have no slash and
/// are rejected here, which keeps them out of the lookup path.
pub fn is_valid_package_name(name: &str) -> bool {
    PACKAGE_NAME.is_match(name)
}

/// Detect whether a document URI refers to a composer manifest
pub fn is_composer_manifest(uri: &str) -> bool {
    uri.ends_with("/composer.json")
}

/// Dependency section a package was declared in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DependencySection {
    Require,
    RequireDev,
}

impl DependencySection {
    pub fn as_str(&self) -> &'static str {
        match self {
            DependencySection::Require => "require",
            DependencySection::RequireDev => "require-dev",
        }
    }
}

/// A package declaration found in a manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageEntry {
    /// Package name (e.g., "monolog/monolog")
    pub name: String,
    /// Section the package was declared in
    pub section: DependencySection,
    /// Byte offset of the name key in the source, including quotes (start)
    pub start_offset: usize,
    /// Byte offset of the name key in the source, including quotes (end)
    pub end_offset: usize,
    /// Line number of the name key (0-indexed)
    pub line: usize,
    /// Column of the opening quote (0-indexed)
    pub start_column: usize,
    /// Column just past the closing quote (0-indexed)
    pub end_column: usize,
}

impl PackageEntry {
    /// Whether a cursor position falls on the name key, quotes included
    pub fn contains(&self, line: usize, column: usize) -> bool {
        self.line == line && self.start_column <= column && column <= self.end_column
    }
}
