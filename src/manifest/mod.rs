//! composer.json parsing layer
//!
//! Locates package names declared in `require`/`require-dev` together with
//! their source positions, so the LSP layer can answer hover requests.
//!
//! # Modules
//!
//! - [`composer_json`]: tree-sitter based composer.json parser
//! - [`types`]: package entry type, name validation, manifest detection

pub mod composer_json;
pub mod types;
