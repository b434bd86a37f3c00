//! Core library for composer-info-lsp.
//!
//! The [`packagist`] module is the host-agnostic core (fetch, cache, lookup);
//! [`manifest`] locates package names in composer.json; [`lsp`] is the thin
//! editor adapter on top.

pub mod config;
pub mod lsp;
pub mod manifest;
pub mod packagist;
