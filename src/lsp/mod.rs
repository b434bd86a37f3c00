//! LSP (Language Server Protocol) implementation layer
//!
//! This module handles communication with editors via LSP and answers
//! hover requests for composer.json package names.
//!
//! # Modules
//!
//! - [`backend`]: Main LSP backend implementing `LanguageServer` trait
//! - [`hover`]: Renders package metadata into the Markdown popup
//! - [`server`]: LSP server initialization and lifecycle

pub mod backend;
pub mod hover;
pub mod server;
