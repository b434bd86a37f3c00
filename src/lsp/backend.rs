use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer};
use tracing::{error, info};

use crate::config::{self, ComposerInfoConfig};
use crate::lsp::hover::render_hover;
use crate::manifest::composer_json::ComposerJsonParser;
use crate::manifest::types::{is_composer_manifest, is_valid_package_name};
use crate::packagist::cache::MetadataCache;
use crate::packagist::client::PackagistClient;
use crate::packagist::metadata::PackageMetadata;
use crate::packagist::store::PackageStore;

/// workspace/executeCommand name for dropping the whole cache
pub const CLEAR_CACHE_COMMAND: &str = "composerInfo.clearAllCache";

pub struct Backend {
    client: Client,
    store: Option<Arc<PackageStore>>,
    parser: ComposerJsonParser,
    documents: RwLock<HashMap<Url, String>>,
}

impl Backend {
    pub fn new(client: Client) -> Self {
        let store = Self::initialize_store();
        Self {
            client,
            store,
            parser: ComposerJsonParser::new(),
            documents: RwLock::new(HashMap::new()),
        }
    }

    /// Build a Backend with a custom store (used by tests)
    pub fn build(client: Client, store: Arc<PackageStore>) -> Self {
        Self {
            client,
            store: Some(store),
            parser: ComposerJsonParser::new(),
            documents: RwLock::new(HashMap::new()),
        }
    }

    fn initialize_store() -> Option<Arc<PackageStore>> {
        let data_dir = config::data_dir();
        let db_path = config::db_path();

        // Create data directory if it doesn't exist
        if let Err(e) = std::fs::create_dir_all(&data_dir) {
            error!("Failed to create data directory {:?}: {}", data_dir, e);
            return None;
        }

        match MetadataCache::new(&db_path, config::DEFAULT_CACHE_MAX_ENTRIES) {
            Ok(cache) => {
                info!("Cache initialized at {:?}", db_path);
                Some(Arc::new(PackageStore::new(
                    cache,
                    Arc::new(PackagistClient::default()),
                )))
            }
            Err(e) => {
                error!("Failed to initialize cache: {}", e);
                None
            }
        }
    }

    pub fn server_capabilities() -> ServerCapabilities {
        ServerCapabilities {
            text_document_sync: Some(TextDocumentSyncCapability::Options(
                TextDocumentSyncOptions {
                    open_close: Some(true),
                    change: Some(TextDocumentSyncKind::FULL),
                    ..Default::default()
                },
            )),
            hover_provider: Some(HoverProviderCapability::Simple(true)),
            execute_command_provider: Some(ExecuteCommandOptions {
                commands: vec![CLEAR_CACHE_COMMAND.to_string()],
                work_done_progress_options: Default::default(),
            }),
            ..Default::default()
        }
    }

    async fn update_document(&self, uri: Url, content: String) {
        self.documents.write().await.insert(uri, content);
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for Backend {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        // Malformed initialization options silently fall back to defaults
        let config = params
            .initialization_options
            .and_then(|options| serde_json::from_value::<ComposerInfoConfig>(options).ok())
            .unwrap_or_default();

        if let Some(store) = &self.store {
            store.cache().set_max_entries(config.cache.max_entries);
        }

        self.client
            .log_message(MessageType::INFO, "LSP server initializing")
            .await;
        Ok(InitializeResult {
            capabilities: Self::server_capabilities(),
            server_info: Some(ServerInfo {
                name: "composer-info-lsp".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _params: InitializedParams) {
        self.client
            .log_message(MessageType::INFO, "LSP server initialized")
            .await;
    }

    async fn shutdown(&self) -> Result<()> {
        self.client
            .log_message(MessageType::INFO, "LSP server shutting down")
            .await;
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        self.client
            .log_message(
                MessageType::LOG,
                format!("Document opened: {}", params.text_document.uri),
            )
            .await;

        self.update_document(params.text_document.uri, params.text_document.text)
            .await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        // With FULL sync mode, the last content change contains the full document text
        let Some(content) = params.content_changes.into_iter().last().map(|c| c.text) else {
            return;
        };

        self.update_document(params.text_document.uri, content).await;
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        self.documents.write().await.remove(&params.text_document.uri);
    }

    async fn hover(&self, params: HoverParams) -> Result<Option<Hover>> {
        let uri = params.text_document_position_params.text_document.uri;
        let position = params.text_document_position_params.position;

        if !is_composer_manifest(uri.as_str()) {
            return Ok(None);
        }

        let Some(content) = self.documents.read().await.get(&uri).cloned() else {
            return Ok(None);
        };

        let Some(entry) = self.parser.package_at(
            &content,
            position.line as usize,
            position.character as usize,
        ) else {
            return Ok(None);
        };

        // Platform requirements like "php" never reach the registry
        if !is_valid_package_name(&entry.name) {
            return Ok(None);
        }

        let Some(store) = &self.store else {
            self.client
                .log_message(MessageType::WARNING, "Cache not available, skipping lookup")
                .await;
            return Ok(None);
        };

        self.client
            .log_message(
                MessageType::INFO,
                format!("Fetching data for {}...", entry.name),
            )
            .await;

        let raw = match store.get_data(&entry.name).await {
            Ok(raw) => raw,
            Err(e) => {
                self.client
                    .log_message(
                        MessageType::WARNING,
                        format!("Package data fetch failed: {}", e),
                    )
                    .await;
                return Ok(None);
            }
        };

        let metadata = match PackageMetadata::from_raw(&raw) {
            Ok(metadata) => metadata,
            Err(e) => {
                self.client
                    .log_message(
                        MessageType::WARNING,
                        format!("Package data extraction failed: {}", e),
                    )
                    .await;
                return Ok(None);
            }
        };

        let range = Range {
            start: Position {
                line: entry.line as u32,
                character: entry.start_column as u32,
            },
            end: Position {
                line: entry.line as u32,
                character: entry.end_column as u32,
            },
        };

        Ok(Some(Hover {
            contents: HoverContents::Markup(MarkupContent {
                kind: MarkupKind::Markdown,
                value: render_hover(&metadata),
            }),
            range: Some(range),
        }))
    }

    async fn execute_command(
        &self,
        params: ExecuteCommandParams,
    ) -> Result<Option<serde_json::Value>> {
        if params.command != CLEAR_CACHE_COMMAND {
            return Ok(None);
        }

        let Some(store) = &self.store else {
            return Ok(None);
        };

        match store.cache().clear_all() {
            Ok(()) => {
                self.client
                    .log_message(MessageType::INFO, "Package cache cleared")
                    .await;
            }
            Err(e) => {
                self.client
                    .log_message(MessageType::ERROR, format!("Failed to clear cache: {}", e))
                    .await;
            }
        }

        Ok(None)
    }
}
