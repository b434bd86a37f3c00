//! LSP server initialization and lifecycle

use tower_lsp::{LspService, Server};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config;
use crate::lsp::backend::Backend;

/// Run the LSP server over stdio until the client disconnects.
/// Logs go to a file under the data directory because stdout carries
/// the LSP protocol.
pub async fn run_server() -> anyhow::Result<()> {
    let data_dir = config::data_dir();
    std::fs::create_dir_all(&data_dir)?;

    let file_appender = tracing_appender::rolling::never(&data_dir, config::log_file_name());
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();

    info!("Starting composer-info-lsp v{}", env!("CARGO_PKG_VERSION"));

    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = LspService::new(Backend::new);
    Server::new(stdin, stdout, socket).serve(service).await;

    info!("Server stopped");
    Ok(())
}
