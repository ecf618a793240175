//! sb-server - Study Buddy API
//!
//! REST API for study sessions and quiz scores, plus AI-assisted readiness
//! scoring, scheduling, focus coaching, and chat.

use anyhow::{Context, Result};
use clap::Parser;
use sb_common::config::{
    AiConfig, CompiledDefaults, RootFolderInitializer, RootFolderResolver, ServerConfig,
    TomlConfig, APP_DIR_NAME,
};
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};

use sb_server::config::{init_tracing, Args};
use sb_server::services::AnthropicClient;
use sb_server::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let toml_config = TomlConfig::load_or_default(args.config.as_deref());
    init_tracing(&toml_config);

    info!("Starting Study Buddy API server");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    // Step 1: Resolve settings (CLI → ENV → TOML → compiled default)
    let defaults = CompiledDefaults::for_current_platform();
    let overrides = args.overrides();
    let server_config = ServerConfig::resolve(&overrides, &toml_config, &defaults);
    let ai_config = AiConfig::resolve(&overrides, &toml_config, &defaults);

    // Step 2: Root folder and database
    let root_folder = RootFolderResolver::new(APP_DIR_NAME)
        .with_cli_arg(args.root_folder.clone())
        .with_toml(&toml_config)
        .resolve();
    let initializer = RootFolderInitializer::new(root_folder);
    initializer
        .ensure_directory_exists()
        .context("Failed to initialize root folder")?;

    let db_path = initializer.database_path();
    info!("Database: {}", db_path.display());

    let db_pool = sb_server::db::init_database_pool(&db_path)
        .await
        .context("Failed to open database")?;
    info!("Database connection established");

    // Step 3: Language model client
    let llm = AnthropicClient::new(&ai_config).context("Failed to build AI client")?;
    info!("AI model: {}", llm.model());
    if ai_config.api_key.is_none() {
        warn!("Set ANTHROPIC_API_KEY or ai.api_key to enable AI features");
    }

    let state = AppState::new(db_pool, Arc::new(llm));
    let app = sb_server::build_router(state);

    // Step 4: Serve
    let bind_address = server_config.bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind to {}", bind_address))?;
    info!("Listening on http://{}", bind_address);
    info!("Health check: http://{}/health", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
