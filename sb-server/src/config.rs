//! Command-line surface and logging setup for sb-server
//!
//! clap supplies tiers 1 and 2 (argument, then environment variable); the
//! rest of the resolution lives in `sb_common::config`.

use clap::Parser;
use sb_common::config::{ConfigOverrides, TomlConfig};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Command-line arguments for sb-server
#[derive(Parser, Debug, Default)]
#[command(name = "sb-server")]
#[command(about = "Study Buddy API server")]
#[command(version)]
pub struct Args {
    /// Folder holding the database
    #[arg(short, long, env = "STUDY_BUDDY_ROOT_FOLDER")]
    pub root_folder: Option<PathBuf>,

    /// TOML config file (defaults to the platform config location)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Address to bind
    #[arg(long, env = "STUDY_BUDDY_HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "PORT")]
    pub port: Option<u16>,

    /// Language-model provider key
    #[arg(long, env = "ANTHROPIC_API_KEY", hide_env_values = true)]
    pub ai_api_key: Option<String>,

    /// Provider base URL
    #[arg(long, env = "STUDY_BUDDY_AI_BASE_URL")]
    pub ai_base_url: Option<String>,

    /// Model name
    #[arg(long, env = "STUDY_BUDDY_AI_MODEL")]
    pub ai_model: Option<String>,
}

impl Args {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            host: self.host.clone(),
            port: self.port,
            ai_api_key: self.ai_api_key.clone(),
            ai_base_url: self.ai_base_url.clone(),
            ai_model: self.ai_model.clone(),
        }
    }
}

/// Filter used when `RUST_LOG` is unset
pub fn default_log_filter(toml: &TomlConfig) -> String {
    let level = toml
        .logging
        .level
        .as_deref()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .unwrap_or("info");

    format!("sb_server={level},sb_common={level},tower_http={level}")
}

/// Install the global tracing subscriber
pub fn init_tracing(toml: &TomlConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_log_filter(toml)));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
