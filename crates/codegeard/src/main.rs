//! codegeard — the Code Gear site daemon.
//!
//! Serves the admin content API and offers offline maintenance commands:
//! - `serve`: content store + REST API
//! - `content`: inspect or reset the content document
//! - `layout`: inspect or edit saved table layouts
//!
//! # Usage
//!
//! ```text
//! codegeard serve --port 3000 --data-dir /var/lib/codegear
//! codegeard --config codegeard.toml layout resize --table notices-page --column title --width 480
//! ```

mod commands;
mod config;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use codegear_content::{ContentStore, StoreOptions};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::SiteConfig;

const DEFAULT_LOG_FILTER: &str = "info,codegeard=debug,codegear=debug";

#[derive(Parser)]
#[command(name = "codegeard", about = "Code Gear site daemon")]
struct Cli {
    /// Path to a codegeard.toml file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log output format.
    #[arg(long, global = true, value_enum, default_value = "text")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the content API.
    Serve {
        /// Port to listen on (overrides the config file).
        #[arg(long)]
        port: Option<u16>,

        /// Directory holding the content document (overrides the config file).
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Keep content in memory only; nothing is written to disk.
        #[arg(long)]
        in_memory: bool,
    },
    /// Inspect or reset site content.
    Content {
        /// Directory holding the content document (overrides the config file).
        #[arg(long)]
        data_dir: Option<PathBuf>,

        #[command(subcommand)]
        action: ContentAction,
    },
    /// Inspect or edit saved table layouts.
    Layout {
        #[command(subcommand)]
        action: LayoutAction,
    },
}

#[derive(Subcommand)]
enum ContentAction {
    /// Print one partition, or the whole document.
    Show {
        #[arg(long)]
        partition: Option<String>,
    },
    /// Restore one partition, or everything, to the built-in defaults.
    Reset {
        #[arg(long)]
        partition: Option<String>,
    },
}

#[derive(Subcommand)]
enum LayoutAction {
    /// Print columns in display order with their widths.
    Show {
        #[arg(long)]
        table: String,
    },
    /// Move a column into another column's slot.
    Reorder {
        #[arg(long)]
        table: String,
        #[arg(long)]
        column: String,
        #[arg(long)]
        target: String,
    },
    /// Set a column's width in pixels.
    Resize {
        #[arg(long)]
        table: String,
        #[arg(long)]
        column: String,
        #[arg(long, allow_negative_numbers = true)]
        width: i64,
    },
    /// Restore a table's declared order and widths.
    Reset {
        #[arg(long)]
        table: String,
    },
}

fn init_tracing(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    let mut config = SiteConfig::load(cli.config.as_deref())?;

    match cli.command {
        Command::Serve {
            port,
            data_dir,
            in_memory,
        } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(data_dir) = data_dir {
                config.storage.data_dir = data_dir;
            }
            serve(config, in_memory).await
        }
        Command::Content { data_dir, action } => {
            if let Some(data_dir) = data_dir {
                config.storage.data_dir = data_dir;
            }
            let store = open_store(&config, false);
            let output = match action {
                ContentAction::Show { partition } => {
                    commands::content_show(&store, partition.as_deref())?
                }
                ContentAction::Reset { partition } => {
                    commands::content_reset(&store, partition.as_deref())?
                }
            };
            println!("{output}");
            Ok(())
        }
        Command::Layout { action } => {
            let mut layout = commands::open_layout(&config.layout)?;
            let output = match action {
                LayoutAction::Show { table } => commands::layout_show(&layout, &table)?,
                LayoutAction::Reorder {
                    table,
                    column,
                    target,
                } => commands::layout_reorder(&mut layout, &table, &column, &target)?,
                LayoutAction::Resize {
                    table,
                    column,
                    width,
                } => commands::layout_resize(&mut layout, &table, &column, width)?,
                LayoutAction::Reset { table } => commands::layout_reset(&mut layout, &table)?,
            };
            println!("{}", output.trim_end());
            Ok(())
        }
    }
}

fn open_store(config: &SiteConfig, in_memory: bool) -> ContentStore {
    let options = StoreOptions {
        strict_notices: config.content.strict_notices,
    };
    let store = if in_memory {
        info!("content store running in memory only");
        ContentStore::open_in_memory()
    } else {
        let path = config.storage.content_path();
        info!(path = ?path, "content store opened");
        ContentStore::open(&path)
    };
    store.with_options(options)
}

async fn serve(config: SiteConfig, in_memory: bool) -> anyhow::Result<()> {
    info!("Code Gear daemon starting");

    if !in_memory {
        std::fs::create_dir_all(&config.storage.data_dir)?;
    }
    let store = open_store(&config, in_memory);

    // Warm the cache so a broken data file is reported at startup.
    let document = store.read_document();
    info!(
        notices = document.notices.len(),
        technologies = document.technologies.len(),
        strict_notices = config.content.strict_notices,
        "content loaded"
    );

    let router = codegear_api::build_router(store);
    let addr = config.server.socket_addr()?;

    info!(%addr, "API server starting");

    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Graceful shutdown on Ctrl-C.
    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c()
                .await
                .expect("failed to install CTRL+C handler");
            info!("shutdown signal received");
        })
        .await?;

    info!("Code Gear daemon stopped");
    Ok(())
}
