use anyhow::Result;
use clap::{Parser, ValueEnum};
use color_eyre::config::HookBuilder;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod handlers;

/// vizboot - initialize an analytics server with content
#[derive(Parser, Debug)]
#[command(name = "vizboot")]
#[command(version = "0.1.0")]
#[command(
    about = "Bootstrap an analytics server: ensure a site and project exist, then publish local datasources and workbooks",
    long_about = None
)]
struct Cli {
    /// Server address, e.g. https://analytics.example.com
    #[arg(short, long, env = "VIZBOOT_SERVER")]
    server: Option<String>,

    /// Folder containing datasource files (*.tds, *.tdsx)
    #[arg(long)]
    datasources_folder: PathBuf,

    /// Folder containing workbook files (*.twb, *.twbx)
    #[arg(long)]
    workbooks_folder: PathBuf,

    /// Site to use (created if absent; defaults to "Default")
    #[arg(long)]
    site: Option<String>,

    /// Project to use (created if absent; defaults to "Default")
    #[arg(short, long)]
    project: Option<String>,

    /// Username to sign into the server
    #[arg(short, long, env = "VIZBOOT_USERNAME")]
    username: Option<String>,

    /// Desired logging level
    #[arg(short = 'l', long, value_enum, default_value_t = LoggingLevel::Error)]
    logging_level: LoggingLevel,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum LoggingLevel {
    Debug,
    Info,
    Error,
}

impl LoggingLevel {
    fn as_filter(self) -> &'static str {
        match self {
            LoggingLevel::Debug => "debug",
            LoggingLevel::Info => "info",
            LoggingLevel::Error => "error",
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Setup error handling
    if let Err(e) = HookBuilder::default().install() {
        eprintln!("Warning: Failed to install error handler: {}", e);
    }

    // Parse CLI arguments
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(cli.logging_level.as_filter()))
        .init();

    handlers::handle_run(
        cli.server.as_deref(),
        cli.username.as_deref(),
        cli.site.as_deref(),
        cli.project.as_deref(),
        &cli.datasources_folder,
        &cli.workbooks_folder,
    )
    .await
}
