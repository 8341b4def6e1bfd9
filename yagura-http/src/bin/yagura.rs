use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use yagura_core::{LoggingService, Settings};
use yagura_http::server::{ServerConfig, initialize_app, serve};

/// Yagura HTTP API Server
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Host address to bind to
    #[arg(short = 'H', long, default_value = "127.0.0.1", env = "YAGURA_HOST")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = 3000, env = "YAGURA_PORT")]
    port: u16,

    /// Path to the configuration file
    #[arg(short, long, env = "YAGURA_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env before parsing flags so the env fallbacks see its values.
    let _ = dotenv::dotenv();

    let cli = Cli::parse();

    let settings = Arc::new(Settings::load(cli.config.as_deref())?);

    // The guard flushes file log lines; it must live until shutdown.
    let _guard = LoggingService::new(&settings).init_global()?;

    let config = ServerConfig {
        host: cli.host,
        port: cli.port,
    };
    info!(
        "Starting yagura server on {}:{}",
        config.host, config.port
    );

    let app = initialize_app(settings, Vec::new(), Vec::new())?;
    serve(config, app).await
}
