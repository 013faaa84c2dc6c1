use blockpad_server::{ServerConfig, DEFAULT_CONFIG_NAME};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Blockpad server - JSON page storage for the Blockpad editor
#[derive(Parser, Debug)]
#[command(name = "blockpad-server")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Config file (missing file means defaults)
    #[arg(short, long, default_value = DEFAULT_CONFIG_NAME)]
    config: PathBuf,

    /// Interface to bind
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Directory holding pages.json and blocks.json
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut config = ServerConfig::load(&args.config)?;
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(data_dir) = args.data_dir {
        config.data_dir = data_dir;
    }

    blockpad_server::run(&config).await?;
    Ok(())
}
