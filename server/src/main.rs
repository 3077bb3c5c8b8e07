use clap::Parser;
use log::info;
use server::config::{self, ServerConfig};
use server::network::Server;
use std::path::PathBuf;
use std::sync::Arc;

/// Command line arguments
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// Server IP address to bind to
    #[clap(short = 'H', long, default_value = config::DEFAULT_HOST)]
    host: String,
    /// Server port to listen on
    #[clap(short, long, default_value_t = config::DEFAULT_PORT)]
    port: u16,
    /// Receive buffer size; each read is handled as one message
    #[clap(short, long, default_value_t = config::DEFAULT_BUFFER_SIZE)]
    buffer_size: usize,
    /// JSON file holding the player record to serve
    #[clap(short, long)]
    fixture: Option<PathBuf>,
    /// Exit after the first client disconnects
    #[clap(long)]
    once: bool,
    /// Terminate every response with a NUL byte
    #[clap(long)]
    nul_terminate: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    if args.buffer_size == 0 {
        return Err("buffer size must be at least one byte".into());
    }

    let player = match &args.fixture {
        Some(path) => {
            info!("Loading player record from {}", path.display());
            config::load_player(path)?
        }
        None => Default::default(),
    };

    let config = ServerConfig {
        buffer_size: args.buffer_size,
        single_connection: args.once,
        nul_terminate: args.nul_terminate,
        player: Arc::new(player),
        ..ServerConfig::new(&args.host, args.port)
    };

    info!(
        "Using socket server address {} with port {}",
        args.host, args.port
    );
    let server = Server::bind(config).await?;

    // Handle shutdown gracefully
    tokio::select! {
        result = server.run() => result?,
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down gracefully...");
        }
    }

    Ok(())
}
