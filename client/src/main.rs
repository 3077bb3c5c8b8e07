use clap::Parser;
use client::network::Client;
use log::info;
use protocol::{parse, Request, Response};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Server address to connect to
    #[arg(short = 's', long, default_value = "127.0.0.1:5000")]
    server: String,

    /// Command name to send
    #[arg(short = 'c', long, default_value = "GetPlayerInfo")]
    command: String,

    /// Player card number
    #[arg(short = 'n', long, default_value = "123456789")]
    card_number: String,

    /// Player PIN
    #[arg(short = 'p', long, default_value = "1234")]
    pin: String,

    /// Send this file's bytes verbatim instead of building a request
    #[arg(short = 'r', long)]
    raw: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let request = match &args.raw {
        Some(path) => std::fs::read(path)?,
        None => Request::new(args.command.as_str(), args.card_number.as_str(), args.pin.as_str()).to_bytes(),
    };

    info!("Connecting to: {}", args.server);
    let mut client = Client::connect(&args.server).await?;

    info!("Sending request: {}", String::from_utf8_lossy(&request));
    let reply = client.send_raw(&request).await?;
    println!("{}", String::from_utf8_lossy(&reply));

    if let Some(response) = Response::from_document(&parse(&reply)?) {
        info!(
            "Command={} Status={} Rows={}",
            response.command,
            response.status.as_str(),
            response.rows.len()
        );
    }

    Ok(())
}
