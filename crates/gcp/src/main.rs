#![forbid(unsafe_code)]

use anyhow::Result;
use clap::Parser;
use gcp::config::{Args, Mode, ServerConfig};
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    match args.mode {
        Mode::Server => {
            let config: ServerConfig = args.into();
            if let Err(e) = config.validate() {
                anyhow::bail!("configuration error: {}", e);
            }

            let listener = TcpListener::bind(config.listen).await?;
            tokio::select! {
                result = gcp::server::run(listener, config) => {
                    if let Err(e) = result {
                        tracing::error!("server error: {}", e);
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("received shutdown signal");
                }
            }
        }
        Mode::Client => {
            gcp::client::send_word(&args.target, &args.word).await?;
        }
    }

    Ok(())
}
