//! Hiroba chat relay server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin hiroba-server
//! cargo run --bin hiroba-server -- --host 127.0.0.1 --port 3000 --grace-period-secs 5
//! ```

use std::time::Duration;

use clap::Parser;
use hiroba_server::{ServerConfig, config, ui::Server};
use hiroba_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "hiroba-server")]
#[command(about = "Room-based WebSocket chat relay with reconnect-aware presence", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "HOST", default_value = config::DEFAULT_HOST)]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "PORT", default_value_t = config::DEFAULT_PORT)]
    port: u16,

    /// Seconds a disconnected session waits for a reconnect before leaving
    #[arg(long, env = "GRACE_PERIOD_SECS", default_value_t = 8)]
    grace_period_secs: u64,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            grace_period: Duration::from_secs(args.grace_period_secs),
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_PKG_NAME"), env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();
    let config = ServerConfig::from(args);
    tracing::info!(
        "Starting with grace period {:?} on {}",
        config.grace_period,
        config.bind_addr()
    );

    let server = Server::new(config);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
