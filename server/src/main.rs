use anyhow::Result;
use clap::Parser;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

use citysearch_server::build_app;

#[derive(Parser)]
#[command(name = "citysearch-server")]
#[command(about = "Serve ranked and keyword search over the city store", long_about = None)]
struct Args {
    /// Path to the JSON document store
    #[arg(long, default_value = "./data/data.json")]
    data: String,
    /// Largest top_n a single search request may ask for
    #[arg(long, default_value_t = 100)]
    top_n_cap: usize,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    tracing::info!(store = %args.data, top_n_cap = args.top_n_cap, "starting up");
    let app = build_app(&args.data, args.top_n_cap)?;

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
