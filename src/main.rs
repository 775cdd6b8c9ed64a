//! Redirect Router
//!
//! Serves a route table loaded from a TOML file and reloaded whenever the
//! file changes. Redirect entries answer with 301/302 to another route.
//!
//! # Architecture Overview
//!
//! ```text
//!   routes.toml ──watch──▶ RouteTableReloader ──publish──▶ RouteTableHandle
//!                               │                               │
//!                         TomlRouteCompiler                 load()│
//!                               │                               ▼
//!     Client Request ───────────┼──────────────▶ http::server ─▶ RouteTable
//!                               │                               │
//!     Client Response ◀─────────┼──────────────── http::response ◀ HandlerAction
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use redirect_router::config::{load_config, FileChangeNotifier, TomlRouteCompiler};
use redirect_router::lifecycle::signals::spawn_signal_listener;
use redirect_router::lifecycle::Shutdown;
use redirect_router::observability::{logging, metrics};
use redirect_router::routing::{ConfigSource, RouteTableHandle, RouteTableReloader};
use redirect_router::HttpServer;

#[derive(Parser)]
#[command(name = "redirect-router")]
#[command(about = "Hot-reloading route table with redirect routes", long_about = None)]
struct Cli {
    /// Routes configuration file (TOML).
    #[arg(short, long, default_value = "routes.toml")]
    config: PathBuf,

    /// Override the configured bind address.
    #[arg(short, long)]
    bind: Option<String>,

    /// Load routes once instead of watching the file.
    #[arg(long)]
    no_watch: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = load_config(&cli.config)?;
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    logging::init_logging(&config.observability)?;
    tracing::info!("redirect-router v0.1.0 starting");

    tracing::info!(
        bind_address = %config.listener.bind_address,
        routes = config.routes.len(),
        redirects = config.redirects.len(),
        base_path = %config.app.base_path,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let routes = RouteTableHandle::new();
    let reloader = RouteTableReloader::new(
        routes.clone(),
        Arc::new(TomlRouteCompiler),
        Arc::new(FileChangeNotifier::default()),
    );
    let source = ConfigSource::new(&cli.config);
    let subscription = if cli.no_watch {
        reloader.reload(&source);
        None
    } else {
        Some(reloader.register(source)?)
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        "Listening for connections"
    );

    let shutdown = Shutdown::new();
    spawn_signal_listener(shutdown.clone());

    let server = HttpServer::new(config, routes);
    server.run(listener, shutdown.subscribe()).await?;

    drop(subscription);
    tracing::info!("Shutdown complete");
    Ok(())
}
