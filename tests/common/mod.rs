//! Shared utilities for integration tests.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::time::Duration;

use redirect_router::config::loader::parse_config;
use redirect_router::config::{ConfigRegistrar, RouterConfig};
use redirect_router::routing::{RouteRegistrar, RouteTable, RouteTableHandle};
use redirect_router::{HttpServer, Shutdown};
use tokio::net::TcpListener;

/// Publish the routes of `toml` into a fresh handle.
pub fn routes_from(toml: &str) -> RouteTableHandle {
    let config = parse_config(toml).unwrap();
    let mut table = RouteTable::new();
    ConfigRegistrar::from(config).register_routes(&mut table).unwrap();
    let handle = RouteTableHandle::new();
    handle.publish(table);
    handle
}

/// Start a server for `routes` on an ephemeral loopback port.
pub async fn start_server(routes: RouteTableHandle, base_path: &str) -> (SocketAddr, Shutdown) {
    let mut config = RouterConfig::default();
    config.app.base_path = base_path.to_string();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let server = HttpServer::new(config, routes);

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });
    tokio::time::sleep(Duration::from_millis(50)).await;

    (addr, shutdown)
}

/// HTTP client that reports redirects instead of following them.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
