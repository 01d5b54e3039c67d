// ABOUTME: Server binary: loads configuration, wires providers and stores, and serves HTTP
// ABOUTME: Shuts down gracefully on Ctrl+C
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Workout Planner Server Binary
//!
//! Starts the plan generation API with the built-in provider adapters and
//! in-memory per-device stores.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{info, warn};
use workout_planner::config::ServerConfig;
use workout_planner::logging;
use workout_planner::resources::ServerResources;
use workout_planner::routes;

#[derive(Parser)]
#[command(name = "workout-planner-server")]
#[command(about = "Workout plan generation API backed by pluggable LLM providers")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Override listen host
    #[arg(long)]
    host: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    logging::init_from_env()?;

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }
    if let Some(host) = args.host {
        config.host = host;
    }

    info!("Starting Workout Planner");
    info!("{}", config.summary());

    let resources = Arc::new(
        ServerResources::from_config(Arc::new(config.clone()))
            .context("Failed to initialise server resources")?,
    );
    let app = routes::router(&resources);

    let addr: SocketAddr = format!("{}:{}", config.host, config.http_port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", config.host, config.http_port))?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    display_available_endpoints(&addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("Workout Planner shut down");
    Ok(())
}

fn display_available_endpoints(addr: &SocketAddr) {
    info!("=== Available API Endpoints ===");
    info!("   Generate:     POST http://{addr}/generate");
    info!("   Snapshot:     GET  http://{addr}/snapshot");
    info!("   Log Session:  POST http://{addr}/workouts/{{id}}/log");
    info!("   Health:       GET  http://{addr}/health");
    info!("   Ready:        GET  http://{addr}/ready");
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        warn!("Failed to install Ctrl+C handler: {e}");
    }
}
