//! # Seednode
//!
//! Entry point for a seed node: the endpoint bootnodes dial to join the
//! network.
//!
//! ## Startup Sequence
//!
//! 1. Load `./config/p2p.toml` (or `--config`), apply `--port` / `--p2p-seed`
//! 2. Pick randomness: `sha256(seed)` cycled when a seed is set, else the OS
//! 3. Generate the secp256k1 identity and start listening
//! 4. Dial bootstrap peers
//! 5. Print addresses every 5 seconds until SIGINT/SIGTERM

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use node_runtime::seednode::{render_status, P2pConfig, SeedMessenger, SeedRandReader, DEFAULT_P2P_CONFIG};
use sn_telemetry::{init_telemetry, TelemetryConfig};
use tracing::info;

const DISPLAY_INTERVAL: Duration = Duration::from_secs(5);

/// Seednode: the entry point bootnodes use to connect to the network.
#[derive(Parser, Debug)]
#[command(name = "seednode")]
#[command(about = "Starts a seed node that helps bootnodes connect to the network")]
struct Args {
    /// Port to listen on, overrides the config file
    #[arg(long)]
    port: Option<u16>,

    /// Seed for a reproducible identity, overrides the config file
    #[arg(long = "p2p-seed")]
    p2p_seed: Option<String>,

    /// P2P configuration file
    #[arg(long, default_value = DEFAULT_P2P_CONFIG)]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> ExitCode {
    match run(Args::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<()> {
    init_telemetry(&TelemetryConfig::for_component("seednode")).context("telemetry init")?;

    let mut config = P2pConfig::load(&args.config)?;
    info!(path = %args.config.display(), "initialized with p2p config");
    if let Some(port) = args.port {
        config.node.port = port;
    }
    if let Some(seed) = args.p2p_seed {
        config.node.seed = seed;
    }

    let messenger = create_messenger(&config)?;
    let _accept = messenger.start().await?;
    messenger.bootstrap().await;

    info!("application is now running");
    println!("{}", render_status(&messenger.addresses(), &messenger.connected_addresses()));

    let mut ticker = tokio::time::interval(DISPLAY_INTERVAL);
    ticker.tick().await;
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("terminating at user's signal");
                return Ok(());
            }
            _ = ticker.tick() => {
                println!("{}", render_status(&messenger.addresses(), &messenger.connected_addresses()));
            }
        }
    }
}

fn create_messenger(config: &P2pConfig) -> Result<SeedMessenger> {
    let messenger = if config.node.seed.is_empty() {
        SeedMessenger::new(config, &mut rand::rngs::OsRng)?
    } else {
        SeedMessenger::new(config, &mut SeedRandReader::from_phrase(&config.node.seed)?)?
    };
    info!(peer_id = %messenger.id(), "starting with kad-dht peer discovery");
    Ok(messenger)
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = sigterm.recv() => {}
                    _ = tokio::signal::ctrl_c() => {}
                }
            }
            Err(_) => {
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
