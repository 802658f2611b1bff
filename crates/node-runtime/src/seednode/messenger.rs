//! TCP seednode endpoint: identity, listener and connection tracking.

use std::collections::BTreeSet;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use k256::ecdsa::SigningKey;
use parking_lot::RwLock;
use rand::{CryptoRng, RngCore};
use shared_types::PeerId;
use tokio::io::AsyncReadExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::seednode::{P2pConfig, SeedNodeError};

const DIAL_TIMEOUT: Duration = Duration::from_secs(5);
const ACCEPT_BACKOFF_BASE: Duration = Duration::from_millis(10);
const ACCEPT_BACKOFF_MAX: Duration = Duration::from_secs(1);

type Connections = Arc<RwLock<BTreeSet<SocketAddr>>>;

pub struct SeedMessenger {
    id: PeerId,
    port: u16,
    bootstrap_peers: Vec<SocketAddr>,
    local_addr: RwLock<Option<SocketAddr>>,
    connections: Connections,
}

impl SeedMessenger {
    /// Validate `config` and derive the node identity from a fresh
    /// secp256k1 key drawn from `rng`.
    pub fn new<R: RngCore + CryptoRng>(config: &P2pConfig, rng: &mut R) -> Result<Self, SeedNodeError> {
        config.validate()?;
        let signing_key = SigningKey::random(rng);
        let public_key = signing_key.verifying_key().to_encoded_point(true);
        Ok(Self {
            id: PeerId::from_public_key(public_key.as_bytes()),
            port: config.node.port,
            bootstrap_peers: config.bootstrap_peers()?,
            local_addr: RwLock::new(None),
            connections: Arc::new(RwLock::new(BTreeSet::new())),
        })
    }

    pub fn id(&self) -> PeerId {
        self.id
    }

    /// Bind the configured port on every interface and start accepting.
    pub async fn start(&self) -> Result<JoinHandle<()>, SeedNodeError> {
        let listener = TcpListener::bind(SocketAddr::from(([0, 0, 0, 0], self.port))).await?;
        self.start_on(listener)
    }

    /// Start accepting on an already bound listener.
    pub fn start_on(&self, listener: TcpListener) -> Result<JoinHandle<()>, SeedNodeError> {
        let local_addr = listener.local_addr()?;
        *self.local_addr.write() = Some(local_addr);
        info!(address = %local_addr, peer_id = %self.id.short(), "seednode listening");

        let connections = Arc::clone(&self.connections);
        Ok(tokio::spawn(async move {
            let mut failures = 0u32;
            loop {
                match listener.accept().await {
                    Ok((stream, remote)) => {
                        failures = 0;
                        track(stream, remote, Arc::clone(&connections));
                    }
                    Err(err) => {
                        failures = failures.saturating_add(1);
                        let delay = accept_backoff(failures);
                        warn!(error = %err, failures, delay_ms = delay.as_millis() as u64, "failed to accept connection");
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }))
    }

    /// Dial every bootstrap peer once; failures are logged, not fatal.
    pub async fn bootstrap(&self) -> usize {
        let mut connected = 0;
        for peer in &self.bootstrap_peers {
            match tokio::time::timeout(DIAL_TIMEOUT, TcpStream::connect(peer)).await {
                Ok(Ok(stream)) => {
                    track(stream, *peer, Arc::clone(&self.connections));
                    connected += 1;
                }
                Ok(Err(err)) => warn!(peer = %peer, error = %err, "bootstrap dial failed"),
                Err(_) => warn!(peer = %peer, "bootstrap dial timed out"),
            }
        }
        info!(connected, total = self.bootstrap_peers.len(), "bootstrap finished");
        connected
    }

    /// Listen addresses in multiaddr form.
    pub fn addresses(&self) -> Vec<String> {
        match *self.local_addr.read() {
            Some(addr) => vec![format!("/ip4/{}/tcp/{}/p2p/{}", addr.ip(), addr.port(), self.id)],
            None => Vec::new(),
        }
    }

    pub fn connected_addresses(&self) -> Vec<String> {
        self.connections
            .read()
            .iter()
            .map(|addr| format!("/ip4/{}/tcp/{}", addr.ip(), addr.port()))
            .collect()
    }
}

/// Record `remote` while the connection stays open.
fn track(mut stream: TcpStream, remote: SocketAddr, connections: Connections) {
    connections.write().insert(remote);
    debug!(remote = %remote, "connection opened");
    tokio::spawn(async move {
        let mut buf = [0u8; 1024];
        loop {
            match stream.read(&mut buf).await {
                Ok(0) | Err(_) => break,
                Ok(_) => {}
            }
        }
        connections.write().remove(&remote);
        debug!(remote = %remote, "connection closed");
    });
}

/// Pause after `failures` consecutive accept errors (EMFILE and the like):
/// doubles from 10ms, capped at one second.
fn accept_backoff(failures: u32) -> Duration {
    let shift = failures.saturating_sub(1).min(16);
    ACCEPT_BACKOFF_BASE
        .saturating_mul(1 << shift)
        .min(ACCEPT_BACKOFF_MAX)
}
