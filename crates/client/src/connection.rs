//! Gateway connection management.
//!
//! One logical connection to the gateway: connect, detect loss, reconnect
//! after a fixed delay, and re-announce the join intent on every successful
//! open. The reconnect timer is owned by the supervisor task and cancelled
//! deterministically on shutdown; a foreground/visibility hook can skip the
//! delay through [`GatewayClient::ensure_connected`], deduplicated by the
//! "no-op while Open/Connecting" rule.

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::sync::{mpsc, Notify};
use tokio::task::JoinHandle;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use url::Url;

use wordsplat_protocol::{decode, ClientMessage, Decoded};

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::ports::OutboundGateway;

/// Connection state for the game session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// A connection attempt is in flight.
    Connecting,
    /// Connected; outbound sends are attempted immediately.
    Open,
    /// No connection; outbound sends fail until the next reconnect.
    Closed,
}

impl ConnectionState {
    /// Convert to u8 for atomic storage.
    fn to_u8(self) -> u8 {
        match self {
            ConnectionState::Closed => 0,
            ConnectionState::Connecting => 1,
            ConnectionState::Open => 2,
        }
    }

    /// Convert from u8 (atomic storage).
    fn from_u8(v: u8) -> Self {
        match v {
            1 => ConnectionState::Connecting,
            2 => ConnectionState::Open,
            _ => ConnectionState::Closed,
        }
    }
}

/// Who we are to the gateway; carried as a query parameter so the server can
/// attach us to the active round.
#[derive(Debug, Clone)]
pub struct PlayerIdentity {
    pub id: String,
}

type MessageCallback = Box<dyn Fn(Decoded) + Send + Sync>;
type StateCallback = Box<dyn Fn(ConnectionState) + Send + Sync>;

/// Ignore lock poisoning: all guarded state is valid after any panic.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// WebSocket client for the game gateway.
pub struct GatewayClient {
    url: Url,
    reconnect_delay: Duration,
    state: Arc<AtomicU8>,
    tx: Arc<Mutex<Option<mpsc::Sender<ClientMessage>>>>,
    on_message: Arc<Mutex<Option<MessageCallback>>>,
    on_state_change: Arc<Mutex<Option<StateCallback>>>,
    /// Set on shutdown; checked before every (re)connect attempt.
    shutting_down: Arc<AtomicBool>,
    /// Skips the pending reconnect delay (foreground hook).
    wake: Arc<Notify>,
    supervisor: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl GatewayClient {
    pub fn new(config: &ClientConfig, identity: &PlayerIdentity) -> Self {
        let mut url = config.gateway_url.clone();
        url.query_pairs_mut().append_pair("id", &identity.id);
        Self {
            url,
            reconnect_delay: config.reconnect_delay,
            state: Arc::new(AtomicU8::new(ConnectionState::Closed.to_u8())),
            tx: Arc::new(Mutex::new(None)),
            on_message: Arc::new(Mutex::new(None)),
            on_state_change: Arc::new(Mutex::new(None)),
            shutting_down: Arc::new(AtomicBool::new(false)),
            wake: Arc::new(Notify::new()),
            supervisor: Arc::new(Mutex::new(None)),
        }
    }

    pub fn state(&self) -> ConnectionState {
        ConnectionState::from_u8(self.state.load(Ordering::SeqCst))
    }

    pub fn set_on_message<F>(&self, callback: F)
    where
        F: Fn(Decoded) + Send + Sync + 'static,
    {
        *lock(&self.on_message) = Some(Box::new(callback));
    }

    pub fn set_on_state_change<F>(&self, callback: F)
    where
        F: Fn(ConnectionState) + Send + Sync + 'static,
    {
        *lock(&self.on_state_change) = Some(Box::new(callback));
    }

    fn set_state(&self, new_state: ConnectionState) {
        let old = self.state.swap(new_state.to_u8(), Ordering::SeqCst);
        if old != new_state.to_u8() {
            if let Some(cb) = lock(&self.on_state_change).as_ref() {
                cb(new_state);
            }
        }
    }

    /// Open the connection. A call while the connection is `Open` or
    /// `Connecting` is a no-op, which is what deduplicates the scheduled
    /// reconnect timer against foreground-triggered attempts.
    pub fn connect(&self) {
        if self.state() != ConnectionState::Closed {
            return;
        }
        if self.shutting_down.load(Ordering::SeqCst) {
            return;
        }

        let mut supervisor = lock(&self.supervisor);
        if supervisor.as_ref().is_some_and(|h| !h.is_finished()) {
            // Supervisor is alive but between attempts: skip its delay.
            self.wake.notify_one();
            return;
        }
        let client = self.clone();
        *supervisor = Some(tokio::spawn(async move {
            client.supervise().await;
        }));
    }

    /// Foreground/visibility hook: attempt an immediate reconnect.
    pub fn ensure_connected(&self) {
        self.connect();
    }

    /// One supervisor per client: attempt, run until close, wait the fixed
    /// delay (or an `ensure_connected` wake), repeat. Clean and abnormal
    /// closure are treated identically.
    async fn supervise(&self) {
        loop {
            if self.shutting_down.load(Ordering::SeqCst) {
                return;
            }
            self.set_state(ConnectionState::Connecting);
            if let Err(error) = self.run_once().await {
                tracing::warn!(%error, "gateway connection failed");
            }
            *lock(&self.tx) = None;
            self.set_state(ConnectionState::Closed);
            if self.shutting_down.load(Ordering::SeqCst) {
                return;
            }
            tracing::info!(
                delay_secs = self.reconnect_delay.as_secs(),
                "scheduling reconnect"
            );
            tokio::select! {
                _ = tokio::time::sleep(self.reconnect_delay) => {}
                _ = self.wake.notified() => {}
            }
        }
    }

    /// One connection lifetime: open, announce join, pump frames until the
    /// socket closes.
    async fn run_once(&self) -> Result<(), ClientError> {
        let (stream, _) = connect_async(self.url.as_str()).await?;
        tracing::info!(url = %self.url, "connected to gateway");
        let (mut write, mut read) = stream.split();

        let (tx, mut rx) = mpsc::channel::<ClientMessage>(32);
        *lock(&self.tx) = Some(tx);
        self.set_state(ConnectionState::Open);

        // Join intent on every successful open; idempotent server-side.
        if let Err(error) = self.enqueue(ClientMessage::Join) {
            tracing::warn!(%error, "failed to queue join message");
        }

        let writer = tokio::spawn(async move {
            while let Some(message) = rx.recv().await {
                let json = match serde_json::to_string(&message) {
                    Ok(json) => json,
                    Err(error) => {
                        tracing::error!(%error, "failed to serialize outbound message");
                        continue;
                    }
                };
                if let Err(error) = write.send(Message::Text(json)).await {
                    tracing::error!(%error, "failed to send message");
                    break;
                }
            }
        });

        while let Some(frame) = read.next().await {
            match frame {
                Ok(Message::Text(text)) => match decode(&text) {
                    Ok(decoded) => {
                        if let Some(cb) = lock(&self.on_message).as_ref() {
                            cb(decoded);
                        }
                    }
                    Err(error) => {
                        // Protocol fault: log and drop, never crash the router.
                        tracing::warn!(%error, "dropping undecodable frame");
                    }
                },
                Ok(Message::Close(_)) => {
                    tracing::info!("gateway closed connection");
                    break;
                }
                Ok(_) => {}
                Err(error) => {
                    tracing::error!(%error, "websocket error");
                    break;
                }
            }
        }

        writer.abort();
        Ok(())
    }

    /// Tear down the connection and cancel the reconnect timer. Safe to call
    /// more than once.
    pub fn shutdown(&self) {
        self.shutting_down.store(true, Ordering::SeqCst);
        self.wake.notify_one();
        if let Some(handle) = lock(&self.supervisor).take() {
            handle.abort();
        }
        *lock(&self.tx) = None;
        self.set_state(ConnectionState::Closed);
    }
}

impl Clone for GatewayClient {
    fn clone(&self) -> Self {
        Self {
            url: self.url.clone(),
            reconnect_delay: self.reconnect_delay,
            state: Arc::clone(&self.state),
            tx: Arc::clone(&self.tx),
            on_message: Arc::clone(&self.on_message),
            on_state_change: Arc::clone(&self.on_state_change),
            shutting_down: Arc::clone(&self.shutting_down),
            wake: Arc::clone(&self.wake),
            supervisor: Arc::clone(&self.supervisor),
        }
    }
}

impl OutboundGateway for GatewayClient {
    fn connection_state(&self) -> ConnectionState {
        self.state()
    }

    fn enqueue(&self, message: ClientMessage) -> Result<(), ClientError> {
        match lock(&self.tx).as_ref() {
            Some(tx) => tx.try_send(message).map_err(|error| match error {
                mpsc::error::TrySendError::Full(_) => ClientError::QueueFull,
                mpsc::error::TrySendError::Closed(_) => ClientError::NotConnected,
            }),
            None => Err(ClientError::NotConnected),
        }
    }

    fn shutdown(&self) {
        GatewayClient::shutdown(self);
    }
}
