//! The session engine event loop.
//!
//! One task owns the `GameSession` and serializes everything that touches
//! it: inbound gateway frames, player commands, and the local 1 Hz clock
//! tick. Collaborators observe the session through the [`EventBus`] and
//! drive it through the [`CommandBus`]; state is never shared behind a lock.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use wordsplat_domain::GameSession;
use wordsplat_protocol::{ClientMessage, Decoded};

use crate::commands::{CommandBus, SessionCommand};
use crate::config::ClientConfig;
use crate::connection::{ConnectionState, GatewayClient, PlayerIdentity};
use crate::events::{EventBus, SessionEvent};
use crate::ports::OutboundGateway;
use crate::router::route;

/// Everything the gateway pushes into the engine loop.
#[derive(Debug, Clone)]
pub enum Inbound {
    Frame(Decoded),
    State(ConnectionState),
}

/// Owned handle to the 1 Hz countdown task. The task only emits ticks; the
/// engine loop applies them, so disarming can never race a half-applied
/// tick. Dropping the ticker cancels the task.
struct Ticker {
    tx: mpsc::Sender<()>,
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    fn new(tx: mpsc::Sender<()>) -> Self {
        Self { tx, handle: None }
    }

    /// Start ticking, replacing any previous task. The first tick arrives a
    /// full second after arming.
    fn arm(&mut self) {
        self.disarm();
        let tx = self.tx.clone();
        self.handle = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(1));
            // interval fires immediately once; swallow that.
            interval.tick().await;
            loop {
                interval.tick().await;
                if tx.send(()).await.is_err() {
                    return;
                }
            }
        }));
    }

    fn disarm(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.disarm();
    }
}

/// The session engine. Generic over the outbound gateway so the submission
/// path can run against a scripted gateway in tests.
pub struct SessionEngine<G: OutboundGateway> {
    gateway: Arc<G>,
    session: GameSession,
    events: EventBus,
    inbound_rx: mpsc::Receiver<Inbound>,
    command_tx: mpsc::Sender<SessionCommand>,
    command_rx: mpsc::Receiver<SessionCommand>,
    tick_rx: mpsc::Receiver<()>,
    ticker: Ticker,
    /// Sent as `set_language` once, right after identity assignment.
    language: Option<String>,
}

impl SessionEngine<GatewayClient> {
    /// Build an engine wired to a live gateway connection and start
    /// connecting. Frames and state changes arrive on the engine's inbound
    /// queue; a full queue drops the frame rather than blocking the reader.
    pub fn connect(config: &ClientConfig, identity: &PlayerIdentity) -> Self {
        let client = GatewayClient::new(config, identity);
        let (inbound_tx, inbound_rx) = mpsc::channel(64);

        let frames = inbound_tx.clone();
        client.set_on_message(move |decoded| {
            if frames.try_send(Inbound::Frame(decoded)).is_err() {
                tracing::warn!("inbound queue full; dropping frame");
            }
        });
        let states = inbound_tx;
        client.set_on_state_change(move |state| {
            if states.try_send(Inbound::State(state)).is_err() {
                tracing::warn!("inbound queue full; dropping state change");
            }
        });
        client.connect();

        Self::assemble(Arc::new(client), inbound_rx, config.language.clone())
    }

    /// Foreground/visibility hook: skip any pending reconnect delay.
    pub fn ensure_connected(&self) {
        self.gateway.ensure_connected();
    }
}

impl<G: OutboundGateway> SessionEngine<G> {
    /// Build an engine over an existing gateway; the caller feeds inbound
    /// traffic through the returned sender.
    pub fn with_gateway(gateway: Arc<G>, language: Option<String>) -> (Self, mpsc::Sender<Inbound>) {
        let (inbound_tx, inbound_rx) = mpsc::channel(64);
        (Self::assemble(gateway, inbound_rx, language), inbound_tx)
    }

    fn assemble(gateway: Arc<G>, inbound_rx: mpsc::Receiver<Inbound>, language: Option<String>) -> Self {
        let (command_tx, command_rx) = mpsc::channel(64);
        let (tick_tx, tick_rx) = mpsc::channel(4);
        Self {
            gateway,
            session: GameSession::new(),
            events: EventBus::new(),
            inbound_rx,
            command_tx,
            command_rx,
            tick_rx,
            ticker: Ticker::new(tick_tx),
            language,
        }
    }

    pub fn command_bus(&self) -> CommandBus {
        CommandBus::new(self.command_tx.clone())
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    /// Run until a `Shutdown` command arrives or the inbound side closes.
    pub async fn run(mut self) {
        loop {
            tokio::select! {
                inbound = self.inbound_rx.recv() => match inbound {
                    Some(Inbound::Frame(decoded)) => self.handle_frame(decoded).await,
                    Some(Inbound::State(state)) => {
                        self.events
                            .dispatch(SessionEvent::ConnectionChanged(state))
                            .await;
                    }
                    None => break,
                },
                tick = self.tick_rx.recv() => {
                    if tick.is_some() {
                        self.handle_tick().await;
                    }
                }
                command = self.command_rx.recv() => match command {
                    Some(SessionCommand::Shutdown) | None => break,
                    Some(command) => self.handle_command(command).await,
                },
            }
        }
        self.ticker.disarm();
        self.gateway.shutdown();
        tracing::info!("session engine stopped");
    }

    // ---- inbound ---------------------------------------------------------

    async fn handle_frame(&mut self, decoded: Decoded) {
        let events = route(&mut self.session, decoded);

        let mut arm = false;
        let mut expired = false;
        let mut identity_assigned = false;
        for event in &events {
            match event {
                SessionEvent::RoundStarted { .. } => arm = true,
                SessionEvent::ClockUpdated { remaining: 0, .. } => expired = true,
                SessionEvent::RoundOver(_) => expired = true,
                SessionEvent::IdentityAssigned { .. } => identity_assigned = true,
                _ => {}
            }
        }

        for event in events {
            self.events.dispatch(event).await;
        }

        if identity_assigned {
            if let Some(language) = self.language.take() {
                self.send(ClientMessage::SetLanguage { language });
            }
        }
        if arm && !self.session.clock().is_expired() {
            self.ticker.arm();
        } else if expired {
            self.ticker.disarm();
            self.evaluate_expiry().await;
        }
    }

    async fn handle_tick(&mut self) {
        let remaining = self.session.tick_clock();
        self.events
            .dispatch(SessionEvent::ClockUpdated {
                remaining,
                total: self.session.clock().total(),
            })
            .await;
        if remaining == 0 {
            self.ticker.disarm();
            self.evaluate_expiry().await;
        }
    }

    /// Clock-zero observation. The auto-submit latch inside the session
    /// absorbs redundant observations (local tick plus server timer zero).
    async fn evaluate_expiry(&mut self) {
        if let Some(word) = self.session.observe_expiry() {
            self.send_play(word, true).await;
        }
    }

    // ---- commands --------------------------------------------------------

    async fn handle_command(&mut self, command: SessionCommand) {
        let cues = match command {
            SessionCommand::Place(tile) => self.session.place(tile),
            SessionCommand::TypeLetter(letter) => self.session.type_letter(letter),
            SessionCommand::Backspace => self.session.return_to_rack(None),
            SessionCommand::ReturnSlot(slot) => self.session.return_to_rack(Some(slot)),
            SessionCommand::Clear => self.session.clear(),
            SessionCommand::Shuffle => {
                let mut rng = rand::thread_rng();
                self.session.shuffle(|bound| rng.gen_range(0..bound))
            }
            SessionCommand::ResolveWildcard { tile, letter } => {
                self.session.resolve_wildcard(tile, letter)
            }
            SessionCommand::CancelWildcard => self.session.cancel_wildcard(),
            SessionCommand::Submit => {
                self.submit().await;
                Vec::new()
            }
            SessionCommand::Chat(text) => {
                self.send(ClientMessage::Chat { text });
                Vec::new()
            }
            SessionCommand::SetLanguage(language) => {
                self.send(ClientMessage::SetLanguage { language });
                Vec::new()
            }
            // Handled by the run loop.
            SessionCommand::Shutdown => Vec::new(),
        };
        for cue in cues {
            self.events.dispatch(cue.into()).await;
        }
    }

    /// Manual submission. After clock zero the auto-submit path owns the
    /// word; a late button press changes nothing.
    async fn submit(&mut self) {
        if self.session.clock().is_expired() {
            return;
        }
        if let Some(word) = self.session.prepare_submission() {
            self.send_play(word, false).await;
        }
    }

    /// Send the play and close input. The guard only advances when the
    /// message was actually queued, so a dead connection leaves the player
    /// free to retry.
    async fn send_play(&mut self, word: String, auto: bool) {
        if self.gateway.connection_state() != ConnectionState::Open {
            tracing::warn!(word = %word, auto, "not connected; play not sent");
            if !auto {
                self.events
                    .dispatch(SessionEvent::Feedback {
                        message: "Not connected; word not submitted".to_string(),
                    })
                    .await;
            }
            return;
        }
        match self.gateway.enqueue(ClientMessage::Play { word: word.clone() }) {
            Ok(()) => {
                self.session.mark_submitted();
                tracing::info!(word = %word, auto, "play submitted");
                self.events
                    .dispatch(SessionEvent::SubmissionSent { word, auto })
                    .await;
            }
            Err(error) => {
                tracing::warn!(%error, word = %word, "failed to submit play");
                if !auto {
                    self.events
                        .dispatch(SessionEvent::Feedback {
                            message: "Word not submitted; try again".to_string(),
                        })
                        .await;
                }
            }
        }
    }

    fn send(&self, message: ClientMessage) {
        if let Err(error) = self.gateway.enqueue(message) {
            tracing::warn!(%error, "failed to queue outbound message");
        }
    }
}
