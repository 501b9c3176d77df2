//! Headless WordSplat client.
//!
//! Connects to the gateway, joins the active round, and logs the session
//! event stream. Useful for gateway smoke tests and as the composition
//! blueprint for a real front end.

use rand::Rng;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wordsplat_client::{ClientConfig, PlayerIdentity, SessionCommand, SessionEngine, SessionEvent};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wordsplat=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ClientConfig::from_env()?;
    let identity = PlayerIdentity {
        id: std::env::var("WORDSPLAT_PLAYER_ID")
            .unwrap_or_else(|_| format!("player-{:08x}", rand::thread_rng().gen::<u32>())),
    };
    tracing::info!(url = %config.gateway_url, player_id = %identity.id, "starting WordSplat client");

    let engine = SessionEngine::connect(&config, &identity);
    let commands = engine.command_bus();

    engine
        .events()
        .subscribe(|event| match event {
            SessionEvent::ClockUpdated { remaining, total } => {
                tracing::debug!(remaining, total, "clock");
            }
            other => tracing::info!(event = ?other, "session event"),
        })
        .await;

    let runner = tokio::spawn(engine.run());

    tokio::signal::ctrl_c().await?;
    tracing::info!("shutting down");
    if let Err(error) = commands.send(SessionCommand::Shutdown) {
        tracing::warn!(%error, "engine already stopped");
    }
    runner.await?;
    Ok(())
}
