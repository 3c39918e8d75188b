//! ARK Arena duel client
//!
//! Terminal driver for one match. It handles:
//! - Local play against the built-in opponent
//! - Multiplayer over the game server WebSocket
//! - Reward booking and result submission through Supabase

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ark_arena::app::{parse_command, AppState, SessionRuntime};
use ark_arena::config::Config;
use ark_arena::game::{GameKind, LocalInput, MatchSession, Notice, SessionMode, SessionSettings};
use ark_arena::util::rate_limit::InputRateLimiter;
use ark_arena::util::time::SessionClock;
use ark_arena::ws::Transport;

const INPUT_CHANNEL_CAPACITY: usize = 32;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize tracing
    init_tracing(&config.log_level);

    info!(game = ?config.game, mode = ?config.mode, match_id = %config.match_id, "Starting ARK Arena client");

    let state = AppState::new(config.clone());
    let local_xp = state.local_xp().await;
    let settings = SessionSettings::from_config(&config, local_xp);

    let clock = SessionClock::new();
    let session = MatchSession::new(settings, clock.now());

    let (input_tx, input_rx) = mpsc::channel(INPUT_CHANNEL_CAPACITY);
    let (notice_tx, notice_rx) = mpsc::unbounded_channel();

    tokio::spawn(read_commands(config.game, input_tx));
    tokio::spawn(render_notices(notice_rx));

    let mut runtime = SessionRuntime::new(
        session,
        clock,
        input_rx,
        notice_tx,
        state.ledger.clone(),
        state.results.clone(),
        config.pacing,
    );

    if config.mode == SessionMode::Multiplayer {
        if let Some(url) = config.ws_url.as_deref() {
            runtime = match Transport::connect(url, config.match_id, &config.player_address).await {
                Ok((transport, events)) => runtime.with_transport(transport, events),
                Err(e) => {
                    warn!(error = %e, "Could not reach game server; playing unconfirmed");
                    runtime.transport_failed(e)
                }
            };
        }
    }

    let report = runtime.run_until(shutdown_signal()).await;

    match report.outcome {
        Some(outcome) => info!(
            ?outcome,
            xp_delta = report.rewards.xp,
            ark_delta = report.rewards.ark,
            balance = ?report.balance,
            "Match over"
        ),
        None => info!("Match abandoned"),
    }
    Ok(())
}

/// Initialize tracing/logging
fn init_tracing(log_level: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .init();
}

/// Stdin lines -> session input, throttled
async fn read_commands(game: GameKind, input_tx: mpsc::Sender<LocalInput>) {
    let limiter = InputRateLimiter::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Ok(Some(line)) = lines.next_line().await {
        if line.trim().is_empty() {
            continue;
        }
        let Some(input) = parse_command(game, &line) else {
            println!("? {}", line.trim());
            continue;
        };
        if !limiter.check() {
            warn!("Rate limited input");
            continue;
        }
        if input_tx.send(input).await.is_err() {
            break;
        }
    }
}

async fn render_notices(mut notices: mpsc::UnboundedReceiver<Notice>) {
    while let Some(notice) = notices.recv().await {
        match notice {
            Notice::Clock { remaining } if remaining % 5 != 0 && remaining > 5 => {}
            notice => println!("{notice:?}"),
        }
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, leaving match");
        }
        _ = terminate => {
            info!("Received terminate signal, leaving match");
        }
    }
}
