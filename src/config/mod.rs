//! Configuration module - environment variable parsing

use std::env;
use std::str::FromStr;

use uuid::Uuid;

use crate::game::clock::TURN_BUDGET_SECS;
use crate::game::{GameKind, SessionMode};

/// Animation and opponent pacing, in milliseconds
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pacing {
    /// Delay between evicting the oldest tic-tac-toe mark and placing the new one
    pub decay_fade_ms: u64,
    /// Connect-Four token fall
    pub token_drop_ms: u64,
    /// Local opponent "thinking" before a board move
    pub ai_think_ms: u64,
    /// Local opponent delay before committing a throw
    pub rps_commit_ms: u64,
    /// Both throws shown before the round is scored
    pub rps_reveal_ms: u64,
    /// Round result shown before the next round
    pub rps_result_ms: u64,
    /// Balance refresh attempts after a result is submitted
    pub refresh_attempts: u32,
    pub refresh_spacing_ms: u64,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            decay_fade_ms: 400,
            token_drop_ms: 450,
            ai_think_ms: 700,
            rps_commit_ms: 800,
            rps_reveal_ms: 1000,
            rps_result_ms: 1500,
            refresh_attempts: 3,
            refresh_spacing_ms: 1200,
        }
    }
}

/// Application configuration loaded from environment variables
#[derive(Clone, Debug)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,

    pub game: GameKind,
    pub mode: SessionMode,

    /// Game server WebSocket endpoint (multiplayer only)
    pub ws_url: Option<String>,
    pub match_id: Uuid,
    /// Local player identity (wallet address)
    pub player_address: String,

    /// ARK stake; `None` is free play
    pub stake: Option<u64>,
    /// Opponent XP used for local staked sessions
    pub opponent_xp: i64,
    /// Seed for the local opponent
    pub ai_seed: Option<u64>,

    /// Supabase project URL; without it rewards stay in memory
    pub supabase_url: Option<String>,
    /// Supabase service role key
    pub supabase_service_role_key: Option<String>,

    pub turn_seconds: u32,
    pub pacing: Pacing,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let mode: SessionMode = parse_or("MODE", SessionMode::Local)?;

        let ws_url = env::var("GAME_WS_URL").ok();
        let match_id = optional::<Uuid>("MATCH_ID")?;
        let player_address = env::var("PLAYER_ADDRESS").ok();

        if mode == SessionMode::Multiplayer {
            if ws_url.is_none() {
                return Err(ConfigError::Missing("GAME_WS_URL"));
            }
            if match_id.is_none() {
                return Err(ConfigError::Missing("MATCH_ID"));
            }
            if player_address.is_none() {
                return Err(ConfigError::Missing("PLAYER_ADDRESS"));
            }
        }

        let mut pacing = Pacing::default();
        pacing.decay_fade_ms = parse_or("DECAY_FADE_MS", pacing.decay_fade_ms)?;

        Ok(Self {
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),

            game: parse_or("GAME", GameKind::TicTacToe)?,
            mode,

            ws_url,
            match_id: match_id.unwrap_or_else(Uuid::new_v4),
            player_address: player_address.unwrap_or_else(|| "local-player".to_string()),

            stake: optional::<u64>("STAKE")?.filter(|s| *s > 0),
            opponent_xp: parse_or("OPPONENT_XP", 1000)?,
            ai_seed: optional("AI_SEED")?,

            supabase_url: env::var("SUPABASE_URL").ok(),
            supabase_service_role_key: env::var("SUPABASE_SERVICE_ROLE_KEY").ok(),

            turn_seconds: parse_or("TURN_SECONDS", TURN_BUDGET_SECS)?,
            pacing,
        })
    }

    /// Supabase credentials, when both are configured
    pub fn supabase(&self) -> Option<(&str, &str)> {
        Some((
            self.supabase_url.as_deref()?,
            self.supabase_service_role_key.as_deref()?,
        ))
    }
}

fn optional<T: FromStr>(key: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid(key)),
        _ => Ok(None),
    }
}

fn parse_or<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    Ok(optional(key)?.unwrap_or(default))
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}
