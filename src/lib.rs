//! ARK Arena duel client engine
//!
//! Deterministic match sessions for tic-tac-toe with decay, Connect-Four and
//! rock-paper-scissors, playable against a local opponent or reconciled
//! against an authoritative game server.

pub mod app;
pub mod config;
pub mod game;
pub mod rewards;
pub mod store;
pub mod util;
pub mod ws;
