//! Runtime wiring between the session core and the outside world

pub mod input;
pub mod runtime;
pub mod state;

pub use input::parse_command;
pub use runtime::{SessionReport, SessionRuntime};
pub use state::AppState;
