//! Game server wire protocol and WebSocket transport

pub mod protocol;
pub mod transport;

pub use protocol::{ClientMsg, ServerMsg};
pub use transport::{Transport, TransportError, TransportEvent};
