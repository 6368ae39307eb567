//! Conversation session core: state, streaming contract, and the manager
//! that drives the send/receive protocol.

pub mod manager;
pub mod state;
pub mod stream;

pub use manager::{SendOutcome, SessionManager, SessionSnapshot};
pub use stream::{channel_stream, simulated_stream, ResponseStream, SimulatedStreamConfig};
