//! Convenience re-exports for common use.

pub use crate::api::{ApiClient, FileUpload};
pub use crate::auth::{FileTokenStore, MemoryTokenStore, TokenStore};
pub use crate::config::DocentConfig;
pub use crate::error::{DocentError, Result};
pub use crate::session::{
    channel_stream, simulated_stream, ResponseStream, SendOutcome, SessionManager,
    SessionSnapshot, SimulatedStreamConfig,
};
pub use crate::types::{Agent, FileInfo, Message, Sender};
