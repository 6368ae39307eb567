//! Core data model shared across the crate.

pub mod agent;
pub mod message;

pub use agent::{Agent, FileInfo};
pub use message::{Message, Sender};
