//! docent: client-side session engine for document-grounded agent chat.
//!
//! Owns the in-memory collection of agents and their conversations, drives
//! the send/receive protocol against the backend's REST surface, and exposes
//! snapshots plus change notification to a rendering layer. Supports
//! optimistic local appends, per-agent reconciliation of in-flight replies,
//! and incremental (simulated or transport-fed) response streaming.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use docent::api::ApiClient;
//! use docent::auth::FileTokenStore;
//! use docent::config::DocentConfig;
//! use docent::session::SessionManager;
//!
//! # async fn example() -> docent::error::Result<()> {
//! let config = DocentConfig::from_env();
//! let api = Arc::new(ApiClient::new(&config, Arc::new(FileTokenStore::new_default()))?);
//! let session = SessionManager::new(api);
//!
//! session.login("user@example.com", "secret").await?;
//! session.refresh_agents().await?;
//! if let Some(agent) = session.agents().await.first() {
//!     session.select_agent(agent.id).await?;
//!     session.send_message("What does the lease say about subletting?").await;
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod prelude;
pub mod session;
pub mod types;
