//! Typed client for the backend REST surface.
//!
//! One [`ApiClient`] per backend. Endpoint groups live in the submodules
//! (`auth`, `agents`, `messages`, `files`) as `impl ApiClient` blocks; this
//! module owns the client state: the HTTP client, base URL, and the bearer
//! token shared with a [`TokenStore`].

pub mod agents;
pub mod auth;
pub mod files;
pub mod http;
pub mod messages;

pub use agents::FileUpload;

use std::sync::{Arc, RwLock};

use reqwest::header::AUTHORIZATION;

use crate::auth::{StoredToken, TokenStore};
use crate::config::DocentConfig;
use crate::error::Result;

/// Client for the agent backend.
///
/// Cheap to share behind an `Arc`; all methods take `&self`.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: RwLock<Option<String>>,
    store: Arc<dyn TokenStore>,
}

impl ApiClient {
    /// Create a client, resuming any token the store holds.
    pub fn new(config: &DocentConfig, store: Arc<dyn TokenStore>) -> Result<Self> {
        let token = store.load()?.map(|t| t.token);
        Ok(Self {
            http: http::build_client(config.timeout())?,
            base_url: config.base_url().to_string(),
            token: RwLock::new(token),
            store,
        })
    }

    /// Whether a bearer token is currently held.
    pub fn has_token(&self) -> bool {
        self.token.read().unwrap_or_else(|e| e.into_inner()).is_some()
    }

    /// Adopt a freshly issued token and write it through to the store.
    pub fn set_token(&self, token: &str) -> Result<()> {
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = Some(token.to_string());
        self.store.save(&StoredToken::new(token))
    }

    /// Drop the token from memory and the store.
    pub fn clear_token(&self) -> Result<()> {
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = None;
        self.store.clear()
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Attach the bearer token, when present, to a request.
    pub(crate) fn authorized(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let token = self.token.read().unwrap_or_else(|e| e.into_inner()).clone();
        match token {
            Some(token) => req.header(AUTHORIZATION, format!("Bearer {token}")),
            None => req,
        }
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }
}
