//! The conversation session manager.
//!
//! Owns the client-side view of every agent's conversation and drives the
//! send/receive protocol for the active one. All methods take `&self`;
//! interior mutability via a single `Mutex<SessionState>` keeps mutations
//! strictly serialized while network awaits run with the lock released.
//! Reconciliation always targets the agent id captured when the call was
//! issued, never the current selection.

use std::sync::Arc;

use futures::StreamExt;
use tokio::sync::{watch, Mutex};
use tracing::{debug, warn};

use crate::api::{ApiClient, FileUpload};
use crate::error::{DocentError, Result};
use crate::types::{Agent, Message};

use super::state::SessionState;
use super::stream::{simulated_stream, ResponseStream, SimulatedStreamConfig};

/// How a [`SessionManager::send_message`] call settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Reply received and appended.
    Sent,
    /// Blank text or no selection; nothing happened, no network call.
    Ignored,
    /// The selected agent already has a response in flight; rejected.
    Busy,
    /// The round trip failed; the optimistic user message is kept.
    Failed,
    /// The agent was deleted while the call was in flight; reply dropped.
    Discarded,
}

/// Point-in-time view of session observables for a rendering layer.
///
/// Histories and agent metadata are fetched through the cloning accessors;
/// the snapshot carries the cheap flags plus a revision that changes on
/// every mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub selected: Option<i64>,
    pub streaming: bool,
    pub loading_history: bool,
    pub authenticated: bool,
    pub agent_count: usize,
    pub revision: u64,
}

/// Client-side session core: agent collection, active conversation, and the
/// send/stream/reconcile lifecycle.
pub struct SessionManager {
    api: Arc<ApiClient>,
    state: Mutex<SessionState>,
    snapshot_tx: watch::Sender<SessionSnapshot>,
}

impl SessionManager {
    /// Create a manager over a backend client.
    ///
    /// The session starts authenticated if the client resumed a persisted
    /// token; the backend has the final word via 401 on first use.
    pub fn new(api: Arc<ApiClient>) -> Self {
        let state = SessionState::new(api.has_token());
        let initial = Self::snapshot_of(&state);
        let (snapshot_tx, _) = watch::channel(initial);
        Self {
            api,
            state: Mutex::new(state),
            snapshot_tx,
        }
    }

    // -- observation --

    /// Current snapshot of session observables.
    pub async fn snapshot(&self) -> SessionSnapshot {
        Self::snapshot_of(&*self.state.lock().await)
    }

    /// Subscribe to snapshot changes.
    ///
    /// The receiver fires for every state mutation; `revision` distinguishes
    /// consecutive identical-looking snapshots.
    pub fn watch_snapshot(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshot_tx.subscribe()
    }

    /// Clone of the agent collection.
    pub async fn agents(&self) -> Vec<Agent> {
        self.state.lock().await.agents().to_vec()
    }

    /// Clone of one agent, if present.
    pub async fn agent(&self, id: i64) -> Option<Agent> {
        self.state.lock().await.agent(id).cloned()
    }

    /// Clone of the selected agent, resolved against the collection.
    pub async fn selected_agent(&self) -> Option<Agent> {
        self.state.lock().await.selected_agent().cloned()
    }

    /// The not-yet-sent outgoing message text.
    pub async fn draft(&self) -> String {
        self.state.lock().await.draft().to_string()
    }

    /// Whether the selected agent has a response in flight.
    pub async fn is_streaming(&self) -> bool {
        self.state.lock().await.is_streaming()
    }

    // -- directory --

    /// Fetch the agent directory and replace the collection.
    pub async fn refresh_agents(&self) -> Result<()> {
        match self.api.list_agents().await {
            Ok(agents) => {
                let mut st = self.state.lock().await;
                st.replace_agents(agents);
                self.publish(&mut st);
                Ok(())
            }
            Err(err) => Err(self.fail(err).await),
        }
    }

    /// Create an agent and add it to the collection.
    pub async fn create_agent(
        &self,
        name: &str,
        prompt: &str,
        files: &[FileUpload],
    ) -> Result<Agent> {
        match self.api.create_agent(name, prompt, files).await {
            Ok(agent) => {
                let mut st = self.state.lock().await;
                st.upsert_agent(agent.clone());
                self.publish(&mut st);
                Ok(agent)
            }
            Err(err) => Err(self.fail(err).await),
        }
    }

    /// Update an agent's metadata and file set.
    pub async fn update_agent(
        &self,
        agent_id: i64,
        name: &str,
        prompt: &str,
        files: &[FileUpload],
    ) -> Result<Agent> {
        match self.api.update_agent(agent_id, name, prompt, files).await {
            Ok(agent) => {
                let mut st = self.state.lock().await;
                st.upsert_agent(agent.clone());
                self.publish(&mut st);
                Ok(agent)
            }
            Err(err) => Err(self.fail(err).await),
        }
    }

    /// Delete an agent everywhere: backend, collection, and selection.
    ///
    /// A send still in flight for the agent is not cancelled; its reply is
    /// discarded at reconciliation because the entry is gone.
    pub async fn delete_agent(&self, agent_id: i64) -> Result<()> {
        match self.api.delete_agent(agent_id).await {
            Ok(()) => {
                let mut st = self.state.lock().await;
                st.remove_agent(agent_id);
                self.publish(&mut st);
                Ok(())
            }
            Err(err) => Err(self.fail(err).await),
        }
    }

    /// Delete an uploaded file and drop it from its agent's entry.
    pub async fn delete_file(&self, file_id: i64) -> Result<()> {
        match self.api.delete_file(file_id).await {
            Ok(()) => {
                let mut st = self.state.lock().await;
                st.remove_file(file_id);
                self.publish(&mut st);
                Ok(())
            }
            Err(err) => Err(self.fail(err).await),
        }
    }

    /// Fetch a file's binary content for viewing.
    pub async fn fetch_file(&self, file_id: i64) -> Result<Vec<u8>> {
        match self.api.fetch_file(file_id).await {
            Ok(bytes) => Ok(bytes),
            Err(err) => Err(self.fail(err).await),
        }
    }

    // -- selection --

    /// Select an agent and fetch its conversation from the backend.
    ///
    /// The selection is set synchronously; the history fetch then replaces
    /// the local copy with the server's. A failed fetch keeps whatever
    /// history was held before; the selection itself still stands.
    ///
    /// # Errors
    ///
    /// [`DocentError::AgentNotFound`] when the id is not in the collection;
    /// session state is left untouched.
    pub async fn select_agent(&self, agent_id: i64) -> Result<()> {
        {
            let mut st = self.state.lock().await;
            if !st.contains(agent_id) {
                return Err(DocentError::AgentNotFound(agent_id));
            }
            st.select(agent_id);
            st.begin_history_load();
            self.publish(&mut st);
        }

        let fetched = self.api.fetch_conversation(agent_id).await;

        let failure = {
            let mut st = self.state.lock().await;
            st.end_history_load();
            let failure = match fetched {
                Ok(history) => {
                    st.replace_history(agent_id, history);
                    None
                }
                Err(err) => Some(err),
            };
            self.publish(&mut st);
            failure
        };

        if let Some(err) = failure {
            warn!(agent_id, error = %err, "history fetch failed; keeping prior history");
            self.fail(err).await;
        }
        Ok(())
    }

    /// Drop the active selection.
    pub async fn clear_selection(&self) {
        let mut st = self.state.lock().await;
        st.clear_selection();
        self.publish(&mut st);
    }

    /// Update the outgoing draft text.
    pub async fn set_draft(&self, text: impl Into<String>) {
        let mut st = self.state.lock().await;
        st.set_draft(text);
        self.publish(&mut st);
    }

    // -- the send cycle --

    /// Send a message to the selected agent.
    ///
    /// The user message is appended optimistically and the draft cleared
    /// before the round trip starts; on success the bot reply is appended to
    /// the same agent's history, resolved by id captured now. A transport or
    /// server failure keeps the optimistic message (local echo is never
    /// undone) and reports [`SendOutcome::Failed`].
    pub async fn send_message(&self, text: &str) -> SendOutcome {
        let trimmed = text.trim();

        let agent_id = {
            let mut st = self.state.lock().await;
            let Some(agent_id) = st.selected() else {
                return SendOutcome::Ignored;
            };
            if trimmed.is_empty() {
                return SendOutcome::Ignored;
            }
            if st.is_pending(agent_id) {
                return SendOutcome::Busy;
            }
            st.push_message(agent_id, Message::user(trimmed));
            st.clear_draft();
            st.mark_pending(agent_id);
            self.publish(&mut st);
            agent_id
        };

        debug!(agent_id, "dispatching message");
        let result = self.api.send_message(agent_id, trimmed).await;

        let (outcome, failure) = {
            let mut st = self.state.lock().await;
            st.release_pending(agent_id);
            let (outcome, failure) = match result {
                Ok(reply) => {
                    if st.push_message(agent_id, Message::bot(reply)) {
                        (SendOutcome::Sent, None)
                    } else {
                        debug!(agent_id, "agent removed mid-flight; reply discarded");
                        (SendOutcome::Discarded, None)
                    }
                }
                Err(err) => (SendOutcome::Failed, Some(err)),
            };
            self.publish(&mut st);
            (outcome, failure)
        };

        if let Some(err) = failure {
            warn!(agent_id, error = %err, "send failed; keeping optimistic message");
            self.fail(err).await;
        }
        outcome
    }

    // -- streaming --

    /// Apply an incremental response to an agent's conversation.
    ///
    /// Appends exactly one empty bot message, then overwrites its text with
    /// each cumulative partial from the stream, so history grows by one
    /// message for the whole response. If the agent is deleted mid-stream
    /// the remaining partials are discarded. A stream error keeps whatever
    /// partial text was already applied.
    pub async fn stream_response(&self, agent_id: i64, stream: ResponseStream) -> Result<()> {
        {
            let mut st = self.state.lock().await;
            if !st.contains(agent_id) {
                return Err(DocentError::AgentNotFound(agent_id));
            }
            if st.is_pending(agent_id) {
                return Err(DocentError::Stream(format!(
                    "agent {agent_id} already has a response in flight"
                )));
            }
            st.push_message(agent_id, Message::bot(""));
            st.mark_pending(agent_id);
            self.publish(&mut st);
        }

        let mut stream = stream;
        let mut result = Ok(());
        while let Some(item) = stream.next().await {
            match item {
                Ok(partial) => {
                    let mut st = self.state.lock().await;
                    if !st.contains(agent_id) {
                        debug!(agent_id, "agent removed mid-stream; dropping response");
                        break;
                    }
                    st.set_last_bot_text(agent_id, &partial);
                    self.publish(&mut st);
                }
                Err(err) => {
                    warn!(agent_id, error = %err, "response stream failed; keeping partial text");
                    result = Err(err);
                    break;
                }
            }
        }

        let mut st = self.state.lock().await;
        st.release_pending(agent_id);
        self.publish(&mut st);
        result
    }

    /// Stream a canned response on a timer, in place of a real incremental
    /// transport.
    pub async fn simulate_response(
        &self,
        agent_id: i64,
        full_text: impl Into<String>,
        config: SimulatedStreamConfig,
    ) -> Result<()> {
        self.stream_response(agent_id, simulated_stream(full_text, config))
            .await
    }

    // -- auth --

    /// Log in and mark the session authenticated.
    ///
    /// # Errors
    ///
    /// Propagates the backend's rejection; the server's `detail` message is
    /// carried in the error for display.
    pub async fn login(&self, email: &str, password: &str) -> Result<()> {
        self.api.login(email, password).await?;
        let mut st = self.state.lock().await;
        st.set_authenticated(true);
        self.publish(&mut st);
        Ok(())
    }

    /// Register a new account. Does not log in.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<()> {
        self.api.register(name, email, password).await
    }

    /// Explicit logout: clear the token and reset session state.
    pub async fn logout(&self) {
        self.teardown().await;
    }

    // -- internals --

    fn snapshot_of(st: &SessionState) -> SessionSnapshot {
        SessionSnapshot {
            selected: st.selected(),
            streaming: st.is_streaming(),
            loading_history: st.is_loading_history(),
            authenticated: st.is_authenticated(),
            agent_count: st.agents().len(),
            revision: st.revision(),
        }
    }

    fn publish(&self, st: &mut SessionState) {
        st.bump_revision();
        self.snapshot_tx.send_replace(Self::snapshot_of(st));
    }

    /// Route an operation failure: authentication rejections invalidate the
    /// whole session and force a teardown; everything else passes through.
    async fn fail(&self, err: DocentError) -> DocentError {
        if err.is_auth() {
            warn!(error = %err, "authentication rejected; tearing down session");
            self.teardown().await;
        }
        err
    }

    async fn teardown(&self) {
        if let Err(err) = self.api.clear_token() {
            warn!(error = %err, "failed to clear persisted token");
        }
        let mut st = self.state.lock().await;
        st.set_authenticated(false);
        st.clear_selection();
        st.replace_agents(Vec::new());
        st.clear_draft();
        self.publish(&mut st);
    }
}
