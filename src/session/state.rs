//! The session state value.
//!
//! One instance lives behind the manager's mutex. All methods are
//! synchronous transforms; every mutation resolves its target agent by id
//! against the current collection, so operations resolving out of order
//! still land on the right entry.

use std::collections::HashSet;

use crate::types::{Agent, Message};

/// Client-side session state: the agent collection, the active selection,
/// the outgoing draft, and in-flight response marks.
#[derive(Debug, Default)]
pub struct SessionState {
    agents: Vec<Agent>,
    selected: Option<i64>,
    draft: String,
    /// Agents with a response round trip or stream in flight.
    pending: HashSet<i64>,
    /// Count of history fetches in flight (selection can change mid-fetch).
    loading_history: u32,
    authenticated: bool,
    revision: u64,
}

impl SessionState {
    pub fn new(authenticated: bool) -> Self {
        Self {
            authenticated,
            ..Self::default()
        }
    }

    // -- agent collection --

    /// Replace the whole collection with the server's authoritative copy.
    pub fn replace_agents(&mut self, agents: Vec<Agent>) {
        self.agents = agents;
        if let Some(id) = self.selected {
            if !self.contains(id) {
                self.selected = None;
            }
        }
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn contains(&self, id: i64) -> bool {
        self.agents.iter().any(|a| a.id == id)
    }

    pub fn agent(&self, id: i64) -> Option<&Agent> {
        self.agents.iter().find(|a| a.id == id)
    }

    fn agent_mut(&mut self, id: i64) -> Option<&mut Agent> {
        self.agents.iter_mut().find(|a| a.id == id)
    }

    /// Insert or replace the entry matching the agent's id. A replaced
    /// entry keeps its conversation history (directory updates do not
    /// truncate the chat).
    pub fn upsert_agent(&mut self, agent: Agent) {
        match self.agent_mut(agent.id) {
            Some(existing) => {
                let history = std::mem::take(&mut existing.chat_history);
                *existing = agent;
                if existing.chat_history.is_empty() {
                    existing.chat_history = history;
                }
            }
            None => self.agents.push(agent),
        }
    }

    /// Remove an agent; clears the selection if it pointed at the entry.
    pub fn remove_agent(&mut self, id: i64) -> bool {
        let before = self.agents.len();
        self.agents.retain(|a| a.id != id);
        let removed = self.agents.len() != before;
        if removed && self.selected == Some(id) {
            self.selected = None;
        }
        removed
    }

    /// Drop a file entry from whichever agent holds it.
    pub fn remove_file(&mut self, file_id: i64) {
        for agent in &mut self.agents {
            agent.files.retain(|f| f.id != file_id);
        }
    }

    // -- conversation history --

    /// Append a message to the agent's history. Returns false when the
    /// agent is no longer in the collection (the message is discarded).
    pub fn push_message(&mut self, id: i64, message: Message) -> bool {
        match self.agent_mut(id) {
            Some(agent) => {
                agent.chat_history.push(message);
                true
            }
            None => false,
        }
    }

    /// Overwrite the text of the agent's last message, provided it is a bot
    /// message. This is the only in-place history mutation permitted; it
    /// carries a streamed response.
    pub fn set_last_bot_text(&mut self, id: i64, text: &str) -> bool {
        match self.agent_mut(id).and_then(|a| a.chat_history.last_mut()) {
            Some(last) if last.is_bot() => {
                last.text = text.to_string();
                true
            }
            _ => false,
        }
    }

    /// Replace the agent's history with the server's copy.
    pub fn replace_history(&mut self, id: i64, history: Vec<Message>) -> bool {
        match self.agent_mut(id) {
            Some(agent) => {
                agent.chat_history = history;
                true
            }
            None => false,
        }
    }

    // -- selection and draft --

    pub fn selected(&self) -> Option<i64> {
        self.selected
    }

    pub fn select(&mut self, id: i64) {
        self.selected = Some(id);
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// The selected agent, resolved against the collection.
    pub fn selected_agent(&self) -> Option<&Agent> {
        self.selected.and_then(|id| self.agent(id))
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    pub fn clear_draft(&mut self) {
        self.draft.clear();
    }

    // -- in-flight marks --

    pub fn is_pending(&self, id: i64) -> bool {
        self.pending.contains(&id)
    }

    pub fn mark_pending(&mut self, id: i64) {
        self.pending.insert(id);
    }

    pub fn release_pending(&mut self, id: i64) {
        self.pending.remove(&id);
    }

    /// Whether the selected agent has a response in flight.
    pub fn is_streaming(&self) -> bool {
        self.selected.map(|id| self.is_pending(id)).unwrap_or(false)
    }

    pub fn begin_history_load(&mut self) {
        self.loading_history += 1;
    }

    pub fn end_history_load(&mut self) {
        self.loading_history = self.loading_history.saturating_sub(1);
    }

    pub fn is_loading_history(&self) -> bool {
        self.loading_history > 0
    }

    // -- session flags --

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn set_authenticated(&mut self, value: bool) {
        self.authenticated = value;
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn bump_revision(&mut self) -> u64 {
        self.revision += 1;
        self.revision
    }
}
