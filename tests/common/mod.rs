//! Shared test scaffolding: a wiremock backend and session builders.

#![allow(dead_code)]

use std::sync::Arc;

use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use docent::api::ApiClient;
use docent::auth::{MemoryTokenStore, TokenStore};
use docent::config::DocentConfig;
use docent::session::SessionManager;

/// Build a client pointed at the mock backend, with an in-memory token store.
pub fn client_for(server: &MockServer, store: Arc<dyn TokenStore>) -> Arc<ApiClient> {
    let config = DocentConfig::new().with_base_url(server.uri());
    Arc::new(ApiClient::new(&config, store).expect("client"))
}

/// A session manager over the mock backend.
pub fn session_for(server: &MockServer) -> Arc<SessionManager> {
    let api = client_for(server, Arc::new(MemoryTokenStore::new()));
    Arc::new(SessionManager::new(api))
}

/// Server-shaped agent payload.
pub fn agent_json(id: i64, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "prompt": format!("You are {name}."),
        "files": [],
        "chatHistory": [],
    })
}

/// Mount the agent directory listing.
pub async fn mount_agents(server: &MockServer, agents: Value) {
    Mock::given(method("GET"))
        .and(path("/api/agents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(agents))
        .mount(server)
        .await;
}

/// Mount an agent's conversation history.
pub async fn mount_history(server: &MockServer, agent_id: i64, messages: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/api/agents/{agent_id}/messages")))
        .respond_with(ResponseTemplate::new(200).set_body_json(messages))
        .mount(server)
        .await;
}

/// Mount the send-message endpoint with a canned bot reply.
pub async fn mount_reply(server: &MockServer, agent_id: i64, reply: &str) {
    Mock::given(method("POST"))
        .and(path(format!("/api/agents/{agent_id}/messages")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "text": reply })))
        .mount(server)
        .await;
}

/// Mount a delayed bot reply, for racing sends against other operations.
pub async fn mount_delayed_reply(
    server: &MockServer,
    agent_id: i64,
    reply: &str,
    delay: std::time::Duration,
) {
    Mock::given(method("POST"))
        .and(path(format!("/api/agents/{agent_id}/messages")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "text": reply }))
                .set_delay(delay),
        )
        .mount(server)
        .await;
}

/// Mount agent deletion.
pub async fn mount_delete_agent(server: &MockServer, agent_id: i64) {
    Mock::given(method("DELETE"))
        .and(path(format!("/api/agents/{agent_id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "detail": "Agent deleted" })))
        .mount(server)
        .await;
}

/// A ready-to-chat session: directory listed, agent selected, empty history.
pub async fn selected_session(server: &MockServer, agent_id: i64) -> Arc<SessionManager> {
    mount_agents(
        server,
        json!([agent_json(agent_id, "primary"), agent_json(agent_id + 1, "other")]),
    )
    .await;
    mount_history(server, agent_id, json!([])).await;
    mount_history(server, agent_id + 1, json!([])).await;

    let session = session_for(server);
    session.refresh_agents().await.expect("refresh");
    session.select_agent(agent_id).await.expect("select");
    session
}
