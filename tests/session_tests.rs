//! Session lifecycle: optimistic sends, reconciliation by id, and the
//! no-cross-contamination guarantees between agents.

mod common;

use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::*;
use docent::error::DocentError;
use docent::session::SendOutcome;
use docent::types::Sender;

#[tokio::test]
async fn send_appends_user_then_bot_exactly_once() {
    let server = MockServer::start().await;
    let session = selected_session(&server, 1).await;
    mount_reply(&server, 1, "the reply").await;

    let outcome = session.send_message("hello there").await;
    assert_eq!(outcome, SendOutcome::Sent);

    let history = session.agent(1).await.unwrap().chat_history;
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].sender, Sender::User);
    assert_eq!(history[0].text, "hello there");
    assert_eq!(history[1].sender, Sender::Bot);
    assert_eq!(history[1].text, "the reply");

    // The selected view and the collection entry are the same object.
    let selected = session.selected_agent().await.unwrap();
    assert_eq!(selected.chat_history, history);
}

#[tokio::test]
async fn optimistic_message_is_visible_while_reply_is_in_flight() {
    let server = MockServer::start().await;
    let session = selected_session(&server, 1).await;
    mount_delayed_reply(&server, 1, "slow reply", Duration::from_millis(200)).await;

    session.set_draft("a question").await;
    let sender = Arc::clone(&session);
    let handle = tokio::spawn(async move { sender.send_message("a question").await });

    // Give the dispatch a moment to run its optimistic half.
    tokio::time::sleep(Duration::from_millis(50)).await;
    let history = session.agent(1).await.unwrap().chat_history;
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].text, "a question");
    assert!(session.is_streaming().await);
    assert_eq!(session.draft().await, "");

    assert_eq!(handle.await.unwrap(), SendOutcome::Sent);
    assert!(!session.is_streaming().await);
    assert_eq!(session.agent(1).await.unwrap().chat_history.len(), 2);
}

#[tokio::test]
async fn blank_sends_are_silent_no_ops() {
    let server = MockServer::start().await;
    // The messages endpoint must never be hit.
    Mock::given(method("POST"))
        .and(path("/api/agents/1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "text": "nope" })))
        .expect(0)
        .mount(&server)
        .await;
    let session = selected_session(&server, 1).await;

    assert_eq!(session.send_message("").await, SendOutcome::Ignored);
    assert_eq!(session.send_message("   ").await, SendOutcome::Ignored);
    assert!(session.agent(1).await.unwrap().chat_history.is_empty());
}

#[tokio::test]
async fn send_without_selection_is_a_no_op() {
    let server = MockServer::start().await;
    mount_agents(&server, json!([agent_json(1, "a")])).await;
    let session = session_for(&server);
    session.refresh_agents().await.unwrap();

    assert_eq!(session.send_message("hello").await, SendOutcome::Ignored);
    assert!(session.agent(1).await.unwrap().chat_history.is_empty());
}

#[tokio::test]
async fn selecting_unknown_agent_fails_and_leaves_state_unchanged() {
    let server = MockServer::start().await;
    mount_agents(&server, json!([agent_json(1, "a")])).await;
    let session = session_for(&server);
    session.refresh_agents().await.unwrap();

    let before = session.snapshot().await;
    let err = session.select_agent(99).await.unwrap_err();
    assert!(matches!(err, DocentError::AgentNotFound(99)));
    let after = session.snapshot().await;
    assert_eq!(before, after);
    assert_eq!(session.selected_agent().await, None);
}

#[tokio::test]
async fn reply_lands_in_the_agent_it_was_sent_to_after_a_switch() {
    let server = MockServer::start().await;
    let session = selected_session(&server, 1).await;
    mount_delayed_reply(&server, 1, "for agent one", Duration::from_millis(150)).await;

    let sender = Arc::clone(&session);
    let handle = tokio::spawn(async move { sender.send_message("question").await });
    tokio::time::sleep(Duration::from_millis(30)).await;

    // Switch away while the round trip is in flight.
    session.select_agent(2).await.unwrap();
    assert_eq!(handle.await.unwrap(), SendOutcome::Sent);

    let one = session.agent(1).await.unwrap().chat_history;
    assert_eq!(one.len(), 2);
    assert_eq!(one[1].text, "for agent one");
    assert!(session.agent(2).await.unwrap().chat_history.is_empty());
}

#[tokio::test]
async fn deleting_the_agent_mid_flight_discards_the_reply() {
    let server = MockServer::start().await;
    let session = selected_session(&server, 1).await;
    mount_delayed_reply(&server, 1, "too late", Duration::from_millis(150)).await;
    mount_delete_agent(&server, 1).await;

    let sender = Arc::clone(&session);
    let handle = tokio::spawn(async move { sender.send_message("question").await });
    tokio::time::sleep(Duration::from_millis(30)).await;

    session.delete_agent(1).await.unwrap();
    assert_eq!(handle.await.unwrap(), SendOutcome::Discarded);

    // No entry resurrected for the deleted id.
    assert_eq!(session.agent(1).await, None);
    assert_eq!(session.agents().await.len(), 1);
}

#[tokio::test]
async fn streaming_flag_clears_on_success_and_failure() {
    let server = MockServer::start().await;
    let session = selected_session(&server, 1).await;

    Mock::given(method("POST"))
        .and(path("/api/agents/1/messages"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    assert_eq!(session.send_message("first").await, SendOutcome::Failed);
    assert!(!session.is_streaming().await);

    mount_reply(&server, 1, "ok").await;
    assert_eq!(session.send_message("second").await, SendOutcome::Sent);
    assert!(!session.is_streaming().await);
}

#[tokio::test]
async fn failed_send_keeps_the_optimistic_message() {
    let server = MockServer::start().await;
    let session = selected_session(&server, 1).await;
    Mock::given(method("POST"))
        .and(path("/api/agents/1/messages"))
        .respond_with(ResponseTemplate::new(502).set_body_json(json!({ "detail": "upstream" })))
        .mount(&server)
        .await;

    assert_eq!(session.send_message("still here").await, SendOutcome::Failed);

    let history = session.agent(1).await.unwrap().chat_history;
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].sender, Sender::User);
    assert_eq!(history[0].text, "still here");
}

#[tokio::test]
async fn second_send_to_the_same_agent_while_pending_is_rejected() {
    let server = MockServer::start().await;
    let session = selected_session(&server, 1).await;
    mount_delayed_reply(&server, 1, "slow", Duration::from_millis(150)).await;

    let sender = Arc::clone(&session);
    let handle = tokio::spawn(async move { sender.send_message("first").await });
    tokio::time::sleep(Duration::from_millis(30)).await;

    assert_eq!(session.send_message("second").await, SendOutcome::Busy);
    assert_eq!(handle.await.unwrap(), SendOutcome::Sent);

    // Only the first exchange landed.
    let history = session.agent(1).await.unwrap().chat_history;
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].text, "first");
}

#[tokio::test]
async fn concurrent_sends_to_different_agents_do_not_cross_contaminate() {
    let server = MockServer::start().await;
    let session = selected_session(&server, 1).await;
    mount_delayed_reply(&server, 1, "reply one", Duration::from_millis(150)).await;
    mount_reply(&server, 2, "reply two").await;

    let sender = Arc::clone(&session);
    let first = tokio::spawn(async move { sender.send_message("to one").await });
    tokio::time::sleep(Duration::from_millis(30)).await;

    session.select_agent(2).await.unwrap();
    assert_eq!(session.send_message("to two").await, SendOutcome::Sent);
    assert_eq!(first.await.unwrap(), SendOutcome::Sent);

    let one = session.agent(1).await.unwrap().chat_history;
    let two = session.agent(2).await.unwrap().chat_history;
    assert_eq!(
        one.iter().map(|m| m.text.as_str()).collect::<Vec<_>>(),
        vec!["to one", "reply one"]
    );
    assert_eq!(
        two.iter().map(|m| m.text.as_str()).collect::<Vec<_>>(),
        vec!["to two", "reply two"]
    );
}

#[tokio::test]
async fn history_fetch_is_idempotent_between_sends() {
    let server = MockServer::start().await;
    mount_agents(&server, json!([agent_json(1, "a")])).await;
    mount_history(
        &server,
        1,
        json!([
            { "id": 1, "sender": "user", "text": "q" },
            { "id": 2, "sender": "bot", "text": "a" },
        ]),
    )
    .await;
    let session = session_for(&server);
    session.refresh_agents().await.unwrap();

    session.select_agent(1).await.unwrap();
    let first = session.agent(1).await.unwrap().chat_history;
    session.select_agent(1).await.unwrap();
    let second = session.agent(1).await.unwrap().chat_history;
    assert_eq!(first, second);
    assert_eq!(first.len(), 2);
}

#[tokio::test]
async fn failed_history_fetch_keeps_the_previous_history() {
    let server = MockServer::start().await;
    mount_agents(&server, json!([agent_json(1, "a")])).await;
    // First fetch succeeds, every later one fails.
    Mock::given(method("GET"))
        .and(path("/api/agents/1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "sender": "user", "text": "kept" },
        ])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/agents/1/messages"))
        .respond_with(ResponseTemplate::new(500).set_body_string("db down"))
        .mount(&server)
        .await;

    let session = session_for(&server);
    session.refresh_agents().await.unwrap();
    session.select_agent(1).await.unwrap();
    assert_eq!(session.agent(1).await.unwrap().chat_history.len(), 1);

    // Selection still succeeds; the stale history is preserved.
    session.select_agent(1).await.unwrap();
    assert_eq!(session.selected_agent().await.unwrap().id, 1);
    let history = session.agent(1).await.unwrap().chat_history;
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].text, "kept");
}

#[tokio::test]
async fn watch_subscribers_observe_every_mutation() {
    let server = MockServer::start().await;
    let session = selected_session(&server, 1).await;
    let mut rx = session.watch_snapshot();
    let start = rx.borrow_and_update().revision;

    session.set_draft("typing...").await;
    rx.changed().await.unwrap();
    let next = rx.borrow_and_update().revision;
    assert!(next > start);
}
